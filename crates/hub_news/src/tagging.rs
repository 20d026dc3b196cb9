use std::collections::BTreeSet;

use hub_core::Tag;

/// Keyword groups, checked in this order. Plain substring tests on lower-cased text.
pub const KEYWORDS: [(Tag, &[&str]); 4] = [
    (Tag::Robotics, &["robot", "robotics"]),
    (Tag::Ai, &["ai", "artificial intelligence", "llm"]),
    (Tag::Hardware, &["hardware", "chip", "sensor"]),
    (Tag::Ethics, &["ethic", "bias", "fairness"]),
];

/// Multi-label classification of an article; `General` when nothing matches.
pub fn derive_tags(title: &str, description: Option<&str>) -> BTreeSet<Tag> {
    let content = format!("{} {}", title, description.unwrap_or_default()).to_lowercase();

    let mut tags: BTreeSet<Tag> = KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| content.contains(w)))
        .map(|(tag, _)| *tag)
        .collect();

    if tags.is_empty() {
        tags.insert(Tag::General);
    }
    tags
}
