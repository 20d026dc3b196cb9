use hub_core::resources::ResourceCategory;
use hub_core::Article;

/// Headlines sent to topic extraction.
pub const MAX_HEADLINES: usize = 10;

pub fn summarize_prompt(title: &str, snippet: &str) -> String {
    format!(
        "Summarize the following news article in a single, concise sentence. Title: \"{}\". Snippet: \"{}\"",
        title, snippet
    )
}

pub fn topics_prompt(articles: &[Article]) -> String {
    let titles = articles
        .iter()
        .take(MAX_HEADLINES)
        .map(|a| a.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "From the following list of tech news headlines, identify the 6 most important and distinct technical concepts or topics. Return them as a JSON array of strings. Headlines: {}",
        titles
    )
}

/// `Category:\n- Title (Type)` blocks separated by blank lines.
pub fn render_catalog(catalog: &[ResourceCategory]) -> String {
    catalog
        .iter()
        .map(|category| {
            let items = category
                .resources
                .iter()
                .map(|r| format!("- {} ({})", r.title, r.kind))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}:\n{}", category.name, items)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn learning_path_prompt(goal: &str, catalog: &[ResourceCategory]) -> String {
    format!(
        "As an expert tutor in AI and Robotics, create a simple, step-by-step learning path for a student with the goal: \"{}\". \
Use the following list of available resources. Recommend a sequence of 2-4 resources from the list and briefly explain why each one is a good next step. \
If a resource is not on the list, suggest what kind of topic they should search for. Keep the language encouraging and clear.\n\
Format the answer as a course module: start with a `#` heading, then one numbered step per resource with the resource name in **bold**.\n\n\
Available Resources:\n{}",
        goal.trim(),
        render_catalog(catalog)
    )
}
