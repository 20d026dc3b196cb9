use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Topic classification derived from an article's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Robotics,
    #[serde(rename = "AI")]
    Ai,
    Hardware,
    Ethics,
    General,
}

impl Tag {
    pub const FILTERABLE: [Tag; 4] = [Tag::Ai, Tag::Robotics, Tag::Hardware, Tag::Ethics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Robotics => "Robotics",
            Tag::Ai => "AI",
            Tag::Hardware => "Hardware",
            Tag::Ethics => "Ethics",
            Tag::General => "General",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "robotics" => Ok(Tag::Robotics),
            "ai" => Ok(Tag::Ai),
            "hardware" => Ok(Tag::Hardware),
            "ethics" => Ok(Tag::Ethics),
            "general" => Ok(Tag::General),
            other => Err(Error::InvalidInput(format!("Unknown tag: {}", other))),
        }
    }
}

/// News view filter: everything, or articles carrying one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Only(Tag),
}

impl TagFilter {
    /// Filters in the order the news page shows them.
    pub fn choices() -> Vec<TagFilter> {
        std::iter::once(TagFilter::All)
            .chain(Tag::FILTERABLE.iter().copied().map(TagFilter::Only))
            .collect()
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(tag) => article.tags.contains(tag),
        }
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::All => f.write_str("All"),
            TagFilter::Only(tag) => tag.fmt(f),
        }
    }
}

impl FromStr for TagFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TagFilter::All);
        }
        s.parse().map(TagFilter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub source: String,
    pub date: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
    pub tags: BTreeSet<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    /// Stamped at microsecond precision, the finest the stores keep, so a
    /// locally built answer compares equal to its persisted copy.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: store_timestamp(Utc::now()),
        }
    }
}

/// Truncate to the microsecond precision timestamps are persisted with.
pub fn store_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Answers oldest first, the order the detail view shows them in.
    pub fn answers_chronological(&self) -> Vec<&Answer> {
        let mut answers: Vec<&Answer> = self.answers.iter().collect();
        answers.sort_by_key(|a| a.created_at);
        answers
    }

    /// Array-union append: an identical answer already present is not added twice.
    pub fn union_answer(&mut self, answer: Answer) -> bool {
        if self.answers.contains(&answer) {
            return false;
        }
        self.answers.push(answer);
        true
    }
}

/// Orders a collection the way subscriptions deliver it: newest question first.
pub fn sort_newest_first(questions: &mut [Question]) {
    questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
