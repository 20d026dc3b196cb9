//! Plain-text page views. Everything here is presentational: callers fetch
//! data, wrap it in a [`FeatureState`], and print what comes back.

use std::fmt::Write;

use hub_core::resources::ResourceCategory;
use hub_core::{Article, Question, Result, TagFilter};
use hub_inference::LearningPath;

pub const NO_ANSWERS: &str = "No answers yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    News,
    Resources,
    Community,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::News, Page::Resources, Page::Community];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::News => "News",
            Page::Resources => "Resources",
            Page::Community => "Community",
        }
    }
}

/// Per-feature load state. A failure stays local to the feature that hit it.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> From<Result<T>> for FeatureState<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => FeatureState::Ready(value),
            Err(e) => FeatureState::Failed(e.to_string()),
        }
    }
}

impl<T> FeatureState<T> {
    pub fn render(&self, ready: impl FnOnce(&T) -> String) -> String {
        match self {
            FeatureState::Loading => "Loading...\n".to_string(),
            FeatureState::Ready(value) => ready(value),
            FeatureState::Failed(message) => format!("Error: {}\n", message),
        }
    }
}

/// Shown while a page's data is in flight.
pub fn render_loading(page: Page) -> String {
    let mut out = render_nav(page);
    out.push_str(&FeatureState::<()>::Loading.render(|_| String::new()));
    out
}

/// Header line with every page, the active one bracketed.
pub fn render_nav(active: Page) -> String {
    let items: Vec<String> = Page::ALL
        .iter()
        .map(|page| {
            if *page == active {
                format!("[{}]", page.title())
            } else {
                page.title().to_string()
            }
        })
        .collect();
    format!("AI & Robotics Hub | {}\n\n", items.join("  "))
}

pub fn render_article(index: usize, article: &Article) -> String {
    let tags: Vec<&str> = article.tags.iter().map(|t| t.as_str()).collect();
    format!(
        "{}. {}\n   [{}] {} · {}\n   {}\n   {}\n",
        index + 1,
        article.title,
        tags.join(", "),
        article.source,
        article.date,
        article.snippet,
        article.url
    )
}

fn render_articles(articles: &[&Article]) -> String {
    if articles.is_empty() {
        return "No articles found.\n".to_string();
    }
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| render_article(i, a))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_topics(topics: &[String]) -> String {
    topics.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join("  ") + "\n"
}

pub fn render_dashboard(
    news: &FeatureState<Vec<Article>>,
    topics: &FeatureState<Vec<String>>,
    limit: usize,
) -> String {
    let mut out = render_nav(Page::Dashboard);
    out.push_str("Trending topics\n");
    out.push_str(&topics.render(|t| render_topics(t)));
    out.push_str("\nLatest news\n");
    out.push_str(&news.render(|articles| {
        let top: Vec<&Article> = articles.iter().take(limit).collect();
        render_articles(&top)
    }));
    out
}

/// Filter bar, selected choice in parentheses.
pub fn render_filter_bar(selected: TagFilter) -> String {
    let choices: Vec<String> = TagFilter::choices()
        .into_iter()
        .map(|choice| {
            if choice == selected {
                format!("({})", choice)
            } else {
                choice.to_string()
            }
        })
        .collect();
    format!("Filter: {}\n", choices.join(" "))
}

pub fn render_news(filter: TagFilter, news: &FeatureState<Vec<Article>>) -> String {
    let mut out = render_nav(Page::News);
    out.push_str(&render_filter_bar(filter));
    out.push('\n');
    out.push_str(&news.render(|articles| render_articles(&filter.apply(articles))));
    out
}

/// The pending line names the article being summarized.
pub fn render_summary(article: &Article, summary: &FeatureState<String>) -> String {
    if let FeatureState::Loading = summary {
        return format!("Summarizing {}...\n", article.id);
    }
    let mut out = format!("{}\n", article.title);
    out.push_str(&summary.render(|s| format!("Summary: {}\n", s)));
    out
}

pub fn render_resources(catalog: &[ResourceCategory]) -> String {
    let mut out = render_nav(Page::Resources);
    for category in catalog {
        let _ = writeln!(out, "{}", category.name);
        for resource in category.resources {
            let _ = writeln!(
                out,
                "  - {} ({}) {}\n    {}",
                resource.title,
                resource.kind,
                resource.credit.label(),
                resource.url
            );
        }
        out.push('\n');
    }
    out
}

pub fn render_learning_path(goal: &str, path: &FeatureState<LearningPath>) -> String {
    if let FeatureState::Loading = path {
        return format!("Generating a learning path for \"{}\"...\n", goal.trim());
    }
    path.render(|p| format!("Learning path for \"{}\"\n\n{}\n", p.goal, p.markup.trim_end()))
}

pub fn render_question_list(questions: &[Question], selected: Option<&str>) -> String {
    if questions.is_empty() {
        return "No questions yet. Ask the first one!\n".to_string();
    }
    questions
        .iter()
        .map(|q| {
            let marker = if Some(q.id.as_str()) == selected { ">" } else { " " };
            let count = match q.answers.len() {
                1 => "1 answer".to_string(),
                n => format!("{} answers", n),
            };
            format!("{} {} ({}) [{}]\n", marker, q.text, count, q.id)
        })
        .collect()
}

pub fn render_question_detail(question: &Question) -> String {
    let mut out = format!("Q: {}\n", question.text);
    let answers = question.answers_chronological();
    if answers.is_empty() {
        let _ = writeln!(out, "  {}", NO_ANSWERS);
    }
    for answer in answers {
        let _ = writeln!(out, "  - {} ({})", answer.text, answer.created_at.format("%Y-%m-%d %H:%M"));
    }
    out
}

pub fn render_community(questions: &[Question], selected: Option<&Question>) -> String {
    let mut out = render_nav(Page::Community);
    out.push_str(&render_question_list(questions, selected.map(|q| q.id.as_str())));
    if let Some(question) = selected {
        out.push('\n');
        out.push_str(&render_question_detail(question));
    }
    out
}
