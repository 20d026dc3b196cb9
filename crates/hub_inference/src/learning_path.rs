use std::sync::Arc;

use serde::Serialize;

use hub_core::resources::ResourceCategory;
use hub_core::{CompletionModel, Error, Result};

use crate::markup::render_html;
use crate::prompts::learning_path_prompt;

/// A generated course module, kept both as model markup and rendered HTML.
#[derive(Debug, Clone, Serialize)]
pub struct LearningPath {
    pub goal: String,
    pub markup: String,
    pub html: String,
}

pub struct LearningPathGenerator {
    model: Arc<dyn CompletionModel>,
    catalog: &'static [ResourceCategory],
}

impl LearningPathGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            catalog: hub_core::resources::catalog(),
        }
    }

    pub async fn generate(&self, goal: &str) -> Result<LearningPath> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(Error::InvalidInput("learning goal must not be empty".to_string()));
        }

        tracing::info!("🎓 Generating learning path for goal: {}", goal);
        let markup = self
            .model
            .complete(&learning_path_prompt(goal, self.catalog), None)
            .await?;

        Ok(LearningPath {
            goal: goal.to_string(),
            html: render_html(&markup),
            markup,
        })
    }
}
