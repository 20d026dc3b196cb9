use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use hub_core::types::sort_newest_first;
use hub_core::{Answer, Error, Question, QuestionStore, Result, SnapshotFeed, SnapshotHandler, Subscription};

use crate::StorageBackend;

/// In-process realtime collection. Every write publishes a full snapshot.
pub struct MemoryStore {
    collection: String,
    questions: RwLock<Vec<Question>>,
    feed: SnapshotFeed,
}

impl MemoryStore {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            questions: RwLock::new(Vec::new()),
            feed: SnapshotFeed::new(Vec::new()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Live snapshot subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    fn ordered(questions: &[Question]) -> Vec<Question> {
        let mut snapshot = questions.to_vec();
        sort_newest_first(&mut snapshot);
        snapshot
    }
}

#[async_trait]
impl StorageBackend for MemoryStore {
    fn get_error_message() -> &'static str {
        "Memory store should always be available"
    }

    async fn open(collection: &str, _url: Option<&str>) -> Result<Self> {
        Ok(Self::new(collection))
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_question(&self, text: &str) -> Result<Question> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("question text must not be empty".to_string()));
        }
        let question = Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            answers: Vec::new(),
            created_at: Utc::now(),
        };

        let mut questions = self.questions.write().await;
        questions.push(question.clone());
        self.feed.publish(Self::ordered(&questions));
        tracing::debug!(collection = %self.collection, id = %question.id, "question created");
        Ok(question)
    }

    async fn append_answer(&self, question_id: &str, answer: &Answer) -> Result<()> {
        if answer.text.trim().is_empty() {
            return Err(Error::InvalidInput("answer text must not be empty".to_string()));
        }

        let mut questions = self.questions.write().await;
        let question = questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| Error::Store(format!("Question {} not found in {}", question_id, self.collection)))?;
        question.union_answer(answer.clone());
        self.feed.publish(Self::ordered(&questions));
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(Self::ordered(&questions))
    }

    fn subscribe(&self, handler: SnapshotHandler) -> Result<Subscription> {
        Ok(self.feed.subscribe(handler))
    }
}
