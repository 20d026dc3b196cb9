use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::{Answer, Question};
use crate::Result;

/// Receives the full, ordered question collection on every change.
pub type SnapshotHandler = Box<dyn Fn(Vec<Question>) + Send + Sync + 'static>;

#[async_trait]
pub trait QuestionStore: Send + Sync {
    fn name(&self) -> &str;

    /// Create a question with no answers. The store assigns id and timestamp.
    async fn create_question(&self, text: &str) -> Result<Question>;

    /// Atomically union one answer into the question's answer array.
    async fn append_answer(&self, question_id: &str, answer: &Answer) -> Result<()>;

    /// The collection ordered newest first.
    async fn snapshot(&self) -> Result<Vec<Question>>;

    /// Push every snapshot to `handler`, starting with the current one.
    fn subscribe(&self, handler: SnapshotHandler) -> Result<Subscription>;
}

/// Fan-out of collection snapshots shared by the store backends.
#[derive(Debug)]
pub struct SnapshotFeed {
    sender: watch::Sender<Vec<Question>>,
}

impl SnapshotFeed {
    pub fn new(initial: Vec<Question>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn publish(&self, snapshot: Vec<Question>) {
        self.sender.send_replace(snapshot);
    }

    pub fn current(&self) -> Vec<Question> {
        self.sender.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn subscribe(&self, handler: SnapshotHandler) -> Subscription {
        Subscription::spawn(self.sender.subscribe(), handler)
    }
}

/// Live subscription. `cancel` consumes the handle; dropping it cancels too.
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    fn spawn(mut receiver: watch::Receiver<Vec<Question>>, handler: SnapshotHandler) -> Self {
        let task = tokio::spawn(async move {
            loop {
                let snapshot = receiver.borrow_and_update().clone();
                handler(snapshot);
                if receiver.changed().await.is_err() {
                    tracing::debug!("snapshot feed closed");
                    break;
                }
            }
        });
        Self { task: Some(task) }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
