use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hub_core::{Answer, Error, Question, QuestionStore, Result, Subscription};

/// Local, materialized view of the question collection.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub questions: Vec<Question>,
    pub selected: Option<String>,
    pub active: bool,
    pub error: Option<String>,
    pub snapshots: u64,
}

impl BoardState {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.selected.as_deref().and_then(|id| self.question(id))
    }
}

pub type ChangeListener = Arc<dyn Fn(&BoardState) + Send + Sync>;

/// Community Q&A board. Snapshots from the store replace local state
/// wholesale; answers posted here are mirrored locally until the next
/// snapshot overwrites them.
pub struct RealtimeBoard {
    store: Arc<dyn QuestionStore>,
    state: Arc<RwLock<BoardState>>,
    subscription: Mutex<Option<Subscription>>,
}

fn read(state: &RwLock<BoardState>) -> RwLockReadGuard<'_, BoardState> {
    state.read().unwrap_or_else(|e| e.into_inner())
}

fn write(state: &RwLock<BoardState>) -> RwLockWriteGuard<'_, BoardState> {
    state.write().unwrap_or_else(|e| e.into_inner())
}

impl RealtimeBoard {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(BoardState::default())),
            subscription: Mutex::new(None),
        }
    }

    pub fn state(&self) -> BoardState {
        read(&self.state).clone()
    }

    pub fn questions(&self) -> Vec<Question> {
        read(&self.state).questions.clone()
    }

    pub fn is_active(&self) -> bool {
        read(&self.state).active
    }

    /// Start following the collection. Safe to call when already open.
    pub fn open(&self) -> Result<()> {
        self.open_with(None)
    }

    pub fn open_with(&self, listener: Option<ChangeListener>) -> Result<()> {
        let mut slot = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Ok(());
        }

        let state = self.state.clone();
        let handler = Box::new(move |snapshot: Vec<Question>| {
            let mut current = write(&state);
            current.questions = snapshot;
            current.snapshots += 1;
            if let Some(listener) = &listener {
                listener(&current);
            }
        });

        match self.store.subscribe(handler) {
            Ok(subscription) => {
                let mut current = write(&self.state);
                current.active = true;
                current.error = None;
                *slot = Some(subscription);
                tracing::info!("💬 Subscribed to questions (using {})", self.store.name());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to subscribe to questions: {}", e);
                let mut current = write(&self.state);
                current.active = false;
                current.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Stop following the collection. Local state is kept as last seen.
    pub fn close(&self) {
        let subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(subscription) = subscription {
            subscription.cancel();
            tracing::debug!("question subscription cancelled");
        }
        write(&self.state).active = false;
    }

    pub fn select(&self, question_id: Option<&str>) {
        write(&self.state).selected = question_id.map(str::to_string);
    }

    pub async fn post_question(&self, text: &str) -> Result<Question> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("question text must not be empty".to_string()));
        }
        self.store.create_question(text).await.map_err(|e| {
            tracing::error!("Failed to post question: {}", e);
            e
        })
    }

    /// Append an answer in the store, then mirror it into local state.
    pub async fn post_answer(&self, question_id: &str, text: &str) -> Result<Answer> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("answer text must not be empty".to_string()));
        }

        let answer = Answer::new(text);
        if let Err(e) = self.store.append_answer(question_id, &answer).await {
            tracing::error!("Failed to post answer to {}: {}", question_id, e);
            return Err(e);
        }

        let mut current = write(&self.state);
        if let Some(question) = current.questions.iter_mut().find(|q| q.id == question_id) {
            question.union_answer(answer.clone());
        }
        Ok(answer)
    }
}

impl Drop for RealtimeBoard {
    fn drop(&mut self) {
        self.close();
    }
}
