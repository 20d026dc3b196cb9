use std::sync::Arc;

use async_trait::async_trait;
use hub_core::{Error, QuestionStore, Result};

pub mod backends;
pub mod board;

pub use backends::*;
pub use board::{BoardState, RealtimeBoard};

/// A store backend that can be opened from a name and an optional location.
#[async_trait]
pub trait StorageBackend: QuestionStore + Sized {
    fn get_error_message() -> &'static str;

    async fn open(collection: &str, url: Option<&str>) -> Result<Self>;
}

#[cfg(feature = "sqlite")]
pub const AVAILABLE_STORES: &[&str] = &["memory", "sqlite"];

#[cfg(not(feature = "sqlite"))]
pub const AVAILABLE_STORES: &[&str] = &["memory"];

async fn open_backend<T: StorageBackend + 'static>(
    collection: &str,
    url: Option<&str>,
) -> Result<Arc<dyn QuestionStore>> {
    match T::open(collection, url).await {
        Ok(store) => {
            tracing::info!("🏦 Question store ready (using {})", store.name());
            Ok(Arc::new(store))
        }
        Err(e) => {
            tracing::error!("{}: {}", T::get_error_message(), e);
            Err(e)
        }
    }
}

/// Open the store named on the command line. Called once at startup; the
/// returned handle is shared for the life of the process.
pub async fn create_store(kind: &str, collection: &str, url: Option<&str>) -> Result<Arc<dyn QuestionStore>> {
    match kind.to_lowercase().as_str() {
        "memory" => open_backend::<MemoryStore>(collection, url).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => open_backend::<SqliteStore>(collection, url).await,
        other => Err(Error::InvalidInput(format!(
            "Unknown store '{}'. Available stores: {}",
            other,
            AVAILABLE_STORES.join(", ")
        ))),
    }
}

pub mod prelude {
    pub use super::board::{BoardState, RealtimeBoard};
    pub use super::{create_store, StorageBackend};
    pub use hub_core::{Answer, Question, QuestionStore, Result, Subscription};
}
