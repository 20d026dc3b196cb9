pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod resources;
pub mod storage;
pub mod types;

pub use config::HubConfig;
pub use error::{Error, ErrorKind, GatewayError};
pub use models::{CompletionModel, ResponseSchema};
pub use storage::{QuestionStore, SnapshotFeed, SnapshotHandler, Subscription};
pub use types::{Answer, Article, Question, Tag, TagFilter};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{
        Answer, Article, CompletionModel, Error, HubConfig, Question, QuestionStore, Result,
        Tag, TagFilter,
    };
}
