pub mod cli;
pub mod client;
pub mod tagging;

pub use cli::{handle_command, NewsArgs, NewsCommands};
pub use client::{NewsClient, NEWS_QUERY};
pub use tagging::derive_tags;

pub mod prelude {
    pub use super::client::NewsClient;
    pub use super::tagging::derive_tags;
    pub use hub_core::{Article, Error, Result, Tag, TagFilter};
}
