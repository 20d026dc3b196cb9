use std::io::Write;

use clap::{Args, Subcommand};
use hub_core::{Result, TagFilter};

use crate::client::NewsClient;
use crate::tagging::derive_tags;

#[derive(Args, Debug, Clone)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NewsCommands {
    /// Fetch normalized articles and print them as JSON
    Fetch {
        /// Only keep articles tagged with this category (All, AI, Robotics, Hardware, Ethics)
        #[arg(long, default_value = "All")]
        filter: String,
    },
    /// Show the tags a headline would receive
    Classify {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
}

pub async fn handle_command<W: Write>(args: NewsArgs, client: &NewsClient, out: &mut W) -> Result<()> {
    match args.command {
        NewsCommands::Fetch { filter } => {
            let filter: TagFilter = filter.parse()?;
            let articles = client.fetch_articles().await?;
            let selected = filter.apply(&articles);
            serde_json::to_writer_pretty(&mut *out, &selected)?;
            writeln!(out)?;
        }
        NewsCommands::Classify { title, description } => {
            let tags = derive_tags(&title, description.as_deref());
            let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
            writeln!(out, "{}", names.join(", "))?;
        }
    }
    Ok(())
}
