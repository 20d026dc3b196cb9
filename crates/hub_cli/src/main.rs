use std::io::Write;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use hub_core::logging::{init_logging, Logger};
use hub_core::{Article, CompletionModel, Error, HubConfig, QuestionStore, Result, TagFilter};
use hub_inference::{create_model, LearningPathGenerator, Summarizer, TopicExtractor};
use hub_news::{handle_command, NewsArgs, NewsClient};
use hub_storage::{create_store, BoardState, RealtimeBoard};
use hub_web::handlers::DASHBOARD_ARTICLES;
use hub_web::AppState;

mod views;

use views::{FeatureState, Page};

/// Board commands need a store that outlives the process.
#[cfg(feature = "sqlite")]
const DEFAULT_STORE: &str = "sqlite";
#[cfg(not(feature = "sqlite"))]
const DEFAULT_STORE: &str = "memory";

#[derive(Parser, Debug)]
#[command(author, version, about = "AI & Robotics learning hub", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "gemini", help = "Model to use for inference. Available models: gemini (default), dummy")]
    model: String,
    #[arg(long, default_value = DEFAULT_STORE, help = "Question store backend: sqlite (default when built in) or memory")]
    store: String,
    /// Store location, overrides HUB_STORE_URL
    #[arg(long)]
    store_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Top headlines and trending topics
    Dashboard,
    /// Tagged news, optionally filtered by category
    News {
        #[arg(long, default_value = "All")]
        filter: String,
    },
    /// One-sentence summary of the n-th headline (1-based)
    Summarize { index: usize },
    /// The curated resource catalog
    Resources,
    /// Generate a learning path for a goal
    Path { goal: String },
    /// Community questions and answers
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Raw news client commands
    Feed(NewsArgs),
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[derive(clap::Subcommand, Debug)]
enum BoardCommands {
    Ask { text: String },
    Answer { question_id: String, text: String },
    Show {
        /// Question to show in detail
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the board on every change until interrupted
    Watch {
        #[arg(long)]
        id: Option<String>,
    },
}

async fn load_news(news: &NewsClient, logger: &Logger) -> FeatureState<Vec<Article>> {
    match news.fetch_articles().await {
        Ok(articles) => FeatureState::Ready(articles),
        Err(e) => {
            logger.error(&format!("Failed to load news: {}", e));
            FeatureState::Failed(e.to_string())
        }
    }
}

async fn run_board(command: BoardCommands, store: Arc<dyn QuestionStore>, logger: &Logger) -> Result<()> {
    let logger = logger.clone().with_prefix("💬 board");
    match command {
        BoardCommands::Ask { text } => {
            let board = RealtimeBoard::new(store);
            let question = board.post_question(&text).await?;
            logger.info(&format!("Question posted: {}", question.id));
            println!("{}", question.id);
        }
        BoardCommands::Answer { question_id, text } => {
            let board = RealtimeBoard::new(store);
            let answer = board.post_answer(&question_id, &text).await?;
            logger.info(&format!("Answer posted to {}", question_id));
            println!("{}", answer.text);
        }
        BoardCommands::Show { id } => {
            let questions = store.snapshot().await?;
            let selected = id.as_deref().and_then(|id| questions.iter().find(|q| q.id == id));
            if let (Some(id), None) = (&id, selected) {
                logger.warn(&format!("Question {} not found", id));
            }
            print!("{}", views::render_community(&questions, selected));
        }
        BoardCommands::Watch { id } => {
            let board = RealtimeBoard::new(store);
            board.select(id.as_deref());

            let (tx, mut rx) = watch::channel::<Option<BoardState>>(None);
            board.open_with(Some(Arc::new(move |state: &BoardState| {
                tx.send_replace(Some(state.clone()));
            })))?;
            logger.info("Watching for changes, press Ctrl-C to stop");

            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Renders only the newest state when output falls behind.
                        let latest = rx.borrow_and_update().clone();
                        if let Some(state) = latest {
                            print!("{}", views::render_community(&state.questions, state.selected_question()));
                            println!();
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            board.close();
        }
    }
    Ok(())
}

fn show_pending(line: &str) {
    print!("{}", line);
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let logger = init_logging("info");
    let cli = Cli::parse();

    exit_status(run(cli, &logger).await)
}

fn exit_status(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

fn error_line(e: &Error) -> String {
    format!("Error: {}", e)
}

async fn run(cli: Cli, logger: &Logger) -> Result<()> {
    let config = HubConfig::from_env();

    let model: Arc<dyn CompletionModel> = create_model(&cli.model, &config)?;
    info!("🧠 Inference model initialized successfully (using {})", model.name());
    let news = NewsClient::from_config(&config);

    match cli.command {
        Commands::Dashboard => {
            show_pending(&views::render_loading(Page::Dashboard));
            let news_state = load_news(&news, &logger.clone().with_prefix("📰 news")).await;
            let articles: &[Article] = match &news_state {
                FeatureState::Ready(articles) => articles.as_slice(),
                _ => &[],
            };
            let topics = TopicExtractor::new(model.clone()).extract_topics(articles).await;
            print!(
                "{}",
                views::render_dashboard(&news_state, &FeatureState::Ready(topics), DASHBOARD_ARTICLES)
            );
        }
        Commands::News { filter } => {
            let filter: TagFilter = filter.parse()?;
            let news_state = load_news(&news, &logger.clone().with_prefix("📰 news")).await;
            print!("{}", views::render_news(filter, &news_state));
        }
        Commands::Summarize { index } => {
            let articles = news.fetch_articles().await?;
            let article = index
                .checked_sub(1)
                .and_then(|i| articles.get(i))
                .ok_or_else(|| {
                    Error::InvalidInput(format!("No article #{} ({} available)", index, articles.len()))
                })?;
            show_pending(&views::render_summary(article, &FeatureState::Loading));
            let summary: FeatureState<String> = Summarizer::new(model.clone()).summarize(article).await.into();
            print!("{}", views::render_summary(article, &summary));
        }
        Commands::Resources => {
            print!("{}", views::render_resources(hub_core::resources::catalog()));
        }
        Commands::Path { goal } => {
            show_pending(&views::render_learning_path(&goal, &FeatureState::Loading));
            let path = LearningPathGenerator::new(model.clone()).generate(&goal).await;
            if let Err(e) = &path {
                logger.clone().with_prefix("🎓 path").error(&format!("Failed to generate learning path: {}", e));
            }
            let path: FeatureState<_> = path.into();
            print!("{}", views::render_learning_path(&goal, &path));
        }
        Commands::Board { command } => {
            let store_url = cli.store_url.as_deref().or(config.store_url.as_deref());
            let store = create_store(&cli.store, &config.store_project, store_url).await?;
            run_board(command, store, logger).await?;
        }
        Commands::Feed(args) => {
            let mut out = std::io::stdout();
            handle_command(args, &news, &mut out).await?;
        }
        Commands::Serve { addr } => {
            let store_url = cli.store_url.as_deref().or(config.store_url.as_deref());
            let store = create_store(&cli.store, &config.store_project, store_url).await?;
            hub_web::serve(AppState::new(model, news, store), addr).await?;
        }
    }

    Ok(())
}
