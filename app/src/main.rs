#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    AddInput, AddStrategy, AnalyzeInput, AnalyzeStrategy, CommandStrategy, DeleteStrategy,
    ExtractInput, ExtractStrategy, InfoStrategy, InitStrategy, ListStrategy, VersionStrategy,
};
use harbor_core::{Category, MatchMode};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "harbor")]
#[command(about = "Maritime keyword store and extractor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration and store status
    Info,
    /// Show version
    Version,
    /// List stored keywords, newest first
    List,
    /// Add a keyword manually
    Add {
        /// Term to store
        term: String,

        /// Category (vessel, port, cargo, documentation, safety, other)
        #[arg(short, long, default_value = "vessel")]
        category: Category,
    },
    /// Delete a keyword by id
    Delete {
        /// Keyword id
        id: i64,
    },
    /// Extract terms from text and store them
    Analyze {
        /// Text to analyze; read from stdin when omitted
        text: Option<String>,
    },
    /// Read {"text": ...} from stdin and print the extracted terms as JSON
    Extract {
        /// first or all
        #[arg(short, long, default_value = "all")]
        match_mode: MatchMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::List => ListStrategy.execute(()).await,
        Commands::Add { term, category } => {
            AddStrategy.execute(AddInput { term, category }).await
        }
        Commands::Delete { id } => DeleteStrategy.execute(id).await,
        Commands::Analyze { text } => AnalyzeStrategy.execute(AnalyzeInput { text }).await,
        Commands::Extract { match_mode } => {
            ExtractStrategy.execute(ExtractInput { match_mode }).await
        }
    }
}
