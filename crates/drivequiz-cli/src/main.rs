//! drivequiz CLI: driving-law exam practice in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::preference::Switch;

#[derive(Parser)]
#[command(name = "drivequiz", version, about = "Driving-law practice exams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an interactive practice exam
    Take {
        /// Question bank JSON file (defaults to the bundled bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// History storage file
        #[arg(long)]
        storage: Option<PathBuf>,

        /// Seed for reproducible batches
        #[arg(long)]
        seed: Option<u64>,

        /// Start with questions you have not yet answered correctly
        #[arg(long)]
        skip_known: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank file
    Validate {
        /// Question bank JSON file (defaults to the bundled bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate new questions with a language model
    Generate {
        /// Provider name from the config (defaults to `default_provider`)
        #[arg(long)]
        provider: Option<String>,

        /// Model to request
        #[arg(long)]
        model: Option<String>,

        /// Where to write the generated bank
        #[arg(long, default_value = "generated-questions.json")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show or clear the answer history
    History {
        /// History storage file
        #[arg(long)]
        storage: Option<PathBuf>,

        /// Question bank used for the coverage figure
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Forget every recorded answer
        #[arg(long)]
        clear: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show or set whether retries include previously-correct questions
    Preference {
        /// New value; omit to show the current one
        value: Option<Switch>,

        /// History storage file
        #[arg(long)]
        storage: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,drivequiz_providers=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            storage,
            seed,
            skip_known,
            config,
        } => commands::take::execute(bank, storage, seed, skip_known, config),
        Commands::Validate { bank, config } => commands::validate::execute(bank, config),
        Commands::Generate {
            provider,
            model,
            output,
            config,
        } => commands::generate::execute(provider, model, output, config).await,
        Commands::History {
            storage,
            bank,
            clear,
            config,
        } => commands::history::execute(storage, bank, clear, config),
        Commands::Preference {
            value,
            storage,
            config,
        } => commands::preference::execute(value, storage, config),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
