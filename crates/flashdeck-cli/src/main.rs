use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Log filter, e.g. `FLASHDECK_LOG=flashdeck_core=debug`.
const LOG_ENV: &str = "FLASHDECK_LOG";

#[derive(Parser)]
#[command(name = "flashdeck", version, about = "Flashdeck CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deck management
    Deck {
        #[command(subcommand)]
        action: commands::deck::DeckAction,
    },
    /// Card management
    Card {
        #[command(subcommand)]
        action: commands::card::CardAction,
    },
    /// Generate cards for a deck with AI (pro)
    Generate {
        /// Deck ID
        deck_id: i64,
        /// Number of cards to generate (1-20, default from config)
        #[arg(long)]
        count: Option<u32>,
    },
    /// Study session control
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
    /// Sign in, guest mode and AI credentials
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Show plan, deck usage and which actions are allowed
    Plan,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Deck { action } => commands::deck::run(action),
        Commands::Card { action } => commands::card::run(action),
        Commands::Generate { deck_id, count } => commands::generate::run(deck_id, count),
        Commands::Study { action } => commands::study::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Plan => commands::plan::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
