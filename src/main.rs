//! AI Trading Journal backend
//!
//! Backend API for a trading journal with AI-generated coaching feedback.

use clap::{Parser, Subcommand};
use journal_coach::{
    coach::{CoachClient, CoachModel},
    config::Config,
    journal::Journal,
    server::{self, AppState},
    settings::ThemeStore,
    stats,
    storage::Database,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "journal-coach")]
#[command(about = "Backend API for an AI-coached trading journal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "journal.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print aggregate statistics for the stored trade history
    Stats,
    /// Re-run AI analysis for a single trade
    Analyze {
        /// Trade id to analyze
        trade_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => run_server(config, port).await,
        Commands::Stats => show_stats(config).await,
        Commands::Analyze { trade_id } => analyze_trade(config, trade_id).await,
    }
}

async fn run_server(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting trading journal API");

    let db = Database::connect(&config.database.path).await?;

    // Missing coach credentials are fatal at startup, never per-request
    let coach = Arc::new(CoachClient::from_config(&config.llm)?);
    tracing::info!("Coach model initialized: {}", coach.name());

    let journal = Journal::new(db, coach);
    let themes = ThemeStore::new(&config.settings.theme_path);
    let state = Arc::new(AppState { journal, themes });

    let port = port.unwrap_or(config.server.port);
    server::serve(state, &config.server.host, port).await?;

    Ok(())
}

async fn show_stats(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let trades = db.list_trades().await?;
    let summary = stats::compute(&trades);

    println!("\n📊 Trading Journal Statistics\n");

    if trades.is_empty() {
        println!("No trades recorded yet.");
        return Ok(());
    }

    let open = trades.len() - summary.total_trades;
    println!("Closed trades: {}", summary.total_trades);
    if open > 0 {
        println!("Open trades: {}", open);
    }
    println!(
        "Winners: {} | Losers: {} | Win rate: {:.1}%",
        summary.winners, summary.losers, summary.win_rate
    );
    println!("Total P&L: ${:.2}", summary.total_pnl);
    println!(
        "Average win: ${:.2} | Average loss: ${:.2}",
        summary.avg_win, summary.avg_loss
    );

    println!(
        "\n{:<20} {:>6} {:>8} {:>8} {:>12}",
        "Setup", "Wins", "Losses", "Win %", "P&L"
    );
    println!("{}", "-".repeat(58));

    for setup in &summary.setups {
        let label = if setup.label.len() > 17 {
            format!("{}...", &setup.label[..17])
        } else {
            setup.label.clone()
        };
        println!(
            "{:<20} {:>6} {:>8} {:>7.1}% ${:>11.2}",
            label,
            setup.wins,
            setup.losses,
            setup.win_rate(),
            setup.pnl
        );
    }

    if let Some(best) = &summary.best_setup {
        println!("\nBest setup:  {} (${:.2})", best.label, best.pnl);
    }
    if let Some(worst) = &summary.worst_setup {
        println!("Worst setup: {} (${:.2})", worst.label, worst.pnl);
    }

    Ok(())
}

async fn analyze_trade(config: Config, trade_id: Uuid) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let coach = Arc::new(CoachClient::from_config(&config.llm)?);
    let journal = Journal::new(db, coach);

    println!("\n🤖 Running coach analysis...\n");
    let analysis = journal.analyze(trade_id).await?;
    println!("{}", analysis);

    Ok(())
}
