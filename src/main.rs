// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use category_ledger::{load_csv, render_text, seed_transactions, Session, Settings, Transaction};

#[derive(Debug, Parser)]
#[command(name = "category-ledger", version, about = "Transactions grouped by category and date")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load transactions from a CSV file instead of the built-in list
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive list (default)
    Tui,
    /// Print the grouped list as text
    Print {
        /// Collapse this category before printing (repeatable)
        #[arg(long = "collapse", value_name = "CATEGORY")]
        collapse: Vec<String>,
    },
    /// Print the grouped structure and expansion flags as JSON
    Json {
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_or_default(cli.config.as_deref())?;
    init_logging(&settings);

    let transactions = load_transactions(cli.csv.or_else(|| settings.transactions_csv.clone()))?;

    let mut session = Session::new(&transactions, settings.transition());
    session.collapse_initially(&settings.start_collapsed);

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(session)?,
        Command::Print { collapse } => {
            session.collapse_initially(&collapse);
            print!("{}", render_text(&session.rows()));
        }
        Command::Json { pretty } => {
            let snapshot = session.snapshot();
            let json = if pretty {
                serde_json::to_string_pretty(&snapshot)
            } else {
                serde_json::to_string(&snapshot)
            }
            .context("Failed to serialize snapshot")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the config file; logs go to stderr
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_transactions(csv: Option<PathBuf>) -> Result<Vec<Transaction>> {
    match csv {
        Some(path) => load_csv(&path)
            .with_context(|| format!("Failed to load transactions from {}", path.display())),
        None => {
            let transactions = seed_transactions();
            tracing::info!(count = transactions.len(), "using built-in transactions");
            Ok(transactions)
        }
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(session: Session) -> Result<()> {
    println!("🖥️  Loading transactions...\n");
    println!("✓ {} transactions in {} categories\n", session.total_transactions(), session.groups().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(session);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_session: Session) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: category-ledger print");
    std::process::exit(1);
}
