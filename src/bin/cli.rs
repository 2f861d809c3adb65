//! Weightlog CLI
//!
//! Command-line interface for weightlog operations against the local store:
//! - Log a weight for a date
//! - List the series / show the latest entry
//! - Remove entries
//! - Generate a default config file

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weightlog::config::{generate_default_config, Config};
use weightlog::storage::{UpsertOutcome, WeightStore};

#[derive(Parser)]
#[command(name = "weightlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Daily body-weight tracker")]
#[command(long_about = "Weightlog keeps one weight measurement per calendar date.\nLogging a date twice replaces that day's weight.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: from config / platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a weight for a date (replaces the day's value if already logged)
    Log {
        /// Weight value
        weight: f64,
        /// Date in YYYY-MM-DD form (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List all entries, ascending by date
    List,

    /// Show the most recent entry
    Latest,

    /// Remove a single entry by id
    Remove {
        /// Entry id
        id: i64,
    },

    /// Remove every entry
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write config to {:?}", path))?;
                println!("Wrote default config to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store = open_store(&cli)?;

    match cli.command {
        Commands::Log { weight, date } => {
            let date = match date {
                Some(d) => {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", d))?;
                    d
                }
                None => Local::now().format("%Y-%m-%d").to_string(),
            };

            match store.upsert(weight, &date)? {
                UpsertOutcome::Inserted(id) => {
                    println!("Recorded {:.1} for {} (entry {})", weight, date, id)
                }
                UpsertOutcome::Updated(id) => {
                    println!("Replaced weight for {} with {:.1} (entry {})", date, weight, id)
                }
            }
        }

        Commands::List => {
            let entries = store.list_all()?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries recorded");
            } else {
                println!("{:>6}  {:<12}  {:>8}", "id", "date", "weight");
                for entry in &entries {
                    println!("{:>6}  {:<12}  {:>8.1}", entry.id, entry.date, entry.weight);
                }
                println!("\n{} entries", entries.len());
            }
        }

        Commands::Latest => match store.latest()? {
            Some(entry) => {
                if cli.format == "json" {
                    println!("{}", serde_json::to_string_pretty(&entry)?);
                } else {
                    println!("{}: {:.1} (entry {})", entry.date, entry.weight, entry.id);
                }
            }
            None => println!("No entries recorded"),
        },

        Commands::Remove { id } => {
            if store.delete_by_id(id)? == 0 {
                bail!("No weight entry with id {}", id);
            }
            println!("Removed entry {}", id);
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear the series without --yes");
            }
            let deleted = store.delete_all()?;
            println!("Removed {} entries", deleted);
        }

        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn open_store(cli: &Cli) -> anyhow::Result<WeightStore> {
    let db_path = match &cli.data_dir {
        Some(dir) => dir.join("weights.db"),
        None => Config::load_default().storage.db_path(),
    };

    WeightStore::open(&db_path).with_context(|| format!("Failed to open store at {:?}", db_path))
}
