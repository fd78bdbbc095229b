//! MTG List Sorter CLI
//!
//! Opens (or creates) the local card database, optionally refreshes it from
//! the Scryfall bulk dataset, and processes a decklist file into the grouped
//! JSON report.

use clap::Parser;
use mtg_list_sorter::{process_list, CardStore, Ingestor};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Sorts MTG card lists into rarity/color groups using a local card database
#[derive(Parser, Debug)]
#[command(name = "mtg_list_sorter")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite card database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Refresh the card database from Scryfall if it is stale
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Override the bulk data manifest URL
    #[arg(long, default_value = mtg_list_sorter::scryfall::BULK_DATA_URL)]
    bulk_url: String,

    /// Decklist file to process (one card per line)
    list: Option<PathBuf>,
}

/// Default database path: ~/.local/share/mtg_list_sorter/cards.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mtg_list_sorter")
        .join("cards.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let store = match CardStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open card database: {}", e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(Mutex::new(store));

    if args.refresh {
        let ingestor = Ingestor::with_manifest_url(Arc::clone(&store), &args.bulk_url);
        match ingestor.refresh_if_stale().await {
            Ok(outcome) if outcome.refreshed => {
                log::info!("Refreshed card database: {} cards", outcome.card_count);
            }
            Ok(_) => log::info!("Card database is up to date"),
            Err(e) => {
                // A stale store is still usable; keep going with what we have
                log::error!("Refresh failed, using existing data: {}", e);
            }
        }
    }

    let Some(list_path) = args.list else {
        log::info!("No decklist given, nothing to do");
        return;
    };

    let raw_text = match std::fs::read_to_string(&list_path) {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to read {}: {}", list_path.display(), e);
            std::process::exit(1);
        }
    };

    let report = {
        let store = store.lock().unwrap();
        match process_list(&store, &raw_text) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Failed to process list: {}", e);
                std::process::exit(1);
            }
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
