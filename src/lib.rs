//! MTG List Sorter - card list resolution and classification
//!
//! Resolves free-text card list entries against a local SQLite reference
//! database built from Scryfall bulk data, and groups every resolved card
//! into a rarity/color bucket for display.
//!
//! Two independent halves:
//! - the ingestion pipeline ([`ingest::Ingestor`]) keeps the reference store
//!   current from the default_cards bulk dataset;
//! - [`report::process_list`] parses a pasted list, resolves each entry
//!   against the store and returns the aggregated, grouped result.

pub mod card_types;
pub mod classify;
pub mod database;
pub mod error;
pub mod ingest;
pub mod list_parser;
pub mod models;
pub mod normalize;
pub mod report;
pub mod scryfall;

pub use classify::{classify, ClassifiedEntry, ColorGroup, RarityGroup};
pub use database::CardStore;
pub use error::{Result, SorterError};
pub use ingest::{Ingestor, RefreshOutcome};
pub use models::{CardRecord, CardRequest, Layout, UpdateMeta};
pub use report::{process_list, ListReport};
