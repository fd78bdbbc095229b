//! Bulk data ingestion pipeline
//!
//! Keeps the card store current: check staleness, download the default_cards
//! dataset, normalize every record and commit the batch atomically. A failed
//! cycle leaves the previous (possibly stale) store fully usable.

use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::database::CardStore;
use crate::error::{Result, SorterError};
use crate::models::CardRecord;
use crate::normalize::normalize_card;
use crate::scryfall::{fetch_default_cards, BULK_DATA_URL};

/// Result of one refresh cycle
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    /// False when the store was already fresh
    pub refreshed: bool,
    /// Cards committed by this cycle
    pub card_count: usize,
}

/// Drives bulk data refreshes against a shared card store
///
/// At most one refresh runs at a time; readers keep the pre-refresh data
/// until the new batch commits.
pub struct Ingestor {
    store: Arc<Mutex<CardStore>>,
    manifest_url: String,
    guard: tokio::sync::Mutex<()>,
}

impl Ingestor {
    pub fn new(store: Arc<Mutex<CardStore>>) -> Self {
        Self::with_manifest_url(store, BULK_DATA_URL)
    }

    /// Override the manifest endpoint (tests point this at a mock server)
    pub fn with_manifest_url(store: Arc<Mutex<CardStore>>, manifest_url: impl Into<String>) -> Self {
        Self {
            store,
            manifest_url: manifest_url.into(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Refresh the store if its data is older than the freshness threshold
    ///
    /// No-op (`refreshed: false`) when fresh. Fails with `RefreshInProgress`
    /// when another refresh holds the guard, and with the underlying error on
    /// any fetch/decode/database failure; in both cases the store keeps its
    /// previous contents.
    pub async fn refresh_if_stale(&self) -> Result<RefreshOutcome> {
        let _running = self
            .guard
            .try_lock()
            .map_err(|_| SorterError::RefreshInProgress)?;

        let stale = self.store.lock().unwrap().is_stale()?;
        if !stale {
            log::info!("Card data is up to date, skipping download");
            return Ok(RefreshOutcome {
                refreshed: false,
                card_count: 0,
            });
        }

        log::info!("Card data is stale, downloading bulk dataset...");
        let raw_cards = fetch_default_cards(&self.manifest_url).await?;

        let now = Utc::now();
        let records: Vec<CardRecord> = raw_cards
            .iter()
            .map(|raw| normalize_card(raw, now))
            .collect();
        // Raw payload is no longer needed once normalized
        drop(raw_cards);

        let card_count = self.store.lock().unwrap().apply_refresh(&records, now)?;

        log::info!("Refresh complete: {} cards", card_count);
        Ok(RefreshOutcome {
            refreshed: true,
            card_count,
        })
    }
}
