//! SQLite reference store for card records
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! All writes are transactional; a refresh commits as a single transaction so
//! readers never observe a half-written dataset.
//!
//! `colors` and `types` are persisted as JSON arrays inside TEXT columns.
//! That encoding is private to this module; the `types LIKE '%"Land"%'`
//! ordering below depends on it.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

use crate::card_types::CardType;
use crate::error::Result;
use crate::models::{CardRecord, Layout, UpdateMeta, FACE_SEPARATOR};

/// Records upserted per prepared-statement batch during a refresh
pub const REFRESH_BATCH_SIZE: usize = 1000;

/// Reference data older than this triggers a refresh
const STALE_AFTER_DAYS: i64 = 7;

const CARD_COLUMNS: &str =
    "name, ascii_name, colors, type_line, types, rarity, mana_cost, has_foil, layout, last_updated";

/// Owns the SQLite connection holding the card reference data
///
/// The ingestion pipeline is the only writer; request processing reads
/// through `resolve`.
pub struct CardStore {
    conn: Connection,
}

impl CardStore {
    /// Open (or create) the store at `path` and initialize the schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cards (
                name TEXT PRIMARY KEY,
                ascii_name TEXT NOT NULL DEFAULT '',
                colors TEXT NOT NULL DEFAULT '[]',
                type_line TEXT NOT NULL DEFAULT '',
                types TEXT NOT NULL DEFAULT '[]',
                rarity TEXT NOT NULL DEFAULT '',
                mana_cost TEXT NOT NULL DEFAULT '',
                has_foil INTEGER NOT NULL DEFAULT 0,
                layout TEXT NOT NULL DEFAULT 'normal',
                last_updated TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cards_ascii_name ON cards(ascii_name);

            -- One row per bulk refresh, append-only
            CREATE TABLE IF NOT EXISTS updates (
                id INTEGER PRIMARY KEY,
                last_bulk_update TEXT NOT NULL,
                card_count INTEGER NOT NULL
            );
            ",
        )?;

        log::info!("Card store schema initialized");
        Ok(())
    }

    /// True when the store has never been refreshed or the latest refresh is
    /// older than the freshness threshold
    ///
    /// An unparseable stored timestamp also counts as stale; re-ingesting is
    /// the safe recovery.
    pub fn is_stale(&self) -> Result<bool> {
        match self.latest_update()? {
            None => Ok(true),
            Some(meta) => {
                let age = Utc::now() - meta.last_bulk_update;
                Ok(age > chrono::Duration::days(STALE_AFTER_DAYS))
            }
        }
    }

    /// Most recent refresh metadata, if any
    pub fn latest_update(&self) -> Result<Option<UpdateMeta>> {
        let row = self
            .conn
            .query_row(
                "SELECT last_bulk_update, card_count FROM updates ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let ts: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    Ok((ts, count))
                },
            )
            .optional()?;

        Ok(row.map(|(ts, count)| UpdateMeta {
            last_bulk_update: parse_timestamp(&ts),
            card_count: count.max(0) as usize,
        }))
    }

    /// Insert-or-replace a batch of records, keyed by name
    ///
    /// Idempotent; safe to call repeatedly with overlapping records (last
    /// write wins).
    pub fn upsert_batch(&mut self, records: &[CardRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let count = upsert_batch_tx(&tx, records)?;
        tx.commit()?;
        Ok(count)
    }

    /// Append a refresh metadata row
    pub fn record_update(&mut self, count: usize, timestamp: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO updates (last_bulk_update, card_count) VALUES (?1, ?2)",
            params![timestamp.to_rfc3339(), count as i64],
        )?;
        Ok(())
    }

    /// Commit one full refresh atomically
    ///
    /// Upserts all records in fixed-size batches and appends the update row
    /// inside a single transaction, so a failure anywhere rolls back the
    /// whole cycle and concurrent readers keep seeing the pre-refresh data.
    pub fn apply_refresh(
        &mut self,
        records: &[CardRecord],
        timestamp: DateTime<Utc>,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;

        let mut total = 0;
        for chunk in records.chunks(REFRESH_BATCH_SIZE) {
            total += upsert_batch_tx(&tx, chunk)?;
            log::debug!("Processed {} cards...", total);
        }

        tx.execute(
            "INSERT INTO updates (last_bulk_update, card_count) VALUES (?1, ?2)",
            params![timestamp.to_rfc3339(), total as i64],
        )?;
        tx.commit()?;

        log::info!("Committed refresh: {} cards", total);
        Ok(total)
    }

    /// Total number of stored cards
    pub fn card_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?)
    }

    /// Case-insensitive lookup against `name` or `ascii_name`
    ///
    /// Rows whose types lack Land order first, so front-face entries win over
    /// dual-typed merge artifacts when several rows match.
    pub fn find_by_name(&self, name: &str) -> Result<Option<CardRecord>> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM cards
             WHERE LOWER(name) = LOWER(?1) OR LOWER(ascii_name) = LOWER(?1)
             ORDER BY CASE WHEN types LIKE '%\"Land\"%' THEN 2 ELSE 1 END
             LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![name], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// Lookup of a double-faced card by its front face name
    ///
    /// Only meaningful when `find_by_name` missed and the query name has no
    /// face separator; same Land deprioritization as `find_by_name`.
    pub fn find_front_face_by_prefix(&self, name: &str) -> Result<Option<CardRecord>> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM cards
             WHERE name LIKE ?1 || ' //%' OR ascii_name LIKE ?1 || ' //%'
             ORDER BY CASE WHEN types LIKE '%\"Land\"%' THEN 2 ELSE 1 END
             LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![name], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// Case-insensitive lookup excluding double-faced names, used by the
    /// self-merge cleanup
    fn find_single_faced(&self, name: &str) -> Result<Option<CardRecord>> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM cards
             WHERE (LOWER(name) = LOWER(?1) OR LOWER(ascii_name) = LOWER(?1))
               AND name NOT LIKE '% // %'
             LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![name], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// Resolve an input name to a stored record
    ///
    /// Chain: exact match, then front-face prefix fallback for names without
    /// a face separator. A resolved record named "X // X" is a data-source
    /// artifact; when a plain "X" row exists it replaces the merged one.
    pub fn resolve(&self, name: &str) -> Result<Option<CardRecord>> {
        let mut record = self.find_by_name(name)?;

        if record.is_none() && !name.contains(FACE_SEPARATOR) {
            record = self.find_front_face_by_prefix(name)?;
        }

        let Some(record) = record else {
            return Ok(None);
        };

        if let Some((front, back)) = record.name.split_once(FACE_SEPARATOR) {
            if front == back {
                if let Some(cleaner) = self.find_single_faced(front)? {
                    log::debug!(
                        "Replaced self-merge '{}' with '{}'",
                        record.name,
                        cleaner.name
                    );
                    return Ok(Some(cleaner));
                }
            }
        }

        Ok(Some(record))
    }
}

fn upsert_batch_tx(tx: &Transaction<'_>, records: &[CardRecord]) -> Result<usize> {
    let mut stmt = tx.prepare_cached(
        "INSERT OR REPLACE INTO cards
         (name, ascii_name, colors, type_line, types, rarity, mana_cost, has_foil, layout, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;

    let mut count = 0;
    for record in records {
        stmt.execute(params![
            &record.name,
            &record.ascii_name,
            serde_json::to_string(&record.colors)?,
            &record.type_line,
            serde_json::to_string(&record.types)?,
            &record.rarity,
            &record.mana_cost,
            record.has_foil as i64,
            record.layout.as_str(),
            record.last_updated.to_rfc3339(),
        ])?;
        count += 1;
    }

    Ok(count)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    let colors_json: String = row.get(2)?;
    let types_json: String = row.get(4)?;
    let has_foil: i64 = row.get(7)?;
    let layout: String = row.get(8)?;
    let last_updated: String = row.get(9)?;

    Ok(CardRecord {
        name: row.get(0)?,
        ascii_name: row.get(1)?,
        // Malformed stored payloads degrade to empty collections
        colors: serde_json::from_str::<Vec<String>>(&colors_json).unwrap_or_default(),
        type_line: row.get(3)?,
        types: serde_json::from_str::<Vec<CardType>>(&types_json).unwrap_or_default(),
        rarity: row.get(5)?,
        mana_cost: row.get(6)?,
        has_foil: has_foil != 0,
        layout: Layout::parse(&layout),
        last_updated: parse_timestamp(&last_updated),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
