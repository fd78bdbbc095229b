//! Scryfall bulk data client
//!
//! Fetches the bulk data manifest, locates the default_cards dataset and
//! downloads it as a JSON array of raw card records. Uses async reqwest with
//! a bounded timeout so a hung download fails instead of blocking forever.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, SorterError};

/// Scryfall bulk data discovery endpoint
pub const BULK_DATA_URL: &str = "https://api.scryfall.com/bulk-data";

/// Dataset kind carrying every card object
pub const DEFAULT_CARDS_KIND: &str = "default_cards";

const USER_AGENT: &str = "mtg_list_sorter/1.0";

/// Whole-download timeout for the bulk card file (it is a few hundred MB)
const FETCH_TIMEOUT: Duration = Duration::from_secs(600);

/// One dataset descriptor from the bulk data manifest
#[derive(Debug, Deserialize)]
pub struct BulkDataEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub download_uri: String,
}

/// Bulk data manifest (list of dataset descriptors)
#[derive(Debug, Deserialize)]
pub struct BulkDataManifest {
    pub data: Vec<BulkDataEntry>,
}

impl BulkDataManifest {
    /// Find the download URL for the default_cards dataset
    pub fn default_cards_uri(&self) -> Option<&str> {
        self.data
            .iter()
            .find(|e| e.kind == DEFAULT_CARDS_KIND)
            .map(|e| e.download_uri.as_str())
    }
}

/// One face of a multi-faced raw card
#[derive(Debug, Clone, Deserialize)]
pub struct RawCardFace {
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_array")]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
}

/// Raw upstream card record
///
/// The upstream shape varies per layout; every field beyond `name` is
/// optional and defaults rather than failing the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_array")]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub card_faces: Option<Vec<RawCardFace>>,
    #[serde(default)]
    pub foil: bool,
    #[serde(default)]
    pub nonfoil: bool,
}

/// Decode a string array, mapping malformed payloads to `None` instead of
/// aborting the surrounding record batch
fn lenient_string_array<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()?)
}

/// Fetch the bulk data manifest
pub async fn fetch_manifest(manifest_url: &str) -> Result<BulkDataManifest> {
    log::info!("Fetching bulk data manifest from {}", manifest_url);

    let response = client()?.get(manifest_url).send().await?;
    if !response.status().is_success() {
        return Err(SorterError::HttpStatus(response.status()));
    }

    Ok(response.json::<BulkDataManifest>().await?)
}

/// Download the default_cards dataset listed in the manifest
pub async fn fetch_default_cards(manifest_url: &str) -> Result<Vec<RawCard>> {
    let manifest = fetch_manifest(manifest_url).await?;
    let download_uri = manifest
        .default_cards_uri()
        .ok_or(SorterError::BulkDataNotFound)?
        .to_string();

    log::info!("Downloading card data from {}", download_uri);

    let response = client()?.get(&download_uri).send().await?;
    if !response.status().is_success() {
        return Err(SorterError::HttpStatus(response.status()));
    }

    let cards: Vec<RawCard> = response.json().await?;
    log::info!("Downloaded {} raw card records", cards.len());
    Ok(cards)
}
