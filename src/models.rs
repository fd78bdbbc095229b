//! Shared data types for the card store and list processing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card_types::CardType;

/// Delimiter joining the two face names/type lines of a multi-faced card
pub const FACE_SEPARATOR: &str = " // ";

/// Card layout as reported by the bulk dataset
///
/// Only the layouts that need face-aware normalization are distinguished;
/// everything else collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Normal,
    Transform,
    ModalDfc,
    ReversibleCard,
    Adventure,
    Other,
}

impl Layout {
    pub fn parse(s: &str) -> Self {
        match s {
            "normal" => Layout::Normal,
            "transform" => Layout::Transform,
            "modal_dfc" => Layout::ModalDfc,
            "reversible_card" => Layout::ReversibleCard,
            "adventure" => Layout::Adventure,
            _ => Layout::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Normal => "normal",
            Layout::Transform => "transform",
            Layout::ModalDfc => "modal_dfc",
            Layout::ReversibleCard => "reversible_card",
            Layout::Adventure => "adventure",
            Layout::Other => "other",
        }
    }

    /// Layouts where the front face overrides type line, colors and mana cost
    pub fn uses_front_face(&self) -> bool {
        matches!(
            self,
            Layout::Transform | Layout::ModalDfc | Layout::ReversibleCard
        )
    }
}

/// Canonical reference entry for one named card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Primary identity, unique in the store
    pub name: String,
    /// Alternate lookup key, empty when upstream has none
    pub ascii_name: String,
    /// Single-letter color codes (W/U/B/R/G), sorted and deduped
    pub colors: Vec<String>,
    /// Raw type text, may contain a face separator
    pub type_line: String,
    /// Normalized type tags in vocabulary order
    pub types: Vec<CardType>,
    /// common/uncommon/rare/mythic, persisted verbatim
    pub rarity: String,
    /// Raw mana symbol text, may be empty
    pub mana_cost: String,
    pub has_foil: bool,
    pub layout: Layout,
    pub last_updated: DateTime<Utc>,
}

impl CardRecord {
    /// Whether the stored name joins two faces
    pub fn is_double_faced(&self) -> bool {
        self.name.contains(FACE_SEPARATOR)
    }
}

/// One refresh of the bulk dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMeta {
    pub last_bulk_update: DateTime<Utc>,
    pub card_count: usize,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequest {
    pub name: String,
    pub quantity: u32,
    pub foil: bool,
}
