//! Type tag extraction from raw type lines

use serde::{Deserialize, Serialize};

use crate::models::FACE_SEPARATOR;

/// Subtype separator on printed type lines ("Creature — Elf Warrior")
const SUBTYPE_SEPARATOR: &str = " — ";

/// Normalized card type tag
///
/// Variant names are the exact strings matched on type lines and persisted
/// in the store, so serde needs no renames here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Instant,
    Sorcery,
    Planeswalker,
    Battle,
    Token,
    Emblem,
    Scheme,
    Conspiracy,
    Phenomenon,
    Vanguard,
    Hero,
}

/// Fixed scan order; extraction output preserves this order
pub const TYPE_VOCABULARY: [CardType; 15] = [
    CardType::Land,
    CardType::Creature,
    CardType::Artifact,
    CardType::Enchantment,
    CardType::Instant,
    CardType::Sorcery,
    CardType::Planeswalker,
    CardType::Battle,
    CardType::Token,
    CardType::Emblem,
    CardType::Scheme,
    CardType::Conspiracy,
    CardType::Phenomenon,
    CardType::Vanguard,
    CardType::Hero,
];

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Land => "Land",
            CardType::Creature => "Creature",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Planeswalker => "Planeswalker",
            CardType::Battle => "Battle",
            CardType::Token => "Token",
            CardType::Emblem => "Emblem",
            CardType::Scheme => "Scheme",
            CardType::Conspiracy => "Conspiracy",
            CardType::Phenomenon => "Phenomenon",
            CardType::Vanguard => "Vanguard",
            CardType::Hero => "Hero",
        }
    }
}

/// Extract normalized type tags from a raw type line
///
/// Only the front face counts: text after a face separator is dropped, as is
/// everything from the subtype separator onward. Empty input yields an empty
/// vec.
pub fn extract_types(type_line: &str) -> Vec<CardType> {
    if type_line.is_empty() {
        return Vec::new();
    }

    let front = type_line
        .split(FACE_SEPARATOR)
        .next()
        .unwrap_or(type_line);
    let type_part = front.split(SUBTYPE_SEPARATOR).next().unwrap_or(front);

    TYPE_VOCABULARY
        .iter()
        .copied()
        .filter(|t| type_part.contains(t.as_str()))
        .collect()
}
