//! Rarity and color classification of resolved cards
//!
//! The color policy is an ordered rule list evaluated top-down with early
//! exit, so the tie-break order stays auditable. Double-faced cards classify
//! by their front face throughout.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::card_types::CardType;
use crate::models::{CardRecord, CardRequest, FACE_SEPARATOR};

/// Rarity display bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RarityGroup {
    #[serde(rename = "Mythic/Rare")]
    MythicRare,
    #[serde(rename = "Common/Uncommon")]
    CommonUncommon,
}

/// Fixed display order of rarity buckets
pub const RARITY_GROUP_ORDER: [RarityGroup; 2] = [RarityGroup::MythicRare, RarityGroup::CommonUncommon];

impl RarityGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RarityGroup::MythicRare => "Mythic/Rare",
            RarityGroup::CommonUncommon => "Common/Uncommon",
        }
    }
}

/// Color display bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorGroup {
    White,
    Blue,
    Black,
    Red,
    Green,
    Multicolor,
    Colorless,
    Artifact,
    Land,
    #[serde(rename = "Special Cards")]
    SpecialCards,
    Unknown,
}

/// Fixed display order of color buckets
pub const COLOR_GROUP_ORDER: [ColorGroup; 11] = [
    ColorGroup::White,
    ColorGroup::Blue,
    ColorGroup::Black,
    ColorGroup::Red,
    ColorGroup::Green,
    ColorGroup::Multicolor,
    ColorGroup::Colorless,
    ColorGroup::Artifact,
    ColorGroup::Land,
    ColorGroup::SpecialCards,
    ColorGroup::Unknown,
];

impl ColorGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorGroup::White => "White",
            ColorGroup::Blue => "Blue",
            ColorGroup::Black => "Black",
            ColorGroup::Red => "Red",
            ColorGroup::Green => "Green",
            ColorGroup::Multicolor => "Multicolor",
            ColorGroup::Colorless => "Colorless",
            ColorGroup::Artifact => "Artifact",
            ColorGroup::Land => "Land",
            ColorGroup::SpecialCards => "Special Cards",
            ColorGroup::Unknown => "Unknown",
        }
    }
}

/// One classified output entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedEntry {
    /// Display name, possibly suffixed with a foil marker
    pub name: String,
    pub type_line: String,
    pub mana_cost: String,
    pub color_group: ColorGroup,
    pub rarity_group: RarityGroup,
    pub foil: bool,
    pub quantity: u32,
    /// Case-folded record name; drives bucket ordering, never serialized
    #[serde(skip)]
    pub sort_key: String,
}

/// Mana symbol letters that contribute to the effective color set
const MANA_COLORS: [(&str, ColorGroup); 5] = [
    ("W", ColorGroup::White),
    ("U", ColorGroup::Blue),
    ("B", ColorGroup::Black),
    ("R", ColorGroup::Red),
    ("G", ColorGroup::Green),
];

/// Type keywords that mark non-playable special cards
const SPECIAL_TYPES: [&str; 7] = [
    "Token",
    "Emblem",
    "Scheme",
    "Conspiracy",
    "Phenomenon",
    "Vanguard",
    "Hero",
];

/// Type keywords that mark regular playable cards
const REGULAR_TYPES: [&str; 8] = [
    "Creature",
    "Planeswalker",
    "Instant",
    "Sorcery",
    "Enchantment",
    "Artifact",
    "Land",
    "Battle",
];

/// Classify one resolved card for the requesting list entry
///
/// Pure function: the same record and request always produce the same entry.
pub fn classify(record: &CardRecord, request: &CardRequest) -> ClassifiedEntry {
    ClassifiedEntry {
        name: display_name(record, request),
        type_line: record.type_line.clone(),
        mana_cost: record.mana_cost.clone(),
        color_group: color_group(record),
        rarity_group: rarity_group(&record.rarity),
        foil: request.foil,
        quantity: request.quantity,
        sort_key: record.name.to_lowercase(),
    }
}

/// mythic and rare share a bucket; everything else (unknown included) is
/// common/uncommon
pub fn rarity_group(rarity: &str) -> RarityGroup {
    match rarity.to_ascii_lowercase().as_str() {
        "mythic" | "rare" => RarityGroup::MythicRare,
        _ => RarityGroup::CommonUncommon,
    }
}

/// Ordered color bucket policy, first matching rule wins
pub fn color_group(record: &CardRecord) -> ColorGroup {
    // Effective colors: color identity plus plain mana symbols. Hybrid
    // symbols like {W/U} deliberately contribute nothing.
    let mut effective_colors: BTreeSet<&str> =
        record.colors.iter().map(String::as_str).collect();
    for (letter, _) in MANA_COLORS {
        if record.mana_cost.contains(&format!("{{{}}}", letter)) {
            effective_colors.insert(letter);
        }
    }

    let double_faced = record.is_double_faced();
    let effective_type_line = if double_faced {
        record
            .type_line
            .split(FACE_SEPARATOR)
            .next()
            .unwrap_or("")
    } else {
        record.type_line.as_str()
    };
    let front_face_type = effective_type_line
        .split(FACE_SEPARATOR)
        .next()
        .unwrap_or(effective_type_line);

    // Lands without any color. A double-faced card whose front is not a land
    // keeps falling through and classifies by its front face instead.
    if record.types.contains(&CardType::Land) && effective_colors.is_empty() {
        if !double_faced || front_face_type.contains("Land") {
            return ColorGroup::Land;
        }
    }

    // Tokens, emblems and friends, unless the line also names a regular type
    let is_special = SPECIAL_TYPES
        .iter()
        .any(|t| effective_type_line.contains(t));
    let is_regular = REGULAR_TYPES
        .iter()
        .any(|t| effective_type_line.contains(t));
    if is_special && !is_regular {
        return ColorGroup::SpecialCards;
    }

    // Colorless artifacts
    if front_face_type.contains("Artifact") && effective_colors.is_empty() {
        return ColorGroup::Artifact;
    }

    match effective_colors.len() {
        0 => ColorGroup::Colorless,
        1 => {
            let letter = effective_colors.iter().next().copied().unwrap_or("");
            MANA_COLORS
                .iter()
                .find(|(l, _)| *l == letter)
                .map(|(_, group)| *group)
                .unwrap_or(ColorGroup::Unknown)
        }
        _ => ColorGroup::Multicolor,
    }
}

/// Foil requests get a suffix; an unverifiable foil claim (the record has no
/// foil printing) is flagged with an asterisk
fn display_name(record: &CardRecord, request: &CardRequest) -> String {
    if !request.foil {
        return record.name.clone();
    }
    if record.has_foil {
        format!("{} (FOIL)", record.name)
    } else {
        format!("{} (FOIL*)", record.name)
    }
}
