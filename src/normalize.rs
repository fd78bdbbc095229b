//! Raw record normalization
//!
//! Turns one heterogeneous upstream record into a canonical `CardRecord`.
//! Multi-faced layouts get face-aware field overrides; everything else passes
//! through. This step never fails: absent fields default to empty/false.

use chrono::{DateTime, Utc};

use crate::card_types::extract_types;
use crate::models::{CardRecord, Layout};
use crate::scryfall::RawCard;

/// Normalize one raw card record
///
/// For transform/modal_dfc/reversible_card layouts the front face overrides
/// `type_line`, `colors` and `mana_cost`, falling back per field to the
/// top-level value when the face omits it. Adventure cards keep the combined
/// type line but take the union of both faces' colors.
pub fn normalize_card(raw: &RawCard, now: DateTime<Utc>) -> CardRecord {
    let layout = Layout::parse(raw.layout.as_deref().unwrap_or(""));

    let mut type_line = raw.type_line.clone().unwrap_or_default();
    let mut colors = raw.colors.clone().unwrap_or_default();
    let mut mana_cost = raw.mana_cost.clone().unwrap_or_default();

    if let Some(faces) = raw.card_faces.as_deref().filter(|f| !f.is_empty()) {
        if layout.uses_front_face() {
            let front = &faces[0];
            if let Some(face_type) = &front.type_line {
                type_line = face_type.clone();
            }
            if let Some(face_colors) = &front.colors {
                colors = face_colors.clone();
            }
            if let Some(face_cost) = &front.mana_cost {
                mana_cost = face_cost.clone();
            }
        } else if layout == Layout::Adventure {
            // Adventure type lines already show both halves; colors come
            // from the union of the faces
            colors = faces
                .iter()
                .flat_map(|f| f.colors.clone().unwrap_or_default())
                .collect();
        }
    }

    colors.sort();
    colors.dedup();

    let types = extract_types(&type_line);

    CardRecord {
        name: raw.name.clone(),
        ascii_name: raw.ascii_name.clone().unwrap_or_default(),
        colors,
        types,
        type_line,
        rarity: raw.rarity.clone().unwrap_or_default(),
        mana_cost,
        has_foil: raw.foil || raw.nonfoil,
        layout,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_types::CardType;

    fn raw(json: &str) -> RawCard {
        serde_json::from_str(json).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn normal_card_passes_through() {
        let card = raw(r#"{
            "name": "Lightning Bolt",
            "type_line": "Instant",
            "colors": ["R"],
            "mana_cost": "{R}",
            "rarity": "uncommon",
            "layout": "normal",
            "foil": true,
            "nonfoil": true
        }"#);

        let record = normalize_card(&card, now());
        assert_eq!(record.name, "Lightning Bolt");
        assert_eq!(record.colors, vec!["R"]);
        assert_eq!(record.types, vec![CardType::Instant]);
        assert_eq!(record.mana_cost, "{R}");
        assert!(record.has_foil);
        assert_eq!(record.layout, Layout::Normal);
    }

    #[test]
    fn transform_uses_front_face_fields() {
        let card = raw(r#"{
            "name": "Delver of Secrets // Insectile Aberration",
            "type_line": "Creature — Human Wizard // Creature — Human Insect",
            "layout": "transform",
            "rarity": "common",
            "card_faces": [
                {"type_line": "Creature — Human Wizard", "colors": ["U"], "mana_cost": "{U}"},
                {"type_line": "Creature — Human Insect", "colors": ["U"], "mana_cost": ""}
            ]
        }"#);

        let record = normalize_card(&card, now());
        assert_eq!(record.type_line, "Creature — Human Wizard");
        assert_eq!(record.colors, vec!["U"]);
        assert_eq!(record.mana_cost, "{U}");
        assert_eq!(record.types, vec![CardType::Creature]);
    }

    #[test]
    fn transform_face_field_falls_back_to_top_level() {
        let card = raw(r#"{
            "name": "Front // Back",
            "type_line": "Enchantment // Land",
            "colors": ["W"],
            "mana_cost": "{W}",
            "layout": "modal_dfc",
            "card_faces": [
                {"type_line": "Enchantment"},
                {"type_line": "Land"}
            ]
        }"#);

        let record = normalize_card(&card, now());
        assert_eq!(record.type_line, "Enchantment");
        // Face carries no colors/mana_cost, top-level values survive
        assert_eq!(record.colors, vec!["W"]);
        assert_eq!(record.mana_cost, "{W}");
    }

    #[test]
    fn adventure_unions_face_colors_keeps_type_line() {
        let card = raw(r#"{
            "name": "Bonecrusher Giant // Stomp",
            "type_line": "Creature — Giant // Instant — Adventure",
            "colors": ["R"],
            "mana_cost": "{2}{R}",
            "layout": "adventure",
            "card_faces": [
                {"type_line": "Creature — Giant", "colors": ["R"]},
                {"type_line": "Instant — Adventure", "colors": ["G"]}
            ]
        }"#);

        let record = normalize_card(&card, now());
        assert_eq!(record.type_line, "Creature — Giant // Instant — Adventure");
        assert_eq!(record.colors, vec!["G", "R"]);
        assert_eq!(record.mana_cost, "{2}{R}");
        // Types only reflect the front half of the combined line
        assert_eq!(record.types, vec![CardType::Creature]);
    }

    #[test]
    fn missing_fields_default() {
        let record = normalize_card(&raw(r#"{"name": "Mystery"}"#), now());
        assert_eq!(record.ascii_name, "");
        assert_eq!(record.type_line, "");
        assert!(record.colors.is_empty());
        assert!(record.types.is_empty());
        assert_eq!(record.rarity, "");
        assert!(!record.has_foil);
        assert_eq!(record.layout, Layout::Other);
    }

    #[test]
    fn neither_foil_flag_means_no_foil() {
        let record = normalize_card(
            &raw(r#"{"name": "Proxy", "foil": false, "nonfoil": false}"#),
            now(),
        );
        assert!(!record.has_foil);
    }

    #[test]
    fn nonfoil_only_still_counts_as_has_foil() {
        let record = normalize_card(&raw(r#"{"name": "Plain", "nonfoil": true}"#), now());
        assert!(record.has_foil);
    }

    #[test]
    fn duplicate_face_colors_dedupe() {
        let card = raw(r#"{
            "name": "A // B",
            "layout": "adventure",
            "card_faces": [
                {"colors": ["U"]},
                {"colors": ["U"]}
            ]
        }"#);

        let record = normalize_card(&card, now());
        assert_eq!(record.colors, vec!["U"]);
    }
}
