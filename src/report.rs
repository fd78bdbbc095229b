//! List processing and result aggregation
//!
//! `process_list` is the library's single entry point for a pasted decklist:
//! parse, resolve against the card store, classify, then group into the
//! two-level rarity/color structure the UI renders.

use serde::Serialize;
use std::collections::HashMap;

use crate::classify::{
    classify, ClassifiedEntry, ColorGroup, RarityGroup, COLOR_GROUP_ORDER, RARITY_GROUP_ORDER,
};
use crate::database::CardStore;
use crate::error::Result;
use crate::list_parser::parse_list;

/// Entries sharing one color bucket, sorted for display
#[derive(Debug, Serialize)]
pub struct ColorBucket {
    pub color_group: ColorGroup,
    pub cards: Vec<ClassifiedEntry>,
}

/// Color buckets of one rarity group, in fixed color order
#[derive(Debug, Serialize)]
pub struct RarityBucket {
    pub rarity_group: RarityGroup,
    pub colors: Vec<ColorBucket>,
}

/// Aggregated result of one list-processing call
#[derive(Debug, Serialize)]
pub struct ListReport {
    pub groups: Vec<RarityBucket>,
    pub unresolved_names: Vec<String>,
    /// Distinct resolved entries
    pub total_entries: usize,
    /// Sum of quantities across resolved entries
    pub total_quantity: u64,
    pub unresolved_count: usize,
}

/// Group classified entries by rarity then color
///
/// Buckets appear in fixed enumeration order, empty buckets are omitted, and
/// entries sort by case-folded card name with non-foil before foil on ties.
pub fn aggregate(entries: Vec<ClassifiedEntry>, unresolved_names: Vec<String>) -> ListReport {
    let total_entries = entries.len();
    let total_quantity = entries.iter().map(|e| u64::from(e.quantity)).sum();

    let mut buckets: HashMap<(RarityGroup, ColorGroup), Vec<ClassifiedEntry>> = HashMap::new();
    for entry in entries {
        buckets
            .entry((entry.rarity_group, entry.color_group))
            .or_default()
            .push(entry);
    }

    let mut groups = Vec::new();
    for rarity_group in RARITY_GROUP_ORDER {
        let mut colors = Vec::new();
        for color_group in COLOR_GROUP_ORDER {
            if let Some(mut cards) = buckets.remove(&(rarity_group, color_group)) {
                cards.sort_by(|a, b| {
                    a.sort_key
                        .cmp(&b.sort_key)
                        .then_with(|| a.foil.cmp(&b.foil))
                });
                colors.push(ColorBucket { color_group, cards });
            }
        }
        if !colors.is_empty() {
            groups.push(RarityBucket {
                rarity_group,
                colors,
            });
        }
    }

    let unresolved_count = unresolved_names.len();
    ListReport {
        groups,
        unresolved_names,
        total_entries,
        total_quantity,
        unresolved_count,
    }
}

/// Process one pasted card list against the reference store
///
/// Unresolvable names are reported, never fatal; only a store failure aborts
/// the request.
pub fn process_list(store: &CardStore, raw_text: &str) -> Result<ListReport> {
    let requests = parse_list(raw_text);
    log::info!("Processing {} card entries", requests.len());

    let mut entries = Vec::with_capacity(requests.len());
    let mut unresolved = Vec::new();

    for request in &requests {
        match store.resolve(&request.name)? {
            Some(record) => {
                log::debug!("Matched '{}' -> '{}'", request.name, record.name);
                entries.push(classify(&record, request));
            }
            None => unresolved.push(request.name.clone()),
        }
    }

    let report = aggregate(entries, unresolved);
    log::info!(
        "Processed {} of {} entries, {} not found",
        report.total_entries,
        requests.len(),
        report.unresolved_count
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        name: &str,
        rarity_group: RarityGroup,
        color_group: ColorGroup,
        foil: bool,
        quantity: u32,
    ) -> ClassifiedEntry {
        ClassifiedEntry {
            name: name.to_string(),
            type_line: String::new(),
            mana_cost: String::new(),
            color_group,
            rarity_group,
            foil,
            quantity,
            sort_key: name.to_lowercase(),
        }
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = aggregate(Vec::new(), Vec::new());
        assert!(report.groups.is_empty());
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.total_quantity, 0);
        assert_eq!(report.unresolved_count, 0);
    }

    #[test]
    fn buckets_partition_entries_exactly_once() {
        let entries = vec![
            entry("A", RarityGroup::MythicRare, ColorGroup::Red, false, 1),
            entry("B", RarityGroup::MythicRare, ColorGroup::Red, false, 2),
            entry("C", RarityGroup::CommonUncommon, ColorGroup::Land, false, 3),
            entry("D", RarityGroup::CommonUncommon, ColorGroup::Artifact, true, 4),
        ];

        let report = aggregate(entries, Vec::new());
        let placed: usize = report
            .groups
            .iter()
            .flat_map(|g| g.colors.iter())
            .map(|c| c.cards.len())
            .sum();
        assert_eq!(placed, 4);
        assert_eq!(report.total_entries, 4);
        assert_eq!(report.total_quantity, 10);
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let entries = vec![entry(
            "Sol Ring",
            RarityGroup::CommonUncommon,
            ColorGroup::Artifact,
            false,
            1,
        )];

        let report = aggregate(entries, Vec::new());
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].rarity_group, RarityGroup::CommonUncommon);
        assert_eq!(report.groups[0].colors.len(), 1);
        assert_eq!(report.groups[0].colors[0].color_group, ColorGroup::Artifact);
    }

    #[test]
    fn rarity_and_color_order_is_fixed() {
        let entries = vec![
            entry("A", RarityGroup::CommonUncommon, ColorGroup::Land, false, 1),
            entry("B", RarityGroup::CommonUncommon, ColorGroup::White, false, 1),
            entry("C", RarityGroup::MythicRare, ColorGroup::Multicolor, false, 1),
            entry("D", RarityGroup::MythicRare, ColorGroup::Blue, false, 1),
        ];

        let report = aggregate(entries, Vec::new());
        assert_eq!(report.groups[0].rarity_group, RarityGroup::MythicRare);
        assert_eq!(report.groups[0].colors[0].color_group, ColorGroup::Blue);
        assert_eq!(report.groups[0].colors[1].color_group, ColorGroup::Multicolor);
        assert_eq!(report.groups[1].rarity_group, RarityGroup::CommonUncommon);
        assert_eq!(report.groups[1].colors[0].color_group, ColorGroup::White);
        assert_eq!(report.groups[1].colors[1].color_group, ColorGroup::Land);
    }

    #[test]
    fn entries_sort_by_name_then_nonfoil_first() {
        let entries = vec![
            entry("zealous conscripts", RarityGroup::CommonUncommon, ColorGroup::Red, false, 1),
            entry("Ash Zealot (FOIL)", RarityGroup::CommonUncommon, ColorGroup::Red, true, 1),
            entry("Ash Zealot", RarityGroup::CommonUncommon, ColorGroup::Red, false, 1),
        ];
        // Foil entry shares the record name with the non-foil one
        let mut entries = entries;
        entries[1].sort_key = "ash zealot".to_string();

        let report = aggregate(entries, Vec::new());
        let cards = &report.groups[0].colors[0].cards;
        assert_eq!(cards[0].name, "Ash Zealot");
        assert_eq!(cards[1].name, "Ash Zealot (FOIL)");
        assert_eq!(cards[2].name, "zealous conscripts");
    }

    #[test]
    fn unresolved_names_are_reported() {
        let report = aggregate(Vec::new(), vec!["Nonexistent Card Name".to_string()]);
        assert_eq!(report.unresolved_count, 1);
        assert_eq!(report.unresolved_names, vec!["Nonexistent Card Name"]);
        assert_eq!(report.total_entries, 0);
    }
}
