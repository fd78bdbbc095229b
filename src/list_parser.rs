//! Decklist line parsing
//!
//! One line per card: optional leading quantity ("4", "4x"), the card name,
//! optional trailing foil marker ("(foil)", "foil" or "*"). Blank lines and
//! `#` comments are skipped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::CardRequest;

const COMMENT_MARKER: char = '#';

lazy_static! {
    static ref QUANTITY_RE: Regex = Regex::new(r"^(\d+)\s*x?\s*").unwrap();
    static ref FOIL_RE: Regex = Regex::new(r"(?i)\s*(?:\(?foil\)?|\*)\s*$").unwrap();
}

/// Parse one raw input line
///
/// Returns `None` for blank lines, comments, and lines that are empty once
/// quantity and foil markers are stripped. Quantity defaults to 1; an
/// explicit "0x" clamps to 1 so requests always carry a positive quantity.
pub fn parse_line(line: &str) -> Option<CardRequest> {
    let mut rest = line.trim();
    if rest.is_empty() || rest.starts_with(COMMENT_MARKER) {
        return None;
    }

    let mut quantity = 1u32;
    if let Some(caps) = QUANTITY_RE.captures(rest) {
        // Oversized quantities are treated as unparseable and left in the name
        if let Ok(q) = caps[1].parse::<u32>() {
            quantity = q.max(1);
            rest = rest[caps.get(0).map(|m| m.end()).unwrap_or(0)..].trim();
        }
    }

    let mut foil = false;
    if let Some(m) = FOIL_RE.find(rest) {
        foil = true;
        rest = rest[..m.start()].trim();
    }

    let name = rest.trim();
    if name.is_empty() {
        return None;
    }

    Some(CardRequest {
        name: name.to_string(),
        quantity,
        foil,
    })
}

/// Parse a whole pasted list into card requests, skipping non-card lines
pub fn parse_list(text: &str) -> Vec<CardRequest> {
    text.lines().filter_map(parse_line).collect()
}
