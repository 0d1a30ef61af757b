//! Item Extractor: turn a section's content into discrete items.
//!
//! Strategies are pure functions tried in order; the first one producing at
//! least `ITEM_THRESHOLD` items wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::blocks::{classify_line, Block};
use super::merge::dedup_items;

pub const ITEM_THRESHOLD: usize = 3;

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static BED_BATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\s*Bed\s*\d+\s*Bath").unwrap());

type Strategy = fn(&str, &str) -> Option<Vec<String>>;

const CASCADE: &[(&str, Strategy)] = &[
    ("bullets", bullet_items),
    ("spaced", spaced_items),
    ("short_lines", short_line_items),
    ("slug_pattern", slug_pattern_items),
];

pub fn extract_items(content: &str, slug: &str) -> Vec<String> {
    for (name, strategy) in CASCADE {
        if let Some(items) = strategy(content, slug) {
            if items.len() >= ITEM_THRESHOLD {
                debug!(slug, strategy = *name, count = items.len(), "items extracted");
                return dedup_items(items);
            }
        }
    }
    let mut fallback = bullet_items(content, slug).unwrap_or_default();
    fallback.extend(spaced_items(content, slug).unwrap_or_default());
    dedup_items(fallback)
}

/// `- item` / `* item` lines.
pub fn bullet_items(content: &str, _slug: &str) -> Option<Vec<String>> {
    let items: Vec<String> = content
        .lines()
        .filter_map(|line| match classify_line(line) {
            Block::Bullet(item) => Some(item),
            _ => None,
        })
        .collect();
    non_empty(items)
}

/// Flat lists separated by runs of two or more spaces:
/// `Gym  Study Room  Courtyard`.
pub fn spaced_items(content: &str, _slug: &str) -> Option<Vec<String>> {
    let items: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| SPACE_RUN_RE.is_match(line))
        .flat_map(|line| SPACE_RUN_RE.split(line))
        .map(str::trim)
        .filter(|token| (2..100).contains(&token.chars().count()))
        .map(str::to_string)
        .collect();
    non_empty(items)
}

/// Newline-separated short lines, at most 20 of them.
pub fn short_line_items(content: &str, _slug: &str) -> Option<Vec<String>> {
    let lines: Vec<String> = content
        .lines()
        .filter_map(|line| match classify_line(line) {
            Block::Heading { text, .. } | Block::Bullet(text) | Block::Text(text) => Some(text),
            _ => None,
        })
        .filter(|line| {
            let len = line.chars().count();
            len > 2 && len < 50
        })
        .collect();
    if lines.len() >= ITEM_THRESHOLD {
        Some(lines.into_iter().take(20).collect())
    } else {
        None
    }
}

/// Question lines for FAQ sections, `N Bed N Bath` for room types.
pub fn slug_pattern_items(content: &str, slug: &str) -> Option<Vec<String>> {
    let items = if slug.contains("faq") || slug.contains("question") {
        question_lines(content)
    } else if slug.contains("room") {
        room_type_items(content)
    } else {
        return None;
    };
    non_empty(items)
}

pub fn question_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| match classify_line(line) {
            Block::Heading { text, .. } | Block::Bullet(text) | Block::Text(text) => Some(text),
            _ => None,
        })
        .filter(|line| line.ends_with('?'))
        .collect()
}

pub fn room_type_items(content: &str) -> Vec<String> {
    BED_BATH_RE
        .find_iter(content)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_win_first() {
        let content = "- Gym\n- Cinema\n- Pool\nA long paragraph that is not an item at all, really.";
        assert_eq!(extract_items(content, "amenities"), vec!["Gym", "Cinema", "Pool"]);
    }

    #[test]
    fn spaced_list() {
        let content = "Heat  Hydro  Gas  Internet";
        assert_eq!(extract_items(content, "bills_included"), vec!["Heat", "Hydro", "Gas", "Internet"]);
    }

    #[test]
    fn spaced_tokens_bounded() {
        let long = "x".repeat(120);
        let content = format!("A  {}  Lounge", long);
        assert_eq!(spaced_items(&content, "amenities"), Some(vec!["Lounge".to_string()]));
    }

    #[test]
    fn two_bullets_fall_through_to_short_lines() {
        let content = "- Gym\n- Pool\nCinema\nRooftop Terrace";
        assert_eq!(extract_items(content, "amenities"), vec!["Gym", "Pool", "Cinema", "Rooftop Terrace"]);
    }

    #[test]
    fn short_lines_capped_at_twenty() {
        let content = (0..30).map(|i| format!("Feature {}", i)).collect::<Vec<_>>().join("\n");
        let items = short_line_items(&content, "highlights").unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(items[0], "Feature 0");
    }

    #[test]
    fn faq_questions() {
        let content = "### Is Wi-Fi included in the rent for every room type available here?\nYes, across all of the buildings and every single floor too.\n### Can I have guests stay overnight in my room during term time?\nUp to three nights per week, with prior notice to reception staff.\n### Is there on-site parking for residents who bring their own cars?\nLimited spaces are available; please ask the team when booking.";
        let items = extract_items(content, "faqs");
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|q| q.ends_with('?') && !q.starts_with('#')));
    }

    #[test]
    fn room_types_pattern() {
        let content = "Our suites come as a 1 Bed 1 Bath layout, a 2 Bed 2 Bath layout or a 4 Bed 2 Bath layout, all fully furnished with a private kitchen and ensuite laundry.";
        assert_eq!(extract_items(content, "room_types"), vec!["1 Bed 1 Bath", "2 Bed 2 Bath", "4 Bed 2 Bath"]);
    }

    #[test]
    fn nothing_detectable() {
        let content = "One single paragraph of prose describing the property in a few words and nothing more.";
        assert!(extract_items(content, "property_overview").is_empty());
    }

    #[test]
    fn fallback_keeps_partial_bullets() {
        let content = "- Weekly cleaning\nThe rest of this section is a long description without any list structure.";
        assert_eq!(extract_items(content, "highlights"), vec!["Weekly cleaning"]);
    }
}
