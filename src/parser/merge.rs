use std::collections::HashSet;

use super::sections::CandidateSection;

pub const MAX_ITEMS: usize = 50;

/// One winner per slug. The first candidate for a slug holds its place
/// unless a later one carries strictly more items, in which case the later
/// one takes over that position.
pub fn merge_sections(candidates: Vec<CandidateSection>) -> Vec<CandidateSection> {
    let mut merged: Vec<CandidateSection> = Vec::new();
    for candidate in candidates {
        match merged.iter_mut().find(|s| s.slug == candidate.slug) {
            Some(existing) if candidate.items.len() > existing.items.len() => *existing = candidate,
            Some(_) => {}
            None => merged.push(candidate),
        }
    }
    for section in &mut merged {
        section.items = dedup_items(std::mem::take(&mut section.items));
    }
    merged
}

/// Case-sensitive, order-preserving dedup; items shorter than 2 chars are
/// dropped and the list is capped at `MAX_ITEMS`.
pub fn dedup_items(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        let item = item.trim().to_string();
        if item.chars().count() < 2 || seen.contains(&item) {
            continue;
        }
        seen.insert(item.clone());
        unique.push(item);
        if unique.len() == MAX_ITEMS {
            break;
        }
    }
    unique
}
