use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::blocks::Block;
use super::items::{extract_items, question_lines, room_type_items};
use super::merge::dedup_items;
use crate::taxonomy;

static FAQ_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Frequently Asked Questions(.*?)(?:\n##[^#]|Show more|View less|Nearby Places|Student Accommodations|Universities in|\z)").unwrap()
});
// Policy regions open only on a label line: the label, an optional `(N)`
// count and optional heading hashes, nothing else.
static PAYMENT_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^[ \t]*(?:#{1,6}[ \t]*)?Payment Policies[ \t]*(?:\(\d+\))?[ \t\r]*$(.*?)(?:\n##[^#]|\n[ \t]*(?:#{1,6}[ \t]*)?Cancellation|\z)").unwrap()
});
static CANCELLATION_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^[ \t]*(?:#{1,6}[ \t]*)?Cancellation Policies[ \t]*(?:\(\d+\))?[ \t\r]*$(.*?)(?:\n##[^#]|\n[ \t]*(?:#{1,6}[ \t]*)?Frequently|\z)").unwrap()
});
static OFFERS_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)##\s*Offers\s*(?:\(\d+\))?(.*?)(?:\n##[^#]|\z)").unwrap()
});
static DASH_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*-\s*(.+?)\s*$").unwrap());

/// Headings at this depth open a section.
const SECTION_LEVEL: u8 = 2;
/// Spans with this little content are layout, not sections.
const MIN_CONTENT_CHARS: usize = 15;

/// Headings that are menus or cross-links rather than listing content.
const NAV_HEADINGS: &[&str] = &[
    "Nearby Locations",
    "Similar Properties",
    "Student Accommodations",
    "Tourist Attractions",
    "Universities in",
    "Cities",
    "Localities",
];

const AMENITY_TRIGGERS: &[&str] = &["Gym", "Study Room", "Courtyard", "Boardroom", "Laundry", "Study Lounge"];
const AMENITY_PHRASES: &[&str] = &[
    "Study Room", "Study Lounge", "On-Site Laundry", "In-Suite Laundry", "Laundry Room",
    "Fitness Center", "Game Room", "Common Room", "Meeting Room", "Board Room", "Boardroom",
];
const AMENITY_WORDS: &[&str] = &[
    "Gym", "Courtyard", "Pool", "Cinema", "Theater", "Lounge", "Kitchen", "Parking", "Storage",
    "Elevator", "WiFi",
];

const BILL_TRIGGERS: &[&str] = &["Heat", "Hydro", "Gas", "Internet"];
const BILL_PHRASES: &[&str] = &[
    "Heat", "Hydro", "Gas", "Internet", "In-Suite Laundry", "Electricity", "Water", "WiFi", "Wi-Fi",
];

/// Lines need this many trigger keywords to count as a flat list.
const MIN_TRIGGERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A `##` heading span.
    Heading,
    /// Keyword-density or labelled-region detection.
    Keyword,
}

#[derive(Debug, Clone)]
pub struct CandidateSection {
    pub slug: String,
    pub display_heading: Option<String>,
    pub content: String,
    pub items: Vec<String>,
    pub origin: Origin,
}

/// Heading spans first (document order), then keyword sections.
pub fn segment(text: &str, blocks: &[Block]) -> Vec<CandidateSection> {
    let mut sections = heading_sections(text, blocks);
    sections.extend(keyword_sections(text));
    sections
}

// ── Strategy A: heading spans ──

pub fn heading_sections(text: &str, blocks: &[Block]) -> Vec<CandidateSection> {
    let lines: Vec<&str> = text.lines().collect();
    let mut sections = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        let Block::Heading { level: SECTION_LEVEL, text: heading } = &blocks[i] else {
            i += 1;
            continue;
        };
        let end = blocks[i + 1..]
            .iter()
            .position(|b| matches!(b, Block::Heading { level, .. } if *level <= SECTION_LEVEL))
            .map(|p| i + 1 + p)
            .unwrap_or(blocks.len());
        let content = lines[i + 1..end.min(lines.len())].join("\n").trim().to_string();
        i = end;

        if is_navigation_heading(heading) {
            debug!(heading = %heading, "skipping navigation heading");
            continue;
        }
        if content.chars().count() <= MIN_CONTENT_CHARS {
            continue;
        }
        let Some(slug) = taxonomy::infer_slug(heading) else {
            continue;
        };
        let items = extract_items(&content, &slug);
        sections.push(CandidateSection {
            slug,
            display_heading: Some(heading.clone()),
            content,
            items,
            origin: Origin::Heading,
        });
    }

    sections
}

pub fn is_navigation_heading(heading: &str) -> bool {
    NAV_HEADINGS.iter().any(|kw| heading.contains(kw))
}

// ── Strategy B: keyword density and labelled regions ──

pub fn keyword_sections(text: &str) -> Vec<CandidateSection> {
    let mut sections = Vec::new();

    if let Some(s) = vocabulary_section(text, "amenities", AMENITY_TRIGGERS, AMENITY_PHRASES, AMENITY_WORDS) {
        sections.push(s);
    }
    if let Some(s) = vocabulary_section(text, "bills_included", BILL_TRIGGERS, BILL_PHRASES, &[]) {
        sections.push(s);
    }
    if let Some(s) = faq_section(text) {
        sections.push(s);
    }
    if let Some(s) = room_types_section(text) {
        sections.push(s);
    }
    let regions: [(&str, &Regex); 3] = [
        ("payment_options", &*PAYMENT_REGION_RE),
        ("cancellation_policies", &*CANCELLATION_REGION_RE),
        ("offers_deals", &*OFFERS_REGION_RE),
    ];
    for (slug, re) in regions {
        if let Some(s) = dash_region_section(text, slug, re) {
            sections.push(s);
        }
    }

    sections
}

/// First line carrying enough trigger keywords, split with a controlled
/// vocabulary so multi-word phrases survive intact.
fn vocabulary_section(
    text: &str,
    slug: &str,
    triggers: &[&str],
    phrases: &[&str],
    words: &[&str],
) -> Option<CandidateSection> {
    text.lines().find_map(|line| {
        let hits = triggers.iter().filter(|kw| find_term(line, kw).is_some()).count();
        if hits < MIN_TRIGGERS {
            return None;
        }
        let items: Vec<String> = vocabulary_items(line, phrases, words)
            .into_iter()
            .filter(|i| i.chars().count() > 2)
            .collect();
        if items.len() < MIN_TRIGGERS {
            return None;
        }
        Some(keyword_candidate(slug, line.trim().to_string(), items))
    })
}

/// Known phrases first (masked out of the line once found), then single
/// words; items come back in order of appearance.
pub fn vocabulary_items(line: &str, phrases: &[&str], words: &[&str]) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut masked = line.to_string();

    for phrase in phrases {
        if let Some(pos) = find_term(&masked, phrase) {
            found.push((pos, phrase.to_string()));
            masked.replace_range(pos..pos + phrase.len(), &" ".repeat(phrase.len()));
        }
    }

    let mut offset = 0;
    for token in masked.split(' ') {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
        if words.contains(&word) && !found.iter().any(|(_, f)| f.contains(word)) {
            found.push((offset, word.to_string()));
        }
        offset += token.len() + 1;
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, item)| item).collect()
}

/// First occurrence of `term` that stands alone: the characters either side
/// are not part of a word, so "Heat" never matches inside "Heated".
fn find_term(haystack: &str, term: &str) -> Option<usize> {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '-';
    haystack.match_indices(term).map(|(pos, _)| pos).find(|&pos| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn faq_section(text: &str) -> Option<CandidateSection> {
    let caps = FAQ_REGION_RE.captures(text)?;
    let content = caps[1].trim().to_string();
    let questions = question_lines(&content);
    if questions.is_empty() {
        return None;
    }
    Some(keyword_candidate("faqs", content, questions))
}

fn room_types_section(text: &str) -> Option<CandidateSection> {
    let rooms = dedup_items(room_type_items(text));
    if rooms.is_empty() {
        return None;
    }
    let content = text
        .lines()
        .filter(|line| !room_type_items(line).is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    Some(keyword_candidate("room_types", content, rooms))
}

fn dash_region_section(text: &str, slug: &str, re: &Regex) -> Option<CandidateSection> {
    let caps = re.captures(text)?;
    let content = caps[1].trim().to_string();
    let items: Vec<String> = DASH_LINE_RE
        .captures_iter(&content)
        .map(|c| c[1].to_string())
        .filter(|item| !item.chars().all(|c| c == '-'))
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(keyword_candidate(slug, content, items))
}

fn keyword_candidate(slug: &str, content: String, items: Vec<String>) -> CandidateSection {
    CandidateSection {
        slug: slug.to_string(),
        display_heading: None,
        content,
        items,
        origin: Origin::Keyword,
    }
}

// ── Tests ──
