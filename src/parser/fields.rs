//! Field Resolver: property name, canonical URL, location and provider.
//!
//! Every resolver returns a usable value; ambiguity is settled by fixed
//! priority tables, never surfaced as an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::blocks::{classify_lines, Block};
use crate::input::{scalar_text, RawInput};
use crate::taxonomy;

pub const UNKNOWN_PROPERTY: &str = "Unknown Property";

static NAME_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:property\s*name|name|title)\s*:\s*(.+)$").unwrap());
static LOCATION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:location|address)\s*:\s*(.+)$").unwrap());
static PROVIDER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:provider|hosted by|managed by|operated by)\s*:\s*(.+)$").unwrap()
});

/// URL syntaxes, highest base priority first. Group 1, when present, is the URL.
static URL_PATTERNS: LazyLock<Vec<(Regex, i32)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r#"href=["']([^"']+)["']"#).unwrap(), 3),
        (Regex::new(r"\[[^\]]*\]\(([^)\s]+)").unwrap(), 2),
        (Regex::new(r#"https?://[^\s)"'<>\]]+"#).unwrap(), 1),
        (Regex::new(r#"www\.[^\s)"'<>\]]+"#).unwrap(), 0),
    ]
});

const ASSET_PENALTY: i32 = 100;
const LISTING_BONUS: i32 = 10;
const LISTING_PATH_BONUS: i32 = 5;

const ASSET_KEYWORDS: &[&str] = &[
    "cdn", "logo", "icon", "favicon", "apple-touch", "stylesheet", "/assets/", "/static/",
    "/files/", "/fonts/", "facebook.", "twitter.", "instagram.", "linkedin.", "youtube.",
    "youtu.be", "pinterest.", "tiktok.",
];
const ASSET_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico", ".css", ".js"];
const LISTING_KEYWORDS: &[&str] = &[
    "property", "properties", "accommodation", "student", "booking", "listing", "rooms",
    "universityliving.com", "amberstudent.com", "unilodgers.com", "casita.com",
];
const LISTING_PATHS: &[&str] = &["/property", "/properties", "/accommodation", "/listing"];

/// Delimiters that mark a candidate name as image alt text.
const ALT_TEXT_MARKERS: &[&str] = &[" - Bedroom", " - Amenities", " - Kitchen"];
const NAME_DISQUALIFIERS: &[&str] = &["Overview", "Bedroom", "Amenities"];

/// A key alias, optionally with a transform that turns the raw value into text.
pub struct Alias {
    pub key: &'static str,
    pub transform: Option<fn(&Value) -> Option<String>>,
}

const fn alias(key: &'static str) -> Alias {
    Alias { key, transform: None }
}

const fn located(key: &'static str) -> Alias {
    Alias { key, transform: Some(location_from_value) }
}

pub static NAME_ALIASES: &[Alias] = &[
    alias("property_name"),
    alias("name"),
    alias("title"),
    alias("property"),
    alias("propertyName"),
];

pub static URL_ALIASES: &[Alias] = &[
    alias("url"),
    alias("source_link"),
    alias("link"),
    alias("property_url"),
    alias("website"),
    alias("sourceUrl"),
];

pub static LOCATION_ALIASES: &[Alias] = &[
    located("location"),
    located("address"),
    located("city"),
    located("area"),
    located("address_line_1"),
];

pub static PROVIDER_ALIASES: &[Alias] = &[
    alias("provider"),
    alias("source"),
    alias("host"),
    alias("owner_name"),
];

/// Top-down alias lookup; the first non-empty result wins.
pub fn lookup(bag: &Map<String, Value>, aliases: &[Alias]) -> Option<String> {
    aliases.iter().find_map(|a| {
        let value = bag.get(a.key)?;
        match a.transform {
            Some(f) => f(value),
            None => scalar_text(value),
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields {
    pub property_name: String,
    pub url: String,
    pub location: Option<String>,
    pub provider: Option<String>,
}

pub fn resolve(input: &RawInput, text: &str, blocks: &[Block], default_url: &str) -> ResolvedFields {
    ResolvedFields {
        property_name: resolve_name(input),
        url: resolve_url(input, text, default_url),
        location: resolve_location(input, blocks),
        provider: resolve_provider(input, blocks),
    }
}

// ── Name ──

/// Name windows count lines of the document as received, so navigation
/// lines the noise filter later drops still push a heading out of range.
pub fn resolve_name(input: &RawInput) -> String {
    let blocks = classify_lines(&input.text);
    let candidate = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| lookup(&input.metadata, NAME_ALIASES));

    match candidate {
        Some(name) if looks_like_alt_text(&name) => name_from_headings(&blocks).unwrap_or_else(|| {
            name.split(" - ").next().unwrap_or(&name).trim().to_string()
        }),
        Some(name) => name,
        None => infer_name(&blocks).unwrap_or_else(|| UNKNOWN_PROPERTY.to_string()),
    }
}

pub fn looks_like_alt_text(name: &str) -> bool {
    ALT_TEXT_MARKERS.iter().any(|m| name.contains(m))
}

/// First heading in the first 20 lines that reads like a title.
fn name_from_headings(blocks: &[Block]) -> Option<String> {
    blocks.iter().take(20).find_map(|b| match b {
        Block::Heading { text, .. }
            if (4..80).contains(&text.chars().count())
                && !NAME_DISQUALIFIERS.iter().any(|d| text.contains(d)) =>
        {
            Some(text.clone())
        }
        _ => None,
    })
}

/// No candidate was supplied: H1, then H2, then a `Name:` label.
fn infer_name(blocks: &[Block]) -> Option<String> {
    let heading_at = |wanted: u8| {
        blocks.iter().take(50).find_map(|b| match b {
            Block::Heading { level, text }
                if *level == wanted
                    && (4..100).contains(&text.chars().count())
                    && !is_section_heading(text) =>
            {
                Some(text.clone())
            }
            _ => None,
        })
    };

    heading_at(1).or_else(|| heading_at(2)).or_else(|| {
        blocks.iter().take(20).find_map(|b| match b {
            Block::Text(line) => NAME_LABEL_RE
                .captures(line)
                .map(|c| c[1].trim().to_string())
                .filter(|n| (4..100).contains(&n.chars().count())),
            _ => None,
        })
    })
}

fn is_section_heading(text: &str) -> bool {
    let lower = text.to_lowercase();
    taxonomy::HEADING_RULES.iter().any(|r| r.matches(&lower))
}

// ── URL ──

#[derive(Debug, Clone)]
struct UrlCandidate {
    url: String,
    score: i32,
    asset_like: bool,
}

pub fn resolve_url(input: &RawInput, text: &str, default_url: &str) -> String {
    let explicit = input
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .or_else(|| lookup(&input.metadata, URL_ALIASES));
    if let Some(url) = explicit.and_then(|u| clean_url(&u)) {
        if !is_asset_like(&url.to_lowercase()) {
            return url;
        }
    }

    match best_url_candidate(text) {
        Some(c) if !c.asset_like => {
            debug!(url = %c.url, score = c.score, "selected listing url");
            c.url
        }
        _ => default_url.to_string(),
    }
}

/// Highest score wins; ties go to the first candidate seen.
fn best_url_candidate(text: &str) -> Option<UrlCandidate> {
    let mut best: Option<UrlCandidate> = None;
    for candidate in collect_url_candidates(text) {
        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

fn collect_url_candidates(text: &str) -> Vec<UrlCandidate> {
    let mut candidates = Vec::new();
    for line in text.lines() {
        for (re, base) in URL_PATTERNS.iter() {
            for caps in re.captures_iter(line) {
                let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                let Some(url) = clean_url(m.as_str()) else {
                    continue;
                };
                candidates.push(score_url(url, *base));
            }
        }
    }
    candidates
}

fn clean_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | '"' | '\''));
    let url = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches(['.', ',', ';', ':']);
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else if url.starts_with("www.") {
        Some(format!("https://{}", url))
    } else {
        None
    }
}

fn score_url(url: String, base: i32) -> UrlCandidate {
    let lower = url.to_lowercase();
    let asset_like = is_asset_like(&lower);
    let mut score = base;
    if asset_like {
        score -= ASSET_PENALTY;
    }
    if LISTING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        score += LISTING_BONUS;
    }
    if LISTING_PATHS.iter().any(|p| lower.contains(p)) {
        score += LISTING_PATH_BONUS;
    }
    UrlCandidate { url, score, asset_like }
}

fn is_asset_like(lower: &str) -> bool {
    ASSET_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

// ── Location ──

/// Preference order for structured locations; each slot takes its first
/// non-empty key.
const LOCATION_PARTS: &[&[&str]] = &[
    &["name"],
    &["address", "street"],
    &["city"],
    &["region", "state"],
    &["country"],
    &["postal_code", "zip_code", "postcode", "zip"],
];
const LOCATION_FALLBACKS: &[&str] = &["formatted_address", "display_name", "label"];

pub fn location_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => location_from_object(obj),
        other => scalar_text(other),
    }
}

fn location_from_object(obj: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = LOCATION_PARTS
        .iter()
        .filter_map(|keys| keys.iter().find_map(|k| obj.get(*k).and_then(scalar_text)))
        .collect();
    if !parts.is_empty() {
        return Some(parts.join(", "));
    }
    if let Some(s) = LOCATION_FALLBACKS.iter().find_map(|k| obj.get(*k).and_then(scalar_text)) {
        return Some(s);
    }
    let lat = ["lat", "latitude"].iter().find_map(|k| obj.get(*k).and_then(scalar_text));
    let lng = ["lng", "lon", "longitude"].iter().find_map(|k| obj.get(*k).and_then(scalar_text));
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(format!("{}, {}", lat, lng)),
        _ => None,
    }
}

pub fn resolve_location(input: &RawInput, blocks: &[Block]) -> Option<String> {
    input
        .location
        .as_ref()
        .and_then(location_from_value)
        .or_else(|| lookup(&input.metadata, LOCATION_ALIASES))
        .or_else(|| location_from_text(blocks))
}

/// Line after a Location/Address/City heading, or a `Location:` label.
fn location_from_text(blocks: &[Block]) -> Option<String> {
    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Heading { text, .. } if starts_with_any(text, &["location", "address", "city"]) => {
                let next = blocks[i + 1..].iter().find(|b| !matches!(b, Block::Empty));
                if let Some(Block::Text(line)) = next {
                    if line.chars().count() <= 150 {
                        return Some(line.clone());
                    }
                }
            }
            Block::Text(line) => {
                if let Some(caps) = LOCATION_LABEL_RE.captures(line) {
                    return Some(caps[1].trim().to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    let lower = text.to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p))
}

// ── Provider ──

pub fn resolve_provider(input: &RawInput, blocks: &[Block]) -> Option<String> {
    lookup(&input.metadata, PROVIDER_ALIASES).or_else(|| {
        blocks.iter().find_map(|b| match b {
            Block::Text(line) => PROVIDER_LABEL_RE
                .captures(line)
                .map(|c| c[1].trim().to_string())
                .filter(|p| !p.is_empty()),
            _ => None,
        })
    })
}
