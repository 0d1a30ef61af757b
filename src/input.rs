//! Input readers: turn a raw JSON/markdown/text blob into a `RawInput`.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::record::{ImageRef, LinkRef, SourceKind, VideoRef};

static MD_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s+").unwrap());
static MD_LINK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(").unwrap());
static MD_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)[^)]*\)").unwrap());
static MD_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)[^)]*\)").unwrap());

const MAX_IMAGES: usize = 20;
const MAX_LINKS: usize = 50;

/// Keys already consumed by the renderer or the field resolver.
const RESERVED_KEYS: &[&str] = &[
    "property_name", "name", "title", "property", "propertyName",
    "url", "source_link", "link", "property_url", "website", "sourceUrl",
    "location", "address", "provider", "source", "host", "owner_name",
    "description", "about", "overview", "pricing", "amenities", "features",
    "types", "room_types", "meta", "owner", "policies", "images", "links",
    "videos", "extracted_content", "meta_tags",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Auto,
    Json,
    Markdown,
    Text,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "markdown" | "md" => Ok(InputFormat::Markdown),
            "text" | "txt" => Ok(InputFormat::Text),
            other => Err(format!("unknown input format: {}", other)),
        }
    }
}

/// One document as handed to the engine. Immutable once built.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub source_kind: SourceKind,
    pub text: String,
    /// Caller-supplied candidates; they outrank anything found in `metadata`.
    pub name: Option<String>,
    pub url: Option<String>,
    pub location: Option<Value>,
    pub images: Vec<ImageRef>,
    pub links: Vec<LinkRef>,
    pub videos: Vec<VideoRef>,
    /// Arbitrary key/value bag (the JSON object for structured input).
    pub metadata: Map<String, Value>,
}

impl RawInput {
    pub fn from_text(kind: SourceKind, text: impl Into<String>) -> Self {
        RawInput {
            source_kind: kind,
            text: text.into(),
            name: None,
            url: None,
            location: None,
            images: Vec::new(),
            links: Vec::new(),
            videos: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_location(mut self, location: Value) -> Self {
        self.location = Some(location);
        self
    }
}

/// Read `raw` in the given format. Only explicitly declared JSON can fail.
pub fn parse_input(raw: &str, format: InputFormat) -> Result<RawInput, NormalizeError> {
    let text = raw.trim();
    match format {
        InputFormat::Json => {
            let value: Value = serde_json::from_str(text)?;
            from_json(value)
        }
        InputFormat::Markdown => Ok(from_markdown(text)),
        InputFormat::Text => Ok(from_plain_text(text)),
        InputFormat::Auto => {
            if text.starts_with('{') || text.starts_with('[') {
                if let Ok(value) = serde_json::from_str::<Value>(text) {
                    if let Ok(input) = from_json(value) {
                        return Ok(input);
                    }
                }
            }
            if looks_like_markdown(text) {
                Ok(from_markdown(text))
            } else {
                Ok(from_plain_text(text))
            }
        }
    }
}

pub fn looks_like_markdown(text: &str) -> bool {
    MD_HEADING_RE.is_match(text) || MD_LINK_START_RE.is_match(text)
}

pub fn from_markdown(markdown: &str) -> RawInput {
    let mut input = RawInput::from_text(SourceKind::Markdown, markdown);

    input.images = MD_IMAGE_RE
        .captures_iter(markdown)
        .map(|caps| ImageRef {
            url: caps[2].to_string(),
            alt: Some(caps[1].trim().to_string()).filter(|a| !a.is_empty()),
            title: None,
        })
        .take(MAX_IMAGES)
        .collect();

    input.links = MD_LINK_RE
        .captures_iter(markdown)
        .filter(|caps| {
            // image syntax also matches the link pattern
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            !caps[2].starts_with('#') && !markdown[..start].ends_with('!')
        })
        .map(|caps| LinkRef {
            url: caps[2].to_string(),
            text: Some(caps[1].trim().to_string()),
        })
        .take(MAX_LINKS)
        .collect();

    input
}

pub fn from_plain_text(text: &str) -> RawInput {
    let clean = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    RawInput::from_text(SourceKind::Text, clean)
}

/// Read a structured listing. Accepts `{"data": {...}}` envelopes and
/// top-level arrays (first element).
pub fn from_json(value: Value) -> Result<RawInput, NormalizeError> {
    let mut value = value;
    if let Value::Array(items) = value {
        value = items
            .into_iter()
            .next()
            .ok_or_else(|| NormalizeError::UnsupportedInput("empty array".into()))?;
    }
    let mut obj = match value {
        Value::Object(map) => map,
        other => {
            return Err(NormalizeError::UnsupportedInput(format!(
                "expected an object, got {}",
                json_type(&other)
            )))
        }
    };
    let unwrapped = match obj.get("data") {
        Some(Value::Object(inner)) => Some(inner.clone()),
        _ => None,
    };
    if let Some(inner) = unwrapped {
        obj = inner;
    }

    let mut input = RawInput::from_text(SourceKind::Json, String::new());

    // Scraper envelope: text and media already extracted.
    let envelope = obj.get("extracted_content").and_then(Value::as_object);
    let envelope_text = envelope
        .and_then(|e| e.get("text"))
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty());

    input.text = match envelope_text {
        Some(t) => t.trim().to_string(),
        None => render_listing(&obj),
    };

    let media_source = envelope.unwrap_or(&obj);
    input.images = read_images(media_source.get("images").or_else(|| obj.get("images")));
    input.links = read_links(media_source.get("links").or_else(|| obj.get("links")));
    input.videos = read_videos(media_source.get("videos").or_else(|| obj.get("videos")));
    input.metadata = obj;
    Ok(input)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a structured listing as markdown so the segmenter can see it.
/// Loose scalar fields come first so they never land inside a section.
fn render_listing(obj: &Map<String, Value>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for (key, value) in obj {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(s) = value.as_str().map(str::trim).filter(|s| !s.is_empty() && s.len() < 500) {
            parts.push(format!("{}: {}", title_case(key), s));
        }
    }

    let about: Vec<&str> = ["description", "about", "overview"]
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !about.is_empty() {
        parts.push(format!("## About\n{}", about.join("\n\n")));
    }

    if let Some(pricing) = obj.get("pricing").and_then(Value::as_object) {
        let currency = str_field(pricing, &["currency"]).unwrap_or_default();
        let unit = str_field(pricing, &["duration", "price_unit"]).unwrap_or_default();
        let mut lines = Vec::new();
        if let Some(min) = num_field(pricing, &["min_price", "minPrice"]) {
            lines.push(format!("From {} {} {}", currency, min, unit).trim().to_string());
        }
        if let Some(max) = num_field(pricing, &["max_price", "maxPrice"]) {
            lines.push(format!("To {} {} {}", currency, max, unit).trim().to_string());
        }
        if !lines.is_empty() {
            parts.push(format!("## Pricing\n{}", lines.join("\n")));
        }
    }

    let mut amenities = list_field(obj.get("amenities"));
    amenities.extend(list_field(obj.get("features")));
    push_bullets(&mut parts, "Amenities", &amenities);

    let mut rooms = list_field(obj.get("types"));
    rooms.extend(list_field(obj.get("room_types")));
    push_bullets(&mut parts, "Room Types", &rooms);

    push_bullets(&mut parts, "Policies", &list_field(obj.get("policies")));

    if let Some(meta) = obj.get("meta").and_then(Value::as_object) {
        let facts: Vec<String> = meta
            .get("facts")
            .and_then(Value::as_array)
            .map(|facts| {
                facts
                    .iter()
                    .filter_map(|f| match f {
                        Value::Object(o) => str_field(o, &["value", "name"]),
                        other => scalar_text(other),
                    })
                    .collect()
            })
            .unwrap_or_default();
        push_bullets(&mut parts, "Highlights", &facts);
    }

    if let Some(owner) = obj.get("owner").and_then(Value::as_object) {
        let emails = list_field(owner.get("emails"));
        let phones = list_field(owner.get("phones"));
        let mut lines = Vec::new();
        if !emails.is_empty() {
            lines.push(format!("Email: {}", emails.join(", ")));
        }
        if !phones.is_empty() {
            lines.push(format!("Phone: {}", phones.join(", ")));
        }
        if !lines.is_empty() {
            parts.push(format!("## Contact\n{}", lines.join("\n")));
        }
    }

    parts.join("\n\n")
}

fn push_bullets(parts: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let bullets: Vec<String> = items.iter().map(|i| format!("- {}", i)).collect();
    parts.push(format!("## {}\n{}", heading, bullets.join("\n")));
}

fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strings and numbers as text; everything else is not a scalar.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(scalar_text))
}

fn num_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k) {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// A list of strings or `{name: ...}` objects.
fn list_field(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(o) => str_field(o, &["name", "title", "value"]),
                    other => scalar_text(other),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn read_images(value: Option<&Value>) -> Vec<ImageRef> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(ImageRef { url: url.clone(), alt: None, title: None }),
            Value::Object(o) => {
                let url = str_field(o, &["url", "src", "image_url"])?;
                Some(ImageRef {
                    url,
                    alt: str_field(o, &["alt", "title"]),
                    title: str_field(o, &["title"]),
                })
            }
            _ => None,
        })
        .filter(|img| !img.url.trim().is_empty())
        .take(MAX_IMAGES)
        .collect()
}

fn read_links(value: Option<&Value>) -> Vec<LinkRef> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(LinkRef { url: url.clone(), text: None }),
            Value::Object(o) => Some(LinkRef {
                url: str_field(o, &["url", "href"])?,
                text: str_field(o, &["text", "title"]),
            }),
            _ => None,
        })
        .take(MAX_LINKS)
        .collect()
}

fn read_videos(value: Option<&Value>) -> Vec<VideoRef> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(VideoRef { url: url.clone(), title: None, thumbnail: None }),
            Value::Object(o) => Some(VideoRef {
                url: str_field(o, &["url", "src"])?,
                title: str_field(o, &["title"]),
                thumbnail: str_field(o, &["thumbnail", "thumbnail_url"]),
            }),
            _ => None,
        })
        .collect()
}
