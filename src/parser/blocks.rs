use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static HEADING_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(\{[^}]*\}|#+)\s*$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*•+]\s+(.+)$").unwrap());
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]+)\)$").unwrap());
static SINGLE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[([^\]]*)\]\(([^)]+)\)$").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").unwrap());
static INLINE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());

/// One classified source line. `classify_lines` yields exactly one block per
/// line of input, so block indices double as line indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(String),
    Image { alt: String, url: String },
    Link { text: String, url: String },
    Text(String),
    Empty,
}

pub fn classify_lines(text: &str) -> Vec<Block> {
    text.lines().map(classify_line).collect()
}

pub fn classify_line(raw: &str) -> Block {
    let line = raw.trim();
    if line.is_empty() {
        return Block::Empty;
    }

    // ── Heading: ## text {#anchor} ──
    if let Some(caps) = HEADING_RE.captures(line) {
        let text = HEADING_ANCHOR_RE.replace(&caps[2], "");
        let text = strip_inline_markup(&text);
        if !text.is_empty() {
            return Block::Heading {
                level: caps[1].len() as u8,
                text,
            };
        }
    }

    // ── Bullet: - item / * item / • item ──
    if let Some(caps) = BULLET_RE.captures(line) {
        let item = caps[1].trim();
        if !item.chars().all(|c| c == '-' || c == '*') {
            return Block::Bullet(item.to_string());
        }
    }

    if let Some(caps) = IMAGE_RE.captures(line) {
        return Block::Image {
            alt: caps[1].trim().to_string(),
            url: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = SINGLE_LINK_RE.captures(line) {
        return Block::Link {
            text: caps[1].trim().to_string(),
            url: caps[2].trim().to_string(),
        };
    }

    Block::Text(line.to_string())
}

/// Drop `**bold**`, `__bold__` and `[text](url)` markup, keeping the text.
pub fn strip_inline_markup(s: &str) -> String {
    let s = INLINE_LINK_RE.replace_all(s, "$1");
    let s = BOLD_RE.replace_all(&s, "$1$2");
    s.trim().to_string()
}
