use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::input::scalar_text;
use crate::record::Contact;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static LABELLED_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:phone|tel|telephone|call|mobile|whatsapp)\b\s*[:.]?\s*(\+?\d[\d \t().-]{6,}\d)").unwrap()
});
static INTL_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+\d[\d \t().-]{6,}\d").unwrap());

const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// `logo@2x.png` looks like an address to the regex.
const NOT_EMAIL_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

pub fn extract(bag: &Map<String, Value>, text: &str) -> Option<Contact> {
    let email = email_in_text(text).or_else(|| bag_value(bag, "emails", "email"));
    let phone = phone_in_text(text).or_else(|| bag_value(bag, "phones", "phone"));
    if email.is_none() && phone.is_none() {
        return None;
    }
    Some(Contact { email, phone })
}

pub fn email_in_text(text: &str) -> Option<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.'))
        .find(|e| {
            let lower = e.to_ascii_lowercase();
            !NOT_EMAIL_SUFFIXES.iter().any(|ext| lower.ends_with(ext))
        })
        .map(str::to_string)
}

/// A labelled number (`Phone: ...`) first, then any `+`-prefixed number.
pub fn phone_in_text(text: &str) -> Option<String> {
    let labelled = LABELLED_PHONE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    let international = INTL_PHONE_RE.find_iter(text).map(|m| m.as_str());
    labelled
        .chain(international)
        .map(str::trim)
        .find(|p| (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digit_count(p)))
        .map(str::to_string)
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

/// `owner.<list>[0]`, then the top-level `<key>`.
fn bag_value(bag: &Map<String, Value>, list: &str, key: &str) -> Option<String> {
    bag.get("owner")
        .and_then(|o| o.get(list))
        .and_then(Value::as_array)
        .and_then(|items| items.iter().find_map(scalar_text))
        .or_else(|| bag.get(key).and_then(scalar_text))
}
