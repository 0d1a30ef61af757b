use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::record::Pricing;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\b(?P<code>GBP|USD|EUR|CAD|AUD|INR)\s?(?P<csym>[£$€₹])?|(?P<sym>[£$€₹]))\s?(?P<amt>\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)",
    )
    .unwrap()
});
static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<week>per\s+week|/\s*(?:week|wk)\b|\bpw\b|\bweekly\b)|(?P<month>per\s+month|/\s*(?:month|mo)\b|\bpcm\b|\bmonthly\b)|(?P<night>per\s+night|/\s*night\b|\bnightly\b)",
    )
    .unwrap()
});
/// Amounts on these lines are discounts or deposits, not rent.
static NOT_RENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(off|discount|cashback|save|voucher|deposit|referral)\b").unwrap()
});

const DEFAULT_UNIT: &str = "monthly";

/// Structured `pricing` object first, then currency-marked amounts in text.
pub fn extract(bag: &Map<String, Value>, text: &str, default_currency: &str) -> Option<Pricing> {
    from_bag(bag, default_currency).or_else(|| from_text(text, default_currency))
}

fn from_bag(bag: &Map<String, Value>, default_currency: &str) -> Option<Pricing> {
    let pricing = bag.get("pricing")?.as_object()?;
    let min_price = number(pricing, &["min_price", "minPrice"]);
    let max_price = number(pricing, &["max_price", "maxPrice"]);
    if min_price.is_none() && max_price.is_none() {
        return None;
    }
    let currency = pricing
        .get("currency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| default_currency.to_string());
    let price_unit = ["duration", "price_unit"]
        .iter()
        .find_map(|k| pricing.get(*k).and_then(Value::as_str))
        .map(normalize_unit)
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());

    Some(Pricing { currency, min_price, max_price, price_unit })
}

fn from_text(text: &str, default_currency: &str) -> Option<Pricing> {
    let mut currency = None;
    let mut amounts = Vec::new();

    for line in text.lines().filter(|l| !NOT_RENT_RE.is_match(l)) {
        for caps in PRICE_RE.captures_iter(line) {
            let Some(amount) = parse_amount(&caps["amt"]).filter(|a| *a > 0.0) else {
                continue;
            };
            if currency.is_none() {
                currency = Some(match (caps.name("code"), caps.name("csym").or(caps.name("sym"))) {
                    (Some(code), _) => code.as_str().to_string(),
                    (None, Some(sym)) => symbol_currency(sym.as_str(), default_currency),
                    (None, None) => default_currency.to_string(),
                });
            }
            amounts.push(amount);
        }
    }

    if amounts.is_empty() {
        return None;
    }
    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Pricing {
        currency: currency.unwrap_or_else(|| default_currency.to_string()),
        min_price: Some(min),
        max_price: Some(max),
        price_unit: unit_cue(text).unwrap_or(DEFAULT_UNIT).to_string(),
    })
}

fn symbol_currency(sym: &str, default_currency: &str) -> String {
    match sym {
        "£" => "GBP".into(),
        "€" => "EUR".into(),
        "₹" => "INR".into(),
        _ => default_currency.to_string(),
    }
}

/// First billing-period cue in document order.
fn unit_cue(text: &str) -> Option<&'static str> {
    let caps = UNIT_RE.captures(text)?;
    if caps.name("week").is_some() {
        Some("weekly")
    } else if caps.name("month").is_some() {
        Some("monthly")
    } else {
        Some("nightly")
    }
}

fn normalize_unit(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_UNIT.to_string();
    }
    // bare period names carry no "per"/"/" prefix
    let probe = format!("per {}", raw.trim_start_matches("per ").trim_start_matches('/'));
    unit_cue(&probe).or_else(|| unit_cue(raw)).map(str::to_string).unwrap_or_else(|| raw.to_lowercase())
}

fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    })
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn structured_pricing_wins() {
        let b = bag(json!({"pricing": {"currency": "gbp", "min_price": 289, "maxPrice": "415", "duration": "week"}}));
        let p = extract(&b, "From $9 per night", "USD").unwrap();
        assert_eq!(p.currency, "GBP");
        assert_eq!(p.min_price, Some(289.0));
        assert_eq!(p.max_price, Some(415.0));
        assert_eq!(p.price_unit, "weekly");
    }

    #[test]
    fn text_amounts_min_max() {
        let text = "Rooms from CAD $1,049 /month\nStudio: $1,349 per month\nGet $200 off your first month";
        let p = extract(&Map::new(), text, "USD").unwrap();
        assert_eq!(p.currency, "CAD");
        assert_eq!(p.min_price, Some(1049.0));
        assert_eq!(p.max_price, Some(1349.0));
        assert_eq!(p.price_unit, "monthly");
    }

    #[test]
    fn symbol_currencies() {
        let p = extract(&Map::new(), "En-suite £189 pw, studio £240.50 pw", "USD").unwrap();
        assert_eq!(p.currency, "GBP");
        assert_eq!(p.min_price, Some(189.0));
        assert_eq!(p.max_price, Some(240.5));
        assert_eq!(p.price_unit, "weekly");

        let p = extract(&Map::new(), "Only $45", "AUD").unwrap();
        assert_eq!(p.currency, "AUD");
        assert_eq!(p.price_unit, "monthly");
    }

    #[test]
    fn no_amounts_no_pricing() {
        assert!(extract(&Map::new(), "Contact us for prices. 24 rooms available.", "USD").is_none());
        let b = bag(json!({"pricing": {"currency": "GBP"}}));
        assert!(extract(&b, "", "USD").is_none());
    }

    #[test]
    fn units_normalized() {
        assert_eq!(normalize_unit("weekly"), "weekly");
        assert_eq!(normalize_unit("month"), "monthly");
        assert_eq!(normalize_unit("/night"), "nightly");
        assert_eq!(normalize_unit("Semester"), "semester");
    }
}
