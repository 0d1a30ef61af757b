use std::collections::BTreeSet;

use crate::record::CanonicalRecord;

use super::fields::UNKNOWN_PROPERTY;

const SECTION_WEIGHT: f64 = 0.40;
const WORD_WEIGHT: f64 = 0.30;
const SIGNAL_WEIGHT: f64 = 0.10;

/// Section count at which the section component saturates.
const SECTION_SATURATION: usize = 8;
/// Word count at which the word component saturates.
const WORD_SATURATION: usize = 1500;

const LOW_SECTION_COUNT: usize = 3;
const LOW_WORD_COUNT: usize = 100;

pub const INSUFFICIENT_CONTENT: &str = "insufficient_content";

/// Score in [0, 1], monotone in section count, word count and each of
/// pricing/contact/location being present.
pub fn confidence(record: &CanonicalRecord) -> f64 {
    let sections = record.sections.len().min(SECTION_SATURATION) as f64 / SECTION_SATURATION as f64;
    let words = record.total_word_count().min(WORD_SATURATION) as f64 / WORD_SATURATION as f64;
    let signals = [
        record.pricing.is_some(),
        record.contact.is_some(),
        record.location.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count() as f64;

    let score = SECTION_WEIGHT * sections + WORD_WEIGHT * words + SIGNAL_WEIGHT * signals;
    round4(score.clamp(0.0, 1.0))
}

pub fn quality_flags(record: &CanonicalRecord, default_url: &str) -> BTreeSet<String> {
    let mut flags = BTreeSet::new();
    let mut flag = |name: &str, on: bool| {
        if on {
            flags.insert(name.to_string());
        }
    };

    let sections = record.sections.len();
    flag("no_sections_found", sections == 0);
    flag("low_section_count", sections > 0 && sections < LOW_SECTION_COUNT);
    flag("low_word_count", record.total_word_count() < LOW_WORD_COUNT);
    flag("no_pricing_found", record.pricing.is_none());
    flag("no_contact_found", record.contact.is_none());
    flag("no_location_found", record.location.is_none());
    flag("default_url", record.url == default_url);
    flag("unknown_property_name", record.property_name == UNKNOWN_PROPERTY);

    flags
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Contact, Pricing, SectionRecord, SourceKind};

    fn record(sections: usize, words_per_section: usize) -> CanonicalRecord {
        CanonicalRecord {
            source_kind: SourceKind::Markdown,
            property_name: "Sterling Court".into(),
            url: "https://listings.test/sterling-court".into(),
            provider: None,
            location: None,
            sections: (0..sections)
                .map(|i| SectionRecord {
                    slug: format!("section_{}", i),
                    display_name: format!("Section {}", i),
                    content: vec!["word"; words_per_section].join(" "),
                    items: Vec::new(),
                })
                .collect(),
            pricing: None,
            contact: None,
            images: Vec::new(),
            videos: Vec::new(),
            confidence_score: 0.0,
            quality_flags: BTreeSet::new(),
        }
    }

    #[test]
    fn empty_record_scores_zero() {
        assert_eq!(confidence(&record(0, 0)), 0.0);
    }

    #[test]
    fn saturated_record_scores_one() {
        let mut r = record(10, 200);
        r.location = Some("Wembley, London".into());
        r.pricing = Some(Pricing {
            currency: "GBP".into(),
            min_price: Some(289.0),
            max_price: Some(415.0),
            price_unit: "weekly".into(),
        });
        r.contact = Some(Contact { email: Some("hi@iq.test".into()), phone: None });
        assert_eq!(confidence(&r), 1.0);
    }

    #[test]
    fn monotone_in_sections_and_words() {
        let mut last = -1.0;
        for n in 0..10 {
            let score = confidence(&record(n, 20));
            assert!(score >= last, "{} < {} at {} sections", score, last, n);
            last = score;
        }
        assert!(confidence(&record(2, 300)) > confidence(&record(2, 30)));
    }

    #[test]
    fn signals_add_a_tenth_each() {
        let base = record(4, 10);
        let mut located = base.clone();
        located.location = Some("Edmonton".into());
        let delta = confidence(&located) - confidence(&base);
        assert!((delta - 0.1).abs() < 1e-9);
    }

    #[test]
    fn rounded_to_four_places() {
        let score = confidence(&record(1, 7));
        assert_eq!(score, (score * 10_000.0).round() / 10_000.0);
    }

    #[test]
    fn flags_for_sparse_record() {
        let mut r = record(1, 5);
        r.url = "https://example.com".into();
        r.property_name = UNKNOWN_PROPERTY.into();
        let flags = quality_flags(&r, "https://example.com");
        let expected: BTreeSet<String> = [
            "default_url",
            "low_section_count",
            "low_word_count",
            "no_contact_found",
            "no_location_found",
            "no_pricing_found",
            "unknown_property_name",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(flags, expected);
    }

    #[test]
    fn no_sections_flag_replaces_low_count() {
        let flags = quality_flags(&record(0, 0), "https://example.com");
        assert!(flags.contains("no_sections_found"));
        assert!(!flags.contains("low_section_count"));
    }
}
