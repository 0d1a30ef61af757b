pub mod blocks;
pub mod extract;
pub mod fields;
pub mod items;
pub mod merge;
pub mod noise;
pub mod scoring;
pub mod sections;

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::NormalizerConfig;
use crate::input::RawInput;
use crate::record::{CanonicalRecord, SectionRecord};
use crate::taxonomy;
use sections::CandidateSection;

/// Single pass over one document:
/// noise → blocks → fields → segments → merge → extraction → score.
pub fn normalize(input: &RawInput, cfg: &NormalizerConfig) -> CanonicalRecord {
    let text = noise::remove_navigation_noise(&input.text, &cfg.extra_noise_keywords);
    let blocks = blocks::classify_lines(&text);
    let fields = fields::resolve(input, &text, &blocks, &cfg.default_url);

    let chars = input.text.trim().chars().count();
    if chars < cfg.min_text_chars {
        warn!(chars, min = cfg.min_text_chars, name = %fields.property_name, "insufficient content, returning empty record");
        let mut record = CanonicalRecord {
            source_kind: input.source_kind,
            property_name: fields.property_name,
            url: fields.url,
            provider: fields.provider,
            location: None,
            sections: Vec::new(),
            pricing: None,
            contact: None,
            images: Vec::new(),
            videos: Vec::new(),
            confidence_score: 0.0,
            quality_flags: BTreeSet::new(),
        };
        record.quality_flags = scoring::quality_flags(&record, &cfg.default_url);
        record.quality_flags.insert(scoring::INSUFFICIENT_CONTENT.to_string());
        return record;
    }

    let candidates = sections::segment(&text, &blocks);
    debug!(candidates = candidates.len(), "segmented");
    let merged = merge::merge_sections(candidates);
    let extracted = extract::extract_all(input, &text, cfg);

    let mut record = CanonicalRecord {
        source_kind: input.source_kind,
        property_name: fields.property_name,
        url: fields.url,
        provider: fields.provider,
        location: fields.location,
        sections: merged.into_iter().map(to_record).collect(),
        pricing: extracted.pricing,
        contact: extracted.contact,
        images: extracted.images,
        videos: extracted.videos,
        confidence_score: 0.0,
        quality_flags: BTreeSet::new(),
    };
    record.confidence_score = scoring::confidence(&record);
    record.quality_flags = scoring::quality_flags(&record, &cfg.default_url);

    info!(
        name = %record.property_name,
        sections = record.sections.len(),
        words = record.total_word_count(),
        confidence = record.confidence_score,
        "normalized listing"
    );
    record
}

/// Taxonomy slugs carry their canonical display name; fallback slugs keep
/// the heading they came from.
fn to_record(section: CandidateSection) -> SectionRecord {
    let display_name = match (taxonomy::lookup(&section.slug), section.display_heading) {
        (Some(kind), _) => kind.display_name.to_string(),
        (None, Some(heading)) => heading,
        (None, None) => taxonomy::display_name_for(&section.slug),
    };
    SectionRecord {
        slug: section.slug,
        display_name,
        content: section.content,
        items: section.items,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{parse_input, InputFormat};

    fn run(fixture: &str) -> CanonicalRecord {
        let raw = std::fs::read_to_string(format!("tests/fixtures/{}", fixture)).unwrap();
        let input = parse_input(&raw, InputFormat::Auto).unwrap();
        normalize(&input, &NormalizerConfig::default())
    }

    #[test]
    fn whyte_record() {
        let r = run("1ten_on_whyte.md");
        assert_eq!(r.property_name, "1Ten On Whyte - Student Living");
        assert_eq!(r.url, "https://amberstudent.com/property/1ten-on-whyte");
        assert_eq!(r.location.as_deref(), Some("10110 82 Ave NW, Edmonton, AB"));

        let slugs: Vec<&str> = r.sections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "property_overview",
                "amenities",
                "bills_included",
                "room_types",
                "payment_options",
                "cancellation_policies",
                "offers_deals",
                "faqs",
                "hero_media",
                "contact_support",
            ]
        );
        assert_eq!(
            r.section("amenities").unwrap().items,
            vec!["Gym", "Study Room", "Courtyard", "Boardroom", "On-Site Laundry", "Study Lounge"]
        );
        assert_eq!(r.section("faqs").unwrap().items.len(), 3);
        assert_eq!(r.section("faqs").unwrap().display_name, "FAQs");
        assert!(r.quality_flags.is_empty(), "{:?}", r.quality_flags);
        assert!(r.confidence_score > 0.7);
    }

    #[test]
    fn sterling_court_record() {
        let r = run("sterling_court.json");
        assert_eq!(r.property_name, "iQ Sterling Court");
        assert_eq!(r.url, "https://www.iqstudentaccommodation.com/london/sterling-court");
        assert_eq!(r.provider.as_deref(), Some("iQ Student Accommodation"));
        assert_eq!(r.location.as_deref(), Some("Sterling Court, London, UK, HA9 0FE"));
        assert_eq!(r.section("amenities").unwrap().items.len(), 4);
        assert_eq!(r.section("room_types").unwrap().items, vec!["Bronze En-Suite", "Silver Studio", "Gold Studio"]);
        assert!(r.section("property_overview").is_some());
        assert!(r.pricing.is_some() && r.contact.is_some());
    }

    #[test]
    fn short_input_is_empty_record() {
        let input = RawInput::from_text(crate::record::SourceKind::Text, "Tiny flat, call us.");
        let r = normalize(&input, &NormalizerConfig::default());
        assert!(r.sections.is_empty());
        assert_eq!(r.confidence_score, 0.0);
        assert!(r.quality_flags.contains("insufficient_content"));
        assert_eq!(r.url, "https://example.com");
    }

    #[test]
    fn extra_noise_keywords_apply() {
        let md = "## Overview\nCookie Policy\nA bright studio flat next to the station with a private balcony.";
        let input = parse_input(md, InputFormat::Markdown).unwrap();
        let cfg = NormalizerConfig {
            extra_noise_keywords: vec!["Cookie Policy".into()],
            ..NormalizerConfig::default()
        };
        let r = normalize(&input, &cfg);
        assert!(!r.section("property_overview").unwrap().content.contains("Cookie"));
    }
}
