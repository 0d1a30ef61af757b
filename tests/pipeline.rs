use listing_normalizer::taxonomy;
use listing_normalizer::{normalize, normalize_str, CanonicalRecord, InputFormat, NormalizerConfig, RawInput, SourceKind};
use serde_json::json;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn run(raw: &str) -> CanonicalRecord {
    normalize_str(raw, InputFormat::Auto, &NormalizerConfig::default()).unwrap()
}

fn is_fallback_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[test]
fn slugs_are_canonical_or_well_formed() {
    let docs = [
        fixture("1ten_on_whyte.md"),
        fixture("sterling_court.json"),
        "## Move-In Day: What To Bring!\nPassport, the signed tenancy agreement and a photo for the key card.\n## Über Uns\nWir sind ein Studentenwohnheim in Berlin mit 200 Zimmern."
            .to_string(),
    ];
    for doc in &docs {
        for section in run(doc).sections {
            assert!(
                taxonomy::is_canonical(&section.slug)
                    || section.slug == taxonomy::BILLS_AND_PAYMENTS
                    || is_fallback_slug(&section.slug),
                "bad slug {:?}",
                section.slug
            );
        }
    }
}

#[test]
fn output_is_deterministic() {
    for doc in [fixture("1ten_on_whyte.md"), fixture("sterling_court.json")] {
        let a = serde_json::to_string(&run(&doc)).unwrap();
        let b = serde_json::to_string(&run(&doc)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn items_capped_and_unique() {
    let mut doc = String::from("## Amenities\n");
    for i in 0..120 {
        doc.push_str(&format!("- Amenity {}\n", i % 70));
    }
    let r = run(&doc);
    let items = &r.section("amenities").unwrap().items;
    assert_eq!(items.len(), 50);
    assert_eq!(items[0], "Amenity 0");
    assert_eq!(items[49], "Amenity 49");

    for section in run(&fixture("1ten_on_whyte.md")).sections {
        let mut seen = std::collections::HashSet::new();
        assert!(section.items.len() <= 50);
        assert!(section.items.iter().all(|i| seen.insert(i.clone())), "duplicate in {}", section.slug);
    }
}

#[test]
fn property_url_beats_cdn_asset() {
    let doc = "Logo: https://cdn.example.com/logo.svg\nSee the listing at https://example.com/property/123 for availability and photos.";
    let r = run(doc);
    assert_eq!(r.url, "https://example.com/property/123");
}

#[test]
fn structured_location_joined() {
    let input = RawInput::from_text(SourceKind::Text, "A furnished two bedroom flat a short walk from the main campus.")
        .with_location(json!({"city": "X", "state": "Y", "country": "Z"}));
    let r = normalize(&input, &NormalizerConfig::default());
    assert_eq!(r.location.as_deref(), Some("X, Y, Z"));
}

#[test]
fn alt_text_name_replaced() {
    let doc = "![gallery](https://cdn.test/1.jpg)\n## 1Ten On Whyte - Student Living\nFully furnished suites steps from the University of Alberta campus.";
    let input = listing_normalizer::parse_input(doc, InputFormat::Markdown)
        .unwrap()
        .with_name("1Ten on Whyte, Edmonton - Edmonton, Canada - 1 Bed 1 Bath - Bedroom");
    let r = normalize(&input, &NormalizerConfig::default());
    assert_eq!(r.property_name, "1Ten On Whyte - Student Living");
}

#[test]
fn flat_amenities_line_split() {
    let doc = "Welcome to the residence, a short walk from campus and the river valley.\nGym  Study Room Courtyard Boardroom  On-Site Laundry  Study Lounge\n";
    let r = run(doc);
    assert_eq!(
        r.section("amenities").unwrap().items,
        vec!["Gym", "Study Room", "Courtyard", "Boardroom", "On-Site Laundry", "Study Lounge"]
    );
}

#[test]
fn tiny_input_yields_empty_record() {
    let r = run("Two bed flat to let.");
    assert_eq!("Two bed flat to let.".chars().count(), 20);
    assert!(r.sections.is_empty());
    assert_eq!(r.confidence_score, 0.0);
    assert!(r.quality_flags.contains("insufficient_content"));
}

#[test]
fn malformed_declared_json_is_an_error() {
    let err = normalize_str("{\"name\": ", InputFormat::Json, &NormalizerConfig::default());
    assert!(err.is_err());
}

#[test]
fn richer_documents_score_higher() {
    let thin = run("## Overview\nA room in a shared house near the station, bills extra.");
    let full = run(&fixture("1ten_on_whyte.md"));
    assert!(full.confidence_score > thin.confidence_score);
    assert!((0.0..=1.0).contains(&full.confidence_score));
}

#[test]
fn prose_mentions_do_not_make_sections() {
    let doc = "## Amenities\nAll residents accept our payment policies at check-in, and enjoy:\n- Gym\n- Pool\n- Cinema\n\n## About\nHeated pool close to Gastown with Internet cafe and Waterfront views nearby, lovely.";
    let r = run(doc);
    assert_eq!(r.section("amenities").unwrap().items, vec!["Gym", "Pool", "Cinema"]);
    assert!(r.section("payment_options").is_none());
    assert!(r.section("bills_included").is_none());
}
