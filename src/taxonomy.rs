//! The fixed section taxonomy shared with downstream comparison/reporting.
//!
//! Slugs are an external contract: renaming one is a breaking change.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug)]
pub struct SectionKind {
    pub slug: &'static str,
    pub display_name: &'static str,
}

pub static TAXONOMY: [SectionKind; 21] = [
    SectionKind { slug: "hero_media", display_name: "Hero Media" },
    SectionKind { slug: "property_overview", display_name: "Property Overview" },
    SectionKind { slug: "address_core_details", display_name: "Address & Core Details" },
    SectionKind { slug: "room_types", display_name: "Room Types" },
    SectionKind { slug: "pricing", display_name: "Pricing" },
    SectionKind { slug: "offers_deals", display_name: "Offers & Deals" },
    SectionKind { slug: "amenities", display_name: "Amenities" },
    SectionKind { slug: "bills_included", display_name: "Bills Included" },
    SectionKind { slug: "location_transport", display_name: "Location & Transport" },
    SectionKind { slug: "nearby_places", display_name: "Nearby Places" },
    SectionKind { slug: "payment_options", display_name: "Payment Options" },
    SectionKind { slug: "booking_process", display_name: "Booking Process" },
    SectionKind { slug: "cancellation_policies", display_name: "Cancellation Policies" },
    SectionKind { slug: "trust_badges", display_name: "Trust Badges" },
    SectionKind { slug: "faqs", display_name: "FAQs" },
    SectionKind { slug: "reviews_ratings", display_name: "Reviews & Ratings" },
    SectionKind { slug: "contact_support", display_name: "Contact & Support" },
    SectionKind { slug: "similar_properties", display_name: "Similar Properties" },
    SectionKind { slug: "highlights", display_name: "Highlights" },
    SectionKind { slug: "safety_security", display_name: "Safety & Security" },
    SectionKind { slug: "company_info", display_name: "Company Info" },
];

static BY_SLUG: LazyLock<HashMap<&'static str, &'static SectionKind>> =
    LazyLock::new(|| TAXONOMY.iter().map(|k| (k.slug, k)).collect());

/// Slug produced when a heading mentions both bills and payments.
pub const BILLS_AND_PAYMENTS: &str = "bills_and_payments";

/// Maps a heading to a slug when its lowercased text contains any of `any`,
/// contains every one of `all`, and none of `none`.
pub struct HeadingRule {
    pub slug: &'static str,
    pub any: &'static [&'static str],
    pub all: &'static [&'static str],
    pub none: &'static [&'static str],
}

impl HeadingRule {
    pub fn matches(&self, lower: &str) -> bool {
        (self.any.is_empty() || self.any.iter().any(|kw| lower.contains(kw)))
            && self.all.iter().all(|kw| lower.contains(kw))
            && !self.none.iter().any(|kw| lower.contains(kw))
    }
}

const fn rule(slug: &'static str, any: &'static [&'static str]) -> HeadingRule {
    HeadingRule { slug, any, all: &[], none: &[] }
}

/// Evaluated top-down; the first match wins.
pub static HEADING_RULES: &[HeadingRule] = &[
    rule("amenities", &["amenities", "amenity", "facilities"]),
    rule("room_types", &["room types", "room type"]),
    rule("pricing", &["pricing", "price", "fees"]),
    rule("faqs", &["faq", "question"]),
    rule("property_overview", &["about", "overview"]),
    rule("location_transport", &["location", "commute"]),
    rule("nearby_places", &["nearby", "surrounding"]),
    HeadingRule { slug: BILLS_AND_PAYMENTS, any: &[], all: &["bills", "payment"], none: &[] },
    rule("bills_included", &["bills"]),
    HeadingRule {
        slug: "payment_options",
        any: &["payment", "policies"],
        all: &[],
        none: &["cancellation"],
    },
    rule("cancellation_policies", &["cancellation", "cancel"]),
    rule("offers_deals", &["offer", "deal", "promotion", "promo"]),
    rule("reviews_ratings", &["review", "rating"]),
    rule("contact_support", &["contact", "support"]),
    rule("highlights", &["highlight", "feature"]),
    rule("safety_security", &["safety", "security"]),
    rule("booking_process", &["booking", "how to book", "reserve"]),
    rule("trust_badges", &["award", "verified", "badge", "trust"]),
    rule("company_info", &["company", "operator", "managed by"]),
    rule("address_core_details", &["address", "property details", "key details"]),
    rule("similar_properties", &["similar"]),
    rule("hero_media", &["gallery", "photos", "video", "media"]),
];

pub fn lookup(slug: &str) -> Option<&'static SectionKind> {
    BY_SLUG.get(slug).copied()
}

pub fn is_canonical(slug: &str) -> bool {
    BY_SLUG.contains_key(slug)
}

/// Map a heading to a taxonomy slug, or slugify it when no rule matches.
/// Returns `None` when the heading has nothing left after slugifying.
pub fn infer_slug(heading: &str) -> Option<String> {
    let lower = heading.to_lowercase();
    if let Some(rule) = HEADING_RULES.iter().find(|r| r.matches(&lower)) {
        return Some(rule.slug.to_string());
    }
    let slug = slugify(heading);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Lowercase, drop non-word characters, join words with underscores.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn display_name_for(slug: &str) -> String {
    match lookup(slug) {
        Some(kind) => kind.display_name.to_string(),
        None => slug
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_has_unique_slugs() {
        assert_eq!(BY_SLUG.len(), 21);
        for kind in &TAXONOMY {
            assert_eq!(slugify(kind.slug), kind.slug);
        }
    }

    #[test]
    fn heading_rules_in_priority_order() {
        assert_eq!(infer_slug("Features & Amenities").as_deref(), Some("amenities"));
        assert_eq!(infer_slug("Room Types").as_deref(), Some("room_types"));
        assert_eq!(infer_slug("Prices and Fees").as_deref(), Some("pricing"));
        assert_eq!(infer_slug("Frequently Asked Questions").as_deref(), Some("faqs"));
        assert_eq!(infer_slug("About 1Ten").as_deref(), Some("property_overview"));
        assert_eq!(infer_slug("Location & Commute").as_deref(), Some("location_transport"));
        assert_eq!(infer_slug("What's Nearby").as_deref(), Some("nearby_places"));
        assert_eq!(infer_slug("Bills and Payments").as_deref(), Some(BILLS_AND_PAYMENTS));
        assert_eq!(infer_slug("Bills Included").as_deref(), Some("bills_included"));
        assert_eq!(infer_slug("Payment Policies (2)").as_deref(), Some("payment_options"));
        assert_eq!(infer_slug("Cancellation Policies (3)").as_deref(), Some("cancellation_policies"));
        assert_eq!(infer_slug("Offers (1)").as_deref(), Some("offers_deals"));
        assert_eq!(infer_slug("Reviews").as_deref(), Some("reviews_ratings"));
        assert_eq!(infer_slug("Contact Us").as_deref(), Some("contact_support"));
    }

    #[test]
    fn first_match_wins() {
        // "amenities" outranks "pricing"
        assert_eq!(infer_slug("Amenities and Prices").as_deref(), Some("amenities"));
    }

    #[test]
    fn unmatched_heading_is_slugified() {
        assert_eq!(infer_slug("Move-In Day: What to Bring!").as_deref(), Some("movein_day_what_to_bring"));
        assert_eq!(infer_slug("***"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name_for("faqs"), "FAQs");
        assert_eq!(display_name_for("move_in_day"), "Move In Day");
    }
}
