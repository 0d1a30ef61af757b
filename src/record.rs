use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Json,
    Markdown,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub alt: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub url: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub url: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub currency: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub slug: String,
    pub display_name: String,
    pub content: String,
    pub items: Vec<String>,
}

/// The normalized, schema-stable output for one listing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub source_kind: SourceKind,
    pub property_name: String,
    pub url: String,
    pub provider: Option<String>,
    pub location: Option<String>,
    pub sections: Vec<SectionRecord>,
    pub pricing: Option<Pricing>,
    pub contact: Option<Contact>,
    pub images: Vec<ImageRef>,
    pub videos: Vec<VideoRef>,
    pub confidence_score: f64,
    pub quality_flags: BTreeSet<String>,
}

impl CanonicalRecord {
    pub fn section(&self, slug: &str) -> Option<&SectionRecord> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    /// Words across all section contents.
    pub fn total_word_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.content.split_whitespace().count())
            .sum()
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
