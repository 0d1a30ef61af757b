pub mod contact;
pub mod media;
pub mod pricing;

use crate::config::NormalizerConfig;
use crate::input::RawInput;
use crate::record::{Contact, ImageRef, Pricing, VideoRef};

pub struct ExtractedData {
    pub pricing: Option<Pricing>,
    pub contact: Option<Contact>,
    pub images: Vec<ImageRef>,
    pub videos: Vec<VideoRef>,
}

/// Record-level fields that live outside any one section.
pub fn extract_all(input: &RawInput, text: &str, cfg: &NormalizerConfig) -> ExtractedData {
    ExtractedData {
        pricing: pricing::extract(&input.metadata, text, &cfg.default_currency),
        contact: contact::extract(&input.metadata, text),
        images: media::images(&input.images, text),
        videos: media::videos(&input.videos, text),
    }
}

// ── Tests ──
