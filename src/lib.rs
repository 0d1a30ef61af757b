//! Normalizes scraped property-listing documents (JSON, markdown or plain
//! text) into a fixed-schema `CanonicalRecord`.
//!
//! The engine is pure: no I/O, no shared mutable state. Two documents can be
//! normalized on separate threads with no coordination.

pub mod config;
pub mod error;
pub mod input;
pub mod parser;
pub mod record;
pub mod taxonomy;

pub use config::NormalizerConfig;
pub use error::NormalizeError;
pub use input::{parse_input, InputFormat, RawInput};
pub use parser::normalize;
pub use record::{CanonicalRecord, Contact, ImageRef, LinkRef, Pricing, SectionRecord, SourceKind, VideoRef};

/// Read `raw` in `format` and normalize it.
pub fn normalize_str(
    raw: &str,
    format: InputFormat,
    cfg: &NormalizerConfig,
) -> Result<CanonicalRecord, NormalizeError> {
    let input = parse_input(raw, format)?;
    Ok(normalize(&input, cfg))
}
