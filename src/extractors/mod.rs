// src/extractors/mod.rs
pub mod catalog;
pub mod heading;
pub mod normalize;
pub mod section;

// Re-export key extraction types for convenience
pub use catalog::{CatalogEntry, SectionCatalog};
pub use heading::{HeadingMatch, HeadingMatcher, LineKind, LineScan};
pub use normalize::normalize;
pub use section::{CapturedText, ExtractedSection, ExtractedSections, SectionExtractor, NOT_FOUND};
