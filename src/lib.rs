// src/lib.rs
//! Section extraction for Italian drug leaflets (RCP).
//!
//! The core is [`SectionExtractor`]: it scans the text lines of one leaflet
//! and returns the body of every section listed in a [`SectionCatalog`].
//! The remaining modules are the pipeline around it: AIFA lookups and
//! downloads, PDF to text conversion, and storage of the labelled results.

pub mod aifa;
pub mod extractors;
pub mod pdf;
pub mod storage;
pub mod utils;

pub use extractors::{CapturedText, ExtractedSection, ExtractedSections, SectionCatalog, SectionExtractor, NOT_FOUND};
pub use utils::AppError;
