// src/extractors/section.rs

// --- Imports ---
use std::fmt;

use crate::extractors::catalog::SectionCatalog;
use crate::extractors::heading::{HeadingMatcher, LineKind};

// --- Constants ---
/// Placeholder reported for a section that never appeared in the document.
pub const NOT_FOUND: &str = "Not found";

// --- Data Structures ---
/// Body text of one section after post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedText {
    Found(String),
    NotFound,
}

impl CapturedText {
    pub fn as_str(&self) -> &str {
        match self {
            CapturedText::Found(text) => text,
            CapturedText::NotFound => NOT_FOUND,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CapturedText::Found(_))
    }
}

impl fmt::Display for CapturedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub section_id: String,    // e.g., "4.1"
    pub section_title: String, // canonical title from the catalog
    pub content: CapturedText,
}

/// Result of one scan: exactly one entry per catalog section, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSections {
    sections: Vec<ExtractedSection>,
}

impl ExtractedSections {
    pub fn get(&self, id: &str) -> Option<&CapturedText> {
        self.sections
            .iter()
            .find(|section| section.section_id == id)
            .map(|section| &section.content)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractedSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn found_count(&self) -> usize {
        self.sections.iter().filter(|s| s.content.is_found()).count()
    }
}

/// Where the scan currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    /// Appending to the buffer of the section at this catalog position.
    Capturing(usize),
}

// --- Main Extractor Structure ---
pub struct SectionExtractor<'c> {
    matcher: HeadingMatcher<'c>,
}

impl<'c> SectionExtractor<'c> {
    pub fn new(catalog: &'c SectionCatalog) -> Self {
        Self { matcher: HeadingMatcher::new(catalog) }
    }

    pub fn matcher(&self) -> &HeadingMatcher<'c> {
        &self.matcher
    }

    /// Scans the lines of one document and returns the body of every catalog
    /// section.
    ///
    /// Lines are expected trimmed and free of page boilerplate. The scan never
    /// fails: documents without recognizable headings yield `NotFound` for
    /// every section.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> ExtractedSections {
        let catalog = self.matcher.catalog();
        let mut buffers = vec![String::new(); catalog.len()];
        let mut state = ScanState::Idle;
        for (kind, covered) in self.matcher.scan(lines) {
            match kind {
                LineKind::Heading(heading) => state = ScanState::Capturing(heading.index),
                LineKind::Numbered { index: Some(index) } => {
                    if let ScanState::Capturing(open) = state {
                        if open != index {
                            tracing::debug!(
                                "Section {} interrupted by unconfirmed heading '{}'",
                                catalog.entries()[open].id(),
                                covered[0].as_ref()
                            );
                            state = ScanState::Idle;
                        }
                    }
                }
                // Unknown numbers never break a capture and are never body text.
                LineKind::Numbered { index: None } => {}
                LineKind::Content => {
                    if let ScanState::Capturing(open) = state {
                        buffers[open].push(' ');
                        buffers[open].push_str(covered[0].as_ref());
                    }
                }
            }
        }

        let sections = catalog
            .entries()
            .iter()
            .zip(buffers)
            .map(|(entry, buffer)| ExtractedSection {
                section_id: entry.id().to_string(),
                section_title: entry.title().to_string(),
                content: post_process(&buffer),
            })
            .collect::<Vec<_>>();

        let result = ExtractedSections { sections };
        tracing::debug!("Scanned {} lines, found {}/{} sections", lines.len(), result.found_count(), result.len());
        result
    }
}

/// Collapses whitespace runs to single spaces; empty text becomes `NotFound`.
pub fn post_process(raw: &str) -> CapturedText {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        CapturedText::NotFound
    } else {
        CapturedText::Found(collapsed)
    }
}
