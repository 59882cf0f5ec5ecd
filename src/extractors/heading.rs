// src/extractors/heading.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::catalog::{CatalogEntry, SectionCatalog};
use crate::extractors::normalize::normalize;

// "4.1", "4.1 Indicazioni", "4.1. Indicazioni", "4.1 - Indicazioni".
// A digit right after the id ("4.10") means it is not a section number.
static SECTION_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d\.\d)(?:[.\-\s]*(\D.*))?$").expect("Failed to compile SECTION_NUMBER_RE")
});

/// A confirmed section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch<'c> {
    /// Catalog position of the section.
    pub index: usize,
    pub id: &'c str,
    /// Lines taken up by the heading: 1 when the title shares the id's line,
    /// 2 when it sits on the following line.
    pub consumed: usize,
}

/// How a single line looks to the capture engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'c> {
    Heading(HeadingMatch<'c>),
    /// Starts with a section number but is not a confirmed heading.
    /// `index` is the catalog position when the number is a known id.
    Numbered { index: Option<usize> },
    Content,
}

/// Recognizes section headings against a catalog.
pub struct HeadingMatcher<'c> {
    catalog: &'c SectionCatalog,
}

impl<'c> HeadingMatcher<'c> {
    pub fn new(catalog: &'c SectionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c SectionCatalog {
        self.catalog
    }

    /// Returns the heading starting at `line`, if any.
    ///
    /// The id must be in the catalog and the entry's title key must appear in
    /// the normalized title text, taken from the rest of `line` or, when
    /// `line` carries only the number, from `next_line`.
    pub fn try_match(&self, line: &str, next_line: Option<&str>) -> Option<HeadingMatch<'c>> {
        match self.classify(line, next_line) {
            LineKind::Heading(heading) => Some(heading),
            _ => None,
        }
    }

    pub fn classify(&self, line: &str, next_line: Option<&str>) -> LineKind<'c> {
        let Some((id, fragment)) = split_section_number(line) else {
            return LineKind::Content;
        };

        let Some(index) = self.catalog.position(id) else {
            tracing::trace!("Ignoring unknown section number '{}' in line '{}'", id, line);
            return LineKind::Numbered { index: None };
        };
        let entry = &self.catalog.entries()[index];

        let consumed = match (fragment, next_line) {
            (Some(title), _) if title_matches(entry, title) => Some(1),
            (None, Some(next)) if title_matches(entry, next) => Some(2),
            _ => None,
        };

        match consumed {
            Some(consumed) => {
                tracing::debug!("Confirmed heading for section {} ({} line(s)): '{}'", entry.id(), consumed, line);
                LineKind::Heading(HeadingMatch { index, id: entry.id(), consumed })
            }
            None => {
                tracing::trace!("Section number {} found but title did not match: '{}'", entry.id(), line);
                LineKind::Numbered { index: Some(index) }
            }
        }
    }

    /// Walks `lines` in order, yielding each classification together with the
    /// lines it covers (two for a heading whose title sits on the next line).
    pub fn scan<'m, 'l, S: AsRef<str>>(&'m self, lines: &'l [S]) -> LineScan<'m, 'c, 'l, S> {
        LineScan { matcher: self, lines, pos: 0 }
    }
}

/// Iterator returned by [`HeadingMatcher::scan`].
pub struct LineScan<'m, 'c, 'l, S> {
    matcher: &'m HeadingMatcher<'c>,
    lines: &'l [S],
    pos: usize,
}

impl<'m, 'c, 'l, S: AsRef<str>> Iterator for LineScan<'m, 'c, 'l, S> {
    type Item = (LineKind<'c>, &'l [S]);

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.get(self.pos)?.as_ref();
        let next_line = self.lines.get(self.pos + 1).map(|l| l.as_ref());

        let kind = self.matcher.classify(line, next_line);
        let step = match kind {
            LineKind::Heading(heading) => heading.consumed,
            _ => 1,
        };

        let covered = &self.lines[self.pos..self.pos + step];
        self.pos += step;
        Some((kind, covered))
    }
}

/// Splits a line into its section number and trimmed, non-empty title fragment.
pub fn split_section_number(line: &str) -> Option<(&str, Option<&str>)> {
    let caps = SECTION_NUMBER_RE.captures(line.trim())?;
    let id = caps.get(1)?.as_str();
    let fragment = caps
        .get(2)
        .map(|m| m.as_str().trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '-'))
        .filter(|text| !text.is_empty());
    Some((id, fragment))
}

fn title_matches(entry: &CatalogEntry, text: &str) -> bool {
    normalize(text).contains(entry.title_key())
}
