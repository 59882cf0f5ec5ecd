// src/extractors/catalog.rs
use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::extractors::normalize::title_key;
use crate::utils::error::{CatalogError, ExtractError};

/// Number of normalized title characters a heading must contain to be confirmed.
pub const TITLE_KEY_LEN: usize = 10;

/// Sections of an Italian RCP leaflet that the extractor looks for.
pub const ITALIAN_RCP_SECTIONS: &[(&str, &str)] = &[
    ("4.1", "Indicazioni terapeutiche"),
    ("4.2", "Posologia e modo di somministrazione"),
    ("4.3", "Controindicazioni"),
    ("4.4", "Avvertenze speciali e precauzioni d’impiego"),
    ("4.5", "Interazioni con altri medicinali"),
    ("4.6", "Fertilità, gravidanza e allattamento"),
    ("4.7", "Effetti sulla capacità di guidare veicoli"),
    ("4.8", "Effetti indesiderati"),
    ("4.9", "Sovradosaggio"),
    ("6.2", "Incompatibilità"),
];

/// One catalog row as written in a catalog JSON file.
#[derive(Debug, Deserialize)]
struct CatalogFileEntry {
    id: String,
    title: String,
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    id: String,
    title: String,
    title_key: String,
}

impl CatalogEntry {
    fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.trim().to_string(),
            title_key: title_key(title.trim(), TITLE_KEY_LEN),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalized title prefix used to confirm headings.
    pub fn title_key(&self) -> &str {
        &self.title_key
    }
}

/// Immutable, ordered mapping from section id to canonical title.
///
/// Built once and shared read-only by every scan; a different catalog (other
/// sections, other language) can be swapped in without touching the matcher.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    entries: Vec<CatalogEntry>,
}

impl SectionCatalog {
    /// Builds a catalog from `(id, title)` pairs, rejecting empty catalogs,
    /// malformed ids, blank titles and duplicates.
    pub fn new<I, A, B>(pairs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (id, title) in pairs {
            let id = id.as_ref().trim();
            let title = title.as_ref();

            if !is_section_id(id) {
                return Err(CatalogError::InvalidId(id.to_string()));
            }
            if title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(id.to_string()));
            }
            if !seen.insert(id.to_string()) {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
            entries.push(CatalogEntry::new(id, title));
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        tracing::debug!("Built section catalog with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// The built-in catalog for Italian RCP leaflets.
    pub fn italian_rcp() -> Self {
        Self {
            entries: ITALIAN_RCP_SECTIONS
                .iter()
                .map(|(id, title)| CatalogEntry::new(id, title))
                .collect(),
        }
    }

    /// Loads a catalog from a JSON array of `{"id": ..., "title": ...}` objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::CatalogFile(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ExtractError> {
        let rows: Vec<CatalogFileEntry> = serde_json::from_str(raw)
            .map_err(|e| ExtractError::CatalogFile(e.to_string()))?;
        let catalog = Self::new(rows.into_iter().map(|row| (row.id, row.title)))?;
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed catalog; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `id` in catalog order, if known.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::italian_rcp()
    }
}

/// True for strings of the shape `digit.digit`.
fn is_section_id(id: &str) -> bool {
    let mut chars = id.chars();
    matches!(
        (chars.next(), chars.next(), chars.next(), chars.next()),
        (Some(a), Some('.'), Some(b), None) if a.is_ascii_digit() && b.is_ascii_digit()
    )
}
