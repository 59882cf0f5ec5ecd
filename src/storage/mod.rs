// src/storage/mod.rs
pub mod labels;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::aifa::ProductUrls;
use crate::extractors::catalog::SectionCatalog;
use crate::extractors::section::ExtractedSections;
use crate::storage::labels::{output_label, COLUMN_AIC, COLUMN_ATC, COLUMN_URL_JSON, COLUMN_URL_PDF};
use crate::utils::error::StorageError;

/// Default cap on stored text per section, leaving room for the marker.
pub const DEFAULT_MAX_CELL_CHARS: usize = 49_900;
pub const TRUNCATION_MARKER: &str = " [TRUNCATED]";
/// Stored for every section when the whole document could not be processed.
pub const UNAVAILABLE: &str = "NON - TROVATO";
/// Stored in the URL/ATC columns when the product lookup found nothing.
pub const NO_LOOKUP: &str = "NON";

/// What happened to one product.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Extracted(ExtractedSections),
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub aic: String,
    pub urls: Option<ProductUrls>,
    pub outcome: RecordOutcome,
}

impl ProductRecord {
    pub fn status(&self) -> &'static str {
        match self.outcome {
            RecordOutcome::Extracted(_) => "extracted",
            RecordOutcome::Failed { .. } => "failed",
        }
    }

    /// Labelled columns for this record, section columns in catalog order.
    pub fn columns(&self, catalog: &SectionCatalog, max_chars: usize) -> Vec<(String, String)> {
        let mut columns = vec![(COLUMN_AIC.to_string(), self.aic.clone())];

        for entry in catalog.entries() {
            let value = match &self.outcome {
                RecordOutcome::Extracted(sections) => sections
                    .get(entry.id())
                    .map(|text| truncate_for_storage(text.as_str(), max_chars))
                    .unwrap_or_else(|| UNAVAILABLE.to_string()),
                RecordOutcome::Failed { .. } => UNAVAILABLE.to_string(),
            };
            columns.push((output_label(entry), value));
        }

        let (url_pdf, url_json, atc) = match &self.urls {
            Some(urls) => (urls.url_pdf.clone(), urls.url_json.clone(), urls.atc.clone()),
            None => (NO_LOOKUP.to_string(), NO_LOOKUP.to_string(), NO_LOOKUP.to_string()),
        };
        columns.push((COLUMN_ATC.to_string(), atc));
        columns.push((COLUMN_URL_PDF.to_string(), url_pdf));
        columns.push((COLUMN_URL_JSON.to_string(), url_json));
        columns
    }
}

#[derive(Debug, Serialize)]
struct RecordMetadata<'a> {
    aic: &'a str,
    status: &'a str,
    failure_reason: Option<&'a str>,
    url_pdf: Option<&'a str>,
    sections_total: usize,
    sections_found: usize,
    extraction_timestamp: String,
}

/// Cuts `text` to at most `max_chars` characters and appends the truncation
/// marker when anything was removed.
pub fn truncate_for_storage(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
    max_chars: usize,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P, max_chars: usize) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path, max_chars })
    }

    /// Directory holding everything stored for one product: /base_dir/AIC/
    pub fn product_dir(&self, aic: &str) -> PathBuf {
        self.base_dir.join(aic.trim())
    }

    fn ensure_product_dir(&self, aic: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.product_dir(aic);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the labelled section columns of a record as JSON.
    pub fn save_record(&self, record: &ProductRecord, catalog: &SectionCatalog) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_product_dir(&record.aic)?;
        let file_path = target_dir.join(format!("{}_RCP_sections.json", record.aic.trim()));

        let row: serde_json::Map<String, serde_json::Value> = record
            .columns(catalog, self.max_chars)
            .into_iter()
            .map(|(label, value)| (label, serde_json::Value::String(value)))
            .collect();

        let row_str = serde_json::to_string_pretty(&row)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, row_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved sections to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the record in JSON format
    pub fn save_record_metadata(&self, record: &ProductRecord) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_product_dir(&record.aic)?;
        let file_path = target_dir.join(format!("{}_RCP_meta.json", record.aic.trim()));

        let (sections_total, sections_found, failure_reason) = match &record.outcome {
            RecordOutcome::Extracted(sections) => (sections.len(), sections.found_count(), None),
            RecordOutcome::Failed { reason } => (0, 0, Some(reason.as_str())),
        };

        let metadata = RecordMetadata {
            aic: &record.aic,
            status: record.status(),
            failure_reason,
            url_pdf: record.urls.as_ref().map(|u| u.url_pdf.as_str()),
            sections_total,
            sections_found,
            extraction_timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::section::SectionExtractor;

    fn sample_urls() -> ProductUrls {
        ProductUrls {
            url_pdf: "https://example.org/rcp.pdf".to_string(),
            url_json: "https://example.org/search.json".to_string(),
            atc: "C09AA05 - Ramipril".to_string(),
        }
    }

    fn read_json(path: &Path) -> serde_json::Value {
        let raw = fs::read_to_string(path).expect("stored file readable");
        serde_json::from_str(&raw).expect("stored file is JSON")
    }

    #[test]
    fn test_truncate_for_storage() {
        assert_eq!(truncate_for_storage("breve", 10), "breve");
        assert_eq!(truncate_for_storage("esattamente", 11), "esattamente");
        assert_eq!(truncate_for_storage("capacità ridotta", 8), "capacità [TRUNCATED]");
    }

    #[test]
    fn test_extracted_record_is_saved_with_labels() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = SectionCatalog::italian_rcp();
        let sections = SectionExtractor::new(&catalog).extract(&["4.3 Controindicazioni", "Ipersensibilità."]);
        let record = ProductRecord {
            aic: "043658032".to_string(),
            urls: Some(sample_urls()),
            outcome: RecordOutcome::Extracted(sections),
        };

        let storage = StorageManager::new(dir.path().join("out"), DEFAULT_MAX_CELL_CHARS).expect("storage");
        let path = storage.save_record(&record, &catalog).expect("saved");
        let row = read_json(&path);

        assert!(path.ends_with("043658032/043658032_RCP_sections.json"));
        assert_eq!(row["4.3 Contraindications"], "Ipersensibilità.");
        assert_eq!(row["4.1 Indicazioni terapeutiche"], "Not found");
        assert_eq!(row["ATC"], "C09AA05 - Ramipril");
        assert_eq!(row["Codice AIC"], "043658032");
    }

    #[test]
    fn test_failed_record_marks_every_section_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = SectionCatalog::italian_rcp();
        let record = ProductRecord {
            aic: "000000001".to_string(),
            urls: None,
            outcome: RecordOutcome::Failed { reason: "download failed".to_string() },
        };

        let storage = StorageManager::new(dir.path(), DEFAULT_MAX_CELL_CHARS).expect("storage");
        let row = read_json(&storage.save_record(&record, &catalog).expect("saved"));

        for entry in catalog.entries() {
            assert_eq!(row[output_label(entry).as_str()], UNAVAILABLE);
        }
        assert_eq!(row["URL_PDF"], NO_LOOKUP);

        let meta = read_json(&storage.save_record_metadata(&record).expect("saved"));
        assert_eq!(meta["status"], "failed");
        assert_eq!(meta["failure_reason"], "download failed");
        assert_eq!(meta["sections_found"], 0);
    }

    #[test]
    fn test_long_sections_are_truncated_on_save() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = SectionCatalog::new([("4.9", "Sovradosaggio")]).expect("valid catalog");
        let body = "parola ".repeat(50);
        let lines = vec!["4.9 Sovradosaggio".to_string(), body];
        let record = ProductRecord {
            aic: "1".to_string(),
            urls: Some(sample_urls()),
            outcome: RecordOutcome::Extracted(SectionExtractor::new(&catalog).extract(&lines)),
        };

        let storage = StorageManager::new(dir.path(), 20).expect("storage");
        let row = read_json(&storage.save_record(&record, &catalog).expect("saved"));

        assert_eq!(row["4.9 Overdose"], "parola parola parola [TRUNCATED]");
    }
}
