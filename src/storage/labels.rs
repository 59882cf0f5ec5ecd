// src/storage/labels.rs
use crate::extractors::catalog::CatalogEntry;

/// Column names used by the medicines table for each extracted section.
/// Some columns keep the Italian title, others were translated when the
/// table was set up; the extractor itself never sees these labels.
pub const OUTPUT_LABELS: &[(&str, &str)] = &[
    ("4.1", "4.1 Indicazioni terapeutiche"),
    ("4.2", "4.2 Posologia e modo di somministrazione"),
    ("4.3", "4.3 Contraindications"),
    ("4.4", "4.4 Special warnings and precautions for use"),
    ("4.5", "4.5 Interactions with other medicinal products"),
    ("4.6", "4.6 Fertility, pregnancy and lactation"),
    ("4.7", "4.7 Effects on ability to drive and use machines"),
    ("4.8", "4.8 Undesirable effects (side effects)"),
    ("4.9", "4.9 Overdose"),
    ("6.2", "6.2 Incompatibilities"),
];

pub const COLUMN_URL_PDF: &str = "URL_PDF";
pub const COLUMN_URL_JSON: &str = "URL_json";
pub const COLUMN_ATC: &str = "ATC";
pub const COLUMN_AIC: &str = "Codice AIC";

/// Column name for a catalog section; sections outside the table fall back
/// to "<id> <canonical title>".
pub fn output_label(entry: &CatalogEntry) -> String {
    OUTPUT_LABELS
        .iter()
        .find(|(id, _)| *id == entry.id())
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{} {}", entry.id(), entry.title()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::catalog::SectionCatalog;

    #[test]
    fn test_builtin_sections_use_table_labels() {
        let catalog = SectionCatalog::italian_rcp();
        let labels: Vec<String> = catalog.entries().iter().map(output_label).collect();

        assert_eq!(labels.len(), OUTPUT_LABELS.len());
        assert_eq!(labels[2], "4.3 Contraindications");
        assert_eq!(labels[0], "4.1 Indicazioni terapeutiche");
    }

    #[test]
    fn test_unknown_sections_fall_back_to_canonical_title() {
        let catalog = SectionCatalog::new([("5.1", "Proprietà farmacodinamiche")]).expect("valid catalog");
        assert_eq!(output_label(&catalog.entries()[0]), "5.1 Proprietà farmacodinamiche");
    }
}
