// src/pdf/mod.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::ExtractError;

// Page footers and agency banners repeated on every page of an RCP leaflet.
static BOILERPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Pagina\s+\d+|AIFA|Ministero della Salute)").expect("Failed to compile BOILERPLATE_RE")
});

/// Converts PDF bytes into the ordered, trimmed lines of every page.
pub fn extract_lines_from_pdf(pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    if !pdf_bytes.starts_with(b"%PDF-") {
        return Err(ExtractError::Pdf("missing %PDF- header".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        // Usually a scanned, image-only leaflet
        return Err(ExtractError::EmptyDocument);
    }

    let lines = lines_from_text(&text);
    tracing::debug!("Extracted {} lines from {} bytes of PDF", lines.len(), pdf_bytes.len());
    Ok(lines)
}

/// Splits extracted text into pages (form feeds) and lines, dropping blank
/// lines and page boilerplate.
pub fn lines_from_text(text: &str) -> Vec<String> {
    text.split('\x0C')
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_boilerplate(line))
        .map(str::to_string)
        .collect()
}

pub fn is_boilerplate(line: &str) -> bool {
    BOILERPLATE_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_trimmed_and_blank_lines_dropped() {
        let text = "  4.1 Indicazioni terapeutiche  \n\n   \nTrattamento dell'ipertensione.\r\n";
        assert_eq!(
            lines_from_text(text),
            vec!["4.1 Indicazioni terapeutiche", "Trattamento dell'ipertensione."]
        );
    }

    #[test]
    fn test_boilerplate_is_removed_across_pages() {
        let text = "Testo pagina uno\nPagina 1 di 12\n\x0CAIFA - Agenzia Italiana del Farmaco\nMINISTERO DELLA SALUTE\nTesto pagina due";
        assert_eq!(lines_from_text(text), vec!["Testo pagina uno", "Testo pagina due"]);
    }

    #[test]
    fn test_boilerplate_only_matches_line_start() {
        assert!(is_boilerplate("pagina 3"));
        assert!(!is_boilerplate("Vedere pagina 3"));
        assert!(!is_boilerplate("Pagina senza numero"));
    }

    #[test]
    fn test_invalid_pdf_bytes_are_rejected() {
        let result = extract_lines_from_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
