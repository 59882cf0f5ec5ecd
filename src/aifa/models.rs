// src/aifa/models.rs
use serde::Deserialize;

pub const AIFA_API_BASE: &str = "https://api.aifa.gov.it/aifa-bdf-eif-be/1.0.0";

/// Response of the AIFA "formadosaggio/ricerca" search endpoint.
/// Only the fields needed to locate the RCP leaflet are modelled.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub content: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub medicinale: Option<Medicinale>,
    #[serde(default)]
    pub codice_atc: Option<Vec<String>>,
    #[serde(default)]
    pub descrizione_atc: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicinale {
    // Sent as either a number or a string depending on the record
    #[serde(default)]
    pub codice_sis: Option<serde_json::Value>,
    #[serde(default)]
    pub aic6: Option<serde_json::Value>,
}

/// Locations of a product's documents, resolved from its AIC code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUrls {
    pub url_pdf: String,
    pub url_json: String,
    pub atc: String,
}

/// URL of the search endpoint for an AIC code (the API expects a leading zero).
pub fn search_url(aic: &str) -> String {
    format!(
        "{}/formadosaggio/ricerca?query=0{}&spellingCorrection=true&page=0",
        AIFA_API_BASE, aic
    )
}

/// URL of the RCP leaflet PDF for a marketing authorization holder and product.
pub fn rcp_pdf_url(codice_sis: &str, aic6: &str) -> String {
    format!(
        "{}/organizzazione/{}/farmaci/{}/stampati?ts=RCP",
        AIFA_API_BASE, codice_sis, aic6
    )
}

impl SearchResponse {
    /// Resolves the document URLs from the first search hit.
    ///
    /// Returns `None` when the search found nothing or the hit lacks the
    /// holder code or the six-digit AIC.
    pub fn product_urls(&self, aic: &str) -> Option<ProductUrls> {
        let hit = self.data.as_ref()?.content.first()?;
        let medicinale = hit.medicinale.as_ref()?;
        let codice_sis = medicinale.codice_sis.as_ref().and_then(value_to_string)?;
        let aic6 = medicinale.aic6.as_ref().and_then(value_to_string)?;

        let first = |values: &Option<Vec<String>>| {
            values
                .as_ref()
                .and_then(|v| v.first().cloned())
                .unwrap_or_else(|| "None".to_string())
        };

        Some(ProductUrls {
            url_pdf: rcp_pdf_url(&codice_sis, &aic6),
            url_json: search_url(aic),
            atc: format!("{} - {}", first(&hit.codice_atc), first(&hit.descrizione_atc)),
        })
    }
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
