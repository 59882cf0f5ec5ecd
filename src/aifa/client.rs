// src/aifa/client.rs
use std::time::Duration;

use reqwest::header;

use crate::aifa::models::{search_url, ProductUrls, SearchResponse};
use crate::utils::error::AifaError;

const AIFA_USER_AGENT: &str = concat!("rcp_extractor/", env!("CARGO_PKG_VERSION"));
// Small pause before every request to stay well under the API's limits.
const AIFA_REQUEST_DELAY_MS: u64 = 150;
const AIFA_TIMEOUT_SECS: u64 = 60;

/// Creates a reqwest client configured for AIFA interaction.
fn build_aifa_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(AIFA_USER_AGENT)
        .timeout(Duration::from_secs(AIFA_TIMEOUT_SECS))
        .build()
}

/// Maps a non-success status to the matching error.
fn status_error(status: reqwest::StatusCode, url: &str) -> AifaError {
    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    match status {
        reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("Received {} - backing off may be required.", status);
            AifaError::RateLimited
        }
        reqwest::StatusCode::NOT_FOUND => AifaError::DocumentNotFound(url.to_string()),
        _ => AifaError::Http(status),
    }
}

/// Looks up an AIC code and resolves the RCP leaflet URL, the search URL and
/// the ATC classification.
///
/// `Ok(None)` means the API answered but has no usable record for the code.
pub async fn lookup_product(aic: &str) -> Result<Option<ProductUrls>, AifaError> {
    let client = build_aifa_client()?;
    let url = search_url(aic);

    tracing::info!("Looking up AIC {} at {}", aic, url);
    tokio::time::sleep(Duration::from_millis(AIFA_REQUEST_DELAY_MS)).await;

    let response = client
        .get(&url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, &url));
    }

    let body = response.text().await?;
    let search: SearchResponse =
        serde_json::from_str(&body).map_err(|e| AifaError::Parse(format!("search response for {}: {}", aic, e)))?;

    let urls = search.product_urls(aic);
    if urls.is_none() {
        tracing::warn!("No leaflet information returned for AIC {}", aic);
    }
    Ok(urls)
}

/// Downloads a leaflet PDF.
pub async fn download_pdf(url: &str) -> Result<Vec<u8>, AifaError> {
    let client = build_aifa_client()?;

    tracing::info!("Downloading document from: {}", url);
    tokio::time::sleep(Duration::from_millis(AIFA_REQUEST_DELAY_MS)).await;

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/pdf,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, url));
    }

    let body = response.bytes().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors() {
        assert!(matches!(
            status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "u"),
            AifaError::RateLimited
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::NOT_FOUND, "http://x/doc"),
            AifaError::DocumentNotFound(url) if url == "http://x/doc"
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::BAD_GATEWAY, "u"),
            AifaError::Http(reqwest::StatusCode::BAD_GATEWAY)
        ));
    }
}
