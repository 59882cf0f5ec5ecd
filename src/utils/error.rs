// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Section catalog is empty")]
    Empty,

    #[error("Invalid section id '{0}': expected digit.digit (e.g. 4.1)")]
    InvalidId(String),

    #[error("Section {0} has an empty title")]
    EmptyTitle(String),

    #[error("Section {0} appears more than once")]
    DuplicateId(String),
}

#[derive(Error, Debug)]
pub enum AifaError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 Internal Server Error

    #[error("AIFA rate limit likely exceeded")]
    RateLimited,

    #[error("Could not find document: {0}")]
    DocumentNotFound(String),

    #[error("Failed to parse AIFA response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF conversion error: {0}")]
    Pdf(String),

    #[error("PDF contains no text")]
    EmptyDocument,

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Could not read catalog file: {0}")]
    CatalogFile(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("AIFA interaction failed: {0}")]
    Aifa(#[from] AifaError), // Automatically convert AIFA errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
