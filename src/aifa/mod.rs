// src/aifa/mod.rs
pub mod client;
pub mod models;

pub use models::ProductUrls;
