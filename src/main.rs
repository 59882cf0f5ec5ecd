// src/main.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use rcp_extractor::aifa::{client, ProductUrls};
use rcp_extractor::extractors::{ExtractedSections, SectionCatalog, SectionExtractor};
use rcp_extractor::pdf;
use rcp_extractor::storage::{ProductRecord, RecordOutcome, StorageManager, DEFAULT_MAX_CELL_CHARS};
use rcp_extractor::utils::error::StorageError;
use rcp_extractor::utils::{self, line_debug, AppError};

const MAX_CELL_CHARS_ENV: &str = "RCP_MAX_CELL_CHARS";

/// Command Line Interface for the RCP section extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// AIC codes of the products to process
    #[arg(short, long, num_args = 1..)]
    aic: Vec<String>,

    /// File with one AIC code per line (optional)
    #[arg(long)]
    aic_file: Option<PathBuf>,

    /// Local RCP PDF to process instead of downloading (keyed by --aic or the file name)
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// JSON section catalog replacing the built-in Italian one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Debug mode - save annotated line listings for debugging
    #[arg(short, long)]
    debug: bool,

    /// Maximum characters stored per section (default: RCP_MAX_CELL_CHARS or 49900)
    #[arg(long)]
    max_chars: Option<usize>,

    /// Pause between products in milliseconds
    #[arg(long, default_value = "1500")]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load the section catalog
    let catalog = Arc::new(match &args.catalog {
        Some(path) => {
            tracing::info!("Loading section catalog from {}", path.display());
            SectionCatalog::from_json_file(path)?
        }
        None => SectionCatalog::italian_rcp(),
    });
    tracing::debug!("Using catalog sections: {:?}", catalog.ids().collect::<Vec<_>>());

    // 4. Initialize storage
    let max_chars = resolve_max_chars(args.max_chars);
    let storage = StorageManager::new(&args.output_dir, max_chars)?;

    // 5. If a local PDF is provided, process just that file
    if let Some(pdf_path) = &args.pdf {
        let aic = local_key(&args, pdf_path)?;
        tracing::info!("Processing local PDF {} as {}", pdf_path.display(), aic);

        let bytes = tokio::fs::read(pdf_path).await?;
        let debug_file = debug_file(&args, &storage, &aic)?;
        let sections = extract_in_background(bytes, Arc::clone(&catalog), debug_file).await?;
        let record = ProductRecord { aic, urls: None, outcome: RecordOutcome::Extracted(sections) };
        store(&storage, &record, &catalog)?;
        return Ok(());
    }

    // 6. Collect the AIC codes to process
    let aics = collect_aics(&args)?;
    if aics.is_empty() {
        return Err(AppError::Config("No AIC codes given (use --aic, --aic-file or --pdf)".to_string()));
    }
    tracing::info!("Processing {} products", aics.len());

    // 7. Process each product
    let mut success_count = 0;
    let mut failure_count = 0;

    for (n, aic) in aics.iter().enumerate() {
        if n > 0 && args.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }

        let record = process_product(aic, &args, &storage, &catalog).await;
        let extracted = match &record.outcome {
            RecordOutcome::Extracted(sections) => {
                tracing::info!("{} done: {}/{} sections found", aic, sections.found_count(), sections.len());
                true
            }
            RecordOutcome::Failed { reason } => {
                tracing::error!("Failed to process {}: {}", aic, reason);
                false
            }
        };

        match store(&storage, &record, &catalog) {
            Ok(()) if extracted => success_count += 1,
            Ok(()) => failure_count += 1,
            Err(e) => {
                tracing::error!("Failed to save results for {}: {}", aic, e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to extract sections from any of {} products", failure_count)));
    }

    Ok(())
}

/// Looks up, downloads and extracts one product. Any failure along the way
/// turns into a failed record so that no section is partially reported.
async fn process_product(aic: &str, args: &Args, storage: &StorageManager, catalog: &Arc<SectionCatalog>) -> ProductRecord {
    let failed = |urls: Option<ProductUrls>, reason: String| ProductRecord {
        aic: aic.to_string(),
        urls,
        outcome: RecordOutcome::Failed { reason },
    };

    let urls = match client::lookup_product(aic).await {
        Ok(Some(urls)) => urls,
        Ok(None) => return failed(None, "no leaflet information returned by AIFA".to_string()),
        Err(e) => return failed(None, format!("lookup failed: {}", e)),
    };

    let bytes = match client::download_pdf(&urls.url_pdf).await {
        Ok(bytes) => bytes,
        Err(e) => return failed(Some(urls), format!("download failed: {}", e)),
    };
    tracing::info!("Successfully downloaded document ({} bytes)", bytes.len());

    let debug_file = match debug_file(args, storage, aic) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Could not prepare debug directory for {}: {}", aic, e);
            None
        }
    };

    match extract_in_background(bytes, Arc::clone(catalog), debug_file).await {
        Ok(sections) => ProductRecord {
            aic: aic.to_string(),
            urls: Some(urls),
            outcome: RecordOutcome::Extracted(sections),
        },
        Err(e) => failed(Some(urls), e.to_string()),
    }
}

/// Runs PDF conversion and the section scan on the blocking pool.
async fn extract_in_background(
    bytes: Vec<u8>,
    catalog: Arc<SectionCatalog>,
    debug_file: Option<PathBuf>,
) -> Result<ExtractedSections, AppError> {
    tokio::task::spawn_blocking(move || -> Result<ExtractedSections, AppError> {
        let lines = pdf::extract_lines_from_pdf(&bytes)?;
        let extractor = SectionExtractor::new(&catalog);

        if let Some(path) = debug_file {
            if let Err(e) = line_debug::save_debug_lines(&lines, extractor.matcher(), &path) {
                tracing::warn!("Failed to save debug line listing: {}", e);
            }
        }

        Ok(extractor.extract(&lines))
    })
    .await?
}

/// Writes the section row and the metadata of one record.
fn store(storage: &StorageManager, record: &ProductRecord, catalog: &SectionCatalog) -> Result<(), StorageError> {
    storage.save_record(record, catalog)?;
    storage.save_record_metadata(record)?;
    Ok(())
}

/// Path of the annotated line listing for a product, creating its directory.
fn debug_file(args: &Args, storage: &StorageManager, aic: &str) -> Result<Option<PathBuf>, AppError> {
    if !args.debug {
        return Ok(None);
    }
    let debug_dir = storage.product_dir(aic).join("debug");
    std::fs::create_dir_all(&debug_dir)?;
    Ok(Some(debug_dir.join("lines.txt")))
}

/// Cell cap from the command line, then the environment, then the default.
fn resolve_max_chars(cli_value: Option<usize>) -> usize {
    if let Some(size) = cli_value {
        tracing::debug!("Using max chars {} from command-line argument", size);
        return size;
    }
    match std::env::var(MAX_CELL_CHARS_ENV).ok().and_then(|v| v.trim().parse().ok()) {
        Some(size) => {
            tracing::debug!("Using max chars {} from {}", size, MAX_CELL_CHARS_ENV);
            size
        }
        None => DEFAULT_MAX_CELL_CHARS,
    }
}

fn collect_aics(args: &Args) -> Result<Vec<String>, AppError> {
    let mut aics: Vec<String> = args.aic.iter().map(|a| a.trim().to_string()).collect();

    if let Some(path) = &args.aic_file {
        let raw = std::fs::read_to_string(path)?;
        aics.extend(raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string));
    }

    // First occurrence wins; order is kept.
    let mut seen = HashSet::new();
    aics.retain(|a| !a.is_empty() && seen.insert(a.clone()));
    Ok(aics)
}

fn local_key(args: &Args, pdf_path: &Path) -> Result<String, AppError> {
    match args.aic.as_slice() {
        [] => pdf_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::Config(format!("Cannot derive a key from {}", pdf_path.display()))),
        [aic] => Ok(aic.trim().to_string()),
        _ => Err(AppError::Config("--pdf accepts at most one --aic".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_aics_drops_repeats_across_sources() {
        let dir = tempfile::tempdir().expect("temp dir");
        let aic_file = dir.path().join("aics.txt");
        std::fs::write(&aic_file, "034567012\n\n012345678\n 029384756 \n").expect("written");

        let args = Args::parse_from([
            "rcp_extractor",
            "--aic",
            "012345678",
            "034567012",
            "012345678",
            "--aic-file",
            aic_file.to_str().expect("utf-8 path"),
        ]);

        assert_eq!(collect_aics(&args).expect("collected"), vec!["012345678", "034567012", "029384756"]);
    }

    #[test]
    fn test_store_reports_write_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = StorageManager::new(dir.path(), DEFAULT_MAX_CELL_CHARS).expect("storage");
        // A plain file where the product directory should be.
        std::fs::write(dir.path().join("012345678"), "blocking").expect("written");

        let catalog = SectionCatalog::italian_rcp();
        let record = ProductRecord {
            aic: "012345678".to_string(),
            urls: None,
            outcome: RecordOutcome::Failed { reason: "lookup failed".to_string() },
        };

        assert!(matches!(store(&storage, &record, &catalog), Err(StorageError::IoError(_))));
    }

    #[test]
    fn test_store_writes_row_and_metadata() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = StorageManager::new(dir.path(), DEFAULT_MAX_CELL_CHARS).expect("storage");
        let catalog = SectionCatalog::italian_rcp();
        let sections = SectionExtractor::new(&catalog).extract(&["4.9 Sovradosaggio", "Nessun caso."]);
        let record = ProductRecord { aic: "012345678".to_string(), urls: None, outcome: RecordOutcome::Extracted(sections) };

        store(&storage, &record, &catalog).expect("stored");

        let product_dir = storage.product_dir("012345678");
        assert!(product_dir.join("012345678_RCP_sections.json").is_file());
        assert!(product_dir.join("012345678_RCP_meta.json").is_file());
    }
}
