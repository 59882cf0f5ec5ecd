// src/utils/line_debug.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::extractors::heading::{HeadingMatcher, LineKind};
use crate::utils::error::AppError;

/// Renders every line with a marker showing how the heading matcher saw it:
/// `[H 4.1]` confirmed heading, `[N 4.2]` known number without a matching
/// title, `[N ?.?]` unknown number, blank for ordinary content. Title lines
/// consumed by a split heading are marked `[H ...]` too.
pub fn annotate_lines<S: AsRef<str>>(lines: &[S], matcher: &HeadingMatcher<'_>) -> String {
    let catalog = matcher.catalog();
    let mut out = String::new();

    for (kind, covered) in matcher.scan(lines) {
        let marker = match kind {
            LineKind::Heading(heading) => format!("[H {}] ", heading.id),
            LineKind::Numbered { index: Some(index) } => format!("[N {}] ", catalog.entries()[index].id()),
            LineKind::Numbered { index: None } => "[N ?.?] ".to_string(),
            LineKind::Content => " ".repeat(8),
        };
        for line in covered {
            out.push_str(&marker);
            out.push_str(line.as_ref());
            out.push('\n');
        }
    }

    out
}

/// Writes the annotated line listing of one document to `filename`.
pub fn save_debug_lines<S: AsRef<str>>(
    lines: &[S],
    matcher: &HeadingMatcher<'_>,
    filename: &Path,
) -> Result<(), AppError> {
    let mut writer = BufWriter::new(File::create(filename)?);
    writer.write_all(annotate_lines(lines, matcher).as_bytes())?;
    writer.flush()?;

    tracing::info!("Saved debug line listing to {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::catalog::SectionCatalog;

    #[test]
    fn test_annotations_mark_each_line_kind() {
        let catalog = SectionCatalog::italian_rcp();
        let matcher = HeadingMatcher::new(&catalog);
        let lines = ["4.1", "Indicazioni terapeutiche", "Corpo.", "4.2 altro", "9.9 Numero"];

        let annotated = annotate_lines(&lines, &matcher);

        assert_eq!(
            annotated,
            "[H 4.1] 4.1\n[H 4.1] Indicazioni terapeutiche\n        Corpo.\n[N 4.2] 4.2 altro\n[N ?.?] 9.9 Numero\n"
        );
    }

    #[test]
    fn test_trailing_bare_number_is_marked_numbered() {
        let catalog = SectionCatalog::italian_rcp();
        let matcher = HeadingMatcher::new(&catalog);
        let lines = ["4.8 Effetti indesiderati", "Cefalea.", "4.9"];

        let annotated = annotate_lines(&lines, &matcher);

        assert_eq!(annotated, "[H 4.8] 4.8 Effetti indesiderati\n        Cefalea.\n[N 4.9] 4.9\n");
    }

    #[test]
    fn test_save_debug_lines_writes_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = SectionCatalog::italian_rcp();
        let matcher = HeadingMatcher::new(&catalog);
        let path = dir.path().join("lines.txt");

        save_debug_lines(&["4.9 Sovradosaggio"], &matcher, &path).expect("saved");

        let written = std::fs::read_to_string(&path).expect("readable");
        assert_eq!(written, "[H 4.9] 4.9 Sovradosaggio\n");
    }
}
