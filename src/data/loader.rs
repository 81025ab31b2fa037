// ============================================================
// Layer 4: CSV Loader
// ============================================================
// Loads labelled blurbs from a CSV file with a header row.
//
// Two columns matter, both chosen by name:
//   text column   the blurb itself
//   label column  the campaign outcome
//
// Every other column (timestamps, goals, categories) is ignored.
//
// Label cells are parsed with `parse_outcome`. Rows whose label
// has no binary meaning (e.g. "canceled", "live") are skipped
// with a warning instead of failing the whole load, so a raw
// export can be used without pre-filtering.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::domain::blurb::{parse_outcome, Blurb};
use crate::domain::traits::DocumentSource;

/// Loads blurbs from a CSV file.
/// Implements the DocumentSource trait from Layer 3.
pub struct CsvLoader {
    path:         PathBuf,
    text_column:  String,
    label_column: String,
}

impl CsvLoader {
    pub fn new(
        path:         impl Into<PathBuf>,
        text_column:  impl Into<String>,
        label_column: impl Into<String>,
    ) -> Self {
        Self {
            path:         path.into(),
            text_column:  text_column.into(),
            label_column: label_column.into(),
        }
    }
}

impl DocumentSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<Blurb>> {
        if !self.path.exists() {
            bail!("Dataset '{}' does not exist", self.path.display());
        }

        // flexible(true): tolerate rows with a different field count,
        // common in scraped exports with trailing commas
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        // ── Step 1: Resolve column positions from the header ──────────────────
        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .clone();
        let text_idx  = column_index(&headers, &self.text_column)?;
        let label_idx = column_index(&headers, &self.label_column)?;

        // ── Step 2: Read rows ─────────────────────────────────────────────────
        let mut blurbs  = Vec::new();
        let mut skipped = 0usize;

        for (i, record) in reader.records().enumerate() {
            // +2: 1-based line numbers and the header line
            let record = record
                .with_context(|| format!("Malformed row at line {} of '{}'", i + 2, self.path.display()))?;

            match record.get(label_idx).and_then(parse_outcome) {
                Some(successful) => {
                    let text = record.get(text_idx).unwrap_or("");
                    blurbs.push(Blurb::new(text, successful));
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                "Skipped {} rows in '{}' without a success/failure label",
                skipped,
                self.path.display()
            );
        }

        tracing::info!("Loaded {} labelled blurbs from '{}'", blurbs.len(), self.path.display());
        Ok(blurbs)
    }
}

/// Position of a named column, or an error listing what IS available.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| {
            let available: Vec<&str> = headers.iter().collect();
            format!("Column '{}' not found; available columns: {:?}", name, available)
        })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("blurbs.csv");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_loads_named_columns_in_order() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "\
name,blurb,launched_at,state
a,\"Solar lamps, for everyone\",2015-01-01,successful
b,A board game about bees,2015-02-01,failed
");
        let blurbs = CsvLoader::new(path, "blurb", "state").load_all().unwrap();
        assert_eq!(blurbs, vec![
            Blurb::new("Solar lamps, for everyone", true),
            Blurb::new("A board game about bees", false),
        ]);
    }

    #[test]
    fn test_skips_rows_without_binary_outcome() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "\
blurb,state
one,successful
two,canceled
three,live
four,0
");
        let blurbs = CsvLoader::new(path, "blurb", "state").load_all().unwrap();
        assert_eq!(blurbs.len(), 2);
        assert_eq!(blurbs[1], Blurb::new("four", false));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "blurb,state\nx,1\n");
        let err  = CsvLoader::new(path, "description", "state").load_all().unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvLoader::new(dir.path().join("nope.csv"), "blurb", "state")
            .load_all()
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_short_row_gives_empty_text() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "state,blurb\n1\n");
        let blurbs = CsvLoader::new(path, "blurb", "state").load_all().unwrap();
        assert_eq!(blurbs, vec![Blurb::new("", true)]);
    }
}
