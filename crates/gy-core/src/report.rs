//! Run reports
//!
//! Summarizes a reconciliation run: dataset sizes, degradation counts and
//! per-column sub-field statistics, saved as JSON alongside the canonical
//! output for later inspection.

use crate::error::{Error, Result};
use crate::flat::FlatExport;
use crate::reconciler::ReconciledRow;
use crate::reference::ReferenceTable;
use crate::schema::{COLUMNS, FIELD_SEPARATOR, LEGACY_RANGE_MAX, REPLACEMENT_MARKER};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sub-field statistics for one logical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name
    pub name: String,
    /// Number of rows where this column holds more than one sub-field
    pub multi_valued_rows: usize,
    /// Largest sub-field count seen in this column
    pub max_subfields: usize,
}

/// Summary of one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run completed
    pub generated_at: DateTime<Utc>,
    /// Rows in the reference export
    pub reference_rows: usize,
    /// Records in the flat export
    pub records: usize,
    /// Physical tokens across all flat records
    pub physical_tokens: usize,
    /// Replacement markers surviving in the reconciled values
    pub replacement_markers: usize,
    /// Characters outside the legacy range in the reconciled values
    pub astral_chars: usize,
    /// Per-column sub-field statistics, in schema order
    pub columns: Vec<ColumnStats>,
}

impl RunReport {
    /// Build a report from a completed run
    pub fn new(reference: &ReferenceTable, export: &FlatExport, rows: &[ReconciledRow]) -> Self {
        let physical_tokens = export.records.iter().map(|r| r.tokens.len()).sum();

        let mut replacement_markers = 0;
        let mut astral_chars = 0;
        let mut columns: Vec<ColumnStats> = COLUMNS
            .iter()
            .map(|&name| ColumnStats {
                name: name.to_string(),
                multi_valued_rows: 0,
                max_subfields: 0,
            })
            .collect();

        for row in rows {
            for (index, field) in row.fields.iter().enumerate() {
                let subfields = field.matches(FIELD_SEPARATOR).count() + 1;
                if subfields > 1 {
                    columns[index].multi_valued_rows += 1;
                }
                if subfields > columns[index].max_subfields {
                    columns[index].max_subfields = subfields;
                }
                for c in field.chars() {
                    if c == REPLACEMENT_MARKER {
                        replacement_markers += 1;
                    } else if c as u32 > LEGACY_RANGE_MAX {
                        astral_chars += 1;
                    }
                }
            }
        }

        Self {
            generated_at: Utc::now(),
            reference_rows: reference.len(),
            records: export.records.len(),
            physical_tokens,
            replacement_markers,
            astral_chars,
            columns,
        }
    }

    /// Load a report from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the report as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
