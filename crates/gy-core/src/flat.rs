//! Parser for the flat-text export
//!
//! The flat export preserves the original glyphs the reference export cannot
//! represent, but it concatenates every column's sub-fields into one
//! `|`-delimited stream per record, so a physical line carries more tokens
//! than there are logical columns. This module only tokenizes; recovering
//! the column boundaries is the reconciler's job.

use crate::error::{Error, Result};
use crate::reference::ReferenceTable;
use crate::schema::{FIELD_SEPARATOR, HEADER_LINES, KEY_COLUMN, REPLACEMENT_MARKER};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One data line of the flat export, tokenized
#[derive(Debug, Clone)]
pub struct FlatRecord {
    /// Record identifier (always the second physical token)
    pub id: String,
    /// Raw physical tokens, split on the field separator
    pub tokens: Vec<String>,
}

/// The parsed flat export: fixed header block plus tokenized records
#[derive(Debug, Clone)]
pub struct FlatExport {
    /// The fixed leading lines, verbatim (line terminators stripped)
    pub header: Vec<String>,
    /// Data records in file order
    pub records: Vec<FlatRecord>,
}

impl FlatExport {
    /// Load the flat export from disk.
    ///
    /// The file is read encoding-tolerantly: undecodable bytes become the
    /// replacement marker instead of aborting the run. The marker is folded
    /// into the lossy comparison later.
    pub fn load<P: AsRef<Path>>(path: P, reference: &ReferenceTable) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&String::from_utf8_lossy(&bytes), reference)
    }

    /// Parse flat-export content (useful for testing).
    ///
    /// Checks the flat export's own invariants as it goes: identifiers are
    /// unique, every identifier has a reference row, and at the end the
    /// distinct identifiers cover the reference table exactly.
    pub fn parse(content: &str, reference: &ReferenceTable) -> Result<Self> {
        let mut lines = content.lines();

        let mut header = Vec::with_capacity(HEADER_LINES);
        for found in 0..HEADER_LINES {
            match lines.next() {
                Some(line) => header.push(line.to_string()),
                None => {
                    return Err(Error::HeaderTooShort {
                        expected: HEADER_LINES,
                        found,
                    })
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        for (offset, line) in lines.enumerate() {
            let tokens: Vec<String> = collapse_marker_runs(line)
                .split(FIELD_SEPARATOR)
                .map(str::to_string)
                .collect();

            let id = match tokens.get(KEY_COLUMN) {
                Some(id) => id.clone(),
                None => {
                    return Err(Error::MissingIdentifier {
                        line: HEADER_LINES + offset + 1,
                    })
                }
            };

            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateKey {
                    export: "flat",
                    record: id,
                });
            }
            if !reference.contains(&id) {
                return Err(Error::MissingReference { record: id });
            }

            records.push(FlatRecord { id, tokens });
        }

        if seen.len() != reference.len() {
            return Err(Error::CardinalityMismatch {
                reference_rows: reference.len(),
                flat_records: seen.len(),
            });
        }

        Ok(Self { header, records })
    }
}

/// Collapse each run of exactly three replacement markers into one.
///
/// One unreadable three-byte character in the export decodes to three
/// markers; collapsing restores "one marker per lost character". The rule is
/// deliberately narrow: runs of any other length pass through untouched.
fn collapse_marker_runs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut run = 0usize;

    for c in line.chars() {
        if c == REPLACEMENT_MARKER {
            run += 1;
        } else {
            flush_markers(&mut out, run);
            run = 0;
            out.push(c);
        }
    }
    flush_markers(&mut out, run);
    out
}

fn flush_markers(out: &mut String, run: usize) {
    if run == 3 {
        out.push(REPLACEMENT_MARKER);
    } else {
        for _ in 0..run {
            out.push(REPLACEMENT_MARKER);
        }
    }
}
