//! Loader for the reference (database-dump) export
//!
//! The reference export is the structurally authoritative side of the
//! reconciliation: it knows where each logical column's sub-fields begin and
//! end. Its values may collapse characters outside the legacy range to a
//! placeholder, so the text itself is only trusted up to the lossy
//! comparison in [`crate::compare`].

use crate::error::{Error, Result};
use crate::schema::{COLUMN_COUNT, FIELD_SEPARATOR, KEY_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One authoritative record from the reference export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Record identifier (the `no` column)
    pub id: String,
    /// The 20 column values, in schema order
    pub fields: Vec<String>,
}

impl ReferenceRow {
    /// Get a column value by schema position
    pub fn field(&self, index: usize) -> &str {
        &self.fields[index]
    }

    /// Count of internal separators in each column value, in schema order.
    ///
    /// Each count is one less than the number of physical tokens the column
    /// occupies in the flat export; this is the boundary plan the reconciler
    /// applies to the flat record's token sequence.
    pub fn separator_counts(&self) -> Vec<usize> {
        self.fields
            .iter()
            .map(|value| value.matches(FIELD_SEPARATOR).count())
            .collect()
    }

    /// Total physical tokens this record occupies in the flat export
    pub fn expected_tokens(&self) -> usize {
        COLUMN_COUNT + self.separator_counts().iter().sum::<usize>()
    }
}

/// The reference table, keyed by record identifier
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: HashMap<String, ReferenceRow>,
}

impl ReferenceTable {
    /// Load the reference table from a header-free CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::read_from(BufReader::new(file), path)
    }

    /// Load the reference table from CSV content (useful for testing)
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::read_from(content.as_bytes(), Path::new("<string>"))
    }

    fn read_from<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);

        let mut rows: HashMap<String, ReferenceRow> = HashMap::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| Error::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

            if record.len() != COLUMN_COUNT {
                return Err(Error::CsvParse {
                    path: path.to_path_buf(),
                    message: format!(
                        "record {} has {} field(s), expected {}",
                        index + 1,
                        record.len(),
                        COLUMN_COUNT
                    ),
                });
            }

            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            let id = fields[KEY_COLUMN].clone();
            if rows.contains_key(&id) {
                return Err(Error::DuplicateKey {
                    export: "reference",
                    record: id,
                });
            }
            rows.insert(id.clone(), ReferenceRow { id, fields });
        }

        Ok(Self { rows })
    }

    /// Look up a reference row by record identifier
    pub fn get(&self, id: &str) -> Option<&ReferenceRow> {
        self.rows.get(id)
    }

    /// Check whether a record identifier exists
    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of reference rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
