//! Canonical output emission
//!
//! Writes the reconciled dataset as a semicolon-delimited text file: the
//! preserved flat-export header with its pipe delimiters swapped for
//! semicolons, then one line per record with the 20 logical fields joined
//! by semicolons. Multi-valued fields keep their internal pipe separators,
//! so both delimiter levels survive in the output. A semicolon inside any
//! field value would corrupt that structure; the whole dataset is scanned
//! for collisions before a single byte is written.

use crate::error::{Error, Result};
use crate::reconciler::ReconciledRow;
use crate::schema::{COLUMNS, FIELD_SEPARATOR, OUTPUT_DELIMITER};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Verify that no field value in any row contains the output delimiter.
///
/// Rows are checked in order and the first offending field is reported
/// with its record and column.
pub fn check_delimiters(rows: &[ReconciledRow]) -> Result<()> {
    for row in rows {
        for (index, field) in row.fields.iter().enumerate() {
            if field.contains(OUTPUT_DELIMITER) {
                return Err(Error::DelimiterCollision {
                    record: row.id.clone(),
                    column: COLUMNS[index],
                    value: field.clone(),
                    delimiter: OUTPUT_DELIMITER,
                });
            }
        }
    }
    Ok(())
}

/// Write the canonical file: header lines with the field separator swapped
/// for the output delimiter, then one delimited line per record.
///
/// The collision scan runs over the entire dataset first; on failure
/// nothing is written.
pub fn write_output<W: Write>(
    writer: &mut W,
    header: &[String],
    rows: &[ReconciledRow],
) -> Result<()> {
    check_delimiters(rows)?;

    let delimiter = OUTPUT_DELIMITER.to_string();
    for line in header {
        writeln!(writer, "{}", line.replace(FIELD_SEPARATOR, &delimiter))?;
    }
    for row in rows {
        writeln!(writer, "{}", row.fields.join(&delimiter))?;
    }
    Ok(())
}

/// Write the canonical file to `path`
pub fn write_output_file<P: AsRef<Path>>(
    path: P,
    header: &[String],
    rows: &[ReconciledRow],
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_output(&mut writer, header, rows)?;
    writer.flush()?;
    Ok(())
}
