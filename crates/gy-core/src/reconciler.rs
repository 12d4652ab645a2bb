//! The reconciliation engine
//!
//! Recovers what each export lost: the reference row knows every column's
//! sub-field count but may have degraded the text; the flat record preserves
//! the text but concatenates all sub-fields into one token stream. For each
//! record the engine checks that the token count fits the reference row's
//! boundary plan, regroups the tokens into the 20 logical columns, and
//! cross-validates every regrouped value against the reference value under
//! the lossy comparison. Any disagreement means the two exports have drifted
//! apart and aborts the run.

use crate::compare::values_match;
use crate::error::{Error, Result};
use crate::flat::{FlatExport, FlatRecord};
use crate::reference::{ReferenceRow, ReferenceTable};
use crate::schema::{COLUMNS, COLUMN_COUNT, FIELD_SEPARATOR};
use serde::{Deserialize, Serialize};

/// A fully reconciled record: the 20 logical field values in schema order,
/// with original text and correct column boundaries both recovered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciledRow {
    /// Record identifier
    pub id: String,
    /// Logical field values, in schema order; multi-valued fields keep
    /// their internal sub-field separators
    pub fields: Vec<String>,
}

impl ReconciledRow {
    /// Get a field value by schema position
    pub fn field(&self, index: usize) -> &str {
        &self.fields[index]
    }

    /// Iterate `(column name, field value)` pairs in schema order
    pub fn named_fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        COLUMNS
            .iter()
            .copied()
            .zip(self.fields.iter().map(String::as_str))
    }
}

/// Reconcile every flat record against its reference row, in file order.
///
/// The output row order equals the flat export's record order, not the
/// reference table's.
pub fn reconcile(reference: &ReferenceTable, export: &FlatExport) -> Result<Vec<ReconciledRow>> {
    let mut rows = Vec::with_capacity(export.records.len());
    for record in &export.records {
        let reference_row = reference.get(&record.id).ok_or_else(|| Error::MissingReference {
            record: record.id.clone(),
        })?;
        rows.push(reconcile_record(reference_row, record)?);
    }
    Ok(rows)
}

/// Reconcile one flat record against its reference row
pub fn reconcile_record(reference: &ReferenceRow, record: &FlatRecord) -> Result<ReconciledRow> {
    let counts = reference.separator_counts();

    // Width check: one token per column as a baseline, plus one extra token
    // per internal separator. Inequality means the exports are out of sync
    // for this record.
    let expected = COLUMN_COUNT + counts.iter().sum::<usize>();
    if record.tokens.len() != expected {
        return Err(Error::WidthMismatch {
            record: record.id.clone(),
            expected,
            found: record.tokens.len(),
        });
    }

    let fields = regroup(&record.id, &counts, &record.tokens)?;

    for (index, &column) in COLUMNS.iter().enumerate() {
        let reference_value = reference.field(index);
        if !values_match(reference_value, &fields[index]) {
            return Err(Error::ValueMismatch {
                record: record.id.clone(),
                column,
                reference: reference_value.to_string(),
                reconciled: fields[index].clone(),
            });
        }
    }

    Ok(ReconciledRow {
        id: record.id.clone(),
        fields,
    })
}

/// Regroup physical tokens into logical fields.
///
/// This is the two-phase decode's second phase: `counts[c]` is the boundary
/// plan computed from the reference row (the number of internal separators
/// in column `c`'s value), and column `c` consumes `counts[c] + 1` tokens
/// from the stream, re-joined with the separator. The token sequence must
/// fit the plan exactly: running out of tokens mid-plan reports as a width
/// mismatch, tokens left over after the last column as an extra-tokens
/// failure. `record` only labels the errors.
pub fn regroup(record: &str, counts: &[usize], tokens: &[String]) -> Result<Vec<String>> {
    let expected: usize = counts.len() + counts.iter().sum::<usize>();
    let mut stream = tokens.iter();
    let mut fields = Vec::with_capacity(counts.len());

    for &count in counts {
        let mut field = String::new();
        for part in 0..=count {
            let token = stream.next().ok_or_else(|| Error::WidthMismatch {
                record: record.to_string(),
                expected,
                found: tokens.len(),
            })?;
            if part > 0 {
                field.push(FIELD_SEPARATOR);
            }
            field.push_str(token);
        }
        fields.push(field);
    }

    let leftover = stream.count();
    if leftover > 0 {
        return Err(Error::ExtraTokens {
            record: record.to_string(),
            leftover,
        });
    }

    Ok(fields)
}
