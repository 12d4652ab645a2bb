//! gy-core: Core library for reconciling the Guangyun rime table exports
//!
//! This library provides functionality to:
//! - Parse the database export of the rime table (quoted CSV, 20 columns)
//! - Parse the flat-text export (pipe-delimited, lossy legacy encoding)
//! - Regroup flat tokens into logical columns using the database export's
//!   per-column sub-field counts
//! - Cross-validate both exports field by field under a lossy comparison
//! - Emit the merged canonical semicolon-delimited file

pub mod compare;
pub mod emitter;
pub mod error;
pub mod flat;
pub mod reconciler;
pub mod reference;
pub mod report;
pub mod schema;

pub use compare::values_match;
pub use emitter::{check_delimiters, write_output, write_output_file};
pub use error::{Error, Result};
pub use flat::{FlatExport, FlatRecord};
pub use reconciler::{reconcile, reconcile_record, regroup, ReconciledRow};
pub use reference::{ReferenceRow, ReferenceTable};
pub use report::{ColumnStats, RunReport};
