//! End-to-end tests over the full reconciliation pipeline: parse both
//! exports, regroup and cross-validate, emit the canonical file.

use gy_core::schema::{COLUMN_COUNT, HEADER_LINES};
use gy_core::{
    reconcile, write_output, write_output_file, Error, FlatExport, ReferenceTable, RunReport,
};
use std::fs;

/// One well-formed record as the database export carries it. Column 18
/// holds two sub-fields, the second one with an astral glyph degraded to
/// the two-character placeholder.
const REFERENCE: [&str; COLUMN_COUNT] = [
    "1", "1", "德紅切", "東菄鶇", "3", ".", "1.01東", "1", "端", "開",
    "一", "東", "平", "tung", "tung", "", "", "", "餗|示??", "",
];

/// The same record as the flat export carries it: original astral glyph
/// intact, column boundaries lost to the shared separator.
const FLAT: [&str; COLUMN_COUNT] = [
    "1", "1", "德紅切", "東菄鶇", "3", ".", "1.01東", "1", "端", "開",
    "一", "東", "平", "tung", "tung", "", "", "", "餗|示\u{20000}", "",
];

fn csv_line(values: &[&str]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('"', "\"\"")))
        .collect();
    quoted.join(",") + "\n"
}

/// The fixed header block: one line carries a pipe so the delimiter
/// substitution is observable.
fn header_block() -> String {
    (0..HEADER_LINES)
        .map(|i| {
            if i == 1 {
                "source|Sqxswen 0704\n".to_string()
            } else {
                format!("header line {}\n", i + 1)
            }
        })
        .collect()
}

fn flat_content(lines: &[&str]) -> String {
    let mut content = header_block();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

#[test]
fn test_full_pipeline_emits_canonical_file() {
    let table = ReferenceTable::from_csv_str(&csv_line(&REFERENCE)).unwrap();
    let line = FLAT.join("|");
    let export = FlatExport::parse(&flat_content(&[&line]), &table).unwrap();
    let rows = reconcile(&table, &export).unwrap();

    let mut out = Vec::new();
    write_output(&mut out, &export.header, &rows).unwrap();
    let written = String::from_utf8(out).unwrap();

    let mut expected = header_block().replace('|', ";");
    expected.push_str(
        "1;1;德紅切;東菄鶇;3;.;1.01東;1;端;開;一;東;平;tung;tung;;;;餗|示\u{20000};\n",
    );
    assert_eq!(written, expected);
}

#[test]
fn test_flat_record_without_reference_row_is_rejected() {
    let table = ReferenceTable::from_csv_str(&csv_line(&REFERENCE)).unwrap();

    let mut orphan = FLAT;
    orphan[0] = "404";
    orphan[1] = "404";
    let line = orphan.join("|");

    let err = FlatExport::parse(&flat_content(&[&line]), &table).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingReference { ref record } if record == "404"
    ));
}

#[test]
fn test_missing_flat_record_is_a_cardinality_mismatch() {
    let mut second = REFERENCE;
    second[0] = "2";
    second[1] = "2";
    let csv = csv_line(&REFERENCE) + &csv_line(&second);
    let table = ReferenceTable::from_csv_str(&csv).unwrap();

    let line = FLAT.join("|");
    let err = FlatExport::parse(&flat_content(&[&line]), &table).unwrap_err();
    assert!(matches!(
        err,
        Error::CardinalityMismatch {
            reference_rows: 2,
            flat_records: 1,
        }
    ));
}

#[test]
fn test_diverging_values_name_the_column() {
    let table = ReferenceTable::from_csv_str(&csv_line(&REFERENCE)).unwrap();

    let mut drifted = FLAT;
    drifted[3] = "東菄凍";
    let line = drifted.join("|");
    let export = FlatExport::parse(&flat_content(&[&line]), &table).unwrap();

    let err = reconcile(&table, &export).unwrap_err();
    assert!(matches!(
        err,
        Error::ValueMismatch { column: "glyphs", .. }
    ));
}

#[test]
fn test_separator_drift_is_a_width_mismatch() {
    let table = ReferenceTable::from_csv_str(&csv_line(&REFERENCE)).unwrap();

    // The flat side lost the sub-field separator in column 18.
    let mut drifted = FLAT;
    drifted[18] = "餗示\u{20000}";
    let line = drifted.join("|");
    let export = FlatExport::parse(&flat_content(&[&line]), &table).unwrap();

    let err = reconcile(&table, &export).unwrap_err();
    assert!(matches!(
        err,
        Error::WidthMismatch {
            expected: 21,
            found: 20,
            ..
        }
    ));
}

#[test]
fn test_marker_run_collapses_before_validation() {
    let mut reference = REFERENCE;
    reference[17] = "哀";
    let mut flat = FLAT;
    flat[17] = "\u{FFFD}\u{FFFD}\u{FFFD}";

    let table = ReferenceTable::from_csv_str(&csv_line(&reference)).unwrap();
    let line = flat.join("|");
    let export = FlatExport::parse(&flat_content(&[&line]), &table).unwrap();

    // The triple marker collapses to one, which then stands in for the
    // single reference character; the marker survives into the output.
    let rows = reconcile(&table, &export).unwrap();
    assert_eq!(rows[0].field(17), "\u{FFFD}");
}

#[test]
fn test_delimiter_collision_blocks_all_output() {
    let mut reference = REFERENCE;
    reference[15] = "cf. p.12; p.48";
    let mut flat = FLAT;
    flat[15] = "cf. p.12; p.48";

    let table = ReferenceTable::from_csv_str(&csv_line(&reference)).unwrap();
    let line = flat.join("|");
    let export = FlatExport::parse(&flat_content(&[&line]), &table).unwrap();
    let rows = reconcile(&table, &export).unwrap();

    let mut out = Vec::new();
    let err = write_output(&mut out, &export.header, &rows).unwrap_err();
    assert!(matches!(
        err,
        Error::DelimiterCollision { column: "note", .. }
    ));
    assert!(out.is_empty());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let reference_path = dir.path().join("mdbdump.csv");
    let flat_path = dir.path().join("Kuankhiunn0704.txt");
    let output_path = dir.path().join("Kuankhiunn0704-semicolon.txt");
    let report_path = dir.path().join("report.json");

    fs::write(&reference_path, csv_line(&REFERENCE)).unwrap();
    fs::write(&flat_path, flat_content(&[&FLAT.join("|")])).unwrap();

    let table = ReferenceTable::load(&reference_path).unwrap();
    let export = FlatExport::load(&flat_path, &table).unwrap();
    let rows = reconcile(&table, &export).unwrap();
    write_output_file(&output_path, &export.header, &rows).unwrap();

    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(written.lines().count(), HEADER_LINES + 1);
    assert!(written.ends_with("餗|示\u{20000};\n"));

    let report = RunReport::new(&table, &export, &rows);
    report.save(&report_path).unwrap();
    let loaded = RunReport::load(&report_path).unwrap();
    assert_eq!(loaded.reference_rows, 1);
    assert_eq!(loaded.records, 1);
    assert_eq!(loaded.astral_chars, 1);
    assert_eq!(loaded.columns.len(), COLUMN_COUNT);
}
