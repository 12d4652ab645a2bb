//! The fixed 20-column schema of the rime table

/// Number of logical columns in every record
pub const COLUMN_COUNT: usize = 20;

/// Logical column names, in the order physical tokens are consumed per row.
///
/// The order is load-bearing: the flat export writes every column's
/// sub-fields in this sequence, so regrouping walks it front to back. Note
/// the confusable pair at the head of the schema: `no''` is the total index
/// of the old (Unicode 3.1-era) edition, which misses four small rhymes,
/// while `no` is the current total index and the record identifier.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "no''",        // old total index
    "no",          // current total index; the record identifier
    "cet",         // fanqie spelling
    "glyphs",      // headwords collected under the small rhyme
    "sum",         // headword count
    "validation",  // proofreading mark
    "miuk",        // rhyme heading, "volume.rhyme" numbering
    "sievhiunnNO", // ordinal of the small rhyme within its rhyme
    "sjeng",       // initial
    "xu",          // open or closed articulation
    "tonk",        // division
    "hiunnbuu",    // rhyme group, levelled across the four tones
    "dew",         // tone
    "romA",        // Polyhedron romanization
    "romB",        // alternative romanization
    "note",        // notes carried over from the old edition
    "note2",       // notes from the re-proofreading
    "miuknote",    // rhyme-attribution notes for irregular small rhymes
    "v'n'others",  // variant glyphs, non-headword duplicates, Jiyun additions
    "代用",        // quasi-IDS descriptions for glyphs Unicode 3.1 lacks
];

/// Schema position of the record identifier (the `no` column).
///
/// Also its physical position in every flat record: the first column never
/// contains the sub-field separator, so the identifier is always the second
/// token.
pub const KEY_COLUMN: usize = 1;

/// Sub-field separator inside logical columns; also the flat export's
/// field delimiter
pub const FIELD_SEPARATOR: char = '|';

/// Delimiter of the emitted canonical file
pub const OUTPUT_DELIMITER: char = ';';

/// Marker substituted for undecodable bytes when reading the flat export
pub const REPLACEMENT_MARKER: char = char::REPLACEMENT_CHARACTER;

/// Placeholder the reference export writes for characters outside its
/// legacy range
pub const ASTRAL_PLACEHOLDER: &str = "??";

/// Highest code point the reference export can represent directly
pub const LEGACY_RANGE_MAX: u32 = 0xFFFF;

/// Number of fixed header lines at the top of the flat export
pub const HEADER_LINES: usize = 27;

/// Find a column's schema position by name
pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|&c| c == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_twenty_columns() {
        assert_eq!(COLUMNS.len(), COLUMN_COUNT);
        assert_eq!(COLUMN_COUNT, 20);
    }

    #[test]
    fn test_index_columns_stay_distinct() {
        // The old and current total index differ only by the trailing quotes.
        assert_eq!(column_index("no''"), Some(0));
        assert_eq!(column_index("no"), Some(KEY_COLUMN));
        assert_ne!(column_index("no''"), column_index("no"));
    }

    #[test]
    fn test_column_names_are_unique() {
        for (i, name) in COLUMNS.iter().enumerate() {
            assert_eq!(column_index(name), Some(i), "duplicate column '{}'", name);
        }
    }

    #[test]
    fn test_column_index_unknown() {
        assert_eq!(column_index("nope"), None);
        assert_eq!(column_index("NO"), None);
    }
}
