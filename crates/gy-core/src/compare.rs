//! The lossy comparison between reference and reconciled values

use crate::schema::{ASTRAL_PLACEHOLDER, LEGACY_RANGE_MAX, REPLACEMENT_MARKER};

/// Compare a reference value against a reconciled value.
///
/// This is deliberately *not* a symmetric equality. The two exports degrade
/// the text in different ways, so each side is read with its own tolerance:
///
/// - the reference export collapses every character above the legacy 16-bit
///   range to the literal placeholder `??`, so a reconciled character above
///   that range must line up with exactly those two characters on the
///   reference side;
/// - an undecodable byte sequence in the flat export surfaces as the
///   replacement marker in the reconciled value; the marker is a wildcard
///   that matches any single reference character;
/// - every other reconciled character must equal the reference character
///   code point for code point.
///
/// Both values must be exhausted together. For values containing neither
/// markers nor characters above the legacy range this degenerates to plain
/// equality, so the comparison is reflexive on clean data.
pub fn values_match(reference: &str, reconciled: &str) -> bool {
    let mut expected = reference.chars();

    for c in reconciled.chars() {
        if c as u32 > LEGACY_RANGE_MAX {
            for placeholder in ASTRAL_PLACEHOLDER.chars() {
                if expected.next() != Some(placeholder) {
                    return false;
                }
            }
        } else if c == REPLACEMENT_MARKER {
            if expected.next().is_none() {
                return false;
            }
        } else if expected.next() != Some(c) {
            return false;
        }
    }

    expected.next().is_none()
}
