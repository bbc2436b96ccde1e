//! Provides timing-safe comparison of secrets.
use ring::constant_time::verify_slices_are_equal;

/// Returns whether both slices hold exactly the same bytes.
///
/// For slices of equal length the running time does not depend on where the
/// first differing byte is. Slices of different length are rejected early,
/// so the length of the secret is not hidden.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    verify_slices_are_equal(a, b).is_ok()
}
