use crate::constants::FIELD_ALIGNMENT;

/// Rounds `n` up to the next multiple of `alignment` (a power of two).
///
/// # Panics
/// - If the rounded value does not fit in a `usize`. Use
///   [`checked_align_up`] for untrusted sizes.
#[inline]
pub const fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (n + (alignment - 1)) & !(alignment - 1)
}

/// Overflow-safe variant of [`align_up`].
///
/// Returns `None` when rounding `n` up would wrap past `usize::MAX`.
#[inline]
pub const fn checked_align_up(n: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match n.checked_add(alignment - 1) {
        Some(v) => Some(v & !(alignment - 1)),
        None => None,
    }
}

/// Rounds `n` up to the payload field alignment (4 bytes).
#[inline]
pub const fn align_field(n: usize) -> usize {
    align_up(n, FIELD_ALIGNMENT)
}

/// Returns `true` if `n` sits on a field boundary.
#[inline]
pub const fn is_field_aligned(n: usize) -> bool {
    n & (FIELD_ALIGNMENT - 1) == 0
}
