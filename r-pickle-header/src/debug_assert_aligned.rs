/// Debug-only field-alignment assertion that is safe to export.
///
/// The symbol is always present so other crates can call it without cfg
/// fences of their own. In debug/test builds it asserts that `off` is a
/// multiple of [`FIELD_ALIGNMENT`](crate::constants::FIELD_ALIGNMENT); in
/// release/bench builds it compiles to nothing.
#[inline]
pub fn debug_assert_aligned_offset(off: usize) {
    #[cfg(any(test, debug_assertions))]
    {
        use crate::constants::FIELD_ALIGNMENT;

        debug_assert!(
            FIELD_ALIGNMENT.is_power_of_two(),
            "FIELD_ALIGNMENT must be a power of two"
        );
        debug_assert!(
            off.is_multiple_of(FIELD_ALIGNMENT),
            "offset not {}-byte aligned (got {})",
            FIELD_ALIGNMENT,
            off
        );
    }

    #[cfg(not(any(test, debug_assertions)))]
    {
        // Release/bench: no-op. Keep arg used to avoid warnings.
        let _ = off;
    }
}
