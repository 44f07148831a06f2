use std::borrow::Cow;
use std::mem;

/// Reinterprets a byte slice as a slice of `T`, falling back to copying if
/// the bytes are not aligned for `T`.
///
/// Pickle fields are 4-byte aligned relative to the start of the buffer,
/// but the buffer itself may live at any address (a view over a network
/// receive buffer, for instance). Typed reads stay zero-copy in the common
/// case and never perform a misaligned load.
///
/// # Type Parameters
/// - `T`: Target element type (e.g., `u16`, `u32`)
/// - `N`: Fixed byte size of each element, must be equal to `size_of::<T>()`
///
/// # Arguments
/// - `bytes`: Raw input bytes
/// - `from_ne_bytes`: Conversion for one `[u8; N]` chunk into `T` in host
///   byte order (e.g., `u16::from_ne_bytes`)
///
/// # Returns
/// A [`Cow<[T]>`] that borrows `bytes` when alignment allows it, and owns a
/// decoded copy otherwise.
///
/// # Panics
/// - If `mem::size_of::<T>() != N`
/// - If the input length is not a multiple of `N`
///
/// # Example
/// ```rust
/// use std::borrow::Cow;
/// let raw = 0x1234u16.to_ne_bytes();
/// let result: Cow<[u16]> = r_pickle::utils::align_or_copy::<u16, 2>(&raw, u16::from_ne_bytes);
/// assert_eq!(result[0], 0x1234);
/// ```
pub fn align_or_copy<T, const N: usize>(
    bytes: &[u8],
    from_ne_bytes: fn([u8; N]) -> T,
) -> Cow<'_, [T]>
where
    T: bytemuck::Pod,
{
    assert_eq!(mem::size_of::<T>(), N, "Mismatched size for target type");
    assert!(
        bytes.len().is_multiple_of(N),
        "Input length must be a multiple of element size"
    );

    match bytemuck::try_cast_slice::<u8, T>(bytes) {
        Ok(aligned) => Cow::Borrowed(aligned),
        Err(_) => Cow::Owned(
            bytes
                .chunks_exact(N)
                .map(|chunk| {
                    let mut raw = [0u8; N];
                    raw.copy_from_slice(chunk);
                    from_ne_bytes(raw)
                })
                .collect(),
        ),
    }
}
