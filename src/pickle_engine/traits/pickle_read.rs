use crate::pickle_engine::PickleIterator;

/// Types that can be read back from a pickle, in the order they were
/// written by their [`PickleWrite`](super::PickleWrite) counterpart.
///
/// Returning `None` from any step aborts the whole value; when called
/// through [`PickleIterator::read_value`] the cursor is then left where it
/// started.
pub trait PickleRead: Sized {
    fn read_from(iter: &mut PickleIterator<'_>) -> Option<Self>;
}

macro_rules! impl_pickle_read {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl PickleRead for $ty {
                #[inline]
                fn read_from(iter: &mut PickleIterator<'_>) -> Option<Self> {
                    iter.$method()
                }
            }
        )*
    };
}

impl_pickle_read! {
    bool => read_bool,
    i32 => read_int,
    u16 => read_u16,
    u32 => read_u32,
    i64 => read_i64,
    u64 => read_u64,
    f32 => read_f32,
    f64 => read_f64,
    String => read_string,
}

impl PickleRead for Vec<u8> {
    fn read_from(iter: &mut PickleIterator<'_>) -> Option<Self> {
        iter.read_data().map(<[u8]>::to_vec)
    }
}
