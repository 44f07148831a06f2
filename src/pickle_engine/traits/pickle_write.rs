use crate::pickle_engine::Pickle;

/// Types that know how to append themselves to a pickle.
///
/// Implement this (together with [`PickleRead`](super::PickleRead)) for
/// records that travel as pickles. Field order is the only schema, so a
/// record that may change shape should write a version field first and
/// branch on it when reading.
pub trait PickleWrite {
    fn write_to(&self, pickle: &mut Pickle<'_>);
}

macro_rules! impl_pickle_write {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl PickleWrite for $ty {
                #[inline]
                fn write_to(&self, pickle: &mut Pickle<'_>) {
                    pickle.$method(*self);
                }
            }
        )*
    };
}

impl_pickle_write! {
    bool => write_bool,
    i32 => write_int,
    u16 => write_u16,
    u32 => write_u32,
    i64 => write_i64,
    u64 => write_u64,
    f32 => write_f32,
    f64 => write_f64,
}

impl PickleWrite for str {
    fn write_to(&self, pickle: &mut Pickle<'_>) {
        pickle.write_string(self);
    }
}

impl PickleWrite for String {
    fn write_to(&self, pickle: &mut Pickle<'_>) {
        pickle.write_string(self);
    }
}

/// Byte vectors are written as self-describing blobs.
impl PickleWrite for [u8] {
    fn write_to(&self, pickle: &mut Pickle<'_>) {
        pickle.write_data(self);
    }
}

impl PickleWrite for Vec<u8> {
    fn write_to(&self, pickle: &mut Pickle<'_>) {
        pickle.write_data(self);
    }
}

impl<T: PickleWrite + ?Sized> PickleWrite for &T {
    fn write_to(&self, pickle: &mut Pickle<'_>) {
        (**self).write_to(pickle);
    }
}
