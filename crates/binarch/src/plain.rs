use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

mod private {
    pub trait Sealed {}
}

/// Marker for fixed-width integers and floats.
///
/// A plain value's in-memory representation is used directly as its wire
/// representation (native byte order), so a `Vec` of them is moved through the
/// buffer codec in one shot instead of element by element.
///
/// Sealed: anything else goes through [`Serializable`](crate::Serializable).
pub trait Plain
where
    Self: FromBytes + IntoBytes + Immutable + KnownLayout + Copy + private::Sealed,
{
}

macro_rules! impl_plain {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}
            impl Plain for $t {}
        )*
    };
}

impl_plain!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);
