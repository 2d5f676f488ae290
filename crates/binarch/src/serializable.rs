use crate::{Archive, Result};

/// A type that can walk its own fields through an [`Archive`].
///
/// `serialize` is called once for writing and once for reading. It must issue
/// the same operations, in the same order and with the same types, both times,
/// and must not branch on the archive's mode: the format has no field tags, so
/// any divergence silently desynchronizes the stream.
///
/// ```
/// use binarch::{Archive, Result, Serializable};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
///     label: String,
/// }
///
/// impl Serializable for Point {
///     fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
///         archive.value(&mut self.x)?;
///         archive.value(&mut self.y)?;
///         archive.value(&mut self.label)
///     }
/// }
/// ```
pub trait Serializable {
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()>;

    /// Container algorithm used for `Vec<Self>`.
    ///
    /// Defaults to the per-element path. Plain numeric types override it with
    /// the bulk path, which fixes the choice per element type at compile time.
    #[inline]
    fn serialize_seq<A: Archive>(seq: &mut Vec<Self>, archive: &mut A) -> Result<()>
    where
        Self: Sized + Default,
    {
        archive.composite_seq(seq)
    }
}

impl Serializable for i32 {
    #[inline]
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        archive.int32(self)
    }

    #[inline]
    fn serialize_seq<A: Archive>(seq: &mut Vec<Self>, archive: &mut A) -> Result<()>
    where
        Self: Sized + Default,
    {
        archive.plain_seq(seq)
    }
}

impl Serializable for u32 {
    #[inline]
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        archive.uint32(self)
    }

    #[inline]
    fn serialize_seq<A: Archive>(seq: &mut Vec<Self>, archive: &mut A) -> Result<()>
    where
        Self: Sized + Default,
    {
        archive.plain_seq(seq)
    }
}

macro_rules! impl_serializable_for_plain {
    ($($t:ty),*) => {
        $(
            impl Serializable for $t {
                #[inline]
                fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
                    archive.plain(self)
                }

                #[inline]
                fn serialize_seq<A: Archive>(seq: &mut Vec<Self>, archive: &mut A) -> Result<()>
                where
                    Self: Sized + Default,
                {
                    archive.plain_seq(seq)
                }
            }
        )*
    };
}

impl_serializable_for_plain!(u8, u16, u64, u128, i8, i16, i64, i128, f32, f64);

impl Serializable for String {
    #[inline]
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        archive.text(self)
    }
}

impl<T> Serializable for Vec<T>
where
    T: Serializable + Default,
{
    #[inline]
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        T::serialize_seq(self, archive)
    }
}

impl<T> Serializable for Box<T>
where
    T: Serializable + ?Sized,
{
    #[inline]
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        (**self).serialize(archive)
    }
}
