use std::fmt;

use log::{error, trace};
use zerocopy::{FromZeros, IntoBytes};

use crate::{Error, Plain, Result, Serializable, Sink, Source, codec::wire_len};

/// Direction of every operation issued through an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Write,
    Read,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => f.write_str("writing"),
            Self::Read => f.write_str("reading"),
        }
    }
}

/// Codec context bound to one backing medium and one [`Mode`].
///
/// Every operation takes its value by `&mut`: an [`Encoder`] encodes it, a
/// [`Decoder`] overwrites it with what it decodes. A [`Serializable`] type
/// therefore issues the same calls in the same order for both directions, and
/// that order is the whole schema; nothing on the wire names a field.
pub trait Archive: Sized {
    fn mode(&self) -> Mode;

    #[inline]
    fn is_write(&self) -> bool {
        self.mode() == Mode::Write
    }

    #[inline]
    fn is_read(&self) -> bool {
        self.mode() == Mode::Read
    }

    fn int32(&mut self, value: &mut i32) -> Result<()>;

    fn uint32(&mut self, value: &mut u32) -> Result<()>;

    fn text(&mut self, value: &mut String) -> Result<()>;

    /// A single plain value outside a container, carried as a one-value buffer.
    fn plain<T: Plain>(&mut self, value: &mut T) -> Result<()>;

    /// Bulk container path: element count, then the elements' memory in one buffer.
    fn plain_seq<T: Plain>(&mut self, seq: &mut Vec<T>) -> Result<()>;

    /// Per-element container path: element count, then each element in order.
    fn composite_seq<T>(&mut self, seq: &mut Vec<T>) -> Result<()>
    where
        T: Serializable + Default;

    /// Runs `value`'s own traversal against this archive.
    #[inline]
    fn value<T: Serializable + ?Sized>(&mut self, value: &mut T) -> Result<()> {
        value.serialize(self)
    }
}

/// Write side of an archive.
#[derive(Debug)]
#[must_use = "Encoder should be finished to flush buffered output"]
pub struct Encoder<S: Sink> {
    sink: S,
    written: usize,
}

impl<S: Sink> Encoder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, written: 0 }
    }

    /// Bytes handed to the sink so far.
    #[inline]
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Flushes the sink and gives it back.
    pub fn finish(mut self) -> Result<S> {
        self.sink.finish()?;
        Ok(self.sink)
    }

    #[inline]
    fn count(&mut self, len: usize) -> Result<()> {
        let count = wire_len(len)?;
        self.written += self.sink.encode_u32(count)?;
        Ok(())
    }
}

impl<S: Sink> Archive for Encoder<S> {
    #[inline]
    fn mode(&self) -> Mode {
        Mode::Write
    }

    #[inline]
    fn int32(&mut self, value: &mut i32) -> Result<()> {
        self.written += self.sink.encode_i32(*value)?;
        Ok(())
    }

    #[inline]
    fn uint32(&mut self, value: &mut u32) -> Result<()> {
        self.written += self.sink.encode_u32(*value)?;
        Ok(())
    }

    #[inline]
    fn text(&mut self, value: &mut String) -> Result<()> {
        self.written += self.sink.encode_text(value)?;
        Ok(())
    }

    #[inline]
    fn plain<T: Plain>(&mut self, value: &mut T) -> Result<()> {
        self.written += self.sink.encode_buffer(value.as_bytes())?;
        Ok(())
    }

    fn plain_seq<T: Plain>(&mut self, seq: &mut Vec<T>) -> Result<()> {
        let bytes = seq.as_slice().as_bytes();
        // Checked up front so an oversized payload doesn't leave a dangling count.
        wire_len(bytes.len())?;
        trace!("Encoding {} plain elements ({} bytes)", seq.len(), bytes.len());

        self.count(seq.len())?;
        self.written += self.sink.encode_buffer(bytes)?;
        Ok(())
    }

    fn composite_seq<T>(&mut self, seq: &mut Vec<T>) -> Result<()>
    where
        T: Serializable + Default,
    {
        trace!("Encoding {} composite elements", seq.len());

        self.count(seq.len())?;
        for item in seq.iter_mut() {
            item.serialize(self)?;
        }
        Ok(())
    }
}

/// Read side of an archive.
#[derive(Debug)]
pub struct Decoder<S: Source> {
    source: S,
    read: usize,
}

impl<S: Source> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self { source, read: 0 }
    }

    /// Bytes consumed from the source so far.
    #[inline]
    pub fn bytes_read(&self) -> usize {
        self.read
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    #[inline]
    fn count(&mut self) -> Result<usize> {
        let (read, count) = self.source.decode_u32()?;
        self.read += read;
        Ok(count as usize)
    }

    fn buffer(&mut self, dst: &mut [u8]) -> Result<()> {
        let read = self.source.decode_buffer(dst).inspect_err(|e| {
            if let Error::SizeMismatch { .. } = e {
                error!("Stream integrity violated after {} bytes: {e}", self.read);
            }
        })?;
        self.read += read;
        Ok(())
    }
}

impl<S: Source> Archive for Decoder<S> {
    #[inline]
    fn mode(&self) -> Mode {
        Mode::Read
    }

    #[inline]
    fn int32(&mut self, value: &mut i32) -> Result<()> {
        let (read, decoded) = self.source.decode_i32()?;
        self.read += read;
        *value = decoded;
        Ok(())
    }

    #[inline]
    fn uint32(&mut self, value: &mut u32) -> Result<()> {
        let (read, decoded) = self.source.decode_u32()?;
        self.read += read;
        *value = decoded;
        Ok(())
    }

    #[inline]
    fn text(&mut self, value: &mut String) -> Result<()> {
        let (read, decoded) = self.source.decode_text()?;
        self.read += read;
        *value = decoded;
        Ok(())
    }

    fn plain<T: Plain>(&mut self, value: &mut T) -> Result<()> {
        let mut decoded = T::new_zeroed();
        self.buffer(decoded.as_mut_bytes())?;
        *value = decoded;
        Ok(())
    }

    fn plain_seq<T: Plain>(&mut self, seq: &mut Vec<T>) -> Result<()> {
        let count = self.count()?;
        let len = count
            .checked_mul(size_of::<T>())
            .ok_or(Error::Capacity { len: usize::MAX })?;
        trace!("Decoding {count} plain elements ({len} bytes)");

        // Filled off to the side so a bad payload never leaves `seq` half-written.
        let mut decoded = T::new_vec_zeroed(count).map_err(|_| Error::Capacity { len })?;
        self.buffer(decoded.as_mut_slice().as_mut_bytes())?;
        *seq = decoded;
        Ok(())
    }

    fn composite_seq<T>(&mut self, seq: &mut Vec<T>) -> Result<()>
    where
        T: Serializable + Default,
    {
        let count = self.count()?;
        trace!("Decoding {count} composite elements");

        // Existing elements are overwritten in place; missing ones start from
        // `Default` and are only allocated once their bytes actually arrive.
        seq.truncate(count);
        for item in seq.iter_mut() {
            item.serialize(self)?;
        }
        while seq.len() < count {
            let mut item = T::default();
            item.serialize(self)?;
            seq.push(item);
        }
        Ok(())
    }
}
