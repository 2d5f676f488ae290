//! Backend capabilities.
//!
//! A backing medium takes part in an archive by implementing [`Sink`] (for
//! writing) or [`Source`] (for reading). Every `io::Write` is a `Sink` and every
//! `io::Read` is a `Source`, so files, in-memory buffers and sockets all work
//! out of the box.
//!
//! ```text
//! i32 / u32:   [u8; 4]                       native byte order
//! text:        len: u32, [u8; len]           len = byte count + 1, last byte 0x00
//! buffer:      len: u32, [u8; len]           len = byte count
//! ```

use std::io::{self, Read, Write};

use crate::{Error, Result};

pub(crate) const PREFIX_SIZE: usize = size_of::<u32>();

/// Appended to every encoded text.
pub const TERMINATOR: u8 = 0;

/// Converts an in-memory length to its 4-byte wire prefix.
#[inline]
pub(crate) fn wire_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::LengthOverflow { len })
}

/// Write half of a backing medium.
///
/// Every method returns the number of bytes it put on the medium.
pub trait Sink {
    fn encode_i32(&mut self, value: i32) -> Result<usize>;

    fn encode_u32(&mut self, value: u32) -> Result<usize>;

    fn encode_text(&mut self, text: &str) -> Result<usize>;

    /// Writes `bytes` behind a byte-count prefix.
    fn encode_buffer(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Pushes anything buffered down to the medium.
    fn finish(&mut self) -> Result<()>;
}

/// Read half of a backing medium.
///
/// Every method also returns the number of bytes it consumed.
pub trait Source {
    fn decode_i32(&mut self) -> Result<(usize, i32)>;

    fn decode_u32(&mut self) -> Result<(usize, u32)>;

    /// Reads a text and trims its terminator.
    fn decode_text(&mut self) -> Result<(usize, String)>;

    /// Reads a byte-count prefix, then exactly `dst.len()` bytes into `dst`.
    ///
    /// A prefix that disagrees with `dst.len()` is [`Error::SizeMismatch`], and
    /// `dst` is left untouched.
    fn decode_buffer(&mut self, dst: &mut [u8]) -> Result<usize>;
}

impl<W: Write + ?Sized> Sink for W {
    #[inline]
    fn encode_i32(&mut self, value: i32) -> Result<usize> {
        let bytes = value.to_ne_bytes();
        self.write_all(&bytes)?;
        Ok(bytes.len())
    }

    #[inline]
    fn encode_u32(&mut self, value: u32) -> Result<usize> {
        let bytes = value.to_ne_bytes();
        self.write_all(&bytes)?;
        Ok(bytes.len())
    }

    fn encode_text(&mut self, text: &str) -> Result<usize> {
        let body = text.as_bytes();
        let len = wire_len(body.len() + 1)?;
        self.write_all(&len.to_ne_bytes())?;
        self.write_all(body)?;
        self.write_all(&[TERMINATOR])?;
        Ok(PREFIX_SIZE + len as usize)
    }

    fn encode_buffer(&mut self, bytes: &[u8]) -> Result<usize> {
        let len = wire_len(bytes.len())?;
        self.write_all(&len.to_ne_bytes())?;
        self.write_all(bytes)?;
        Ok(PREFIX_SIZE + bytes.len())
    }

    #[inline]
    fn finish(&mut self) -> Result<()> {
        Write::flush(self)?;
        Ok(())
    }
}

impl<R: Read + ?Sized> Source for R {
    #[inline]
    fn decode_i32(&mut self) -> Result<(usize, i32)> {
        let mut buf = [0u8; size_of::<i32>()];
        self.read_exact(&mut buf)?;
        Ok((buf.len(), i32::from_ne_bytes(buf)))
    }

    #[inline]
    fn decode_u32(&mut self) -> Result<(usize, u32)> {
        let mut buf = [0u8; size_of::<u32>()];
        self.read_exact(&mut buf)?;
        Ok((buf.len(), u32::from_ne_bytes(buf)))
    }

    fn decode_text(&mut self) -> Result<(usize, String)> {
        let (prefix_len, len) = self.decode_u32()?;
        let len = len as usize;

        // Grows with what is actually there rather than trusting the prefix.
        let mut body = Vec::new();
        Read::take(&mut *self, len as u64).read_to_end(&mut body)?;
        if body.len() != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("text truncated: expected {len} bytes, got {}", body.len()),
            )
            .into());
        }

        if body.last() == Some(&TERMINATOR) {
            body.pop();
        }

        Ok((prefix_len + len, String::from_utf8(body)?))
    }

    fn decode_buffer(&mut self, dst: &mut [u8]) -> Result<usize> {
        let (prefix_len, found) = self.decode_u32()?;
        let found = found as usize;
        if found != dst.len() {
            return Err(Error::SizeMismatch {
                expected: dst.len(),
                found,
            });
        }
        self.read_exact(dst)?;
        Ok(prefix_len + found)
    }
}
