#![doc = include_str!("../README.md")]

use std::path::Path;

use log::debug;

#[cfg(feature = "derive")]
pub use binarch_derive::Serializable;

mod archive;
mod codec;
pub mod error;
mod file;
mod options;
mod plain;
mod serializable;

pub use archive::*;
pub use codec::{Sink, Source, TERMINATOR};
pub use error::*;
pub use file::*;
pub use options::*;
pub use plain::*;
pub use serializable::*;

/// Writes `object` to the file at `path`, creating or truncating it.
///
/// `object.serialize` runs exactly once against a fresh [`FileEncoder`]; the
/// file is flushed before returning and closed on every exit path.
pub fn serialize_to_file<T>(object: &mut T, path: impl AsRef<Path>) -> Result<()>
where
    T: Serializable + ?Sized,
{
    serialize_to_file_with(object, path, &FileOptions::default())
}

pub fn serialize_to_file_with<T>(
    object: &mut T,
    path: impl AsRef<Path>,
    options: &FileOptions,
) -> Result<()>
where
    T: Serializable + ?Sized,
{
    let path = path.as_ref();
    let mut encoder = FileEncoder::create_with(path, options)?;
    object.serialize(&mut encoder)?;

    let written = encoder.bytes_written();
    encoder.finish()?;
    debug!("Wrote {written} bytes to {}", path.display());

    Ok(())
}

/// Reads `object` back from the file at `path`.
///
/// `object` must already be in a state that can be overwritten field by field:
/// containers are resized as needed and scalars are replaced in place. If the
/// file can't be opened, `object` is left untouched.
pub fn serialize_from_file<T>(object: &mut T, path: impl AsRef<Path>) -> Result<()>
where
    T: Serializable + ?Sized,
{
    serialize_from_file_with(object, path, &FileOptions::default())
}

pub fn serialize_from_file_with<T>(
    object: &mut T,
    path: impl AsRef<Path>,
    options: &FileOptions,
) -> Result<()>
where
    T: Serializable + ?Sized,
{
    let path = path.as_ref();
    let mut decoder = FileDecoder::open_with(path, options)?;
    object.serialize(&mut decoder)?;
    debug!("Read {} bytes from {}", decoder.bytes_read(), path.display());

    Ok(())
}

/// Writes `object` into a new in-memory buffer.
pub fn serialize_to_vec<T>(object: &mut T) -> Result<Vec<u8>>
where
    T: Serializable + ?Sized,
{
    let mut encoder = Encoder::new(Vec::<u8>::new());
    object.serialize(&mut encoder)?;
    encoder.finish()
}

/// Reads `object` back from an in-memory buffer.
pub fn serialize_from_slice<T>(object: &mut T, bytes: &[u8]) -> Result<()>
where
    T: Serializable + ?Sized,
{
    let mut decoder = Decoder::new(bytes);
    object.serialize(&mut decoder)
}
