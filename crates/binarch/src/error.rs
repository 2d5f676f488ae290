use std::{io, path::PathBuf, result, string::FromUtf8Error};

use thiserror::Error;

use crate::Mode;

pub type Result<T, E = Error> = result::Result<T, E>;

/// How bad an [`Error`] is for the stream it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing was misread. The caller may fix the cause and try again.
    Recoverable,
    /// The stream is corrupt or out of step with the traversal. Nothing after
    /// this point can be trusted.
    Fatal,
}

/// Error types for archive operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),

    #[error("Couldn't open {} for {mode}: {source}", path.display())]
    Open {
        path: PathBuf,
        mode: Mode,
        source: io::Error,
    },

    // Write errors
    #[error("Length {len} doesn't fit in a 32-bit prefix")]
    LengthOverflow { len: usize },

    // Integrity errors
    #[error("Buffer size mismatch: expected {expected} bytes, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("Decoded text is not valid UTF-8")]
    InvalidText(#[from] FromUtf8Error),

    #[error("Can't allocate {len} bytes for decoded data")]
    Capacity { len: usize },
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Self::SizeMismatch { .. } | Self::InvalidText(_) | Self::Capacity { .. } => {
                Severity::Fatal
            }
            Self::IO(e) if e.kind() == io::ErrorKind::UnexpectedEof => Severity::Fatal,
            Self::IO(_) | Self::Open { .. } | Self::LengthOverflow { .. } => Severity::Recoverable,
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
