//! Error taxonomy shared by every layer of the reader.
//!
//! The original C interface signaled failure with a sentinel return value
//! plus a thread-local `errno`; that shape is kept only as the literal
//! compatibility entry points on [`crate::dir::Directory`] and
//! [`crate::file::File`] (see their `read_entry`/`read_elements`/
//! `seek_whence` methods). Everywhere else the crate returns `Result<T,
//! Error>`, which is the actual internal representation.

use std::fmt;
use std::io;

/// Every way a read-only FAT16 operation can fail.
#[derive(Debug)]
pub enum Error {
    /// A null/empty input was supplied where a handle or non-empty buffer
    /// was required.
    Fault,
    /// The image, or a named file/directory entry within it, does not exist.
    NotFound,
    /// A short read, seek failure, or other error from the underlying byte
    /// source.
    Io(io::Error),
    /// A sector read would extend past the end of the image.
    Range,
    /// The BPB, a FAT copy, or a seek `whence` failed validation.
    Invalid(&'static str),
    /// An allocation failed.
    OutOfMemory,
    /// A path naming a directory was opened as a file.
    IsADirectory,
    /// A path naming a file was opened as a directory.
    NotADirectory,
    /// A seek target fell outside `[0, size]`.
    NoSuchAddress,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fault => write!(f, "null or empty input"),
            Error::NotFound => write!(f, "no such file or directory entry"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Range => write!(f, "sector range extends past the image"),
            Error::Invalid(reason) => write!(f, "invalid volume: {reason}"),
            Error::OutOfMemory => write!(f, "allocation failed"),
            Error::IsADirectory => write!(f, "is a directory"),
            Error::NotADirectory => write!(f, "not a directory"),
            Error::NoSuchAddress => write!(f, "seek target out of range"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
