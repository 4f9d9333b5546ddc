//! A read-only reader for FAT16 volumes.
//!
//! This crate mounts a FAT16 image through any [`device::BlockDevice`],
//! parses its [`bpb::BiosParameterBlock`] and [`fat::FatTable`], and lets
//! callers list the root directory ([`dir::Directory`]) and read files out
//! of it ([`file::File`]) through standard [`std::io::Read`] /
//! [`std::io::Seek`]. There are no subdirectories, no long file names, no
//! FAT12/FAT32/exFAT support, and nothing here ever writes back to the
//! image — see the design notes for the full list of what is deliberately
//! out of scope.
//!
//! A typical session:
//!
//! ```no_run
//! use fat16_rs::device::BlockFile;
//! use fat16_rs::volume::Volume;
//! use fat16_rs::dir::Directory;
//! use fat16_rs::file::File;
//! use std::io::Read;
//!
//! # fn main() -> fat16_rs::error::Result<()> {
//! let device = BlockFile::open("image.fat16")?;
//! let volume = Volume::open(&device, 0)?;
//! for name in Directory::open(&volume, "\\")? {
//!     println!("{name}");
//! }
//! let mut file = File::open(&volume, "README.TXT")?;
//! let mut contents = String::new();
//! file.read_to_string(&mut contents)?;
//! # Ok(())
//! # }
//! ```

pub mod bpb;
pub mod device;
pub mod dir;
pub mod error;
pub mod fat;
pub mod file;
pub mod volume;

#[cfg(test)]
mod testutil;

pub use dir::{ATTR_ARCHIVE, ATTR_DIRECTORY, ATTR_HIDDEN, ATTR_READ_ONLY, ATTR_SYSTEM, ATTR_VOLUME_ID};
pub use error::{Error, Result};
