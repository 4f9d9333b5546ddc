//! Block device: fixed-size 512-byte sector reads over a seekable byte source.
//!
//! `BYTES_PER_SECTOR` is fixed regardless of what a mounted [`crate::bpb`]
//! later claims; validating the on-disk BPB against it is the volume's job,
//! not this layer's.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use spin::RwLock;

use crate::error::{Error, Result};

pub const BYTES_PER_SECTOR: usize = 512;

/// A seekable byte source addressed in whole 512-byte sectors.
///
/// Implementors provide no caching of their own; every call reads straight
/// through to the backing source. A single `BlockDevice` is not safe to
/// share across concurrently-mounted volumes: sector reads move the
/// underlying seek cursor, so interleaved reads from two volumes over one
/// handle would race. Callers that need concurrency should open independent
/// handles over independent byte sources.
pub trait BlockDevice {
    /// Read `sectors_to_read` contiguous sectors starting at absolute
    /// sector `first_sector` into `buf`.
    ///
    /// `buf` must hold at least `sectors_to_read * BYTES_PER_SECTOR` bytes.
    /// Returns the number of whole sectors actually read.
    fn read_sectors(
        &self,
        first_sector: u64,
        buf: &mut [u8],
        sectors_to_read: usize,
    ) -> Result<usize>;
}

/// A [`BlockDevice`] backed by a plain file on disk, opened read-only.
///
/// The backing `File`'s seek cursor is shared interior-mutable state, so
/// `read_sectors` only needs `&self`; this mirrors how a single device
/// handle is threaded by reference into a volume and everything built atop
/// it without forcing `&mut` through every reader.
pub struct BlockFile {
    file: RwLock<File>,
}

impl BlockFile {
    /// Open the image file at `path` for sector-addressed reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound
            } else {
                Error::Io(e)
            }
        })?;
        log::debug!("opened backing image");
        Ok(BlockFile {
            file: RwLock::new(file),
        })
    }
}

impl BlockDevice for BlockFile {
    fn read_sectors(
        &self,
        first_sector: u64,
        buf: &mut [u8],
        sectors_to_read: usize,
    ) -> Result<usize> {
        if sectors_to_read == 0 || buf.len() < sectors_to_read * BYTES_PER_SECTOR {
            return Err(Error::Fault);
        }

        let mut file = self.file.write();

        let total_sectors = file.metadata()?.len() / BYTES_PER_SECTOR as u64;
        if first_sector + sectors_to_read as u64 > total_sectors {
            log::warn!(
                "sector read [{}, {}) extends past image end ({} sectors)",
                first_sector,
                first_sector + sectors_to_read as u64,
                total_sectors
            );
            return Err(Error::Range);
        }

        file.seek(SeekFrom::Start(first_sector * BYTES_PER_SECTOR as u64))?;
        let want = sectors_to_read * BYTES_PER_SECTOR;
        file.read_exact(&mut buf[..want])?;

        Ok(sectors_to_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn image_with_sectors(n: usize) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for i in 0..n {
            let mut sector = [0u8; BYTES_PER_SECTOR];
            sector[0] = i as u8;
            f.write_all(&sector).unwrap();
        }
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_sectors_by_absolute_index() {
        let image = image_with_sectors(4);
        let dev = BlockFile::open(image.path()).unwrap();
        let mut buf = [0u8; BYTES_PER_SECTOR * 2];
        let n = dev.read_sectors(1, &mut buf, 2).unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf[0], 1);
        assert_eq!(buf[BYTES_PER_SECTOR], 2);
    }

    #[test]
    fn out_of_range_read_fails() {
        let image = image_with_sectors(2);
        let dev = BlockFile::open(image.path()).unwrap();
        let mut buf = [0u8; BYTES_PER_SECTOR * 3];
        assert!(matches!(dev.read_sectors(0, &mut buf, 3), Err(Error::Range)));
    }

    #[test]
    fn missing_image_is_not_found() {
        assert!(matches!(
            BlockFile::open("/nonexistent/path/for/fat16-rs-test"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn empty_buffer_is_fault() {
        let image = image_with_sectors(1);
        let dev = BlockFile::open(image.path()).unwrap();
        let mut buf: [u8; 0] = [];
        assert!(matches!(dev.read_sectors(0, &mut buf, 1), Err(Error::Fault)));
    }
}
