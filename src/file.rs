//! File lookup, cluster-chain materialization, and the `Read`/`Seek` view
//! over a file's contents.
//!
//! `File::open` resolves a name against the root directory, walks its
//! cluster chain through the volume's FAT, and reads every cluster up
//! front into a single in-memory buffer truncated to the entry's declared
//! size — the same eager-materialization shape as the system this reader
//! is modeled on, just without its hand-rolled buffer arithmetic.

use std::io;

use crate::device::BYTES_PER_SECTOR;
use crate::dir::{encode_query_name, scan_root};
use crate::error::{Error, Result};
use crate::volume::Volume;

/// An open file: its resolved 8.3 name, declared size, and fully-read
/// payload, plus a cursor for sequential `Read`/`Seek` access.
pub struct File {
    name: [u8; 8],
    extension: [u8; 3],
    size: u32,
    data: Vec<u8>,
    position: usize,
}

impl File {
    /// Resolve `name` (`"NAME"` or `"NAME.EXT"`) against the root
    /// directory and materialize its contents.
    ///
    /// The root directory scan here stops only at the terminator entry
    /// (first byte `0x00`) — unlike [`crate::dir::Directory::open`]'s
    /// listing scan, it does *not* skip deleted (`0xE5`) entries before
    /// comparing names, matching the lookup this was built from exactly.
    /// A match whose `ATTR_DIRECTORY` bit is set fails with
    /// [`Error::IsADirectory`] rather than being opened as a file.
    pub fn open(volume: &Volume, name: &str) -> Result<Self> {
        let (query_name, query_ext) = encode_query_name(name);

        let raw_entries = scan_root(volume)?;
        let entry = raw_entries
            .iter()
            .find(|e| e.name == query_name && e.extension == query_ext)
            .ok_or(Error::NotFound)?;

        if entry.is_directory() {
            return Err(Error::IsADirectory);
        }

        let chain = volume
            .fat()
            .cluster_chain(entry.starting_cluster, volume.max_chain_clusters())?;

        let mut data = Vec::with_capacity(entry.file_size as usize);
        let mut sector_buf = [0u8; BYTES_PER_SECTOR];
        let sectors_per_cluster = volume.sectors_per_cluster() as usize;
        'clusters: for &cluster in &chain {
            for s in 0..sectors_per_cluster {
                if data.len() >= entry.file_size as usize {
                    break 'clusters;
                }
                let abs_sector = volume.first_sector_of_cluster_abs(cluster) + s as u64;
                volume.device().read_sectors(abs_sector, &mut sector_buf, 1)?;
                data.extend_from_slice(&sector_buf);
            }
        }
        data.truncate(entry.file_size as usize);

        log::trace!("opened file {name:?}, {} bytes", entry.file_size);

        Ok(File {
            name: entry.name,
            extension: entry.extension,
            size: entry.file_size,
            data,
            position: 0,
        })
    }

    /// Declared size of the file in bytes.
    pub fn len(&self) -> u64 {
        self.size as u64
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Resolved on-disk 8.3 name, as `NAME.EXT` with padding trimmed.
    pub fn display_name(&self) -> String {
        let base = String::from_utf8_lossy(&self.name).trim_end().to_string();
        let ext = String::from_utf8_lossy(&self.extension).trim_end().to_string();
        if ext.is_empty() {
            base
        } else {
            format!("{base}.{ext}")
        }
    }

    /// The literal `file_read` compatibility entry point: copy up to
    /// `size * nmemb` bytes (bounded by however much of `size * nmemb`
    /// remains before end-of-file) into `out`, advancing the cursor, and
    /// return the number of whole `size`-sized elements copied.
    ///
    /// Matches the original truncating behavior exactly: if fewer than
    /// `size` bytes remain for what would be the last element, that
    /// partial tail is not copied and is not counted.
    pub fn read_elements(&mut self, out: &mut [u8], size: usize, nmemb: usize) -> usize {
        if size == 0 || nmemb == 0 {
            return 0;
        }
        let requested = size * nmemb;
        let remaining = self.data.len().saturating_sub(self.position);
        let to_copy = requested.min(remaining).min(out.len());
        let whole_elements = to_copy / size;
        let bytes = whole_elements * size;
        out[..bytes].copy_from_slice(&self.data[self.position..self.position + bytes]);
        self.position += bytes;
        whole_elements
    }

    /// The literal `file_seek` compatibility entry point: `whence` is `0`
    /// (from start), `1` (from current position), or `2` (from end),
    /// matching the C `SEEK_*` constants. Returns the resulting absolute
    /// position, or [`Error::NoSuchAddress`] if it would fall outside
    /// `[0, len()]`.
    pub fn seek_whence(&mut self, offset: i64, whence: i32) -> Result<u64> {
        let base: i64 = match whence {
            0 => 0,
            1 => self.position as i64,
            2 => self.data.len() as i64,
            _ => return Err(Error::Invalid("seek whence must be 0, 1, or 2")),
        };
        let target = base + offset;
        if target < 0 || target as usize > self.data.len() {
            return Err(Error::NoSuchAddress);
        }
        self.position = target as usize;
        Ok(self.position as u64)
    }
}

impl io::Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.position..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl io::Seek for File {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (base, offset): (i64, i64) = match pos {
            io::SeekFrom::Start(n) => (0, n as i64),
            io::SeekFrom::Current(n) => (self.position as i64, n),
            io::SeekFrom::End(n) => (self.data.len() as i64, n),
        };
        let target = base + offset;
        if target < 0 || target as usize > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek target out of range",
            ));
        }
        self.position = target as usize;
        Ok(self.position as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_bpb_sector, InMemoryDevice};
    use std::io::{Read, Seek, SeekFrom};

    fn volume_with_file(contents: &[u8]) -> InMemoryDevice {
        // 1 reserved sector, 2 FATs of 1 sector, 16 root entries (1
        // sector), 1 sector per cluster.
        let boot = make_bpb_sector(512, 1, 1, 2, 16, 64, 1);
        let mut fat_sector = [0u8; BYTES_PER_SECTOR];
        // cluster 2 is the only cluster used, terminated immediately.
        fat_sector[4] = 0xF8;
        fat_sector[5] = 0xFF;

        let mut root_sector = [0u8; BYTES_PER_SECTOR];
        root_sector[0..8].copy_from_slice(b"README  ");
        root_sector[8..11].copy_from_slice(b"TXT");
        root_sector[11] = 0; // attributes: plain file
        root_sector[26..28].copy_from_slice(&2u16.to_le_bytes());
        root_sector[28..32].copy_from_slice(&(contents.len() as u32).to_le_bytes());

        let mut data_sector = [0u8; BYTES_PER_SECTOR];
        data_sector[..contents.len()].copy_from_slice(contents);

        let mut image = Vec::new();
        image.extend_from_slice(&boot);
        image.extend_from_slice(&fat_sector);
        image.extend_from_slice(&fat_sector);
        image.extend_from_slice(&root_sector);
        image.extend_from_slice(&data_sector);
        InMemoryDevice::new(image)
    }

    #[test]
    fn opens_and_reads_whole_file() {
        let dev = volume_with_file(b"hello fat16");
        let volume = Volume::open(&dev, 0).unwrap();
        let mut file = File::open(&volume, "README.TXT").unwrap();
        assert_eq!(file.len(), 11);
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello fat16");
    }

    #[test]
    fn seek_and_partial_read() {
        let dev = volume_with_file(b"hello fat16");
        let volume = Volume::open(&dev, 0).unwrap();
        let mut file = File::open(&volume, "README.TXT").unwrap();
        file.seek(SeekFrom::Start(6)).unwrap();
        let mut buf = [0u8; 5];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"fat16");
    }

    #[test]
    fn read_elements_truncates_partial_tail() {
        let dev = volume_with_file(b"hello fat16");
        let volume = Volume::open(&dev, 0).unwrap();
        let mut file = File::open(&volume, "README.TXT").unwrap();
        let mut out = [0u8; 11];
        // 4-byte elements: 11 bytes holds 2 whole elements (8 bytes), the
        // trailing 3-byte remainder is neither copied nor counted.
        let n = file.read_elements(&mut out, 4, 3);
        assert_eq!(n, 2);
        assert_eq!(&out[..8], b"hello fa");
    }

    #[test]
    fn seek_whence_rejects_out_of_range() {
        let dev = volume_with_file(b"hello fat16");
        let volume = Volume::open(&dev, 0).unwrap();
        let mut file = File::open(&volume, "README.TXT").unwrap();
        assert!(matches!(
            file.seek_whence(100, 0),
            Err(Error::NoSuchAddress)
        ));
    }

    #[test]
    fn opening_a_directory_entry_fails() {
        let dev = volume_with_file(b"hello fat16");
        // Flip the README.TXT entry's attribute byte to DIRECTORY.
        let mut bytes = dev.into_bytes();
        let root_offset = BYTES_PER_SECTOR * 3;
        bytes[root_offset + 11] = crate::dir::ATTR_DIRECTORY;
        let dev = InMemoryDevice::new(bytes);
        let volume = Volume::open(&dev, 0).unwrap();
        assert!(matches!(
            File::open(&volume, "README.TXT"),
            Err(Error::IsADirectory)
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dev = volume_with_file(b"hello fat16");
        let volume = Volume::open(&dev, 0).unwrap();
        assert!(matches!(
            File::open(&volume, "NOPE.TXT"),
            Err(Error::NotFound)
        ));
    }
}
