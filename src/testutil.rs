//! Test-only helpers: a synthetic BPB sector builder and an in-memory
//! `BlockDevice`, used by every module's unit tests so none of them need a
//! real file on disk.

use crate::device::{BlockDevice, BYTES_PER_SECTOR};
use crate::error::{Error, Result};

/// Build a raw 512-byte boot sector with the BPB fields a test needs set,
/// leaving every other byte zeroed.
pub(crate) fn make_bpb_sector(
    bytes_per_sector: u16,
    sectors_per_cluster: u8,
    reserved_sectors: u16,
    fat_count: u8,
    root_dir_capacity: u16,
    total_sectors: u32,
    sectors_per_fat: u16,
) -> [u8; BYTES_PER_SECTOR] {
    let mut sector = [0u8; BYTES_PER_SECTOR];
    sector[0x0B..0x0D].copy_from_slice(&bytes_per_sector.to_le_bytes());
    sector[0x0D] = sectors_per_cluster;
    sector[0x0E..0x10].copy_from_slice(&reserved_sectors.to_le_bytes());
    sector[0x10] = fat_count;
    sector[0x11..0x13].copy_from_slice(&root_dir_capacity.to_le_bytes());
    if total_sectors <= u16::MAX as u32 {
        sector[0x13..0x15].copy_from_slice(&(total_sectors as u16).to_le_bytes());
    }
    sector[0x16..0x18].copy_from_slice(&sectors_per_fat.to_le_bytes());
    sector[0x20..0x24].copy_from_slice(&total_sectors.to_le_bytes());
    sector
}

/// A `BlockDevice` backed by a plain in-memory byte buffer, padded up to a
/// whole number of sectors at construction.
pub(crate) struct InMemoryDevice {
    bytes: Vec<u8>,
}

impl InMemoryDevice {
    pub fn new(mut bytes: Vec<u8>) -> Self {
        let remainder = bytes.len() % BYTES_PER_SECTOR;
        if remainder != 0 {
            bytes.resize(bytes.len() + (BYTES_PER_SECTOR - remainder), 0);
        }
        InMemoryDevice { bytes }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl BlockDevice for InMemoryDevice {
    fn read_sectors(&self, first_sector: u64, buf: &mut [u8], sectors_to_read: usize) -> Result<usize> {
        if sectors_to_read == 0 || buf.len() < sectors_to_read * BYTES_PER_SECTOR {
            return Err(Error::Fault);
        }
        let start = first_sector as usize * BYTES_PER_SECTOR;
        let end = start + sectors_to_read * BYTES_PER_SECTOR;
        if end > self.bytes.len() {
            return Err(Error::Range);
        }
        buf[..end - start].copy_from_slice(&self.bytes[start..end]);
        Ok(sectors_to_read)
    }
}
