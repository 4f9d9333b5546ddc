//! BIOS Parameter Block (BPB)
//!
//! The first sector of a FAT volume — sometimes called the boot sector, the
//! reserved sector, or "sector 0 of the volume" — carries the BPB, the
//! on-disk header describing the volume's geometry. [`BiosParameterBlock`]
//! decodes the subset of fields a read-only FAT16 reader needs from a raw
//! 512-byte sector buffer.
//!
//! Earlier revisions of this decoder read the BPB by transmuting a
//! `#[repr(packed)]` struct directly over the sector buffer. That relies on
//! the compiler never taking a reference to a packed field (which is
//! undefined behavior the moment it does) and silently breaks if a field
//! is ever reordered. [`BiosParameterBlock::parse`] instead reads every
//! field by its documented byte offset with `u16::from_le_bytes` /
//! `u32::from_le_bytes`, so there is no unaligned reference anywhere and
//! the offset of every field is visible at its use site.

use crate::device::BYTES_PER_SECTOR;
use crate::error::{Error, Result};

fn read_u16(sector: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([sector[offset], sector[offset + 1]])
}

fn read_u32(sector: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        sector[offset],
        sector[offset + 1],
        sector[offset + 2],
        sector[offset + 3],
    ])
}

/// Decoded fields of a FAT16 BIOS Parameter Block, plus the geometry
/// derived from them.
///
/// All sector counts below are relative to the volume's own starting
/// sector, not absolute to the device — [`crate::volume::Volume`] adds that
/// offset once, consistently, before issuing any device read.
#[derive(Debug, Clone, Copy)]
pub struct BiosParameterBlock {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub root_dir_capacity: u16,
    pub logical_sectors16: u16,
    pub logical_sectors32: u32,
    pub sectors_per_fat: u16,
}

impl BiosParameterBlock {
    /// Byte offset of `bytes_per_sector` within the boot sector.
    const BYTES_PER_SECTOR_OFFSET: usize = 0x0B;
    const SECTORS_PER_CLUSTER_OFFSET: usize = 0x0D;
    const RESERVED_SECTORS_OFFSET: usize = 0x0E;
    const FAT_COUNT_OFFSET: usize = 0x10;
    const ROOT_DIR_CAPACITY_OFFSET: usize = 0x11;
    const LOGICAL_SECTORS16_OFFSET: usize = 0x13;
    const SECTORS_PER_FAT_OFFSET: usize = 0x16;
    const LOGICAL_SECTORS32_OFFSET: usize = 0x20;

    /// Decode a BPB from the raw bytes of the volume's first sector.
    ///
    /// Fails with [`Error::Invalid`] if `bytes_per_sector` is not 512 — the
    /// one BPB field this reader actually enforces, since every other
    /// field read below is unconditionally trusted (as the original
    /// implementation does).
    pub fn parse(sector: &[u8; BYTES_PER_SECTOR]) -> Result<Self> {
        let bytes_per_sector = read_u16(sector, Self::BYTES_PER_SECTOR_OFFSET);
        if bytes_per_sector as usize != BYTES_PER_SECTOR {
            log::warn!(
                "bpb declares {} bytes per sector, only 512 is supported",
                bytes_per_sector
            );
            return Err(Error::Invalid("bytes_per_sector must be 512"));
        }

        Ok(BiosParameterBlock {
            bytes_per_sector,
            sectors_per_cluster: sector[Self::SECTORS_PER_CLUSTER_OFFSET],
            reserved_sectors: read_u16(sector, Self::RESERVED_SECTORS_OFFSET),
            fat_count: sector[Self::FAT_COUNT_OFFSET],
            root_dir_capacity: read_u16(sector, Self::ROOT_DIR_CAPACITY_OFFSET),
            logical_sectors16: read_u16(sector, Self::LOGICAL_SECTORS16_OFFSET),
            logical_sectors32: read_u32(sector, Self::LOGICAL_SECTORS32_OFFSET),
            sectors_per_fat: read_u16(sector, Self::SECTORS_PER_FAT_OFFSET),
        })
    }

    /// Total sectors in the volume: the 16-bit count, falling back to the
    /// 32-bit count when the 16-bit field is zero.
    pub fn total_sectors(&self) -> u32 {
        if self.logical_sectors16 != 0 {
            self.logical_sectors16 as u32
        } else {
            self.logical_sectors32
        }
    }

    /// Size in bytes of a single on-disk FAT copy.
    pub fn fat_size_bytes(&self) -> u32 {
        self.sectors_per_fat as u32 * self.bytes_per_sector as u32
    }

    /// Sectors occupied by the root directory, rounded up.
    pub fn root_dir_sectors(&self) -> u32 {
        let bytes = self.root_dir_capacity as u32 * 32;
        (bytes + self.bytes_per_sector as u32 - 1) / self.bytes_per_sector as u32
    }

    /// Volume-relative sector of the first FAT — the only copy this reader
    /// keeps in memory after mount, once it has verified the second copy
    /// matches it byte-for-byte.
    pub fn first_fat_sector(&self) -> u32 {
        self.reserved_sectors as u32
    }

    /// Volume-relative sector of the first root directory entry.
    pub fn first_root_dir_sector(&self) -> u32 {
        self.reserved_sectors as u32 + self.fat_count as u32 * self.sectors_per_fat as u32
    }

    /// Volume-relative sector of cluster 2, the first data cluster.
    pub fn first_data_sector(&self) -> u32 {
        self.first_root_dir_sector() + self.root_dir_sectors()
    }

    /// Number of sectors in the data region.
    pub fn data_sectors(&self) -> u32 {
        self.total_sectors()
            - (self.reserved_sectors as u32
                + self.fat_count as u32 * self.sectors_per_fat as u32
                + self.root_dir_sectors())
    }

    /// Volume-relative sector of the first sector of data cluster `cluster`.
    ///
    /// Valid only for `cluster >= 2`; clusters 0 and 1 are reserved FAT
    /// entries, not addressable data.
    pub fn first_sector_of_cluster(&self, cluster: u16) -> u32 {
        debug_assert!(cluster >= 2);
        self.first_data_sector() + (cluster as u32 - 2) * self.sectors_per_cluster as u32
    }
}
