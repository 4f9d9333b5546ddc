//! Mounting: tying a [`BlockDevice`] to a parsed BPB and a verified FAT.
//!
//! A `Volume` borrows its device rather than owning it, so the lifetime of
//! every handle derived from it (`Directory`, `File`) is tied back to both
//! the volume and, transitively, the device — a file handle cannot outlive
//! the volume it was opened from, and the volume cannot outlive the device
//! it reads through. The compiler enforces the ownership rule the original
//! interface could only document.

use crate::bpb::BiosParameterBlock;
use crate::device::{BlockDevice, BYTES_PER_SECTOR};
use crate::error::{Error, Result};
use crate::fat::FatTable;

/// A mounted FAT16 volume: a parsed BPB plus one verified-good FAT copy,
/// read once at mount time and held for the volume's lifetime.
pub struct Volume<'dev> {
    device: &'dev dyn BlockDevice,
    first_sector: u64,
    bpb: BiosParameterBlock,
    fat: FatTable,
}

impl<'dev> Volume<'dev> {
    /// Mount the FAT16 volume starting at `first_sector` of `device`.
    ///
    /// Mount steps:
    /// 1. Read the boot sector and parse the BPB.
    /// 2. Derive the volume's geometry from it.
    /// 3. Read the first on-disk FAT copy into memory.
    /// 4. Read the second on-disk FAT copy into a scratch buffer.
    /// 5. Compare the two byte-for-byte; a mismatch fails the mount with
    ///    [`Error::Invalid`]. Only the first copy is retained — there is no
    ///    facility to write back a repaired second copy, since this reader
    ///    never writes at all.
    pub fn open(device: &'dev dyn BlockDevice, first_sector: u64) -> Result<Self> {
        let mut boot_sector = [0u8; BYTES_PER_SECTOR];
        device.read_sectors(first_sector, &mut boot_sector, 1)?;
        let bpb = BiosParameterBlock::parse(&boot_sector)?;

        if bpb.fat_count == 0 {
            return Err(Error::Invalid("volume declares zero FATs"));
        }

        let fat = FatTable::read_from(
            device,
            first_sector + bpb.first_fat_sector() as u64,
            bpb.sectors_per_fat,
        )?;

        if bpb.fat_count >= 2 {
            let second_fat_sector =
                first_sector + bpb.first_fat_sector() as u64 + bpb.sectors_per_fat as u64;
            let second = FatTable::read_from(device, second_fat_sector, bpb.sectors_per_fat)?;
            if fat.as_bytes() != second.as_bytes() {
                log::warn!("the two on-disk FAT copies disagree, refusing to mount");
                return Err(Error::Invalid("redundant FAT copies do not match"));
            }
        }

        log::debug!(
            "mounted volume: {} data sectors, {} clusters/sector, {} root entries",
            bpb.data_sectors(),
            bpb.sectors_per_cluster,
            bpb.root_dir_capacity
        );

        Ok(Volume {
            device,
            first_sector,
            bpb,
            fat,
        })
    }

    pub(crate) fn device(&self) -> &dyn BlockDevice {
        self.device
    }

    pub(crate) fn bpb(&self) -> &BiosParameterBlock {
        &self.bpb
    }

    pub(crate) fn fat(&self) -> &FatTable {
        &self.fat
    }

    pub(crate) fn first_root_dir_sector_abs(&self) -> u64 {
        self.first_sector + self.bpb.first_root_dir_sector() as u64
    }

    pub(crate) fn root_dir_sectors(&self) -> u32 {
        self.bpb.root_dir_sectors()
    }

    pub(crate) fn first_sector_of_cluster_abs(&self, cluster: u16) -> u64 {
        self.first_sector + self.bpb.first_sector_of_cluster(cluster) as u64
    }

    pub(crate) fn sectors_per_cluster(&self) -> u8 {
        self.bpb.sectors_per_cluster
    }

    /// Upper bound on the number of clusters a chain may legally span on
    /// this volume, used to guard [`crate::fat::FatTable::cluster_chain`]
    /// against cyclic or runaway links.
    pub(crate) fn max_chain_clusters(&self) -> usize {
        (self.bpb.data_sectors() as usize) / (self.bpb.sectors_per_cluster.max(1) as usize) + 2
    }
}
