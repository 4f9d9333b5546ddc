//! Root directory entries: the raw 32-byte on-disk record, 8.3 name
//! normalization, and the root-only directory snapshot.
//!
//! FAT16 stores a directory as a flat run of 32-byte entries. This reader
//! only ever walks the root directory — there are no subdirectories below
//! it in scope — so [`scan_root`] is the one traversal primitive both
//! [`Directory::open`] and [`crate::file::File::open`] build on.

use crate::device::BYTES_PER_SECTOR;
use crate::error::{Error, Result};
use crate::volume::Volume;

pub const DIRENT_SIZE: usize = 32;

pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME_ID: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;

const DELETED_MARK: u8 = 0xE5;
const TERMINATOR_MARK: u8 = 0x00;

/// A single decoded 32-byte root directory entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawDirEntry {
    pub name: [u8; 8],
    pub extension: [u8; 3],
    pub attributes: u8,
    pub starting_cluster: u16,
    pub file_size: u32,
}

impl RawDirEntry {
    fn parse(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), DIRENT_SIZE);
        let mut name = [0u8; 8];
        name.copy_from_slice(&bytes[0..8]);
        let mut extension = [0u8; 3];
        extension.copy_from_slice(&bytes[8..11]);
        RawDirEntry {
            name,
            extension,
            attributes: bytes[11],
            starting_cluster: u16::from_le_bytes([bytes[26], bytes[27]]),
            file_size: u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == DELETED_MARK
    }

    pub fn is_volume_id(&self) -> bool {
        self.attributes & ATTR_VOLUME_ID != 0
    }

    pub fn is_directory(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }
}

/// Scan the root directory sector by sector, stopping at the first
/// terminator entry (first byte `0x00`), and returning every entry seen
/// before it (deleted and volume-label entries included — callers filter
/// as their own traversal rules require).
///
/// Earlier revisions of this scan re-read the same first root sector on
/// every iteration instead of stepping through `root_dir_sectors`; that is
/// a defect in the source this reader was built from, not specified
/// behavior, and is not reproduced here.
pub(crate) fn scan_root(volume: &Volume) -> Result<Vec<RawDirEntry>> {
    let mut out = Vec::new();
    let mut buf = [0u8; BYTES_PER_SECTOR];
    'sectors: for i in 0..volume.root_dir_sectors() {
        volume
            .device()
            .read_sectors(volume.first_root_dir_sector_abs() + i as u64, &mut buf, 1)?;
        for chunk in buf.chunks_exact(DIRENT_SIZE) {
            if chunk[0] == TERMINATOR_MARK {
                break 'sectors;
            }
            out.push(RawDirEntry::parse(chunk));
        }
    }
    Ok(out)
}

/// Normalize an 8.3 name for display: `NAME.EXT` with trailing space
/// padding trimmed, or bare `NAME` when the extension is all spaces.
///
/// Preserved exactly as specified: only the leading *alphabetic* run of
/// each field is kept, so digits and punctuation in an otherwise legal FAT
/// name (e.g. `FILE1.TXT`) are dropped rather than carried through. This
/// is a known quirk of the system this reader is modeled on and is kept by
/// contract rather than corrected — see the design notes.
pub(crate) fn normalize_name(entry: &RawDirEntry) -> String {
    if entry.extension[0] == b' ' {
        entry
            .name
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .map(|&b| b as char)
            .collect()
    } else {
        let base: String = entry
            .name
            .iter()
            .take(8)
            .take_while(|b| b.is_ascii_alphabetic())
            .map(|&b| b as char)
            .collect();
        // The extension is not filtered in place: count how many of its
        // bytes are alphabetic, then take that many bytes from the start
        // of the field, alphabetic or not. That is exactly what the
        // system this is modeled on does, and it is kept rather than
        // replaced with a plain filter so a non-alphabetic byte ahead of
        // an alphabetic one still shows up in the output.
        let how_many_in_ext = entry.extension.iter().filter(|b| b.is_ascii_alphabetic()).count();
        let ext: String = entry
            .extension
            .iter()
            .take(how_many_in_ext)
            .map(|&b| b as char)
            .collect();
        format!("{base}.{ext}")
    }
}

/// Encode a user-supplied `"NAME"` or `"NAME.EXT"` query into the raw
/// space-padded 8.3 fields a directory entry is compared against.
///
/// Mirrors the original query path: split on the first `.`, then replace
/// every non-alphabetic byte (including the padding itself) with a space.
/// A query with a non-alphabetic character inside the name or extension —
/// e.g. `FILE1.TXT` — therefore can never match an on-disk `FILE1.TXT`
/// entry, the same restriction [`normalize_name`] imposes on display.
pub(crate) fn encode_query_name(input: &str) -> ([u8; 8], [u8; 3]) {
    let mut parts = input.splitn(2, '.');
    let name_part = parts.next().unwrap_or("");
    let ext_part = parts.next().unwrap_or("");

    let mut name = [b' '; 8];
    for (i, b) in name_part.bytes().take(8).enumerate() {
        name[i] = if b.is_ascii_alphabetic() { b } else { b' ' };
    }
    let mut ext = [b' '; 3];
    for (i, b) in ext_part.bytes().take(3).enumerate() {
        ext[i] = if b.is_ascii_alphabetic() { b } else { b' ' };
    }
    (name, ext)
}

/// Outcome of [`Directory::read_entry`], the literal tri-state shape of
/// the original `dir_read` entry point (0 / 1 / -1).
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Ok,
    End,
}

/// A point-in-time snapshot of the root directory's normalized 8.3 names.
///
/// This is a value, not a live view: it is captured in full at
/// [`Directory::open`] and never re-reads the volume afterwards.
pub struct Directory {
    entries: Vec<String>,
    cursor: usize,
}

impl Directory {
    /// Open a directory view.
    ///
    /// The only supported `path` values are the root marker `"\\"` and a
    /// single 8.3 name of a root entry with the `ATTR_DIRECTORY` bit set —
    /// this reader does not descend into subdirectories, so a match is
    /// only ever used to validate the root-only restriction, never to list
    /// the matched entry's own contents.
    pub fn open(volume: &Volume, path: &str) -> Result<Self> {
        let raw_entries = scan_root(volume)?;

        if path != "\\" {
            // Validated against every raw entry scan_root returned, deleted
            // and volume-label slots included: a volume-label entry whose
            // normalized name matches `path` must still fail NotADirectory,
            // not be skipped past in search of a real match.
            let mut found = false;
            for entry in &raw_entries {
                if normalize_name(entry) != path {
                    continue;
                }
                if entry.is_volume_id() || !entry.is_directory() {
                    return Err(Error::NotADirectory);
                }
                found = true;
                break;
            }
            if !found {
                return Err(Error::NotFound);
            }
        }

        let entries = raw_entries
            .iter()
            .filter(|e| !e.is_deleted() && !e.is_volume_id())
            .map(normalize_name)
            .collect();

        log::trace!("opened directory snapshot for {path:?}");
        Ok(Directory { entries, cursor: 0 })
    }

    /// Number of entries captured in this snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The literal `dir_read` compatibility entry point: copy the next
    /// normalized name into `out`, advance the cursor, and report which of
    /// the three outcomes occurred.
    pub fn read_entry(&mut self, out: &mut String) -> ReadOutcome {
        match self.entries.get(self.cursor) {
            Some(name) => {
                out.clear();
                out.push_str(name);
                self.cursor += 1;
                ReadOutcome::Ok
            }
            None => ReadOutcome::End,
        }
    }
}

impl Iterator for Directory {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = self.entries.get(self.cursor).cloned();
        if name.is_some() {
            self.cursor += 1;
        }
        name
    }
}
