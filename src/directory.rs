//! Directory-entry encoding, listing and name lookup.
//!
//! An entry is a 16-bit inode number followed by a zero-padded name field
//! whose width (14 or 30 bytes) is selected by the superblock magic. Inode
//! number 0 marks a free slot.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::Inode;
use crate::superblock::SuperBlock;

pub fn trim_zero(name: &[u8]) -> &[u8] {
    let mut end = name.len();
    while end > 0 && name[end - 1] == 0 {
        end -= 1;
    }
    &name[..end]
}

/// A decoded directory entry. The name carries no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub inode: u16,
    pub name: Vec<u8>,
}

impl DirEntry {
    pub fn new(inode: u16, name: &[u8], name_len: usize) -> Result<Self> {
        if name.len() > name_len {
            return Err(FsError::NameTooLong(name_len));
        }
        Ok(DirEntry {
            inode,
            name: name.to_vec(),
        })
    }

    /// Decodes one fixed-size record; trailing zero bytes are stripped from
    /// the name.
    pub fn decode(raw: &[u8]) -> Self {
        DirEntry {
            inode: LittleEndian::read_u16(&raw[..2]),
            name: trim_zero(&raw[2..]).to_vec(),
        }
    }

    /// Encodes the entry into a `2 + name_len` record, name right-padded
    /// with zero bytes. Name bytes beyond the field width are dropped;
    /// [`DirEntry::new`] rejects such names up front.
    pub fn encode(&self, name_len: usize) -> Vec<u8> {
        let mut raw = vec![0u8; 2 + name_len];
        LittleEndian::write_u16(&mut raw[..2], self.inode);
        let fits = self.name.len().min(name_len);
        raw[2..2 + fits].copy_from_slice(&self.name[..fits]);
        raw
    }
}

/// Every allocated zone slot of a directory inode, in slot order. Directory
/// content is scanned across all nine slots, matching the listing behavior
/// of the legacy tool.
pub(crate) fn dir_zones(inode: &Inode) -> impl Iterator<Item = u16> + '_ {
    inode.zones.iter().copied().filter(|&z| z != EMPTY_ZONE)
}

/// Returns all used entries of a directory, preserving block and in-block
/// order. The root directory listing is this applied to inode 1.
pub fn read_dir(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    dir_inode: &Inode,
) -> Result<Vec<DirEntry>> {
    if !dir_inode.is_dir() {
        return Err(FsError::NotDirectory);
    }

    let entry_size = superblock.dir_entry_size();
    let mut entries = Vec::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    for zone in dir_zones(dir_inode) {
        device.read_block(zone as u32, &mut buf)?;
        for raw in buf.chunks_exact(entry_size) {
            let entry = DirEntry::decode(raw);
            if entry.inode != 0 {
                entries.push(entry);
            }
        }
    }
    Ok(entries)
}

/// Resolves `name` to an inode number within the directory, scanning zones
/// in slot order and entries in block order. The first exact byte-for-byte
/// match wins.
pub fn dir_lookup(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    dir_inode: &Inode,
    name: &[u8],
) -> Result<u16> {
    if !dir_inode.is_dir() {
        return Err(FsError::NotDirectory);
    }

    let entry_size = superblock.dir_entry_size();
    let mut buf = vec![0u8; BLOCK_SIZE];
    for zone in dir_zones(dir_inode) {
        device.read_block(zone as u32, &mut buf)?;
        for raw in buf.chunks_exact(entry_size) {
            let entry = DirEntry::decode(raw);
            if entry.inode == 0 {
                continue;
            }
            if entry.name == name {
                debug!(
                    "lookup {:?}: inode {}",
                    String::from_utf8_lossy(name),
                    entry.inode
                );
                return Ok(entry.inode);
            }
        }
    }

    Err(FsError::NameNotFound(
        String::from_utf8_lossy(name).into_owned(),
    ))
}
