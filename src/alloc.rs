//! First-fit scans for free inodes, free directory slots, and free data
//! blocks.
//!
//! The on-disk imap/zmap regions are deliberately never consulted: a free
//! inode is one with `nlinks == 0`, a free data block is one whose bytes are
//! all zero. Tests depend on the deterministic first-match ordering.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::directory::dir_zones;
use crate::error::{FsError, Result};
use crate::inode::{Inode, get_inode};
use crate::superblock::SuperBlock;

/// Location of a free directory-entry slot: the zone holding it and the
/// byte offset of the record inside that zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirSlot {
    pub zone: u16,
    pub offset: usize,
}

/// First inode number in 1..=num_inodes whose record has `nlinks == 0`.
pub fn free_inode(device: &impl BlockDevice, superblock: &SuperBlock) -> Result<u16> {
    for inode_number in 1..=superblock.num_inodes {
        if get_inode(device, superblock, inode_number)?.is_free() {
            debug!("allocating inode {inode_number}");
            return Ok(inode_number);
        }
    }
    Err(FsError::NoFreeInodes)
}

/// First entry slot with inode number 0 across the directory's allocated
/// zones, in zone order then in-block order. Directories are never grown;
/// exhaustion means the directory is full.
pub fn free_dir_slot(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    dir_inode: &Inode,
) -> Result<DirSlot> {
    if !dir_inode.is_dir() {
        return Err(FsError::NotDirectory);
    }

    let entry_size = superblock.dir_entry_size();
    let mut buf = vec![0u8; BLOCK_SIZE];
    for zone in dir_zones(dir_inode) {
        device.read_block(zone as u32, &mut buf)?;
        for (i, raw) in buf.chunks_exact(entry_size).enumerate() {
            if LittleEndian::read_u16(&raw[..2]) == 0 {
                return Ok(DirSlot {
                    zone,
                    offset: i * entry_size,
                });
            }
        }
    }
    Err(FsError::DirectoryFull)
}

/// First all-zero block in `first_data_zone..num_zones`. A full scan of
/// every candidate block; fine for the small demonstration images this tool
/// targets.
pub fn free_data_block(device: &impl BlockDevice, superblock: &SuperBlock) -> Result<u16> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    for zone in superblock.first_data_zone..superblock.num_zones {
        device.read_block(zone as u32, &mut buf)?;
        if buf.iter().all(|&b| b == 0) {
            debug!("allocating data block {zone}");
            return Ok(zone);
        }
    }
    Err(FsError::NoFreeDataBlocks)
}
