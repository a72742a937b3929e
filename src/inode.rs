//! Management of reading and writing to inodes.

use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{ByteOrder, LittleEndian};

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::superblock::SuperBlock;

/// A 32-byte inode record. `nlinks == 0` marks the slot free; there is no
/// separate allocation bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inode {
    pub mode: u16,
    pub uid: u16,
    pub size: u32,
    pub mtime: u32,
    pub gid: u8,
    pub nlinks: u8,
    /// 7 direct zones, then the indirect zone, then the double-indirect zone.
    pub zones: [u16; NUM_ZONE_SLOTS],
}

impl Inode {
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFDIR != 0
    }

    pub fn is_regular(&self) -> bool {
        self.mode & S_IFREG != 0
    }

    pub fn is_free(&self) -> bool {
        self.nlinks == 0
    }

    /// Decodes the leading [`INODE_SIZE`] bytes of `data`.
    pub fn decode(data: &[u8]) -> Self {
        let mut zones = [EMPTY_ZONE; NUM_ZONE_SLOTS];
        for (i, zone) in zones.iter_mut().enumerate() {
            *zone = LittleEndian::read_u16(&data[14 + i * 2..16 + i * 2]);
        }
        Inode {
            mode: LittleEndian::read_u16(&data[0..2]),
            uid: LittleEndian::read_u16(&data[2..4]),
            size: LittleEndian::read_u32(&data[4..8]),
            mtime: LittleEndian::read_u32(&data[8..12]),
            gid: data[12],
            nlinks: data[13],
            zones,
        }
    }

    pub fn encode(&self) -> [u8; INODE_SIZE] {
        let mut buf = [0u8; INODE_SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.mode);
        LittleEndian::write_u16(&mut buf[2..4], self.uid);
        LittleEndian::write_u32(&mut buf[4..8], self.size);
        LittleEndian::write_u32(&mut buf[8..12], self.mtime);
        buf[12] = self.gid;
        buf[13] = self.nlinks;
        for (i, zone) in self.zones.iter().enumerate() {
            LittleEndian::write_u16(&mut buf[14 + i * 2..16 + i * 2], *zone);
        }
        buf
    }
}

/// Block and in-block byte offset of inode `inode_number`. Inode numbers are
/// 1-indexed; anything outside 1..=num_inodes is rejected.
pub fn inode_location(superblock: &SuperBlock, inode_number: u16) -> Result<(u32, usize)> {
    if inode_number == 0 || inode_number > superblock.num_inodes {
        return Err(FsError::InodeOutOfRange(inode_number));
    }
    let index = (inode_number - 1) as usize;
    let block_id = superblock.inode_table_start() + (index / INODES_PER_BLOCK) as u32;
    let offset = (index % INODES_PER_BLOCK) * INODE_SIZE;
    Ok((block_id, offset))
}

pub fn get_inode(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    inode_number: u16,
) -> Result<Inode> {
    let (block_id, offset) = inode_location(superblock, inode_number)?;
    let mut buf = vec![0u8; BLOCK_SIZE];
    device.read_block(block_id, &mut buf)?;
    Ok(Inode::decode(&buf[offset..offset + INODE_SIZE]))
}

/// Overwrites exactly one inode record; the rest of its block is untouched.
pub fn write_inode(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    inode_number: u16,
    inode: &Inode,
) -> Result<()> {
    let (block_id, offset) = inode_location(superblock, inode_number)?;
    let mut buf = vec![0u8; BLOCK_SIZE];
    device.read_block(block_id, &mut buf)?;
    buf[offset..offset + INODE_SIZE].copy_from_slice(&inode.encode());
    device.write_block(block_id, &buf)?;
    Ok(())
}

/// Current time as a 32-bit Unix timestamp, for `mtime` updates.
pub fn unix_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
