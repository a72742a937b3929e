//! Decoding and encoding of the superblock record stored in block 1.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::error::{FsError, Result};

/// The fixed-layout record describing the overall image geometry. Read once
/// per session; the engine itself never modifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    pub num_inodes: u16,
    pub num_zones: u16,
    pub imap_blocks: u16,
    pub zmap_blocks: u16,
    pub first_data_zone: u16,
    pub log_zone_size: u16,
    pub max_file_size: u32,
    pub magic: u16,
    pub state: u16,
}

impl SuperBlock {
    /// Decodes the record from the leading bytes of the superblock block.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(data)).map_err(|_| FsError::CorruptSuperblock)
    }

    fn read_from(r: &mut impl Read) -> std::io::Result<Self> {
        Ok(SuperBlock {
            num_inodes: r.read_u16::<LittleEndian>()?,
            num_zones: r.read_u16::<LittleEndian>()?,
            imap_blocks: r.read_u16::<LittleEndian>()?,
            zmap_blocks: r.read_u16::<LittleEndian>()?,
            first_data_zone: r.read_u16::<LittleEndian>()?,
            log_zone_size: r.read_u16::<LittleEndian>()?,
            max_file_size: r.read_u32::<LittleEndian>()?,
            magic: r.read_u16::<LittleEndian>()?,
            state: r.read_u16::<LittleEndian>()?,
        })
    }

    /// Encodes the record into the leading bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) -> Result<()> {
        let mut cur = Cursor::new(buf);
        cur.write_u16::<LittleEndian>(self.num_inodes)?;
        cur.write_u16::<LittleEndian>(self.num_zones)?;
        cur.write_u16::<LittleEndian>(self.imap_blocks)?;
        cur.write_u16::<LittleEndian>(self.zmap_blocks)?;
        cur.write_u16::<LittleEndian>(self.first_data_zone)?;
        cur.write_u16::<LittleEndian>(self.log_zone_size)?;
        cur.write_u32::<LittleEndian>(self.max_file_size)?;
        cur.write_u16::<LittleEndian>(self.magic)?;
        cur.write_u16::<LittleEndian>(self.state)?;
        cur.flush()?;
        Ok(())
    }

    /// Width of the directory-entry name field. An unrecognized magic falls
    /// back to the short variant.
    pub fn name_len(&self) -> usize {
        if self.magic == MAGIC_LONG_NAMES {
            NAME_LEN_LONG
        } else {
            NAME_LEN_SHORT
        }
    }

    /// Size of one directory entry: inode number plus name field.
    pub fn dir_entry_size(&self) -> usize {
        2 + self.name_len()
    }

    /// First block of the inode table: boot block, superblock, then the
    /// inode and zone map regions.
    pub fn inode_table_start(&self) -> u32 {
        2 + self.imap_blocks as u32 + self.zmap_blocks as u32
    }
}

pub fn read_superblock(device: &impl BlockDevice) -> Result<SuperBlock> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    device
        .read_block(SUPERBLOCK_ID, &mut buf)
        .map_err(|_| FsError::CorruptSuperblock)?;
    SuperBlock::decode(&buf)
}

pub fn write_superblock(device: &impl BlockDevice, superblock: &SuperBlock) -> Result<()> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    superblock.encode(&mut buf)?;
    device.write_block(SUPERBLOCK_ID, &buf)?;
    device.flush()?;
    Ok(())
}
