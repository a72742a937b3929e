//! Common utilities for tests: an in-memory block device and helpers for
//! hand-building small MINIX images.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mfstool::*;

/// An in-memory disk. Cloning shares the backing store, so a test can keep
/// one handle for raw-byte inspection after giving another to the engine.
#[derive(Clone)]
pub struct RamDisk {
    inner: Arc<Mutex<Vec<u8>>>,
    num_blocks: usize,
}

impl RamDisk {
    pub fn new(num_blocks: usize) -> Self {
        RamDisk {
            inner: Arc::new(Mutex::new(vec![0u8; num_blocks * BLOCK_SIZE])),
            num_blocks,
        }
    }

    /// A copy of every byte on the disk, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.lock().unwrap().clone()
    }
}

impl BlockDevice for RamDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let data = self.inner.lock().unwrap();
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let mut data = self.inner.lock().unwrap();
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Lays out a minimal valid image: boot block, superblock (one imap block,
/// one zmap block), inode table, and a root directory whose single zone
/// holds `.` and `..`.
pub fn mkfs(num_inodes: u16, num_zones: u16, magic: u16) -> (RamDisk, SuperBlock) {
    let disk = RamDisk::new(num_zones as usize);
    let inode_blocks = (num_inodes as usize).div_ceil(INODES_PER_BLOCK);
    let first_data_zone = (4 + inode_blocks) as u16;
    let sb = SuperBlock {
        num_inodes,
        num_zones,
        imap_blocks: 1,
        zmap_blocks: 1,
        first_data_zone,
        log_zone_size: 0,
        max_file_size: MAX_CHAIN_BYTES as u32,
        magic,
        state: 1,
    };
    write_superblock(&disk, &sb).unwrap();

    let mut zones = [EMPTY_ZONE; NUM_ZONE_SLOTS];
    zones[0] = first_data_zone;
    let root = Inode {
        mode: S_IFDIR | S_IRUSR | S_IWUSR | S_IXUSR,
        uid: 0,
        size: BLOCK_SIZE as u32,
        mtime: 0,
        gid: 0,
        nlinks: 2,
        zones,
    };
    write_inode(&disk, &sb, ROOT_INODE_ID, &root).unwrap();
    write_dir_block(
        &disk,
        &sb,
        first_data_zone,
        &[
            (ROOT_INODE_ID, DOT_NAME.as_slice()),
            (ROOT_INODE_ID, DOTDOT_NAME.as_slice()),
        ],
    );

    (disk, sb)
}

/// Overwrites a zone with the given directory entries, remaining slots free.
pub fn write_dir_block(disk: &RamDisk, sb: &SuperBlock, zone: u16, entries: &[(u16, &[u8])]) {
    let entry_size = sb.dir_entry_size();
    let mut buf = vec![0u8; BLOCK_SIZE];
    for (i, (inode, name)) in entries.iter().enumerate() {
        let raw = DirEntry::new(*inode, name, sb.name_len())
            .unwrap()
            .encode(sb.name_len());
        buf[i * entry_size..(i + 1) * entry_size].copy_from_slice(&raw);
    }
    disk.write_block(zone as u32, &buf).unwrap();
}

/// Overwrites a zone with an indirect block listing the given zone numbers.
pub fn write_zone_table(disk: &RamDisk, zone: u16, entries: &[u16]) {
    let mut buf = vec![0u8; BLOCK_SIZE];
    for (i, entry) in entries.iter().enumerate() {
        buf[i * 2..i * 2 + 2].copy_from_slice(&entry.to_le_bytes());
    }
    disk.write_block(zone as u32, &buf).unwrap();
}

/// Fills a whole zone with one byte value.
pub fn fill_block(disk: &RamDisk, zone: u16, byte: u8) {
    disk.write_block(zone as u32, &vec![byte; BLOCK_SIZE]).unwrap();
}

/// Writes `content` into a zone, zero-padded to the block size.
pub fn write_block_bytes(disk: &RamDisk, zone: u16, content: &[u8]) {
    let mut buf = vec![0u8; BLOCK_SIZE];
    buf[..content.len()].copy_from_slice(content);
    disk.write_block(zone as u32, &buf).unwrap();
}

/// Writes a regular-file inode with the given size and zone list.
pub fn write_file_inode(disk: &RamDisk, sb: &SuperBlock, inode_number: u16, size: u32, zones: [u16; NUM_ZONE_SLOTS]) {
    let inode = Inode {
        mode: S_IFREG | S_IRUSR | S_IWUSR | S_IXUSR,
        uid: 0,
        size,
        mtime: 0,
        gid: 0,
        nlinks: 1,
        zones,
    };
    write_inode(disk, sb, inode_number, &inode).unwrap();
}
