//! Fixed layout parameters of the classic MINIX on-disk format.

pub const BLOCK_SIZE: usize = 1024;
pub const SUPERBLOCK_ID: u32 = 1; // Block ID of the superblock (block 0 is the boot block)
pub const ROOT_INODE_ID: u16 = 1; // Inode number of the root directory (inode 0 is unused)

pub const INODE_SIZE: usize = 32;
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_SIZE;

pub const EMPTY_ZONE: u16 = 0; // Unallocated slot / end-of-chain sentinel

pub const NUM_DIRECT_ZONES: usize = 7;
pub const INDIRECT_ZONE_INDEX: usize = 7;
pub const DOUBLE_INDIRECT_ZONE_INDEX: usize = 8;
pub const NUM_ZONE_SLOTS: usize = 9;
pub const ZONES_PER_BLOCK: usize = BLOCK_SIZE / 2; // Indirect blocks hold 16-bit zone numbers

pub const MAGIC_LONG_NAMES: u16 = 0x138F; // 30-byte name fields
pub const NAME_LEN_SHORT: usize = 14;
pub const NAME_LEN_LONG: usize = 30;

pub const DOT_NAME: &[u8; 1] = b".";
pub const DOTDOT_NAME: &[u8; 2] = b"..";

// Inode mode bits
pub const S_IFREG: u16 = 0x8000;
pub const S_IFDIR: u16 = 0x4000;
pub const S_IRUSR: u16 = 0x100;
pub const S_IWUSR: u16 = 0x080;
pub const S_IXUSR: u16 = 0x040;

/// Largest byte count a full direct + indirect + double-indirect chain can address.
pub const MAX_CHAIN_BYTES: usize =
    (NUM_DIRECT_ZONES + ZONES_PER_BLOCK + ZONES_PER_BLOCK * ZONES_PER_BLOCK) * BLOCK_SIZE;
