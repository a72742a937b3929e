//! A low-level editor for raw MINIX filesystem images. It inspects and
//! mutates an image without mounting it: list the root directory, read a
//! file's content, create files and directories, append to a file.
//!
//! On-disk layout (1024-byte blocks throughout):
//! - Block 0: boot block (ignored)
//! - Block 1: superblock
//! - Inode map, zone map (ignored: allocation is a raw structural scan)
//! - Inode table (32-byte records, 1-indexed)
//! - Data zones
//!
//! Each inode carries 9 zone slots: 7 direct, 1 indirect, 1 double
//! indirect. Indirect blocks pack 512 little-endian 16-bit zone numbers;
//! zone 0 is the "unallocated" sentinel everywhere.
//!
//! The engine assumes exclusive, non-concurrent access to the image and
//! performs no journaling or rollback: a failure mid-operation leaves the
//! image partially updated.

mod alloc;
mod block_dev;
mod config;
mod directory;
mod error;
mod file;
mod fs;
mod inode;
mod superblock;
mod zone;

pub use alloc::{DirSlot, free_data_block, free_dir_slot, free_inode};
pub use block_dev::{BlockDevice, FileDisk};
pub use config::*;
pub use directory::{DirEntry, dir_lookup, read_dir, trim_zero};
pub use error::FsError as Error;
pub use error::{FsError, Result};
pub use file::{append_file, read_file};
pub use fs::MinixImage;
pub use inode::{Inode, get_inode, inode_location, unix_timestamp, write_inode};
pub use superblock::{SuperBlock, read_superblock, write_superblock};
pub use zone::{allocated_zones, blocks_for, read_zone_table, resolve_zones};
