//! The caller-facing surface tying the engine together: one open image, one
//! decoded superblock, and the five operations of the tool.

use log::debug;

use crate::alloc::{free_data_block, free_dir_slot, free_inode};
use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::directory::{DirEntry, dir_lookup, read_dir};
use crate::error::{FsError, Result};
use crate::file::{append_file, read_file};
use crate::inode::{Inode, get_inode, unix_timestamp, write_inode};
use crate::superblock::{SuperBlock, read_superblock};

/// An exclusively-held, already-formatted MINIX image. All mutation is
/// in-place seek-then-overwrite; a failure partway through a multi-block
/// operation leaves the image partially updated.
#[derive(Debug)]
pub struct MinixImage<D: BlockDevice> {
    device: D,
    superblock: SuperBlock,
}

impl<D: BlockDevice> MinixImage<D> {
    /// Decodes the superblock and wraps the device. The magic number is not
    /// validated; an unrecognized value just selects short names.
    pub fn open(device: D) -> Result<Self> {
        let superblock = read_superblock(&device)?;
        debug!(
            "opened image: {} inodes, {} zones, magic {:#06x}",
            superblock.num_inodes, superblock.num_zones, superblock.magic
        );
        Ok(MinixImage { device, superblock })
    }

    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn name_len(&self) -> usize {
        self.superblock.name_len()
    }

    pub fn flush(&self) -> Result<()> {
        self.device.flush()
    }

    fn root_inode(&self) -> Result<Inode> {
        get_inode(&self.device, &self.superblock, ROOT_INODE_ID)
    }

    /// Lists the root directory.
    pub fn list_root(&self) -> Result<Vec<DirEntry>> {
        read_dir(&self.device, &self.superblock, &self.root_inode()?)
    }

    /// Resolves a name to an inode number within the root directory.
    pub fn lookup_root(&self, name: &[u8]) -> Result<u16> {
        dir_lookup(&self.device, &self.superblock, &self.root_inode()?, name)
    }

    /// Reads the full content of `dir_name/file_name`, where `dir_name` is
    /// a child of the root directory.
    pub fn read_file(&self, dir_name: &[u8], file_name: &[u8]) -> Result<Vec<u8>> {
        let dir_inode = get_inode(
            &self.device,
            &self.superblock,
            self.lookup_root(dir_name)?,
        )?;
        let inode_number = dir_lookup(&self.device, &self.superblock, &dir_inode, file_name)?;
        let inode = get_inode(&self.device, &self.superblock, inode_number)?;
        read_file(&self.device, &inode)
    }

    /// Appends `data` to `dir_name/file_name`. Returns the number of bytes
    /// actually written (less than `data.len()` once the file's allocated
    /// zones are full).
    pub fn append(&mut self, dir_name: &[u8], file_name: &[u8], data: &[u8]) -> Result<usize> {
        let dir_inode = get_inode(
            &self.device,
            &self.superblock,
            self.lookup_root(dir_name)?,
        )?;
        let inode_number = dir_lookup(&self.device, &self.superblock, &dir_inode, file_name)?;
        append_file(&self.device, &self.superblock, inode_number, data)
    }

    /// Creates an empty regular file in the root directory. Returns the
    /// inode number chosen for it.
    pub fn create_file(&mut self, name: &[u8]) -> Result<u16> {
        self.check_name(name)?;
        let inode_number = free_inode(&self.device, &self.superblock)?;
        let inode = Inode {
            mode: S_IFREG | S_IRUSR | S_IWUSR | S_IXUSR,
            uid: 0,
            size: 0,
            mtime: unix_timestamp(),
            gid: 0,
            nlinks: 1,
            zones: [EMPTY_ZONE; NUM_ZONE_SLOTS],
        };
        write_inode(&self.device, &self.superblock, inode_number, &inode)?;
        self.add_root_entry(name, inode_number)?;
        Ok(inode_number)
    }

    /// Creates a directory in the root directory: a fresh inode with
    /// `nlinks == 2`, one allocated data zone, and `.`/`..` entries in that
    /// first zone only. Returns the inode number chosen for it.
    pub fn create_directory(&mut self, name: &[u8]) -> Result<u16> {
        self.check_name(name)?;
        let inode_number = free_inode(&self.device, &self.superblock)?;
        let mut inode = Inode {
            mode: S_IFDIR | S_IRUSR | S_IWUSR | S_IXUSR,
            uid: 0,
            size: BLOCK_SIZE as u32,
            mtime: unix_timestamp(),
            gid: 0,
            nlinks: 2,
            zones: [EMPTY_ZONE; NUM_ZONE_SLOTS],
        };
        write_inode(&self.device, &self.superblock, inode_number, &inode)?;
        self.add_root_entry(name, inode_number)?;

        let zone = free_data_block(&self.device, &self.superblock)?;
        inode.zones[0] = zone;
        write_inode(&self.device, &self.superblock, inode_number, &inode)?;

        // `.` and `..` go into the first zone; the block was found all-zero,
        // so the remaining slots are already free.
        let name_len = self.name_len();
        let dot = DirEntry::new(inode_number, DOT_NAME, name_len)?.encode(name_len);
        let dotdot = DirEntry::new(ROOT_INODE_ID, DOTDOT_NAME, name_len)?.encode(name_len);
        let mut buf = vec![0u8; BLOCK_SIZE];
        buf[..dot.len()].copy_from_slice(&dot);
        buf[dot.len()..dot.len() + dotdot.len()].copy_from_slice(&dotdot);
        self.device.write_block(zone as u32, &buf)?;

        Ok(inode_number)
    }

    fn check_name(&self, name: &[u8]) -> Result<()> {
        if name.len() > self.name_len() {
            return Err(FsError::NameTooLong(self.name_len()));
        }
        Ok(())
    }

    /// Writes a `name -> inode` entry into the first free slot of the root
    /// directory.
    fn add_root_entry(&self, name: &[u8], inode_number: u16) -> Result<()> {
        let root = self.root_inode()?;
        let slot = free_dir_slot(&self.device, &self.superblock, &root)?;
        let raw = DirEntry::new(inode_number, name, self.name_len())?.encode(self.name_len());
        let mut buf = vec![0u8; BLOCK_SIZE];
        self.device.read_block(slot.zone as u32, &mut buf)?;
        buf[slot.offset..slot.offset + raw.len()].copy_from_slice(&raw);
        self.device.write_block(slot.zone as u32, &buf)?;
        Ok(())
    }
}
