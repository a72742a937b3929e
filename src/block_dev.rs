use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::config::BLOCK_SIZE;
use crate::error::{FsError, Result};

pub trait BlockDevice: Send + Sync {
    /// Returns the number of blocks in the block device.
    fn num_blocks(&self) -> usize;

    /// Reads a block of data from the block device.
    /// buf.len() must be equal to block_size().
    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()>;

    /// Writes a block of data to the block device.
    /// buf.len() must be equal to block_size().
    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()>;

    /// Flushes any cached data to the block device.
    fn flush(&self) -> Result<()>;

    /// Returns the size of each block in bytes.
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

/// A disk image file exposed as a block device. Every access seeks to an
/// absolute offset; no state is carried between calls.
pub struct FileDisk {
    inner: Mutex<File>,
    num_blocks: usize,
}

impl FileDisk {
    /// Opens an existing image read-write. The image length, rounded down,
    /// determines the number of addressable blocks.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::options().read(true).write(true).open(path)?;
        let num_blocks = file.metadata()?.len() as usize / BLOCK_SIZE;
        Ok(FileDisk {
            inner: Mutex::new(file),
            num_blocks,
        })
    }

    fn check(&self, block_id: u32, len: usize) -> Result<u64> {
        if block_id as usize >= self.num_blocks {
            return Err(FsError::InvalidBlockId(block_id));
        }
        if len != BLOCK_SIZE {
            return Err(FsError::Io(std::io::ErrorKind::InvalidInput.into()));
        }
        Ok(block_id as u64 * BLOCK_SIZE as u64)
    }
}

impl BlockDevice for FileDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()> {
        let offset = self.check(block_id, buf.len())?;
        let mut inner = self.inner.lock().unwrap();
        inner.seek(SeekFrom::Start(offset))?;
        inner.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()> {
        let offset = self.check(block_id, buf.len())?;
        let mut inner = self.inner.lock().unwrap();
        inner.seek(SeekFrom::Start(offset))?;
        inner.write_all(buf)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.inner.lock().unwrap().flush()?;
        Ok(())
    }
}
