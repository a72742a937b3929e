//! Whole-file content reads and in-place appends.

use log::warn;

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{Inode, get_inode, unix_timestamp, write_inode};
use crate::superblock::SuperBlock;
use crate::zone::{allocated_zones, resolve_zones};

/// Gathers the file's content by walking its resolved zones, taking
/// `min(block, remaining)` bytes from each. If the chain runs out before
/// `size` bytes are gathered the result is a short read, not an error.
pub fn read_file(device: &impl BlockDevice, inode: &Inode) -> Result<Vec<u8>> {
    let mut content = Vec::with_capacity(inode.size as usize);
    let mut remaining = inode.size as usize;
    let mut buf = vec![0u8; BLOCK_SIZE];

    for zone in resolve_zones(device, inode)? {
        if remaining == 0 {
            break;
        }
        device.read_block(zone as u32, &mut buf)?;
        let take = BLOCK_SIZE.min(remaining);
        content.extend_from_slice(&buf[..take]);
        remaining -= take;
    }

    Ok(content)
}

/// Appends `data` to the file by reading its current content back,
/// concatenating, and rewriting block-by-block across the zones the file
/// already owns. No new zones are ever allocated: content beyond the
/// capacity of the existing chain is silently dropped.
///
/// The inode's `size` advances by the full `data` length even when the
/// write truncated; later reads degrade to short reads. `mtime` is set to
/// the current time. Returns the number of appended bytes actually written.
pub fn append_file(
    device: &impl BlockDevice,
    superblock: &SuperBlock,
    inode_number: u16,
    data: &[u8],
) -> Result<usize> {
    let mut inode = get_inode(device, superblock, inode_number)?;
    if !inode.is_regular() {
        return Err(FsError::NotRegular);
    }

    let mut content = read_file(device, &inode)?;
    let old_len = content.len();
    content.extend_from_slice(data);

    let zones = allocated_zones(device, &inode)?;
    let capacity = zones.len() * BLOCK_SIZE;
    if content.len() > capacity {
        warn!(
            "append truncated: {} bytes exceed the {} allocated blocks of inode {inode_number}",
            content.len(),
            zones.len()
        );
    }

    let mut written = 0;
    let mut buf = vec![0u8; BLOCK_SIZE];
    for (chunk, &zone) in content.chunks(BLOCK_SIZE).zip(&zones) {
        if chunk.len() == BLOCK_SIZE {
            device.write_block(zone as u32, chunk)?;
        } else {
            // partial tail: leave the rest of the block as it was
            device.read_block(zone as u32, &mut buf)?;
            buf[..chunk.len()].copy_from_slice(chunk);
            device.write_block(zone as u32, &buf)?;
        }
        written += chunk.len();
    }

    inode.size += data.len() as u32;
    inode.mtime = unix_timestamp();
    write_inode(device, superblock, inode_number, &inode)?;

    Ok(written.saturating_sub(old_len))
}
