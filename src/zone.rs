//! Zone chain resolution: maps an inode's zone slots to the ordered list of
//! physical blocks backing the file's bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::block_dev::BlockDevice;
use crate::config::*;
use crate::error::Result;
use crate::inode::Inode;

/// Number of blocks needed to cover `size` bytes.
pub fn blocks_for(size: u32) -> usize {
    (size as usize).div_ceil(BLOCK_SIZE)
}

/// Decodes a zone as an array of 512 zone numbers, keeping the non-zero
/// entries in array order.
pub fn read_zone_table(device: &impl BlockDevice, zone: u16) -> Result<Vec<u16>> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    device.read_block(zone as u32, &mut buf)?;
    let mut zones = Vec::new();
    for i in 0..ZONES_PER_BLOCK {
        let entry = LittleEndian::read_u16(&buf[i * 2..i * 2 + 2]);
        if entry != EMPTY_ZONE {
            zones.push(entry);
        }
    }
    Ok(zones)
}

/// The ordered data zones covering the first `size` bytes of the file:
/// direct slots, then the indirect block's entries, then the double-indirect
/// chain (outer index major). Zero slots are skipped, not zero-filled; a gap
/// never ends resolution of the slots after it.
pub fn resolve_zones(device: &impl BlockDevice, inode: &Inode) -> Result<Vec<u16>> {
    collect_zones(device, inode, blocks_for(inode.size))
}

/// Every data zone the chain currently addresses, regardless of `size`.
/// Appends rewrite across this full set, since a file may grow into
/// allocated zones beyond its current size.
pub fn allocated_zones(device: &impl BlockDevice, inode: &Inode) -> Result<Vec<u16>> {
    collect_zones(device, inode, usize::MAX)
}

fn collect_zones(device: &impl BlockDevice, inode: &Inode, max: usize) -> Result<Vec<u16>> {
    let mut zones = Vec::new();

    for &zone in &inode.zones[..NUM_DIRECT_ZONES] {
        if zones.len() >= max {
            return Ok(zones);
        }
        if zone != EMPTY_ZONE {
            zones.push(zone);
        }
    }

    // Indirect blocks are only fetched while more zones are still needed.
    let indirect = inode.zones[INDIRECT_ZONE_INDEX];
    if zones.len() < max && indirect != EMPTY_ZONE {
        for zone in read_zone_table(device, indirect)? {
            if zones.len() >= max {
                return Ok(zones);
            }
            zones.push(zone);
        }
    }

    let double_indirect = inode.zones[DOUBLE_INDIRECT_ZONE_INDEX];
    if zones.len() < max && double_indirect != EMPTY_ZONE {
        'outer: for table in read_zone_table(device, double_indirect)? {
            if zones.len() >= max {
                break;
            }
            for zone in read_zone_table(device, table)? {
                if zones.len() >= max {
                    break 'outer;
                }
                zones.push(zone);
            }
        }
    }

    Ok(zones)
}
