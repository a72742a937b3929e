//! Superblock, inode table, zone resolution and content reading against an
//! in-memory disk.

mod common;

use common::*;
use mfstool::*;

#[test]
fn open_reads_superblock() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    let image = MinixImage::open(disk).unwrap();
    assert_eq!(*image.superblock(), sb);
    assert_eq!(image.name_len(), NAME_LEN_SHORT);
    assert_eq!(sb.inode_table_start(), 4);
}

#[test]
fn empty_disk_is_corrupt() {
    let disk = RamDisk::new(1);
    assert!(matches!(
        read_superblock(&disk),
        Err(Error::CorruptSuperblock)
    ));
    assert!(matches!(
        MinixImage::open(disk),
        Err(Error::CorruptSuperblock)
    ));
}

#[test]
fn inode_roundtrips_through_table() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    for inode_number in [2u16, 5, 31, 32] {
        let inode = Inode {
            mode: S_IFREG | S_IRUSR,
            uid: inode_number,
            size: 1000 + inode_number as u32,
            mtime: 42,
            gid: 1,
            nlinks: 1,
            zones: [inode_number, 0, 0, 0, 0, 0, 0, 0, 0],
        };
        write_inode(&disk, &sb, inode_number, &inode).unwrap();
        assert_eq!(get_inode(&disk, &sb, inode_number).unwrap(), inode);
    }
}

#[test]
fn inode_write_touches_one_record() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    let before = get_inode(&disk, &sb, 3).unwrap();
    write_file_inode(&disk, &sb, 4, 123, [9, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(get_inode(&disk, &sb, 3).unwrap(), before);
}

#[test]
fn out_of_range_inodes_are_rejected() {
    let (disk, sb) = mkfs(8, 32, 0x137F);
    assert!(matches!(
        get_inode(&disk, &sb, 0),
        Err(Error::InodeOutOfRange(0))
    ));
    assert!(matches!(
        get_inode(&disk, &sb, 9),
        Err(Error::InodeOutOfRange(9))
    ));
}

#[test]
fn list_root_skips_free_slots() {
    // Scenario: one used entry ("foo" -> 5) followed by empty slots.
    let (disk, sb) = mkfs(32, 64, 0x137F);
    write_dir_block(&disk, &sb, sb.first_data_zone, &[(5, b"foo")]);
    let image = MinixImage::open(disk).unwrap();
    let entries = image.list_root().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].inode, 5);
    assert_eq!(entries[0].name, b"foo");
}

#[test]
fn read_gathers_exactly_size_bytes() {
    // 2500 bytes across zones [10, 11, 12]: 1024 + 1024 + 452.
    let (disk, sb) = mkfs(32, 64, 0x137F);
    fill_block(&disk, 10, 0xAA);
    fill_block(&disk, 11, 0xBB);
    fill_block(&disk, 12, 0xCC);
    write_file_inode(&disk, &sb, 2, 2500, [10, 11, 12, 0, 0, 0, 0, 0, 0]);

    let inode = get_inode(&disk, &sb, 2).unwrap();
    let content = read_file(&disk, &inode).unwrap();
    assert_eq!(content.len(), 2500);
    assert!(content[..1024].iter().all(|&b| b == 0xAA));
    assert!(content[1024..2048].iter().all(|&b| b == 0xBB));
    assert!(content[2048..].iter().all(|&b| b == 0xCC));
}

#[test]
fn resolver_visits_direct_then_indirect_then_double() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    write_zone_table(&disk, 30, &[40, 41]);
    write_zone_table(&disk, 31, &[32, 33]);
    write_zone_table(&disk, 32, &[50, 51]);
    write_zone_table(&disk, 33, &[52]);
    let size = 12 * BLOCK_SIZE as u32;
    write_file_inode(&disk, &sb, 2, size, [20, 21, 22, 23, 24, 25, 26, 30, 31]);

    let inode = get_inode(&disk, &sb, 2).unwrap();
    let zones = resolve_zones(&disk, &inode).unwrap();
    assert_eq!(zones, vec![20, 21, 22, 23, 24, 25, 26, 40, 41, 50, 51, 52]);
    assert_eq!(zones.len(), blocks_for(size));
}

#[test]
fn resolver_stops_once_size_is_covered() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    write_zone_table(&disk, 30, &[40, 41, 42]);
    let size = 8 * BLOCK_SIZE as u32;
    write_file_inode(&disk, &sb, 2, size, [20, 21, 22, 23, 24, 25, 26, 30, 0]);

    let inode = get_inode(&disk, &sb, 2).unwrap();
    let zones = resolve_zones(&disk, &inode).unwrap();
    assert_eq!(zones, vec![20, 21, 22, 23, 24, 25, 26, 40]);
}

#[test]
fn resolver_skips_gaps_without_aborting() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    write_file_inode(&disk, &sb, 2, 3000, [10, 0, 11, 12, 0, 0, 0, 0, 0]);
    let inode = get_inode(&disk, &sb, 2).unwrap();
    assert_eq!(resolve_zones(&disk, &inode).unwrap(), vec![10, 11, 12]);
}

#[test]
fn indirect_gaps_are_skipped_too() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    // a zero entry inside the table ends nothing; the sibling after it is
    // still emitted
    write_zone_table(&disk, 30, &[40, 0, 41]);
    let size = 9 * BLOCK_SIZE as u32;
    write_file_inode(&disk, &sb, 2, size, [20, 21, 22, 23, 24, 25, 26, 30, 0]);
    let inode = get_inode(&disk, &sb, 2).unwrap();
    assert_eq!(
        resolve_zones(&disk, &inode).unwrap(),
        vec![20, 21, 22, 23, 24, 25, 26, 40, 41]
    );
}

#[test]
fn truncated_chain_degrades_to_short_read() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    fill_block(&disk, 10, 0x11);
    write_file_inode(&disk, &sb, 2, 5000, [10, 0, 0, 0, 0, 0, 0, 0, 0]);
    let inode = get_inode(&disk, &sb, 2).unwrap();
    let content = read_file(&disk, &inode).unwrap();
    assert_eq!(content.len(), 1024);
}

#[test]
fn lookup_finds_first_match() {
    let (disk, sb) = mkfs(32, 64, 0x137F);
    write_dir_block(
        &disk,
        &sb,
        sb.first_data_zone,
        &[(1, b"."), (1, b".."), (5, b"foo"), (6, b"bar")],
    );
    let image = MinixImage::open(disk).unwrap();
    assert_eq!(image.lookup_root(b"bar").unwrap(), 6);
    assert!(matches!(
        image.lookup_root(b"nope"),
        Err(Error::NameNotFound(_))
    ));
}

#[test]
fn long_name_variant_uses_30_byte_fields() {
    let (disk, sb) = mkfs(32, 64, MAGIC_LONG_NAMES);
    assert_eq!(sb.name_len(), NAME_LEN_LONG);
    assert_eq!(sb.dir_entry_size(), 32);
    let name = b"a_rather_long_directory_name";
    write_dir_block(&disk, &sb, sb.first_data_zone, &[(7, name)]);
    let image = MinixImage::open(disk).unwrap();
    assert_eq!(image.lookup_root(name).unwrap(), 7);
}
