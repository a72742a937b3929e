use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("superblock truncated or unreadable")]
    CorruptSuperblock,
    #[error("inode {0} out of range")]
    InodeOutOfRange(u16),
    #[error("name not found: {0}")]
    NameNotFound(String),
    #[error("no free inodes")]
    NoFreeInodes,
    #[error("no free directory slot")]
    DirectoryFull,
    #[error("no free data blocks")]
    NoFreeDataBlocks,
    #[error("name too long (limit {0} bytes)")]
    NameTooLong(usize),
    #[error("not a directory")]
    NotDirectory,
    #[error("not a regular file")]
    NotRegular,
    #[error("block {0} out of range")]
    InvalidBlockId(u32),
}

pub type Result<T> = core::result::Result<T, FsError>;
