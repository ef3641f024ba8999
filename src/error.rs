use crate::volume::OpenMode;
use std::io;
use thiserror::Error;

/// 文件系统层面的错误
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("path {path} is not under mount point {mount_point}")]
    OutsideMount { path: String, mount_point: String },
    #[error("too many open files (max {0})")]
    TooManyOpenFiles(usize),
}

/// Setup failures. Each one ends the run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("fopen({path}, {mode}) failed: {source}")]
    Open {
        path: String,
        mode: OpenMode,
        #[source]
        source: VolumeError,
    },
    #[error("write to {path} failed: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid file size {0}, must be non-zero")]
    InvalidFileSize(u64),
    #[error("invalid read chunk size {0}, must be non-zero")]
    InvalidChunkSize(usize),
    #[error("invalid max open files {0}, must be non-zero")]
    InvalidMaxFiles(usize),
}
