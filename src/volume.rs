// 挂载后的卷, 对外部文件系统库的抽象
use crate::error::VolumeError;
use bitflags::bitflags;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

bitflags! {
    /// fopen 风格的打开方式
    #[derive(Default)]
    pub struct OpenMode: u8 {
        const READ      = 0x01;
        const WRITE     = 0x02;
        const CREATE    = 0x04;
        const TRUNCATE  = 0x08;
        /// "wb"
        const WRITE_NEW = Self::WRITE.bits | Self::CREATE.bits | Self::TRUNCATE.bits;
    }
}

impl OpenMode {
    pub fn as_fopen_str(&self) -> &'static str {
        match (self.contains(Self::READ), self.contains(Self::WRITE)) {
            (true, true) if self.contains(Self::TRUNCATE) => "w+b",
            (true, true) => "r+b",
            (false, true) => "wb",
            (true, false) => "rb",
            (false, false) => "",
        }
    }
}

impl core::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_fopen_str())
    }
}

/// Parameters handed to the filesystem library at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub cs_pin: u8,
    pub frequency_hz: u32,
    pub mount_point: String,
    pub max_files: usize,
    /// Ask the library to build a cluster link map on open.
    /// Has an effect only on a filesystem library that honors it; `HostVolume` just reports it.
    pub fast_seek: bool,
}

/// A mounted volume. Files close when dropped.
pub trait Volume {
    type File: Read + Write + Seek;

    fn open(&self, path: &str, mode: OpenMode) -> Result<Self::File, VolumeError>;
    fn mount_point(&self) -> &str;
}

/// A host directory standing in for the SD card.
///
/// Paths are given in device form (`/sd/test.dat`) and must live under the
/// mount point. At most `max_files` handles may be open at once.
#[derive(Debug)]
pub struct HostVolume {
    root: PathBuf,
    mount_point: String,
    max_files: usize,
    fast_seek: bool,
    // 每个打开的文件持有一份引用, strong_count - 1 即打开的文件数
    slots: Arc<()>,
}

impl HostVolume {
    pub fn new(root: impl Into<PathBuf>, config: &MountConfig) -> Self {
        Self {
            root: root.into(),
            mount_point: config.mount_point.trim_end_matches('/').to_string(),
            max_files: config.max_files,
            fast_seek: config.fast_seek,
            slots: Arc::new(()),
        }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn fast_seek(&self) -> bool {
        self.fast_seek
    }
    pub fn open_files(&self) -> usize {
        Arc::strong_count(&self.slots) - 1
    }
    /// Map a device path onto the host directory.
    pub fn host_path(&self, path: &str) -> Result<PathBuf, VolumeError> {
        let outside = || VolumeError::OutsideMount {
            path: path.to_string(),
            mount_point: self.mount_point.clone(),
        };
        let rest = path.strip_prefix(self.mount_point.as_str()).ok_or_else(outside)?;
        let rest = rest.strip_prefix('/').ok_or_else(outside)?;
        let relative = Path::new(rest);
        if rest.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(outside());
        }
        Ok(self.root.join(relative))
    }
}

impl Volume for HostVolume {
    type File = HostFile;

    fn open(&self, path: &str, mode: OpenMode) -> Result<HostFile, VolumeError> {
        if self.open_files() >= self.max_files {
            return Err(VolumeError::TooManyOpenFiles(self.max_files));
        }
        let host_path = self.host_path(path)?;
        let file = OpenOptions::new()
            .read(mode.contains(OpenMode::READ))
            .write(mode.contains(OpenMode::WRITE))
            .create(mode.contains(OpenMode::CREATE))
            .truncate(mode.contains(OpenMode::TRUNCATE))
            .open(&host_path)?;
        log::trace!("open {} as {}", host_path.display(), mode.as_fopen_str());
        Ok(HostFile {
            file,
            _slot: Arc::clone(&self.slots),
        })
    }
    fn mount_point(&self) -> &str {
        &self.mount_point
    }
}

#[derive(Debug)]
pub struct HostFile {
    file: File,
    _slot: Arc<()>,
}

impl HostFile {
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

impl Read for HostFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for HostFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for HostFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
