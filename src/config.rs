//! 可以自行调整的变量, 全部在编译期确定

use crate::error::BenchError;

// SD 卡接线
pub const GPIO_SD_MISO: u8 = 35;
pub const GPIO_SD_CS: u8 = 14;
pub const GPIO_SD_MOSI: u8 = 32;
pub const GPIO_SD_CLK: u8 = 33;

pub const SD_FREQUENCY_HZ: u32 = 20 * 1000 * 1000;
pub const MOUNT_POINT: &str = "/sd";
pub const MAX_OPEN_FILES: usize = 3;
/// Host directory that backs `MOUNT_POINT` when running off-device.
pub const HOST_MOUNT_ROOT: &str = "sd";

// 会被创建或者覆盖
pub const TEST_FILE: &str = "/sd/test.dat";
pub const TEST_FILE_SIZE: u64 = 200 * 1024 * 1024; // [bytes]
pub const READ_CHUNK_SZ: usize = 4096;
pub const START_OFFSET: u64 = TEST_FILE_SIZE / 2 + 150;

pub const ACCESS_PATTERN: AccessPattern = AccessPattern::Sequential;
pub const FAST_SEEK: bool = cfg!(feature = "fast-seek");

/// How the cursor moves between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPattern {
    /// `offset = (offset + 1) % size`
    Sequential,
    /// Uniform offset in `[0, size)`. `None` seeds from OS entropy.
    Random { seed: Option<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdPins {
    pub miso: u8,
    pub mosi: u8,
    pub clk: u8,
    pub cs: u8,
}

impl Default for SdPins {
    fn default() -> Self {
        Self {
            miso: GPIO_SD_MISO,
            mosi: GPIO_SD_MOSI,
            clk: GPIO_SD_CLK,
            cs: GPIO_SD_CS,
        }
    }
}

/// Everything one benchmark run needs. `Default` is the on-device build.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub pins: SdPins,
    pub frequency_hz: u32,
    pub mount_point: String,
    pub max_open_files: usize,
    pub fast_seek: bool,
    pub path: String,
    pub file_size: u64,
    pub read_chunk_size: usize,
    pub start_offset: u64,
    pub pattern: AccessPattern,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            pins: SdPins::default(),
            frequency_hz: SD_FREQUENCY_HZ,
            mount_point: MOUNT_POINT.to_string(),
            max_open_files: MAX_OPEN_FILES,
            fast_seek: FAST_SEEK,
            path: TEST_FILE.to_string(),
            file_size: TEST_FILE_SIZE,
            read_chunk_size: READ_CHUNK_SZ,
            start_offset: START_OFFSET,
            pattern: ACCESS_PATTERN,
        }
    }
}

impl BenchConfig {
    /// Same device settings, different file geometry.
    pub fn with_file(path: &str, file_size: u64) -> Self {
        Self {
            path: path.to_string(),
            file_size,
            start_offset: file_size / 2 + 150,
            ..Self::default()
        }
    }
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.file_size == 0 {
            return Err(BenchError::InvalidFileSize(self.file_size));
        }
        if self.read_chunk_size == 0 {
            return Err(BenchError::InvalidChunkSize(self.read_chunk_size));
        }
        if self.max_open_files == 0 {
            return Err(BenchError::InvalidMaxFiles(self.max_open_files));
        }
        Ok(())
    }
}
