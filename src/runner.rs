// 基准测试流程: 初始化 -> 创建文件 -> 循环 seek + read
use crate::board::Board;
use crate::clock::Clock;
use crate::config::BenchConfig;
use crate::cursor::OffsetCursor;
use crate::error::BenchError;
use crate::volume::{MountConfig, OpenMode, Volume};
use core::fmt;
use log::{error, info, trace};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// One timed iteration of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub offset: u64,
    pub elapsed_us: u64,
    pub bytes_read: usize,
}

impl fmt::Display for TimingSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fseek({:>10}) dt: {:>6} us, read {:>4}",
            self.offset, self.elapsed_us, self.bytes_read
        )
    }
}

/// Fill `buf` the way `fread` does: stop at EOF or on the first error and
/// return how many bytes landed.
pub fn read_chunk<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> usize {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                trace!("read stopped after {} bytes: {}", filled, e);
                break;
            }
        }
    }
    filled
}

/// Creating 阶段: 卷已挂载, 测试文件还没准备好
pub struct SeekBenchmark<V: Volume, C: Clock> {
    volume: V,
    clock: C,
    config: BenchConfig,
}

impl<V: Volume, C: Clock> SeekBenchmark<V, C> {
    /// Bring up the bus and mount the volume. Only a bad `config` fails here.
    pub fn initialize<B>(board: &mut B, clock: C, config: BenchConfig) -> Result<Self, BenchError>
    where
        B: Board<Volume = V>,
    {
        if let Err(err) = config.validate() {
            error!("{}", err);
            return Err(err);
        }
        board.begin_bus(&config.pins);
        let volume = board.mount(&MountConfig {
            cs_pin: config.pins.cs,
            frequency_hz: config.frequency_hz,
            mount_point: config.mount_point.clone(),
            max_files: config.max_open_files,
            fast_seek: config.fast_seek,
        });
        Ok(Self {
            volume,
            clock,
            config,
        })
    }
    pub fn volume(&self) -> &V {
        &self.volume
    }
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }
    fn open(&self, mode: OpenMode) -> Result<V::File, BenchError> {
        self.volume
            .open(&self.config.path, mode)
            .map_err(|source| {
                let err = BenchError::Open {
                    path: self.config.path.clone(),
                    mode,
                    source,
                };
                error!("{}", err);
                err
            })
    }
    /// Create or overwrite the test file so it is exactly `file_size` bytes.
    /// Only the last byte is written.
    pub fn create_file(&self) -> Result<(), BenchError> {
        let size = self.config.file_size;
        let mut file = self.open(OpenMode::WRITE_NEW)?;
        info!(
            "Creating {} MB file: {} ...",
            size / 1024 / 1024,
            self.config.path
        );
        let res = file
            .seek(SeekFrom::Start(size - 1))
            .and_then(|_| file.write_all(&[0]))
            .and_then(|_| file.flush());
        if let Err(source) = res {
            let err = BenchError::Write {
                path: self.config.path.clone(),
                source,
            };
            error!("{}", err);
            return Err(err);
        }
        drop(file);
        Ok(())
    }
    /// Creating -> Seeking. Reopens the file read-only.
    pub fn start_seeking(self) -> Result<SeekSession<V, C>, BenchError> {
        let file = self.open(OpenMode::READ)?;
        let cursor = OffsetCursor::new(
            self.config.start_offset,
            self.config.file_size,
            self.config.pattern,
        )?;
        Ok(SeekSession {
            file,
            clock: self.clock,
            cursor,
            scratch: vec![0; self.config.read_chunk_size],
            _volume: self.volume,
        })
    }
}

/// Initialize, create the file and open it for the timing loop.
pub fn setup<B, C>(
    board: &mut B,
    clock: C,
    config: BenchConfig,
) -> Result<SeekSession<B::Volume, C>, BenchError>
where
    B: Board,
    C: Clock,
{
    let bench = SeekBenchmark::initialize(board, clock, config)?;
    bench.create_file()?;
    bench.start_seeking()
}

/// Seeking 阶段, 没有退出状态
pub struct SeekSession<V: Volume, C: Clock> {
    file: V::File,
    clock: C,
    cursor: OffsetCursor,
    scratch: Vec<u8>,
    // file 先于 volume 释放
    _volume: V,
}

impl<V: Volume, C: Clock> SeekSession<V, C> {
    pub fn cursor(&self) -> &OffsetCursor {
        &self.cursor
    }
    /// Time one seek, read a chunk, log the sample and advance the cursor.
    /// Seek and read errors only shrink `bytes_read`.
    pub fn step(&mut self) -> TimingSample {
        let offset = self.cursor.offset();
        let ts_start = self.clock.now_micros();
        if let Err(e) = self.file.seek(SeekFrom::Start(offset)) {
            trace!("seek to {} failed: {}", offset, e);
        }
        let elapsed_us = self.clock.now_micros().saturating_sub(ts_start);
        let bytes_read = read_chunk(&mut self.file, &mut self.scratch);
        let sample = TimingSample {
            offset,
            elapsed_us,
            bytes_read,
        };
        info!("{}", sample);
        self.cursor.advance();
        sample
    }
    pub fn run_for(&mut self, iterations: usize) -> Vec<TimingSample> {
        (0..iterations).map(|_| self.step()).collect()
    }
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }
}

impl<V: Volume, C: Clock> fmt::Debug for SeekSession<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekSession")
            .field("cursor", &self.cursor)
            .field("chunk", &self.scratch.len())
            .finish()
    }
}
