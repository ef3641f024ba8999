mod board;
mod clock;
pub mod config;
mod cursor;
mod error;
mod runner;
mod volume;

pub use board::{Board, HostBoard};
pub use clock::{Clock, MonotonicClock};
pub use config::{AccessPattern, BenchConfig, SdPins};
pub use cursor::OffsetCursor;
pub use error::{BenchError, VolumeError};
pub use runner::{read_chunk, setup, SeekBenchmark, SeekSession, TimingSample};
pub use volume::{HostFile, HostVolume, MountConfig, OpenMode, Volume};
