use seekbench::{
    read_chunk, setup, AccessPattern, BenchConfig, Clock, HostBoard, HostVolume, OffsetCursor,
    OpenMode, SeekSession, Volume,
};
use std::cell::Cell;
use std::io::{Seek, SeekFrom};

/// 每次读取前进固定微秒数
struct StepClock {
    now: Cell<u64>,
    step: u64,
}

impl StepClock {
    fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now_micros(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

const SIZE: u64 = 200 * 1024 * 1024;
const CHUNK: usize = 4096;

fn session(
    root: &std::path::Path,
    config: BenchConfig,
) -> SeekSession<HostVolume, StepClock> {
    let mut board = HostBoard::new(root);
    setup(&mut board, StepClock::new(7), config).unwrap()
}

fn read_at(volume: &HostVolume, offset: u64) -> usize {
    let mut file = volume.open("/sd/test.dat", OpenMode::READ).unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    let mut buf = [0u8; CHUNK];
    read_chunk(&mut file, &mut buf)
}

#[test]
fn mid_file_read_is_full_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), BenchConfig::with_file("/sd/test.dat", SIZE));
    let sample = session.step();
    assert_eq!(sample.offset, SIZE / 2 + 150);
    assert_eq!(sample.bytes_read, 4096);
    assert_eq!(sample.elapsed_us, 7);
}

#[test]
fn read_near_eof_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = BenchConfig::with_file("/sd/test.dat", SIZE);
    config.start_offset = SIZE - 10;
    let mut session = session(dir.path(), config);
    let samples = session.run_for(3);
    assert_eq!(samples[0].offset, SIZE - 10);
    assert_eq!(samples[0].bytes_read, 10);
    assert_eq!(samples[1].bytes_read, 9);
    assert_eq!(samples[2].bytes_read, 8);
}

#[test]
fn bytes_read_is_min_of_chunk_and_remaining() {
    let dir = tempfile::tempdir().unwrap();
    let size: u64 = 3 * 4096 + 123;
    let mut board = HostBoard::new(dir.path());
    let bench = seekbench::SeekBenchmark::initialize(
        &mut board,
        StepClock::new(1),
        BenchConfig::with_file("/sd/test.dat", size),
    )
    .unwrap();
    bench.create_file().unwrap();
    for offset in [0, 1, 4095, 4096, size - 4097, size - 4096, size - 4095, size - 1] {
        let expected = (CHUNK as u64).min(size - offset) as usize;
        assert_eq!(read_at(bench.volume(), offset), expected, "offset {}", offset);
    }
}

#[test]
fn cursor_wraps_after_last_byte() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = BenchConfig::with_file("/sd/test.dat", 8192);
    config.start_offset = 8190;
    let mut session = session(dir.path(), config);
    let offsets: Vec<u64> = session.run_for(4).iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![8190, 8191, 0, 1]);
    assert_eq!(session.cursor().offset(), 2);
}

#[test]
fn sequential_cursor_after_n_steps() {
    let size = 1000;
    for (start, n) in [(0u64, 0u64), (0, 1), (999, 1), (500, 1234), (17, 10_000)] {
        let mut cursor = OffsetCursor::new(start, size, AccessPattern::Sequential).unwrap();
        for _ in 0..n {
            cursor.advance();
        }
        assert_eq!(cursor.offset(), (start + n) % size);
    }
}

#[test]
fn start_offset_wrapped_into_range() {
    let cursor = OffsetCursor::new(1005, 1000, AccessPattern::Sequential).unwrap();
    assert_eq!(cursor.offset(), 5);
    assert_eq!(cursor.size(), 1000);
}

#[test]
fn empty_cursor_rejected() {
    for pattern in [AccessPattern::Sequential, AccessPattern::Random { seed: Some(1) }] {
        assert!(matches!(
            OffsetCursor::new(0, 0, pattern),
            Err(seekbench::BenchError::InvalidFileSize(0))
        ));
    }
}

#[test]
fn random_cursor_stays_in_range() {
    let size = 37;
    let mut cursor = OffsetCursor::new(0, size, AccessPattern::Random { seed: None }).unwrap();
    for _ in 0..10_000 {
        assert!(cursor.advance() < size);
    }
}

#[test]
fn random_cursor_is_reproducible_with_seed() {
    let pattern = AccessPattern::Random { seed: Some(42) };
    let mut a = OffsetCursor::new(0, SIZE, pattern).unwrap();
    let mut b = OffsetCursor::new(0, SIZE, pattern).unwrap();
    let a: Vec<u64> = (0..64).map(|_| a.advance()).collect();
    let b: Vec<u64> = (0..64).map(|_| b.advance()).collect();
    assert_eq!(a, b);
}

#[test]
fn random_session_reads_in_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let size: u64 = 64 * 1024;
    let mut config = BenchConfig::with_file("/sd/test.dat", size);
    config.pattern = AccessPattern::Random { seed: Some(7) };
    let mut session = session(dir.path(), config);
    for sample in session.run_for(200) {
        assert!(sample.offset < size);
        assert_eq!(
            sample.bytes_read as u64,
            (CHUNK as u64).min(size - sample.offset)
        );
    }
}

#[test]
fn sample_log_line_format() {
    let sample = seekbench::TimingSample {
        offset: 104_857_750,
        elapsed_us: 1143,
        bytes_read: 4096,
    };
    assert_eq!(
        sample.to_string(),
        "fseek( 104857750) dt:   1143 us, read 4096"
    );
}
