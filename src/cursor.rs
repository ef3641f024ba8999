use crate::config::AccessPattern;
use crate::error::BenchError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

enum Step {
    Sequential,
    Random(StdRng),
}

/// 基准测试的读取位置, 始终在 [0, size) 内
pub struct OffsetCursor {
    offset: u64,
    size: u64,
    step: Step,
}

impl OffsetCursor {
    /// `start` is wrapped into range. An empty file has no valid offset.
    pub fn new(start: u64, size: u64, pattern: AccessPattern) -> Result<Self, BenchError> {
        if size == 0 {
            return Err(BenchError::InvalidFileSize(size));
        }
        let step = match pattern {
            AccessPattern::Sequential => Step::Sequential,
            AccessPattern::Random { seed: Some(seed) } => Step::Random(StdRng::seed_from_u64(seed)),
            AccessPattern::Random { seed: None } => Step::Random(StdRng::from_entropy()),
        };
        Ok(Self {
            offset: start % size,
            size,
            step,
        })
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn size(&self) -> u64 {
        self.size
    }
    /// Move to the next offset and return it.
    pub fn advance(&mut self) -> u64 {
        self.offset = match &mut self.step {
            Step::Sequential => (self.offset + 1) % self.size,
            Step::Random(rng) => rng.gen_range(0..self.size),
        };
        self.offset
    }
}

impl core::fmt::Debug for OffsetCursor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let pattern = match self.step {
            Step::Sequential => "sequential",
            Step::Random(_) => "random",
        };
        f.debug_struct("OffsetCursor")
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("pattern", &pattern)
            .finish()
    }
}
