use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("at least one worker thread is required")]
    ZeroThreads,

    #[error("value range is inverted: min {min} > max {max}")]
    InvertedRange { min: u32, max: u32 },

    #[error("generator modulus must be non-zero")]
    ZeroModulus,

    #[error("failed to build sort thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("sort range [{left}, {right}] is out of bounds for buffer of length {len}")]
    RangeOutOfBounds { left: usize, right: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
