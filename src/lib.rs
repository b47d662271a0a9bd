//! Deterministic parallel LCG fills and fork/join quicksort over a shared
//! `u32` buffer.
//!
//! A parallel fill with any number of workers writes exactly the values the
//! serial recurrence would: each worker jumps ahead to its first index in
//! closed form and then strides through the buffer.

pub mod average;
pub mod buffer;
pub mod error;
pub mod fill;
pub mod jump_table;
pub mod lcg;
pub mod sort;
pub mod strided;

pub use average::{Averaging, FillReport};
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use fill::{fill_deterministic, fill_serial, Engine};
pub use jump_table::JumpTable;
pub use lcg::{GeneratorParams, Jump, Lcg, ValueRange};
pub use sort::{partition, sort, sort_all, sort_serial, Sorter};
