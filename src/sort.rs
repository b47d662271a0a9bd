use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// Ranges at or below this many elements are finished without forking.
pub const DEFAULT_SERIAL_CUTOFF: usize = 4096;

/// Hoare partition of `values` around its middle element.
///
/// Returns `m` such that every element of `values[..=m]` is `<=` every
/// element of `values[m + 1..]`. For `values.len() >= 2` both sides are
/// non-empty.
pub fn partition(values: &mut [u32]) -> usize {
    debug_assert!(values.len() >= 2);
    let pivot = values[(values.len() - 1) / 2];
    let mut i = 0;
    let mut j = values.len() - 1;
    loop {
        while values[i] < pivot {
            i += 1;
        }
        while values[j] > pivot {
            j -= 1;
        }
        if i >= j {
            return j;
        }
        values.swap(i, j);
        i += 1;
        j -= 1;
    }
}

// `right` has to be in bounds even when the range itself is empty.
fn check_range(len: usize, left: usize, right: usize) -> Result<bool> {
    if right >= len {
        return Err(Error::RangeOutOfBounds { left, right, len });
    }
    Ok(left < right)
}

// Recurses into the smaller side only, so depth stays logarithmic.
fn quicksort_serial(mut values: &mut [u32]) {
    while values.len() >= 2 {
        let m = partition(values);
        let (low, high) = std::mem::take(&mut values).split_at_mut(m + 1);
        if low.len() <= high.len() {
            quicksort_serial(low);
            values = high;
        } else {
            quicksort_serial(high);
            values = low;
        }
    }
}

fn quicksort_fork(values: &mut [u32], cutoff: usize) {
    if values.len() <= cutoff {
        quicksort_serial(values);
        return;
    }
    let m = partition(values);
    let (low, high) = values.split_at_mut(m + 1);
    rayon::join(
        || quicksort_fork(low, cutoff),
        || quicksort_fork(high, cutoff),
    );
}

/// Fork/join quicksort of `buffer[left..=right]` on rayon's global pool.
pub fn sort(buffer: &mut [u32], left: usize, right: usize) -> Result<()> {
    if check_range(buffer.len(), left, right)? {
        quicksort_fork(&mut buffer[left..=right], DEFAULT_SERIAL_CUTOFF);
    }
    Ok(())
}

pub fn sort_all(buffer: &mut [u32]) {
    quicksort_fork(buffer, DEFAULT_SERIAL_CUTOFF);
}

pub fn sort_serial(buffer: &mut [u32], left: usize, right: usize) -> Result<()> {
    if check_range(buffer.len(), left, right)? {
        quicksort_serial(&mut buffer[left..=right]);
    }
    Ok(())
}

pub struct Sorter {
    pool: ThreadPool,
    serial_cutoff: usize,
}

impl Sorter {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::ZeroThreads);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sort-{i}"))
            .build()?;
        Ok(Sorter {
            pool,
            serial_cutoff: DEFAULT_SERIAL_CUTOFF,
        })
    }

    pub fn with_serial_cutoff(mut self, cutoff: usize) -> Self {
        self.serial_cutoff = cutoff.max(1);
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Sort `buffer[left..=right]` ascending. `right` must be in bounds;
    /// otherwise nothing is swapped and `RangeOutOfBounds` is returned.
    pub fn sort(&self, buffer: &mut [u32], left: usize, right: usize) -> Result<()> {
        if !check_range(buffer.len(), left, right)? {
            return Ok(());
        }
        debug!(left, right, threads = self.threads(), "parallel sort");
        let cutoff = self.serial_cutoff;
        let range = &mut buffer[left..=right];
        self.pool.install(|| quicksort_fork(range, cutoff));
        Ok(())
    }

    pub fn sort_all(&self, buffer: &mut [u32]) {
        let cutoff = self.serial_cutoff;
        self.pool.install(|| quicksort_fork(buffer, cutoff));
    }
}
