use std::thread;

use tracing::debug;

use crate::error::Result;
use crate::fill::Engine;

#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    pub per_thread: Vec<u128>,
    /// `None` for an empty buffer.
    pub average: Option<f64>,
}

/// Wraps an [`Engine`] and reports the average of what it generated.
///
/// The engine itself stays free of any accumulation; the reduction runs
/// after the fill, one slot per worker, summed once every worker joined.
pub struct Averaging<'e> {
    engine: &'e Engine,
}

impl<'e> Averaging<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Averaging { engine }
    }

    pub fn fill(&self, seed: u32, buffer: &mut [u32], min: u32, max: u32) -> Result<FillReport> {
        self.engine.fill(seed, buffer, min, max)?;

        let num_threads = self.engine.threads();
        let data: &[u32] = buffer;
        let per_thread: Vec<u128> = thread::scope(|s| {
            let handles: Vec<_> = (0..num_threads)
                .map(|thread_id| {
                    s.spawn(move || {
                        data.iter()
                            .skip(thread_id)
                            .step_by(num_threads)
                            .map(|&v| v as u128)
                            .sum::<u128>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let total: u128 = per_thread.iter().sum();
        let average = if data.is_empty() {
            None
        } else {
            Some(total as f64 / data.len() as f64)
        };
        debug!(?average, "fill average");
        Ok(FillReport { per_thread, average })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcg::GeneratorParams;

    #[test]
    fn test_average_matches_direct_mean() {
        let engine = Engine::new(GeneratorParams::default(), 4).unwrap();
        let mut buffer = vec![0u32; 1_001];
        let report = Averaging::new(&engine).fill(228, &mut buffer, 0, 1000).unwrap();

        let direct = buffer.iter().map(|&v| v as f64).sum::<f64>() / buffer.len() as f64;
        let average = report.average.unwrap();
        assert!((average - direct).abs() < 1e-9);
        assert_eq!(report.per_thread.len(), 4);
    }

    #[test]
    fn test_per_thread_sums_follow_strides() {
        let engine = Engine::new(GeneratorParams::default(), 3).unwrap();
        let mut buffer = vec![0u32; 100];
        let report = Averaging::new(&engine).fill(7, &mut buffer, 0, u32::MAX).unwrap();

        for (t, &sum) in report.per_thread.iter().enumerate() {
            let direct: u128 = (t..buffer.len()).step_by(3).map(|i| buffer[i] as u128).sum();
            assert_eq!(sum, direct, "thread {t}");
        }
    }

    #[test]
    fn test_constant_range_average() {
        let engine = Engine::new(GeneratorParams::default(), 3).unwrap();
        let mut buffer = vec![0u32; 50];
        let report = Averaging::new(&engine).fill(1, &mut buffer, 9, 9).unwrap();
        assert_eq!(report.average, Some(9.0));
    }

    #[test]
    fn test_empty_buffer_has_no_average() {
        let engine = Engine::new(GeneratorParams::default(), 2).unwrap();
        let mut buffer: Vec<u32> = Vec::new();
        let report = Averaging::new(&engine).fill(1, &mut buffer, 0, 9).unwrap();
        assert_eq!(report.average, None);
        assert_eq!(report.per_thread, vec![0, 0]);
    }
}
