use std::thread;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::jump_table::JumpTable;
use crate::lcg::{GeneratorParams, Lcg, ValueRange};
use crate::strided;

/// Fill `buffer` by running the recurrence on one thread.
///
/// This is the reference sequence every parallel fill has to reproduce:
/// slot `i` holds the state `i + 1` steps past `seed`, folded into
/// `[min, max]`.
pub fn fill_serial(
    params: &GeneratorParams,
    seed: u32,
    buffer: &mut [u32],
    min: u32,
    max: u32,
) -> Result<()> {
    let range = ValueRange::new(min, max)?;
    let mut lcg = Lcg::new(*params, seed);
    for slot in buffer.iter_mut() {
        *slot = lcg.next_in(&range);
    }
    Ok(())
}

/// Fill `buffer` with `threads` workers, producing exactly what
/// [`fill_serial`] would.
pub fn fill_deterministic(
    params: &GeneratorParams,
    seed: u32,
    buffer: &mut [u32],
    min: u32,
    max: u32,
    threads: usize,
) -> Result<()> {
    Engine::new(*params, threads)?.fill(seed, buffer, min, max)
}

#[derive(Debug, Clone)]
pub struct Engine {
    params: GeneratorParams,
    threads: usize,
}

impl Engine {
    pub fn new(params: GeneratorParams, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::ZeroThreads);
        }
        Ok(Engine { params, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn fill(&self, seed: u32, buffer: &mut [u32], min: u32, max: u32) -> Result<()> {
        let range = ValueRange::new(min, max)?;
        if buffer.is_empty() {
            return Ok(());
        }

        let num_threads = self.threads;
        let rows = buffer.len() / num_threads;
        let covered = rows * num_threads;
        debug!(
            len = buffer.len(),
            threads = num_threads,
            remainder = buffer.len() - covered,
            "parallel fill"
        );

        let (strided_part, remainder) = buffer.split_at_mut(covered);

        // Fewer slots than workers: nobody owns a full stride, so the whole
        // buffer is the serial tail and the table stays bounded by the length.
        // Otherwise worker `t` returns the state it last wrote, i.e. the
        // serial state `covered - num_threads + t + 1` steps past the seed.
        let final_states: Vec<u64> = if rows == 0 {
            Vec::new()
        } else {
            let table = JumpTable::build(&self.params, num_threads);
            thread::scope(|s| {
                let handles: Vec<_> = strided::columns(strided_part, num_threads)
                    .into_iter()
                    .enumerate()
                    .map(|(thread_id, mut column)| {
                        let table = &table;
                        s.spawn(move || {
                            let modulus = table.modulus();
                            let stride = table.stride();
                            let mut state =
                                table.advance(thread_id + 1).apply(seed as u64, modulus);
                            let mut last = state;
                            column.for_each_mut(|slot| {
                                *slot = range.fold(state);
                                last = state;
                                state = stride.apply(state, modulus);
                            });
                            trace!(thread_id, slots = column.len(), "worker done");
                            last
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|e| std::panic::resume_unwind(e))
                    })
                    .collect()
            })
        };

        let mut state = final_states.last().copied().unwrap_or(seed as u64);
        for slot in remainder.iter_mut() {
            state = self.params.next_state(state);
            *slot = range.fold(state);
        }
        Ok(())
    }
}
