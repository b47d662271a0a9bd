use crate::lcg::{GeneratorParams, Jump};

/// Per-fill table of the affine maps that advance a state by `0..=threads`
/// steps.
///
/// Built once before the workers start and only read afterwards. Entry `k`
/// is accumulated from entry `k - 1` (`mul * A`, `add * A + B`), so the
/// additive offsets never need `(A - 1)` to be invertible modulo `M`.
#[derive(Debug, Clone)]
pub struct JumpTable {
    entries: Vec<Jump>,
    modulus: u64,
}

impl JumpTable {
    /// `threads` must not exceed the buffer length; a fill with fewer slots
    /// than workers never builds a table.
    pub fn build(params: &GeneratorParams, threads: usize) -> Self {
        let step = params.step();
        let mut entries = Vec::with_capacity(threads + 1);
        entries.push(Jump::IDENTITY);
        for k in 1..=threads {
            let next = entries[k - 1].then(&step, params.modulus());
            entries.push(next);
        }
        JumpTable {
            entries,
            modulus: params.modulus(),
        }
    }

    pub fn advance(&self, k: usize) -> &Jump {
        &self.entries[k]
    }

    // map from one owned index of a worker to its next
    pub fn stride(&self) -> &Jump {
        &self.entries[self.entries.len() - 1]
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}
