use crate::lcg::{Lcg, ValueRange};

/// Caller-owned, contiguous storage the fill engine and sorter work on.
///
/// Growth is append-only: generated values are pushed onto the end of the
/// same vector, so every element keeps a plain index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    values: Vec<u32>,
}

impl Buffer {
    pub fn new(len: usize) -> Self {
        Buffer {
            values: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.values
    }

    pub fn zero(&mut self) {
        self.values.fill(0);
    }

    /// Append `count` values drawn from `lcg`, continuing its sequence.
    pub fn extend_generated(&mut self, lcg: &mut Lcg, range: &ValueRange, count: usize) {
        self.values.reserve(count);
        self.values.extend((0..count).map(|_| lcg.next_in(range)));
    }
}

impl From<Vec<u32>> for Buffer {
    fn from(values: Vec<u32>) -> Self {
        Buffer { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::fill_serial;
    use crate::lcg::GeneratorParams;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = Buffer::new(5);
        assert_eq!(buffer.as_slice(), &[0; 5]);
    }

    #[test]
    fn test_zero_resets_contents() {
        let mut buffer = Buffer::from(vec![4, 5, 6]);
        buffer.zero();
        assert_eq!(buffer.len(), 3);
        assert!(buffer.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_appending_matches_one_fill() {
        let params = GeneratorParams::default();
        let range = ValueRange::new(0, 1000).unwrap();

        let mut grown = Buffer::default();
        let mut lcg = Lcg::new(params, 228);
        grown.extend_generated(&mut lcg, &range, 4);
        grown.extend_generated(&mut lcg, &range, 6);

        let mut filled = Buffer::new(10);
        fill_serial(&params, 228, filled.as_mut_slice(), 0, 1000).unwrap();

        assert_eq!(grown, filled);
    }
}
