use crate::error::{Error, Result};

pub const DEFAULT_MULTIPLIER: u64 = 134_775_813;
pub const DEFAULT_INCREMENT: u64 = 1;
/// 2^32 - 1
pub const DEFAULT_MODULUS: u64 = 4_294_967_295;

/// Constants of the recurrence `seed' = (A * seed + B) mod M`.
///
/// Values are fixed once constructed; every fill and jump takes them by
/// reference so nothing can change them while workers are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorParams {
    multiplier: u64,
    increment: u64,
    modulus: u64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            multiplier: DEFAULT_MULTIPLIER,
            increment: DEFAULT_INCREMENT,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl GeneratorParams {
    pub fn new(multiplier: u64, increment: u64, modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(Error::ZeroModulus);
        }
        Ok(GeneratorParams {
            multiplier: multiplier % modulus,
            increment: increment % modulus,
            modulus,
        })
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn step(&self) -> Jump {
        Jump {
            mul: self.multiplier,
            add: self.increment,
        }
    }

    /// Affine map equivalent to `k` applications of the recurrence,
    /// computed by repeated squaring so it never divides by `A - 1`.
    pub fn jump(&self, mut k: u64) -> Jump {
        let mut result = Jump::IDENTITY;
        let mut base = self.step();
        while k > 0 {
            if k & 1 == 1 {
                result = result.then(&base, self.modulus);
            }
            base = base.then(&base, self.modulus);
            k >>= 1;
        }
        result
    }

    #[inline]
    pub fn next_state(&self, state: u64) -> u64 {
        self.step().apply(state, self.modulus)
    }
}

/// The affine map `x -> (mul * x + add) mod M`.
///
/// Composing two of these is again affine, which is what lets a worker
/// land on an arbitrary position of the serial sequence in closed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
    pub mul: u64,
    pub add: u64,
}

impl Jump {
    pub const IDENTITY: Jump = Jump { mul: 1, add: 0 };

    #[inline]
    pub fn apply(&self, state: u64, modulus: u64) -> u64 {
        let wide = self.mul as u128 * state as u128 + self.add as u128;
        (wide % modulus as u128) as u64
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Jump, modulus: u64) -> Jump {
        let m = modulus as u128;
        let mul = (next.mul as u128 * self.mul as u128) % m;
        let add = (next.mul as u128 * self.add as u128 + next.add as u128) % m;
        Jump {
            mul: mul as u64,
            add: add as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    min: u32,
    max: u32,
}

impl ValueRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if max < min {
            return Err(Error::InvertedRange { min, max });
        }
        Ok(ValueRange { min, max })
    }

    #[inline]
    pub fn fold(&self, state: u64) -> u32 {
        let span = (self.max - self.min) as u64 + 1;
        (state % span) as u32 + self.min
    }
}

#[derive(Debug, Clone)]
pub struct Lcg {
    params: GeneratorParams,
    state: u64,
}

impl Lcg {
    pub fn new(params: GeneratorParams, seed: u32) -> Self {
        Lcg {
            params,
            state: seed as u64,
        }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_state(&mut self) -> u64 {
        self.state = self.params.next_state(self.state);
        self.state
    }

    pub fn next_in(&mut self, range: &ValueRange) -> u32 {
        range.fold(self.next_state())
    }

    pub fn skip(&mut self, k: u64) {
        self.state = self.params.jump(k).apply(self.state, self.params.modulus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GeneratorParams::default();
        assert_eq!(params.multiplier(), 134_775_813);
        assert_eq!(params.increment(), 1);
        assert_eq!(params.modulus(), u32::MAX as u64);
    }

    #[test]
    fn test_zero_modulus_rejected() {
        assert!(matches!(
            GeneratorParams::new(5, 1, 0),
            Err(Error::ZeroModulus)
        ));
    }

    #[test]
    fn test_first_state_is_one_step_past_seed() {
        let params = GeneratorParams::default();
        let mut lcg = Lcg::new(params, 228);
        let expected = (134_775_813u64 * 228 + 1) % 4_294_967_295;
        assert_eq!(lcg.next_state(), expected);
    }

    #[test]
    fn test_jump_matches_iteration() {
        let params = GeneratorParams::new(134_775_813, 12_345, 1 << 31).unwrap();
        let mut lcg = Lcg::new(params, 77);
        for k in 0..200u64 {
            assert_eq!(params.jump(k).apply(77, params.modulus()), lcg.state());
            lcg.next_state();
        }
    }

    #[test]
    fn test_skip_matches_iteration() {
        let params = GeneratorParams::default();
        let mut stepped = Lcg::new(params, 9);
        for _ in 0..1_000 {
            stepped.next_state();
        }
        let mut skipped = Lcg::new(params, 9);
        skipped.skip(1_000);
        assert_eq!(stepped.state(), skipped.state());
    }

    #[test]
    fn test_jump_without_invertible_multiplier_step() {
        // A - 1 = 4 shares a factor with M = 8, so division-based offsets
        // would be wrong here.
        let params = GeneratorParams::new(5, 3, 8).unwrap();
        let mut lcg = Lcg::new(params, 1);
        for _ in 0..13 {
            lcg.next_state();
        }
        assert_eq!(params.jump(13).apply(1, 8), lcg.state());
    }

    #[test]
    fn test_large_modulus_does_not_overflow() {
        let params = GeneratorParams::new(u64::MAX - 1, u64::MAX - 2, u64::MAX).unwrap();
        let mut lcg = Lcg::new(params, u32::MAX);
        for _ in 0..64 {
            assert!(lcg.next_state() < u64::MAX);
        }
    }

    #[test]
    fn test_value_range_fold() {
        let range = ValueRange::new(10, 12).unwrap();
        assert_eq!(range.fold(0), 10);
        assert_eq!(range.fold(1), 11);
        assert_eq!(range.fold(2), 12);
        assert_eq!(range.fold(3), 10);

        let full = ValueRange::new(0, u32::MAX).unwrap();
        assert_eq!(full.fold(u32::MAX as u64), u32::MAX);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            ValueRange::new(5, 4),
            Err(Error::InvertedRange { min: 5, max: 4 })
        ));
    }
}
