//! Seeded random stream backing the dice engine.
//!
//! # Determinism
//!
//! Given the same seed, the stream produces the same sequence of values on
//! every platform and in every process. The stream position (`cursor`) is
//! the number of 32-bit draws taken so far, and a stream can be rebuilt at
//! any position from `(seed, cursor)` without replaying the draws.

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state with a fixed stream increment.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same output
/// - **Small state**: 64 bits plus the draw counter
/// - **Seekable**: jump-ahead in O(log n) via LCG exponentiation
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    cursor: u64,
}

impl Pcg32 {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream positioned before its first draw.
    pub fn new(seed: u64) -> Self {
        let mut state = Self::pcg_step(0);
        state = state.wrapping_add(seed);
        state = Self::pcg_step(state);
        Self { state, cursor: 0 }
    }

    /// Rebuilds the stream of `seed` positioned after `cursor` draws.
    pub fn at_cursor(seed: u64, cursor: u64) -> Self {
        let mut rng = Self::new(seed);
        rng.state = Self::advance_state(rng.state, cursor);
        rng.cursor = cursor;
        rng
    }

    /// Number of 32-bit values drawn so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Draws the next 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        self.cursor += 1;
        Self::pcg_output(old)
    }

    /// Draws a value uniformly from `0..bound`.
    ///
    /// Uses rejection sampling so small bounds carry no modulo bias. The
    /// number of draws consumed depends only on the stream, so the result is
    /// still a pure function of `(seed, cursor)`.
    pub fn below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.next_u32();
            if value >= threshold {
                return value % bound;
            }
        }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Applies `delta` LCG steps at once (Brown, "Random Number Generation
    /// with Arbitrary Strides").
    fn advance_state(state: u64, mut delta: u64) -> u64 {
        let mut cur_mult = Self::MULTIPLIER;
        let mut cur_plus = Self::INCREMENT;
        let mut acc_mult: u64 = 1;
        let mut acc_plus: u64 = 0;

        while delta > 0 {
            if delta & 1 == 1 {
                acc_mult = acc_mult.wrapping_mul(cur_mult);
                acc_plus = acc_plus.wrapping_mul(cur_mult).wrapping_add(cur_plus);
            }
            cur_plus = cur_mult.wrapping_add(1).wrapping_mul(cur_plus);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
            delta >>= 1;
        }

        acc_mult.wrapping_mul(state).wrapping_add(acc_plus)
    }
}
