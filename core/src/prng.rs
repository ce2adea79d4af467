use crate::types::Seed;

/// Mulberry32: deterministic 32-bit PRNG.
/// Pure function: returns (value_in_0_1, next_state).
///
/// Bit-identical to the browser implementation:
///   a = (a + 0x6d2b79f5) | 0;
///   t = Math.imul(a ^ (a >>> 15), a | 1);
///   t = (t + Math.imul(t ^ (t >>> 7), t | 61)) ^ t;
///   value = ((t ^ (t >>> 14)) >>> 0) / 4294967296;
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Stateful wrapper around [`prng_next`]. One per entity, never shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: Seed) -> Self {
        Mulberry32 { state: seed }
    }

    /// Uniform sample in [0, 1). Advances the state by one step.
    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = prng_next(self.state);
        self.state = next;
        value
    }

    /// Sample mapped to [-scale / 2, scale / 2).
    pub fn symmetric(&mut self, scale: f64) -> f64 {
        (self.next_f64() - 0.5) * scale
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}
