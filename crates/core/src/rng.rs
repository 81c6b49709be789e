//! RNG module - 7-bag shape randomizer
//!
//! Implements the "7-bag" randomization algorithm: a bag holds one of each
//! catalog shape in shuffled order, draws pop from it, and an empty bag is
//! refilled and reshuffled on the next draw. No shape can be drawn twice
//! before all seven have been drawn once since the last refill.
//!
//! Also provides a simple LCG so a seed fully determines the piece sequence.

use arrayvec::ArrayVec;

use crate::types::ShapeId;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Bag lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagState {
    Filled,
    Empty,
}

/// 7-bag shape generator
#[derive(Debug, Clone)]
pub struct Bag {
    /// Shapes not yet drawn from the current bag; draws pop from the end
    remaining: ArrayVec<ShapeId, 7>,
    rng: SimpleRng,
}

impl Bag {
    /// Create an empty bag; the first draw fills it
    pub fn new(seed: u32) -> Self {
        Self {
            remaining: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn state(&self) -> BagState {
        if self.remaining.is_empty() {
            BagState::Empty
        } else {
            BagState::Filled
        }
    }

    fn refill(&mut self) {
        self.remaining.clear();
        self.remaining.extend(ShapeId::ALL);
        self.rng.shuffle(&mut self.remaining);
    }

    /// Draw the next shape, refilling first if the bag is empty
    pub fn next(&mut self) -> ShapeId {
        if self.remaining.is_empty() {
            self.refill();
        }
        match self.remaining.pop() {
            Some(id) => id,
            // refill always leaves seven shapes behind
            None => ShapeId::T,
        }
    }

    /// Shapes still in the current bag (draw order is back to front)
    pub fn remaining(&self) -> &[ShapeId] {
        &self.remaining
    }

    /// Current RNG state (used to seed a restarted session)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(1)
    }
}
