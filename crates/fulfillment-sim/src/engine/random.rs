use std::collections::VecDeque;

/// Injectable source of randomness for order generation.
///
/// Implementors only provide [`below`](RandomSource::below); the other draws are derived from it
/// so a scripted source reproduces a spawn exactly.
pub trait RandomSource: Send {
    /// A value in `0..bound`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32;

    /// A value in `low..=high`.
    fn between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.below(high - low + 1)
    }

    /// An index into a slice of length `len`.
    fn index(&mut self, len: usize) -> usize {
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        self.below(bound) as usize
    }

    /// True on a draw of 0 out of 2.
    fn coin(&mut self) -> bool {
        self.below(2) == 0
    }
}

/// Production source backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRandom(fastrand::Rng);

impl FastRandom {
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    /// Deterministic sequence for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for FastRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandom {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.u32(..bound)
    }
}

/// Replays a fixed list of raw draws, each reduced modulo the requested bound. Once the script
/// runs out every draw is 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, bound: u32) -> u32 {
        let raw = self.script.pop_front().unwrap_or(0);
        if bound == 0 {
            0
        } else {
            raw % bound
        }
    }
}
