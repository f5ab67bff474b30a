//! Injected randomness for the engine.
//!
//! Every die roll and random pick the engine makes goes through a
//! [`RandomSource`]. The host owns a seedable [`GameRng`]; tests and replays
//! use [`ScriptedRng`] to feed literal outcomes.
//!
//! ## Usage
//!
//! ```
//! use primeval::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//! let die = rng.roll_d6();
//! assert!((1..=6).contains(&die));
//!
//! // Same seed, same sequence.
//! let mut again = GameRng::new(42);
//! assert_eq!(again.roll_d6(), die);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of every random outcome the engine consumes.
///
/// Implementors only provide [`next_below`](RandomSource::next_below); dice,
/// picks and coin flips are derived from it so that a scripted source can
/// drive any resolution step exactly.
pub trait RandomSource {
    /// Uniform integer in `0..bound`. `bound` is always at least 1.
    fn next_below(&mut self, bound: u32) -> u32;

    /// Roll a six-sided die (1-6).
    fn roll_d6(&mut self) -> u8 {
        (self.next_below(6) + 1) as u8
    }

    /// Pick an index into a collection of `len` items.
    ///
    /// Returns `None` for an empty collection.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        Some(self.next_below(bound) as usize)
    }

    /// True with probability `percent`/100.
    fn percent(&mut self, percent: u32) -> bool {
        self.next_below(100) < percent
    }
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let bound = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let j = rng.next_below(bound) as usize;
        items.swap(i, j);
    }
}

/// Choose an element from a slice.
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    rng.pick_index(items.len()).and_then(|i| items.get(i))
}

/// Deterministic, seedable RNG owned by the host.
///
/// Uses ChaCha8 for speed while keeping a stable stream across platforms.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG into an independent, deterministic stream.
    ///
    /// Used for setup steps (board generation) that should not shift the
    /// stream consumed by play.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl RandomSource for GameRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.inner.gen_range(0..bound.max(1))
    }
}

/// Serializable RNG state for checkpointing the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// A random source that replays queued outcomes in order.
///
/// Values are stored raw and reduced modulo the requested bound, so a
/// scripted die of 3 is stored as 2 (`next_below(6) + 1`). Use the builder
/// helpers rather than pushing raw values. Once the queue runs dry every
/// draw returns 0: the lowest die face, the first index, and a successful
/// percent check.
///
/// ```
/// use primeval::core::{RandomSource, ScriptedRng};
///
/// let mut rng = ScriptedRng::new().die(3).die(5).pick(2).chance(false);
/// assert_eq!(rng.roll_d6(), 3);
/// assert_eq!(rng.roll_d6(), 5);
/// assert_eq!(rng.pick_index(4), Some(2));
/// assert!(!rng.percent(50));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    queue: VecDeque<u32>,
}

impl ScriptedRng {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a die face (1-6).
    #[must_use]
    pub fn die(mut self, face: u8) -> Self {
        self.queue.push_back(u32::from(face.clamp(1, 6)) - 1);
        self
    }

    /// Queue several die faces.
    #[must_use]
    pub fn dice(self, faces: &[u8]) -> Self {
        faces.iter().fold(self, |rng, &face| rng.die(face))
    }

    /// Queue an index pick.
    #[must_use]
    pub fn pick(mut self, index: usize) -> Self {
        self.queue
            .push_back(u32::try_from(index).unwrap_or(u32::MAX));
        self
    }

    /// Queue the outcome of a percent check.
    #[must_use]
    pub fn chance(mut self, hit: bool) -> Self {
        self.queue.push_back(if hit { 0 } else { 99 });
        self
    }

    /// Queue a raw value for `next_below`.
    #[must_use]
    pub fn raw(mut self, value: u32) -> Self {
        self.queue.push_back(value);
        self
    }

    /// Number of queued outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.queue.pop_front().unwrap_or(0) % bound.max(1)
    }
}
