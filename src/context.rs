//! Generation context: the ambient configuration threaded through every
//! generator call.
//!
//! The context replaces dynamically-scoped globals with an explicit object
//! passed `&mut` down the combinator graph. Overrides (size pin, scale,
//! shrink suppression) are block-scoped through closures: the prior value is
//! restored unconditionally after the closure returns, including when it
//! returns `Err`, so sibling and parent generators always observe an
//! unchanged context. One context is created per trial; parallel trials each
//! own an independent context and entropy stream, so nothing here needs to be
//! `Send`.

use std::rc::Rc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::replay::Replay;

/// Default generation magnitude, and the fixed magnitude used for internal
/// draws (range reduction, choice indices).
pub const NOMINAL_SIZE: usize = 100;

/// Default rejection budget for the bounded retry loops.
pub const DEFAULT_MAX_REJECTIONS: usize = 100;

/// A seeded, deterministic, reproducible stream of unsigned integers.
///
/// Generators consume entropy exclusively through this trait so tests can
/// substitute instrumented streams (counting draws, or failing the test when
/// a draw was expected to be skipped).
pub trait EntropySource {
    /// Produce the next 64 bits of the stream.
    fn next_u64(&mut self) -> u64;
}

/// The default entropy source: a ChaCha8 stream seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededEntropy {
    /// Create a stream from the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl EntropySource for SeededEntropy {
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Bounded-bailout configuration for the retry loops.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Consecutive rejections tolerated before a retry loop gives up.
    pub max_rejections: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }
}

/// Ambient state for one generation trial.
pub struct GenContext {
    size: usize,
    no_shrink: bool,
    limits: Limits,
    entropy: Box<dyn EntropySource>,
    replay: Option<Rc<dyn Replay>>,
}

impl GenContext {
    /// Create a context at the given magnitude over an explicit entropy
    /// source.
    pub fn new(size: usize, entropy: Box<dyn EntropySource>) -> Self {
        Self {
            size,
            no_shrink: false,
            limits: Limits::default(),
            entropy,
            replay: None,
        }
    }

    /// Create a context at the given magnitude with a ChaCha8 stream seeded
    /// from `seed`.
    pub fn seeded(size: usize, seed: u64) -> Self {
        Self::new(size, Box::new(SeededEntropy::new(seed)))
    }

    /// Override the retry limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Current generation magnitude.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether local shrinking is currently suppressed.
    pub fn shrink_suppressed(&self) -> bool {
        self.no_shrink
    }

    /// The retry limits in effect.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Draw the next 64 bits of entropy.
    pub fn next_u64(&mut self) -> u64 {
        self.entropy.next_u64()
    }

    /// Install a replay handle for the duration of this context. The handle
    /// intercepts every [`resolve`](crate::generator::resolve) call.
    pub fn set_replay(&mut self, handle: Rc<dyn Replay>) {
        self.replay = Some(handle);
    }

    /// Remove the replay handle, returning to direct generation.
    pub fn clear_replay(&mut self) {
        self.replay = None;
    }

    pub(crate) fn replay_handle(&self) -> Option<Rc<dyn Replay>> {
        self.replay.clone()
    }

    /// Run `f` with the magnitude pinned to `size`, restoring the previous
    /// magnitude afterwards on every exit path.
    pub fn with_size<R>(&mut self, size: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.size;
        self.size = size;
        let result = f(self);
        self.size = previous;
        result
    }

    /// Run `f` with the magnitude multiplied by `factor`. Nested scales
    /// compound multiplicatively.
    pub fn with_scale<R>(&mut self, factor: f64, f: impl FnOnce(&mut Self) -> R) -> R {
        let scaled = (self.size as f64 * factor) as usize;
        self.with_size(scaled, f)
    }

    /// Run `f` with shrink suppression enabled, restoring the previous flag
    /// afterwards.
    pub fn with_no_shrink<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.no_shrink;
        self.no_shrink = true;
        let result = f(self);
        self.no_shrink = previous;
        result
    }
}

impl std::fmt::Debug for GenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenContext")
            .field("size", &self.size)
            .field("no_shrink", &self.no_shrink)
            .field("limits", &self.limits)
            .field("replaying", &self.replay.is_some())
            .finish()
    }
}
