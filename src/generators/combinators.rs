//! Structural combinators: predicate filters, size pins and scales, shrink
//! suppression, mapping, rescue, and uniform choice.

use tracing::trace;

use crate::context::{GenContext, NOMINAL_SIZE};
use crate::error::{GenResult, GenerationError, GenerationErrorKind};
use crate::generator::{BoxGen, Generate, resolve};
use crate::generators::numeric::ranged;
use crate::shrink::Shrinks;

/// Predicate-filtered draw. See [`such_that`].
#[derive(Debug, Clone)]
pub struct SuchThat<G, P> {
    generator: G,
    predicate: P,
}

/// Draw from `generator` until `predicate` holds.
///
/// Each rejection bumps the magnitude by one, widening the search space;
/// inner draws are shrink-suppressed. Past the context's rejection budget
/// the draw fails with [`GenerationError::GaveUp`]. No local shrink: the
/// replay engine is the only way a filtered draw gets smaller.
pub fn such_that<G, P>(generator: G, predicate: P) -> SuchThat<G, P>
where
    G: Generate,
    P: Fn(&G::Value) -> bool,
{
    SuchThat {
        generator,
        predicate,
    }
}

impl<G, P> Generate for SuchThat<G, P>
where
    G: Generate,
    P: Fn(&G::Value) -> bool,
{
    type Value = G::Value;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<G::Value> {
        let start = ctx.size();
        let budget = ctx.limits().max_rejections;
        let mut size = start;
        loop {
            let value = ctx.with_size(size, |ctx| {
                ctx.with_no_shrink(|ctx| resolve(&self.generator, ctx))
            })?;
            if (self.predicate)(&value) {
                return Ok(value);
            }
            size += 1;
            if size - start > budget {
                trace!(start_size = start, budget, "predicate draw gave up");
                return Err(GenerationError::gave_up(
                    "value satisfying predicate",
                    budget + 1,
                ));
            }
        }
    }
}

/// Magnitude pin. See [`resize`].
#[derive(Debug, Clone)]
pub struct Resize<G> {
    size: usize,
    generator: G,
}

/// Pin the magnitude to `size` for the wrapped generator.
///
/// Affects only how the value is produced; shrinking is delegated verbatim.
pub fn resize<G: Generate>(size: usize, generator: G) -> Resize<G> {
    Resize { size, generator }
}

impl<G: Generate> Generate for Resize<G> {
    type Value = G::Value;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<G::Value> {
        ctx.with_size(self.size, |ctx| self.generator.generate(ctx))
    }

    fn shrink(&self, value: G::Value) -> Shrinks<G::Value> {
        self.generator.shrink(value)
    }
}

/// Magnitude scale. See [`scale`].
#[derive(Debug, Clone)]
pub struct Scale<G> {
    factor: f64,
    generator: G,
}

/// Multiply the current magnitude by `factor` for the wrapped generator.
/// Nested scales compound. Shrinking is delegated verbatim.
pub fn scale<G: Generate>(factor: f64, generator: G) -> Scale<G> {
    Scale { factor, generator }
}

impl<G: Generate> Generate for Scale<G> {
    type Value = G::Value;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<G::Value> {
        ctx.with_scale(self.factor, |ctx| self.generator.generate(ctx))
    }

    fn shrink(&self, value: G::Value) -> Shrinks<G::Value> {
        self.generator.shrink(value)
    }
}

/// Shrink suppression. See [`no_shrink`].
#[derive(Debug, Clone)]
pub struct NoShrink<G> {
    generator: G,
}

/// Set the shrink-suppression flag for the wrapped call, so the replay
/// engine does not explore smaller outcomes for choices made underneath.
/// Local shrinking is still delegated verbatim.
pub fn no_shrink<G: Generate>(generator: G) -> NoShrink<G> {
    NoShrink { generator }
}

impl<G: Generate> Generate for NoShrink<G> {
    type Value = G::Value;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<G::Value> {
        ctx.with_no_shrink(|ctx| self.generator.generate(ctx))
    }

    fn shrink(&self, value: G::Value) -> Shrinks<G::Value> {
        self.generator.shrink(value)
    }
}

/// Value mapping. See [`map`].
#[derive(Debug, Clone)]
pub struct Mapped<G, F> {
    generator: G,
    mapper: F,
}

/// Transform each generated value through `mapper`.
///
/// No shrink override at this layer: a mapped composite only shrinks through
/// the replay engine.
pub fn map<G, F, U>(generator: G, mapper: F) -> Mapped<G, F>
where
    G: Generate,
    F: Fn(G::Value) -> U,
    U: 'static,
{
    Mapped { generator, mapper }
}

impl<G, F, U> Generate for Mapped<G, F>
where
    G: Generate,
    F: Fn(G::Value) -> U,
    U: 'static,
{
    type Value = U;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<U> {
        Ok((self.mapper)(resolve(&self.generator, ctx)?))
    }
}

/// Failure rescue. See [`rescue`].
#[derive(Debug, Clone)]
pub struct Rescue<G, H> {
    generator: G,
    kind: GenerationErrorKind,
    handler: H,
}

/// Absorb generation failures of the declared kind, substituting the
/// handler's result; any other failure propagates.
pub fn rescue<G, H>(generator: G, kind: GenerationErrorKind, handler: H) -> Rescue<G, H>
where
    G: Generate,
    H: Fn(&GenerationError) -> G::Value,
{
    Rescue {
        generator,
        kind,
        handler,
    }
}

impl<G, H> Generate for Rescue<G, H>
where
    G: Generate,
    H: Fn(&GenerationError) -> G::Value,
{
    type Value = G::Value;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<G::Value> {
        match self.generator.generate(ctx) {
            Err(err) if err.kind() == self.kind => Ok((self.handler)(&err)),
            other => other,
        }
    }
}

/// Uniform choice among alternatives. See [`one_of`].
pub struct OneOf<T> {
    alternatives: Vec<BoxGen<T>>,
}

/// Select uniformly among alternative generators sharing one produced type
/// (enforced at composition time by the boxed element type).
///
/// The branch index is drawn through the ranged primitive at nominal
/// magnitude and is not exposed to local shrinking; the replay engine may
/// retry a different branch or a smaller value within the same branch. A
/// replayed index past the end falls through to the last branch.
pub fn one_of<T: 'static>(alternatives: Vec<BoxGen<T>>) -> OneOf<T> {
    OneOf { alternatives }
}

impl<T: 'static> Generate for OneOf<T> {
    type Value = T;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<T> {
        if self.alternatives.is_empty() {
            return Err(GenerationError::EmptyChoice);
        }
        let drawn = ctx.with_size(NOMINAL_SIZE, |ctx| {
            resolve(&ranged(0usize, self.alternatives.len()), ctx)
        })?;
        // The index may come back substituted by the replay engine; an
        // out-of-range value dispatches to the last branch.
        let index = drawn.min(self.alternatives.len() - 1);
        resolve(&self.alternatives[index], ctx)
    }
}

impl<T> std::fmt::Debug for OneOf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneOf")
            .field("alternatives", &self.alternatives.len())
            .finish()
    }
}

/// Box each alternative and build a [`one_of`] choice over them.
#[macro_export]
macro_rules! one_of {
    ($($alternative:expr),+ $(,)?) => {
        $crate::generators::one_of(vec![
            $($crate::generator::Generate::boxed($alternative)),+
        ])
    };
}
