//! The generator contract and the value-resolution entry point.

use tracing::trace;

use crate::context::GenContext;
use crate::error::GenResult;
use crate::replay::Erased;
use crate::shrink::Shrinks;

/// A composable description of how to produce and how to shrink a randomized
/// value of a given type.
///
/// Generators are immutable value-semantic descriptors: composition moves
/// component generators into the composite, and no mutable state is retained
/// between invocations. Each `generate` call is independent apart from the
/// ambient [`GenContext`] and the position of its entropy stream.
///
/// A composite's `generate` must be expressed solely through its components'
/// resolution ([`resolve`]); a composite's `shrink`, when overridden, returns
/// only candidates of the composite's exact produced type, built by
/// substituting into a previously produced value, and never re-invokes
/// `generate`. `shrink` is only ever called with a value the generator itself
/// could have produced.
pub trait Generate {
    /// The type of values this generator produces.
    type Value: 'static;

    /// Produce a value, or fail with a generation error.
    fn generate(&self, ctx: &mut GenContext) -> GenResult<Self::Value>;

    /// Propose smaller candidates for a previously produced value.
    ///
    /// The default is the empty sequence: no local notion of "smaller".
    /// Combinators without one (predicate filters, choice, mapping) rely on
    /// the external replay engine for structural shrinking instead.
    fn shrink(&self, value: Self::Value) -> Shrinks<Self::Value> {
        let _ = value;
        Shrinks::none()
    }

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Erase the concrete type, for heterogeneous collections of
    /// alternatives sharing one produced type.
    fn boxed(self) -> BoxGen<Self::Value>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// A type-erased generator of `T`.
pub type BoxGen<T> = Box<dyn Generate<Value = T>>;

impl<T: 'static> Generate for BoxGen<T> {
    type Value = T;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<T> {
        (**self).generate(ctx)
    }

    fn shrink(&self, value: T) -> Shrinks<T> {
        (**self).shrink(value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Resolve a generator to a value in the given context.
///
/// This is the single choice point the external replay/minimizer engine
/// observes: when the context carries a replay handle, the handle intercepts
/// the call and may substitute a recorded or deliberately shrunk value
/// instead of invoking `generate`. Combinators draw every sub-value through
/// `resolve`, never through `generate` directly, except for transparent
/// wrappers (size pin, scale, shrink suppression, rescue) which are not
/// choice points of their own.
pub fn resolve<G: Generate>(generator: &G, ctx: &mut GenContext) -> GenResult<G::Value> {
    match ctx.replay_handle() {
        Some(handle) => {
            let erased = Erased::new(generator);
            let value = handle.intercept(&erased, ctx)?;
            value.downcast::<G::Value>().map(|boxed| *boxed).map_err(|_| {
                crate::error::GenerationError::ReplayMismatch {
                    expected: std::any::type_name::<G::Value>().to_string(),
                }
            })
        }
        None => generator.generate(ctx),
    }
}

/// Resolve one value from a fresh context at the given magnitude and seed.
///
/// Entry point for ad-hoc inspection outside a full trial run.
pub fn sample<G: Generate>(size: usize, seed: u64, generator: &G) -> GenResult<G::Value> {
    let mut ctx = GenContext::seeded(size, seed);
    resolve(generator, &mut ctx)
}

/// Like [`sample`], but also prints the value's `Debug` rendering to stdout.
pub fn sample_show<G>(size: usize, seed: u64, generator: &G) -> GenResult<G::Value>
where
    G: Generate,
    G::Value: std::fmt::Debug,
{
    let value = sample(size, seed, generator)?;
    trace!(generator = generator.name(), size, seed, "sampled value");
    println!("{value:?}");
    Ok(value)
}
