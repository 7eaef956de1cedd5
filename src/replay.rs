//! Interception seam for the external replay/minimizer engine.
//!
//! Structural shrinking re-runs generation with altered earlier random
//! choices. The engine drives that search from outside this crate: it
//! installs a [`Replay`] handle on the context, after which every
//! [`resolve`](crate::generator::resolve) call is routed through
//! [`Replay::intercept`] with a type-erased view of the generator. The handle
//! may re-invoke the generator, substitute a recorded outcome, or consult the
//! generator's local shrink sequence for a previously produced value.

use std::any::Any;

use crate::context::GenContext;
use crate::error::GenResult;
use crate::generator::Generate;
use crate::shrink::Shrinks;

/// A type-erased view of a generator, as seen by the replay engine.
pub trait ErasedGenerate {
    /// Invoke the underlying generator, boxing the produced value.
    fn generate_any(&self, ctx: &mut GenContext) -> GenResult<Box<dyn Any>>;

    /// Consult the underlying generator's local shrink sequence.
    ///
    /// Returns the empty sequence if `value` is not of the generator's
    /// produced type.
    fn shrink_any(&self, value: Box<dyn Any>) -> Shrinks<Box<dyn Any>>;

    /// Name of the produced value type.
    fn value_type(&self) -> &'static str;

    /// Name of the generator itself.
    fn name(&self) -> &'static str;
}

/// Adapter erasing a concrete generator behind [`ErasedGenerate`].
pub struct Erased<'a, G> {
    inner: &'a G,
}

impl<'a, G: Generate> Erased<'a, G> {
    /// Wrap a borrowed generator.
    pub fn new(inner: &'a G) -> Self {
        Self { inner }
    }
}

impl<G: Generate> ErasedGenerate for Erased<'_, G> {
    fn generate_any(&self, ctx: &mut GenContext) -> GenResult<Box<dyn Any>> {
        self.inner
            .generate(ctx)
            .map(|value| Box::new(value) as Box<dyn Any>)
    }

    fn shrink_any(&self, value: Box<dyn Any>) -> Shrinks<Box<dyn Any>> {
        match value.downcast::<G::Value>() {
            Ok(value) => self
                .inner
                .shrink(*value)
                .map(|candidate| Box::new(candidate) as Box<dyn Any>),
            Err(_) => Shrinks::none(),
        }
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<G::Value>()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Handle owned by the external replay engine, referenced (not owned) by the
/// context for the duration of a shrink search.
///
/// `intercept` takes `&self` because interception is re-entrant: re-invoking
/// the generator resolves its own sub-generators, each of which is
/// intercepted in turn. Implementations keep their search state in cells
/// scoped so no borrow is held across a nested [`ErasedGenerate::generate_any`]
/// call.
pub trait Replay {
    /// Intercept one value resolution.
    ///
    /// The returned box must hold a value of the generator's produced type;
    /// the caller downcasts and fails with a replay-mismatch error otherwise.
    fn intercept(
        &self,
        generator: &dyn ErasedGenerate,
        ctx: &mut GenContext,
    ) -> GenResult<Box<dyn Any>>;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::context::GenContext;
    use crate::error::GenerationError;
    use crate::generator::resolve;
    use crate::generators::{constant, one_of, ranged};

    /// Replays a fixed value for every interception.
    struct FixedReplay {
        value: i32,
        intercepted: Cell<usize>,
    }

    impl Replay for FixedReplay {
        fn intercept(
            &self,
            _generator: &dyn ErasedGenerate,
            _ctx: &mut GenContext,
        ) -> GenResult<Box<dyn Any>> {
            self.intercepted.set(self.intercepted.get() + 1);
            Ok(Box::new(self.value))
        }
    }

    #[test]
    fn replay_handle_intercepts_resolution() {
        let handle = Rc::new(FixedReplay {
            value: -3,
            intercepted: Cell::new(0),
        });
        let mut ctx = GenContext::seeded(10, 0);
        ctx.set_replay(handle.clone());

        let value = resolve(&ranged(0i32, 100), &mut ctx).unwrap();
        assert_eq!(value, -3);
        assert_eq!(handle.intercepted.get(), 1);

        ctx.clear_replay();
        let direct = resolve(&ranged(5i32, 5), &mut ctx).unwrap();
        assert_eq!(direct, 5);
        assert_eq!(handle.intercepted.get(), 1);
    }

    #[test]
    fn replay_type_mismatch_is_an_error() {
        struct WrongType;
        impl Replay for WrongType {
            fn intercept(
                &self,
                _generator: &dyn ErasedGenerate,
                _ctx: &mut GenContext,
            ) -> GenResult<Box<dyn Any>> {
                Ok(Box::new("not an i32"))
            }
        }

        let mut ctx = GenContext::seeded(10, 0);
        ctx.set_replay(Rc::new(WrongType));
        let err = resolve(&constant(1i32), &mut ctx).unwrap_err();
        assert!(matches!(err, GenerationError::ReplayMismatch { .. }));
    }

    /// Re-invokes every generator, counting interceptions.
    struct PassThrough {
        intercepted: Cell<usize>,
    }

    impl Replay for PassThrough {
        fn intercept(
            &self,
            generator: &dyn ErasedGenerate,
            ctx: &mut GenContext,
        ) -> GenResult<Box<dyn Any>> {
            self.intercepted.set(self.intercepted.get() + 1);
            generator.generate_any(ctx)
        }
    }

    #[test]
    fn erased_view_generates_and_shrinks() {
        let handle = Rc::new(PassThrough {
            intercepted: Cell::new(0),
        });
        let mut ctx = GenContext::seeded(10, 3);
        ctx.set_replay(handle.clone());
        let value = resolve(&ranged(1u8, 4), &mut ctx).unwrap();
        assert!((1..4).contains(&value));
        assert_eq!(handle.intercepted.get(), 1);
    }

    #[test]
    fn interception_is_reentrant_through_composites() {
        let handle = Rc::new(PassThrough {
            intercepted: Cell::new(0),
        });
        let mut ctx = GenContext::seeded(10, 7);
        ctx.set_replay(handle.clone());

        // The choice itself, its index draw, and the chosen branch are each
        // distinct choice points.
        let choice = one_of(vec![constant(1u8).boxed(), constant(2u8).boxed()]);
        let value = resolve(&choice, &mut ctx).unwrap();
        assert!((1..=2).contains(&value));
        assert_eq!(handle.intercepted.get(), 3);
    }
}
