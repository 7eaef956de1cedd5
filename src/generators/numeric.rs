//! Numeric primitives: ranged draws, the canonical integer generators, and
//! sign-constrained conveniences.

use std::marker::PhantomData;

use crate::context::{GenContext, NOMINAL_SIZE};
use crate::error::{GenResult, GenerationError};
use crate::generator::Generate;
use crate::generators::combinators::such_that;
use crate::shrink::Shrinks;

/// Integer types a [`Ranged`] generator can draw.
///
/// Widening to `i128` keeps the modulo reduction exact for every supported
/// width, including the full `u64`/`i64` ranges.
pub trait Integer: Copy + PartialOrd + std::fmt::Debug + 'static {
    /// Widen losslessly.
    fn widen(self) -> i128;
    /// Narrow a value known to be in range.
    fn narrow(wide: i128) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Integer for $t {
                fn widen(self) -> i128 {
                    self as i128
                }

                fn narrow(wide: i128) -> Self {
                    wide as $t
                }
            }
        )+
    };
}

impl_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Uniform draw over the half-open range `[min, max)`.
///
/// See [`ranged`].
#[derive(Debug, Clone, Copy)]
pub struct Ranged<T> {
    min: T,
    max: T,
}

/// Generate integers uniformly in `[min, max)`.
///
/// Fails with [`GenerationError::InvalidRange`] when `max < min`, before any
/// entropy is drawn. When `max == min` the degenerate value `max` is returned
/// immediately, consuming no entropy. Otherwise one raw word is drawn and
/// reduced modulo the width of the range: the draw is independent of the
/// ambient magnitude. No local shrink: minimizing a ranged draw is replay
/// territory.
pub fn ranged<T: Integer>(min: T, max: T) -> Ranged<T> {
    Ranged { min, max }
}

impl<T: Integer> Generate for Ranged<T> {
    type Value = T;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<T> {
        if self.max < self.min {
            return Err(GenerationError::invalid_range(self.min, self.max));
        }
        if !(self.min < self.max) {
            return Ok(self.max);
        }
        let width = (self.max.widen() - self.min.widen()) as u128;
        let offset = u128::from(ctx.next_u64()) % width;
        Ok(T::narrow(self.min.widen() + offset as i128))
    }
}

/// The canonical generator for a type, resolved statically by produced type.
///
/// This is the registry seam consumed by [`arbitrary`]; this crate supplies
/// implementations for the primitive scalars only. Downstream crates
/// implement it for their own types.
pub trait Arbitrary: Sized + 'static {
    /// The canonical generator type.
    type Gen: Generate<Value = Self>;

    /// Build the canonical generator.
    fn arbitrary() -> Self::Gen;
}

/// The canonical generator for `T`.
pub fn arbitrary<T: Arbitrary>() -> T::Gen {
    T::arbitrary()
}

/// Canonical integer generator: a draw whose width scales with the ambient
/// magnitude, shrinking by halving toward zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbitraryInt<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArbitraryInt<T> {
    /// Create the generator.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

// Bits available at the given magnitude: the full type width at nominal size,
// proportionally fewer below it.
fn bit_budget(size: usize, bits: usize) -> usize {
    (bits * size.min(NOMINAL_SIZE)) / NOMINAL_SIZE
}

fn masked_draw(ctx: &mut GenContext, bits: usize) -> u64 {
    let budget = bit_budget(ctx.size(), bits);
    let raw = ctx.next_u64();
    if budget == 0 {
        0
    } else if budget >= 64 {
        raw
    } else {
        raw & ((1u64 << budget) - 1)
    }
}

macro_rules! impl_arbitrary_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Generate for ArbitraryInt<$t> {
                type Value = $t;

                fn generate(&self, ctx: &mut GenContext) -> GenResult<$t> {
                    Ok(masked_draw(ctx, <$t>::BITS as usize) as $t)
                }

                fn shrink(&self, value: $t) -> Shrinks<$t> {
                    if value == 0 {
                        return Shrinks::none();
                    }
                    let mut candidates: Vec<$t> = vec![0];
                    let mut delta = value / 2;
                    while delta != 0 {
                        candidates.push(value - delta);
                        delta /= 2;
                    }
                    Shrinks::constant(candidates)
                }
            }

            impl Arbitrary for $t {
                type Gen = ArbitraryInt<$t>;

                fn arbitrary() -> Self::Gen {
                    ArbitraryInt::new()
                }
            }
        )+
    };
}

macro_rules! impl_arbitrary_signed {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Generate for ArbitraryInt<$t> {
                type Value = $t;

                fn generate(&self, ctx: &mut GenContext) -> GenResult<$t> {
                    // Truncating cast: at full budget the masked word covers
                    // the whole signed range, negatives included.
                    Ok(masked_draw(ctx, <$t>::BITS as usize) as $t)
                }

                fn shrink(&self, value: $t) -> Shrinks<$t> {
                    if value == 0 {
                        return Shrinks::none();
                    }
                    let mut candidates: Vec<$t> = vec![0];
                    if value < 0 && value != <$t>::MIN {
                        candidates.push(-value);
                    }
                    let mut delta = value / 2;
                    while delta != 0 {
                        let closer = value - delta;
                        if closer != 0 {
                            candidates.push(closer);
                        }
                        delta /= 2;
                    }
                    Shrinks::constant(candidates)
                }
            }

            impl Arbitrary for $t {
                type Gen = ArbitraryInt<$t>;

                fn arbitrary() -> Self::Gen {
                    ArbitraryInt::new()
                }
            }
        )+
    };
}

impl_arbitrary_unsigned!(u8, u16, u32, u64, usize);
impl_arbitrary_signed!(i8, i16, i32, i64, isize);

/// Canonical `bool` generator: one entropy bit, `true` shrinks to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbitraryBool;

impl Generate for ArbitraryBool {
    type Value = bool;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<bool> {
        Ok(ctx.next_u64() & 1 == 1)
    }

    fn shrink(&self, value: bool) -> Shrinks<bool> {
        if value {
            Shrinks::constant(vec![false])
        } else {
            Shrinks::none()
        }
    }
}

impl Arbitrary for bool {
    type Gen = ArbitraryBool;

    fn arbitrary() -> Self::Gen {
        ArbitraryBool
    }
}

/// Arbitrary value excluding zero (the type's default).
pub fn non_zero<T>() -> impl Generate<Value = T>
where
    T: Arbitrary + PartialEq + Default,
{
    such_that(arbitrary::<T>(), |x| *x != T::default())
}

/// Arbitrary value strictly greater than zero.
pub fn positive<T>() -> impl Generate<Value = T>
where
    T: Arbitrary + PartialOrd + Default,
{
    such_that(arbitrary::<T>(), |x| *x > T::default())
}

/// Arbitrary value strictly less than zero. Only satisfiable for signed
/// types; for unsigned types the draw gives up after the rejection budget.
pub fn negative<T>() -> impl Generate<Value = T>
where
    T: Arbitrary + PartialOrd + Default,
{
    such_that(arbitrary::<T>(), |x| *x < T::default())
}

/// Arbitrary value greater than or equal to zero.
pub fn non_negative<T>() -> impl Generate<Value = T>
where
    T: Arbitrary + PartialOrd + Default,
{
    such_that(arbitrary::<T>(), |x| *x >= T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;
    use crate::generator::sample;

    /// Entropy source that fails the test on any draw.
    struct NoEntropy;

    impl crate::context::EntropySource for NoEntropy {
        fn next_u64(&mut self) -> u64 {
            panic!("entropy drawn where none was expected");
        }
    }

    #[test]
    fn ranged_stays_in_bounds() {
        for seed in 0..200 {
            let value = sample(NOMINAL_SIZE, seed, &ranged(-5i32, 17)).unwrap();
            assert!((-5..17).contains(&value), "{value} out of [-5, 17)");
        }
    }

    #[test]
    fn ranged_rejects_inverted_bounds() {
        let err = sample(NOMINAL_SIZE, 0, &ranged(3u8, 1)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRange { .. }));
    }

    #[test]
    fn degenerate_range_consumes_no_entropy() {
        let mut ctx = GenContext::new(NOMINAL_SIZE, Box::new(NoEntropy));
        assert_eq!(ranged(5i32, 5).generate(&mut ctx).unwrap(), 5);
    }

    #[test]
    fn inverted_range_fails_before_drawing() {
        let mut ctx = GenContext::new(NOMINAL_SIZE, Box::new(NoEntropy));
        assert!(ranged(9u64, 2).generate(&mut ctx).is_err());
    }

    #[test]
    fn ranged_draw_is_independent_of_the_ambient_magnitude() {
        for seed in 0..20 {
            let small = sample(1, seed, &ranged(0u32, 1000)).unwrap();
            let nominal = sample(NOMINAL_SIZE, seed, &ranged(0u32, 1000)).unwrap();
            assert_eq!(small, nominal);
        }
    }

    #[test]
    fn ranged_covers_full_u64_width() {
        let mut ctx = GenContext::seeded(NOMINAL_SIZE, 11);
        for _ in 0..100 {
            let value = ranged(0u64, u64::MAX).generate(&mut ctx).unwrap();
            assert!(value < u64::MAX);
        }
    }

    #[test]
    fn arbitrary_is_small_at_small_sizes() {
        for seed in 0..100 {
            let value = sample(0, seed, &arbitrary::<u32>()).unwrap();
            assert_eq!(value, 0);
            let value = sample(25, seed, &arbitrary::<u32>()).unwrap();
            assert!(value < (1 << 8));
        }
    }

    #[test]
    fn unsigned_shrink_walks_toward_zero() {
        let candidates: Vec<u32> = arbitrary::<u32>().shrink(8).collect();
        assert_eq!(candidates, vec![0, 4, 6, 7]);
        assert_eq!(arbitrary::<u32>().shrink(0).count(), 0);
    }

    #[test]
    fn signed_shrink_offers_absolute_value_first() {
        let candidates: Vec<i32> = arbitrary::<i32>().shrink(-8).collect();
        assert_eq!(candidates, vec![0, 8, -4, -6, -7]);
    }

    #[test]
    fn shrink_is_deterministic() {
        let first: Vec<u16> = arbitrary::<u16>().shrink(100).collect();
        let second: Vec<u16> = arbitrary::<u16>().shrink(100).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn bool_shrinks_true_to_false() {
        let candidates: Vec<bool> = arbitrary::<bool>().shrink(true).collect();
        assert_eq!(candidates, vec![false]);
        assert_eq!(arbitrary::<bool>().shrink(false).count(), 0);
    }

    #[test]
    fn sign_constrained_draws_satisfy_their_predicate() {
        for seed in 0..50 {
            assert!(sample(NOMINAL_SIZE, seed, &positive::<i32>()).unwrap() > 0);
            assert!(sample(NOMINAL_SIZE, seed, &negative::<i32>()).unwrap() < 0);
            assert!(sample(NOMINAL_SIZE, seed, &non_zero::<i64>()).unwrap() != 0);
            assert!(sample(NOMINAL_SIZE, seed, &non_negative::<i16>()).unwrap() >= 0);
        }
    }
}
