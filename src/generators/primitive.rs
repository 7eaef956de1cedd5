//! Basic building blocks: constants, closure adapters, and character draws.

use crate::context::GenContext;
use crate::error::GenResult;
use crate::generator::{Generate, resolve};
use crate::generators::combinators::{map, one_of};
use crate::generators::numeric::{Arbitrary, ranged};
use crate::shrink::Shrinks;

/// Always yields a clone of the same value. See [`constant`].
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

/// Generate the same value every time. No shrink: a constant is already
/// minimal.
pub fn constant<T: Clone + 'static>(value: T) -> Constant<T> {
    Constant { value }
}

impl<T: Clone + 'static> Generate for Constant<T> {
    type Value = T;

    fn generate(&self, _ctx: &mut GenContext) -> GenResult<T> {
        Ok(self.value.clone())
    }
}

/// Adapts a plain closure as a generator. See [`from_fn`].
#[derive(Debug, Clone)]
pub struct FromFn<F> {
    callable: F,
}

/// Invoke an arbitrary procedure directly as a generator.
///
/// The closure receives the context and may draw entropy or resolve other
/// generators. No shrink support; a failing closure reports
/// [`GenerationError::User`].
pub fn from_fn<T, F>(callable: F) -> FromFn<F>
where
    T: 'static,
    F: Fn(&mut GenContext) -> GenResult<T>,
{
    FromFn { callable }
}

impl<T, F> Generate for FromFn<F>
where
    T: 'static,
    F: Fn(&mut GenContext) -> GenResult<T>,
{
    type Value = T;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<T> {
        (self.callable)(ctx)
    }
}

/// Character-like value types a [`Character`] generator can produce.
pub trait CharValue: Copy + Eq + 'static {
    /// Lift an ASCII byte.
    fn from_byte(byte: u8) -> Self;
    /// Reduce a raw entropy word to a non-zero value of the full domain.
    fn from_raw_non_zero(raw: u64) -> Self;
}

impl CharValue for u8 {
    fn from_byte(byte: u8) -> Self {
        byte
    }

    fn from_raw_non_zero(raw: u64) -> Self {
        (raw % 255) as u8 + 1
    }
}

impl CharValue for char {
    fn from_byte(byte: u8) -> Self {
        byte as char
    }

    fn from_raw_non_zero(raw: u64) -> Self {
        // [1, 0xD7FF]: every scalar below the surrogate block, NUL excluded.
        char::from_u32(1 + (raw % 0xD7FF) as u32).unwrap_or('\u{1}')
    }
}

// Fixed shrink ladder, most preferred candidate first.
const CHAR_LADDER: [u8; 9] = [b'a', b'b', b'c', b'A', b'B', b'C', b'1', b'2', b'3'];

/// Character draw biased toward ASCII. See [`character`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Character<T> {
    _marker: std::marker::PhantomData<fn() -> T>,
}

/// Generate a character-like value: uniformly either an ASCII byte in
/// `1..=127` or a non-zero value of the full domain.
///
/// Shrinking follows the hand-picked ladder `a b c A B C 1 2 3`: a value
/// found on the ladder shrinks to the candidates before it, and any value
/// outside the recognized set gets the whole ladder.
pub fn character<T: CharValue>() -> Character<T> {
    Character {
        _marker: std::marker::PhantomData,
    }
}

impl<T: CharValue> Generate for Character<T> {
    type Value = T;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<T> {
        let ascii = map(ranged(1u8, 128), T::from_byte as fn(u8) -> T);
        let full = from_fn(|ctx: &mut GenContext| Ok(T::from_raw_non_zero(ctx.next_u64())));
        resolve(&one_of(vec![ascii.boxed(), full.boxed()]), ctx)
    }

    fn shrink(&self, value: T) -> Shrinks<T> {
        let cutoff = CHAR_LADDER
            .iter()
            .position(|&byte| T::from_byte(byte) == value)
            .unwrap_or(CHAR_LADDER.len());
        Shrinks::constant(
            CHAR_LADDER[..cutoff]
                .iter()
                .map(|&byte| T::from_byte(byte))
                .collect(),
        )
    }
}

impl Arbitrary for char {
    type Gen = Character<char>;

    fn arbitrary() -> Self::Gen {
        character()
    }
}
