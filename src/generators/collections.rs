//! Structured-value combinators: fixed and variable-length containers,
//! tuples, and pairs.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::marker::PhantomData;

use tracing::debug;

use crate::context::GenContext;
use crate::error::{GenResult, GenerationError};
use crate::generator::{Generate, resolve};
use crate::generators::numeric::ranged;
use crate::shrink::{Shrinks, each_element, remove_chunks};

/// Insertion seam for container generation.
///
/// `insert_value` returns `false` when the container rejects the value (a
/// duplicate in a set or map); the fixed-length fill loop reacts by retrying
/// at a higher magnitude, the variable-length fill simply moves on.
pub trait BuildCollection<T>: Default {
    /// Attempt to insert one value.
    fn insert_value(&mut self, value: T) -> bool;
}

impl<T> BuildCollection<T> for Vec<T> {
    fn insert_value(&mut self, value: T) -> bool {
        self.push(value);
        true
    }
}

impl<T> BuildCollection<T> for VecDeque<T> {
    fn insert_value(&mut self, value: T) -> bool {
        self.push_back(value);
        true
    }
}

impl BuildCollection<char> for String {
    fn insert_value(&mut self, value: char) -> bool {
        self.push(value);
        true
    }
}

impl<T: Eq + std::hash::Hash> BuildCollection<T> for HashSet<T> {
    fn insert_value(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl<T: Ord> BuildCollection<T> for BTreeSet<T> {
    fn insert_value(&mut self, value: T) -> bool {
        self.insert(value)
    }
}

impl<K: Eq + std::hash::Hash, V> BuildCollection<(K, V)> for HashMap<K, V> {
    fn insert_value(&mut self, (key, value): (K, V)) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.insert(key, value);
        true
    }
}

impl<K: Ord, V> BuildCollection<(K, V)> for BTreeMap<K, V> {
    fn insert_value(&mut self, (key, value): (K, V)) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.insert(key, value);
        true
    }
}

// Fill exactly `len` slots, bumping the magnitude on each rejected insertion
// so the next attempt is more likely to differ.
fn fill_fixed<C, G>(len: usize, element: &G, ctx: &mut GenContext) -> GenResult<C>
where
    C: BuildCollection<G::Value>,
    G: Generate,
{
    let budget = ctx.limits().max_rejections;
    let mut collection = C::default();
    for _ in 0..len {
        let start = ctx.size();
        let mut size = start;
        loop {
            let value = ctx.with_size(size, |ctx| {
                ctx.with_no_shrink(|ctx| resolve(element, ctx))
            })?;
            if collection.insert_value(value) {
                break;
            }
            size += 1;
            if size - start > budget {
                let container = std::any::type_name::<C>();
                debug!(container, budget, "insertion retry budget exhausted");
                return Err(GenerationError::insertion_exhausted(container));
            }
        }
    }
    Ok(collection)
}

// Draw a length in [0, size], then fill with no insertion retry: a rejected
// insertion just leaves the container shorter.
fn fill_variable<C, G>(element: &G, ctx: &mut GenContext) -> GenResult<C>
where
    C: BuildCollection<G::Value>,
    G: Generate,
{
    let len = resolve(&ranged(0usize, ctx.size().saturating_add(1)), ctx)?;
    let mut collection = C::default();
    for _ in 0..len {
        let value = ctx.with_no_shrink(|ctx| resolve(element, ctx))?;
        let _ = collection.insert_value(value);
    }
    Ok(collection)
}

/// Fixed-length container generator. See [`vector_of`].
#[derive(Debug, Clone)]
pub struct VectorOf<C, G> {
    len: usize,
    element: G,
    _marker: PhantomData<fn() -> C>,
}

/// Generate a container with exactly `len` elements.
///
/// Elements are drawn shrink-suppressed; a rejected insertion is retried at
/// linearly increasing magnitude up to the context's rejection budget, then
/// fails with [`GenerationError::InsertionExhausted`] naming the container
/// type. Shrinking substitutes element candidates position by position; the
/// length never shrinks.
pub fn vector_of<C, G>(len: usize, element: G) -> VectorOf<C, G>
where
    C: BuildCollection<G::Value> + IntoIterator<Item = G::Value> + FromIterator<G::Value> + 'static,
    G: Generate + Clone + 'static,
    G::Value: Clone,
{
    VectorOf {
        len,
        element,
        _marker: PhantomData,
    }
}

impl<C, G> Generate for VectorOf<C, G>
where
    C: BuildCollection<G::Value> + IntoIterator<Item = G::Value> + FromIterator<G::Value> + 'static,
    G: Generate + Clone + 'static,
    G::Value: Clone,
{
    type Value = C;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<C> {
        fill_fixed(self.len, &self.element, ctx)
    }

    fn shrink(&self, value: C) -> Shrinks<C> {
        let element = self.element.clone();
        each_element(value, move |item| element.shrink(item.clone()))
    }
}

/// Fixed-length container generator without shrink support. See
/// [`vector_of_unshrinkable`].
#[derive(Debug, Clone)]
pub struct VectorOfUnshrinkable<C, G> {
    len: usize,
    element: G,
    _marker: PhantomData<fn() -> C>,
}

/// [`vector_of`] for element types that cannot be cloned: generation is
/// identical, shrinking is empty. The capability is chosen here, once, at
/// composition time.
pub fn vector_of_unshrinkable<C, G>(len: usize, element: G) -> VectorOfUnshrinkable<C, G>
where
    C: BuildCollection<G::Value> + 'static,
    G: Generate,
{
    VectorOfUnshrinkable {
        len,
        element,
        _marker: PhantomData,
    }
}

impl<C, G> Generate for VectorOfUnshrinkable<C, G>
where
    C: BuildCollection<G::Value> + 'static,
    G: Generate,
{
    type Value = C;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<C> {
        fill_fixed(self.len, &self.element, ctx)
    }
}

/// Variable-length container generator. See [`collection_of`].
#[derive(Debug, Clone)]
pub struct CollectionOf<C, G> {
    element: G,
    _marker: PhantomData<fn() -> C>,
}

/// Generate a container whose length is drawn uniformly from
/// `[0, ambient magnitude]`, then filled with no insertion retry.
///
/// Shrinking tries cheap moves first: chunks of elements removed (largest
/// spans first), then per-element candidates substituted one position at a
/// time.
pub fn collection_of<C, G>(element: G) -> CollectionOf<C, G>
where
    C: BuildCollection<G::Value>
        + IntoIterator<Item = G::Value>
        + FromIterator<G::Value>
        + Clone
        + 'static,
    G: Generate + Clone + 'static,
    G::Value: Clone,
{
    CollectionOf {
        element,
        _marker: PhantomData,
    }
}

impl<C, G> Generate for CollectionOf<C, G>
where
    C: BuildCollection<G::Value>
        + IntoIterator<Item = G::Value>
        + FromIterator<G::Value>
        + Clone
        + 'static,
    G: Generate + Clone + 'static,
    G::Value: Clone,
{
    type Value = C;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<C> {
        fill_variable(&self.element, ctx)
    }

    fn shrink(&self, value: C) -> Shrinks<C> {
        let element = self.element.clone();
        remove_chunks(value.clone())
            .sequentially(each_element(value, move |item| element.shrink(item.clone())))
    }
}

/// Variable-length container generator without shrink support. See
/// [`collection_of_unshrinkable`].
#[derive(Debug, Clone)]
pub struct CollectionOfUnshrinkable<C, G> {
    element: G,
    _marker: PhantomData<fn() -> C>,
}

/// [`collection_of`] for element types that cannot be cloned: generation is
/// identical, shrinking is empty.
pub fn collection_of_unshrinkable<C, G>(element: G) -> CollectionOfUnshrinkable<C, G>
where
    C: BuildCollection<G::Value> + 'static,
    G: Generate,
{
    CollectionOfUnshrinkable {
        element,
        _marker: PhantomData,
    }
}

impl<C, G> Generate for CollectionOfUnshrinkable<C, G>
where
    C: BuildCollection<G::Value> + 'static,
    G: Generate,
{
    type Value = C;

    fn generate(&self, ctx: &mut GenContext) -> GenResult<C> {
        fill_variable(&self.element, ctx)
    }
}

/// A pair generator: the arity-2 tuple. In Rust the two coincide, so this is
/// a thin constructor alias.
pub fn pair_of<G1, G2>(first: G1, second: G2) -> (G1, G2)
where
    G1: Generate,
    G2: Generate,
{
    (first, second)
}

// Tuples of generators generate tuples of values. Elements are resolved
// head first; shrinking proceeds position by position, each candidate
// substituted into an otherwise-unchanged copy, so no candidate ever changes
// two positions at once.
macro_rules! impl_tuple_generate {
    ($($G:ident . $idx:tt),+) => {
        impl<$($G,)+> Generate for ($($G,)+)
        where
            $($G: Generate + Clone + 'static,)+
            $($G::Value: Clone,)+
        {
            type Value = ($($G::Value,)+);

            fn generate(&self, ctx: &mut GenContext) -> GenResult<Self::Value> {
                Ok(($(resolve(&self.$idx, ctx)?,)+))
            }

            fn shrink(&self, value: Self::Value) -> Shrinks<Self::Value> {
                let mut sequence = Shrinks::none();
                $(
                    let component = self.$idx.clone();
                    let unshrunk = value.clone();
                    let lifted = component.shrink(value.$idx.clone()).map(move |candidate| {
                        let mut substituted = unshrunk.clone();
                        substituted.$idx = candidate;
                        substituted
                    });
                    sequence = sequence.sequentially(lifted);
                )+
                sequence
            }
        }
    };
}

impl_tuple_generate!(G0.0);
impl_tuple_generate!(G0.0, G1.1);
impl_tuple_generate!(G0.0, G1.1, G2.2);
impl_tuple_generate!(G0.0, G1.1, G2.2, G3.3);
impl_tuple_generate!(G0.0, G1.1, G2.2, G3.3, G4.4);
impl_tuple_generate!(G0.0, G1.1, G2.2, G3.3, G4.4, G5.5);
impl_tuple_generate!(G0.0, G1.1, G2.2, G3.3, G4.4, G5.5, G6.6);
impl_tuple_generate!(G0.0, G1.1, G2.2, G3.3, G4.4, G5.5, G6.6, G7.7);
