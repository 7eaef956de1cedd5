//! Generator primitives and combinators.

pub mod collections;
pub mod combinators;
pub mod numeric;
pub mod primitive;

pub use collections::{
    BuildCollection, CollectionOf, CollectionOfUnshrinkable, VectorOf, VectorOfUnshrinkable,
    collection_of, collection_of_unshrinkable, pair_of, vector_of, vector_of_unshrinkable,
};
pub use combinators::{
    Mapped, NoShrink, OneOf, Rescue, Resize, Scale, SuchThat, map, no_shrink, one_of, rescue,
    resize, scale, such_that,
};
pub use numeric::{
    Arbitrary, ArbitraryBool, ArbitraryInt, Integer, Ranged, arbitrary, negative, non_negative,
    non_zero, positive, ranged,
};
pub use primitive::{CharValue, Character, Constant, FromFn, character, constant, from_fn};
