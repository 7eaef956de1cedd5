//! Prelude module for convenient imports.
//!
//! Re-exports the items most code needs to define and resolve generators.
//!
//! # Example
//!
//! ```rust,ignore
//! use gencheck::prelude::*;
//! ```

pub use crate::context::{GenContext, Limits, NOMINAL_SIZE, SeededEntropy};
pub use crate::error::{GenResult, GenerationError, GenerationErrorKind};
pub use crate::generator::{BoxGen, Generate, resolve, sample, sample_show};
pub use crate::generators::{
    arbitrary, character, collection_of, constant, from_fn, map, no_shrink, non_negative,
    non_zero, negative, one_of, pair_of, positive, ranged, rescue, resize, scale, such_that,
    vector_of,
};
pub use crate::shrink::{Shrinks, each_element, remove_chunks};
