//! # gencheck
//!
//! `gencheck` is the generator/shrink combinator core of a property-based
//! testing engine, organized around:
//! - [`generator::Generate`]: the produce-and-shrink contract
//! - [`context::GenContext`]: ambient configuration threaded through every call
//! - [`shrink::Shrinks`]: lazy sequences of smaller counterexample candidates
//! - [`generators`]: primitives and combinators for composing generators
//! - [`replay`]: the interception seam for structural (replay-based) shrinking
//!
//! Trial driving, failure reporting, and seed persistence belong to the
//! engine built on top of this crate, not here.

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod generator;
pub mod generators;
pub mod prelude;
pub mod replay;
pub mod shrink;

pub use context::GenContext;
pub use error::{GenResult, GenerationError, GenerationErrorKind};
pub use generator::{BoxGen, Generate, resolve, sample, sample_show};
pub use shrink::Shrinks;
