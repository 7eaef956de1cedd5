//! Generation failure taxonomy.
//!
//! Every way a generator can fail to produce a value is a [`GenerationError`].
//! The bounded retry loops (`such_that`, fixed-length container fill) absorb
//! rejections up to the configured limit; past that the error propagates
//! synchronously out of `generate` with no partial result.

/// Result alias used throughout the crate.
pub type GenResult<T> = Result<T, GenerationError>;

/// Errors raised while generating a value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    /// A ranged draw was constructed with `max < min`.
    #[error("invalid range {range}")]
    InvalidRange {
        /// The offending range, rendered as `[min, max)`.
        range: String,
    },

    /// A retry loop exceeded its rejection budget.
    #[error("gave up after {attempts} attempts: {reason}")]
    GaveUp {
        /// What was being attempted.
        reason: String,
        /// How many attempts were made before giving up.
        attempts: usize,
    },

    /// A fixed-length container rejected insertions past the retry budget.
    #[error("gave up trying to generate value that can be added to container of type '{container}'")]
    InsertionExhausted {
        /// Name of the target container type.
        container: String,
    },

    /// A choice combinator was composed with no alternatives.
    #[error("one_of requires at least one alternative")]
    EmptyChoice,

    /// A user-supplied callable failed.
    #[error("generator callable failed: {0}")]
    User(String),

    /// The replay engine returned a value of the wrong type.
    #[error("replay substituted a value of unexpected type for {expected}")]
    ReplayMismatch {
        /// Name of the expected value type.
        expected: String,
    },
}

/// Discriminant of a [`GenerationError`], used by the rescue combinator to
/// decide whether a failure should be substituted instead of propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    /// See [`GenerationError::InvalidRange`].
    InvalidRange,
    /// See [`GenerationError::GaveUp`].
    GaveUp,
    /// See [`GenerationError::InsertionExhausted`].
    InsertionExhausted,
    /// See [`GenerationError::EmptyChoice`].
    EmptyChoice,
    /// See [`GenerationError::User`].
    User,
    /// See [`GenerationError::ReplayMismatch`].
    ReplayMismatch,
}

impl GenerationError {
    /// Build an invalid-range error from the formatted endpoints.
    pub fn invalid_range(min: impl std::fmt::Debug, max: impl std::fmt::Debug) -> Self {
        GenerationError::InvalidRange {
            range: format!("[{min:?}, {max:?})"),
        }
    }

    /// Build a gave-up error.
    pub fn gave_up(reason: impl Into<String>, attempts: usize) -> Self {
        GenerationError::GaveUp {
            reason: reason.into(),
            attempts,
        }
    }

    /// Build an insertion-exhausted error naming the container type.
    pub fn insertion_exhausted(container: impl Into<String>) -> Self {
        GenerationError::InsertionExhausted {
            container: container.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::InvalidRange { .. } => GenerationErrorKind::InvalidRange,
            GenerationError::GaveUp { .. } => GenerationErrorKind::GaveUp,
            GenerationError::InsertionExhausted { .. } => GenerationErrorKind::InsertionExhausted,
            GenerationError::EmptyChoice => GenerationErrorKind::EmptyChoice,
            GenerationError::User(_) => GenerationErrorKind::User,
            GenerationError::ReplayMismatch { .. } => GenerationErrorKind::ReplayMismatch,
        }
    }
}
