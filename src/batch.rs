//! Counted batch insertion.
//!
//! Callers that read "how many keys follow" before the keys themselves validate that count
//! through [`BatchCount`] and hand both to
//! [`QuaternaryTree::insert_counted`](crate::QuaternaryTree::insert_counted).

use std::fmt;

/// A validated, strictly positive number of keys in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchCount(usize);

impl BatchCount {
    pub fn new(n: i64) -> Result<Self, BatchError> {
        if n <= 0 {
            return Err(BatchError::NonPositiveCount(n));
        }
        usize::try_from(n)
            .map(Self)
            .map_err(|_| BatchError::CountTooLarge(n))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for BatchCount {
    type Error = BatchError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// The announced count was zero or negative.
    NonPositiveCount(i64),
    /// The announced count does not fit in `usize` on this platform.
    CountTooLarge(i64),
    /// Fewer keys arrived than were announced.
    Truncated { expected: usize, got: usize },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::NonPositiveCount(n) => {
                write!(f, "invalid number of elements: {n} (must be positive)")
            }
            BatchError::CountTooLarge(n) => write!(f, "number of elements too large: {n}"),
            BatchError::Truncated { expected, got } => {
                write!(f, "expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for BatchError {}
