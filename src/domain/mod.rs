pub mod error;
pub mod file_search;
pub mod permutation;

pub use error::{Error, Result};
pub use file_search::{
    FileSearcher, NameMatches, SearchOutcome, TraversalError, TraversalErrorKind,
};
pub use permutation::{dedup_preserving_order, PermutationGenerator, Strategy};
