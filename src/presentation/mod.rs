pub mod display;

pub use display::{format_duration, print_permutations, print_search_outcome, SearchSummary, TimingReport};
