// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    dedup_preserving_order, Error, FileSearcher, PermutationGenerator, SearchOutcome, Strategy,
    TraversalError, TraversalErrorKind,
};
pub use application::Config;
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{print_permutations, print_search_outcome, SearchSummary, TimingReport};
