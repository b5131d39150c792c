//! Business logic services for the application layer.

pub mod batch_executor;
pub mod duplicate_checker;
pub mod import_reporter;
pub mod import_service;
pub mod session_registry;

pub use batch_executor::BatchExecutor;
pub use duplicate_checker::DuplicateChecker;
pub use import_reporter::{ImportReporter, ImportSummary, SummaryLevel};
pub use import_service::{ImportLimits, ImportService};
pub use session_registry::SessionRegistry;
