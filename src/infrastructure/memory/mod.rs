//! In-process stores used when no bookmark backend is configured.

mod memory_bookmark_repository;
mod memory_import_log_repository;

pub use memory_bookmark_repository::MemoryBookmarkRepository;
pub use memory_import_log_repository::MemoryImportLogRepository;
