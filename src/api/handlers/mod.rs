//! HTTP request handlers for API endpoints.

pub mod health;
pub mod imports;

pub use health::health_handler;
pub use imports::{create_import_handler, get_import_handler, retry_import_handler};
