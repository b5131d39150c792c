//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the domain repository traits.
//!
//! # Modules
//!
//! - [`http`] - REST clients for the bookmark backend (reqwest)
//! - [`memory`] - In-process stores, used when no backend is configured

pub mod http;
pub mod memory;
