//! Storage Backend Abstraction
//!
//! This module provides a trait-based abstraction over string-only key/value
//! stores. The browser implementation wraps Web Storage; the in-memory
//! implementation serves tests and non-browser targets.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   StorageHandler    │
//! │ (durable+ephemeral) │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │  StorageAccessor    │
//! │  (typed, per store) │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │   StorageBackend    │  <-- Trait
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴──────┐
//!     │             │
//! ┌───▼───┐   ┌─────▼─────┐
//! │Memory │   │    Web    │
//! │Backend│   │  Storage  │
//! └───────┘   └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use storage_handler::backend::{MemoryStorageBackend, StorageBackend};
//!
//! let backend = MemoryStorageBackend::new();
//! backend.set_item("key", "value").unwrap();
//! assert_eq!(backend.get_item("key").unwrap().as_deref(), Some("value"));
//! ```

mod memory_backend;
mod traits;

pub use memory_backend::*;
pub use traits::*;

#[cfg(feature = "web")]
mod web_backend;

#[cfg(feature = "web")]
pub use web_backend::WebStorageBackend;
