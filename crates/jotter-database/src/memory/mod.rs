//! In-memory implementations of the store traits.
//!
//! Used by tests and by the `memory` database backend. Per-entry locking in
//! [`DashMap`](dashmap::DashMap) gives the same atomicity guarantees as the
//! conditional SQL updates.

pub mod file;
pub mod user;

pub use file::MemoryFileStore;
pub use user::MemoryUserStore;
