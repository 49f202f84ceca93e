//! # jotter-database
//!
//! Persistence seams for Jotter: the [`UserStore`] and [`FileStore`]
//! traits, their PostgreSQL repositories, and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FileStore, UserStore};
