//! # jotter-entity
//!
//! Domain entity models for Jotter. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`; API-facing ones serialize with camelCase keys.

pub mod file;
pub mod storage;
pub mod user;
