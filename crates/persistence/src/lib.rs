//! Persistence layer for the invitations backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Postgres-backed implementations of the domain storage traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod stores;
