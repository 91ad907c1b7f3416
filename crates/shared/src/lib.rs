//! Shared utilities and common types for the invitations backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Phone number canonicalization (guest-to-user join key)
//! - Bearer token verification
//! - Common validation logic

pub mod jwt;
pub mod phone;
pub mod validation;
