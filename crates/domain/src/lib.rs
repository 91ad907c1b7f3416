//! Domain layer for the invitations backend.
//!
//! This crate contains:
//! - Domain models (Invitation, GuestRecord, UserInvitationLink, Wish)
//! - The guest-to-user invitation linking service
//! - The wishes widget messaging bridge (protocol, embedded and host sides)
//! - Storage traits and in-memory implementations

pub mod bridge;
pub mod error;
pub mod models;
pub mod services;
