//! HTTP route handlers.

pub mod guests;
pub mod health;
pub mod invitations;
pub mod me;
pub mod wishes;
