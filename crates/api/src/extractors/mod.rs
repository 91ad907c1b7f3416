//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod guest;
pub mod user_auth;

pub use guest::{OptionalGuestId, GUEST_ID_HEADER};
pub use user_auth::UserAuth;
