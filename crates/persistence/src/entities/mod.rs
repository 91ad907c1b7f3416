//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod guest;
pub mod invitation;
pub mod user_guest_invitation;
pub mod wish;

pub use guest::GuestEntity;
pub use invitation::InvitationEntity;
pub use user_guest_invitation::{LinkStatusDb, UserGuestInvitationEntity};
pub use wish::WishEntity;
