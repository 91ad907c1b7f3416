//! Repository implementations for database operations.

pub mod guest;
pub mod invitation;
pub mod user_guest_invitation;
pub mod wish;

pub use guest::GuestRepository;
pub use invitation::InvitationRepository;
pub use user_guest_invitation::UserGuestInvitationRepository;
pub use wish::WishRepository;
