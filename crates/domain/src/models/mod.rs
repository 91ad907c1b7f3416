//! Domain models for the invitations backend.

pub mod guest;
pub mod invitation;
pub mod link;
pub mod wish;

pub use guest::{CreateGuestRequest, GuestRecord, ListGuestsResponse};
pub use invitation::{CreateInvitationRequest, Invitation};
pub use link::{LinkStatus, ListLinkedInvitationsResponse, NewInvitationLink, UserInvitationLink};
pub use wish::{LikeState, NewWish, Wish, WishLike};
