//! Listing moderation and account deletion workflows for the marketplace
//! admin surface.
//!
//! The engines here own decisions, not data: every listing, profile, and
//! identity record lives in an external store reached through the
//! [`MarketStore`] trait, and the only state kept locally is the
//! concurrency guard's busy set plus the confirmed view projection.

pub mod deletion;
pub mod domain;
pub mod gate;
pub mod guard;
mod moderation;
pub mod projection;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use deletion::AccountDeletionError;
pub use domain::{
    IdentityId, Listing, ListingId, ListingStatus, ListingView, ModerationAction, PrincipalId,
    Profile, ProfileId, SellerKind, UserView,
};
pub use gate::{AuthorizationGate, Unauthorized};
pub use guard::{OperationGuard, OperationInProgress, OperationTicket};
pub use projection::AdminProjection;
pub use router::admin_router;
pub use service::{AdminService, ModerationError};
pub use store::{MarketStore, PrivilegeDirectory, StoreError};
