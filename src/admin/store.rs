use async_trait::async_trait;

use super::domain::{IdentityId, Listing, ListingId, ListingStatus, PrincipalId, Profile, ProfileId};

/// Data-store abstraction over the hosted marketplace backend so the
/// moderation and deletion engines can be exercised in isolation.
///
/// Every call is an independent operation: the backend exposes no
/// multi-resource transaction, which is why the deletion orchestrator has
/// to sequence and name its steps instead of wrapping them.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn listings_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, StoreError>;
    async fn get_listing(&self, id: &ListingId) -> Result<Listing, StoreError>;
    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<(), StoreError>;
    async fn delete_listing(&self, id: &ListingId) -> Result<(), StoreError>;
    async fn delete_listings_by_seller(&self, seller: &ProfileId) -> Result<(), StoreError>;
    async fn all_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    async fn profile_by_identity(&self, identity: &IdentityId) -> Result<Profile, StoreError>;
    async fn delete_profile(&self, identity: &IdentityId) -> Result<(), StoreError>;
    async fn delete_identity(&self, identity: &IdentityId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Server-side privilege lookup backing the authorization gate. Client-held
/// admin flags are never consulted.
#[async_trait]
pub trait PrivilegeDirectory: Send + Sync {
    async fn is_admin(&self, principal: &PrincipalId) -> bool;
}
