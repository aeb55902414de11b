use std::sync::Arc;

use tracing::info;

use super::deletion::{self, AccountDeletionError};
use super::domain::{
    IdentityId, Listing, ListingId, ListingStatus, ModerationAction, PrincipalId, Profile,
};
use super::gate::{AuthorizationGate, Unauthorized};
use super::guard::{OperationGuard, OperationInProgress};
use super::projection::AdminProjection;
use super::store::{MarketStore, PrivilegeDirectory, StoreError};

/// Facade composing the authorization gate, the per-collection concurrency
/// guards, the moderation rules, and the deletion orchestrator over the
/// external store. One instance is shared across all admin requests; the
/// guard is the only mutable state it owns besides the view projection.
pub struct AdminService<S, P> {
    store: Arc<S>,
    gate: AuthorizationGate<P>,
    listing_guard: OperationGuard,
    user_guard: OperationGuard,
    projection: AdminProjection,
}

impl<S, P> AdminService<S, P>
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<P>) -> Self {
        Self {
            store,
            gate: AuthorizationGate::new(directory),
            listing_guard: OperationGuard::default(),
            user_guard: OperationGuard::default(),
            projection: AdminProjection::default(),
        }
    }

    /// Apply a moderation action to one listing and return the status the
    /// store now holds. Exactly one status write is issued; the projection
    /// is updated only after that write succeeds.
    pub async fn transition(
        &self,
        principal: &PrincipalId,
        listing_id: &ListingId,
        action: ModerationAction,
    ) -> Result<ListingStatus, ModerationError> {
        self.gate.require_admin(principal).await?;
        let _ticket = self.listing_guard.begin(&listing_id.0)?;

        // Toggle must act on the stored status at call time, so the
        // current row is always re-read rather than trusted from the view.
        let listing = match self.store.get_listing(listing_id).await {
            Ok(listing) => listing,
            Err(StoreError::NotFound) => return Err(ModerationError::NotFound),
            Err(source) => return Err(ModerationError::StoreFailure(source)),
        };

        let destination = action.destination(listing.status);
        self.store
            .update_listing_status(listing_id, destination)
            .await
            .map_err(ModerationError::StoreFailure)?;

        self.projection.record_status(listing_id, destination);
        info!(
            listing = %listing_id.0,
            from = listing.status.label(),
            to = destination.label(),
            "listing status updated"
        );
        Ok(destination)
    }

    /// Remove a single listing on operator request.
    pub async fn delete_listing(
        &self,
        principal: &PrincipalId,
        listing_id: &ListingId,
    ) -> Result<(), ModerationError> {
        self.gate.require_admin(principal).await?;
        let _ticket = self.listing_guard.begin(&listing_id.0)?;

        match self.store.delete_listing(listing_id).await {
            Ok(()) => {
                self.projection.remove_listing(listing_id);
                info!(listing = %listing_id.0, "listing deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(ModerationError::NotFound),
            Err(source) => Err(ModerationError::StoreFailure(source)),
        }
    }

    /// Remove a user account together with its profile and listings. See
    /// [`AccountDeletionError`] for the per-step failure kinds.
    pub async fn delete_account(
        &self,
        principal: &PrincipalId,
        identity: &IdentityId,
    ) -> Result<(), AccountDeletionError> {
        self.gate.require_admin(principal).await?;
        let _ticket = self.user_guard.begin(&identity.0)?;

        let seller = deletion::delete_account(self.store.as_ref(), identity).await?;
        self.projection.remove_account(identity, seller.as_ref());
        Ok(())
    }

    /// Re-fetch listings in one status and refresh the projection.
    pub async fn refresh_listings(
        &self,
        principal: &PrincipalId,
        status: ListingStatus,
    ) -> Result<Vec<Listing>, ModerationError> {
        self.gate.require_admin(principal).await?;
        let listings = self
            .store
            .listings_by_status(status)
            .await
            .map_err(ModerationError::StoreFailure)?;
        self.projection.replace_listings(listings.clone());
        Ok(listings)
    }

    /// Re-fetch all user profiles and refresh the projection.
    pub async fn refresh_users(
        &self,
        principal: &PrincipalId,
    ) -> Result<Vec<Profile>, ModerationError> {
        self.gate.require_admin(principal).await?;
        let users = self
            .store
            .all_profiles()
            .await
            .map_err(ModerationError::StoreFailure)?;
        self.projection.replace_users(users.clone());
        Ok(users)
    }

    /// Last confirmed admin view state.
    pub fn projection(&self) -> &AdminProjection {
        &self.projection
    }

    /// Exclusion guard for listing operations, exposed so callers that
    /// bypass the facade can still coordinate on the same busy set.
    pub fn listing_guard(&self) -> &OperationGuard {
        &self.listing_guard
    }

    /// Exclusion guard for user operations.
    pub fn user_guard(&self) -> &OperationGuard {
        &self.user_guard
    }
}

/// Error raised by listing moderation operations.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error(transparent)]
    AlreadyInProgress(#[from] OperationInProgress),
    #[error("listing not found")]
    NotFound,
    #[error("store call failed: {0}")]
    StoreFailure(#[source] StoreError),
}
