use tracing::{error, info};

use super::domain::{IdentityId, Profile, ProfileId};
use super::gate::Unauthorized;
use super::guard::OperationInProgress;
use super::store::{MarketStore, StoreError};

/// Remove a user and every listing they own, against a backend that only
/// offers independent per-resource deletes.
///
/// Steps run strictly in order, children before parents, with the
/// authentication identity revoked last: a partial failure can leave a
/// user able to log in to an empty account, but never able to see
/// orphaned listings. There is no compensating "undelete", so nothing is
/// rolled back; each failure names its step so the operator can retry
/// from the top, and every step tolerates work a previous attempt already
/// completed.
///
/// Returns the seller id of the removed profile when one was resolved, so
/// the caller can drop the account's listings from its projection.
pub(crate) async fn delete_account<S>(
    store: &S,
    identity: &IdentityId,
) -> Result<Option<ProfileId>, AccountDeletionError>
where
    S: MarketStore,
{
    let profile = match store.profile_by_identity(identity).await {
        Ok(profile) => Some(profile),
        // A previous attempt already removed listings and profile; all
        // that can remain is the identity record.
        Err(StoreError::NotFound) => None,
        Err(source) => return Err(AccountDeletionError::ProfileResolutionFailed(source)),
    };

    if let Some(Profile { id: seller, .. }) = &profile {
        store
            .delete_listings_by_seller(seller)
            .await
            .map_err(AccountDeletionError::DependentDeletionFailed)?;
        info!(identity = %identity.0, seller = %seller.0, "listings removed for account deletion");

        store
            .delete_profile(identity)
            .await
            .map_err(AccountDeletionError::ProfileDeletionFailed)?;
        info!(identity = %identity.0, "profile removed for account deletion");
    } else {
        info!(identity = %identity.0, "profile already gone; resuming at identity deletion");
    }

    match store.delete_identity(identity).await {
        Ok(()) => {
            info!(identity = %identity.0, "identity record removed; account deletion complete");
            Ok(profile.map(|profile| profile.id))
        }
        // Nothing was left to delete on any resource.
        Err(StoreError::NotFound) if profile.is_none() => Err(AccountDeletionError::NotFound),
        Err(source) => {
            error!(
                identity = %identity.0,
                "identity record left behind after profile deletion; retry or remove manually"
            );
            Err(AccountDeletionError::IdentityDeletionFailed(source))
        }
    }
}

/// Per-step failure kinds for the cascading deletion, so a retry can be
/// reasoned about from the exact point the sequence stopped.
#[derive(Debug, thiserror::Error)]
pub enum AccountDeletionError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error(transparent)]
    AlreadyInProgress(#[from] OperationInProgress),
    #[error("account not found")]
    NotFound,
    #[error("failed to resolve profile: {0}")]
    ProfileResolutionFailed(#[source] StoreError),
    #[error("failed to delete the account's listings: {0}")]
    DependentDeletionFailed(#[source] StoreError),
    #[error("failed to delete the profile record: {0}")]
    ProfileDeletionFailed(#[source] StoreError),
    #[error("failed to delete the identity record: {0}")]
    IdentityDeletionFailed(#[source] StoreError),
}

impl AccountDeletionError {
    /// Name of the deletion step that failed, when one did.
    pub const fn failed_step(&self) -> Option<&'static str> {
        match self {
            AccountDeletionError::ProfileResolutionFailed(_) => Some("resolve_profile"),
            AccountDeletionError::DependentDeletionFailed(_) => Some("delete_listings"),
            AccountDeletionError::ProfileDeletionFailed(_) => Some("delete_profile"),
            AccountDeletionError::IdentityDeletionFailed(_) => Some("delete_identity"),
            AccountDeletionError::Unauthorized(_)
            | AccountDeletionError::AlreadyInProgress(_)
            | AccountDeletionError::NotFound => None,
        }
    }
}
