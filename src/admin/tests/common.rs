use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::admin::domain::{
    IdentityId, Listing, ListingId, ListingStatus, PrincipalId, Profile, ProfileId, SellerKind,
};
use crate::admin::service::AdminService;
use crate::admin::store::{MarketStore, PrivilegeDirectory, StoreError};

pub(super) fn admin_principal() -> PrincipalId {
    PrincipalId("u-admin".to_string())
}

pub(super) fn visitor_principal() -> PrincipalId {
    PrincipalId("u-visitor".to_string())
}

pub(super) fn listing(id: &str, status: ListingStatus, seller: &str) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        title: format!("test listing {id}"),
        price: 2500,
        status,
        seller_id: ProfileId(seller.to_string()),
        seller_name: "Test Seller".to_string(),
        seller_kind: SellerKind::Individual,
        created_at: Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn profile(identity: &str, profile_id: &str, is_admin: bool) -> Profile {
    Profile {
        id: ProfileId(profile_id.to_string()),
        identity_id: IdentityId(identity.to_string()),
        display_name: format!("user {identity}"),
        email: format!("{identity}@example.com"),
        seller_kind: SellerKind::Individual,
        is_admin,
        created_at: Utc
            .with_ymd_and_hms(2024, 2, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Privilege directory backed by a fixed allow list, standing in for the
/// server-side admin data the gate consults.
pub(super) struct AllowList {
    admins: HashSet<String>,
}

impl AllowList {
    pub(super) fn of(admins: &[&str]) -> Self {
        Self {
            admins: admins.iter().map(|admin| admin.to_string()).collect(),
        }
    }
}

#[async_trait]
impl PrivilegeDirectory for AllowList {
    async fn is_admin(&self, principal: &PrincipalId) -> bool {
        self.admins.contains(&principal.0)
    }
}

/// Every store call the service issued, in order, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum StoreCall {
    ListingsByStatus(ListingStatus),
    GetListing(String),
    UpdateStatus(String, ListingStatus),
    DeleteListing(String),
    DeleteListingsBySeller(String),
    AllProfiles,
    ProfileByIdentity(String),
    DeleteProfile(String),
    DeleteIdentity(String),
}

/// Store operations that can be told to fail with an injected outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum FailPoint {
    UpdateStatus,
    DeleteListing,
    ResolveProfile,
    DeleteListingsBySeller,
    DeleteProfile,
    DeleteIdentity,
}

/// In-memory store double that records every call so tests can assert
/// ordering and absence of side effects.
#[derive(Default)]
pub(super) struct RecordingStore {
    listings: Mutex<HashMap<ListingId, Listing>>,
    profiles: Mutex<HashMap<IdentityId, Profile>>,
    identities: Mutex<HashSet<IdentityId>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<HashSet<FailPoint>>,
}

impl RecordingStore {
    pub(super) fn with_listing(self, listing: Listing) -> Self {
        self.listings
            .lock()
            .expect("store mutex poisoned")
            .insert(listing.id.clone(), listing);
        self
    }

    pub(super) fn with_profile(self, profile: Profile) -> Self {
        self.identities
            .lock()
            .expect("store mutex poisoned")
            .insert(profile.identity_id.clone());
        self.profiles
            .lock()
            .expect("store mutex poisoned")
            .insert(profile.identity_id.clone(), profile);
        self
    }

    /// Register an identity record without a matching profile, as left
    /// behind by a partially completed deletion.
    pub(super) fn with_orphan_identity(self, identity: &str) -> Self {
        self.identities
            .lock()
            .expect("store mutex poisoned")
            .insert(IdentityId(identity.to_string()));
        self
    }

    pub(super) fn fail_on(&self, point: FailPoint) {
        self.failures
            .lock()
            .expect("store mutex poisoned")
            .insert(point);
    }

    pub(super) fn heal(&self, point: FailPoint) {
        self.failures
            .lock()
            .expect("store mutex poisoned")
            .remove(&point);
    }

    pub(super) fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn clear_calls(&self) {
        self.calls.lock().expect("store mutex poisoned").clear();
    }

    pub(super) fn has_profile(&self, identity: &str) -> bool {
        self.profiles
            .lock()
            .expect("store mutex poisoned")
            .contains_key(&IdentityId(identity.to_string()))
    }

    pub(super) fn has_identity(&self, identity: &str) -> bool {
        self.identities
            .lock()
            .expect("store mutex poisoned")
            .contains(&IdentityId(identity.to_string()))
    }

    pub(super) fn listings_of(&self, seller: &str) -> Vec<Listing> {
        let seller = ProfileId(seller.to_string());
        self.listings
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|listing| listing.seller_id == seller)
            .cloned()
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("store mutex poisoned").push(call);
    }

    fn check(&self, point: FailPoint) -> Result<(), StoreError> {
        if self
            .failures
            .lock()
            .expect("store mutex poisoned")
            .contains(&point)
        {
            Err(StoreError::Unavailable("injected outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketStore for RecordingStore {
    async fn listings_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, StoreError> {
        self.record(StoreCall::ListingsByStatus(status));
        let listings = self.listings.lock().expect("store mutex poisoned");
        Ok(listings
            .values()
            .filter(|listing| listing.status == status)
            .cloned()
            .collect())
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing, StoreError> {
        self.record(StoreCall::GetListing(id.0.clone()));
        let listings = self.listings.lock().expect("store mutex poisoned");
        listings.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::UpdateStatus(id.0.clone(), status));
        self.check(FailPoint::UpdateStatus)?;
        let mut listings = self.listings.lock().expect("store mutex poisoned");
        let listing = listings.get_mut(id).ok_or(StoreError::NotFound)?;
        listing.status = status;
        Ok(())
    }

    async fn delete_listing(&self, id: &ListingId) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteListing(id.0.clone()));
        self.check(FailPoint::DeleteListing)?;
        let mut listings = self.listings.lock().expect("store mutex poisoned");
        listings.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn delete_listings_by_seller(&self, seller: &ProfileId) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteListingsBySeller(seller.0.clone()));
        self.check(FailPoint::DeleteListingsBySeller)?;
        let mut listings = self.listings.lock().expect("store mutex poisoned");
        listings.retain(|_, listing| &listing.seller_id != seller);
        Ok(())
    }

    async fn all_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.record(StoreCall::AllProfiles);
        let profiles = self.profiles.lock().expect("store mutex poisoned");
        Ok(profiles.values().cloned().collect())
    }

    async fn profile_by_identity(&self, identity: &IdentityId) -> Result<Profile, StoreError> {
        self.record(StoreCall::ProfileByIdentity(identity.0.clone()));
        self.check(FailPoint::ResolveProfile)?;
        let profiles = self.profiles.lock().expect("store mutex poisoned");
        profiles.get(identity).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete_profile(&self, identity: &IdentityId) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteProfile(identity.0.clone()));
        self.check(FailPoint::DeleteProfile)?;
        let mut profiles = self.profiles.lock().expect("store mutex poisoned");
        profiles
            .remove(identity)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_identity(&self, identity: &IdentityId) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteIdentity(identity.0.clone()));
        self.check(FailPoint::DeleteIdentity)?;
        let mut identities = self.identities.lock().expect("store mutex poisoned");
        if identities.remove(identity) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

pub(super) fn build_service(
    store: RecordingStore,
) -> (AdminService<RecordingStore, AllowList>, Arc<RecordingStore>) {
    let store = Arc::new(store);
    let directory = Arc::new(AllowList::of(&["u-admin"]));
    (AdminService::new(store.clone(), directory), store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
