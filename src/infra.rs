use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::admin::{
    IdentityId, Listing, ListingId, ListingStatus, MarketStore, PrincipalId, PrivilegeDirectory,
    Profile, ProfileId, SellerKind, StoreError,
};
use crate::config::AdminConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory marketplace backend for development and demos. Stands in for
/// the hosted store and doubles as the privilege directory, deriving
/// admin rights from profile records plus the configured bootstrap list.
#[derive(Default)]
pub(crate) struct InMemoryMarketStore {
    listings: Mutex<HashMap<ListingId, Listing>>,
    profiles: Mutex<HashMap<IdentityId, Profile>>,
    identities: Mutex<HashSet<IdentityId>>,
    bootstrap_admins: HashSet<String>,
}

fn seed_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

impl InMemoryMarketStore {
    pub(crate) fn seeded(config: &AdminConfig) -> Self {
        let store = Self {
            bootstrap_admins: config.bootstrap_admins.iter().cloned().collect(),
            ..Self::default()
        };

        let moderator = Profile {
            id: ProfileId("p-moderator".to_string()),
            identity_id: IdentityId("u-moderator".to_string()),
            display_name: "Site Moderator".to_string(),
            email: "moderator@example.com".to_string(),
            seller_kind: SellerKind::Individual,
            is_admin: true,
            created_at: seed_time(2024, 1, 10, 9, 0),
        };
        let dealer = Profile {
            id: ProfileId("p-dealer".to_string()),
            identity_id: IdentityId("u-dealer".to_string()),
            display_name: "Moto Center".to_string(),
            email: "sales@motocenter.example".to_string(),
            seller_kind: SellerKind::Dealer,
            is_admin: false,
            created_at: seed_time(2024, 3, 2, 14, 30),
        };

        let listing = Listing {
            id: ListingId("l-0001".to_string()),
            title: "2019 street bike, low mileage".to_string(),
            price: 5400,
            status: ListingStatus::Pending,
            seller_id: dealer.id.clone(),
            seller_name: dealer.display_name.clone(),
            seller_kind: dealer.seller_kind,
            created_at: seed_time(2024, 5, 18, 11, 15),
        };

        store.insert_profile(moderator);
        store.insert_profile(dealer);
        store.insert_listing(listing);
        store
    }

    pub(crate) fn insert_profile(&self, profile: Profile) {
        self.identities
            .lock()
            .expect("identity mutex poisoned")
            .insert(profile.identity_id.clone());
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.identity_id.clone(), profile);
    }

    pub(crate) fn insert_listing(&self, listing: Listing) {
        self.listings
            .lock()
            .expect("listing mutex poisoned")
            .insert(listing.id.clone(), listing);
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn listings_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, StoreError> {
        let listings = self.listings.lock().expect("listing mutex poisoned");
        Ok(listings
            .values()
            .filter(|listing| listing.status == status)
            .cloned()
            .collect())
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing, StoreError> {
        let listings = self.listings.lock().expect("listing mutex poisoned");
        listings.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_listing_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<(), StoreError> {
        let mut listings = self.listings.lock().expect("listing mutex poisoned");
        let listing = listings.get_mut(id).ok_or(StoreError::NotFound)?;
        listing.status = status;
        Ok(())
    }

    async fn delete_listing(&self, id: &ListingId) -> Result<(), StoreError> {
        let mut listings = self.listings.lock().expect("listing mutex poisoned");
        listings.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn delete_listings_by_seller(&self, seller: &ProfileId) -> Result<(), StoreError> {
        let mut listings = self.listings.lock().expect("listing mutex poisoned");
        listings.retain(|_, listing| &listing.seller_id != seller);
        Ok(())
    }

    async fn all_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.lock().expect("profile mutex poisoned");
        Ok(profiles.values().cloned().collect())
    }

    async fn profile_by_identity(&self, identity: &IdentityId) -> Result<Profile, StoreError> {
        let profiles = self.profiles.lock().expect("profile mutex poisoned");
        profiles.get(identity).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete_profile(&self, identity: &IdentityId) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().expect("profile mutex poisoned");
        profiles
            .remove(identity)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_identity(&self, identity: &IdentityId) -> Result<(), StoreError> {
        let mut identities = self.identities.lock().expect("identity mutex poisoned");
        if identities.remove(identity) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[async_trait]
impl PrivilegeDirectory for InMemoryMarketStore {
    async fn is_admin(&self, principal: &PrincipalId) -> bool {
        if self.bootstrap_admins.contains(&principal.0) {
            return true;
        }
        let profiles = self.profiles.lock().expect("profile mutex poisoned");
        profiles
            .get(&IdentityId(principal.0.clone()))
            .is_some_and(|profile| profile.is_admin)
    }
}
