use std::sync::Mutex;

use super::domain::{IdentityId, Listing, ListingId, ListingStatus, Profile, ProfileId};

/// Process-local snapshot of the listings and users last fetched for the
/// admin view. Mutated only after the store confirms an operation, so the
/// view never shows a state the backend has not reached. Filtering and
/// sorting stay with the presentation layer.
#[derive(Default)]
pub struct AdminProjection {
    listings: Mutex<Vec<Listing>>,
    users: Mutex<Vec<Profile>>,
}

impl AdminProjection {
    pub fn replace_listings(&self, listings: Vec<Listing>) {
        *self.listings.lock().expect("projection mutex poisoned") = listings;
    }

    pub fn replace_users(&self, users: Vec<Profile>) {
        *self.users.lock().expect("projection mutex poisoned") = users;
    }

    pub fn listings(&self) -> Vec<Listing> {
        self.listings
            .lock()
            .expect("projection mutex poisoned")
            .clone()
    }

    pub fn users(&self) -> Vec<Profile> {
        self.users.lock().expect("projection mutex poisoned").clone()
    }

    pub(crate) fn record_status(&self, id: &ListingId, status: ListingStatus) {
        let mut listings = self.listings.lock().expect("projection mutex poisoned");
        if let Some(listing) = listings.iter_mut().find(|listing| &listing.id == id) {
            listing.status = status;
        }
    }

    pub(crate) fn remove_listing(&self, id: &ListingId) {
        self.listings
            .lock()
            .expect("projection mutex poisoned")
            .retain(|listing| &listing.id != id);
    }

    pub(crate) fn remove_account(&self, identity: &IdentityId, seller: Option<&ProfileId>) {
        self.users
            .lock()
            .expect("projection mutex poisoned")
            .retain(|profile| &profile.identity_id != identity);
        if let Some(seller) = seller {
            self.listings
                .lock()
                .expect("projection mutex poisoned")
                .retain(|listing| &listing.seller_id != seller);
        }
    }
}
