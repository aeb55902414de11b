use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for marketplace listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier wrapper for marketplace profile rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for authentication-system records. Profiles reference
/// exactly one identity; the identity store itself is external.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub String);

/// The acting operator, as resolved by the session layer upstream of this
/// crate. Privilege is always re-checked server-side, never read from here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

/// Moderation lifecycle of a listing. New listings start as `Pending`;
/// `Rejected` and `Inactive` are not terminal and may be re-approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Active,
    Inactive,
    Rejected,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Active => "active",
            ListingStatus::Inactive => "inactive",
            ListingStatus::Rejected => "rejected",
        }
    }
}

/// Operator actions accepted by the moderation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approve,
    Reject,
    ToggleActive,
}

/// Seller classification carried on both listings and profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerKind {
    Individual,
    Dealer,
}

/// A marketplace entry as stored by the external backend. Always owned by
/// exactly one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub price: u32,
    pub status: ListingStatus,
    pub seller_id: ProfileId,
    pub seller_name: String,
    pub seller_kind: SellerKind,
    pub created_at: DateTime<Utc>,
}

/// Marketplace-facing account record, one-to-one with an identity record
/// and one-to-many with listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub identity_id: IdentityId,
    pub display_name: String,
    pub email: String,
    pub seller_kind: SellerKind,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Sanitized listing representation for admin API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub id: ListingId,
    pub title: String,
    pub price: u32,
    pub status: &'static str,
    pub seller_name: String,
    pub seller_kind: SellerKind,
    pub created_at: DateTime<Utc>,
}

impl From<&Listing> for ListingView {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            price: listing.price,
            status: listing.status.label(),
            seller_name: listing.seller_name.clone(),
            seller_kind: listing.seller_kind,
            created_at: listing.created_at,
        }
    }
}

/// Sanitized profile representation for the admin user table.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub email: String,
    pub seller_kind: SellerKind,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Profile> for UserView {
    fn from(profile: &Profile) -> Self {
        Self {
            identity_id: profile.identity_id.clone(),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            seller_kind: profile.seller_kind,
            is_admin: profile.is_admin,
            created_at: profile.created_at,
        }
    }
}
