use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::deletion::AccountDeletionError;
use super::domain::{
    IdentityId, ListingId, ListingStatus, ListingView, ModerationAction, PrincipalId, UserView,
};
use super::service::{AdminService, ModerationError};
use super::store::{MarketStore, PrivilegeDirectory};

/// Router builder exposing the admin moderation and account endpoints.
///
/// The acting principal is read from the `x-admin-principal` header set by
/// the session layer in front of this service; privilege is still checked
/// server-side on every call.
pub fn admin_router<S, P>(service: Arc<AdminService<S, P>>) -> Router
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    Router::new()
        .route("/api/v1/admin/listings", get(listings_handler::<S, P>))
        .route(
            "/api/v1/admin/listings/:listing_id/approve",
            post(approve_handler::<S, P>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id/reject",
            post(reject_handler::<S, P>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id/toggle",
            post(toggle_handler::<S, P>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id",
            delete(delete_listing_handler::<S, P>),
        )
        .route("/api/v1/admin/users", get(users_handler::<S, P>))
        .route(
            "/api/v1/admin/users/:identity_id",
            delete(delete_user_handler::<S, P>),
        )
        .with_state(service)
}

const PRINCIPAL_HEADER: &str = "x-admin-principal";

fn principal_from(headers: &HeaderMap) -> Result<PrincipalId, Response> {
    headers
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| PrincipalId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({ "error": "missing x-admin-principal header" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingsQuery {
    pub(crate) status: ListingStatus,
}

pub(crate) async fn listings_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Query(query): Query<ListingsQuery>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.refresh_listings(&principal, query.status).await {
        Ok(listings) => {
            let views: Vec<ListingView> = listings.iter().map(ListingView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => moderation_error_response(error),
    }
}

pub(crate) async fn users_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    match service.refresh_users(&principal).await {
        Ok(users) => {
            let views: Vec<UserView> = users.iter().map(UserView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => moderation_error_response(error),
    }
}

pub(crate) async fn approve_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    moderation_handler(service, headers, listing_id, ModerationAction::Approve).await
}

pub(crate) async fn reject_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    moderation_handler(service, headers, listing_id, ModerationAction::Reject).await
}

pub(crate) async fn toggle_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    moderation_handler(service, headers, listing_id, ModerationAction::ToggleActive).await
}

async fn moderation_handler<S, P>(
    service: Arc<AdminService<S, P>>,
    headers: HeaderMap,
    listing_id: String,
    action: ModerationAction,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let listing_id = ListingId(listing_id);
    match service.transition(&principal, &listing_id, action).await {
        Ok(status) => {
            let payload = json!({
                "listing_id": listing_id.0,
                "status": status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => moderation_error_response(error),
    }
}

pub(crate) async fn delete_listing_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let listing_id = ListingId(listing_id);
    match service.delete_listing(&principal, &listing_id).await {
        Ok(()) => {
            let payload = json!({ "listing_id": listing_id.0, "deleted": true });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => moderation_error_response(error),
    }
}

pub(crate) async fn delete_user_handler<S, P>(
    State(service): State<Arc<AdminService<S, P>>>,
    headers: HeaderMap,
    Path(identity_id): Path<String>,
) -> Response
where
    S: MarketStore + 'static,
    P: PrivilegeDirectory + 'static,
{
    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let identity = IdentityId(identity_id);
    match service.delete_account(&principal, &identity).await {
        Ok(()) => {
            let payload = json!({ "identity_id": identity.0, "deleted": true });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => deletion_error_response(error),
    }
}

fn moderation_error_response(error: ModerationError) -> Response {
    match error {
        ModerationError::Unauthorized(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        // Duplicate submission: tell the caller the request was ignored.
        ModerationError::AlreadyInProgress(error) => {
            let payload = json!({ "ignored": true, "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        ModerationError::NotFound => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ModerationError::StoreFailure(source) => {
            let payload = json!({ "error": source.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

fn deletion_error_response(error: AccountDeletionError) -> Response {
    match &error {
        AccountDeletionError::Unauthorized(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        AccountDeletionError::AlreadyInProgress(_) => {
            let payload = json!({ "ignored": true, "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        AccountDeletionError::NotFound => {
            let payload = json!({ "error": "account not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        _ => {
            let payload = json!({
                "error": error.to_string(),
                "failed_step": error.failed_step(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
