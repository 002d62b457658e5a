//! # Request Handlers
//!
//! Axum request handlers for the booking marketplace API. Every handler is
//! a pass-through: parse the request, issue one store or gateway call,
//! return the raw result.

use crate::auth::{self, Claims};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stay_core::{ApiError, Booking, Room};
use stay_store::{Collection, DeleteResult, InsertOneResult, UpdateResult};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Price in major currency units; a JSON number or numeric string
    #[serde(default)]
    pub price: Option<Value>,
}

/// Create payment intent response
#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Issued-token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Room status update request
#[derive(Debug, Deserialize)]
pub struct UpdateRoomStatusRequest {
    /// Boolean-like flag, stored verbatim under `booked`
    pub status: Value,
}

/// Email filter for booking listings
#[derive(Debug, Deserialize)]
pub struct BookingFilter {
    #[serde(default)]
    pub email: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

pub fn api_error_to_response(err: ApiError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

// =============================================================================
// Service Handlers
// =============================================================================

/// Confirmation string at the root path
pub async fn root() -> impl IntoResponse {
    "Stay booking server is running.."
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "stay-booking",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// =============================================================================
// Payment & Token Handlers
// =============================================================================

/// Create a card-payment intent in USD for the authenticated caller
#[instrument(skip(state, _claims, request))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    _claims: Claims,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> HandlerResult<Json<CreatePaymentIntentResponse>> {
    // No price, no gateway call.
    let price = parse_price(request.price.as_ref()).ok_or_else(|| {
        api_error_to_response(ApiError::InvalidRequest("price is required".to_string()))
    })?;

    // Convert to integer minor units (cents)
    let amount = (price * 100.0).round() as i64;

    let intent = state
        .payments
        .create_payment_intent(amount)
        .await
        .map_err(|e| {
            error!("Failed to create payment intent: {}", e);
            api_error_to_response(e)
        })?;

    info!("Created payment intent: {}", intent.id);

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

fn parse_price(price: Option<&Value>) -> Option<f64> {
    match price? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Sign the caller-supplied identity payload into a 7-day bearer token
pub async fn create_jwt(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> HandlerResult<Json<TokenResponse>> {
    let token =
        auth::issue_token(&state.config.jwt_secret, &payload).map_err(api_error_to_response)?;
    Ok(Json(TokenResponse { token }))
}

// =============================================================================
// User Handlers
// =============================================================================

/// Update-or-insert a user keyed by the path email
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(user): Json<Value>,
) -> HandlerResult<Json<UpdateResult>> {
    let result = state
        .store
        .upsert_one(Collection::Users, "$.email", &email, &user)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

/// Point lookup by email; responds `null` when absent
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> HandlerResult<Json<Option<Value>>> {
    let user = state
        .store
        .find_one(Collection::Users, "$.email", &email)
        .map_err(api_error_to_response)?;
    Ok(Json(user))
}

// =============================================================================
// Room Handlers
// =============================================================================

/// Full room collection scan
pub async fn list_rooms(State(state): State<AppState>) -> HandlerResult<Json<Vec<Value>>> {
    let rooms = state
        .store
        .find_all(Collection::Rooms)
        .map_err(api_error_to_response)?;
    Ok(Json(rooms))
}

/// Insert a room; the store generates its id
pub async fn create_room(
    State(state): State<AppState>,
    Json(room): Json<Room>,
) -> HandlerResult<Json<InsertOneResult>> {
    let body = serde_json::to_value(&room)
        .map_err(|e| api_error_to_response(ApiError::Serialization(e.to_string())))?;
    let result = state
        .store
        .insert_one(Collection::Rooms, &body)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

/// Rooms owned by the authenticated host.
///
/// The decoded identity must match the path email; a mismatch is rejected
/// before any store query is issued.
pub async fn host_rooms(
    State(state): State<AppState>,
    claims: Claims,
    Path(email): Path<String>,
) -> HandlerResult<Json<Vec<Value>>> {
    if claims.email != email {
        return Err(api_error_to_response(ApiError::Forbidden));
    }

    let rooms = state
        .store
        .find(Collection::Rooms, "$.host.email", &email)
        .map_err(api_error_to_response)?;
    Ok(Json(rooms))
}

/// Point lookup by id; responds `null` when absent
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<Option<Value>>> {
    let room = state
        .store
        .find_by_id(Collection::Rooms, &id)
        .map_err(api_error_to_response)?;
    Ok(Json(room))
}

/// Delete a room by id; a missing id reports `deletedCount: 0`
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<DeleteResult>> {
    let result = state
        .store
        .delete_by_id(Collection::Rooms, &id)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

/// Set the `booked` status flag on a room
pub async fn update_room_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoomStatusRequest>,
) -> HandlerResult<Json<UpdateResult>> {
    let result = state
        .store
        .set_field(Collection::Rooms, &id, "booked", &request.status)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

// =============================================================================
// Booking Handlers
// =============================================================================

/// Bookings for a guest. No email filter means an empty list, never an error.
pub async fn guest_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> HandlerResult<Json<Vec<Value>>> {
    let Some(email) = filter.email else {
        return Ok(Json(Vec::new()));
    };

    let bookings = state
        .store
        .find(Collection::Bookings, "$.guest.email", &email)
        .map_err(api_error_to_response)?;
    Ok(Json(bookings))
}

/// Bookings for a host. The stored `host` field is a plain email string.
pub async fn host_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> HandlerResult<Json<Vec<Value>>> {
    let Some(email) = filter.email else {
        return Ok(Json(Vec::new()));
    };

    let bookings = state
        .store
        .find(Collection::Bookings, "$.host", &email)
        .map_err(api_error_to_response)?;
    Ok(Json(bookings))
}

/// Insert a booking; the store generates its id
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Booking>,
) -> HandlerResult<Json<InsertOneResult>> {
    let body = serde_json::to_value(&booking)
        .map_err(|e| api_error_to_response(ApiError::Serialization(e.to_string())))?;
    let result = state
        .store
        .insert_one(Collection::Bookings, &body)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

/// Delete a booking by id
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<DeleteResult>> {
    let result = state
        .store
        .delete_by_id(Collection::Bookings, &id)
        .map_err(api_error_to_response)?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_api_error_conversion() {
        let (status, Json(body)) = api_error_to_response(ApiError::Forbidden);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error, "Forbidden access");
    }

    #[test]
    fn test_parse_price_number_and_string() {
        assert_eq!(parse_price(Some(&json!(129.5))), Some(129.5));
        assert_eq!(parse_price(Some(&json!("42"))), Some(42.0));
        assert_eq!(parse_price(Some(&json!(" 19.99 "))), Some(19.99));
        assert_eq!(parse_price(Some(&json!("not-a-price"))), None);
        assert_eq!(parse_price(Some(&json!(null))), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn test_minor_unit_conversion_rounds() {
        let amount = (parse_price(Some(&json!(129.99))).unwrap() * 100.0).round() as i64;
        assert_eq!(amount, 12999);
    }
}
