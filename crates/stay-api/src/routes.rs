//! # Routes
//!
//! Axum router configuration. Paths mirror the public API surface exactly,
//! including the `/room/{id}` vs `/rooms/{id}` split.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Service:
///   - GET  /            - Confirmation string
///   - GET  /health      - Health check
/// - Auth & payments:
///   - POST /jwt                    - Issue a bearer token
///   - POST /create-payment-intent  - Create payment intent (bearer)
/// - Users:
///   - PUT  /users/{email} - Upsert user
///   - GET  /users/{email} - Get user
/// - Rooms:
///   - GET    /rooms             - List rooms
///   - POST   /rooms             - Create room
///   - GET    /rooms/{email}     - Rooms by host (bearer + owner)
///   - DELETE /rooms/{email}     - Delete room by id
///   - GET    /room/{id}         - Get room
///   - PATCH  /rooms/status/{id} - Update booking status
/// - Bookings:
///   - GET    /bookings        - Bookings by guest email
///   - GET    /bookings/host   - Bookings by host email
///   - POST   /bookings        - Create booking
///   - DELETE /bookings/{id}   - Delete booking
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS, matching the browser-facing frontend's expectations
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/jwt", post(handlers::create_jwt))
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route(
            "/users/{email}",
            put(handlers::upsert_user).get(handlers::get_user),
        )
        .route(
            "/rooms",
            get(handlers::list_rooms).post(handlers::create_room),
        )
        // One capture segment serving two methods: GET scopes by host email,
        // DELETE removes by room id.
        .route(
            "/rooms/{email}",
            get(handlers::host_rooms).delete(handlers::delete_room),
        )
        .route("/rooms/status/{id}", patch(handlers::update_room_status))
        .route("/room/{id}", get(handlers::get_room))
        .route(
            "/bookings",
            get(handlers::guest_bookings).post(handlers::create_booking),
        )
        .route("/bookings/host", get(handlers::host_bookings))
        .route("/bookings/{id}", delete(handlers::delete_booking))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
