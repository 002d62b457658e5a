//! # stay-api
//!
//! HTTP API layer for stay-booking-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for users, rooms, bookings, and payment intents
//! - Bearer-token issuance and verification
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Confirmation string |
//! | GET | `/health` | Health check |
//! | POST | `/jwt` | Issue a bearer token |
//! | POST | `/create-payment-intent` | Create a card-payment intent (auth) |
//! | PUT | `/users/{email}` | Upsert user |
//! | GET | `/users/{email}` | Get user |
//! | GET | `/rooms` | List rooms |
//! | POST | `/rooms` | Create room |
//! | GET | `/rooms/{email}` | List rooms by host (auth + owner) |
//! | DELETE | `/rooms/{email}` | Delete room by id |
//! | GET | `/room/{id}` | Get room |
//! | PATCH | `/rooms/status/{id}` | Update room booking status |
//! | GET | `/bookings` | List bookings by guest email |
//! | GET | `/bookings/host` | List bookings by host email |
//! | POST | `/bookings` | Create booking |
//! | DELETE | `/bookings/{id}` | Delete booking |

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
