//! # stay-core
//!
//! Core types for the stay-booking marketplace backend.
//!
//! This crate provides:
//! - `ApiError` for typed error handling across the store, payment, and
//!   HTTP layers
//! - `User`, `Room`, and `Booking` document models: explicit fields for
//!   everything the system reads, with an opaque passthrough slot for
//!   everything it merely stores

pub mod document;
pub mod error;

// Re-exports for convenience
pub use document::{Booking, GuestRef, HostRef, Room, User};
pub use error::{ApiError, ApiResult};
