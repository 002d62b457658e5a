//! # stay-store
//!
//! Document Store Gateway for stay-booking-rs.
//!
//! Three named collections (`users`, `rooms`, `bookings`) backed by a single
//! SQLite database. Documents are schema-less JSON bodies with a generated
//! `_id`; filters are JSON paths evaluated with `json_extract`. Mutation
//! results mirror the shapes the HTTP surface passes straight back to
//! callers (`insertedId`, `matchedCount`/`modifiedCount`/`upsertedId`,
//! `deletedCount`).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stay_store::{Collection, DocumentStore};
//!
//! let store = DocumentStore::open("stay.db")?;
//! let result = store.insert_one(Collection::Rooms, &room_body)?;
//! let room = store.find_by_id(Collection::Rooms, &result.inserted_id)?;
//! ```

pub mod results;
pub mod store;

// Re-exports
pub use results::{DeleteResult, InsertOneResult, UpdateResult};
pub use store::{Collection, DocumentStore};
