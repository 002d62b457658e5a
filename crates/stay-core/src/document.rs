//! # Document Models
//!
//! Record types for the three collections. Only the fields the backend
//! actually reads are modeled; everything else the caller sends rides along
//! in the flattened `extra` map and is stored verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A marketplace user, keyed by email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Natural key
    pub email: String,

    /// Caller-supplied fields (role, name, ...) stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Host identity embedded in a room document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRef {
    pub email: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Guest identity embedded in a booking document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRef {
    pub email: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A room listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Generated identifier; absent on creation
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Listing owner
    pub host: HostRef,

    /// Booking status flag; boolean-like, preserved verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked: Option<Value>,

    /// Opaque listing fields (title, price, images, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Generated identifier; absent on creation
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Who booked
    pub guest: GuestRef,

    /// Host email as a plain string, matching the stored data shape
    pub host: String,

    /// Opaque booking fields (dates, price, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_passthrough_fields_survive() {
        let body = json!({
            "host": { "email": "host@example.com", "name": "Ana" },
            "title": "Loft by the sea",
            "price": 120,
            "images": ["a.jpg", "b.jpg"]
        });

        let room: Room = serde_json::from_value(body.clone()).unwrap();
        assert!(room.id.is_none());
        assert_eq!(room.host.email, "host@example.com");
        assert_eq!(room.extra["title"], "Loft by the sea");

        let back = serde_json::to_value(&room).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn test_booking_host_is_plain_email() {
        let booking: Booking = serde_json::from_value(json!({
            "guest": { "email": "guest@example.com" },
            "host": "host@example.com",
            "date": "2025-06-01"
        }))
        .unwrap();

        assert_eq!(booking.host, "host@example.com");
        assert_eq!(booking.guest.email, "guest@example.com");
        assert_eq!(booking.extra["date"], "2025-06-01");
    }

    #[test]
    fn test_user_requires_email() {
        let missing = serde_json::from_value::<User>(json!({ "role": "host" }));
        assert!(missing.is_err());
    }
}
