//! # stay-stripe
//!
//! Stripe client for stay-booking-rs.
//!
//! One job: create a card-payment intent in USD and hand back the client
//! secret the frontend uses to complete the charge.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stay_stripe::StripePaymentClient;
//!
//! let client = StripePaymentClient::from_env()?;
//! let intent = client.create_payment_intent(12900).await?;
//! // send intent.client_secret to the caller
//! ```

pub mod config;
pub mod intents;

// Re-exports
pub use config::StripeConfig;
pub use intents::{PaymentIntent, StripePaymentClient};
