//! # Payment Intents
//!
//! The single outbound gateway call: `POST /v1/payment_intents` for a card
//! payment in USD, amount in integer minor units.

use crate::config::StripeConfig;
use reqwest::Client;
use serde::Deserialize;
use stay_core::{ApiError, ApiResult};
use tracing::{debug, error, info, instrument};

/// A created payment intent
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Gateway-side intent id
    pub id: String,
    /// Secret the frontend uses to complete the payment
    pub client_secret: String,
}

/// Stripe payment-intent client
pub struct StripePaymentClient {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentClient {
    /// Create a new client
    pub fn new(config: StripeConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ApiResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Create a USD card-payment intent for `amount` minor units
    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, amount: i64) -> ApiResult<PaymentIntent> {
        if amount <= 0 {
            return Err(ApiError::InvalidRequest(
                "amount must be a positive number of minor units".to_string(),
            ));
        }

        debug!("Creating Stripe payment intent: amount={}", amount);

        let form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), "usd".to_string()),
            ("payment_method_types[]".to_string(), "card".to_string()),
        ];

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ApiError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ApiError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
