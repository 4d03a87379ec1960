//! Razorpay REST client: order creation and payment lookup.

use crate::core::{Order, Payment, PaymentGateway};
use crate::utils::error::GatewayError;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Base URL for the Razorpay API.
pub const RAZORPAY_API_BASE_URL: &str = "https://api.razorpay.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct RazorpayClient {
    http: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self::with_base_url(RAZORPAY_API_BASE_URL, key_id, key_secret)
    }

    /// Point the client at another host (sandbox proxies, mock servers).
    pub fn with_base_url(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: base_url.into(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/v1/{segments...}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn read_error(response: Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let (code, description) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.error.code,
                envelope.error.description.unwrap_or_else(|| body.clone()),
            ),
            Err(_) => (None, body),
        };

        GatewayError::Rejected {
            status: status.as_u16(),
            code,
            description,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<Order, GatewayError> {
        let url = self.endpoint(&["orders"])?;
        debug!("Creating order at {}", url);

        let response = self
            .http
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount,
                currency,
                receipt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        response
            .json::<Order>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, GatewayError> {
        let url = self.endpoint(&["payments", payment_id])?;
        debug!("Fetching payment from {}", url);

        let response = self
            .http
            .get(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err = Self::read_error(response).await;
            return Err(match err {
                GatewayError::Rejected { ref description, .. }
                    if status == StatusCode::NOT_FOUND
                        || description.contains("does not exist") =>
                {
                    GatewayError::PaymentNotFound(payment_id.to_string())
                }
                other => other,
            });
        }

        response
            .json::<Payment>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}
