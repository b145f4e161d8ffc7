// Stripe-specific error types and mappings

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::processor::DeclineReason;
use crate::transport::TransportError;

// Stripe REST error envelope: { error: { type, code, decline_code, message, param } }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeErrorEnvelope {
    #[serde(default)]
    pub error: StripeErrorDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeErrorDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl StripeErrorEnvelope {
    pub fn parse(body: &str) -> Result<Self, StripeApiError> {
        serde_json::from_str(body).map_err(|e| StripeApiError::Decode(format!("error envelope: {e}")))
    }

    pub fn decline_reason(&self) -> DeclineReason {
        decline_reason(self.error.decline_code.as_deref())
    }
}

/// Issuer decline code -> normalized reason. Total: anything unmapped,
/// including a missing code, is `Unknown`.
pub fn decline_reason(decline_code: Option<&str>) -> DeclineReason {
    match decline_code {
        Some("do_not_honor") => DeclineReason::DoNotHonor,
        Some("insufficient_funds") => DeclineReason::InsufficientFunds,
        _ => DeclineReason::Unknown,
    }
}

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("http error: {0}")]
    Http(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<TransportError> for StripeApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Send(msg) => StripeApiError::Http(msg),
            TransportError::Body(msg) => StripeApiError::Decode(msg),
        }
    }
}
