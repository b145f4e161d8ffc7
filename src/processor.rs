// Generic processor connection contract
// Every provider adapter exposes the same three operations and normalizes
// provider responses into the closed outcome types below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stripe::errors::StripeApiError;

/// Credentials forwarded verbatim to the provider as a bearer token.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyCredentials {
    #[serde(default)]
    pub account_id: String,
    pub api_key: String,
}

impl fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Raw card input. Only used to build a provider payment method.
#[derive(Clone)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cardholder_name: String,
    pub cvv: String,
}

impl CardDetails {
    /// Last four digits, the only part of the number safe to log.
    pub fn last4(&self) -> &str {
        let n = self.card_number.len();
        self.card_number.get(n.saturating_sub(4)..).unwrap_or("")
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &format_args!("****{}", self.last4()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cardholder_name", &self.cardholder_name)
            .field("cvv", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Amount in minor currency units.
    pub amount: u64,
    /// ISO 4217 alphabetic code.
    pub currency_code: String,
    pub payment_method: CardDetails,
    pub processor_config: ApiKeyCredentials,
}

#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub processor_transaction_id: String,
    pub processor_config: ApiKeyCredentials,
}

#[derive(Debug, Clone)]
pub struct CancelRequest {
    pub processor_transaction_id: String,
    pub processor_config: ApiKeyCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Authorized,
    Declined,
    Settled,
    Cancelled,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Authorized => "AUTHORIZED",
            TransactionStatus::Declined => "DECLINED",
            TransactionStatus::Settled => "SETTLED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    DoNotHonor,
    InsufficientFunds,
    Unknown,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::DoNotHonor => "DO_NOT_HONOR",
            DeclineReason::InsufficientFunds => "INSUFFICIENT_FUNDS",
            DeclineReason::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Authorized { processor_transaction_id: String },
    Declined { decline_reason: DeclineReason },
    Failed { error_message: String },
}

impl AuthorizationOutcome {
    pub fn status(&self) -> TransactionStatus {
        match self {
            AuthorizationOutcome::Authorized { .. } => TransactionStatus::Authorized,
            AuthorizationOutcome::Declined { .. } => TransactionStatus::Declined,
            AuthorizationOutcome::Failed { .. } => TransactionStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Settled,
    Failed { error_message: String },
}

impl CaptureOutcome {
    pub fn status(&self) -> TransactionStatus {
        match self {
            CaptureOutcome::Settled => TransactionStatus::Settled,
            CaptureOutcome::Failed { .. } => TransactionStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    Failed { error_message: String },
}

impl CancelOutcome {
    pub fn status(&self) -> TransactionStatus {
        match self {
            CancelOutcome::Cancelled => TransactionStatus::Cancelled,
            CancelOutcome::Failed { .. } => TransactionStatus::Failed,
        }
    }
}

/// The contract a host orchestrator requires from a processor adapter.
///
/// `Ok` carries provider-acknowledged results, declines and failures included.
/// `Err` is reserved for calls that never produced a structured answer
/// (transport failures, malformed bodies, failed setup steps).
#[async_trait]
pub trait ProcessorConnection: Send + Sync {
    fn name(&self) -> &'static str;

    fn website(&self) -> &'static str;

    fn configuration(&self) -> &ApiKeyCredentials;

    async fn authorize(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, StripeApiError>;

    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome, StripeApiError>;

    async fn cancel(&self, request: CancelRequest) -> Result<CancelOutcome, StripeApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str) -> CardDetails {
        CardDetails {
            card_number: number.to_string(),
            expiry_month: 4,
            expiry_year: 2030,
            cardholder_name: "Mr Foo Bar".to_string(),
            cvv: "020".to_string(),
        }
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = ApiKeyCredentials {
            account_id: "acct_123".to_string(),
            api_key: "sk_test_secret".to_string(),
        };
        let out = format!("{:?}", creds);
        assert!(out.contains("acct_123"));
        assert!(!out.contains("sk_test_secret"));

        let out = format!("{:?}", card("4111111111111111"));
        assert!(out.contains("****1111"));
        assert!(!out.contains("4111111111111111"));
        assert!(!out.contains("020"));
    }

    #[test]
    fn test_last4_short_number() {
        assert_eq!(card("42").last4(), "42");
        assert_eq!(card("").last4(), "");
    }

    #[test]
    fn test_outcome_status_names() {
        let auth = AuthorizationOutcome::Authorized {
            processor_transaction_id: "pi_1".to_string(),
        };
        assert_eq!(auth.status().to_string(), "AUTHORIZED");
        let declined = AuthorizationOutcome::Declined {
            decline_reason: DeclineReason::InsufficientFunds,
        };
        assert_eq!(declined.status(), TransactionStatus::Declined);
        assert_eq!(CaptureOutcome::Settled.status().as_str(), "SETTLED");
        assert_eq!(CancelOutcome::Cancelled.status().as_str(), "CANCELLED");
        let failed = CancelOutcome::Failed {
            error_message: "nope".to_string(),
        };
        assert_eq!(failed.status(), TransactionStatus::Failed);
        assert_eq!(DeclineReason::DoNotHonor.to_string(), "DO_NOT_HONOR");
    }
}
