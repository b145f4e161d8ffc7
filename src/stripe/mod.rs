// Stripe provider module

pub mod errors;
pub mod rest;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::processor::{
    ApiKeyCredentials, AuthorizationOutcome, AuthorizationRequest, CancelOutcome, CancelRequest,
    CaptureOutcome, CaptureRequest, ProcessorConnection,
};
use crate::settings::StripeSettings;
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use self::errors::{StripeApiError, StripeErrorEnvelope};
use self::rest::StripeRestClient;
use self::types::PaymentIntent;

#[derive(Clone)]
pub struct StripeConnection {
    pub(crate) rest: StripeRestClient,
    pub(crate) configuration: ApiKeyCredentials,
}

impl StripeConnection {
    // Build the reqwest transport with the configured timeout.
    pub fn new(cfg: &StripeSettings) -> Result<Self, StripeApiError> {
        let timeout = Duration::from_millis(if cfg.timeout_ms > 0 { cfg.timeout_ms } else { 15_000 });
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(cfg, Arc::new(transport)))
    }

    pub fn with_transport(cfg: &StripeSettings, transport: Arc<dyn HttpTransport>) -> Self {
        let rest = StripeRestClient::new(transport)
            .with_api_base(cfg.api_base.clone())
            .with_version(if cfg.stripe_version.is_empty() { None } else { Some(cfg.stripe_version.clone()) });
        Self {
            rest,
            configuration: ApiKeyCredentials {
                account_id: cfg.account_id.clone(),
                api_key: cfg.api_key.clone(),
            },
        }
    }

    fn map_confirm(resp: &HttpResponse) -> Result<AuthorizationOutcome, StripeApiError> {
        match resp.status_code {
            200 => {
                let intent: PaymentIntent = serde_json::from_str(&resp.response_text)
                    .map_err(|e| StripeApiError::Decode(format!("confirm payment intent: {e}")))?;
                Ok(AuthorizationOutcome::Authorized {
                    processor_transaction_id: intent.id,
                })
            }
            400..=499 => {
                let env = StripeErrorEnvelope::parse(&resp.response_text)?;
                Ok(AuthorizationOutcome::Declined {
                    decline_reason: env.decline_reason(),
                })
            }
            _ => Ok(AuthorizationOutcome::Failed {
                error_message: resp.response_text.clone(),
            }),
        }
    }

    // Non-200 capture/cancel answers carry the provider's error.message.
    fn error_message(resp: &HttpResponse) -> Result<String, StripeApiError> {
        let env = StripeErrorEnvelope::parse(&resp.response_text)?;
        Ok(env.error.message.unwrap_or_else(|| resp.response_text.clone()))
    }
}

#[async_trait]
impl ProcessorConnection for StripeConnection {
    fn name(&self) -> &'static str {
        "STRIPE"
    }

    fn website(&self) -> &'static str {
        "stripe.com"
    }

    fn configuration(&self) -> &ApiKeyCredentials {
        &self.configuration
    }

    #[instrument(skip_all, fields(amount = request.amount, currency = %request.currency_code))]
    async fn authorize(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, StripeApiError> {
        let creds = &request.processor_config;

        // Setup steps are not normalized: any failure here is raised.
        let payment_method_id = self
            .rest
            .create_payment_method(creds, &request.payment_method)
            .await?;
        let intent_id = self
            .rest
            .create_payment_intent(creds, request.amount, &request.currency_code, &payment_method_id)
            .await?;

        let resp = self.rest.confirm_payment_intent(creds, &intent_id).await?;
        let outcome = Self::map_confirm(&resp)?;
        match &outcome {
            AuthorizationOutcome::Authorized { processor_transaction_id } => {
                info!(intent_id = %processor_transaction_id, "payment intent authorized");
            }
            AuthorizationOutcome::Declined { decline_reason } => {
                warn!(intent_id = %intent_id, status = resp.status_code, decline_reason = %decline_reason, "payment intent declined");
            }
            AuthorizationOutcome::Failed { .. } => {
                warn!(intent_id = %intent_id, status = resp.status_code, "payment intent confirmation failed");
            }
        }
        Ok(outcome)
    }

    #[instrument(skip_all, fields(intent_id = %request.processor_transaction_id))]
    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome, StripeApiError> {
        let resp = self
            .rest
            .capture_payment_intent(&request.processor_config, &request.processor_transaction_id)
            .await?;
        if resp.status_code == 200 {
            info!("payment intent captured");
            return Ok(CaptureOutcome::Settled);
        }
        let error_message = Self::error_message(&resp)?;
        warn!(status = resp.status_code, error = %error_message, "capture failed");
        Ok(CaptureOutcome::Failed { error_message })
    }

    #[instrument(skip_all, fields(intent_id = %request.processor_transaction_id))]
    async fn cancel(&self, request: CancelRequest) -> Result<CancelOutcome, StripeApiError> {
        let resp = self
            .rest
            .cancel_payment_intent(&request.processor_config, &request.processor_transaction_id)
            .await?;
        if resp.status_code == 200 {
            info!("payment intent cancelled");
            return Ok(CancelOutcome::Cancelled);
        }
        let error_message = Self::error_message(&resp)?;
        warn!(status = resp.status_code, error = %error_message, "cancel failed");
        Ok(CancelOutcome::Failed { error_message })
    }
}
