// Stripe REST client
// Builds form-encoded POSTs with bearer auth and runs them through the transport.
// Single attempt per call: no retries anywhere.

use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument};

use crate::processor::{ApiKeyCredentials, CardDetails};
use crate::stripe::errors::StripeApiError;
use crate::stripe::types::{
    CreatePaymentIntentForm, CreatePaymentMethodForm, PaymentIntent, PaymentMethod,
};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Clone)]
pub struct StripeRestClient {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) api_base: String,
    pub(crate) stripe_version: Option<String>,
}

impl StripeRestClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_base: STRIPE_API_BASE.to_string(),
            stripe_version: None,
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        if !base.is_empty() {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_version(mut self, ver: impl Into<Option<String>>) -> Self {
        self.stripe_version = ver.into();
        self
    }

    fn common_headers(&self, creds: &ApiKeyCredentials) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Authorization".to_string(), format!("Bearer {}", creds.api_key)),
            (
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ),
        ];
        if let Some(v) = &self.stripe_version {
            if !v.is_empty() {
                headers.push(("Stripe-Version".to_string(), v.clone()));
            }
        }
        if !creds.account_id.is_empty() {
            headers.push(("Stripe-Account".to_string(), creds.account_id.clone()));
        }
        headers
    }

    async fn post<F: Serialize>(
        &self,
        path: &str,
        creds: &ApiKeyCredentials,
        form: Option<F>,
    ) -> Result<HttpResponse, StripeApiError> {
        let body = form
            .map(|f| serde_urlencoded::to_string(f))
            .transpose()
            .map_err(|e| StripeApiError::Decode(format!("form encoding: {e}")))?;
        let url = format!("{}{}", self.api_base, path);
        let request = HttpRequest {
            method: Method::Post,
            headers: self.common_headers(creds),
            body,
        };
        let resp = self.transport.request(&url, request).await?;
        info!(
            target: "stripe",
            method = "POST",
            path = %path,
            status = resp.status_code,
            "stripe response"
        );
        Ok(resp)
    }

    // Parse the body without looking at the status; an error envelope has no
    // `id` and therefore fails to decode.
    fn parse_created<T: DeserializeOwned>(what: &str, resp: &HttpResponse) -> Result<T, StripeApiError> {
        serde_json::from_str::<T>(&resp.response_text).map_err(|e| {
            StripeApiError::Decode(format!(
                "{what}: status={} error={e} body={}",
                resp.status_code, resp.response_text
            ))
        })
    }

    // POST /v1/payment_methods
    #[instrument(skip_all, fields(method="POST", path="/v1/payment_methods", card_last4=%card.last4()))]
    pub async fn create_payment_method(
        &self,
        creds: &ApiKeyCredentials,
        card: &CardDetails,
    ) -> Result<String, StripeApiError> {
        info!(
            target: "stripe",
            method = "POST",
            path = "/v1/payment_methods",
            "stripe request"
        );
        let resp = self
            .post("/v1/payment_methods", creds, Some(CreatePaymentMethodForm::card(card)))
            .await?;
        let pm: PaymentMethod = Self::parse_created("create payment method", &resp)?;
        Ok(pm.id)
    }

    // POST /v1/payment_intents
    // Manual capture keeps the intent in requires_capture after confirmation.
    #[instrument(skip(self, creds), fields(method="POST", path="/v1/payment_intents"))]
    pub async fn create_payment_intent(
        &self,
        creds: &ApiKeyCredentials,
        amount: u64,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<String, StripeApiError> {
        info!(
            target: "stripe",
            method = "POST",
            path = "/v1/payment_intents",
            amount = amount,
            currency = %currency,
            "stripe request"
        );
        let form = CreatePaymentIntentForm::manual_capture(amount, currency, payment_method_id);
        let resp = self.post("/v1/payment_intents", creds, Some(form)).await?;
        let pi: PaymentIntent = Self::parse_created("create payment intent", &resp)?;
        Ok(pi.id)
    }

    // POST /v1/payment_intents/{id}/confirm
    #[instrument(skip(self, creds), fields(method="POST", path="/v1/payment_intents/{id}/confirm"))]
    pub async fn confirm_payment_intent(
        &self,
        creds: &ApiKeyCredentials,
        intent_id: &str,
    ) -> Result<HttpResponse, StripeApiError> {
        self.intent_action(creds, intent_id, "confirm").await
    }

    // POST /v1/payment_intents/{id}/capture
    #[instrument(skip(self, creds), fields(method="POST", path="/v1/payment_intents/{id}/capture"))]
    pub async fn capture_payment_intent(
        &self,
        creds: &ApiKeyCredentials,
        intent_id: &str,
    ) -> Result<HttpResponse, StripeApiError> {
        self.intent_action(creds, intent_id, "capture").await
    }

    // POST /v1/payment_intents/{id}/cancel
    #[instrument(skip(self, creds), fields(method="POST", path="/v1/payment_intents/{id}/cancel"))]
    pub async fn cancel_payment_intent(
        &self,
        creds: &ApiKeyCredentials,
        intent_id: &str,
    ) -> Result<HttpResponse, StripeApiError> {
        self.intent_action(creds, intent_id, "cancel").await
    }

    async fn intent_action(
        &self,
        creds: &ApiKeyCredentials,
        intent_id: &str,
        action: &str,
    ) -> Result<HttpResponse, StripeApiError> {
        info!(
            target: "stripe",
            method = "POST",
            path = %format!("/v1/payment_intents/{{id}}/{action}"),
            intent_id = %intent_id,
            "stripe request"
        );
        let path = format!("/v1/payment_intents/{}/{}", intent_id, action);
        self.post::<()>(&path, creds, None).await
    }
}
