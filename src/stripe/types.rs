// Minimal Stripe DTOs
use serde::{Deserialize, Serialize};

use crate::processor::CardDetails;

// Form for POST /v1/payment_methods
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentMethodForm<'a> {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "card[number]")]
    pub card_number: &'a str,
    #[serde(rename = "card[exp_month]")]
    pub exp_month: u8,
    #[serde(rename = "card[exp_year]")]
    pub exp_year: u16,
    #[serde(rename = "card[cvc]")]
    pub cvc: &'a str,
}

impl<'a> CreatePaymentMethodForm<'a> {
    pub fn card(card: &'a CardDetails) -> Self {
        Self {
            type_: "card",
            card_number: &card.card_number,
            exp_month: card.expiry_month,
            exp_year: card.expiry_year,
            cvc: &card.cvv,
        }
    }
}

// Form for POST /v1/payment_intents
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentIntentForm<'a> {
    pub amount: u64,
    pub currency: &'a str,
    pub payment_method: &'a str,
    pub capture_method: &'static str,
}

impl<'a> CreatePaymentIntentForm<'a> {
    pub fn manual_capture(amount: u64, currency: &'a str, payment_method: &'a str) -> Self {
        Self {
            amount,
            currency,
            payment_method,
            capture_method: "manual",
        }
    }
}

// PaymentMethod minimal shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
}

// PaymentIntent minimal shape; confirm/capture/cancel all return one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_form_encoding() {
        let card = CardDetails {
            card_number: "4111111111111111".to_string(),
            expiry_month: 4,
            expiry_year: 2030,
            cardholder_name: "Mr Foo Bar".to_string(),
            cvv: "020".to_string(),
        };
        let body = serde_urlencoded::to_string(CreatePaymentMethodForm::card(&card)).unwrap();
        assert_eq!(
            body,
            "type=card&card%5Bnumber%5D=4111111111111111&card%5Bexp_month%5D=4\
             &card%5Bexp_year%5D=2030&card%5Bcvc%5D=020"
        );
    }

    #[test]
    fn test_payment_intent_form_encoding() {
        let form = CreatePaymentIntentForm::manual_capture(1000, "GBP", "pm_123");
        let body = serde_urlencoded::to_string(form).unwrap();
        assert_eq!(body, "amount=1000&currency=GBP&payment_method=pm_123&capture_method=manual");
    }

    #[test]
    fn test_payment_intent_ignores_extra_fields() {
        let pi: PaymentIntent = serde_json::from_str(
            r#"{"id":"pi_1","object":"payment_intent","status":"requires_capture","amount":1000}"#,
        )
        .unwrap();
        assert_eq!(pi.id, "pi_1");
        assert_eq!(pi.status.as_deref(), Some("requires_capture"));
    }
}
