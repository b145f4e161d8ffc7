use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::stripe::rest::STRIPE_API_BASE;

#[derive(Clone, Deserialize, Serialize)]
pub struct StripeSettings {
    pub api_key: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub stripe_version: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_stripe_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StripeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            account_id: String::new(),
            stripe_version: String::new(),
            api_base: default_api_base(),
            timeout_ms: default_stripe_timeout_ms(),
        }
    }
}

impl std::fmt::Debug for StripeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSettings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("account_id", &self.account_id)
            .field("stripe_version", &self.stripe_version)
            .field("api_base", &self.api_base)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Inputs for the sandbox run. Defaults are Stripe test cards.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HarnessSettings {
    pub amount: u64,
    pub currency_code: String,
    pub card_number: String,
    // 4000000000009995 declines with insufficient_funds
    pub decline_card_number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cardholder_name: String,
    pub cvv: String,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            amount: 1000,
            currency_code: "GBP".to_string(),
            card_number: "4111111111111111".to_string(),
            decline_card_number: "4000000000009995".to_string(),
            expiry_month: 4,
            expiry_year: 2030,
            cardholder_name: "Mr Foo Bar".to_string(),
            cvv: "020".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub stripe: StripeSettings,
    #[serde(default)]
    pub harness: HarnessSettings,
}

impl Config {
    /// Load from config.toml (if present) and environment variables.
    /// Environment variables override file values.
    /// Supported env keys: STRIPE_API_KEY, STRIPE_ACCOUNT_ID, STRIPE_VERSION,
    /// STRIPE_API_BASE, STRIPE_TIMEOUT_MS, HARNESS_AMOUNT, HARNESS_CURRENCY,
    /// HARNESS_CARD_NUMBER, HARNESS_DECLINE_CARD_NUMBER, HARNESS_EXPIRY_MONTH,
    /// HARNESS_EXPIRY_YEAR, HARNESS_CARDHOLDER_NAME, HARNESS_CVV
    pub fn load() -> Result<Self, figment::Error> {
        let mut cfg = Self::from_file(Path::new("config.toml"))?;
        cfg.overlay_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Defaults merged with the given TOML file, if it exists.
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        let mut fig = Figment::from(Serialized::defaults(Config::default()));
        if path.exists() {
            fig = fig.merge(Toml::file(path));
        }
        fig.extract()
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()
    }

    pub fn overlay_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("STRIPE_API_KEY") {
            self.stripe.api_key = v;
        }
        if let Some(v) = lookup("STRIPE_ACCOUNT_ID") {
            self.stripe.account_id = v;
        }
        if let Some(v) = lookup("STRIPE_VERSION") {
            self.stripe.stripe_version = v;
        }
        if let Some(v) = lookup("STRIPE_API_BASE") {
            self.stripe.api_base = v;
        }
        if let Some(v) = lookup("STRIPE_TIMEOUT_MS") {
            self.stripe.timeout_ms = v.parse().unwrap_or(self.stripe.timeout_ms);
        }
        if let Some(v) = lookup("HARNESS_AMOUNT") {
            self.harness.amount = v.parse().unwrap_or(self.harness.amount);
        }
        if let Some(v) = lookup("HARNESS_CURRENCY") {
            self.harness.currency_code = v;
        }
        if let Some(v) = lookup("HARNESS_CARD_NUMBER") {
            self.harness.card_number = v;
        }
        if let Some(v) = lookup("HARNESS_DECLINE_CARD_NUMBER") {
            self.harness.decline_card_number = v;
        }
        if let Some(v) = lookup("HARNESS_EXPIRY_MONTH") {
            self.harness.expiry_month = v.parse().unwrap_or(self.harness.expiry_month);
        }
        if let Some(v) = lookup("HARNESS_EXPIRY_YEAR") {
            self.harness.expiry_year = v.parse().unwrap_or(self.harness.expiry_year);
        }
        if let Some(v) = lookup("HARNESS_CARDHOLDER_NAME") {
            self.harness.cardholder_name = v;
        }
        if let Some(v) = lookup("HARNESS_CVV") {
            self.harness.cvv = v;
        }
    }
}

fn default_api_base() -> String {
    STRIPE_API_BASE.to_string()
}

fn default_stripe_timeout_ms() -> u64 {
    15_000
}
