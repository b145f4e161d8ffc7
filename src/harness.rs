// End-to-end sandbox scenarios for a processor connection.
//
// Each scenario prints a labeled banner. Authorization problems abort the
// whole run because every later step needs an authorized transaction.

use anyhow::{anyhow, Result};
use std::io::Write;
use tracing::error;

use crate::processor::{
    AuthorizationOutcome, AuthorizationRequest, CancelOutcome, CancelRequest, CaptureOutcome,
    CaptureRequest, CardDetails, DeclineReason, ProcessorConnection,
};
use crate::settings::HarnessSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Failed,
}

#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<(&'static str, Verdict)>,
}

impl Report {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|(_, v)| *v == Verdict::Pass)
    }
}

pub struct Harness<'a, W: Write> {
    conn: &'a dyn ProcessorConnection,
    settings: &'a HarnessSettings,
    out: W,
}

impl<'a, W: Write> Harness<'a, W> {
    pub fn new(conn: &'a dyn ProcessorConnection, settings: &'a HarnessSettings, out: W) -> Self {
        Self { conn, settings, out }
    }

    /// Runs authorization, capture, cancel and decline in order.
    /// `Err` means the run was aborted; the FAILED banner is already printed.
    pub async fn run(&mut self) -> Result<Report> {
        let mut report = Report::default();

        writeln!(self.out, "\n=== TEST: authorization ===")?;
        self.authorize_ok("authorization").await?;
        self.pass("authorization", &mut report)?;

        writeln!(self.out, "\n=== TEST: capture ===")?;
        let verdict = self.capture_scenario().await?;
        self.finish("capture", verdict, &mut report)?;

        writeln!(self.out, "\n=== TEST: cancel ===")?;
        let verdict = self.cancel_scenario().await?;
        self.finish("cancel", verdict, &mut report)?;

        writeln!(self.out, "\n=== TEST: decline ===")?;
        let verdict = self.decline_scenario().await?;
        self.finish("decline", verdict, &mut report)?;

        Ok(report)
    }

    fn card(&self, number: &str) -> CardDetails {
        CardDetails {
            card_number: number.to_string(),
            expiry_month: self.settings.expiry_month,
            expiry_year: self.settings.expiry_year,
            cardholder_name: self.settings.cardholder_name.clone(),
            cvv: self.settings.cvv.clone(),
        }
    }

    fn auth_request(&self, card: CardDetails) -> AuthorizationRequest {
        AuthorizationRequest {
            amount: self.settings.amount,
            currency_code: self.settings.currency_code.clone(),
            payment_method: card,
            processor_config: self.conn.configuration().clone(),
        }
    }

    fn pass(&mut self, test: &'static str, report: &mut Report) -> Result<()> {
        writeln!(self.out, "=== TEST: {test} === PASS ===\n")?;
        report.results.push((test, Verdict::Pass));
        Ok(())
    }

    fn finish(&mut self, test: &'static str, verdict: Verdict, report: &mut Report) -> Result<()> {
        match verdict {
            Verdict::Pass => self.pass(test, report),
            Verdict::Failed => {
                writeln!(self.out, "=== TEST: {test} === FAILED ===\n")?;
                report.results.push((test, verdict));
                Ok(())
            }
        }
    }

    fn abort(&mut self, test: &'static str, reason: String) -> anyhow::Error {
        let _ = writeln!(self.out, "{reason}");
        let _ = writeln!(self.out, "=== TEST: {test} === FAILED ===\n");
        error!(test = test, "{}", reason);
        anyhow!("{test}: {reason}")
    }

    // Authorize with the configured card; anything but AUTHORIZED aborts.
    async fn authorize_ok(&mut self, test: &'static str) -> Result<String> {
        writeln!(self.out, "Authorizing payment using \"{}\"", self.conn.name())?;
        let request = self.auth_request(self.card(&self.settings.card_number));
        let outcome = match self.conn.authorize(request).await {
            Ok(o) => o,
            Err(e) => return Err(self.abort(test, format!("Error while authorizing transaction: {e}"))),
        };
        writeln!(self.out, "Authorization request complete: \"{}\"", outcome.status())?;
        match outcome {
            AuthorizationOutcome::Authorized { processor_transaction_id } => Ok(processor_transaction_id),
            AuthorizationOutcome::Failed { error_message } => {
                Err(self.abort(test, format!("Authorization Request failed: {error_message}")))
            }
            AuthorizationOutcome::Declined { decline_reason } => {
                Err(self.abort(test, format!("Authorization was declined: {decline_reason}")))
            }
        }
    }

    async fn capture_scenario(&mut self) -> Result<Verdict> {
        let id = self.authorize_ok("capture").await?;
        writeln!(self.out, "Capturing authorized payment...")?;
        let request = CaptureRequest {
            processor_transaction_id: id,
            processor_config: self.conn.configuration().clone(),
        };
        let outcome = match self.conn.capture(request).await {
            Ok(o) => o,
            Err(e) => return Err(self.abort("capture", format!("Error while capturing transaction: {e}"))),
        };
        if outcome != CaptureOutcome::Settled {
            writeln!(
                self.out,
                "Expected transaction status to be \"SETTLED\" but received \"{}\"",
                outcome.status()
            )?;
            return Ok(Verdict::Failed);
        }
        Ok(Verdict::Pass)
    }

    async fn cancel_scenario(&mut self) -> Result<Verdict> {
        let id = self.authorize_ok("cancel").await?;
        writeln!(self.out, "Cancelling authorized payment...")?;
        let request = CancelRequest {
            processor_transaction_id: id,
            processor_config: self.conn.configuration().clone(),
        };
        let first = match self.conn.cancel(request.clone()).await {
            Ok(o) => o,
            Err(e) => return Err(self.abort("cancel", format!("Error while cancelling transaction: {e}"))),
        };
        if first != CancelOutcome::Cancelled {
            writeln!(
                self.out,
                "Expected transaction status to be \"CANCELLED\" but received \"{}\"",
                first.status()
            )?;
            return Ok(Verdict::Failed);
        }

        writeln!(self.out, "Cancelling the same payment again...")?;
        let second = match self.conn.cancel(request).await {
            Ok(o) => o,
            Err(e) => return Err(self.abort("cancel", format!("Error while cancelling transaction: {e}"))),
        };
        match second {
            CancelOutcome::Failed { error_message } => {
                writeln!(self.out, "Second cancel rejected: {error_message}")?;
                Ok(Verdict::Pass)
            }
            CancelOutcome::Cancelled => {
                writeln!(
                    self.out,
                    "Expected second cancel to be \"FAILED\" but received \"CANCELLED\""
                )?;
                Ok(Verdict::Failed)
            }
        }
    }

    async fn decline_scenario(&mut self) -> Result<Verdict> {
        writeln!(self.out, "Authorizing payment with a card that lacks funds...")?;
        let request = self.auth_request(self.card(&self.settings.decline_card_number));
        let outcome = match self.conn.authorize(request).await {
            Ok(o) => o,
            Err(e) => return Err(self.abort("decline", format!("Error while authorizing transaction: {e}"))),
        };
        writeln!(self.out, "Authorization request complete: \"{}\"", outcome.status())?;
        match outcome {
            AuthorizationOutcome::Declined {
                decline_reason: DeclineReason::InsufficientFunds,
            } => Ok(Verdict::Pass),
            AuthorizationOutcome::Declined { decline_reason } => {
                writeln!(
                    self.out,
                    "Expected decline reason \"INSUFFICIENT_FUNDS\" but received \"{decline_reason}\""
                )?;
                Ok(Verdict::Failed)
            }
            other => {
                writeln!(
                    self.out,
                    "Expected transaction status to be \"DECLINED\" but received \"{}\"",
                    other.status()
                )?;
                Ok(Verdict::Failed)
            }
        }
    }
}
