//! The ordered smoke sequence against a live messaging service.
//!
//! Registration and authentication form the setup phase; any failure there
//! halts the run because every check depends on valid credentials. The
//! checks themselves are assertions: a status mismatch is recorded in the
//! report and the remaining checks still execute.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{ApiClient, ApiResponse, RegisterOutcome, TextMessage};
use crate::config::Config;
use crate::report::{CheckOutcome, RunReport};
use crate::session::Session;

pub struct SmokeSuite {
    client: ApiClient,
    config: Config,
}

impl SmokeSuite {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(config.server.base_url.clone(), config.server.timeout)?;
        Ok(Self { client, config })
    }

    /// Registers every configured fixture. `Created` and `AlreadyExists` are
    /// both acceptable outcomes; anything else is logged and reported back
    /// without aborting, so a flaky registration cannot strand the fixtures.
    pub async fn register_fixtures(&self) -> Result<Vec<(String, RegisterOutcome)>> {
        let mut outcomes = Vec::with_capacity(self.config.fixtures.len());
        for user in &self.config.fixtures {
            let outcome = self.client.register_user(user).await?;
            match &outcome {
                RegisterOutcome::Created => {
                    info!(username = %user.username, "fixture user registered")
                }
                RegisterOutcome::AlreadyExists => {
                    info!(username = %user.username, "fixture user already exists")
                }
                RegisterOutcome::Unexpected { status, body } => {
                    warn!(username = %user.username, %status, %body, "unexpected registration response")
                }
            }
            outcomes.push((user.username.clone(), outcome));
        }
        Ok(outcomes)
    }

    /// Runs setup and the full check sequence, returning the report.
    ///
    /// The order is load-bearing: the message checks depend on the two
    /// bootstrap identities, and deactivate must precede activate so the
    /// fixture account is left active for the next run.
    pub async fn run(&self) -> Result<RunReport> {
        self.register_fixtures()
            .await
            .context("Fixture registration failed")?;

        let sender = Session::establish(&self.client, self.config.sender()).await?;
        let receiver = Session::establish(&self.client, self.config.receiver()).await?;

        let mut report = RunReport::default();

        record(
            &mut report,
            "get user info",
            StatusCode::OK,
            self.client.get_user(sender.bearer(), &sender.user_id).await,
        );

        let content = format!("Hello from hubsmoke {}", Uuid::new_v4());
        record(
            &mut report,
            "send text message",
            StatusCode::OK,
            self.client
                .send_text_message(sender.bearer(), &sender.user_id, &receiver.user_id, &content)
                .await,
        );

        let listing = self
            .client
            .list_text_messages(sender.bearer(), &sender.user_id, &receiver.user_id)
            .await;
        if let Ok(response) = &listing {
            if response.status == StatusCode::OK {
                if let Ok(messages) = serde_json::from_str::<Vec<TextMessage>>(&response.body) {
                    debug!(count = messages.len(), "text messages between fixtures");
                }
            }
        }
        record(&mut report, "list text messages", StatusCode::OK, listing);

        record(
            &mut report,
            "send voice message",
            StatusCode::OK,
            self.client
                .send_voice_message(sender.bearer(), &receiver.user_id, "probe.ogg", probe_audio())
                .await,
        );

        record(
            &mut report,
            "list voice messages",
            StatusCode::OK,
            self.client
                .list_voice_messages(sender.bearer(), &sender.user_id, &receiver.user_id)
                .await,
        );

        // Negative path: an id no registration can have produced
        let missing_id = Uuid::new_v4().to_string();
        record(
            &mut report,
            "get missing user",
            StatusCode::NOT_FOUND,
            self.client.get_user(sender.bearer(), &missing_id).await,
        );

        record(
            &mut report,
            "deactivate user",
            StatusCode::OK,
            self.client
                .deactivate_user(sender.bearer(), &sender.user_id)
                .await,
        );

        record(
            &mut report,
            "activate user",
            StatusCode::OK,
            self.client
                .activate_user(sender.bearer(), &sender.user_id)
                .await,
        );

        info!(
            total = report.total(),
            failed = report.failed_count(),
            "smoke run complete"
        );
        Ok(report)
    }
}

fn record(report: &mut RunReport, name: &str, expected: StatusCode, result: Result<ApiResponse>) {
    match result {
        Ok(response) => report.record(CheckOutcome::from_response(name, expected, &response)),
        Err(err) => {
            warn!(check = name, error = %err, "request failed before a response arrived");
            report.record(CheckOutcome::transport_failure(name, expected, &format!("{err:#}")));
        }
    }
}

// Minimal Ogg-flavored payload; the service stores the bytes opaquely.
fn probe_audio() -> Vec<u8> {
    let mut audio = b"OggS".to_vec();
    audio.resize(64, 0);
    audio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_audio_has_capture_header() {
        let audio = probe_audio();
        assert!(audio.starts_with(b"OggS"));
        assert_eq!(audio.len(), 64);
    }

    #[test]
    fn test_record_transport_failure_keeps_going() {
        let mut report = RunReport::default();
        record(
            &mut report,
            "send text message",
            StatusCode::OK,
            Err(anyhow::anyhow!("connection refused")),
        );
        assert_eq!(report.total(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(
            report.failures().next().unwrap().body.as_deref().unwrap().contains("connection refused")
        );
    }
}
