use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::fixture::FixtureUser;

/// Outcome of a fixture registration attempt. Setup is idempotent, so
/// `Created` and `AlreadyExists` are both acceptable; anything else is
/// surfaced for diagnosis without failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    AlreadyExists,
    Unexpected { status: StatusCode, body: String },
}

/// Status and body of a service response, kept raw so checks can report
/// expected-vs-actual mismatches with the full payload.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Ok(Self { status, body })
    }
}

/// A text message record as returned by the listing endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct TextMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A voice message record; the audio itself lives behind `file_url`.
#[derive(Deserialize, Debug, Clone)]
pub struct VoiceMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub file_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Client for the messaging-service HTTP API.
///
/// Every authenticated call carries `Authorization: Bearer <token>`. Requests
/// share one configured timeout and are never retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    /// `POST /users`: 201 created, 409 already exists.
    pub async fn register_user(&self, user: &FixtureUser) -> Result<RegisterOutcome> {
        let response = self
            .client
            .post(self.endpoint("users"))
            .json(user)
            .send()
            .await
            .with_context(|| format!("Failed to send registration for '{}'", user.username))?;

        let ApiResponse { status, body } = ApiResponse::read(response).await?;
        debug!(username = %user.username, %status, "register_user");
        Ok(match status {
            StatusCode::CREATED => RegisterOutcome::Created,
            StatusCode::CONFLICT => RegisterOutcome::AlreadyExists,
            _ => RegisterOutcome::Unexpected { status, body },
        })
    }

    /// `POST /login`: 200 with body `{"token": ...}` on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse> {
        let response = self
            .client
            .post(self.endpoint("login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .with_context(|| format!("Failed to send login request for '{email}'"))?;
        ApiResponse::read(response).await
    }

    /// `GET /users/{id}`
    pub async fn get_user(&self, token: &str, user_id: &str) -> Result<ApiResponse> {
        let url = self.endpoint(&format!("users/{user_id}"));
        self.get_authed(token, url, "profile fetch").await
    }

    /// `POST /messages/text`
    pub async fn send_text_message(
        &self,
        token: &str,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
    ) -> Result<ApiResponse> {
        let payload = json!({
            "sender_id": sender_id,
            "receiver_id": receiver_id,
            "content": content,
        });
        let response = self
            .client
            .post(self.endpoint("messages/text"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .context("Failed to send text message request")?;
        ApiResponse::read(response).await
    }

    /// `GET /messages/text?sender_id=&receiver_id=`
    pub async fn list_text_messages(
        &self,
        token: &str,
        sender_id: &str,
        receiver_id: &str,
    ) -> Result<ApiResponse> {
        let mut url = self.endpoint("messages/text");
        url.query_pairs_mut()
            .append_pair("sender_id", sender_id)
            .append_pair("receiver_id", receiver_id);
        self.get_authed(token, url, "text message listing").await
    }

    /// `POST /messages/voice`: multipart form; the sender is implied by the
    /// credential, only the receiver travels as a form field.
    pub async fn send_voice_message(
        &self,
        token: &str,
        receiver_id: &str,
        file_name: &str,
        audio: Vec<u8>,
    ) -> Result<ApiResponse> {
        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/ogg")
            .context("Invalid voice attachment mime type")?;
        let form = multipart::Form::new()
            .text("receiver_id", receiver_id.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("messages/voice"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .context("Failed to send voice message request")?;
        ApiResponse::read(response).await
    }

    /// `GET /messages/voice?sender_id=&receiver_id=`
    pub async fn list_voice_messages(
        &self,
        token: &str,
        sender_id: &str,
        receiver_id: &str,
    ) -> Result<ApiResponse> {
        let mut url = self.endpoint("messages/voice");
        url.query_pairs_mut()
            .append_pair("sender_id", sender_id)
            .append_pair("receiver_id", receiver_id);
        self.get_authed(token, url, "voice message listing").await
    }

    /// `POST /users/{id}/deactivate`
    pub async fn deactivate_user(&self, token: &str, user_id: &str) -> Result<ApiResponse> {
        self.post_authed(token, &format!("users/{user_id}/deactivate"))
            .await
    }

    /// `POST /users/{id}/activate`
    pub async fn activate_user(&self, token: &str, user_id: &str) -> Result<ApiResponse> {
        self.post_authed(token, &format!("users/{user_id}/activate"))
            .await
    }

    async fn get_authed(&self, token: &str, url: Url, what: &str) -> Result<ApiResponse> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request"))?;
        ApiResponse::read(response).await
    }

    async fn post_authed(&self, token: &str, path: &str) -> Result<ApiResponse> {
        let url = self.endpoint(path);
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url.path()))?;
        ApiResponse::read(response).await
    }
}
