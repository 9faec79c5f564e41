//! Authentication bootstrap for the smoke suite.
//!
//! Each fixture user is logged in exactly once before any check runs; the
//! resulting `Session` owns the bearer credential and the account id for the
//! whole run and is injected into every check that needs it.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::client::ApiClient;
use crate::fixture::FixtureUser;
use crate::token::{self, TokenError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login for '{username}' failed with status {status}: {body}")]
    LoginFailed {
        username: String,
        status: StatusCode,
        body: String,
    },
    #[error("Login response for '{username}' carried no token")]
    MissingToken { username: String },
    #[error("Token for '{username}' is not structurally valid: {source}")]
    MalformedToken {
        username: String,
        #[source]
        source: TokenError,
    },
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

#[derive(Deserialize, Debug)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Credentials established for one fixture user, shared by all checks in a
/// run. The harness never refreshes or revokes the token.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub user_id: String,
    token: String,
}

impl Session {
    /// Logs the fixture user in and gates the returned credential on
    /// structural validity before any dependent check may use it.
    pub async fn establish(client: &ApiClient, user: &FixtureUser) -> Result<Self, AuthError> {
        let response = client.login(&user.email, &user.password).await?;
        if !response.status.is_success() {
            return Err(AuthError::LoginFailed {
                username: user.username.clone(),
                status: response.status,
                body: response.body,
            });
        }

        let parsed: LoginResponse =
            serde_json::from_str(&response.body).unwrap_or(LoginResponse { token: None });
        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MissingToken {
                username: user.username.clone(),
            })?;

        let claims = token::decode_claims(&token).map_err(|source| AuthError::MalformedToken {
            username: user.username.clone(),
            source,
        })?;
        let user_id = claims
            .require_user_id()
            .map_err(|source| AuthError::MalformedToken {
                username: user.username.clone(),
                source,
            })?
            .to_string();

        info!(username = %user.username, %user_id, "session established");
        Ok(Self {
            username: user.username.clone(),
            user_id,
            token,
        })
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_token(claims: serde_json::Value) -> String {
        let encode =
            |v: &serde_json::Value| URL_SAFE_NO_PAD.encode(serde_json::to_vec(v).unwrap());
        format!(
            "{}.{}.c2ln",
            encode(&json!({"alg": "HS256", "typ": "JWT"})),
            encode(&claims)
        )
    }

    fn fixture() -> FixtureUser {
        FixtureUser::new("test_user1", "test_user1@example.com", "password123")
    }

    async fn client_for(server: &MockServer) -> ApiClient {
        let base_url = Url::parse(&server.uri()).unwrap();
        ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    async fn mount_login(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_establish_success() {
        let server = MockServer::start().await;
        let token = make_token(json!({"user_id": "u-1", "exp": 1999999999}));
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"token": token})),
        )
        .await;

        let client = client_for(&server).await;
        let session = Session::establish(&client, &fixture()).await.unwrap();

        assert_eq!(session.username, "test_user1");
        assert_eq!(session.user_id, "u-1");
        assert_eq!(session.bearer(), token);
    }

    #[tokio::test]
    async fn test_establish_rejects_failed_login() {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(401).set_body_string("bad credentials"),
        )
        .await;

        let client = client_for(&server).await;
        let err = Session::establish(&client, &fixture()).await.unwrap_err();
        match err {
            AuthError::LoginFailed { status, body, .. } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "bad credentials");
            }
            other => panic!("expected LoginFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_establish_rejects_missing_token() {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})),
        )
        .await;

        let client = client_for(&server).await;
        let err = Session::establish(&client, &fixture()).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken { .. }));
    }

    #[tokio::test]
    async fn test_establish_rejects_malformed_token() {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"token": "not-a-jwt"})),
        )
        .await;

        let client = client_for(&server).await;
        let err = Session::establish(&client, &fixture()).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken { .. }));
    }

    #[tokio::test]
    async fn test_establish_rejects_token_without_user_id() {
        let server = MockServer::start().await;
        let token = make_token(json!({"exp": 1999999999}));
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"token": token})),
        )
        .await;

        let client = client_for(&server).await;
        let err = Session::establish(&client, &fixture()).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::MalformedToken {
                source: TokenError::MissingUserId,
                ..
            }
        ));
    }
}
