//! HTTP client for the member login endpoint.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::validator::Credentials;

use super::{AuthError, AuthToken};

/// Path of the login endpoint, relative to the configured base URL
const LOGIN_PATH: &str = "/api/member/login";

/// Network boundary converting credentials into a session token.
///
/// `AuthClient` is the `Send` variant used by the login controller, which runs
/// each exchange as a spawned task. Implement it directly; `LocalAuthClient`
/// is derived for free.
#[trait_variant::make(AuthClient: Send)]
pub trait LocalAuthClient {
    async fn exchange(&self, credentials: &Credentials) -> Result<AuthToken, AuthError>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "memberId")]
    member_id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// reqwest-backed `AuthClient`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpAuthClient {
    client: Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::from_status(status, &body))
        }
    }
}

impl AuthClient for HttpAuthClient {
    async fn exchange(&self, credentials: &Credentials) -> Result<AuthToken, AuthError> {
        let url = self.login_url();
        debug!(url = %url, identifier = %credentials.identifier, "Sending login request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest {
                member_id: &credentials.identifier,
                password: &credentials.secret,
            })
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let body: LoginResponse = response.json().await.map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })?;

        match body.token {
            Some(token) if !token.is_empty() => Ok(AuthToken::new(token)),
            _ => {
                warn!("Login response did not contain a token");
                Err(AuthError::InvalidResponse("Missing token in login response".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthClient, AuthError, Credentials, Duration, HttpAuthClient};
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpAuthClient {
        HttpAuthClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_login_url_trims_trailing_slash() {
        let client = HttpAuthClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.login_url(), "http://localhost:8080/api/member/login");
    }

    #[tokio::test]
    async fn test_exchange_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/member/login"))
            .and(header_matcher("content-type", "application/json"))
            .and(body_json(json!({ "memberId": "alice", "password": "correct123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok_abc" })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server)
            .exchange(&Credentials::new("alice", "correct123"))
            .await
            .unwrap();
        assert_eq!(token, "tok_abc");
    }

    #[tokio::test]
    async fn test_exchange_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/member/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange(&Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_exchange_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange(&Credentials::new("alice", "correct123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ServerError(ref body) if body == "maintenance"));
    }

    #[tokio::test]
    async fn test_exchange_missing_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange(&Credentials::new("alice", "correct123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_exchange_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "token": "late" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = client
            .exchange(&Credentials::new("alice", "correct123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Network(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_exchange_connection_refused() {
        let client = HttpAuthClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client
            .exchange(&Credentials::new("alice", "correct123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
    }
}
