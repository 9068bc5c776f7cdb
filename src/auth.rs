//! Service-account authentication against Google's OAuth2 token endpoint.
//!
//! Credentials come from the standard service-account key JSON, either inline
//! (`SERVICE_ACCOUNT_JSON`) or from a key file (`SERVICE_ACCOUNT_FILE`, defaulting to
//! `service_account.json` in the working directory). A signed RS256 assertion is exchanged
//! for a bearer token at the credential's `token_uri`; tokens are cached until shortly
//! before expiry.

use crate::config::get_config;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::RwLock;

/// Read-only scopes required to list Drive folders and fetch Docs content.
const SCOPES: &str = "https://www.googleapis.com/auth/drive.readonly https://www.googleapis.com/auth/documents.readonly";

/// Fallback key file path, matching the conventional local layout.
const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "service_account.json";

/// Tokens are refreshed this long before their reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Errors raised while acquiring Google access tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Key file could not be read from disk.
    #[error("Failed to read service account key file {path}: {source}")]
    KeyFile {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Credential JSON did not match the expected service-account shape.
    #[error("Malformed service account credentials: {0}")]
    MalformedCredentials(#[from] serde_json::Error),
    /// Assertion could not be signed with the credential's private key.
    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    /// HTTP layer failed before receiving a token response.
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Token endpoint rejected the assertion.
    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange {
        /// HTTP status returned from the token endpoint.
        status: reqwest::StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// System clock reported a time before the Unix epoch.
    #[error("System clock is set before the Unix epoch")]
    Clock,
}

/// Fields consumed from the service-account key JSON.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    /// Service-account email, used as the JWT issuer.
    client_email: String,
    /// RSA private key in PEM format.
    private_key: String,
    /// OAuth2 endpoint where the assertion is exchanged.
    token_uri: String,
}

/// Claims carried by the signed assertion, per Google's two-legged OAuth flow.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Token source backed by a Google service account.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Parse credentials from inline key JSON.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let key: ServiceAccountKey = serde_json::from_str(json)?;
        let config = get_config();
        let client = Client::builder()
            .user_agent("transcriptd/1.0")
            .timeout(Duration::from_secs(config.upstream_timeout_secs()))
            .build()?;
        tracing::debug!(
            client_email = %key.client_email,
            token_uri = %key.token_uri,
            "Loaded service account credentials"
        );
        Ok(Self {
            key,
            client,
            cached: RwLock::new(None),
        })
    }

    /// Read credentials from a key file on disk.
    pub async fn from_file(path: &str) -> Result<Self, AuthError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AuthError::KeyFile {
                path: path.to_string(),
                source,
            })?;
        Self::from_json(&content)
    }

    /// Resolve credentials from configuration: inline JSON first, then the key file.
    pub async fn from_config() -> Result<Self, AuthError> {
        let config = get_config();
        if let Some(json) = &config.service_account_json {
            return Self::from_json(json);
        }
        let path = config
            .service_account_file
            .as_deref()
            .unwrap_or(DEFAULT_SERVICE_ACCOUNT_FILE);
        Self::from_file(path).await
    }

    /// Return a valid bearer token, exchanging a fresh assertion when the cache is stale.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref()
                && entry.expires_at > SystemTime::now() + REFRESH_MARGIN
            {
                return Ok(entry.token.clone());
            }
        }

        let (token, expires_in) = self.exchange_assertion().await?;

        {
            let mut cached = self.cached.write().await;
            *cached = Some(CachedToken {
                token: token.clone(),
                expires_at: SystemTime::now() + Duration::from_secs(expires_in),
            });
        }

        Ok(token)
    }

    /// Sign a JWT assertion and exchange it for a bearer token.
    async fn exchange_assertion(&self) -> Result<(String, u64), AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Clock)?
            .as_secs();

        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SCOPES.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };

        let header = Header::new(Algorithm::RS256);
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = encode(&header, &claims, &signing_key)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &assertion),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = AuthError::TokenExchange { status, body };
            tracing::error!(error = %error, "Token exchange failed");
            return Err(error);
        }

        let payload: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = payload.expires_in, "Access token issued");
        Ok((payload.access_token, payload.expires_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG, Config};
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    const TEST_KEY_PEM: &str = include_str!("../tests/fixtures/test_key.pem");

    fn ensure_test_config() {
        let _ = CONFIG.set(Config {
            service_account_json: None,
            service_account_file: None,
            drive_api_url: None,
            docs_api_url: None,
            server_port: None,
            fetch_concurrency: None,
            upstream_timeout_secs: None,
        });
    }

    fn credentials_json(token_uri: &str) -> String {
        json!({
            "type": "service_account",
            "client_email": "reader@project.iam.gserviceaccount.com",
            "private_key": TEST_KEY_PEM,
            "token_uri": token_uri,
        })
        .to_string()
    }

    #[test]
    fn rejects_malformed_credentials() {
        ensure_test_config();
        let result = ServiceAccountAuth::from_json("{\"client_email\": \"only\"}");
        assert!(matches!(result, Err(AuthError::MalformedCredentials(_))));
    }

    #[tokio::test]
    async fn exchanges_assertion_and_caches_token() {
        ensure_test_config();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body_contains("grant_type=urn")
                    .body_contains("assertion=");
                then.status(200).json_body(json!({
                    "access_token": "token-1",
                    "expires_in": 3600,
                    "token_type": "Bearer"
                }));
            })
            .await;

        let auth = ServiceAccountAuth::from_json(&credentials_json(&server.url("/token")))
            .expect("credentials");

        let first = auth.access_token().await.expect("first token");
        let second = auth.access_token().await.expect("cached token");

        assert_eq!(first, "token-1");
        assert_eq!(second, "token-1");
        // second call must be served from the cache
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn surfaces_token_endpoint_rejection() {
        ensure_test_config();
        let server = MockServer::start_async().await;
        let _mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401).body("invalid_grant");
            })
            .await;

        let auth = ServiceAccountAuth::from_json(&credentials_json(&server.url("/token")))
            .expect("credentials");

        let error = auth.access_token().await.expect_err("rejection");
        assert!(matches!(
            error,
            AuthError::TokenExchange { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED
        ));
    }
}
