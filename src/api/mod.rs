//! HTTP client for the EcoTrack API.
//!
//! Every outbound call goes through one dispatch path: the current bearer
//! credential is attached when present, and the response status is
//! classified identically regardless of which endpoint was called. A `401`
//! clears the session through the store before the error reaches the
//! caller, so no request ever proceeds on a known-invalid credential.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use url::Url;

pub mod error;
pub mod types;

use crate::api::error::ApiError;
use crate::api::types::{
    FieldError, IndicatorQuery, LoginRequest, LoginResponse, Page, TrendResponse, User,
};
use crate::session::{Session, SessionStore};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Matches the deployment's gateway timeout; a request that exceeds it is
// classified as `Timeout` and never touches session state.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if `base_url` is not a valid HTTP(S) URL or the
    /// underlying client cannot be constructed.
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> Result<Self> {
        let url = Url::parse(base_url).context("invalid API base URL")?;
        let scheme = url.scheme();
        anyhow::ensure!(
            scheme == "http" || scheme == "https",
            "unsupported scheme in API base URL: {scheme}"
        );

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the current credential, if any. Requests without a session go
    /// out unauthenticated; some endpoints are intentionally public.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.current().credential() {
            Some(credential) => request.bearer_auth(credential.expose_secret()),
            None => request,
        }
    }

    /// Classify the response status. `401` is the only arm with a session
    /// side effect: the store is logged out before the error is returned,
    /// and the store collapses concurrent rejections into one transition.
    async fn classify(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                if self.store.logout() {
                    warn!("credential rejected by the server; session cleared");
                }
                Err(ApiError::Unauthorized)
            }
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                Err(ApiError::ValidationFailed(validation_errors(&body)))
            }
            other => Err(ApiError::Unknown(other.as_u16())),
        }
    }

    async fn dispatch(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let span = info_span!("api.request", url = %url);
        let response = request.send().instrument(span).await?;
        self.classify(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let request = self.authorize(self.http.get(&url).query(query));
        let response = self.dispatch(request, &url).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let request = self.authorize(self.http.post(&url).json(payload));
        let response = self.dispatch(request, &url).await?;
        Ok(response.json().await?)
    }

    /// Authenticate against the remote endpoint and commit the session.
    ///
    /// The login endpoint is public and bypasses the `401 -> logout` rule:
    /// a rejection here means the submitted credentials are wrong, not that
    /// an established session expired, so the current session (if any) is
    /// left untouched.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidCredentials`] on rejection, another
    /// [`ApiError`] for transport or protocol failures, or a persistence
    /// error if the record cannot be written. No partial state is ever
    /// committed.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session> {
        let url = self.endpoint("/auth/login/");
        info!(email = %email, "login attempt");

        let span = info_span!("api.login", url = %url);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                warn!(email = %email, status = %status, "login rejected");
                return Err(ApiError::InvalidCredentials.into());
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                return Err(ApiError::ValidationFailed(validation_errors(&body)).into());
            }
            _ if !status.is_success() => {
                return Err(ApiError::Unknown(status.as_u16()).into());
            }
            _ => {}
        }

        let body: LoginResponse = response.json().await.map_err(ApiError::from)?;
        let session = self
            .store
            .establish(SecretString::from(body.token), body.user)?;

        if let Some(principal) = session.principal() {
            info!(email = %principal.email, role = ?principal.role, "login succeeded");
        }
        Ok(session)
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn zones(&self) -> Result<Vec<Value>, ApiError> {
        self.get_json("/zones/", &[]).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn sources(&self) -> Result<Vec<Value>, ApiError> {
        self.get_json("/sources/", &[]).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/users/", &[]).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn indicators(&self, query: &IndicatorQuery) -> Result<Page, ApiError> {
        self.get_json("/indicators/", &query.to_query()).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn trend(
        &self,
        zone_id: i64,
        indicator_type: &str,
        period: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut query = vec![
            ("zone_id", zone_id.to_string()),
            ("indicator_type", indicator_type.to_string()),
        ];
        if let Some(period) = period {
            query.push(("period", period.to_string()));
        }
        let response: TrendResponse = self.get_json("/stats/trend/", &query).await?;
        Ok(response.series)
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn air_averages(
        &self,
        zone_id: Option<i64>,
        indicator_type: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut query = Vec::new();
        if let Some(zone_id) = zone_id {
            query.push(("zone_id", zone_id.to_string()));
        }
        if let Some(indicator_type) = indicator_type {
            query.push(("indicator_type", indicator_type.to_string()));
        }
        self.get_json("/stats/air/averages/", &query).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn register_user(&self, payload: &Value) -> Result<User, ApiError> {
        self.post_json("/auth/register/", payload).await
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn update_user(&self, id: i64, payload: &Value) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("/users/{id}/"));
        let request = self.authorize(self.http.patch(&url).json(payload));
        let response = self.dispatch(request, &url).await?;
        Ok(response.json().await?)
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/users/{id}/"));
        let request = self.authorize(self.http.delete(&url));
        self.dispatch(request, &url).await?;
        Ok(())
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on failure.
    pub async fn create_zone(&self, payload: &Value) -> Result<Value, ApiError> {
        self.post_json("/zones/", payload).await
    }
}

/// Parse the `detail` list of a 422 body into field errors.
///
/// The upstream shape is `{"detail": [{"loc": [...], "msg": ...}, ...]}`;
/// anything that does not match is simply skipped.
fn validation_errors(body: &Value) -> Vec<FieldError> {
    body.get("detail")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let message = entry.get("msg").and_then(Value::as_str)?;
                    let field = entry
                        .get("loc")
                        .and_then(Value::as_array)
                        .map(|loc| {
                            loc.iter()
                                .map(|part| match part {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .unwrap_or_default();
                    Some(FieldError {
                        field,
                        message: message.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
