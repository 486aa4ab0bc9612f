// src/api_client.rs
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::session::Session;

/// Any failed call to the backend. Transport, status and decode failures all
/// land here; callers do not branch on the cause.
#[derive(Error, Debug)]
#[error("Request to {endpoint} failed{}: {message}", status_suffix(.status))]
pub struct RemoteFetchError {
    pub endpoint: String,
    pub status: Option<u16>,
    pub message: String,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl RemoteFetchError {
    fn new(endpoint: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Thin authenticated JSON client for the coaching backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self, RemoteFetchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("workout-composer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteFetchError::new(base_url, None, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.session.token)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteFetchError> {
        info!("Sending GET to {}", path);
        let builder = if query.is_empty() {
            self.request(Method::GET, path)
        } else {
            self.request(Method::GET, path).query(query)
        };
        self.execute(path, builder).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteFetchError>
    where
        B: Serialize + std::fmt::Debug + ?Sized,
        T: DeserializeOwned,
    {
        info!("Sending {} to {}", method, path);
        debug!("Request body: {:?}", body);
        let builder = self.request(method, path).json(body);
        self.execute(path, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, RemoteFetchError> {
        let response = builder.send().await.map_err(|e| {
            error!("Request to {} could not be sent: {}", path, e);
            RemoteFetchError::new(path, None, e.to_string())
        })?;
        let response = Self::check_status(path, response).await?;
        response.json::<T>().await.map_err(|e| {
            error!("Failed to decode response from {}: {}", path, e);
            RemoteFetchError::new(path, None, format!("invalid response body: {e}"))
        })
    }

    async fn check_status(path: &str, response: Response) -> Result<Response, RemoteFetchError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error body".to_string());
        error!(
            "Request to {} failed with status: {}. Body: {}",
            path, status, error_body
        );
        Err(RemoteFetchError::new(path, Some(status.as_u16()), error_body))
    }
}
