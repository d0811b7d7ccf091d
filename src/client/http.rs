use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success response; `message` is the server-supplied error message,
    /// surfaced verbatim to the user by calling views.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Thin request client for the dialer API. The session cookie set at login is
/// carried automatically by the underlying cookie store, so authenticated
/// calls need no per-request credential plumbing.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(endpoint)).send().await?;
        Self::decode(response).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(endpoint)).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.http.put(self.url(endpoint)).json(body).send().await?;
        Self::decode(response).await
    }

    /// Any non-2xx response becomes a ClientError::Api carrying the server's
    /// message, falling back to a generic text when the body isn't the error
    /// shape.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP error, status: {}", status.as_u16()));

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_endpoints_join_the_base_url() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(
            client.url("/api/admin/users"),
            "http://localhost:3000/api/admin/users"
        );
        assert_eq!(client.url("http://other/x"), "http://other/x");
    }

    #[test]
    fn api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "Forbidden");
    }
}
