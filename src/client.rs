//! Blocking HTTP client for a running relief planner service.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::records::Assignment;
use crate::service::{ErrorResponse, StatusResponse};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct ReliefClient {
    config: ClientConfig,
    client: reqwest::blocking::Client,
}

impl ReliefClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn villages(&self) -> Result<Vec<Value>, ClientError> {
        self.get("villages")
    }

    pub fn relief_centers(&self) -> Result<Vec<Value>, ClientError> {
        self.get("relief_centers")
    }

    pub fn add_village(&self, record: &Value) -> Result<String, ClientError> {
        self.post::<StatusResponse>("add_village", Some(record))
            .map(|body| body.status)
    }

    pub fn add_relief_center(&self, record: &Value) -> Result<String, ClientError> {
        self.post::<StatusResponse>("add_relief_center", Some(record))
            .map(|body| body.status)
    }

    pub fn generate_plan(&self) -> Result<Vec<Assignment>, ClientError> {
        self.post("generate_plan", None)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send()?;
        decode(response)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: Option<&Value>) -> Result<T, ClientError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send()?)
    }
}

fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>()?);
    }

    let text = response.text()?;
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
