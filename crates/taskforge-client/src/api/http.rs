//! JSON-over-HTTP implementation of [`SolverApi`].

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use taskforge_config::ClientConfig;
use taskforge_core::{Schedule, ScoreAnalysis};
use tracing::{debug, trace};

use super::{SolveRequest, SolverApi};
use crate::error::{ApiError, ErrorInfo};

/// Solver service client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSolverApi {
    client: Client,
    base_url: String,
}

impl HttpSolverApi {
    /// Creates a client for the service at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client using a preconfigured `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Creates a client from configuration, applying the request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        trace!(url = %response.url(), status = status.as_u16(), "Solver service responded");
        if status.is_success() {
            return Ok(response);
        }

        // A structured body is optional; anything else degrades to `info: None`.
        let body = response.text().await.unwrap_or_default();
        let info = serde_json::from_str::<ErrorInfo>(&body).ok();
        debug!(status = status.as_u16(), body = %body, "Solver service returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            info,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SolverApi for HttpSolverApi {
    async fn list_demo_data(&self) -> Result<Vec<String>, ApiError> {
        self.send_json(self.client.get(self.url("/demo-data"))).await
    }

    async fn fetch_demo_data(&self, dataset_id: &str) -> Result<Schedule, ApiError> {
        let url = self.url(&format!("/demo-data/{dataset_id}"));
        self.send_json(self.client.get(url)).await
    }

    async fn start_solving(&self, request: &SolveRequest) -> Result<String, ApiError> {
        let response = self
            .send(self.client.post(self.url("/schedules")).json(request))
            .await?;
        let body = response.text().await?;
        parse_job_id(&body)
    }

    async fn list_jobs(&self) -> Result<Vec<String>, ApiError> {
        self.send_json(self.client.get(self.url("/schedules"))).await
    }

    async fn fetch_schedule(&self, job_id: &str) -> Result<Schedule, ApiError> {
        let url = self.url(&format!("/schedules/{job_id}"));
        self.send_json(self.client.get(url)).await
    }

    async fn stop_solving(&self, job_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/schedules/{job_id}"));
        // The acknowledgement body is not needed.
        self.send(self.client.delete(url)).await.map(drop)
    }

    async fn analyze(&self, schedule: &Schedule) -> Result<ScoreAnalysis, ApiError> {
        let request = self
            .client
            .put(self.url("/schedules/analyze"))
            .json(schedule);
        self.send_json(request).await
    }
}

/// Job handles arrive as a JSON string; a bare text body is accepted too.
fn parse_job_id(body: &str) -> Result<String, ApiError> {
    let job_id = serde_json::from_str::<String>(body)
        .unwrap_or_else(|_| body.trim().to_string());
    if job_id.is_empty() {
        return Err(ApiError::Decode("empty job id".to_string()));
    }
    Ok(job_id)
}
