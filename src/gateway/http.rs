use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::form::EndpointPayload;
use crate::models::{ApiResponse, EndpointRecord};

use super::{EndpointGateway, GatewayError};

/// Which side of the backend API the form talks to.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayTarget {
    /// Dashboard API, authenticated with a bearer API key.
    Project {
        project_id: String,
        api_key: Option<String>,
    },
    /// Customer-facing portal API, authenticated with a portal token.
    Portal { token: String },
}

pub struct HttpGateway {
    client: reqwest::Client,
    api_url: String,
    target: GatewayTarget,
}

impl HttpGateway {
    pub fn new(
        api_url: &str,
        target: GatewayTarget,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            target,
        })
    }

    fn endpoints_url(&self) -> String {
        match &self.target {
            GatewayTarget::Project { project_id, .. } => {
                format!("{}/api/v1/projects/{project_id}/endpoints", self.api_url)
            }
            GatewayTarget::Portal { .. } => format!("{}/portal-api/endpoints", self.api_url),
        }
    }

    fn endpoint_url(&self, endpoint_id: &str) -> String {
        format!("{}/{endpoint_id}", self.endpoints_url())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.target {
            GatewayTarget::Project {
                api_key: Some(key), ..
            } => req.bearer_auth(key),
            GatewayTarget::Project { api_key: None, .. } => req,
            GatewayTarget::Portal { token } => req.query(&[("token", token)]),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<T>, GatewayError> {
        let resp = self
            .authorize(req)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| body.chars().take(256).collect());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EndpointGateway for HttpGateway {
    async fn create(
        &self,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        tracing::debug!("Creating endpoint {}", payload.name);
        self.send(self.client.post(self.endpoints_url()).json(payload))
            .await
    }

    async fn update(
        &self,
        endpoint_id: &str,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        tracing::debug!("Updating endpoint {endpoint_id}");
        self.send(self.client.put(self.endpoint_url(endpoint_id)).json(payload))
            .await
    }

    async fn fetch_by_id(
        &self,
        endpoint_id: &str,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        self.send(self.client.get(self.endpoint_url(endpoint_id)))
            .await
    }
}
