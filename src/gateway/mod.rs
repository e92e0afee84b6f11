pub mod http;

use async_trait::async_trait;

use crate::form::EndpointPayload;
use crate::models::{ApiResponse, EndpointRecord};

pub use http::{GatewayTarget, HttpGateway};

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The request never produced a response.
    Transport(String),
    /// The backend answered with a non-success status.
    Status { status: u16, message: String },
    /// The response body could not be understood.
    Decode(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Transport(msg) => write!(f, "Request failed: {msg}"),
            GatewayError::Status { status, message } => {
                write!(f, "Backend returned {status}: {message}")
            }
            GatewayError::Decode(msg) => write!(f, "Invalid response: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Backend operations the endpoint form depends on.
#[async_trait]
pub trait EndpointGateway: Send + Sync {
    async fn create(
        &self,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError>;

    async fn update(
        &self,
        endpoint_id: &str,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError>;

    async fn fetch_by_id(&self, endpoint_id: &str)
    -> Result<ApiResponse<EndpointRecord>, GatewayError>;
}
