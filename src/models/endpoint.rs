use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::duration;

use super::null_as_default;

/// An endpoint as returned by the backend API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub slack_webhook_url: Option<String>,
    #[serde(default)]
    pub http_timeout: Option<u64>,
    #[serde(default)]
    pub rate_limit: Option<u64>,
    #[serde(default, deserialize_with = "duration::deserialize_lenient_seconds")]
    pub rate_limit_duration: Option<u64>,
    #[serde(default)]
    pub authentication: Option<Authentication>,
    #[serde(default)]
    pub advanced_signatures: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secrets: Vec<Secret>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EndpointRecord {
    /// The first secret that has no expiry set.
    pub fn active_secret(&self) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.expires_at.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    pub value: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    #[default]
    ApiKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: AuthKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key: ApiKey,
}

impl Authentication {
    pub fn api_key(header_name: impl Into<String>, header_value: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::ApiKey,
            api_key: ApiKey {
                header_name: header_name.into(),
                header_value: header_value.into(),
            },
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.header_name.is_empty() || !self.api_key.header_value.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(default, deserialize_with = "null_as_default")]
    pub header_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub header_value: String,
}

/// Envelope used by every backend endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    pub data: T,
}
