use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{null_as_default, Authentication, EndpointRecord};

use super::duration;
use super::field::FieldPath;

/// Current value of every control in the endpoint form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointFormValues {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub support_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slack_webhook_url: String,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default, deserialize_with = "deserialize_integer_text")]
    pub http_timeout: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_integer_text")]
    pub rate_limit: Option<String>,
    #[serde(default, deserialize_with = "duration::deserialize_seconds")]
    pub rate_limit_duration: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authentication: Authentication,
    #[serde(default)]
    pub advanced_signatures: Option<bool>,
}

/// Body sent to the gateway on create / update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointPayload {
    pub name: String,
    pub url: String,
    pub support_email: String,
    pub slack_webhook_url: String,
    pub secret: Option<String>,
    pub http_timeout: Option<i64>,
    pub description: Option<String>,
    pub owner_id: Option<String>,
    pub rate_limit: Option<u64>,
    pub rate_limit_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    pub advanced_signatures: Option<bool>,
}

impl EndpointFormValues {
    /// Copy every field the backend record carries onto the form.
    pub fn patch_from_record(&mut self, record: &EndpointRecord) {
        self.name = record.name.clone();
        self.url = record.url.clone();
        self.support_email = record.support_email.clone().unwrap_or_default();
        self.slack_webhook_url = record.slack_webhook_url.clone().unwrap_or_default();
        self.http_timeout = record.http_timeout.map(|t| t.to_string());
        self.description = record.description.clone();
        self.owner_id = record.owner_id.clone();
        self.rate_limit = record.rate_limit.map(|r| r.to_string());
        self.rate_limit_duration = record.rate_limit_duration;
        self.authentication = record.authentication.clone().unwrap_or_default();
        self.advanced_signatures = record.advanced_signatures;
    }

    /// Text content of a field, `None` when the control holds no value.
    pub fn text(&self, field: FieldPath) -> Option<String> {
        fn non_empty(s: &str) -> Option<String> {
            (!s.is_empty()).then(|| s.to_string())
        }

        match field {
            FieldPath::Name => non_empty(&self.name),
            FieldPath::Url => non_empty(&self.url),
            FieldPath::SupportEmail => non_empty(&self.support_email),
            FieldPath::SlackWebhookUrl => non_empty(&self.slack_webhook_url),
            FieldPath::Secret => self.secret.as_deref().and_then(non_empty),
            FieldPath::HttpTimeout => self.http_timeout.as_deref().and_then(non_empty),
            FieldPath::Description => self.description.as_deref().and_then(non_empty),
            FieldPath::OwnerId => self.owner_id.as_deref().and_then(non_empty),
            FieldPath::RateLimit => self.rate_limit.as_deref().and_then(non_empty),
            FieldPath::RateLimitDuration => self.rate_limit_duration.map(|v| v.to_string()),
            FieldPath::AuthHeaderName => non_empty(&self.authentication.api_key.header_name),
            FieldPath::AuthHeaderValue => non_empty(&self.authentication.api_key.header_value),
            FieldPath::AdvancedSignatures => self.advanced_signatures.map(|v| v.to_string()),
        }
    }

    /// Whether the control satisfies a "required" constraint.
    pub fn is_present(&self, field: FieldPath) -> bool {
        self.text(field).is_some()
    }

    /// Integer fields are only sent once `validate` has accepted their text.
    pub fn to_payload(&self) -> EndpointPayload {
        let authentication = self
            .authentication
            .has_credentials()
            .then(|| self.authentication.clone());

        EndpointPayload {
            name: self.name.clone(),
            url: self.url.clone(),
            support_email: self.support_email.clone(),
            slack_webhook_url: self.slack_webhook_url.clone(),
            secret: self.secret.clone(),
            http_timeout: self.http_timeout.as_deref().and_then(|t| t.parse().ok()),
            description: self.description.clone(),
            owner_id: self.owner_id.clone(),
            rate_limit: self.rate_limit.as_deref().and_then(|r| r.parse().ok()),
            rate_limit_duration: self.rate_limit_duration,
            authentication,
            advanced_signatures: self.advanced_signatures,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerText {
    Number(i64),
    Text(String),
}

fn deserialize_integer_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IntegerText>::deserialize(deserializer)? {
        None => None,
        Some(IntegerText::Number(n)) => Some(n.to_string()),
        Some(IntegerText::Text(t)) => Some(t),
    })
}
