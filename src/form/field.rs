use std::fmt;

use serde::{Serialize, Serializer};

/// Addressable fields of the endpoint form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Name,
    Url,
    SupportEmail,
    SlackWebhookUrl,
    Secret,
    HttpTimeout,
    Description,
    OwnerId,
    RateLimit,
    RateLimitDuration,
    AuthHeaderName,
    AuthHeaderValue,
    AdvancedSignatures,
}

impl FieldPath {
    pub const ALL: [FieldPath; 13] = [
        FieldPath::Name,
        FieldPath::Url,
        FieldPath::SupportEmail,
        FieldPath::SlackWebhookUrl,
        FieldPath::Secret,
        FieldPath::HttpTimeout,
        FieldPath::Description,
        FieldPath::OwnerId,
        FieldPath::RateLimit,
        FieldPath::RateLimitDuration,
        FieldPath::AuthHeaderName,
        FieldPath::AuthHeaderValue,
        FieldPath::AdvancedSignatures,
    ];

    /// Dotted path as used in payloads and error maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::Name => "name",
            FieldPath::Url => "url",
            FieldPath::SupportEmail => "support_email",
            FieldPath::SlackWebhookUrl => "slack_webhook_url",
            FieldPath::Secret => "secret",
            FieldPath::HttpTimeout => "http_timeout",
            FieldPath::Description => "description",
            FieldPath::OwnerId => "owner_id",
            FieldPath::RateLimit => "rate_limit",
            FieldPath::RateLimitDuration => "rate_limit_duration",
            FieldPath::AuthHeaderName => "authentication.api_key.header_name",
            FieldPath::AuthHeaderValue => "authentication.api_key.header_value",
            FieldPath::AdvancedSignatures => "advanced_signatures",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
