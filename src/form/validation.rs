use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::field::FieldPath;
use super::toggle::ToggleRegistry;
use super::values::EndpointFormValues;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?|ftp)://[a-zA-Z0-9-]+(?:.[a-zA-Z0-9-]+)+(?::[0-9]+)?/?(?:[a-zA-Z0-9_.~!$&'()*+,;=:@/?#%-]*)?$",
    )
    .expect("url pattern compiles")
});

static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("integer pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Fields that are required no matter which sections are shown.
const ALWAYS_REQUIRED: [FieldPath; 2] = [FieldPath::Name, FieldPath::Url];

pub fn is_valid_url(s: &str) -> bool {
    URL_PATTERN.is_match(s)
}

pub fn is_valid_email(s: &str) -> bool {
    let local_len = s.split('@').next().map(str::len).unwrap_or(0);
    s.len() <= 254 && local_len <= 64 && EMAIL_PATTERN.is_match(s)
}

/// Digits only, and small enough to fit `T`.
fn is_integer<T: FromStr>(s: &str) -> bool {
    INTEGER_PATTERN.is_match(s) && s.parse::<T>().is_ok()
}

/// Field paths made required by the currently visible sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredFields(BTreeSet<FieldPath>);

impl RequiredFields {
    pub fn contains(&self, field: FieldPath) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn required_fields(registry: &ToggleRegistry) -> RequiredFields {
    RequiredFields(
        registry
            .entries()
            .iter()
            .filter(|e| e.visible)
            .flat_map(|e| e.toggle.dependent_fields().iter().copied())
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Required,
    InvalidUrl,
    InvalidEmail,
    InvalidInteger,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "This field is required"),
            FieldError::InvalidUrl => write!(f, "Enter a valid URL"),
            FieldError::InvalidEmail => write!(f, "Enter a valid email address"),
            FieldError::InvalidInteger => write!(f, "Enter a whole number"),
        }
    }
}

/// Outcome of validating a form snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validity {
    errors: BTreeMap<FieldPath, FieldError>,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: FieldPath) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, FieldError> {
        &self.errors
    }
}

pub fn validate(values: &EndpointFormValues, required: &RequiredFields) -> Validity {
    let mut errors = BTreeMap::new();

    for field in FieldPath::ALL {
        let text = values.text(field);
        let is_required = ALWAYS_REQUIRED.contains(&field) || required.contains(field);

        let error = match (text.as_deref(), field) {
            (None, _) if is_required => Some(FieldError::Required),
            (None, _) => None,
            (Some(url), FieldPath::Url | FieldPath::SlackWebhookUrl) if !is_valid_url(url) => {
                Some(FieldError::InvalidUrl)
            }
            (Some(email), FieldPath::SupportEmail) if !is_valid_email(email) => {
                Some(FieldError::InvalidEmail)
            }
            (Some(timeout), FieldPath::HttpTimeout) if !is_integer::<i64>(timeout) => {
                Some(FieldError::InvalidInteger)
            }
            (Some(limit), FieldPath::RateLimit) if !is_integer::<u64>(limit) => {
                Some(FieldError::InvalidInteger)
            }
            _ => None,
        };

        if let Some(error) = error {
            errors.insert(field, error);
        }
    }

    Validity { errors }
}
