use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::field::FieldPath;

/// Optional, user-revealable sections of the endpoint form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigToggle {
    HttpTimeout,
    OwnerId,
    RateLimit,
    Auth,
    AlertConfig,
    Signature,
}

impl ConfigToggle {
    pub fn id(&self) -> &'static str {
        match self {
            ConfigToggle::HttpTimeout => "http_timeout",
            ConfigToggle::OwnerId => "owner_id",
            ConfigToggle::RateLimit => "rate_limit",
            ConfigToggle::Auth => "auth",
            ConfigToggle::AlertConfig => "alert_config",
            ConfigToggle::Signature => "signature",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigToggle::HttpTimeout => "Timeout",
            ConfigToggle::OwnerId => "Owner ID",
            ConfigToggle::RateLimit => "Rate Limit",
            ConfigToggle::Auth => "Auth",
            ConfigToggle::AlertConfig => "Notifications",
            ConfigToggle::Signature => "Signature Format",
        }
    }

    /// Fields that become required while this section is shown.
    pub fn dependent_fields(&self) -> &'static [FieldPath] {
        match self {
            ConfigToggle::HttpTimeout => &[FieldPath::HttpTimeout],
            ConfigToggle::Signature => &[FieldPath::AdvancedSignatures],
            ConfigToggle::RateLimit => &[FieldPath::RateLimit, FieldPath::RateLimitDuration],
            ConfigToggle::AlertConfig => &[FieldPath::SupportEmail, FieldPath::SlackWebhookUrl],
            ConfigToggle::Auth => &[FieldPath::AuthHeaderName, FieldPath::AuthHeaderValue],
            ConfigToggle::OwnerId => &[],
        }
    }
}

impl fmt::Display for ConfigToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToggle(pub String);

impl fmt::Display for UnknownToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown configuration section: {}", self.0)
    }
}

impl FromStr for ConfigToggle {
    type Err = UnknownToggle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http_timeout" => Ok(ConfigToggle::HttpTimeout),
            "owner_id" => Ok(ConfigToggle::OwnerId),
            "rate_limit" => Ok(ConfigToggle::RateLimit),
            "auth" => Ok(ConfigToggle::Auth),
            "alert_config" => Ok(ConfigToggle::AlertConfig),
            "signature" => Ok(ConfigToggle::Signature),
            other => Err(UnknownToggle(other.to_string())),
        }
    }
}

/// Where the form is hosted. Portal forms only expose the timeout section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    #[default]
    InApp,
    Portal,
    Subscription,
}

impl FormKind {
    pub fn sections(&self) -> &'static [ConfigToggle] {
        match self {
            FormKind::Portal => &[ConfigToggle::HttpTimeout],
            FormKind::InApp | FormKind::Subscription => &[
                ConfigToggle::HttpTimeout,
                ConfigToggle::OwnerId,
                ConfigToggle::RateLimit,
                ConfigToggle::Auth,
                ConfigToggle::AlertConfig,
                ConfigToggle::Signature,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::InApp => "in-app",
            FormKind::Portal => "portal",
            FormKind::Subscription => "subscription",
        }
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-app" => Ok(FormKind::InApp),
            "portal" => Ok(FormKind::Portal),
            "subscription" => Ok(FormKind::Subscription),
            other => Err(format!("unknown form kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    pub toggle: ConfigToggle,
    pub visible: bool,
    pub cleared: bool,
}

/// Wire shape of a toggle, as posted back by a hosting view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleSnapshot {
    pub id: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub cleared: bool,
}

/// Ordered set of the sections registered for one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRegistry {
    entries: Vec<ToggleState>,
}

impl ToggleRegistry {
    /// All sections for `kind`, hidden.
    pub fn for_kind(kind: FormKind) -> Self {
        Self {
            entries: kind
                .sections()
                .iter()
                .map(|&toggle| ToggleState {
                    toggle,
                    visible: false,
                    cleared: false,
                })
                .collect(),
        }
    }

    /// Rebuild a registry for `kind` from a posted snapshot. Ids that name no
    /// registered section are ignored.
    pub fn restore(kind: FormKind, snapshot: &[ToggleSnapshot]) -> Self {
        let mut registry = Self::for_kind(kind);
        for item in snapshot {
            let Ok(toggle) = item.id.parse::<ConfigToggle>() else {
                tracing::debug!("Ignoring unknown section '{}'", item.id);
                continue;
            };
            if let Some(entry) = registry.entry_mut(toggle) {
                entry.visible = item.visible;
                entry.cleared = item.cleared;
            }
        }
        registry
    }

    pub fn snapshot(&self) -> Vec<ToggleSnapshot> {
        self.entries
            .iter()
            .map(|e| ToggleSnapshot {
                id: e.toggle.id().to_string(),
                visible: e.visible,
                cleared: e.cleared,
            })
            .collect()
    }

    pub fn entries(&self) -> &[ToggleState] {
        &self.entries
    }

    /// Flip visibility of `toggle` and set its cleared flag to `deleted`.
    pub fn toggle(&mut self, toggle: ConfigToggle, deleted: bool) {
        if let Some(entry) = self.entry_mut(toggle) {
            entry.visible = !entry.visible;
            entry.cleared = deleted;
        }
    }

    /// Make `toggle` visible without flipping.
    pub fn show(&mut self, toggle: ConfigToggle) {
        if let Some(entry) = self.entry_mut(toggle) {
            entry.visible = true;
            entry.cleared = false;
        }
    }

    pub fn set_cleared(&mut self, toggle: ConfigToggle, cleared: bool) {
        if let Some(entry) = self.entry_mut(toggle) {
            entry.cleared = cleared;
        }
    }

    pub fn is_visible(&self, toggle: ConfigToggle) -> bool {
        self.entry(toggle).is_some_and(|e| e.visible)
    }

    pub fn is_cleared(&self, toggle: ConfigToggle) -> bool {
        self.entry(toggle).is_some_and(|e| e.cleared)
    }

    /// String lookup for ids coming from the outside world.
    pub fn is_visible_id(&self, id: &str) -> bool {
        id.parse::<ConfigToggle>().is_ok_and(|t| self.is_visible(t))
    }

    pub fn is_cleared_id(&self, id: &str) -> bool {
        id.parse::<ConfigToggle>().is_ok_and(|t| self.is_cleared(t))
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.visible).count()
    }

    fn entry(&self, toggle: ConfigToggle) -> Option<&ToggleState> {
        self.entries.iter().find(|e| e.toggle == toggle)
    }

    fn entry_mut(&mut self, toggle: ConfigToggle) -> Option<&mut ToggleState> {
        self.entries.iter_mut().find(|e| e.toggle == toggle)
    }
}
