use serde::Serialize;

use crate::access::{PermissionCheck, ENDPOINTS_MANAGE};
use crate::gateway::{EndpointGateway, GatewayError};
use crate::models::{EndpointRecord, Secret};
use crate::notify::{Notification, Notifier};

use super::toggle::{ConfigToggle, FormKind, ToggleRegistry, ToggleSnapshot};
use super::validation::{self, RequiredFields, Validity};
use super::values::EndpointFormValues;

/// How the editor was opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    pub kind: FormKind,
    pub edit_mode: bool,
    pub endpoint_id: Option<String>,
    /// Last segment of the hosting page's path, e.g. `setup` or `edit`.
    pub current_route: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormAction {
    Save,
    Update,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Save => "save",
            FormAction::Update => "update",
        }
    }
}

/// Emitted to the hosting view once per successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormEvent {
    pub action: FormAction,
    pub data: EndpointRecord,
}

/// Serializable view of an editor, handed to single-page hosts.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    pub kind: FormKind,
    pub endpoint_id: Option<String>,
    pub values: EndpointFormValues,
    pub toggles: Vec<ToggleSnapshot>,
    pub required: RequiredFields,
    pub endpoint_secret: Option<Secret>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The user lacks permission to manage endpoints.
    ReadOnly,
    Invalid(Validity),
    Gateway(GatewayError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::ReadOnly => write!(f, "Form is read-only"),
            SubmitError::Invalid(validity) => {
                write!(f, "Form has {} invalid field(s)", validity.errors().len())
            }
            SubmitError::Gateway(err) => write!(f, "{err}"),
        }
    }
}

/// One create / edit endpoint form.
#[derive(Debug, Clone)]
pub struct EndpointEditor {
    options: EditorOptions,
    values: EndpointFormValues,
    toggles: ToggleRegistry,
    required: RequiredFields,
    touched: bool,
    disabled: bool,
    saving: bool,
    loading_details: bool,
    created: bool,
    endpoint_secret: Option<Secret>,
}

impl EndpointEditor {
    pub fn new(mut options: EditorOptions) -> Self {
        options.endpoint_id = options.endpoint_id.filter(|id| !id.is_empty());
        let toggles = ToggleRegistry::for_kind(options.kind);
        Self {
            options,
            values: EndpointFormValues::default(),
            toggles,
            required: RequiredFields::default(),
            touched: false,
            disabled: false,
            saving: false,
            loading_details: false,
            created: false,
            endpoint_secret: None,
        }
    }

    /// Rebuild an editor from state posted back by a hosting view.
    pub fn restore(
        options: EditorOptions,
        values: EndpointFormValues,
        toggles: ToggleRegistry,
    ) -> Self {
        let mut editor = Self::new(options);
        editor.values = values;
        editor.toggles = toggles;
        editor.synchronize_validation();
        editor
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn values(&self) -> &EndpointFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut EndpointFormValues {
        &mut self.values
    }

    pub fn toggles(&self) -> &ToggleRegistry {
        &self.toggles
    }

    pub fn required(&self) -> &RequiredFields {
        &self.required
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_loading_details(&self) -> bool {
        self.loading_details
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Carry the active secret of an endpoint across re-renders.
    pub fn set_endpoint_secret(&mut self, secret: Option<Secret>) {
        self.endpoint_secret = secret;
    }

    pub fn endpoint_secret(&self) -> Option<&Secret> {
        self.endpoint_secret.as_ref()
    }

    /// An existing endpoint is being edited from a regular page.
    pub fn is_update_action(&self) -> bool {
        self.options
            .endpoint_id
            .as_deref()
            .is_some_and(|id| id != "new")
            && self.options.current_route != "setup"
    }

    fn fetches_details(&self) -> bool {
        (self.is_update_action() || self.options.edit_mode)
            && self.options.kind != FormKind::Subscription
    }

    fn dispatches_update(&self) -> Option<&str> {
        if self.fetches_details() {
            self.options.endpoint_id.as_deref()
        } else {
            None
        }
    }

    fn emitted_action(&self) -> FormAction {
        if self.options.endpoint_id.is_some() && self.options.edit_mode {
            FormAction::Update
        } else {
            FormAction::Save
        }
    }

    /// Load the existing record when editing, then apply permissions.
    pub async fn init(&mut self, gateway: &dyn EndpointGateway, permissions: &dyn PermissionCheck) {
        if self.fetches_details() {
            self.load_details(gateway).await;
        }
        self.apply_permissions(permissions).await;
    }

    /// Disable the whole form unless the user may manage endpoints.
    pub async fn apply_permissions(&mut self, permissions: &dyn PermissionCheck) {
        if !permissions.can_access(ENDPOINTS_MANAGE).await {
            tracing::debug!("Missing {ENDPOINTS_MANAGE}, endpoint form is read-only");
            self.disabled = true;
        }
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            kind: self.options.kind,
            endpoint_id: self.options.endpoint_id.clone(),
            values: self.values.clone(),
            toggles: self.toggles.snapshot(),
            required: self.required.clone(),
            endpoint_secret: self.endpoint_secret.clone(),
            disabled: self.disabled,
        }
    }

    pub fn toggle(&mut self, toggle: ConfigToggle) {
        self.toggles.toggle(toggle, false);
        self.synchronize_validation();
    }

    /// Hide a section and remember that the user removed it on purpose.
    pub fn remove(&mut self, toggle: ConfigToggle) {
        self.toggles.toggle(toggle, true);
        self.synchronize_validation();
    }

    pub fn set_cleared(&mut self, toggle: ConfigToggle, cleared: bool) {
        self.toggles.set_cleared(toggle, cleared);
    }

    /// Recompute which fields are required from the visible sections.
    pub fn synchronize_validation(&mut self) -> &RequiredFields {
        self.required = validation::required_fields(&self.toggles);
        &self.required
    }

    pub fn validity(&self) -> Validity {
        validation::validate(&self.values, &self.required)
    }

    pub async fn submit(
        &mut self,
        gateway: &dyn EndpointGateway,
        notifier: &dyn Notifier,
    ) -> Result<FormEvent, SubmitError> {
        if self.disabled {
            return Err(SubmitError::ReadOnly);
        }

        self.synchronize_validation();
        let validity = self.validity();
        if !validity.is_valid() {
            self.saving = false;
            self.touched = true;
            return Err(SubmitError::Invalid(validity));
        }

        if !self.toggles.is_visible(ConfigToggle::RateLimit)
            && self.toggles.is_cleared(ConfigToggle::RateLimit)
        {
            self.values.rate_limit = Some("0".to_string());
            self.values.rate_limit_duration = Some(0);
            self.toggles.set_cleared(ConfigToggle::RateLimit, false);
        }

        self.saving = true;
        let payload = self.values.to_payload();

        let result = match self.dispatches_update() {
            Some(id) => gateway.update(id, &payload).await,
            None => gateway.create(&payload).await,
        };

        self.saving = false;
        match result {
            Ok(response) => {
                notifier.notify(Notification::success(response.message));
                let event = FormEvent {
                    action: self.emitted_action(),
                    data: response.data,
                };
                tracing::info!("Endpoint {} {}d", event.data.uid, event.action.as_str());
                self.reset();
                self.created = true;
                Ok(event)
            }
            Err(e) => {
                tracing::warn!("Failed to save endpoint: {e}");
                notifier.notify(Notification::error("Failed to save endpoint"));
                self.created = false;
                Err(SubmitError::Gateway(e))
            }
        }
    }

    /// Fetch the endpoint being edited and show every section it uses.
    /// Failures leave the form as it was.
    pub async fn load_details(&mut self, gateway: &dyn EndpointGateway) {
        let Some(endpoint_id) = self.options.endpoint_id.clone() else {
            return;
        };

        self.loading_details = true;
        match gateway.fetch_by_id(&endpoint_id).await {
            Ok(response) => self.hydrate(&response.data),
            Err(e) => tracing::warn!("Failed to load endpoint {endpoint_id}: {e}"),
        }
        self.loading_details = false;
    }

    fn hydrate(&mut self, record: &EndpointRecord) {
        self.endpoint_secret = record.active_secret().cloned();
        self.values.patch_from_record(record);

        if record.rate_limit_duration.is_some_and(|d| d > 0) {
            self.toggles.show(ConfigToggle::RateLimit);
        }
        if record.owner_id.as_deref().is_some_and(|o| !o.is_empty()) {
            self.toggles.show(ConfigToggle::OwnerId);
        }
        if record.support_email.as_deref().is_some_and(|e| !e.is_empty()) {
            self.toggles.show(ConfigToggle::AlertConfig);
        }
        if record
            .authentication
            .as_ref()
            .is_some_and(|a| a.has_credentials())
        {
            self.toggles.show(ConfigToggle::Auth);
        }
        if record.http_timeout.is_some_and(|t| t > 0) {
            self.toggles.show(ConfigToggle::HttpTimeout);
        }

        self.synchronize_validation();
    }

    /// Clear every control. Section visibility is kept.
    pub fn reset(&mut self) {
        self.values = EndpointFormValues::default();
        self.touched = false;
    }
}
