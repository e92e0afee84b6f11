use std::str::FromStr;

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use bytes::Bytes;

use crate::error::AppError;
use crate::form::duration;
use crate::form::{
    ConfigToggle, EditorOptions, EndpointEditor, EndpointFormValues, FieldPath, FormEvent,
    SubmitError, ToggleRegistry, ToggleSnapshot,
};
use crate::models::Secret;
use crate::notify::{Notification, RecordingNotifier};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "endpoints/form.html")]
#[allow(dead_code)]
struct EndpointFormTemplate {
    title: String,
    action_path: String,
    submit_label: String,
    disabled: bool,
    fields: FormFields,
    errors: FieldErrors,
    sections: Vec<SectionView>,
    secret: String,
    notifications: Vec<Notification>,
}

impl EndpointFormTemplate {
    fn shown(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id && s.visible)
    }
}

#[derive(Template)]
#[template(path = "endpoints/saved.html")]
#[allow(dead_code)]
struct EndpointSavedTemplate {
    action: String,
    endpoint_uid: String,
    endpoint_name: String,
    endpoint_url: String,
    notifications: Vec<Notification>,
}

#[allow(dead_code)]
struct SectionView {
    id: &'static str,
    label: &'static str,
    visible: bool,
    cleared: bool,
}

#[derive(Default)]
#[allow(dead_code)]
struct FormFields {
    name: String,
    url: String,
    support_email: String,
    slack_webhook_url: String,
    secret: String,
    http_timeout: String,
    description: String,
    owner_id: String,
    rate_limit: String,
    rate_limit_duration: String,
    auth_header_name: String,
    auth_header_value: String,
    advanced_signatures: String,
}

impl From<&EndpointFormValues> for FormFields {
    fn from(values: &EndpointFormValues) -> Self {
        let text = |field| values.text(field).unwrap_or_default();
        Self {
            name: text(FieldPath::Name),
            url: text(FieldPath::Url),
            support_email: text(FieldPath::SupportEmail),
            slack_webhook_url: text(FieldPath::SlackWebhookUrl),
            secret: text(FieldPath::Secret),
            http_timeout: text(FieldPath::HttpTimeout),
            description: text(FieldPath::Description),
            owner_id: text(FieldPath::OwnerId),
            rate_limit: text(FieldPath::RateLimit),
            rate_limit_duration: text(FieldPath::RateLimitDuration),
            auth_header_name: text(FieldPath::AuthHeaderName),
            auth_header_value: text(FieldPath::AuthHeaderValue),
            advanced_signatures: text(FieldPath::AdvancedSignatures),
        }
    }
}

/// Error message per control, empty when the control is fine.
#[derive(Default)]
#[allow(dead_code)]
struct FieldErrors {
    name: String,
    url: String,
    support_email: String,
    slack_webhook_url: String,
    http_timeout: String,
    rate_limit: String,
    rate_limit_duration: String,
    auth_header_name: String,
    auth_header_value: String,
    advanced_signatures: String,
}

impl FieldErrors {
    fn from_editor(editor: &EndpointEditor) -> Self {
        if !editor.is_touched() {
            return Self::default();
        }
        let validity = editor.validity();
        let msg = |field| {
            validity
                .error(field)
                .map(|e| e.to_string())
                .unwrap_or_default()
        };
        Self {
            name: msg(FieldPath::Name),
            url: msg(FieldPath::Url),
            support_email: msg(FieldPath::SupportEmail),
            slack_webhook_url: msg(FieldPath::SlackWebhookUrl),
            http_timeout: msg(FieldPath::HttpTimeout),
            rate_limit: msg(FieldPath::RateLimit),
            rate_limit_duration: msg(FieldPath::RateLimitDuration),
            auth_header_name: msg(FieldPath::AuthHeaderName),
            auth_header_value: msg(FieldPath::AuthHeaderValue),
            advanced_signatures: msg(FieldPath::AdvancedSignatures),
        }
    }
}

/// What the button pressed on the form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Save,
    Toggle(ConfigToggle),
    Clear(ConfigToggle),
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_section =
            |id: &str| ConfigToggle::from_str(id).map_err(|e| e.to_string());
        match s.split_once(':') {
            None if s == "save" => Ok(Intent::Save),
            Some(("toggle", id)) => parse_section(id).map(Intent::Toggle),
            Some(("clear", id)) => parse_section(id).map(Intent::Clear),
            _ => Err(format!("Unknown form intent: {s}")),
        }
    }
}

struct PostedForm {
    values: EndpointFormValues,
    sections: Vec<ToggleSnapshot>,
    intent: Intent,
    endpoint_secret: Option<String>,
}

impl PostedForm {
    fn parse(body: &[u8]) -> Result<Self, AppError> {
        let mut values = EndpointFormValues::default();
        let mut sections: Vec<ToggleSnapshot> = Vec::new();
        let mut intent = Intent::Save;
        let mut endpoint_secret = None;

        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        for (key, value) in form_urlencoded::parse(body) {
            let value = value.trim();
            match key.as_ref() {
                "name" => values.name = value.to_string(),
                "url" => values.url = value.to_string(),
                "support_email" => values.support_email = value.to_string(),
                "slack_webhook_url" => values.slack_webhook_url = value.to_string(),
                "secret" => values.secret = optional(value),
                "endpoint_secret" => endpoint_secret = optional(value),
                "http_timeout" => values.http_timeout = optional(value),
                "description" => values.description = optional(value),
                "owner_id" => values.owner_id = optional(value),
                "rate_limit" => values.rate_limit = optional(value),
                "rate_limit_duration" => {
                    values.rate_limit_duration = duration::parse_seconds(value)
                }
                "auth_header_name" => {
                    values.authentication.api_key.header_name = value.to_string()
                }
                "auth_header_value" => {
                    values.authentication.api_key.header_value = value.to_string()
                }
                "advanced_signatures" => {
                    values.advanced_signatures = match value {
                        "" => None,
                        "true" => Some(true),
                        "false" => Some(false),
                        other => {
                            return Err(AppError::BadRequest(format!(
                                "Unknown signature format: {other}"
                            )));
                        }
                    }
                }
                "shown" => section_entry(&mut sections, value).visible = true,
                "cleared" => section_entry(&mut sections, value).cleared = true,
                "intent" => intent = value.parse().map_err(AppError::BadRequest)?,
                _ => {}
            }
        }

        Ok(Self {
            values,
            sections,
            intent,
            endpoint_secret,
        })
    }
}

fn section_entry<'a>(sections: &'a mut Vec<ToggleSnapshot>, id: &str) -> &'a mut ToggleSnapshot {
    if let Some(pos) = sections.iter().position(|s| s.id == id) {
        return &mut sections[pos];
    }
    sections.push(ToggleSnapshot {
        id: id.to_string(),
        visible: false,
        cleared: false,
    });
    let last = sections.len() - 1;
    &mut sections[last]
}

fn new_options(state: &SharedState, route: &str) -> EditorOptions {
    EditorOptions {
        kind: state.config.form_kind,
        edit_mode: false,
        endpoint_id: None,
        current_route: route.to_string(),
    }
}

fn edit_options(state: &SharedState, endpoint_id: String) -> EditorOptions {
    EditorOptions {
        kind: state.config.form_kind,
        edit_mode: true,
        endpoint_id: Some(endpoint_id),
        current_route: "edit".to_string(),
    }
}

fn form_path(options: &EditorOptions) -> String {
    match &options.endpoint_id {
        Some(id) if options.edit_mode => format!("/endpoints/{id}/edit"),
        _ => format!("/endpoints/{}", options.current_route),
    }
}

fn render_form(
    editor: &EndpointEditor,
    notifications: Vec<Notification>,
) -> Result<Response, AppError> {
    let options = editor.options();
    let editing = options.edit_mode && options.endpoint_id.is_some();

    let template = EndpointFormTemplate {
        title: if editing { "Update Endpoint" } else { "Create Endpoint" }.to_string(),
        action_path: form_path(options),
        submit_label: if editing { "Update" } else { "Create" }.to_string(),
        disabled: editor.is_disabled(),
        fields: FormFields::from(editor.values()),
        errors: FieldErrors::from_editor(editor),
        sections: editor
            .toggles()
            .entries()
            .iter()
            .map(|e| SectionView {
                id: e.toggle.id(),
                label: e.toggle.label(),
                visible: e.visible,
                cleared: e.cleared,
            })
            .collect(),
        secret: editor
            .endpoint_secret()
            .map(|s| s.value.clone())
            .unwrap_or_default(),
        notifications,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render endpoint form: {e}")))?;
    Ok(Html(html).into_response())
}

fn render_saved(event: &FormEvent, notifications: Vec<Notification>) -> Result<Response, AppError> {
    let template = EndpointSavedTemplate {
        action: event.action.as_str().to_string(),
        endpoint_uid: event.data.uid.clone(),
        endpoint_name: event.data.name.clone(),
        endpoint_url: event.data.url.clone(),
        notifications,
    };
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render confirmation: {e}")))?;
    Ok(Html(html).into_response())
}

async fn show_form(state: &SharedState, options: EditorOptions) -> Result<Response, AppError> {
    let mut editor = EndpointEditor::new(options);
    editor
        .init(state.gateway.as_ref(), state.permissions.as_ref())
        .await;
    render_form(&editor, Vec::new())
}

async fn handle_post(
    state: &SharedState,
    options: EditorOptions,
    body: &[u8],
) -> Result<Response, AppError> {
    let posted = PostedForm::parse(body)?;
    let toggles = ToggleRegistry::restore(options.kind, &posted.sections);

    let mut editor = EndpointEditor::restore(options, posted.values, toggles);
    // Display only, the active secret is never part of the payload
    if let Some(value) = posted.endpoint_secret {
        editor.set_endpoint_secret(Some(Secret {
            uid: String::new(),
            value,
            expires_at: None,
            created_at: None,
        }));
    }
    editor.apply_permissions(state.permissions.as_ref()).await;

    let notifier = RecordingNotifier::new();
    match posted.intent {
        Intent::Toggle(section) => editor.toggle(section),
        Intent::Clear(section) => editor.remove(section),
        Intent::Save => match editor.submit(state.gateway.as_ref(), &notifier).await {
            Ok(event) => return render_saved(&event, notifier.take()),
            Err(SubmitError::ReadOnly) => return Err(SubmitError::ReadOnly.into()),
            Err(SubmitError::Invalid(_)) | Err(SubmitError::Gateway(_)) => {}
        },
    }

    render_form(&editor, notifier.take())
}

pub async fn new_page(State(state): State<SharedState>) -> Result<Response, AppError> {
    show_form(&state, new_options(&state, "new")).await
}

pub async fn setup_page(State(state): State<SharedState>) -> Result<Response, AppError> {
    show_form(&state, new_options(&state, "setup")).await
}

pub async fn edit_page(
    State(state): State<SharedState>,
    Path(endpoint_id): Path<String>,
) -> Result<Response, AppError> {
    show_form(&state, edit_options(&state, endpoint_id)).await
}

pub async fn new_submit(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    handle_post(&state, new_options(&state, "new"), &body).await
}

pub async fn setup_submit(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    handle_post(&state, new_options(&state, "setup"), &body).await
}

pub async fn edit_submit(
    State(state): State<SharedState>,
    Path(endpoint_id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    handle_post(&state, edit_options(&state, endpoint_id), &body).await
}
