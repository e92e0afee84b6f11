use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::form::{
    required_fields, EditorOptions, EditorSnapshot, EndpointEditor, EndpointFormValues, FormEvent,
    FormKind, RequiredFields, ToggleRegistry, ToggleSnapshot,
};
use crate::notify::TracingNotifier;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub kind: Option<FormKind>,
    #[serde(default)]
    pub edit_mode: bool,
    pub endpoint_id: Option<String>,
    #[serde(default)]
    pub current_route: String,
    #[serde(default)]
    pub toggles: Vec<ToggleSnapshot>,
    pub form: EndpointFormValues,
}

#[derive(Deserialize)]
pub struct DetailsQuery {
    pub kind: Option<FormKind>,
    #[serde(default)]
    pub current_route: String,
}

#[derive(Deserialize)]
pub struct RequiredFieldsRequest {
    pub kind: Option<FormKind>,
    #[serde(default)]
    pub toggles: Vec<ToggleSnapshot>,
}

#[derive(Serialize)]
pub struct RequiredFieldsResponse {
    pub required: RequiredFields,
}

pub async fn submit(
    State(state): State<SharedState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<FormEvent>, AppError> {
    let kind = req.kind.unwrap_or(state.config.form_kind);
    let options = EditorOptions {
        kind,
        edit_mode: req.edit_mode,
        endpoint_id: req.endpoint_id,
        current_route: req.current_route,
    };
    let toggles = ToggleRegistry::restore(kind, &req.toggles);

    let mut editor = EndpointEditor::restore(options, req.form, toggles);
    editor.apply_permissions(state.permissions.as_ref()).await;

    let event = editor
        .submit(state.gateway.as_ref(), &TracingNotifier)
        .await?;
    Ok(Json(event))
}

pub async fn details(
    State(state): State<SharedState>,
    Path(endpoint_id): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<EditorSnapshot>, AppError> {
    let mut editor = EndpointEditor::new(EditorOptions {
        kind: query.kind.unwrap_or(state.config.form_kind),
        edit_mode: true,
        endpoint_id: Some(endpoint_id),
        current_route: query.current_route,
    });
    editor
        .init(state.gateway.as_ref(), state.permissions.as_ref())
        .await;
    Ok(Json(editor.snapshot()))
}

pub async fn required(
    State(state): State<SharedState>,
    Json(req): Json<RequiredFieldsRequest>,
) -> Result<Json<RequiredFieldsResponse>, AppError> {
    let kind = req.kind.unwrap_or(state.config.form_kind);
    let registry = ToggleRegistry::restore(kind, &req.toggles);
    Ok(Json(RequiredFieldsResponse {
        required: required_fields(&registry),
    }))
}
