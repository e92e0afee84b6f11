//! The endpoint form: values, optional sections, validation and the
//! submit / load pipeline that ties them to the backend.

pub mod duration;
pub mod editor;
pub mod field;
pub mod toggle;
pub mod validation;
pub mod values;

pub use editor::{EditorOptions, EditorSnapshot, EndpointEditor, FormAction, FormEvent, SubmitError};
pub use field::FieldPath;
pub use toggle::{ConfigToggle, FormKind, ToggleRegistry, ToggleSnapshot, ToggleState};
pub use validation::{required_fields, validate, FieldError, RequiredFields, Validity};
pub use values::{EndpointFormValues, EndpointPayload};
