//! Schema-driven payload validation
//!
//! A payload must carry exactly the declared fields. Numeric fields must
//! hold a JSON integer; string fields are only checked for presence and
//! accept any value.

use std::fmt::{self, Display, Formatter};

use serde_json::{Map, Value};
use thiserror::Error;

use super::errors::AuditError;

/// Declared type of a payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any value is accepted
    String,
    /// Must be a JSON integer
    Numeric,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Numeric => write!(f, "integer"),
        }
    }
}

/// A `(field name, kind)` declaration
pub type RequiredField = (&'static str, FieldKind);

/// Fields of an organisation registration payload
pub const ORGANISATION_FIELDS: &[RequiredField] = &[
    ("name", FieldKind::String),
    ("contact", FieldKind::String),
    ("website", FieldKind::String),
];

/// Fields of a service registration payload
pub const SERVICE_FIELDS: &[RequiredField] = &[("name", FieldKind::String)];

/// Fields of an audit record save payload
pub const AUDIT_RECORD_FIELDS: &[RequiredField] = &[
    ("timestamp", FieldKind::Numeric),
    ("obo_id", FieldKind::String),
    ("actor_id", FieldKind::String),
];

/// Reasons a payload fails validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The payload is not a JSON object
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// Field count differs from the declaration
    #[error("length mismatch: expected {expected} fields, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A declared field is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A numeric field holds something other than an integer
    #[error("wrong type for field '{field}': expected {expected}")]
    WrongType { field: String, expected: FieldKind },
}

impl From<FieldError> for AuditError {
    fn from(err: FieldError) -> Self {
        AuditError::Validation(err.to_string())
    }
}

/// Checks `data` against the `required` declaration
///
/// # Errors
///
/// Returns the first [`FieldError`] found: length is checked before
/// presence, and presence before type.
pub fn validate(required: &[RequiredField], data: &Map<String, Value>) -> Result<(), FieldError> {
    if data.len() != required.len() {
        return Err(FieldError::LengthMismatch {
            expected: required.len(),
            actual: data.len(),
        });
    }

    for (field, kind) in required {
        let value = data
            .get(*field)
            .ok_or_else(|| FieldError::MissingField((*field).to_string()))?;

        if *kind == FieldKind::Numeric && !is_integer(value) {
            return Err(FieldError::WrongType {
                field: (*field).to_string(),
                expected: *kind,
            });
        }
    }

    Ok(())
}

/// Borrows the payload as a JSON object
///
/// # Errors
///
/// Returns `FieldError::NotAnObject` for arrays, scalars and null.
pub fn as_object(payload: &Value) -> Result<&Map<String, Value>, FieldError> {
    payload.as_object().ok_or(FieldError::NotAnObject)
}

/// Text form of a string-kind field
///
/// String values are returned as-is; any other JSON value is returned as its
/// JSON text. Absent fields yield an empty string.
pub fn field_text(data: &Map<String, Value>, field: &str) -> String {
    match data.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}
