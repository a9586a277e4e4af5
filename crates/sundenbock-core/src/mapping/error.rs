use thiserror::Error;

/// Errors raised while building or applying a mapping spec.
///
/// `MissingRule`, `UnknownField` and `DuplicateRule` are construction-time
/// failures; the remaining variants come out of `transform`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A target field has no rule.
    #[error("Mapping spec for {target} has no rule for field '{field}'")]
    MissingRule { target: &'static str, field: String },

    /// A rule names a field the target does not have.
    #[error("Mapping spec for {target} names unknown field '{field}'")]
    UnknownField { target: &'static str, field: String },

    /// The same target field was given two rules.
    #[error("Mapping spec for {target} has more than one rule for field '{field}'")]
    DuplicateRule { target: &'static str, field: String },

    /// A converter rejected a value. Raised by converter functions; the engine
    /// attaches the field path before returning it.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A converter failed for the given field path.
    #[error("Failed to map field '{field}': {message}")]
    FieldTransform { field: String, message: String },

    /// The source record does not have the shape the spec expects.
    #[error("Expected {expected} while mapping {target}")]
    Shape {
        target: &'static str,
        expected: &'static str,
    },

    /// The mapped record could not be encoded or decoded by serde.
    #[error("Failed to decode {target}: {message}")]
    Decode {
        target: &'static str,
        message: String,
    },
}

impl MappingError {
    /// Creates an InvalidValue error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Attaches a field name to a transform failure, prefixing nested paths.
    pub(crate) fn at_field(self, field: &str) -> Self {
        match self {
            Self::InvalidValue(message) => Self::FieldTransform {
                field: field.to_string(),
                message,
            },
            Self::FieldTransform {
                field: inner,
                message,
            } => Self::FieldTransform {
                field: format!("{field}.{inner}"),
                message,
            },
            other => Self::FieldTransform {
                field: field.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Check if this error was raised while building a spec
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::MissingRule { .. } | Self::UnknownField { .. } | Self::DuplicateRule { .. }
        )
    }
}
