//! Error types for the schema engine
//!
//! Every validation rule of the engine fails with a [`SchemaError`]. Errors are
//! deterministic: nothing here is transient and nothing is retried. Each
//! variant carries enough context (entity, name, rejected value) for a caller
//! to render a precise message, and [`SchemaError::code`] exposes a stable
//! snake_case tag for programmatic matching.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::kind::PrimitiveKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// The kind of entity a name belongs to.
///
/// Each entity has its own length limit and character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Type (record schema) name
    Type,
    /// Field name
    Field,
    /// Index name
    Index,
    /// Action name
    Action,
    /// Object identifier
    Id,
}

impl NameKind {
    /// Lowercase label used in messages and error codes.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NameKind::Type => "type",
            NameKind::Field => "field",
            NameKind::Index => "index",
            NameKind::Action => "action",
            NameKind::Id => "id",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Too long, invalid characters, reserved name, primitive-name collision
    Naming,
    /// Invalid value for a kind, out-of-range value
    Coercion,
    /// Empty required list, duplicates, dangling references
    Structural,
    /// Configuration file problems
    Config,
}

/// Error types for the schema engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A required name was empty
    #[error("{entity} name is empty")]
    EmptyName {
        /// Entity the name belongs to
        entity: NameKind,
    },

    /// Name exceeds the entity's length limit
    #[error("{entity} name '{name}' exceeds {max} characters")]
    NameTooLong {
        /// Entity the name belongs to
        entity: NameKind,
        /// Rejected name
        name: String,
        /// Maximum allowed length
        max: usize,
    },

    /// Name contains characters outside the entity's character class
    #[error("invalid {entity} name '{name}'")]
    InvalidName {
        /// Entity the name belongs to
        entity: NameKind,
        /// Rejected name
        name: String,
    },

    /// Field name collides with an implicit system column
    #[error("field name '{name}' is reserved")]
    FieldReservedName {
        /// Rejected name
        name: String,
    },

    /// Type name is a structurally reserved word
    #[error("type name '{name}' is reserved")]
    TypeReservedName {
        /// Rejected name
        name: String,
    },

    /// Type name equals a primitive kind name
    #[error("type name '{name}' collides with a primitive type")]
    PrimitiveTypeNameCollision {
        /// Rejected name
        name: String,
    },

    /// Kind name outside the registry
    #[error("unknown primitive type '{name}'")]
    UnknownPrimitiveType {
        /// Rejected kind name
        name: String,
    },

    /// Length / precision / scale parameters are malformed or do not apply
    #[error("invalid parameters '{parameters}' for {kind}")]
    InvalidParameters {
        /// Kind of the field
        kind: PrimitiveKind,
        /// Rejected parameter string
        parameters: String,
    },

    /// Value could not be interpreted as the requested kind
    #[error("invalid {kind} value '{value}'")]
    InvalidValue {
        /// Requested kind
        kind: PrimitiveKind,
        /// Rejected value, rendered as text
        value: String,
    },

    /// A timestamp that must be UTC carried another offset
    #[error("invalid timezone '{value}': expected UTC")]
    InvalidTimezone {
        /// Rejected value
        value: String,
    },

    /// Value outside the inclusive range of a field
    #[error(
        "value '{value}'{} is out of range [{}, {}]",
        field_suffix(.field),
        .min.as_deref().unwrap_or("-inf"),
        .max.as_deref().unwrap_or("+inf")
    )]
    OutOfRange {
        /// Field the value was coerced for, when known
        field: Option<String>,
        /// Rejected value
        value: String,
        /// Lower bound, if any
        min: Option<String>,
        /// Upper bound, if any
        max: Option<String>,
    },

    /// Nested tuple text that is not `key:value,...`
    #[error("invalid tuple '{value}'")]
    InvalidTuple {
        /// Rejected value
        value: String,
    },

    /// Range whose resolved minimum exceeds its maximum
    #[error("invalid range: min '{min}' is greater than max '{max}'")]
    InvalidRange {
        /// Resolved minimum
        min: String,
        /// Resolved maximum
        max: String,
    },

    /// Input shape not accepted by the parser of a kind
    #[error("unexpected {found} value for {kind}")]
    UnexpectedValue {
        /// Requested kind
        kind: PrimitiveKind,
        /// Shape of the rejected input
        found: &'static str,
    },

    /// Two fields with the same name
    #[error("duplicate field '{name}' in type '{type_name}'")]
    DuplicateField {
        /// Owning type
        type_name: String,
        /// Duplicated field name
        name: String,
    },

    /// Two indexes with the same name
    #[error("duplicate index '{name}' in type '{type_name}'")]
    DuplicateIndex {
        /// Owning type
        type_name: String,
        /// Duplicated index name
        name: String,
    },

    /// Two actions with the same name
    #[error("duplicate action '{name}' in type '{type_name}'")]
    DuplicateAction {
        /// Owning type
        type_name: String,
        /// Duplicated action name
        name: String,
    },

    /// Two entries of one alter batch claim the same old name
    #[error("{entity} old name '{name}' is claimed more than once")]
    DuplicateOldName {
        /// Field or index
        entity: NameKind,
        /// Claimed old name
        name: String,
    },

    /// Index without fields
    #[error("index '{index}' has no fields")]
    EmptyIndexFields {
        /// Index name
        index: String,
    },

    /// Reference to a field the type does not have
    #[error("field '{name}' not found in type '{type_name}'")]
    FieldNotFound {
        /// Owning type
        type_name: String,
        /// Missing field
        name: String,
    },

    /// Reference to an index the type does not have
    #[error("index '{name}' not found in type '{type_name}'")]
    IndexNotFound {
        /// Owning type
        type_name: String,
        /// Missing index
        name: String,
    },

    /// Configuration could not be read or understood
    #[error("configuration error: {message}")]
    Config {
        /// Details
        message: String,
    },
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" of field '{}'", name),
        None => String::new(),
    }
}

impl SchemaError {
    /// Build an [`SchemaError::InvalidValue`] from anything printable.
    pub fn invalid_value(kind: PrimitiveKind, value: impl fmt::Display) -> Self {
        SchemaError::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }

    /// Build a [`SchemaError::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        SchemaError::Config {
            message: message.into(),
        }
    }

    /// Attach a field name to an out-of-range error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_field(self, name: &str) -> Self {
        match self {
            SchemaError::OutOfRange {
                field: None,
                value,
                min,
                max,
            } => SchemaError::OutOfRange {
                field: Some(name.to_string()),
                value,
                min,
                max,
            },
            other => other,
        }
    }

    /// Stable snake_case tag for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::EmptyName { entity } => match entity {
                NameKind::Type => "empty_type_name",
                NameKind::Field => "empty_field_name",
                NameKind::Index => "empty_index_name",
                NameKind::Action => "empty_action_name",
                NameKind::Id => "empty_id",
            },
            SchemaError::NameTooLong { entity, .. } => match entity {
                NameKind::Type => "type_name_too_long",
                NameKind::Field => "field_name_too_long",
                NameKind::Index => "index_name_too_long",
                NameKind::Action => "action_name_too_long",
                NameKind::Id => "id_too_long",
            },
            SchemaError::InvalidName { entity, .. } => match entity {
                NameKind::Type => "invalid_type_name",
                NameKind::Field => "invalid_field_name",
                NameKind::Index => "invalid_index_name",
                NameKind::Action => "invalid_action_name",
                NameKind::Id => "invalid_id",
            },
            SchemaError::FieldReservedName { .. } => "field_reserved_name",
            SchemaError::TypeReservedName { .. } => "type_reserved_name",
            SchemaError::PrimitiveTypeNameCollision { .. } => "primitive_type_name_collision",
            SchemaError::UnknownPrimitiveType { .. } => "unknown_primitive_type",
            SchemaError::InvalidParameters { .. } => "invalid_parameters",
            SchemaError::InvalidValue { kind, .. } => invalid_code(*kind),
            SchemaError::InvalidTimezone { .. } => "invalid_timezone",
            SchemaError::OutOfRange { .. } => "out_of_range_value",
            SchemaError::InvalidTuple { .. } => "invalid_tuple",
            SchemaError::InvalidRange { .. } => "invalid_range",
            SchemaError::UnexpectedValue { .. } => "unexpected_value",
            SchemaError::DuplicateField { .. } => "duplicate_field",
            SchemaError::DuplicateIndex { .. } => "duplicate_index",
            SchemaError::DuplicateAction { .. } => "duplicate_action",
            SchemaError::DuplicateOldName { .. } => "duplicate_old_name",
            SchemaError::EmptyIndexFields { .. } => "empty_index_fields",
            SchemaError::FieldNotFound { .. } => "field_not_found",
            SchemaError::IndexNotFound { .. } => "index_not_found",
            SchemaError::Config { .. } => "config",
        }
    }

    /// Which of the error classes this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            SchemaError::EmptyName { .. }
            | SchemaError::NameTooLong { .. }
            | SchemaError::InvalidName { .. }
            | SchemaError::FieldReservedName { .. }
            | SchemaError::TypeReservedName { .. }
            | SchemaError::PrimitiveTypeNameCollision { .. } => ErrorClass::Naming,
            SchemaError::InvalidValue { .. }
            | SchemaError::InvalidTimezone { .. }
            | SchemaError::OutOfRange { .. }
            | SchemaError::InvalidTuple { .. }
            | SchemaError::UnexpectedValue { .. } => ErrorClass::Coercion,
            SchemaError::UnknownPrimitiveType { .. }
            | SchemaError::InvalidParameters { .. }
            | SchemaError::InvalidRange { .. }
            | SchemaError::DuplicateField { .. }
            | SchemaError::DuplicateIndex { .. }
            | SchemaError::DuplicateAction { .. }
            | SchemaError::DuplicateOldName { .. }
            | SchemaError::EmptyIndexFields { .. }
            | SchemaError::FieldNotFound { .. }
            | SchemaError::IndexNotFound { .. } => ErrorClass::Structural,
            SchemaError::Config { .. } => ErrorClass::Config,
        }
    }
}

fn invalid_code(kind: PrimitiveKind) -> &'static str {
    use PrimitiveKind::*;
    match kind {
        Int16 | Int32 | Int64 | Float32 | Float64 | Numeric => "invalid_numeric",
        Boolean => "invalid_boolean",
        String => "invalid_string",
        Text => "invalid_text",
        Html => "invalid_html",
        Json => "invalid_json",
        Xml => "invalid_xml",
        Url => "invalid_url",
        Email => "invalid_email",
        Tel => "invalid_tel",
        Password => "invalid_password",
        Date => "invalid_date",
        Time => "invalid_time",
        DateTime => "invalid_datetime",
        TimeZone => "invalid_timezone",
        Color => "invalid_color",
        Binary | File | Image | Document | Audio | Video => "invalid_binary",
    }
}
