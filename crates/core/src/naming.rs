//! Naming rules
//!
//! Type, field, index and action names are 1-30 characters of `[a-z0-9_]`.
//! Object identifiers are 1-100 characters of `[a-z0-9-.]`.
//!
//! Field names additionally reject the implicit system columns
//! ([`RESERVED_FIELD_NAMES`]). Type names reject [`RESERVED_TYPE_NAMES`] and
//! any primitive kind name.

use crate::error::{NameKind, SchemaError, SchemaResult};
use crate::kind::PrimitiveKind;

/// Maximum length of type, field, index and action names.
pub const MAX_NAME_LENGTH: usize = 30;

/// Maximum length of object identifiers.
pub const MAX_ID_LENGTH: usize = 100;

/// Implicit system columns every record has.
pub const RESERVED_FIELD_NAMES: [&str; 4] = ["id", "cdate", "udate", "backup"];

/// Words a type may not be named.
pub const RESERVED_TYPE_NAMES: [&str; 1] = ["static"];

/// Maximum length for names of `entity`.
pub const fn max_length(entity: NameKind) -> usize {
    match entity {
        NameKind::Id => MAX_ID_LENGTH,
        _ => MAX_NAME_LENGTH,
    }
}

fn allowed_char(entity: NameKind, c: char) -> bool {
    match entity {
        NameKind::Id => matches!(c, 'a'..='z' | '0'..='9' | '-' | '.'),
        _ => matches!(c, 'a'..='z' | '0'..='9' | '_'),
    }
}

/// Empty, length and character checks shared by every entity.
pub fn check_name(entity: NameKind, name: &str) -> SchemaResult<()> {
    if name.is_empty() {
        return Err(SchemaError::EmptyName { entity });
    }
    let max = max_length(entity);
    if name.chars().count() > max {
        return Err(SchemaError::NameTooLong {
            entity,
            name: name.to_string(),
            max,
        });
    }
    if !name.chars().all(|c| allowed_char(entity, c)) {
        return Err(SchemaError::InvalidName {
            entity,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Whether `name` is an implicit system column.
pub fn is_reserved_field_name(name: &str) -> bool {
    RESERVED_FIELD_NAMES.contains(&name)
}

/// Validate a type name.
pub fn check_type_name(name: &str) -> SchemaResult<()> {
    if RESERVED_TYPE_NAMES.contains(&name) {
        return Err(SchemaError::TypeReservedName {
            name: name.to_string(),
        });
    }
    check_name(NameKind::Type, name)?;
    if PrimitiveKind::from_name(name).is_some() {
        return Err(SchemaError::PrimitiveTypeNameCollision {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate a user-defined field name.
pub fn check_field_name(name: &str) -> SchemaResult<()> {
    if is_reserved_field_name(name) {
        return Err(SchemaError::FieldReservedName {
            name: name.to_string(),
        });
    }
    check_name(NameKind::Field, name)
}

/// Validate a field reference inside an index or a record: system columns
/// are allowed here.
pub fn check_field_reference(name: &str) -> SchemaResult<()> {
    if is_reserved_field_name(name) {
        return Ok(());
    }
    check_name(NameKind::Field, name)
}

/// Validate an index name.
pub fn check_index_name(name: &str) -> SchemaResult<()> {
    check_name(NameKind::Index, name)
}

/// Validate an action name.
pub fn check_action_name(name: &str) -> SchemaResult<()> {
    check_name(NameKind::Action, name)
}

/// Validate an object identifier.
pub fn check_id(id: &str) -> SchemaResult<()> {
    check_name(NameKind::Id, id)
}
