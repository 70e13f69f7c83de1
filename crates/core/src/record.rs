//! Stored objects
//!
//! A [`Record`] is one object of a type: its identifier, display name,
//! creation and update instants, backup flag and the user field values as a
//! [`Tuple`]. Timestamps must be UTC.

use crate::error::SchemaResult;
use crate::naming;
use crate::tuple::{etag, require_utc, Tuple};
use chrono::{DateTime, FixedOffset, Utc};

/// One object of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    id: String,
    name: String,
    cdate: Option<DateTime<Utc>>,
    udate: Option<DateTime<Utc>>,
    backup: Option<bool>,
    fields: Tuple,
}

impl Record {
    /// Object `id` of type `type_name`; the name defaults to the id.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> SchemaResult<Record> {
        let type_name = type_name.into();
        let id = id.into();
        naming::check_type_name(&type_name)?;
        naming::check_id(&id)?;
        Ok(Record {
            type_name,
            name: id.clone(),
            id,
            cdate: None,
            udate: None,
            backup: None,
            fields: Tuple::new(),
        })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Record {
        self.name = name.into();
        self
    }

    /// Set the creation instant. Fails with `invalid_timezone` unless UTC.
    pub fn with_cdate(mut self, at: impl Into<DateTime<FixedOffset>>) -> SchemaResult<Record> {
        self.cdate = Some(require_utc(at.into())?);
        Ok(self)
    }

    /// Set the update instant. Fails with `invalid_timezone` unless UTC.
    pub fn with_udate(mut self, at: impl Into<DateTime<FixedOffset>>) -> SchemaResult<Record> {
        self.udate = Some(require_utc(at.into())?);
        Ok(self)
    }

    /// Set the backup flag.
    pub fn with_backup(mut self, backup: bool) -> Record {
        self.backup = Some(backup);
        self
    }

    /// Replace the field values. Every key must be a valid user field name.
    pub fn with_fields(mut self, fields: Tuple) -> SchemaResult<Record> {
        for key in fields.keys() {
            naming::check_field_name(key)?;
        }
        self.fields = fields;
        Ok(self)
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Object identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation instant.
    pub fn cdate(&self) -> Option<DateTime<Utc>> {
        self.cdate
    }

    /// Update instant.
    pub fn udate(&self) -> Option<DateTime<Utc>> {
        self.udate
    }

    /// Backup flag.
    pub fn backup(&self) -> Option<bool> {
        self.backup
    }

    /// User field values.
    pub fn fields(&self) -> &Tuple {
        &self.fields
    }

    /// Entity tag derived from the update instant.
    pub fn etag(&self) -> Option<String> {
        self.udate.as_ref().map(etag)
    }
}
