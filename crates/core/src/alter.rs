//! Alter diff
//!
//! [`AlterResult::diff`] compares an old and a new [`Type`] and returns the
//! complete delta in one value. Entries are matched in two passes:
//!
//! 1. A new entry declaring `old_name` claims that old entry. The old name
//!    must exist and may be claimed only once.
//! 2. A new entry without a claim matches the old entry of the same name,
//!    unless another new entry already claimed that old entry.
//!
//! Unmatched new entries are added, unmatched old entries are dropped.
//! Renames are reported under the new name and may also be altered in place.
//! Matches are never inferred from kind or position.
//!
//! Index field lists are compared after mapping old field names through the
//! field renames of the same batch, so an index following a renamed column is
//! not reported as altered.

use crate::error::{NameKind, SchemaError, SchemaResult};
use crate::field::TypeField;
use crate::index::TypeIndex;
use crate::schema::Type;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// Aspects of a field changed in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterFieldResult {
    /// Primitive kind differs
    pub type_changed: bool,
    /// Nullability differs
    pub not_null_changed: bool,
    /// Canonical parameter string differs
    pub parameters_changed: bool,
}

impl AlterFieldResult {
    /// Compare two definitions of one field.
    pub fn between(old: &TypeField, new: &TypeField) -> Self {
        AlterFieldResult {
            type_changed: old.kind() != new.kind(),
            not_null_changed: old.not_null() != new.not_null(),
            parameters_changed: old.parameters_string() != new.parameters_string(),
        }
    }

    /// Any aspect changed.
    pub fn is_altered(&self) -> bool {
        self.type_changed || self.not_null_changed || self.parameters_changed
    }
}

/// Aspects of an index changed in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterIndexResult {
    /// Index mode differs
    pub mode_changed: bool,
    /// Field list or its order differs
    pub fields_changed: bool,
}

impl AlterIndexResult {
    /// Compare two definitions of one index, field names taken literally.
    pub fn between(old: &TypeIndex, new: &TypeIndex) -> Self {
        Self::between_renamed(old, new, &HashMap::new())
    }

    fn between_renamed(old: &TypeIndex, new: &TypeIndex, field_renames: &HashMap<&str, &str>) -> Self {
        let old_fields = old
            .fields()
            .iter()
            .map(|f| field_renames.get(f.as_str()).copied().unwrap_or(f.as_str()));
        AlterIndexResult {
            mode_changed: old.mode() != new.mode(),
            fields_changed: !old_fields.eq(new.fields().iter().map(String::as_str)),
        }
    }

    /// Any aspect changed.
    pub fn is_altered(&self) -> bool {
        self.mode_changed || self.fields_changed
    }
}

/// Delta between two definitions of a type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterResult {
    altered_fields: IndexMap<String, AlterFieldResult>,
    added_fields: Vec<String>,
    dropped_fields: Vec<String>,
    renamed_fields: IndexMap<String, String>,
    altered_indexes: IndexMap<String, AlterIndexResult>,
    added_indexes: Vec<String>,
    dropped_indexes: Vec<String>,
    renamed_indexes: IndexMap<String, String>,
    adate: Option<DateTime<Utc>>,
}

/// Matching of one entry map against its predecessor.
struct EntryDiff {
    /// (new name, old name) of entries present on both sides
    matched: Vec<(String, String)>,
    added: Vec<String>,
    dropped: Vec<String>,
    /// new name -> old name
    renamed: IndexMap<String, String>,
}

fn diff_entries<V>(
    entity: NameKind,
    old_type: &str,
    old: &IndexMap<String, V>,
    new: &IndexMap<String, V>,
    old_name: impl Fn(&V) -> Option<&str>,
) -> SchemaResult<EntryDiff> {
    let mut claims: HashMap<&str, &str> = HashMap::new();
    for (new_key, value) in new {
        let Some(claimed) = old_name(value) else {
            continue;
        };
        if !old.contains_key(claimed) {
            let type_name = old_type.to_string();
            let name = claimed.to_string();
            return Err(match entity {
                NameKind::Index => SchemaError::IndexNotFound { type_name, name },
                _ => SchemaError::FieldNotFound { type_name, name },
            });
        }
        if claims.insert(claimed, new_key.as_str()).is_some() {
            return Err(SchemaError::DuplicateOldName {
                entity,
                name: claimed.to_string(),
            });
        }
    }

    let mut diff = EntryDiff {
        matched: Vec::new(),
        added: Vec::new(),
        dropped: Vec::new(),
        renamed: IndexMap::new(),
    };
    for (new_key, value) in new {
        match old_name(value) {
            Some(claimed) => {
                if claimed != new_key {
                    diff.renamed.insert(new_key.clone(), claimed.to_string());
                }
                diff.matched.push((new_key.clone(), claimed.to_string()));
            }
            None if old.contains_key(new_key) && !claims.contains_key(new_key.as_str()) => {
                diff.matched.push((new_key.clone(), new_key.clone()));
            }
            None => diff.added.push(new_key.clone()),
        }
    }
    for old_key in old.keys() {
        if !diff.matched.iter().any(|(_, matched)| matched == old_key) {
            diff.dropped.push(old_key.clone());
        }
    }
    Ok(diff)
}

impl AlterResult {
    /// Diff `old` against `new`.
    ///
    /// Fails when an `old_name` does not exist in `old` or is claimed twice.
    pub fn diff(old: &Type, new: &Type) -> SchemaResult<AlterResult> {
        let fields = diff_entries(NameKind::Field, old.name(), old.fields(), new.fields(), TypeField::old_name)?;
        let mut altered_fields = IndexMap::new();
        for (new_name, old_name) in &fields.matched {
            let change = AlterFieldResult::between(&old.fields()[old_name], &new.fields()[new_name]);
            if change.is_altered() {
                altered_fields.insert(new_name.clone(), change);
            }
        }

        let field_renames: HashMap<&str, &str> = fields
            .renamed
            .iter()
            .map(|(new_name, old_name)| (old_name.as_str(), new_name.as_str()))
            .collect();
        let indexes = diff_entries(NameKind::Index, old.name(), old.indexes(), new.indexes(), TypeIndex::old_name)?;
        let mut altered_indexes = IndexMap::new();
        for (new_name, old_name) in &indexes.matched {
            let change = AlterIndexResult::between_renamed(
                &old.indexes()[old_name],
                &new.indexes()[new_name],
                &field_renames,
            );
            if change.is_altered() {
                altered_indexes.insert(new_name.clone(), change);
            }
        }

        Ok(AlterResult {
            altered_fields,
            added_fields: fields.added,
            dropped_fields: fields.dropped,
            renamed_fields: fields.renamed,
            altered_indexes,
            added_indexes: indexes.added,
            dropped_indexes: indexes.dropped,
            renamed_indexes: indexes.renamed,
            adate: None,
        })
    }

    /// Same result stamped with the alteration instant.
    pub fn with_adate(mut self, at: DateTime<Utc>) -> AlterResult {
        self.adate = Some(at);
        self
    }

    /// True iff any collection is non-empty.
    pub fn is_altered(&self) -> bool {
        !self.altered_fields.is_empty()
            || !self.added_fields.is_empty()
            || !self.dropped_fields.is_empty()
            || !self.renamed_fields.is_empty()
            || !self.altered_indexes.is_empty()
            || !self.added_indexes.is_empty()
            || !self.dropped_indexes.is_empty()
            || !self.renamed_indexes.is_empty()
    }

    /// Fields changed in place, keyed by their new name.
    pub fn altered_fields(&self) -> &IndexMap<String, AlterFieldResult> {
        &self.altered_fields
    }

    /// Fields only present in the new type.
    pub fn added_fields(&self) -> &[String] {
        &self.added_fields
    }

    /// Fields only present in the old type.
    pub fn dropped_fields(&self) -> &[String] {
        &self.dropped_fields
    }

    /// New names of renamed fields.
    pub fn renamed_fields(&self) -> Vec<&str> {
        self.renamed_fields.keys().map(String::as_str).collect()
    }

    /// Old name of a renamed field.
    pub fn field_renamed_from(&self, new_name: &str) -> Option<&str> {
        self.renamed_fields.get(new_name).map(String::as_str)
    }

    /// Indexes changed in place, keyed by their new name.
    pub fn altered_indexes(&self) -> &IndexMap<String, AlterIndexResult> {
        &self.altered_indexes
    }

    /// Indexes only present in the new type.
    pub fn added_indexes(&self) -> &[String] {
        &self.added_indexes
    }

    /// Indexes only present in the old type.
    pub fn dropped_indexes(&self) -> &[String] {
        &self.dropped_indexes
    }

    /// New names of renamed indexes.
    pub fn renamed_indexes(&self) -> Vec<&str> {
        self.renamed_indexes.keys().map(String::as_str).collect()
    }

    /// Old name of a renamed index.
    pub fn index_renamed_from(&self, new_name: &str) -> Option<&str> {
        self.renamed_indexes.get(new_name).map(String::as_str)
    }

    /// Alteration instant, once applied.
    pub fn adate(&self) -> Option<DateTime<Utc>> {
        self.adate
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlterDescription<'a> {
    altered: bool,
    altered_fields: &'a IndexMap<String, AlterFieldResult>,
    added_fields: &'a [String],
    dropped_fields: &'a [String],
    renamed_fields: &'a IndexMap<String, String>,
    altered_indexes: &'a IndexMap<String, AlterIndexResult>,
    added_indexes: &'a [String],
    dropped_indexes: &'a [String],
    renamed_indexes: &'a IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    altered_at: Option<&'a DateTime<Utc>>,
}

/// Renames serialize as `{new name: old name}`.
impl Serialize for AlterResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AlterDescription {
            altered: self.is_altered(),
            altered_fields: &self.altered_fields,
            added_fields: &self.added_fields,
            dropped_fields: &self.dropped_fields,
            renamed_fields: &self.renamed_fields,
            altered_indexes: &self.altered_indexes,
            added_indexes: &self.added_indexes,
            dropped_indexes: &self.dropped_indexes,
            renamed_indexes: &self.renamed_indexes,
            altered_at: self.adate.as_ref(),
        }
        .serialize(serializer)
    }
}

/// A computed alteration: the type to store and the delta to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct Alteration {
    /// New description, rename markers cleared, `cdate` kept from the old type
    pub schema: Type,
    /// Delta between the old and the new description
    pub result: AlterResult,
}

/// Diff `old` against `new` and produce the type to store at `at`.
pub fn alter(old: &Type, new: &Type, at: DateTime<Utc>) -> SchemaResult<Alteration> {
    let result = AlterResult::diff(old, new)?.with_adate(at);
    let schema = new
        .clone()
        .without_old_names()
        .with_created_at(old.created_at())
        .with_altered_at(at);
    Ok(Alteration { schema, result })
}
