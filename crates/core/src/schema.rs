//! Runtime-defined record types
//!
//! A [`Type`] is an immutable description: a name, optional creation and
//! alteration instants, and insertion-ordered maps of fields, indexes and
//! actions. It is built through [`TypeBuilder`], which runs every naming and
//! structural check, or deserialized from the schema description format:
//!
//! ```json
//! {
//!   "name": "invoice",
//!   "createdAt": "2024-01-01T00:00:00Z",
//!   "fields": {"amount": {"kind": "numeric", "precision": 10, "scale": 2}},
//!   "indexes": {"by_amount": {"mode": "index", "fields": ["amount"]}},
//!   "actions": {"pay": {"method": {"kind": "string"}}}
//! }
//! ```
//!
//! Altering a type never mutates it; see [`crate::alter`].

use crate::error::{SchemaError, SchemaResult};
use crate::field::TypeField;
use crate::index::{IndexDefinition, TypeIndex};
use crate::naming;
use crate::tuple::{require_utc, ParseOptions, Tuple};
use crate::value::{RawValue, Value};
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Ordered field map of a type or an action.
pub type FieldMap = IndexMap<String, TypeField>;

/// A named record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    name: String,
    cdate: Option<DateTime<Utc>>,
    adate: Option<DateTime<Utc>>,
    fields: FieldMap,
    indexes: IndexMap<String, TypeIndex>,
    actions: IndexMap<String, FieldMap>,
}

impl Type {
    /// Start building a type called `name`.
    pub fn builder(name: impl Into<String>) -> TypeBuilder {
        TypeBuilder::new(name)
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation instant.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.cdate
    }

    /// Last alteration instant.
    pub fn altered_at(&self) -> Option<DateTime<Utc>> {
        self.adate
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&TypeField> {
        self.fields.get(name)
    }

    /// Indexes in declaration order.
    pub fn indexes(&self) -> &IndexMap<String, TypeIndex> {
        &self.indexes
    }

    /// Index by name.
    pub fn index(&self, name: &str) -> Option<&TypeIndex> {
        self.indexes.get(name)
    }

    /// Actions in declaration order.
    pub fn actions(&self) -> &IndexMap<String, FieldMap> {
        &self.actions
    }

    /// Parameter fields of an action.
    pub fn action(&self, name: &str) -> Option<&FieldMap> {
        self.actions.get(name)
    }

    /// Same type with a new creation instant.
    pub fn with_created_at(mut self, at: Option<DateTime<Utc>>) -> Type {
        self.cdate = at;
        self
    }

    /// Same type with a new alteration instant.
    pub fn with_altered_at(mut self, at: DateTime<Utc>) -> Type {
        self.adate = Some(at);
        self
    }

    /// Same type with every field and index rename marker cleared.
    pub fn without_old_names(mut self) -> Type {
        self.fields = self
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.without_old_name()))
            .collect();
        self.indexes = self
            .indexes
            .into_iter()
            .map(|(name, index)| (name, index.without_old_name()))
            .collect();
        self
    }

    /// Coerce a raw value for one field of this type.
    pub fn coerce(&self, field: &str, raw: &RawValue) -> SchemaResult<Option<Value>> {
        self.coerce_with(field, raw, &ParseOptions::default())
    }

    /// [`Type::coerce`] with explicit file-handling options.
    pub fn coerce_with(&self, field: &str, raw: &RawValue, options: &ParseOptions) -> SchemaResult<Option<Value>> {
        let type_field = self.fields.get(field).ok_or_else(|| SchemaError::FieldNotFound {
            type_name: self.name.clone(),
            name: field.to_string(),
        })?;
        type_field
            .coerce_with(raw, options)
            .map_err(|e| e.with_field(field))
    }

    /// Coerce every non-null entry of `tuple`.
    ///
    /// Entries naming system columns are skipped; unknown entries fail with
    /// `field_not_found`. Output follows the type's field order.
    pub fn coerce_tuple(&self, tuple: &Tuple, options: &ParseOptions) -> SchemaResult<IndexMap<String, Value>> {
        for key in tuple.keys() {
            if !naming::is_reserved_field_name(key) && !self.fields.contains_key(key) {
                return Err(SchemaError::FieldNotFound {
                    type_name: self.name.clone(),
                    name: key.to_string(),
                });
            }
        }
        let mut values = IndexMap::with_capacity(tuple.len());
        for name in self.fields.keys() {
            if let Some(raw) = tuple.get(name) {
                if let Some(value) = self.coerce_with(name, raw, options)? {
                    values.insert(name.clone(), value);
                }
            }
        }
        Ok(values)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects the parts of a [`Type`]; [`TypeBuilder::build`] validates them.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: String,
    cdate: Option<DateTime<FixedOffset>>,
    adate: Option<DateTime<FixedOffset>>,
    fields: Vec<(String, TypeField)>,
    indexes: Vec<(String, TypeIndex)>,
    actions: Vec<(String, Vec<(String, TypeField)>)>,
}

impl TypeBuilder {
    /// Empty builder for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        TypeBuilder {
            name: name.into(),
            cdate: None,
            adate: None,
            fields: Vec::new(),
            indexes: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Creation instant; must be UTC.
    pub fn created_at(mut self, at: impl Into<DateTime<FixedOffset>>) -> Self {
        self.cdate = Some(at.into());
        self
    }

    /// Alteration instant; must be UTC.
    pub fn altered_at(mut self, at: impl Into<DateTime<FixedOffset>>) -> Self {
        self.adate = Some(at.into());
        self
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, field: TypeField) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Append an index.
    pub fn index(mut self, name: impl Into<String>, index: TypeIndex) -> Self {
        self.indexes.push((name.into(), index));
        self
    }

    /// Append an action with its parameter fields.
    pub fn action<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeField)>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(|(n, f)| (n.into(), f)).collect();
        self.actions.push((name.into(), fields));
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> SchemaResult<Type> {
        naming::check_type_name(&self.name)?;
        let cdate = self.cdate.map(require_utc).transpose()?;
        let adate = self.adate.map(require_utc).transpose()?;
        let fields = collect_fields(&self.name, self.fields)?;

        let mut indexes = IndexMap::with_capacity(self.indexes.len());
        for (name, index) in self.indexes {
            naming::check_index_name(&name)?;
            if let Some(old_name) = index.old_name() {
                naming::check_index_name(old_name)?;
            }
            if indexes.contains_key(&name) {
                return Err(SchemaError::DuplicateIndex {
                    type_name: self.name.clone(),
                    name,
                });
            }
            for field in index.fields() {
                if !naming::is_reserved_field_name(field) && !fields.contains_key(field) {
                    return Err(SchemaError::FieldNotFound {
                        type_name: self.name.clone(),
                        name: field.clone(),
                    });
                }
            }
            indexes.insert(name, index);
        }

        let mut actions = IndexMap::with_capacity(self.actions.len());
        for (name, action_fields) in self.actions {
            naming::check_action_name(&name)?;
            if actions.contains_key(&name) {
                return Err(SchemaError::DuplicateAction {
                    type_name: self.name.clone(),
                    name,
                });
            }
            let owner = format!("{}.{}", self.name, name);
            let action_fields = collect_fields(&owner, action_fields)?;
            actions.insert(name, action_fields);
        }

        Ok(Type {
            name: self.name,
            cdate,
            adate,
            fields,
            indexes,
            actions,
        })
    }
}

fn collect_fields(owner: &str, entries: Vec<(String, TypeField)>) -> SchemaResult<FieldMap> {
    let mut fields = FieldMap::with_capacity(entries.len());
    for (name, field) in entries {
        naming::check_field_name(&name)?;
        if let Some(old_name) = field.old_name() {
            naming::check_field_name(old_name)?;
        }
        if fields.contains_key(&name) {
            return Err(SchemaError::DuplicateField {
                type_name: owner.to_string(),
                name,
            });
        }
        fields.insert(name, field);
    }
    Ok(fields)
}

// =============================================================================
// Schema description format
// =============================================================================

/// Map entries in document order, duplicates included.
struct Entries<V>(Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Entries(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries<V>, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeDefinition {
    name: String,
    #[serde(default, rename = "createdAt", alias = "cdate")]
    created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, rename = "alteredAt", alias = "adate")]
    altered_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    fields: Entries<TypeField>,
    #[serde(default)]
    indexes: Entries<IndexDefinition>,
    #[serde(default)]
    actions: Entries<Entries<TypeField>>,
}

impl TryFrom<TypeDefinition> for Type {
    type Error = SchemaError;

    fn try_from(def: TypeDefinition) -> SchemaResult<Type> {
        let mut builder = TypeBuilder::new(def.name);
        builder.cdate = def.created_at;
        builder.adate = def.altered_at;
        builder.fields = def.fields.0;
        for (name, index) in def.indexes.0 {
            let index = index.into_index(&name)?;
            builder.indexes.push((name, index));
        }
        builder.actions = def
            .actions
            .0
            .into_iter()
            .map(|(name, fields)| (name, fields.0))
            .collect();
        builder.build()
    }
}

#[derive(Serialize)]
struct TypeDescription<'a> {
    name: &'a str,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    created_at: Option<&'a DateTime<Utc>>,
    #[serde(rename = "alteredAt", skip_serializing_if = "Option::is_none")]
    altered_at: Option<&'a DateTime<Utc>>,
    fields: &'a FieldMap,
    indexes: &'a IndexMap<String, TypeIndex>,
    actions: &'a IndexMap<String, FieldMap>,
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TypeDescription {
            name: &self.name,
            created_at: self.cdate.as_ref(),
            altered_at: self.adate.as_ref(),
            fields: &self.fields,
            indexes: &self.indexes,
            actions: &self.actions,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let def = TypeDefinition::deserialize(deserializer)?;
        Type::try_from(def).map_err(serde::de::Error::custom)
    }
}
