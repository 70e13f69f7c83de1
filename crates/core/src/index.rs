//! Index descriptions

use crate::error::{SchemaError, SchemaResult};
use crate::naming;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Indexing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexMode {
    /// Plain lookup index
    Index,
    /// Lookup index rejecting duplicate keys
    Unique,
    /// Full-text search index
    Fulltext,
}

impl IndexMode {
    /// All modes.
    pub const ALL: [IndexMode; 3] = [IndexMode::Index, IndexMode::Unique, IndexMode::Fulltext];

    /// Lowercase textual form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IndexMode::Index => "index",
            IndexMode::Unique => "unique",
            IndexMode::Fulltext => "fulltext",
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown index mode '{}'", s))
    }
}

impl Serialize for IndexMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IndexMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One index of a type: a mode and an ordered, non-empty field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexDefinition", into = "IndexDefinition")]
pub struct TypeIndex {
    mode: IndexMode,
    fields: Vec<String>,
    old_name: Option<String>,
}

impl TypeIndex {
    /// Index over `fields`, in column order.
    ///
    /// `name` is only used for error reporting. Entries must be valid field
    /// names or system columns.
    pub fn new<I, S>(name: &str, mode: IndexMode, fields: I) -> SchemaResult<TypeIndex>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(SchemaError::EmptyIndexFields {
                index: name.to_string(),
            });
        }
        for field in &fields {
            naming::check_field_reference(field)?;
        }
        Ok(TypeIndex {
            mode,
            fields,
            old_name: None,
        })
    }

    /// Mark the index as a rename of `old_name`.
    pub fn renamed_from(mut self, old_name: impl Into<String>) -> TypeIndex {
        self.old_name = Some(old_name.into());
        self
    }

    /// Same index without rename information.
    pub fn without_old_name(mut self) -> TypeIndex {
        self.old_name = None;
        self
    }

    /// Indexing strategy.
    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Indexed fields in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Name before an in-flight rename.
    pub fn old_name(&self) -> Option<&str> {
        self.old_name.as_deref()
    }
}

/// Serialized shape of an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IndexDefinition {
    mode: IndexMode,
    fields: Vec<String>,
    #[serde(default, rename = "oldName", alias = "old_name", skip_serializing)]
    old_name: Option<String>,
}

impl IndexDefinition {
    /// Validate into the index called `name`.
    pub(crate) fn into_index(self, name: &str) -> SchemaResult<TypeIndex> {
        let index = TypeIndex::new(name, self.mode, self.fields)?;
        match self.old_name {
            Some(old_name) => {
                naming::check_index_name(&old_name)?;
                Ok(index.renamed_from(old_name))
            }
            None => Ok(index),
        }
    }
}

impl TryFrom<IndexDefinition> for TypeIndex {
    type Error = SchemaError;

    fn try_from(def: IndexDefinition) -> SchemaResult<TypeIndex> {
        def.into_index("")
    }
}

impl From<TypeIndex> for IndexDefinition {
    fn from(index: TypeIndex) -> Self {
        IndexDefinition {
            mode: index.mode,
            fields: index.fields,
            old_name: None,
        }
    }
}
