//! Core types for Schemata
//!
//! This crate defines the schema model and the value-coercion library:
//! - PrimitiveKind: the closed set of field kinds and their capability groups
//! - FieldRange: inclusive bounds of ordered fields
//! - TypeField / TypeIndex / Type: runtime-defined record schemas
//! - AlterResult: the delta between two definitions of a type
//! - Value / RawValue: canonical typed values and incoming representations
//! - Tuple: ordered field carrier plus the `parse_*` coercion functions
//! - File / Image / Document: binary wrappers with lazily derived metadata
//! - Record: a timestamped object of a type
//! - SchemaError: error taxonomy
//!
//! Everything here is pure: no I/O, no logging, no shared mutable state
//! beyond the compute-once caches inside file wrappers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alter;
pub mod content;
pub mod error;
pub mod field;
pub mod file;
pub mod hex;
pub mod index;
pub mod kind;
pub mod naming;
pub mod range;
pub mod record;
pub mod scalar;
pub mod schema;
pub mod tuple;
pub mod value;

pub use alter::{alter, AlterFieldResult, AlterIndexResult, AlterResult, Alteration};
pub use content::{default_analyzer, ContentAnalyzer, SignatureAnalyzer};
pub use error::{ErrorClass, NameKind, SchemaError, SchemaResult};
pub use field::{FieldParameters, RangeDefinition, TypeField, DEFAULT_STRING_LENGTH};
pub use file::{Document, File, Image};
pub use index::{IndexMode, TypeIndex};
pub use kind::{numeric_max, PrimitiveKind, MAX_NUMERIC_PRECISION};
pub use range::FieldRange;
pub use record::Record;
pub use scalar::{Color, Email, TimeZone, Url, Xml};
pub use schema::{FieldMap, Type, TypeBuilder};
pub use tuple::{parse, parse_with, ParseOptions, Tuple};
pub use value::{compare, RawValue, Value};
