//! Schemata - dynamic schema and value-coercion engine
//!
//! Runtime-defined record types ("types") are named collections of typed
//! fields, indexes and actions that can be created, altered and coerced
//! against without recompilation.
//!
//! # Quick Start
//!
//! ```ignore
//! use schemata::{PrimitiveKind, RawValue, SchemaEngine, Type, TypeField};
//!
//! let engine = SchemaEngine::default();
//! let old = Type::builder("invoice")
//!     .field("amount", TypeField::from_parameters(PrimitiveKind::Numeric, Some("10,2"), true)?)
//!     .build()?;
//! let new = Type::builder("invoice")
//!     .field("total", TypeField::from_parameters(PrimitiveKind::Numeric, Some("12,2"), true)?
//!         .renamed_from("amount"))
//!     .build()?;
//!
//! let alteration = engine.alter(&old, &new, None)?;
//! assert_eq!(alteration.result.renamed_fields(), ["total"]);
//! engine.commit(&alteration);
//!
//! let value = engine.coerce_field(&alteration.schema, "total", &RawValue::from("12.50"))?;
//! ```
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `schemata-core` | kinds, fields, indexes, types, alter diff, coercion |
//! | `schemata-engine` | schema cache, configuration, engine facade |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use schemata_core::*;
pub use schemata_engine::*;
