//! Alter diff scenarios

use crate::common::*;
use schemata::alter;

fn contact() -> Type {
    Type::builder("contact")
        .created_at(instant(2022, 6, 1))
        .field("old_name", field(PrimitiveKind::Int32))
        .field("email", field(PrimitiveKind::Email))
        .field("phone", field(PrimitiveKind::Tel))
        .index("by_email", index("by_email", IndexMode::Unique, &["email"]))
        .build()
        .unwrap()
}

#[test]
fn diff_of_unchanged_type_is_empty() {
    let t = contact();
    let result = AlterResult::diff(&t, &t).unwrap();
    assert!(!result.is_altered());
    assert!(result.altered_fields().is_empty());
    assert!(result.added_fields().is_empty());
    assert!(result.dropped_fields().is_empty());
    assert!(result.renamed_fields().is_empty());
    assert!(result.altered_indexes().is_empty());
    assert!(result.added_indexes().is_empty());
    assert!(result.dropped_indexes().is_empty());
    assert!(result.renamed_indexes().is_empty());
}

#[test]
fn rename_with_retype_is_reported_under_new_name() {
    let new = Type::builder("contact")
        .field(
            "new_name",
            field(PrimitiveKind::Int64).with_not_null(true).renamed_from("old_name"),
        )
        .field("email", field(PrimitiveKind::Email))
        .field("phone", field(PrimitiveKind::Tel))
        .index("by_email", index("by_email", IndexMode::Unique, &["email"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(result.renamed_fields(), ["new_name"]);
    assert_eq!(
        result.altered_fields().get("new_name"),
        Some(&AlterFieldResult {
            type_changed: true,
            not_null_changed: true,
            parameters_changed: false,
        })
    );
    assert!(result.dropped_fields().is_empty());
    assert!(result.added_fields().is_empty());
    assert!(result.is_altered());
}

#[test]
fn pure_rename_is_not_an_alteration_in_place() {
    let new = Type::builder("contact")
        .field("legacy", field(PrimitiveKind::Int32).renamed_from("old_name"))
        .field("email", field(PrimitiveKind::Email))
        .field("phone", field(PrimitiveKind::Tel))
        .index("by_email", index("by_email", IndexMode::Unique, &["email"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(result.renamed_fields(), ["legacy"]);
    assert!(result.altered_fields().is_empty());
}

#[test]
fn drop_and_add_without_old_name_is_never_inferred() {
    // Same kind and position, but no declared old name: a drop plus an add
    let new = Type::builder("contact")
        .field("legacy", field(PrimitiveKind::Int32))
        .field("email", field(PrimitiveKind::Email))
        .field("phone", field(PrimitiveKind::Tel))
        .index("by_email", index("by_email", IndexMode::Unique, &["email"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(result.added_fields(), ["legacy"]);
    assert_eq!(result.dropped_fields(), ["old_name"]);
    assert!(result.renamed_fields().is_empty());
}

#[test]
fn parameter_and_nullability_changes_are_independent() {
    let new = Type::builder("contact")
        .field("old_name", field(PrimitiveKind::Int32))
        .field(
            "email",
            TypeField::from_parameters(PrimitiveKind::Email, Some("100"), false).unwrap(),
        )
        .field("phone", field(PrimitiveKind::Tel).with_not_null(true))
        .index("by_email", index("by_email", IndexMode::Unique, &["email"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(
        result.altered_fields()["email"],
        AlterFieldResult {
            type_changed: false,
            not_null_changed: false,
            parameters_changed: true,
        }
    );
    assert_eq!(
        result.altered_fields()["phone"],
        AlterFieldResult {
            type_changed: false,
            not_null_changed: true,
            parameters_changed: false,
        }
    );
    assert!(!result.altered_fields().contains_key("old_name"));
}

#[test]
fn equivalent_parameter_forms_do_not_alter() {
    let old = Type::builder("money")
        .field("amount", decimal("12,0"))
        .build()
        .unwrap();
    let new = Type::builder("money")
        .field(
            "amount",
            TypeField::structured(PrimitiveKind::Numeric, None, Some(12), None, false).unwrap(),
        )
        .build()
        .unwrap();
    assert!(!AlterResult::diff(&old, &new).unwrap().is_altered());
}

#[test]
fn index_changes() {
    let new = Type::builder("contact")
        .field("old_name", field(PrimitiveKind::Int32))
        .field("email", field(PrimitiveKind::Email))
        .field("phone", field(PrimitiveKind::Tel))
        .index(
            "by_contact",
            index("by_contact", IndexMode::Index, &["email", "phone"]).renamed_from("by_email"),
        )
        .index("by_phone", index("by_phone", IndexMode::Index, &["phone"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(result.renamed_indexes(), ["by_contact"]);
    assert_eq!(result.index_renamed_from("by_contact"), Some("by_email"));
    assert_eq!(result.added_indexes(), ["by_phone"]);
    assert_eq!(
        result.altered_indexes()["by_contact"],
        AlterIndexResult {
            mode_changed: true,
            fields_changed: true,
        }
    );
}

#[test]
fn index_following_a_renamed_field_is_unchanged() {
    let new = Type::builder("contact")
        .field("old_name", field(PrimitiveKind::Int32))
        .field("mail", field(PrimitiveKind::Email).renamed_from("email"))
        .field("phone", field(PrimitiveKind::Tel))
        .index("by_email", index("by_email", IndexMode::Unique, &["mail"]))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    assert_eq!(result.renamed_fields(), ["mail"]);
    assert!(result.altered_indexes().is_empty());
}

#[test]
fn conflicting_old_names_are_rejected() {
    let new = Type::builder("contact")
        .field("a", field(PrimitiveKind::Int32).renamed_from("old_name"))
        .field("b", field(PrimitiveKind::Int32).renamed_from("old_name"))
        .build()
        .unwrap();
    assert_code(AlterResult::diff(&contact(), &new), "duplicate_old_name");

    let new = Type::builder("contact")
        .field("x", field(PrimitiveKind::Int32))
        .index("a", index("a", IndexMode::Index, &["x"]).renamed_from("by_email"))
        .index("b", index("b", IndexMode::Index, &["x"]).renamed_from("by_email"))
        .build()
        .unwrap();
    assert_code(AlterResult::diff(&contact(), &new), "duplicate_old_name");
}

#[test]
fn unknown_old_names_are_rejected() {
    let new = Type::builder("contact")
        .field("x", field(PrimitiveKind::Int32))
        .index("a", index("a", IndexMode::Index, &["x"]).renamed_from("by_nothing"))
        .build()
        .unwrap();
    assert_code(AlterResult::diff(&contact(), &new), "index_not_found");
}

#[test]
fn applied_alter_keeps_creation_and_stamps_alteration() {
    let at = instant(2024, 2, 29);
    let new = Type::builder("contact")
        .field("legacy", field(PrimitiveKind::Int32).renamed_from("old_name"))
        .build()
        .unwrap();
    let Alteration { schema, result } = alter(&contact(), &new, at).unwrap();
    assert_eq!(schema.created_at(), Some(instant(2022, 6, 1)));
    assert_eq!(schema.altered_at(), Some(at));
    assert_eq!(schema.field("legacy").unwrap().old_name(), None);
    assert_eq!(result.adate(), Some(at));
    assert_eq!(result.dropped_fields(), ["email", "phone"]);
    assert_eq!(result.dropped_indexes(), ["by_email"]);

    // Diffing the stored result against itself is a no-op
    assert!(!AlterResult::diff(&schema, &schema).unwrap().is_altered());
}

#[test]
fn alter_result_serializes_with_camel_case_keys() {
    let new = Type::builder("contact")
        .field("legacy", field(PrimitiveKind::Int64).renamed_from("old_name"))
        .build()
        .unwrap();
    let result = AlterResult::diff(&contact(), &new).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["altered"], serde_json::json!(true));
    assert_eq!(json["renamedFields"], serde_json::json!({"legacy": "old_name"}));
    assert_eq!(json["alteredFields"]["legacy"]["typeChanged"], serde_json::json!(true));
    assert_eq!(json["droppedIndexes"], serde_json::json!(["by_email"]));
}
