use aula_core::FieldErrorCode;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

use super::{FieldOutcome, compile, validate};
use crate::form::{FieldSpec, FieldType, FormSchema};

fn schema(value: Value) -> FormSchema {
    FormSchema::from_json(&value).unwrap_or_default()
}

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn contact_schema() -> FormSchema {
    schema(json!({
        "fields": [
            {"name": "email", "type": "email", "required": true},
            {"name": "note", "type": "string", "required": false}
        ]
    }))
}

#[test]
fn empty_schema_accepts_any_payload() {
    let result = validate(
        &FormSchema::default(),
        &payload(json!({"anything": [1, 2, 3], "else": null})),
    );
    assert!(result.is_ok());
}

#[test]
fn optional_fields_accept_empty_payload() {
    let schema = schema(json!({
        "fields": [
            {"name": "phone", "type": "number"},
            {"name": "site", "type": "string", "max": 10}
        ]
    }));

    assert!(validate(&schema, &Map::new()).is_ok());
}

#[test]
fn missing_required_field_reports_only_missing_field() {
    let result = validate(&contact_schema(), &payload(json!({"note": "hi"})));

    let errors = result.err().unwrap_or_default();
    assert_eq!(errors.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["email"]);
    assert_eq!(
        errors.get("email"),
        Some([FieldErrorCode::MissingField].as_slice())
    );
}

#[test]
fn valid_payload_is_returned_unchanged() {
    let submitted = payload(json!({"email": "x@y.com", "note": "hi"}));
    let result = validate(&contact_schema(), &submitted);

    assert!(result.is_ok());
    assert_eq!(result.unwrap_or_default().into_map(), submitted);
}

#[test]
fn blank_and_null_values_count_as_missing() {
    for value in [json!(null), json!(""), json!("   "), json!([]), json!({})] {
        let result = validate(&contact_schema(), &payload(json!({"email": value})));
        let errors = result.err().unwrap_or_default();
        assert_eq!(
            errors.get("email"),
            Some([FieldErrorCode::MissingField].as_slice())
        );
    }
}

#[test]
fn email_field_checks_syntax() {
    let invalid = validate(&contact_schema(), &payload(json!({"email": "not-an-email"})));
    assert_eq!(
        invalid.err().unwrap_or_default().get("email"),
        Some([FieldErrorCode::InvalidType].as_slice())
    );

    let valid = validate(&contact_schema(), &payload(json!({"email": "a@b.com"})));
    assert!(valid.is_ok());
}

#[test]
fn email_field_rejects_non_string_values() {
    let result = validate(&contact_schema(), &payload(json!({"email": 42})));
    assert_eq!(
        result.err().unwrap_or_default().get("email"),
        Some([FieldErrorCode::InvalidType].as_slice())
    );
}

#[test]
fn max_length_is_inclusive() {
    let schema = schema(json!({"fields": [{"name": "code", "max": 5}]}));

    let too_long = validate(&schema, &payload(json!({"code": "abcdef"})));
    assert_eq!(
        too_long.err().unwrap_or_default().get("code"),
        Some([FieldErrorCode::TooLong].as_slice())
    );

    assert!(validate(&schema, &payload(json!({"code": "abcde"}))).is_ok());
}

#[test]
fn max_length_counts_characters() {
    let schema = schema(json!({"fields": [{"name": "city", "max": 6}]}));
    assert!(validate(&schema, &payload(json!({"city": "Bogotá"}))).is_ok());
}

#[test]
fn number_field_coerces_numeric_strings() {
    let schema = schema(json!({
        "fields": [
            {"name": "age", "type": "number"},
            {"name": "score", "type": "number"},
            {"name": "credits", "type": "number"}
        ]
    }));

    let result = validate(
        &schema,
        &payload(json!({"age": " 42 ", "score": "3.5", "credits": 12})),
    );
    let normalized = result.unwrap_or_default().into_map();

    assert_eq!(normalized.get("age"), Some(&json!(42)));
    assert_eq!(normalized.get("score"), Some(&json!(3.5)));
    assert_eq!(normalized.get("credits"), Some(&json!(12)));
}

#[test]
fn number_field_normalizes_integral_strings_to_integers() {
    let schema = schema(json!({"fields": [{"name": "n", "type": "number"}]}));

    let cases = [
        ("3.0", json!(3)),
        ("1e2", json!(100)),
        ("-0.0", json!(0)),
        ("18446744073709551615", json!(18_446_744_073_709_551_615_u64)),
        ("2.25", json!(2.25)),
    ];
    for (text, expected) in cases {
        let normalized = validate(&schema, &payload(json!({"n": text})))
            .unwrap_or_default()
            .into_map();
        assert_eq!(normalized.get("n"), Some(&expected), "input {text}");
    }
}

#[test]
fn number_field_rejects_non_numeric_values() {
    let schema = schema(json!({"fields": [{"name": "age", "type": "number"}]}));

    for value in [json!("forty"), json!("NaN"), json!("inf"), json!(true), json!([1])] {
        let result = validate(&schema, &payload(json!({"age": value})));
        assert_eq!(
            result.err().unwrap_or_default().get("age"),
            Some([FieldErrorCode::InvalidType].as_slice()),
        );
    }
}

#[test]
fn string_field_accepts_scalars_only() {
    let schema = schema(json!({"fields": [{"name": "title"}]}));

    for value in [json!("Dean"), json!(7), json!(false)] {
        assert!(validate(&schema, &payload(json!({"title": value}))).is_ok());
    }

    let result = validate(&schema, &payload(json!({"title": {"nested": true}})));
    assert_eq!(
        result.err().unwrap_or_default().get("title"),
        Some([FieldErrorCode::InvalidType].as_slice())
    );
}

#[test]
fn unknown_type_validates_as_string() {
    let schema = schema(json!({"fields": [{"name": "born_on", "type": "date"}]}));
    assert!(validate(&schema, &payload(json!({"born_on": "not a date"}))).is_ok());
}

#[test]
fn all_failing_fields_are_reported_in_schema_order() {
    let schema = schema(json!({
        "fields": [
            {"name": "name", "required": true},
            {"name": "email", "type": "email", "required": true, "max": 8},
            {"name": "age", "type": "number"}
        ]
    }));

    let result = validate(
        &schema,
        &payload(json!({"age": "old", "email": "definitely-not-valid"})),
    );
    let errors = result.err().unwrap_or_default();

    assert_eq!(errors.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["name", "email", "age"]);
    assert_eq!(
        errors.get("email"),
        Some([FieldErrorCode::InvalidType, FieldErrorCode::TooLong].as_slice())
    );
}

#[test]
fn undeclared_fields_pass_through() {
    let result = validate(
        &contact_schema(),
        &payload(json!({"email": "a@b.com", "utm_source": ["newsletter"]})),
    );

    let normalized = result.unwrap_or_default().into_map();
    assert_eq!(normalized.get("utm_source"), Some(&json!(["newsletter"])));
}

#[test]
fn compiled_form_keeps_schema_order() {
    let compiled = compile(&contact_schema());
    let names: Vec<&str> = compiled
        .validators()
        .iter()
        .map(|validator| validator.name())
        .collect();
    assert_eq!(names, vec!["email", "note"]);
}

#[test]
fn optional_empty_value_is_skipped() {
    let compiled = compile(&schema(json!({
        "fields": [{"name": "website", "type": "email", "max": 3}]
    })));

    assert_eq!(compiled.validators()[0].check(Some(&json!(""))), FieldOutcome::Skipped);
    assert_eq!(compiled.validators()[0].check(None), FieldOutcome::Skipped);
}

fn field_type_strategy() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        Just(FieldType::String),
        Just(FieldType::Email),
        Just(FieldType::Number),
    ]
}

fn schema_strategy() -> impl Strategy<Value = FormSchema> {
    prop::collection::vec(
        (
            "[a-e]",
            field_type_strategy(),
            any::<bool>(),
            prop::option::of(0usize..12),
        ),
        0..5,
    )
    .prop_map(|specs| {
        let mut fields: Vec<FieldSpec> = Vec::new();
        for (name, field_type, required, max_length) in specs {
            if fields.iter().any(|field| field.name() == name) {
                continue;
            }
            if let Ok(field) = FieldSpec::new(name, field_type, required, max_length) {
                fields.push(field);
            }
        }
        FormSchema::new(fields).unwrap_or_default()
    })
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z@. 0-9]{0,16}".prop_map(Value::String),
    ]
}

fn payload_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-g]", scalar_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn validation_is_deterministic(schema in schema_strategy(), payload in payload_strategy()) {
        let first = validate(&schema, &payload);
        let second = validate(&schema, &payload);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn schemas_without_required_fields_accept_empty_payload(schema in schema_strategy()) {
        let optional_only = FormSchema::new(
            schema
                .fields()
                .iter()
                .filter(|field| !field.is_required())
                .cloned()
                .collect(),
        )
        .unwrap_or_default();

        prop_assert!(validate(&optional_only, &Map::new()).is_ok());
    }

    #[test]
    fn absent_required_field_reports_exactly_missing_field(
        schema in schema_strategy(),
        payload in payload_strategy(),
    ) {
        let result = validate(&schema, &payload);
        for field in schema.fields().iter().filter(|field| field.is_required()) {
            if payload.contains_key(field.name()) {
                continue;
            }
            let errors = result.clone().err().unwrap_or_default();
            prop_assert_eq!(
                errors.get(field.name()),
                Some([FieldErrorCode::MissingField].as_slice())
            );
        }
    }
}
