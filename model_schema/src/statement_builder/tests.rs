use super::*;
use crate::column::ColumnSpec;
use crate::geo::GeoInput;
use crate::statement::Statement;
use serde_json::json;
use type_mapping::{PostgresValue, RowMode};

fn insert(model: &ModelDescriptor, data: &DataRecord) -> Result<Statement, BuildError> {
    StatementBuilder::new().build_insert(model, data, &InsertOptions::default())
}

fn update(model: &ModelDescriptor, data: &DataRecord) -> Result<Statement, BuildError> {
    StatementBuilder::new().build_update(model, data, &UpdateOptions::default())
}

#[test]
fn test_missing_required_column() {
    let model = ModelDescriptor::new("test").column("value", ColumnSpec::string().not_null());

    let err = insert(&model, &DataRecord::new()).unwrap_err();
    assert_eq!(err.to_string(), "test:value is required");
}

#[test]
fn test_required_column_with_explicit_null() {
    let model = ModelDescriptor::new("test").column("value", ColumnSpec::string().not_null());
    let data = DataRecord::new().set("value", PostgresValue::Null);

    assert!(matches!(
        insert(&model, &data),
        Err(BuildError::MissingRequired { .. })
    ));
}

#[test]
fn test_required_column_satisfied_by_default() {
    let model = ModelDescriptor::new("test")
        .column("status", ColumnSpec::string().not_null().default_value("new"));

    let stmt = insert(&model, &DataRecord::new()).unwrap();
    assert_eq!(stmt.text, "INSERT INTO test (status) VALUES ($1) RETURNING id");
    assert_eq!(stmt.values, vec![PostgresValue::Text("new".to_string())]);
}

#[test]
fn test_now_default_is_emitted_as_function_call() {
    let model = ModelDescriptor::new("test")
        .column("name", ColumnSpec::string())
        .column("created_at", ColumnSpec::timestamp().default_now());
    let data = DataRecord::new().set("name", "a");

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (name, created_at) VALUES ($1, now()) RETURNING id"
    );
    assert_eq!(stmt.values.len(), 1);
    assert_eq!(stmt.row_mode, RowMode::Array);
}

#[test]
fn test_now_default_on_array_column_is_rejected() {
    let model = ModelDescriptor::new("test").column("tags", ColumnSpec::int_array().default_now());

    assert!(matches!(
        insert(&model, &DataRecord::new()),
        Err(BuildError::InvalidDefault { .. })
    ));
}

#[test]
fn test_int_array_binds_each_element() {
    let model = ModelDescriptor::new("test").column("types", ColumnSpec::int_array());
    let data = DataRecord::new().set("types", vec![1i64, 2, 3]);

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (types) VALUES (ARRAY[$1,$2,$3]::int[]) RETURNING id"
    );
    assert_eq!(
        stmt.values,
        vec![
            PostgresValue::BigInt(1),
            PostgresValue::BigInt(2),
            PostgresValue::BigInt(3)
        ]
    );
}

#[test]
fn test_string_array_binds_each_element() {
    let model = ModelDescriptor::new("test")
        .column("name", ColumnSpec::string())
        .column("labels", ColumnSpec::string_array());
    let data = DataRecord::new().set("name", "n").set("labels", vec!["a", "b"]);

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (name, labels) VALUES ($1, ARRAY[$2,$3]::text[]) RETURNING id"
    );
    assert_eq!(stmt.values[2], PostgresValue::Text("b".to_string()));
}

#[test]
fn test_empty_array_becomes_null() {
    let model = ModelDescriptor::new("test").column("types", ColumnSpec::int_array());
    let data = DataRecord::new().set("types", Vec::<i64>::new());

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(stmt.text, "INSERT INTO test (types) VALUES (null) RETURNING id");
    assert!(stmt.values.is_empty());
}

#[test]
fn test_absent_optional_column_is_null_literal() {
    let model = ModelDescriptor::new("test")
        .column("name", ColumnSpec::string())
        .column("note", ColumnSpec::string());
    let data = DataRecord::new().set("name", "x");

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (name, note) VALUES ($1, null) RETURNING id"
    );
    assert_eq!(stmt.values.len(), 1);
}

#[test]
fn test_geo_point_is_inlined_with_lng_first() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point());
    let data = DataRecord::new().set("location", (35.6, 139.7));

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (location) VALUES (ST_SetSRID(ST_MakePoint(139.7,35.6),4326)) RETURNING id"
    );
    assert!(stmt.values.is_empty());
}

#[test]
fn test_geo_point_with_column_srid() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point().srid(3857));
    let data = DataRecord::new().set("location", (1.5, 2.5));

    let stmt = insert(&model, &data).unwrap();
    assert!(stmt.text.contains("ST_SetSRID(ST_MakePoint(2.5,1.5),3857)"));
}

#[test]
fn test_geo_point_from_numeric_strings() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point());
    let data = DataRecord::new().set("location", GeoInput::new("35.6", "139.7"));

    let stmt = insert(&model, &data).unwrap();
    assert!(stmt.text.contains("ST_MakePoint(139.7,35.6)"));
}

#[test]
fn test_invalid_geo_point() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point());
    let data = DataRecord::new().set("location", GeoInput::new("north", "139.7"));

    let err = insert(&model, &data).unwrap_err();
    assert!(matches!(err, BuildError::InvalidGeo { .. }));
    assert!(err.to_string().contains("[test:location]"));
}

#[test]
fn test_zero_coordinate_policy() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point());
    let data = DataRecord::new().set("location", (0.0, 139.7));

    let stmt = insert(&model, &data).unwrap();
    assert!(stmt.text.contains("ST_MakePoint(139.7,0)"));

    let strict = StatementBuilder::new().reject_zero_coordinates(true);
    let result = strict.build_insert(&model, &data, &InsertOptions::default());
    assert!(matches!(result, Err(BuildError::InvalidGeo { .. })));
}

#[test]
fn test_geo_polyline() {
    let model = ModelDescriptor::new("test").column("route", ColumnSpec::geo_polyline());
    let data = DataRecord::new().set("route", vec![(1.0, 2.0), (3.0, 4.0)]);

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (route) VALUES (ST_SetSRID(ST_MakeLine(ARRAY[ST_MakePoint(2,1),ST_MakePoint(4,3)]),4326)) RETURNING id"
    );
}

#[test]
fn test_empty_polyline_is_null() {
    let model = ModelDescriptor::new("test").column("route", ColumnSpec::geo_polyline());
    let data = DataRecord::new().set("route", Vec::<(f64, f64)>::new());

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(stmt.text, "INSERT INTO test (route) VALUES (null) RETURNING id");
}

#[test]
fn test_mismatched_value_type() {
    let model = ModelDescriptor::new("test").column("types", ColumnSpec::int_array());
    let data = DataRecord::new().set("types", "1,2,3");

    let err = insert(&model, &data).unwrap_err();
    assert!(matches!(
        err,
        BuildError::TypeMismatch {
            expected: ColumnType::IntArray,
            found: "scalar",
            ..
        }
    ));
}

#[test]
fn test_skipped_columns() {
    let model = ModelDescriptor::new("test")
        .column("id", ColumnSpec::int().readonly())
        .column("name", ColumnSpec::string())
        .column("owner", ColumnSpec::foreign())
        .column("created_at", ColumnSpec::timestamp().no_update().default_now())
        .column("updated_at", ColumnSpec::timestamp().no_insert().default_now());
    let data = DataRecord::new()
        .set("id", 7)
        .set("name", "x")
        .set("owner", "someone");

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (name, created_at) VALUES ($1, now()) RETURNING id"
    );

    let stmt = update(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "UPDATE test SET name = $1, updated_at = now() WHERE id = $2"
    );
    assert_eq!(
        stmt.values,
        vec![PostgresValue::Text("x".to_string()), PostgresValue::Integer(7)]
    );
}

#[test]
fn test_update_id_is_last_parameter() {
    let model = ModelDescriptor::new("test")
        .column("name", ColumnSpec::string())
        .column("types", ColumnSpec::int_array());
    let data = DataRecord::new()
        .set("id", 42i64)
        .set("name", "renamed")
        .set("types", vec![4i64, 5]);

    let stmt = update(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "UPDATE test SET name = $1, types = ARRAY[$2,$3]::int[] WHERE id = $4"
    );
    assert_eq!(stmt.values.last(), Some(&PostgresValue::BigInt(42)));
}

#[test]
fn test_update_without_id() {
    let model = ModelDescriptor::new("test").column("name", ColumnSpec::string());
    let data = DataRecord::new().set("name", "x");

    assert!(matches!(
        update(&model, &data),
        Err(BuildError::MissingId { .. })
    ));
}

#[test]
fn test_update_with_nothing_to_set() {
    let model = ModelDescriptor::new("test").column("id", ColumnSpec::int().readonly());
    let data = DataRecord::new().set("id", 1);

    assert!(matches!(
        update(&model, &data),
        Err(BuildError::NothingToUpdate { .. })
    ));
}

#[test]
fn test_update_honours_column_srid() {
    let model = ModelDescriptor::new("test").column("location", ColumnSpec::geo_point().srid(3857));
    let data = DataRecord::new().set("id", 1).set("location", (10.0, 20.0));

    let stmt = update(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "UPDATE test SET location = ST_SetSRID(ST_MakePoint(20,10),3857) WHERE id = $1"
    );
}

#[test]
fn test_insert_default_values() {
    let model = ModelDescriptor::new("test").column("id", ColumnSpec::int().readonly());

    let stmt = insert(&model, &DataRecord::new()).unwrap();
    assert_eq!(stmt.text, "INSERT INTO test DEFAULT VALUES RETURNING id");
}

#[test]
fn test_insert_options() {
    let model = ModelDescriptor::new("test").column("name", ColumnSpec::string());
    let data = DataRecord::new().set("name", "x");

    let options = InsertOptions::new().table("archive.test").return_id(false);
    let stmt = StatementBuilder::new().build_insert(&model, &data, &options).unwrap();
    assert_eq!(stmt.text, "INSERT INTO archive.test (name) VALUES ($1)");

    let options = InsertOptions::new().id_column("uid");
    let stmt = StatementBuilder::new().build_insert(&model, &data, &options).unwrap();
    assert!(stmt.text.ends_with("RETURNING uid"));
}

#[test]
fn test_invalid_table_override() {
    let model = ModelDescriptor::new("test").column("name", ColumnSpec::string());
    let data = DataRecord::new().set("name", "x");

    let options = InsertOptions::new().table("test; DROP TABLE test");
    let result = StatementBuilder::new().build_insert(&model, &data, &options);
    assert!(matches!(result, Err(BuildError::InvalidIdentifier(_))));
}

#[test]
fn test_decimal_and_timestamp_text_casts() {
    let model = ModelDescriptor::new("test")
        .column("price", ColumnSpec::int())
        .column("seen_at", ColumnSpec::timestamp());
    let data = DataRecord::new()
        .set("price", PostgresValue::Decimal("19.99".to_string()))
        .set("seen_at", PostgresValue::Text("yesterday".to_string()));

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO test (price, seen_at) VALUES ($1::numeric, $2::timestamptz) RETURNING id"
    );
}

#[test]
fn test_sample_model_from_json() {
    let model = ModelDescriptor::from_json(json!({
        "table_name": "sample",
        "columns": {
            "id": {"type": "int", "no_insert": true, "no_update": true},
            "name": {"type": "varchar", "not_null": true},
            "types": {"type": "int[]"},
            "location": {"type": "geo_point"},
            "created_at": {"type": "timestamp", "default": "now()", "no_update": true}
        }
    }))
    .unwrap();
    let data = DataRecord::from_json(
        &model,
        &json!({"name": "tokyo", "types": [1, 2], "location": [35.6, 139.7]}),
    )
    .unwrap();

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO sample (name, types, location, created_at) VALUES ($1, ARRAY[$2,$3]::int[], ST_SetSRID(ST_MakePoint(139.7,35.6),4326), now()) RETURNING id"
    );
    assert_eq!(stmt.values.len(), 3);
}

#[test]
fn test_text_input_is_cast_to_declared_type() {
    let model = ModelDescriptor::from_json(json!({
        "table_name": "people",
        "columns": {
            "id": {"type": "int", "no_insert": true, "no_update": true},
            "name": {"type": "string"},
            "age": {"type": "int"},
            "balance": {"type": "numeric"}
        }
    }))
    .unwrap();
    let data = DataRecord::from_json(
        &model,
        &json!({"name": "Hanako", "age": "42", "balance": "12.50"}),
    )
    .unwrap();

    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO people (name, age, balance) VALUES ($1, $2::int, $3::numeric) RETURNING id"
    );

    // Numbers are already typed and keep a bare placeholder
    let data = DataRecord::from_json(&model, &json!({"name": "Taro", "age": 42, "balance": 1.5}))
        .unwrap();
    let stmt = insert(&model, &data).unwrap();
    assert_eq!(
        stmt.text,
        "INSERT INTO people (name, age, balance) VALUES ($1, $2, $3) RETURNING id"
    );
}

#[test]
fn test_text_id_is_cast_in_where_clause() {
    let model = ModelDescriptor::new("people")
        .column("id", ColumnSpec::int().readonly())
        .column("name", ColumnSpec::string());
    let data = DataRecord::new().set("id", "7").set("name", "x");

    let stmt = update(&model, &data).unwrap();
    assert_eq!(stmt.text, "UPDATE people SET name = $1 WHERE id = $2::int");
    assert_eq!(stmt.values[1], PostgresValue::Text("7".to_string()));
}
