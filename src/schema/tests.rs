//! Schema and type mapping tests

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("timestamp", PortableType::DateTime; "timestamp")]
#[test_case("timestamp(3) with time zone", PortableType::DateTime; "timestamp with zone")]
#[test_case("datetime", PortableType::DateTime; "datetime")]
#[test_case("date", PortableType::DateTime; "date")]
#[test_case("bigint", PortableType::Integer; "bigint")]
#[test_case("tinyint", PortableType::Integer; "tinyint")]
#[test_case("number", PortableType::Number; "number")]
#[test_case("decimal(10,2)", PortableType::Number; "decimal")]
#[test_case("double precision", PortableType::Number; "double precision")]
#[test_case("float4", PortableType::Number; "float")]
#[test_case("string", PortableType::String; "string")]
#[test_case("text", PortableType::String; "text")]
#[test_case("VARCHAR(255)", PortableType::String; "varchar")]
#[test_case("boolean", PortableType::Boolean; "boolean")]
#[test_case("variant", PortableType::String; "variant")]
fn test_map_native_types(native: &str, expected: PortableType) {
    let map = TypeMap::new();
    assert_eq!(map.map(native), expected);
}

#[test]
fn test_map_is_case_insensitive() {
    let map = TypeMap::new();
    assert_eq!(map.map("TIMESTAMP"), PortableType::DateTime);
    assert_eq!(map.map("BigInt"), PortableType::Integer);
}

#[test]
fn test_earliest_pattern_wins() {
    let map = TypeMap::new();

    // Contains both "timestamp" and "int": priority order, not position in
    // the string, decides.
    assert_eq!(map.map("epoch_timestamp_int"), PortableType::DateTime);
    assert_eq!(map.map("int_timestamp"), PortableType::DateTime);

    // Contains both "date" and "int".
    assert_eq!(map.map("int_date"), PortableType::DateTime);
}

#[test]
fn test_unrecognized_falls_over_to_string() {
    let map = TypeMap::new();
    assert_eq!(map.map("geometry"), PortableType::String);
    assert_eq!(map.map("array<bigquux>"), PortableType::String);
    assert_eq!(map.map(""), PortableType::String);
}

#[test]
fn test_map_class() {
    let map = TypeMap::new();
    assert_eq!(map.map_class(NativeClass::Integer), PortableType::Integer);
    assert_eq!(map.map_class(NativeClass::Float), PortableType::Number);
    assert_eq!(map.map_class(NativeClass::Text), PortableType::String);
}

#[test]
fn test_custom_patterns_extend_the_table() {
    let map = TypeMap::new().with_pattern("geography", PortableType::String);
    assert_eq!(map.map("geography"), PortableType::String);

    // Appended patterns have the lowest priority.
    let map = TypeMap::new().with_pattern("special_int", PortableType::Number);
    assert_eq!(map.map("special_int"), PortableType::Integer);

    // Inserted patterns can take precedence.
    let mut map = TypeMap::new();
    map.insert_pattern(0, "special_int", PortableType::Number);
    assert_eq!(map.map("special_int"), PortableType::Number);
}

#[test]
fn test_empty_map_is_all_string() {
    let map = TypeMap::empty();
    assert_eq!(map.map("bigint"), PortableType::String);
}

#[test]
fn test_portable_type_properties() {
    let property = PortableType::DateTime.to_property();
    assert_eq!(property.json_type.primary_type(), Some(&JsonType::String));
    assert_eq!(property.format.as_deref(), Some("date-time"));

    let property = PortableType::Integer.to_property();
    assert_eq!(property.json_type.primary_type(), Some(&JsonType::Integer));
    assert!(property.format.is_none());
}

#[test]
fn test_nullable_property_serialization() {
    let mut property = PortableType::Integer.to_property();
    property.make_nullable();
    assert!(property.is_nullable());

    let json = serde_json::to_value(&property).unwrap();
    assert_eq!(json, serde_json::json!({"type": ["integer", "null"]}));
}

#[test]
fn test_table_schema_round_trip() {
    let mut schema = TableSchema::new();
    schema.add_property("id", PortableType::Integer.to_property());
    schema.add_required("id");

    let mut note = PortableType::String.to_property();
    note.make_nullable();
    schema.add_property("note", note);

    let json = schema.to_json();
    let restored: TableSchema = serde_json::from_value(json).unwrap();
    assert_eq!(restored, schema);
    assert!(restored.is_required("id"));
    assert!(!restored.is_required("note"));
    assert_eq!(restored.column_names(), vec!["id", "note"]);
}
