//! Property-based tests for the core types.

use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::attribute::{Attribute, AttributeId};
use crate::types::{DataType, Value};

/// Strategy for values that roundtrip through JSON.
/// Uses integer-representable floats to avoid JSON precision issues.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int64),
        any::<i32>().prop_map(|i| Value::Float64(f64::from(i))),
        "[a-zA-Z0-9]{0,20}".prop_map(Value::String),
        any::<i32>().prop_map(Value::Date),
        any::<i64>().prop_map(Value::Timestamp),
    ]
}

fn arb_data_type() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Null),
        Just(DataType::Bool),
        Just(DataType::Int64),
        Just(DataType::Float64),
        Just(DataType::String),
        Just(DataType::Date),
        Just(DataType::Timestamp),
    ]
}

fn hash_of<T: Hash>(v: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    v.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_value_json_roundtrip(value in arb_value()) {
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn prop_value_eq_is_reflexive_and_hash_consistent(value in arb_value()) {
        let copy = value.clone();
        prop_assert_eq!(&value, &copy);
        prop_assert_eq!(hash_of(&value), hash_of(&copy));
    }

    #[test]
    fn prop_value_data_type_matches_variant(value in arb_value()) {
        prop_assert_eq!(value.is_null(), value.data_type() == DataType::Null);
    }

    #[test]
    fn prop_sql_cmp_is_antisymmetric(a in arb_value(), b in arb_value()) {
        let forward = a.sql_cmp(&b);
        let backward = b.sql_cmp(&a);
        prop_assert_eq!(forward, backward.map(std::cmp::Ordering::reverse));
    }

    #[test]
    fn prop_supertype_is_symmetric(a in arb_data_type(), b in arb_data_type()) {
        prop_assert_eq!(a.common_supertype(&b), b.common_supertype(&a));
    }

    #[test]
    fn prop_attribute_nullability_preserves_identity(id in any::<u64>(), nullable in any::<bool>()) {
        let attr = Attribute::with_id(AttributeId(id), "c", DataType::Int64);
        let changed = attr.clone().with_nullability(nullable);
        prop_assert!(attr.same_column(&changed));
        prop_assert_eq!(changed.nullable, nullable);
    }
}
