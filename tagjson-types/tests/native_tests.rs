use chrono::NaiveDate;
use tagjson_types::{NativeValue, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
struct Celsius(f64);

#[derive(Debug, Clone, PartialEq)]
struct Fahrenheit(f64);

// ── Type identity ────────────────────────────────────────────────

#[test]
fn type_id_is_the_concrete_type() {
    let v = NativeValue::new(Celsius(21.5));
    assert_eq!(v.type_id(), std::any::TypeId::of::<Celsius>());
    assert!(v.is::<Celsius>());
    assert!(!v.is::<Fahrenheit>());
}

#[test]
fn type_name_mentions_the_concrete_type() {
    let v = NativeValue::new(Celsius(0.0));
    assert!(v.type_name().ends_with("Celsius"));
}

#[test]
fn downcast_ref_only_matches_exact_type() {
    let v = NativeValue::new(Celsius(3.0));
    assert_eq!(v.downcast_ref::<Celsius>(), Some(&Celsius(3.0)));
    assert!(v.downcast_ref::<Fahrenheit>().is_none());
    assert!(v.downcast_ref::<f64>().is_none());
}

#[test]
fn wrapping_twice_does_not_nest() {
    let inner = NativeValue::new(Celsius(1.0));
    let outer = NativeValue::new(inner.clone());
    assert!(outer.is::<Celsius>());
    assert_eq!(outer, inner);
}

// ── Equality / cloning ───────────────────────────────────────────

#[test]
fn equal_values_of_same_type_compare_equal() {
    let id = Uuid::new_v4();
    assert_eq!(NativeValue::new(id), NativeValue::new(id));
}

#[test]
fn different_types_never_compare_equal() {
    // Same payload, different concrete types.
    assert_ne!(NativeValue::new(Celsius(1.0)), NativeValue::new(Fahrenheit(1.0)));
}

#[test]
fn clone_preserves_value_and_type() {
    let date = NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();
    let v = NativeValue::new(date);
    let cloned = v.clone();
    assert_eq!(cloned.downcast_ref::<NaiveDate>(), Some(&date));
    assert_eq!(v, cloned);
}

#[test]
fn debug_delegates_to_inner_value() {
    let v = NativeValue::new(Celsius(2.0));
    assert_eq!(format!("{v:?}"), "Celsius(2.0)");
}

#[test]
fn value_native_helper_wraps() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let node = Value::native(date);
    assert_eq!(node.downcast_ref::<NaiveDate>(), Some(&date));
}
