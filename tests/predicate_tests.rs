// tests/predicate_tests.rs

use std::collections::BTreeMap;

use tql_lang::accessor::EvalError;
use tql_lang::parser;
use tql_lang::predicate::PredicateCompiler;
use tql_lang::shape::{self, AccessorDef, Record, Shape, ShapeKind, downcast};
use tql_lang::value::Value;

// ============================================================================
// Fixture
// ============================================================================

#[derive(Clone)]
struct Bean {
    value: String,
    int: i64,
    my_value: String,
}

#[derive(Clone)]
struct NestedBean;

static BEAN: Shape = Shape {
    name: "Bean",
    kind: ShapeKind::Record {
        accessors: &[
            AccessorDef {
                name: "get_value",
                tag: None,
                result: &shape::STRING,
                get: bean_value,
            },
            AccessorDef {
                name: "get_int",
                tag: None,
                result: &shape::INTEGER,
                get: bean_int,
            },
            AccessorDef {
                name: "get_empty_value",
                tag: None,
                result: &shape::STRING,
                get: bean_empty_value,
            },
            AccessorDef {
                name: "get_nested",
                tag: None,
                result: &NESTED,
                get: bean_nested,
            },
            AccessorDef {
                name: "get_nested_beans",
                tag: None,
                result: &NESTED_LIST,
                get: bean_nested_beans,
            },
            AccessorDef {
                name: "get_scores",
                tag: None,
                result: &SCORES,
                get: bean_scores,
            },
            AccessorDef {
                name: "get_my_value",
                tag: Some("aDifferentName"),
                result: &shape::STRING,
                get: bean_my_value,
            },
            AccessorDef {
                name: "get_attributes",
                tag: None,
                result: &ATTRIBUTES,
                get: bean_attributes,
            },
            AccessorDef {
                name: "null_value",
                tag: None,
                result: &shape::UNKNOWN,
                get: bean_null_value,
            },
        ],
    },
};

static NESTED: Shape = Shape {
    name: "NestedBean",
    kind: ShapeKind::Record {
        accessors: &[
            AccessorDef {
                name: "get_nested_int",
                tag: None,
                result: &shape::INTEGER,
                get: nested_int,
            },
            AccessorDef {
                name: "get_nested_double",
                tag: None,
                result: &shape::FLOAT,
                get: nested_double,
            },
            AccessorDef {
                name: "get_nested_value",
                tag: None,
                result: &shape::STRING,
                get: nested_value,
            },
            AccessorDef {
                name: "get_nested_null_value",
                tag: None,
                result: &shape::UNKNOWN,
                get: nested_null_value,
            },
        ],
    },
};

static NESTED_LIST: Shape = Shape {
    name: "List<NestedBean>",
    kind: ShapeKind::List { element: &NESTED },
};

static SCORES: Shape = Shape {
    name: "List<Integer>",
    kind: ShapeKind::List {
        element: &shape::INTEGER,
    },
};

static ATTRIBUTES: Shape = Shape {
    name: "Map<String, Object>",
    kind: ShapeKind::Map {
        value: &shape::UNKNOWN,
    },
};

fn bean_value(r: &dyn Record) -> Result<Value, String> {
    Ok(Value::from(downcast::<Bean>(r)?.value.clone()))
}

fn bean_int(r: &dyn Record) -> Result<Value, String> {
    Ok(Value::Integer(downcast::<Bean>(r)?.int))
}

fn bean_empty_value(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    Ok(Value::from(""))
}

fn bean_nested(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    Ok(Value::record(NestedBean))
}

fn bean_nested_beans(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    Ok(Value::List(vec![
        Value::record(NestedBean),
        Value::record(NestedBean),
    ]))
}

fn bean_scores(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    Ok(Value::List(vec![
        Value::Integer(1),
        Value::Integer(2),
        Value::Integer(3),
    ]))
}

fn bean_my_value(r: &dyn Record) -> Result<Value, String> {
    Ok(Value::from(downcast::<Bean>(r)?.my_value.clone()))
}

fn bean_attributes(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    let mut entries = BTreeMap::new();
    entries.insert("version".to_string(), Value::from("1.0"));
    entries.insert(
        "tags".to_string(),
        Value::List(vec![Value::from("Complete"), Value::from("Released")]),
    );
    Ok(Value::Map(entries))
}

fn bean_null_value(r: &dyn Record) -> Result<Value, String> {
    downcast::<Bean>(r)?;
    Ok(Value::Null)
}

fn nested_int(r: &dyn Record) -> Result<Value, String> {
    downcast::<NestedBean>(r)?;
    Ok(Value::Integer(10))
}

fn nested_double(r: &dyn Record) -> Result<Value, String> {
    downcast::<NestedBean>(r)?;
    Ok(Value::Float(10.1))
}

fn nested_value(r: &dyn Record) -> Result<Value, String> {
    downcast::<NestedBean>(r)?;
    Ok(Value::from("nested"))
}

fn nested_null_value(r: &dyn Record) -> Result<Value, String> {
    downcast::<NestedBean>(r)?;
    Ok(Value::Null)
}

impl Record for Bean {
    fn shape(&self) -> &'static Shape {
        &BEAN
    }
}

impl Record for NestedBean {
    fn shape(&self) -> &'static Shape {
        &NESTED
    }
}

fn bean() -> Bean {
    Bean {
        value: "value".to_string(),
        int: 10,
        my_value: "myValue".to_string(),
    }
}

fn matches(query: &str) -> bool {
    let expr = parser::parse(query).expect("parse failure");
    let predicate = PredicateCompiler::new()
        .compile(&expr, &BEAN)
        .expect("compile failure");
    predicate.matches(&bean()).expect("match failure")
}

fn compile_error(query: &str) -> EvalError {
    let expr = parser::parse(query).expect("parse failure");
    PredicateCompiler::new()
        .compile(&expr, &BEAN)
        .err()
        .expect("compilation should fail")
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn equals_should_match_bean() {
    assert!(matches("value = 'value'"));
}

#[test]
fn equals_should_not_match_bean_on_value() {
    assert!(!matches("value = 'non match'"));
}

#[test]
fn equals_is_case_insensitive() {
    assert!(matches("value = 'VALUE'"));
}

#[test]
fn equals_should_match_bean_on_nested() {
    assert!(matches("nested.nested_value = 'nested'"));
}

#[test]
fn equals_should_match_bean_on_list() {
    assert!(matches("nested_beans.nested_value = 'nested'"));
}

#[test]
fn not_equals_should_match_bean() {
    assert!(matches("value != 'not a value'"));
}

#[test]
fn not_equals_should_not_match_on_equal_value() {
    assert!(!matches("value != 'value'"));
}

// ============================================================================
// Numeric comparison
// ============================================================================

#[test]
fn test_int_comparison() {
    assert!(matches("int = 10"));
}

#[test]
fn test_double_int_comparison() {
    assert!(matches("int = 10.0"));
}

#[test]
fn test_nested_double_comparison() {
    assert!(matches("nested.nested_double = 10.1"));
}

#[test]
fn gt_should_match_bean() {
    assert!(matches("int > 0"));
}

#[test]
fn gt_should_not_match_bean() {
    assert!(!matches("int > 20"));
}

#[test]
fn gte_should_match_bean() {
    assert!(matches("int >= 10"));
}

#[test]
fn gte_should_not_match_bean() {
    assert!(!matches("int >= 11"));
}

#[test]
fn lt_should_match_bean() {
    assert!(matches("int < 20"));
}

#[test]
fn lt_should_not_match_bean() {
    assert!(!matches("int < 5"));
}

#[test]
fn lte_should_match_bean() {
    assert!(matches("int <= 10"));
}

#[test]
fn lte_should_not_match_bean() {
    assert!(!matches("int <= 9"));
}

#[test]
fn comparison_with_invalid_number_does_not_match() {
    // A bad operand is a non-match, not an error.
    assert!(!matches("int > 'obviously not an integer'"));
}

// ============================================================================
// Between
// ============================================================================

#[test]
fn between_should_match_bean() {
    assert!(matches("int between [0, 10]"));
}

#[test]
fn between_should_match_bean_lower_open() {
    assert!(matches("int between ]0, 10]"));
}

#[test]
fn between_should_not_match_bean_upper_open() {
    assert!(!matches("int between [0, 10["));
}

#[test]
fn between_should_not_match_bean_both_open() {
    assert!(!matches("int between ]0, 10["));
}

#[test]
fn between_quoted_bounds_do_not_match() {
    assert!(!matches("value between ['value1', 'value2']"));
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn in_should_match_bean() {
    assert!(matches("int in [10, 20]"));
}

#[test]
fn in_should_not_match_bean() {
    assert!(!matches("int in [11, 20]"));
}

// ============================================================================
// Null and empty
// ============================================================================

#[test]
fn test_null_comparison() {
    assert!(matches("null_value is null"));
}

#[test]
fn test_nested_null_comparison() {
    assert!(matches("nested.nested_null_value is null"));
}

#[test]
fn is_null_should_not_match_present_value() {
    assert!(!matches("value is null"));
}

#[test]
fn null_field_fails_every_comparison() {
    assert!(!matches("null_value = 'null'"));
    assert!(!matches("null_value != 'x'"));
    assert!(!matches("null_value > 0"));
    assert!(!matches("null_value in ['null']"));
}

#[test]
fn empty_should_not_match_bean() {
    assert!(!matches("value is empty"));
}

#[test]
fn empty_should_match_empty_value() {
    assert!(matches("empty_value is empty"));
}

// ============================================================================
// Text predicates
// ============================================================================

#[test]
fn contains_should_match_bean() {
    assert!(matches("value contains 'alu'"));
}

#[test]
fn contains_should_not_match_bean() {
    assert!(!matches("value contains 'ALU'"));
}

#[test]
fn contains_ignore_case_should_match_bean() {
    assert!(matches("value containsIgnoreCase 'ALu'"));
}

#[test]
fn matches_should_match_bean() {
    assert!(matches(r"value ~ '\w*'"));
}

#[test]
fn matches_is_a_full_match() {
    assert!(!matches("value ~ 'alu'"));
}

#[test]
fn complies_should_match_bean() {
    assert!(matches("value complies 'aaaaa'"));
}

#[test]
fn complies_should_not_match_bean() {
    assert!(!matches("value complies '99999'"));
}

#[test]
fn word_complies_should_match_bean() {
    assert!(matches("value wordComplies '[word]'"));
}

#[test]
fn word_complies_should_not_match_capitalized() {
    assert!(!matches("value wordComplies '[Word]'"));
}

#[test]
fn invalid_regex_fails_compilation() {
    assert!(matches!(
        compile_error("value ~ '('"),
        EvalError::Pattern { .. }
    ));
}

// ============================================================================
// Map paths
// ============================================================================

#[test]
fn test_map_with_a_valid_unary_key() {
    assert!(matches("attributes.version = '1.0'"));
}

#[test]
fn test_map_with_a_valid_unary_key_that_does_not_match() {
    assert!(!matches("attributes.version = '2.0'"));
}

#[test]
fn test_map_with_an_iterable_key() {
    assert!(matches("attributes.tags = 'Released'"));
}

#[test]
fn test_map_with_a_missing_key() {
    assert!(!matches("attributes.invalid = 'error'"));
}

// ============================================================================
// Runtime type
// ============================================================================

#[test]
fn class_should_match_bean() {
    assert!(matches("value._class = 'String'"));
}

#[test]
fn class_of_root_in_set() {
    assert!(matches("_class in ['Bean', 'Invoice']"));
    assert!(!matches("_class in ['Order', 'Invoice']"));
}

// ============================================================================
// Fan-out through a multi-valued field
// ============================================================================

#[test]
fn fan_out_in_matches_any_element() {
    assert!(matches("scores in [2]"));
}

#[test]
fn fan_out_comparison_needs_one_satisfying_element() {
    assert!(matches("scores > 2"));
    assert!(!matches("scores > 5"));
}

#[test]
fn fan_out_is_null_needs_an_empty_set() {
    assert!(!matches("scores is null"));
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn and_should_match_bean() {
    assert!(matches("int > 0 and int < 11"));
}

#[test]
fn and_should_not_match_when_one_child_fails() {
    assert!(!matches("int > 0 and int > 11"));
}

#[test]
fn or_should_match_bean() {
    assert!(matches("int > 0 or int > 1"));
}

#[test]
fn or_needs_one_matching_child() {
    assert!(!matches("int > 20 or int < 5"));
}

#[test]
fn not_should_not_match_bean() {
    assert!(!matches("not(int > 0)"));
}

// ============================================================================
// External-name tags
// ============================================================================

#[test]
fn should_match_on_tagged_name() {
    assert!(matches("aDifferentName = 'myValue'"));
}

// ============================================================================
// Fatal paths
// ============================================================================

#[test]
fn should_fail_compilation_on_missing_field() {
    assert_eq!(
        compile_error("wrong_field = 'value'"),
        EvalError::UnresolvableField {
            path: "wrong_field".to_string(),
            shape: "Bean",
        }
    );
}

#[test]
fn unresolvable_is_an_error_not_a_non_match() {
    // Distinct from a legitimately absent value, which is data.
    assert!(matches("null_value is null"));
    assert!(matches!(
        compile_error("nonexistent.field = 'v'"),
        EvalError::UnresolvableField { .. }
    ));
}
