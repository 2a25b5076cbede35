// tests/parser_tests.rs

use tql_lang::ast::{ComparisonOperator, Expr, Literal};
use tql_lang::parser::{self, ParseError};

// ============================================================================
// Atoms
// ============================================================================

#[test]
fn test_comparison() {
    let expr = parser::parse("age > 30").unwrap();
    assert_eq!(
        expr,
        Expr::Comparison {
            field: "age".to_string(),
            op: ComparisonOperator::Gt,
            value: Literal::Int(30),
        }
    );
}

#[test]
fn test_comparison_operators() {
    for (text, op) in [
        ("=", ComparisonOperator::Eq),
        ("!=", ComparisonOperator::Neq),
        ("<", ComparisonOperator::Lt),
        (">", ComparisonOperator::Gt),
        ("<=", ComparisonOperator::Lte),
        (">=", ComparisonOperator::Gte),
    ] {
        let expr = parser::parse(&format!("age {} 30", text)).unwrap();
        assert!(matches!(expr, Expr::Comparison { op: found, .. } if found == op));
    }
}

#[test]
fn test_dotted_field_path() {
    let expr = parser::parse("owner.address.city = 'Paris'").unwrap();
    assert!(matches!(
        expr,
        Expr::Comparison { ref field, .. } if field == "owner.address.city"
    ));
}

#[test]
fn test_literal_kinds() {
    assert!(matches!(
        parser::parse("f = 'v'").unwrap(),
        Expr::Comparison { value: Literal::Quoted(ref s), .. } if s == "v"
    ));
    assert!(matches!(
        parser::parse("f = 11").unwrap(),
        Expr::Comparison {
            value: Literal::Int(11),
            ..
        }
    ));
    assert!(matches!(
        parser::parse("f = 11.25").unwrap(),
        Expr::Comparison {
            value: Literal::Decimal(_),
            ..
        }
    ));
    assert!(matches!(
        parser::parse("f = true").unwrap(),
        Expr::Comparison {
            value: Literal::Boolean(true),
            ..
        }
    ));
}

#[test]
fn test_in() {
    let expr = parser::parse("status in ['active', 'pending']").unwrap();
    assert_eq!(
        expr,
        Expr::In {
            field: "status".to_string(),
            values: vec![
                Literal::Quoted("active".to_string()),
                Literal::Quoted("pending".to_string()),
            ],
        }
    );
}

#[test]
fn test_in_numbers() {
    let expr = parser::parse("f in [11, 22, 33]").unwrap();
    assert_eq!(
        expr,
        Expr::In {
            field: "f".to_string(),
            values: vec![Literal::Int(11), Literal::Int(22), Literal::Int(33)],
        }
    );
}

#[test]
fn test_is_null() {
    assert_eq!(
        parser::parse("status is null").unwrap(),
        Expr::IsNull {
            field: "status".to_string()
        }
    );
}

#[test]
fn test_is_empty() {
    assert_eq!(
        parser::parse("status is empty").unwrap(),
        Expr::IsEmpty {
            field: "status".to_string()
        }
    );
}

#[test]
fn test_between_closed() {
    let expr = parser::parse("age between [18, 65]").unwrap();
    assert!(matches!(
        expr,
        Expr::Between {
            lower_open: false,
            upper_open: false,
            ..
        }
    ));
}

#[test]
fn test_between_open_bounds() {
    assert!(matches!(
        parser::parse("age between ]18, 65]").unwrap(),
        Expr::Between {
            lower_open: true,
            upper_open: false,
            ..
        }
    ));
    assert!(matches!(
        parser::parse("age between [18, 65[").unwrap(),
        Expr::Between {
            lower_open: false,
            upper_open: true,
            ..
        }
    ));
    assert!(matches!(
        parser::parse("age between ]18, 65[").unwrap(),
        Expr::Between {
            lower_open: true,
            upper_open: true,
            ..
        }
    ));
}

#[test]
fn test_contains() {
    assert_eq!(
        parser::parse("name contains 'son'").unwrap(),
        Expr::Contains {
            field: "name".to_string(),
            value: "son".to_string(),
            case_sensitive: true,
        }
    );
    assert_eq!(
        parser::parse("name containsIgnoreCase 'SON'").unwrap(),
        Expr::Contains {
            field: "name".to_string(),
            value: "SON".to_string(),
            case_sensitive: false,
        }
    );
}

#[test]
fn test_matches() {
    assert_eq!(
        parser::parse(r"name ~ '^[A-Z][a-z]*$'").unwrap(),
        Expr::Matches {
            field: "name".to_string(),
            regex: "^[A-Z][a-z]*$".to_string(),
        }
    );
}

#[test]
fn test_complies() {
    assert_eq!(
        parser::parse("name complies 'Aaaa'").unwrap(),
        Expr::Complies {
            field: "name".to_string(),
            pattern: "Aaaa".to_string(),
        }
    );
}

#[test]
fn test_word_complies() {
    assert_eq!(
        parser::parse("name wordComplies '[Word] [word]'").unwrap(),
        Expr::WordComplies {
            field: "name".to_string(),
            pattern: "[Word] [word]".to_string(),
        }
    );
}

// ============================================================================
// Combinators and grouping
// ============================================================================

#[test]
fn test_and_or_precedence() {
    // and binds tighter than or
    let expr = parser::parse("a = 1 and b = 2 or c = 3").unwrap();
    match expr {
        Expr::Or(children) => {
            assert_eq!(children.len(), 2);
            assert!(matches!(children[0], Expr::And(ref inner) if inner.len() == 2));
            assert!(matches!(children[1], Expr::Comparison { .. }));
        }
        other => panic!("Expected or at the top, got {:?}", other),
    }
}

#[test]
fn test_parentheses_regroup() {
    let expr = parser::parse("a = 1 and (b = 2 or c = 3)").unwrap();
    match expr {
        Expr::And(children) => {
            assert_eq!(children.len(), 2);
            assert!(matches!(children[1], Expr::Or(ref inner) if inner.len() == 2));
        }
        other => panic!("Expected and at the top, got {:?}", other),
    }
}

#[test]
fn test_chained_and_is_flat() {
    let expr = parser::parse("a = 1 and b = 2 and c = 3").unwrap();
    assert!(matches!(expr, Expr::And(ref children) if children.len() == 3));
}

#[test]
fn test_not() {
    let expr = parser::parse("not(age > 30)").unwrap();
    match expr {
        Expr::Not(child) => assert!(matches!(*child, Expr::Comparison { .. })),
        other => panic!("Expected not, got {:?}", other),
    }
}

#[test]
fn test_nested_not() {
    let expr = parser::parse("not (not (age > 30))").unwrap();
    assert!(matches!(expr, Expr::Not(ref child) if matches!(**child, Expr::Not(_))));
}

#[test]
fn test_single_atom_stays_bare() {
    // No one-child composite wrappers.
    let expr = parser::parse("(age > 30)").unwrap();
    assert!(matches!(expr, Expr::Comparison { .. }));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_operand() {
    assert!(matches!(
        parser::parse("age >"),
        Err(ParseError::Unexpected { .. })
    ));
}

#[test]
fn test_missing_bracket() {
    assert!(matches!(
        parser::parse("status in ['active'"),
        Err(ParseError::Unexpected { .. })
    ));
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        parser::parse("age > 30 age"),
        Err(ParseError::Unexpected { .. })
    ));
}

#[test]
fn test_is_requires_null_or_empty() {
    assert!(matches!(
        parser::parse("status is active"),
        Err(ParseError::Unexpected { .. })
    ));
}

#[test]
fn test_lex_error_propagates() {
    assert!(matches!(parser::parse("age > #"), Err(ParseError::Lex(_))));
}

// ============================================================================
// Round-trip rendering
// ============================================================================

// Every node kind renders to a form that parses back structurally equal.
#[test]
fn test_round_trip_every_node_kind() {
    let queries = [
        "age > 30",
        "age >= 30",
        "age < 30",
        "age <= 30",
        "status = 'active'",
        "status != 'active'",
        "price = 11.25",
        "flag = true",
        "status in ['active', 'pending']",
        "f in [11, 22]",
        "status is null",
        "status is empty",
        "age between [18, 65]",
        "age between ]18, 65]",
        "age between [18, 65[",
        "age between ]18, 65[",
        "name contains 'son'",
        "name containsIgnoreCase 'SON'",
        "name ~ '^[A-Z]$'",
        "name complies 'Aaa9'",
        "name wordComplies '[Word] [digit]'",
        "owner.address.city = 'Paris'",
        "_class in ['Order', 'Invoice']",
        "a = 1 and b = 2",
        "a = 1 or b = 2",
        "not (a = 1)",
        "a = 1 and (b = 2 or c = 3)",
        "not (a = 1 and b = 2) or c = 3",
    ];

    for query in queries {
        let parsed = parser::parse(query).unwrap();
        let rendered = parsed.to_query_string();
        let reparsed = parser::parse(&rendered)
            .unwrap_or_else(|e| panic!("rendering of '{}' does not reparse: {}", query, e));
        assert_eq!(parsed, reparsed, "round trip changed '{}'", query);
    }
}

#[test]
fn test_round_trip_escaped_quote() {
    let expr = parser::parse(r"name = 'it\'s'").unwrap();
    let reparsed = parser::parse(&expr.to_query_string()).unwrap();
    assert_eq!(expr, reparsed);
}

#[test]
fn test_rendering_is_canonical() {
    let expr = parser::parse("age>30 and  name = 'x'").unwrap();
    assert_eq!(expr.to_query_string(), "age > 30 and name = 'x'");
}
