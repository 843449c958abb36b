//! Property-based tests using QuickCheck

use arcadex_filter::lexer::tokenize;
use arcadex_filter::{
    criteria_from_sql, quote_literal, CriteriaRow, FilterSet, LiteralKind, Predicate, Token,
};
use arcadex_schema::builtin;
use quickcheck::{QuickCheck, TestResult};

/// Property: a quoted literal lexes back to exactly the original text
#[test]
fn prop_quoted_literal_lexes_back() {
    fn prop(s: String) -> TestResult {
        let tokens = tokenize(&quote_literal(&s)).unwrap();
        TestResult::from_bool(tokens == vec![Token::literal(LiteralKind::String, s)])
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: substring criteria survive criteria -> SQL -> criteria
#[test]
fn prop_substring_criterion_round_trip() {
    fn prop(s: String) -> TestResult {
        let text = s.trim();
        if Predicate::classify(text) != Some(Predicate::Contains(text.to_string())) {
            return TestResult::discard();
        }

        let schema = builtin::schema().unwrap();
        let row: CriteriaRow = [("name", text)].into_iter().collect();
        let set: FilterSet = [row].into_iter().collect();
        let sql = set.to_sql_where(schema.columns());
        let back = criteria_from_sql(&sql, schema.columns()).unwrap();
        TestResult::from_bool(back == set)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: integer ranges survive criteria -> SQL -> criteria
#[test]
fn prop_range_criterion_round_trip() {
    fn prop(low: i32, high: i32) -> TestResult {
        let schema = builtin::schema().unwrap();
        let criterion = format!("{}~{}", low, high);
        let row: CriteriaRow = [("year", criterion.as_str())].into_iter().collect();
        let set: FilterSet = [row].into_iter().collect();

        let sql = set.to_sql_where(schema.columns());
        let expected = format!("(Games.year BETWEEN {} AND {})", low, high);
        let back = criteria_from_sql(&sql, schema.columns()).unwrap();
        TestResult::from_bool(sql == expected && back == set)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(i32, i32) -> TestResult);
}

/// Property: comparison criteria keep their operator and value
#[test]
fn prop_comparison_criterion_round_trip() {
    fn prop(op: u8, value: i64) -> TestResult {
        let symbols = ["=", "<>", "<", "<=", ">", ">="];
        let schema = builtin::schema().unwrap();
        let criterion = format!("{}{}", symbols[op as usize % symbols.len()], value);
        let row: CriteriaRow = [("players", criterion.as_str())].into_iter().collect();
        let set: FilterSet = [row].into_iter().collect();

        let sql = set.to_sql_where(schema.columns());
        let back = criteria_from_sql(&sql, schema.columns()).unwrap();
        TestResult::from_bool(back == set)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, i64) -> TestResult);
}
