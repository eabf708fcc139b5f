//! Property-based tests for range-indexed arrays and integer arithmetic

mod common;

use common::*;
use common::assert_eq;
use guarded_runtime::ErrorKind;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// An inclusive range `lower..=upper` of at most 12 elements
fn arb_range() -> impl Strategy<Value = (i64, i64)> {
    (-20i64..20, 1i64..=12).prop_map(|(lower, len)| (lower, lower + len - 1))
}

/// A range together with one value per element
fn arb_array() -> impl Strategy<Value = (i64, i64, Vec<i64>)> {
    arb_range().prop_flat_map(|(lower, upper)| {
        let len = (upper - lower + 1) as usize;
        prop::collection::vec(-500i64..500, len).prop_map(move |values| (lower, upper, values))
    })
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display(lower: i64, values: &[i64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}:{}", lower + i as i64, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn declare(lower: i64, upper: i64, values: &[i64]) -> String {
    format!(
        "declare a, b : array[{}..{}] |[ a := {};",
        lower,
        upper,
        join(values)
    )
}

fn run_ok(source: &str) -> String {
    let (result, output) = run_with_input(source, "");
    if let Err(diags) = result {
        panic!("{} failed: {:?}", source, diags);
    }
    output
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn size_min_max_follow_declared_range((lower, upper, values) in arb_array()) {
        let source = format!(
            "{} println size(a); println min(a); println max(a) ]|",
            declare(lower, upper, &values)
        );
        let expected = format!("{}\n{}\n{}\n", values.len(), lower, upper);
        prop_assert_eq!(run_ok(&source), expected);
    }

    #[test]
    fn both_bounds_are_valid_indices((lower, upper, values) in arb_array()) {
        let source = format!(
            "{} println a[{}]; println a[{}] ]|",
            declare(lower, upper, &values),
            lower,
            upper
        );
        let expected = format!("{}\n{}\n", values[0], values[values.len() - 1]);
        prop_assert_eq!(run_ok(&source), expected);
    }

    #[test]
    fn indices_outside_range_fail(
        (lower, upper, values) in arb_array(),
        below in any::<bool>(),
        distance in 1i64..5,
    ) {
        let index = if below { lower - distance } else { upper + distance };
        let source = format!("{} println a[{}] ]|", declare(lower, upper, &values), index);
        let diag = run_error(&source);
        prop_assert_eq!(diag.kind, ErrorKind::IndexOutOfBounds);
        prop_assert_eq!(diag.message, format!("index `{}` out of bounds", index));
    }

    #[test]
    fn modif_leaves_source_array_unchanged(
        (lower, upper, values) in arb_array(),
        offset in 0usize..12,
        replacement in -500i64..500,
    ) {
        let slot = offset % values.len();
        let index = lower + slot as i64;
        let source = format!(
            "{} b := a({}:{}); println a; println b ]|",
            declare(lower, upper, &values),
            index,
            replacement
        );
        let mut updated = values.clone();
        updated[slot] = replacement;
        let expected = format!("{}\n{}\n", display(lower, &values), display(lower, &updated));
        prop_assert_eq!(run_ok(&source), expected);
    }

    #[test]
    fn division_is_floored(a in -1000i64..1000, b in -50i64..50) {
        prop_assume!(b != 0);
        let quotient = (a as f64 / b as f64).floor() as i64;
        let remainder = a - b * quotient;
        let source = format!("|[ println {} / {}; println {} % {} ]|", a, b, a, b);
        prop_assert_eq!(run_ok(&source), format!("{}\n{}\n", quotient, remainder));
    }
}

#[test]
fn test_single_element_range() {
    assert_output(
        "declare a : array[7..7] |[ a := 3; println a; println size(a) ]|",
        "7:3\n1\n",
    );
}
