//! Property-based tests for dice formula extraction.
//!
//! Invariants:
//! - `min = count + konst` and `max = count * size + konst`, so `min <= max`
//! - The stated value is taken verbatim, never recomputed from the formula
//! - A line without a formula collapses to a degenerate range

use proptest::prelude::*;
use regex::Regex;

use crate::formula::parse_rolled_value;

fn pattern() -> Regex {
    Regex::new(r"Hit Points\*{0,2} (.*)").unwrap()
}

fn arb_die() -> impl Strategy<Value = i32> {
    prop_oneof![Just(4), Just(6), Just(8), Just(10), Just(12), Just(20)]
}

proptest! {
    #[test]
    fn formula_range_brackets(
        value in 1..500i32,
        count in 1..=20i32,
        size in arb_die(),
        konst in -10..=50i32,
    ) {
        let line = if konst >= 0 {
            format!("Hit Points {value} ({count}d{size} + {konst})")
        } else {
            format!("Hit Points {value} ({count}d{size} - {})", -konst)
        };
        let rolled = parse_rolled_value(&line, &pattern()).unwrap();
        prop_assert_eq!(rolled.value, value);
        prop_assert_eq!(rolled.min, count + konst);
        prop_assert_eq!(rolled.max, count * size + konst);
        prop_assert!(rolled.min <= rolled.max);
    }

    #[test]
    fn plain_value_collapses_to_degenerate_range(value in 0..10000i32) {
        let line = format!("Hit Points {value}");
        let rolled = parse_rolled_value(&line, &pattern()).unwrap();
        prop_assert_eq!(rolled.value, value);
        prop_assert_eq!(rolled.min, value);
        prop_assert_eq!(rolled.max, value);
        prop_assert!(rolled.formula.is_empty());
    }
}
