//! Property-based tests for the feature/action splitter.
//!
//! Invariants:
//! - Normalizing an already-normalized description is a no-op
//! - Hyphenated line wraps rejoin without losing characters
//! - Lower-case continuation lines never start a new entry

use proptest::collection::vec;
use proptest::prelude::*;

use crate::actor::wtc::WtcParser;
use crate::actor::ActorFieldParser;

/// Lower-case prose that can never be mistaken for an entry title.
fn arb_description() -> impl Strategy<Value = String> {
    vec("[a-z]{2,8}", 5..15).prop_map(|words| words.join(" ") + ".")
}

fn parse_single(body: &str) -> String {
    let text = format!("Challenge 1 (200 XP)\nKeen Smell. {body}");
    let lines: Vec<&str> = text.lines().collect();
    let items = WtcParser.parse_items(&lines).expect("splitter is total");
    assert_eq!(items.len(), 1, "unexpected extra entries in {body:?}");
    items[0].description.clone()
}

proptest! {
    #[test]
    fn renormalizing_a_description_is_a_noop(body in arb_description()) {
        let once = parse_single(&body);
        let twice = parse_single(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn wrapped_lines_collapse_to_single_spaces(
        first in vec("[a-z]{2,8}", 2..6),
        second in vec("[a-z]{2,8}", 2..6),
    ) {
        let body = format!("{}\n{}.", first.join(" "), second.join(" "));
        let description = parse_single(&body);
        prop_assert_eq!(
            description,
            format!("{} {}.", first.join(" "), second.join(" "))
        );
    }

    #[test]
    fn hyphenated_wrap_rejoins_losslessly(word in "[a-z]{6,12}", cut in 1..5usize) {
        let cut = cut.min(word.len() - 1);
        let (head, tail) = word.split_at(cut);
        let body = format!("resists {head}-\n{tail} damage.");
        let description = parse_single(&body);
        prop_assert_eq!(description, format!("resists {word} damage."));
    }
}
