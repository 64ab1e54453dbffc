//! Property-based tests for ability score parsing.
//!
//! Invariants:
//! - The modifier is always `floor((value - 10) / 2)`, whatever the source
//!   text claims
//! - The saving throw defaults to the modifier
//! - All three plain-text layouts reconstruct the same scores

use proptest::array::uniform6;
use proptest::prelude::*;

use crate::actor::wtc::WtcParser;
use crate::actor::{Abilities, Ability, ActorFieldParser};
use crate::classify::ABILITY_NAMES;

fn arb_score() -> impl Strategy<Value = i32> {
    1..=30i32
}

fn render_inline(scores: &[i32; 6]) -> String {
    let values: Vec<String> = scores.iter().map(|v| format!("{v} (+0)")).collect();
    format!("{}\n{}", ABILITY_NAMES.join(" "), values.join(" "))
}

fn render_interleaved(scores: &[i32; 6]) -> String {
    ABILITY_NAMES
        .iter()
        .zip(scores)
        .map(|(name, v)| format!("{name}\n{v} (+0)"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_vertical(scores: &[i32; 6]) -> String {
    let values: Vec<String> = scores.iter().map(|v| format!("{v} (+0)")).collect();
    format!("{}\n{}", ABILITY_NAMES.join("\n"), values.join("\n"))
}

fn parse(text: &str) -> Abilities {
    let lines: Vec<&str> = text.lines().collect();
    WtcParser.parse_abilities(&lines).expect("layout should parse")
}

proptest! {
    #[test]
    fn modifier_follows_floor_law(value in -5..=40i32) {
        let ability = Ability::from_score(value);
        prop_assert_eq!(ability.modifier, (value - 10).div_euclid(2));
        prop_assert_eq!(ability.saving_throw, ability.modifier);
    }

    #[test]
    fn all_layouts_reconstruct_the_same_scores(scores in uniform6(arb_score())) {
        let expected = Abilities::from_scores(scores);
        prop_assert_eq!(parse(&render_inline(&scores)), expected);
        prop_assert_eq!(parse(&render_interleaved(&scores)), expected);
        prop_assert_eq!(parse(&render_vertical(&scores)), expected);
    }

    #[test]
    fn embedded_modifier_text_is_ignored(scores in uniform6(arb_score()), fake in -9..=9i32) {
        // the printed modifier is often garbled; only the score matters
        let values: Vec<String> = scores.iter().map(|v| format!("{v} ({fake:+})")).collect();
        let text = format!("{}\n{}", ABILITY_NAMES.join(" "), values.join(" "));
        prop_assert_eq!(parse(&text), Abilities::from_scores(scores));
    }
}
