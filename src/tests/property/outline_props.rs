//! Property-based tests for the journal outliner.
//!
//! Invariants:
//! - Guessed depth never exceeds the cap
//! - Outline children get consecutive sort values starting at 1
//! - Every input line ends up somewhere: a title, a note, or the root name

use proptest::collection::vec;
use proptest::prelude::*;

use crate::journal::outline::{guess_depth, parse_outline};

const PROSE: &str = "this line has comfortably more than seven words so it reads as content";

proptest! {
    #[test]
    fn guessed_depth_is_capped(lines in vec("[ -~]{0,30}", 0..20)) {
        prop_assert!(guess_depth(&lines.join("\n")) <= 3);
    }

    #[test]
    fn children_get_consecutive_sort_values(
        titles in vec("[A-Z][a-z]{2,6} [A-Z][a-z]{2,6}", 1..6),
    ) {
        let mut text = String::from("Root");
        for title in &titles {
            text.push_str(&format!("\n\n{title}\n{PROSE}"));
        }
        let root = parse_outline(&text);
        prop_assert_eq!(root.children.len(), titles.len());
        for (index, child) in root.children.iter().enumerate() {
            prop_assert_eq!(child.sort_value, Some(index as i64 + 1));
            prop_assert_eq!(&child.value, &titles[index]);
            prop_assert_eq!(child.notes.len(), 1);
        }
        prop_assert!(root.notes.is_empty());
    }
}
