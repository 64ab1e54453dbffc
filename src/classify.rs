//! Line classification heuristics.
//!
//! Pure predicates over single lines or line windows, used to locate section
//! boundaries in whitespace-noisy text: ability table headers, "Actions"
//! headings, and outline folder titles. These are signals, not guarantees —
//! callers always combine them with positional context.
//!
//! The thresholds here (7 words, the bullet glyph) are load-bearing: test
//! fixtures downstream depend on the exact cutoffs.

/// Word-count cutoff below which a line reads as a title rather than prose.
pub const HEADING_MAX_WORDS: usize = 7;

/// Bullet glyph that disqualifies a line from being a heading.
pub const BULLET: char = '\u{2022}';

/// The six ability column headers, in canonical order.
pub const ABILITY_NAMES: [&str; 6] = ["STR", "DEX", "CON", "INT", "WIS", "CHA"];

/// True if the line looks like a short title rather than body text.
///
/// A heading-like line has fewer than [`HEADING_MAX_WORDS`] whitespace-split
/// tokens and no bullet glyph. Intentionally permissive: very short prose
/// sentences will pass, and callers must tolerate that.
pub fn is_heading_like(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    line.split_whitespace().count() < HEADING_MAX_WORDS && !line.contains(BULLET)
}

/// Locate the vertical key-block ability layout: all six headers on
/// consecutive lines, followed by all six value cells on consecutive lines.
///
/// Returns `(first, last)` where `first` indexes the "STR" line and `last`
/// is one past the final value line. `None` when the input does not contain
/// this layout (the other ability sub-layouts, or no abilities at all).
pub fn find_stat_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    let first = lines.iter().position(|line| line.trim() == "STR")?;

    // Six header lines, in order, then six value cells leading with a digit.
    let mut cursor = first;
    for name in ABILITY_NAMES {
        if lines.get(cursor)?.trim() != name {
            return None;
        }
        cursor += 1;
    }
    for _ in 0..ABILITY_NAMES.len() {
        let cell = lines.get(cursor)?.trim();
        if !cell.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        cursor += 1;
    }
    Some((first, cursor))
}

/// Index of the first line that is exactly `heading` once trimmed,
/// compared ASCII case-insensitively.
///
/// Used to find "Actions" / "Reactions" section headings.
pub fn find_section_heading(lines: &[&str], heading: &str) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case(heading))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_like_short_line() {
        assert!(is_heading_like("Actions"));
        assert!(is_heading_like("The Dungeon of the Mad Mage"));
    }

    #[test]
    fn test_heading_like_rejects_prose_and_bullets() {
        assert!(!is_heading_like(
            "The swashbuckler can take the Dash or Disengage"
        ));
        assert!(!is_heading_like("\u{2022} a bullet item"));
        assert!(!is_heading_like(""));
    }

    #[test]
    fn test_word_cutoff_is_exact() {
        // 6 words: heading-like. 7 words: prose.
        assert!(is_heading_like("one two three four five six"));
        assert!(!is_heading_like("one two three four five six seven"));
    }

    #[test]
    fn test_find_stat_bounds_vertical_block() {
        let text = "Big Bara\nMedium humanoid (warforged), neutral evil\n\
                    Armor Class 18 (natural armor, Imposing Majesty)\n\
                    Hit Points 117 (18d8 + 36)\nSpeed 30 ft.\n\
                    STR\n DEX\n CON\n INT\n WIS\n CHA\n\
                    14 (+2)\n 17 (+3)\n 15 (+2)\n 13 (+1)\n 16 (+3)\n 18 (+4)\n\
                    Saving Throws Con +6, Wis +7";
        let lines: Vec<&str> = text.lines().collect();
        let (first, last) = find_stat_bounds(&lines).expect("bounds");
        assert_eq!(lines[first], "STR");
        assert_eq!(lines[last - 1].trim(), "18 (+4)");
    }

    #[test]
    fn test_find_stat_bounds_rejects_inline_table() {
        let lines = vec![
            "STR DEX CON INT WIS CHA",
            "18 (+4) 11 (+0) 14 (+2) 13 (+0) 15 (+1) 11 (+0)",
        ];
        assert_eq!(find_stat_bounds(&lines), None);
    }

    #[test]
    fn test_find_stat_bounds_rejects_interleaved() {
        let lines = vec!["STR", "12 (+1)", "DEX", "18 (+4)"];
        assert_eq!(find_stat_bounds(&lines), None);
    }

    #[test]
    fn test_find_section_heading() {
        let lines = vec!["Multiattack. Two attacks.", "  Actions  ", "Bite."];
        assert_eq!(find_section_heading(&lines, "Actions"), Some(1));
        assert_eq!(find_section_heading(&lines, "Reactions"), None);
    }
}
