//! Homebrewery markdown stat-block dialect.
//!
//! Homebrewery and GMBinder wrap every stat block in a blockquote: line 0 is
//! a bare `___` divider, line 1 the `> ## Name` heading, line 2 the
//! descriptor, and `> ___` dividers separate the stat sections. Unlike the
//! plain-text dialect the structure is reliable, so this front-end leans on
//! it: a missing opening divider or name heading is a malformed document,
//! and the ability pipe-table row count is enforced strictly.
//!
//! Field values inside the markup are the same text the plain-text dialect
//! handles, so most extraction delegates to [`super::wtc`] after stripping
//! the blockquote and emphasis markers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::actor::{
    wtc, Abilities, AbilityId, ActorFieldParser, ArmorClass, Feature, FeatureCategory, Health,
    Rating, Senses, Size, Skill,
};
use crate::error::{ParseError, Result};

// ============================================================================
// Regex Patterns
// ============================================================================

static NAME_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*>\s*##\s*(.*)").expect("Failed to compile name heading regex"));

static DIVIDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*>\s*___").expect("Failed to compile divider regex"));

static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*>\s*###\s*(.*)").expect("Failed to compile section heading regex")
});

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*>\s*\*{2,3}([^*]+?)\.?\s*\*{2,3}\s*(.*)")
        .expect("Failed to compile feature entry regex")
});

/// The ability pipe-table header, matched as a literal substring.
const ABILITY_HEADER: &str = "|STR|DEX|CON|INT|WIS|CHA|";

// ============================================================================
// Helpers
// ============================================================================

/// Strip blockquote and emphasis markers, plus the leading markdown bullet,
/// so the plain-text extractors see the line the way a PDF copy would print
/// it. Hyphens inside the value stay put: they carry dice signs and negative
/// bonuses ("3 (1d6 - 1)", "Athletics -1").
fn sanitize(line: &str) -> String {
    let text: String = line.chars().filter(|c| !matches!(c, '>' | '*')).collect();
    match text.trim_start().strip_prefix("- ") {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn sanitized(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| sanitize(line)).collect()
}

fn as_refs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

/// The descriptor always sits on line 2, right under the name heading.
fn descriptor(lines: &[&str]) -> Result<String> {
    let line = lines
        .get(2)
        .ok_or_else(|| ParseError::not_found("descriptor line"))?;
    Ok(sanitize(line).trim().to_string())
}

/// Collapse runs of whitespace left behind by marker stripping.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Dialect front-end
// ============================================================================

/// Homebrewery/GMBinder markdown dialect.
pub struct HomebreweryParser;

impl ActorFieldParser for HomebreweryParser {
    fn parse_name(&self, lines: &[&str]) -> Result<String> {
        let opener = lines
            .first()
            .ok_or_else(|| ParseError::MalformedDocument("empty input".into()))?;
        if !opener.trim_start().starts_with("___") {
            return Err(ParseError::MalformedDocument(
                "missing opening \"___\" divider".into(),
            ));
        }
        let heading = lines
            .get(1)
            .and_then(|line| NAME_HEADING.captures(line))
            .ok_or_else(|| {
                ParseError::MalformedDocument("missing \"> ##\" name heading".into())
            })?;
        Ok(heading[1].trim().to_string())
    }

    fn parse_biography(&self, lines: &[&str]) -> Result<String> {
        descriptor(lines)
    }

    fn parse_size(&self, lines: &[&str]) -> Result<Size> {
        Size::detect(&descriptor(lines)?).ok_or_else(|| ParseError::not_found("size"))
    }

    fn parse_creature_type(&self, lines: &[&str]) -> Result<String> {
        // source casing is kept; Homebrewery authors capitalize deliberately
        wtc::raw_creature_type(&descriptor(lines)?)
    }

    fn parse_alignment(&self, lines: &[&str]) -> Result<String> {
        wtc::raw_alignment(&descriptor(lines)?)
    }

    fn parse_armor_class(&self, lines: &[&str]) -> Result<ArmorClass> {
        let clean = sanitized(lines);
        wtc::armor_class_in(&as_refs(&clean))
    }

    fn parse_health(&self, lines: &[&str]) -> Result<Health> {
        let clean = sanitized(lines);
        wtc::health_in(&as_refs(&clean))
    }

    fn parse_speed(&self, lines: &[&str]) -> Result<u32> {
        let clean = sanitized(lines);
        wtc::speed_in(&as_refs(&clean))
    }

    fn parse_abilities(&self, lines: &[&str]) -> Result<Abilities> {
        let header = lines
            .iter()
            .position(|line| line.contains(ABILITY_HEADER))
            .ok_or_else(|| ParseError::not_found(ABILITY_HEADER))?;
        // header, alignment row, value row
        let row = lines
            .get(header + 2)
            .ok_or_else(|| ParseError::unparseable("abilities", lines[header]))?;

        let cells: Vec<&str> = row.split('|').collect();
        if cells.len() < 3 {
            return Err(ParseError::unparseable("abilities", *row));
        }
        let cells = &cells[1..cells.len() - 1];
        if cells.len() != 6 {
            return Err(ParseError::unparseable("abilities", *row));
        }

        let mut scores = [0i32; 6];
        for (slot, cell) in cells.iter().enumerate() {
            scores[slot] = wtc::leading_int(cell)
                .ok_or_else(|| ParseError::unparseable("abilities", *cell))?;
        }
        Ok(Abilities::from_scores(scores))
    }

    fn parse_saving_throws(&self, lines: &[&str]) -> Result<Vec<(AbilityId, i32)>> {
        let clean = sanitized(lines);
        wtc::saving_throws_in(&as_refs(&clean))
    }

    fn parse_senses(&self, lines: &[&str]) -> Result<Senses> {
        let clean = sanitized(lines);
        wtc::senses_in(&as_refs(&clean))
    }

    fn parse_languages(&self, lines: &[&str]) -> Result<Vec<String>> {
        let clean = sanitized(lines);
        wtc::csv_labeled(&as_refs(&clean), "Languages")
    }

    fn parse_skills(&self, lines: &[&str]) -> Result<Vec<Skill>> {
        let clean = sanitized(lines);
        wtc::skills_in(&as_refs(&clean))
    }

    fn parse_damage_immunities(&self, lines: &[&str]) -> Result<Vec<String>> {
        let clean = sanitized(lines);
        wtc::csv_labeled(&as_refs(&clean), "Damage Immunities")
    }

    fn parse_damage_resistances(&self, lines: &[&str]) -> Result<Vec<String>> {
        let clean = sanitized(lines);
        wtc::csv_labeled(&as_refs(&clean), "Damage Resistances")
    }

    fn parse_damage_vulnerabilities(&self, lines: &[&str]) -> Result<Vec<String>> {
        let clean = sanitized(lines);
        wtc::csv_labeled(&as_refs(&clean), "Damage Vulnerabilities")
    }

    fn parse_condition_immunities(&self, lines: &[&str]) -> Result<Vec<String>> {
        let clean = sanitized(lines);
        wtc::csv_labeled(&as_refs(&clean), "Condition Immunities")
    }

    fn parse_rating(&self, lines: &[&str]) -> Result<Rating> {
        let clean = sanitized(lines);
        wtc::rating_in(&as_refs(&clean))
    }

    fn parse_items(&self, lines: &[&str]) -> Result<Vec<Feature>> {
        let dividers: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| DIVIDER.is_match(line).then_some(idx))
            .collect();
        // features sit between the 4th divider and the 5th (or block end)
        let start = dividers
            .get(3)
            .map(|idx| idx + 1)
            .ok_or_else(|| ParseError::not_found("feature zone divider"))?;
        let end = lines[start..]
            .iter()
            .position(|line| DIVIDER.is_match(line) || line.trim().is_empty())
            .map(|offset| start + offset)
            .unwrap_or(lines.len());

        let mut category = FeatureCategory::Feature;
        let mut features: Vec<Feature> = Vec::new();
        for line in &lines[start..end] {
            if let Some(caps) = SECTION_HEADING.captures(line) {
                let heading = caps[1].trim();
                if heading.eq_ignore_ascii_case("Actions") {
                    category = FeatureCategory::Action;
                } else if heading.eq_ignore_ascii_case("Reactions") {
                    category = FeatureCategory::Reaction;
                }
                continue;
            }
            if let Some(caps) = ENTRY.captures(line) {
                features.push(Feature {
                    name: caps[1].trim().to_string(),
                    description: collapse(&sanitize(&caps[2])),
                    category,
                });
                continue;
            }
            // wrapped continuation of the current entry; anything before the
            // first entry is dropped
            if let Some(current) = features.last_mut() {
                let text = collapse(&line.chars().filter(|c| !matches!(c, '>' | '*')).collect::<String>());
                if text.is_empty() {
                    continue;
                }
                if !current.description.is_empty() {
                    current.description.push(' ');
                }
                current.description.push_str(&text);
            }
        }
        Ok(features)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    const HEADER: &str = "___\n> ## Wraith\n> *Medium Undead, neutral evil*";

    #[test]
    fn test_name_from_heading() {
        let input = lines(HEADER);
        assert_eq!(HomebreweryParser.parse_name(&input).unwrap(), "Wraith");
    }

    #[test]
    fn test_missing_opening_divider_is_malformed() {
        let input = lines("> ## Wraith\n> *Medium Undead, neutral evil*");
        let err = HomebreweryParser.parse_name(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_name_heading_is_malformed() {
        let input = lines("___\n> *Medium Undead, neutral evil*");
        let err = HomebreweryParser.parse_name(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_creature_type_keeps_source_case() {
        let input = lines(HEADER);
        assert_eq!(
            HomebreweryParser.parse_creature_type(&input).unwrap(),
            "Undead"
        );
        assert_eq!(
            HomebreweryParser.parse_alignment(&input).unwrap(),
            "neutral evil"
        );
        assert_eq!(HomebreweryParser.parse_size(&input).unwrap(), Size::Medium);
    }

    #[test]
    fn test_abilities_from_pipe_table() {
        let input = lines(
            "> |STR|DEX|CON|INT|WIS|CHA|\n\
             > |:---:|:---:|:---:|:---:|:---:|:---:|\n\
             > |6 (-2)|16 (+3)|16 (+3)|12 (+1)|14 (+2)|15 (+2)|",
        );
        let abilities = HomebreweryParser.parse_abilities(&input).unwrap();
        assert_eq!(abilities.str.value, 6);
        assert_eq!(abilities.str.modifier, -2);
        assert_eq!(abilities.dex.value, 16);
        assert_eq!(abilities.cha.saving_throw, 2);
    }

    #[test]
    fn test_abilities_wrong_arity_is_unparseable() {
        let five = lines(
            "> |STR|DEX|CON|INT|WIS|CHA|\n\
             > |:---:|:---:|:---:|:---:|:---:|:---:|\n\
             > |6 (-2)|16 (+3)|16 (+3)|12 (+1)|14 (+2)|",
        );
        assert!(matches!(
            HomebreweryParser.parse_abilities(&five).unwrap_err(),
            ParseError::FieldUnparseable { .. }
        ));

        let seven = lines(
            "> |STR|DEX|CON|INT|WIS|CHA|\n\
             > |:---:|:---:|:---:|:---:|:---:|:---:|\n\
             > |6 (-2)|16 (+3)|16 (+3)|12 (+1)|14 (+2)|15 (+2)|15 (+2)|",
        );
        assert!(matches!(
            HomebreweryParser.parse_abilities(&seven).unwrap_err(),
            ParseError::FieldUnparseable { .. }
        ));
    }

    #[test]
    fn test_abilities_header_near_end_is_an_error() {
        let input = lines("> |STR|DEX|CON|INT|WIS|CHA|\n> |:---:|:---:|:---:|");
        assert!(HomebreweryParser.parse_abilities(&input).is_err());
    }

    #[test]
    fn test_senses_through_sanitizer() {
        let input = lines("> - **Senses** blindsight 30 ft., passive Perception 8");
        let senses = HomebreweryParser.parse_senses(&input).unwrap();
        assert_eq!(senses.ranges.get("blindsight"), Some(&30));
        assert_eq!(senses.passive_perception, Some(8));
        assert_eq!(senses.units, "ft");
    }

    #[test]
    fn test_negative_health_formula_survives_stripping() {
        let input = lines("> - **Hit Points** 3 (1d6 - 1)");
        let health = HomebreweryParser.parse_health(&input).unwrap();
        assert_eq!(health.value, 3);
        assert_eq!(health.min, 0);
        assert_eq!(health.max, 5);
        assert_eq!(health.formula, "1d6 - 1");
    }

    #[test]
    fn test_negative_skill_bonus_survives_stripping() {
        let input = lines("> - **Skills** Athletics -1, Stealth +4");
        let skills = HomebreweryParser.parse_skills(&input).unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].name, "athletics");
        assert_eq!(skills[0].bonus, -1);
        assert_eq!(skills[1].bonus, 4);
    }

    #[test]
    fn test_negative_saving_throw_survives_stripping() {
        let input = lines("> - **Saving Throws** Str -1, Dex +4");
        let throws = HomebreweryParser.parse_saving_throws(&input).unwrap();
        assert!(throws.contains(&(AbilityId::Str, -1)));
        assert!(throws.contains(&(AbilityId::Dex, 4)));
    }

    #[test]
    fn test_csv_field_splits_on_and() {
        let input = lines("> - **Condition Immunities** blinded and deafened");
        assert_eq!(
            HomebreweryParser.parse_condition_immunities(&input).unwrap(),
            vec!["blinded", "deafened"]
        );
    }

    #[test]
    fn test_skills_item_without_bonus_is_unparseable() {
        let input = lines("> - **Skills** Stealth, Acrobatics +2");
        assert!(matches!(
            HomebreweryParser.parse_skills(&input).unwrap_err(),
            ParseError::FieldUnparseable { .. }
        ));
    }

    #[test]
    fn test_items_zone_and_entries() {
        let input = lines(
            "___\n\
             > ## Goblin\n\
             > *Small Humanoid, Neutral Evil*\n\
             > ___\n\
             > - **Armor Class** 15\n\
             > ___\n\
             > |STR|DEX|CON|INT|WIS|CHA|\n\
             > |:---:|:---:|:---:|:---:|:---:|:---:|\n\
             > |8 (-1)|14 (+2)|10 (+0)|10 (+0)|8 (-1)|8 (-1)|\n\
             > ___\n\
             > - **Challenge** 1/4 (50 XP)\n\
             > ___\n\
             > ***Nimble Escape.*** Disengage or Hide as\n\
             > a bonus action.\n\
             > ### Actions\n\
             > ***Scimitar.*** *Melee Weapon Attack:* +4 to hit.",
        );
        let items = HomebreweryParser.parse_items(&input).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Nimble Escape");
        assert_eq!(items[0].description, "Disengage or Hide as a bonus action.");
        assert_eq!(items[0].category, FeatureCategory::Feature);
        assert_eq!(items[1].name, "Scimitar");
        assert_eq!(items[1].description, "Melee Weapon Attack: +4 to hit.");
        assert_eq!(items[1].category, FeatureCategory::Action);
    }

    #[test]
    fn test_items_zone_requires_four_dividers() {
        let input = lines("___\n> ## Goblin\n> ___\n> ***Orphan.*** Not in a zone.");
        assert!(matches!(
            HomebreweryParser.parse_items(&input).unwrap_err(),
            ParseError::FieldNotFound { .. }
        ));
    }
}
