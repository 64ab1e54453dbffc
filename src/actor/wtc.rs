//! WTC plain-text stat-block dialect.
//!
//! Input is what PDF copy tools produce from officially published books:
//! ragged indentation, trailing space runs, en-dashes where minus signs
//! belong, wrapped label lines, and occasionally whole lines displaced from
//! their printed position. Every extractor here is label-driven for that
//! reason; nothing assumes the descriptor or a stat line sits at a fixed
//! index.
//!
//! The Homebrewery front-end reuses most of these extractors on sanitized
//! lines, so the field helpers are crate-visible free functions and the
//! [`WtcParser`] trait impl is a thin dispatch layer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::actor::{
    Abilities, AbilityId, ActorFieldParser, ArmorClass, Feature, FeatureCategory, Health, Rating,
    Senses, Size, Skill,
};
use crate::classify::{self, ABILITY_NAMES};
use crate::error::{ParseError, Result};
use crate::formula;

// ============================================================================
// Regex Patterns
// ============================================================================

static SIZE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tiny|small|medium|large|huge|gargantuan")
        .expect("Failed to compile size token regex")
});

static ARMOR_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Armor Class\*{0,2}\s*(\d+)\s*(?:\(([^)]*)\))?")
        .expect("Failed to compile armor class regex")
});

static HIT_POINTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Hit Points\*{0,2} (.*)").expect("Failed to compile hit points regex"));

static SPEED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bSpeed\b\D*(\d+)").expect("Failed to compile speed regex"));

static CHALLENGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ix) Challenge \s+ ([\d/]+) \s* \( \s* ([\d,]+) \s* xp")
        .expect("Failed to compile challenge regex")
});

static SENSES_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bSenses\b(.*)").expect("Failed to compile senses regex"));

static SKILLS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bSkills\b(.*)").expect("Failed to compile skills regex"));

static SAVING_THROWS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Saving Throws(.*)").expect("Failed to compile saving throws regex")
});

static LANGUAGES_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bLanguages\b(.*)").expect("Failed to compile languages regex"));

static DAMAGE_IMMUNITIES_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Damage Immunities(.*)").expect("Failed to compile damage immunities regex")
});

static DAMAGE_RESISTANCES_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Damage Resistances(.*)").expect("Failed to compile damage resistances regex")
});

static DAMAGE_VULNERABILITIES_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Damage Vulnerabilities(.*)")
        .expect("Failed to compile damage vulnerabilities regex")
});

static CONDITION_IMMUNITIES_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Condition Immunities(.*)")
        .expect("Failed to compile condition immunities regex")
});

static PASSIVE_PERCEPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),?\s*passive\s+Perception\s+(\d+)")
        .expect("Failed to compile passive perception regex")
});

static SENSE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z]+)\s+(\d+)\s*ft").expect("Failed to compile sense range regex")
});

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]*)\)").expect("Failed to compile parenthetical regex"));

static SKILL_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z]+)\s*\+?\s*(-?\d+)").expect("Failed to compile skill item regex")
});

static SIGNED_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?\d+").expect("Failed to compile signed integer regex"));

static LIST_AND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\band\b").expect("Failed to compile list conjunction regex"));

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("Failed to compile leading integer regex"));

/// Ability score cell: the value is the integer right before the '(' of the
/// embedded modifier. The modifier itself is never trusted.
static ABILITY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\(").expect("Failed to compile ability value regex"));

// ============================================================================
// Shared field extractors
// ============================================================================

/// First line carrying a size token; size, type, alignment, and biography
/// all come from it. PDF extraction can displace this line well below the
/// combat stats, so the search is position-free.
pub(crate) fn descriptor_line<'a>(lines: &[&'a str]) -> Result<&'a str> {
    lines
        .iter()
        .find(|line| Size::detect(line).is_some())
        .copied()
        .ok_or_else(|| ParseError::not_found("size descriptor"))
}

/// Creature type in source casing: the text between the size token and the
/// first comma, parentheticals removed.
pub(crate) fn raw_creature_type(descriptor: &str) -> Result<String> {
    let token = SIZE_TOKEN
        .find(descriptor)
        .ok_or_else(|| ParseError::not_found("size"))?;
    let rest = descriptor[token.end()..]
        .split(',')
        .next()
        .unwrap_or_default();
    let cleaned = PARENTHETICAL.replace_all(rest, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return Err(ParseError::unparseable("type", descriptor));
    }
    Ok(cleaned)
}

/// Alignment in source casing: everything after the first comma, with
/// emphasis markers stripped.
pub(crate) fn raw_alignment(descriptor: &str) -> Result<String> {
    let (_, rest) = descriptor
        .split_once(',')
        .ok_or_else(|| ParseError::unparseable("alignment", descriptor))?;
    Ok(rest.replace('*', "").trim().to_string())
}

pub(crate) fn armor_class_in(lines: &[&str]) -> Result<ArmorClass> {
    let caps = lines
        .iter()
        .find_map(|line| ARMOR_CLASS.captures(line))
        .ok_or_else(|| ParseError::not_found("Armor Class"))?;
    let value = caps[1]
        .parse()
        .map_err(|_| ParseError::unparseable("armor class", &caps[0]))?;
    Ok(ArmorClass {
        value,
        kind: caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
    })
}

pub(crate) fn health_in(lines: &[&str]) -> Result<Health> {
    let line = lines
        .iter()
        .find(|line| HIT_POINTS.is_match(line))
        .ok_or_else(|| ParseError::not_found("Hit Points"))?;
    formula::parse_rolled_value(line, &HIT_POINTS)
}

/// Primary ground speed: the first integer after the "Speed" label. Further
/// movement modes on the same line are ignored.
pub(crate) fn speed_in(lines: &[&str]) -> Result<u32> {
    let caps = lines
        .iter()
        .find_map(|line| SPEED.captures(line))
        .ok_or_else(|| ParseError::not_found("Speed"))?;
    caps[1]
        .parse()
        .map_err(|_| ParseError::unparseable("speed", &caps[0]))
}

pub(crate) fn rating_in(lines: &[&str]) -> Result<Rating> {
    let caps = lines
        .iter()
        .find_map(|line| CHALLENGE.captures(line))
        .ok_or_else(|| ParseError::not_found("Challenge"))?;
    let cr_text = &caps[1];
    let cr = match cr_text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num
                .parse()
                .map_err(|_| ParseError::unparseable("challenge rating", cr_text))?;
            let den: f64 = den
                .parse()
                .map_err(|_| ParseError::unparseable("challenge rating", cr_text))?;
            if den == 0.0 {
                return Err(ParseError::unparseable("challenge rating", cr_text));
            }
            num / den
        }
        None => cr_text
            .parse()
            .map_err(|_| ParseError::unparseable("challenge rating", cr_text))?,
    };
    let xp = caps[2]
        .replace(',', "")
        .parse()
        .map_err(|_| ParseError::unparseable("challenge xp", &caps[2]))?;
    Ok(Rating { cr, xp })
}

/// Locate a labeled line and gather its wrapped continuations.
///
/// A continuation is any immediately following line whose first non-space
/// character is a lower-case letter; printed stat blocks always start the
/// next field with a capitalized label, so this is a reliable stop signal.
pub(crate) fn labeled_text(lines: &[&str], label: &Lazy<Regex>, field: &str) -> Result<String> {
    let start = lines
        .iter()
        .position(|line| label.is_match(line))
        .ok_or_else(|| ParseError::not_found(field))?;
    let caps = label
        .captures(lines[start])
        .ok_or_else(|| ParseError::not_found(field))?;

    let mut text = caps[1].trim().to_string();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if !trimmed.starts_with(|c: char| c.is_ascii_lowercase()) {
            break;
        }
        text.push(' ');
        text.push_str(trimmed);
    }
    Ok(text)
}

/// Comma-separated list field by label name, shared with the Homebrewery
/// front-end.
pub(crate) fn csv_labeled(lines: &[&str], field: &str) -> Result<Vec<String>> {
    let label = match field {
        "Languages" => &LANGUAGES_LABEL,
        "Damage Immunities" => &DAMAGE_IMMUNITIES_LABEL,
        "Damage Resistances" => &DAMAGE_RESISTANCES_LABEL,
        "Damage Vulnerabilities" => &DAMAGE_VULNERABILITIES_LABEL,
        "Condition Immunities" => &CONDITION_IMMUNITIES_LABEL,
        _ => return Err(ParseError::not_found(field)),
    };
    csv_field_in(lines, label, field)
}

/// Comma-separated list field, lower-cased, with `and` as an extra separator
/// and empty or dash-only items dropped.
fn csv_field_in(lines: &[&str], label: &Lazy<Regex>, field: &str) -> Result<Vec<String>> {
    let text = labeled_text(lines, label, field)?;
    Ok(LIST_AND
        .replace_all(&text, ",")
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| item.chars().any(char::is_alphanumeric))
        .collect())
}

pub(crate) fn skills_in(lines: &[&str]) -> Result<Vec<Skill>> {
    let text = labeled_text(lines, &SKILLS_LABEL, "Skills")?;
    text.split(',')
        .map(|item| {
            let caps = SKILL_ITEM
                .captures(item)
                .ok_or_else(|| ParseError::unparseable("skills", item.trim()))?;
            let bonus = caps[2]
                .parse()
                .map_err(|_| ParseError::unparseable("skills", item.trim()))?;
            Ok(Skill {
                name: caps[1].to_lowercase(),
                bonus,
            })
        })
        .collect()
}

/// Declared saving-throw totals, e.g. "Saving Throws Con +6, Wis +7".
/// Only the listed abilities get an override.
pub(crate) fn saving_throws_in(lines: &[&str]) -> Result<Vec<(AbilityId, i32)>> {
    let text = labeled_text(lines, &SAVING_THROWS_LABEL, "Saving Throws")?;
    text.split(',')
        .map(|item| {
            let item = item.trim();
            let id = AbilityId::from_label(item)
                .ok_or_else(|| ParseError::unparseable("saving throws", item))?;
            let bonus = SIGNED_INT
                .find(item)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| ParseError::unparseable("saving throws", item))?;
            Ok((id, bonus))
        })
        .collect()
}

/// Senses line: named ranges in feet, a trailing passive Perception, and at
/// most one free-text parenthetical kept verbatim.
pub(crate) fn senses_in(lines: &[&str]) -> Result<Senses> {
    let text = labeled_text(lines, &SENSES_LABEL, "Senses")?;

    let special = PARENTHETICAL
        .captures(&text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty());
    let text = PARENTHETICAL.replace_all(&text, "");

    let passive_perception = PASSIVE_PERCEPTION
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());
    let text = PASSIVE_PERCEPTION.replace_all(&text, "");

    let ranges = SENSE_RANGE
        .captures_iter(&text)
        .filter_map(|caps| Some((caps[1].to_lowercase(), caps[2].parse().ok()?)))
        .collect::<std::collections::BTreeMap<String, u32>>();

    if ranges.is_empty() && passive_perception.is_none() && special.is_none() {
        return Err(ParseError::unparseable("senses", text.trim()));
    }
    // the units tag only applies to distance ranges
    let units = if ranges.is_empty() {
        String::new()
    } else {
        "ft".to_string()
    };
    Ok(Senses {
        ranges,
        passive_perception,
        special,
        units,
    })
}

// ============================================================================
// Ability layouts
// ============================================================================

pub(crate) fn leading_int(line: &str) -> Option<i32> {
    LEADING_INT
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// Single header row with all six names, values on the next non-blank line.
fn parse_inline_abilities(lines: &[&str]) -> Result<Abilities> {
    let header = lines
        .iter()
        .position(|line| line.split_whitespace().collect::<Vec<_>>() == ABILITY_NAMES)
        .ok_or_else(|| ParseError::not_found("inline ability header"))?;
    let values = lines[header + 1..]
        .iter()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| ParseError::not_found("inline ability values"))?;

    let scores: Vec<i32> = ABILITY_VALUE
        .captures_iter(values)
        .filter_map(|caps| caps[1].parse().ok())
        .take(6)
        .collect();
    let scores: [i32; 6] = scores
        .try_into()
        .map_err(|_| ParseError::unparseable("abilities", *values))?;
    Ok(Abilities::from_scores(scores))
}

/// Each name on its own line with its value cell on the line right after.
/// Pairs need not be adjacent to each other, which tolerates interleaved
/// junk from column-order extraction.
fn parse_multiline_abilities(lines: &[&str]) -> Result<Abilities> {
    let mut scores = [0i32; 6];
    for (slot, name) in ABILITY_NAMES.iter().enumerate() {
        let idx = lines
            .iter()
            .position(|line| line.trim() == *name)
            .ok_or_else(|| ParseError::not_found(*name))?;
        let value_line = lines
            .get(idx + 1)
            .ok_or_else(|| ParseError::not_found(*name))?;
        scores[slot] =
            leading_int(value_line).ok_or_else(|| ParseError::unparseable("abilities", *value_line))?;
    }
    Ok(Abilities::from_scores(scores))
}

/// All six names on consecutive lines, then all six value cells.
fn parse_vertical_abilities(lines: &[&str]) -> Result<Abilities> {
    let (first, last) = classify::find_stat_bounds(lines)
        .ok_or_else(|| ParseError::not_found("vertical ability block"))?;
    let mut scores = [0i32; 6];
    for (slot, line) in lines[first + 6..last].iter().enumerate() {
        scores[slot] =
            leading_int(line).ok_or_else(|| ParseError::unparseable("abilities", *line))?;
    }
    Ok(Abilities::from_scores(scores))
}

/// Known table layouts, most common first. Each rejects the others' shape,
/// so trying them in order is unambiguous.
const ABILITY_LAYOUTS: [fn(&[&str]) -> Result<Abilities>; 3] = [
    parse_inline_abilities,
    parse_multiline_abilities,
    parse_vertical_abilities,
];

pub(crate) fn abilities_in(lines: &[&str]) -> Result<Abilities> {
    for layout in ABILITY_LAYOUTS {
        if let Ok(abilities) = layout(lines) {
            return Ok(abilities);
        }
    }
    Err(ParseError::AbilitiesNotFound)
}

// ============================================================================
// Features and actions
// ============================================================================

/// Entry title of a trimmed line, when it has one.
///
/// A title is the text before the first '.': non-empty, starts with an
/// upper-case letter, at most 4 words. "Poisonous Cloud (2/Day)." qualifies;
/// wrapped prose and "Hit:" damage lines do not. Titles with internal
/// periods are missed; no fixture has produced one yet.
pub(crate) fn feature_title(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let (head, _) = trimmed.split_once('.')?;
    let head = head.trim();
    let first = head.chars().next()?;
    if !first.is_uppercase() {
        return None;
    }
    if head.split_whitespace().count() > 4 {
        return None;
    }
    Some(head.to_string())
}

/// Split a flat run of lines into titled entries.
///
/// Continuations collapse to single spaces, except after a hyphenated line
/// wrap where the hyphen is dropped and the halves rejoin directly. Lines
/// before the first title are discarded.
fn split_flat(lines: &[&str], category: FeatureCategory) -> Vec<Feature> {
    let mut features: Vec<Feature> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(name) = feature_title(trimmed) {
            let rest = trimmed.split_once('.').map(|(_, rest)| rest).unwrap_or("");
            let description = rest.trim().to_string();
            features.push(Feature {
                name,
                description,
                category,
            });
            continue;
        }
        let Some(current) = features.last_mut() else {
            continue;
        };
        if current.description.ends_with('-') {
            current.description.pop();
            current.description.push_str(trimmed);
        } else {
            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(trimmed);
        }
    }
    for feature in &mut features {
        feature.description = feature.description.trim().to_string();
    }
    features
}

/// The feature zone starts after the "Challenge" line (the last combat stat
/// printed) and splits into categories on bare "Actions" / "Reactions"
/// heading lines.
pub(crate) fn items_in(lines: &[&str]) -> Result<Vec<Feature>> {
    let zone = match lines.iter().position(|line| line.contains("Challenge")) {
        Some(idx) => &lines[idx + 1..],
        None => lines,
    };

    let actions = classify::find_section_heading(zone, "Actions");
    let mut features = split_flat(
        &zone[..actions.unwrap_or(zone.len())],
        FeatureCategory::Feature,
    );
    if let Some(actions) = actions {
        let rest = &zone[actions + 1..];
        let reactions = classify::find_section_heading(rest, "Reactions");
        features.extend(split_flat(
            &rest[..reactions.unwrap_or(rest.len())],
            FeatureCategory::Action,
        ));
        if let Some(reactions) = reactions {
            features.extend(split_flat(
                &rest[reactions + 1..],
                FeatureCategory::Reaction,
            ));
        }
    }
    Ok(features)
}

// ============================================================================
// Dialect front-end
// ============================================================================

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text dialect as extracted from published PDFs.
pub struct WtcParser;

impl ActorFieldParser for WtcParser {
    fn parse_name(&self, lines: &[&str]) -> Result<String> {
        lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ParseError::MalformedDocument("no name line".into()))
    }

    fn parse_biography(&self, lines: &[&str]) -> Result<String> {
        Ok(descriptor_line(lines)?.trim().to_string())
    }

    fn parse_size(&self, lines: &[&str]) -> Result<Size> {
        let descriptor = descriptor_line(lines)?;
        Size::detect(descriptor).ok_or_else(|| ParseError::not_found("size"))
    }

    fn parse_creature_type(&self, lines: &[&str]) -> Result<String> {
        Ok(raw_creature_type(descriptor_line(lines)?)?.to_lowercase())
    }

    fn parse_alignment(&self, lines: &[&str]) -> Result<String> {
        Ok(title_case(&raw_alignment(descriptor_line(lines)?)?))
    }

    fn parse_armor_class(&self, lines: &[&str]) -> Result<ArmorClass> {
        armor_class_in(lines)
    }

    fn parse_health(&self, lines: &[&str]) -> Result<Health> {
        health_in(lines)
    }

    fn parse_speed(&self, lines: &[&str]) -> Result<u32> {
        speed_in(lines)
    }

    fn parse_abilities(&self, lines: &[&str]) -> Result<Abilities> {
        abilities_in(lines)
    }

    fn parse_saving_throws(&self, lines: &[&str]) -> Result<Vec<(AbilityId, i32)>> {
        saving_throws_in(lines)
    }

    fn parse_senses(&self, lines: &[&str]) -> Result<Senses> {
        senses_in(lines)
    }

    fn parse_languages(&self, lines: &[&str]) -> Result<Vec<String>> {
        csv_field_in(lines, &LANGUAGES_LABEL, "Languages")
    }

    fn parse_skills(&self, lines: &[&str]) -> Result<Vec<Skill>> {
        skills_in(lines)
    }

    fn parse_damage_immunities(&self, lines: &[&str]) -> Result<Vec<String>> {
        csv_field_in(lines, &DAMAGE_IMMUNITIES_LABEL, "Damage Immunities")
    }

    fn parse_damage_resistances(&self, lines: &[&str]) -> Result<Vec<String>> {
        csv_field_in(lines, &DAMAGE_RESISTANCES_LABEL, "Damage Resistances")
    }

    fn parse_damage_vulnerabilities(&self, lines: &[&str]) -> Result<Vec<String>> {
        csv_field_in(lines, &DAMAGE_VULNERABILITIES_LABEL, "Damage Vulnerabilities")
    }

    fn parse_condition_immunities(&self, lines: &[&str]) -> Result<Vec<String>> {
        csv_field_in(lines, &CONDITION_IMMUNITIES_LABEL, "Condition Immunities")
    }

    fn parse_rating(&self, lines: &[&str]) -> Result<Rating> {
        rating_in(lines)
    }

    fn parse_items(&self, lines: &[&str]) -> Result<Vec<Feature>> {
        items_in(lines)
    }
}

// ============================================================================
// Tests
// ============================================================================
