//! Actor records reconstructed from stat-block text.
//!
//! The data model here is what the document-sink collaborator consumes; it is
//! built once per parse from an immutable line sequence and never mutated
//! afterwards. Parsing itself lives in the dialect front-ends ([`wtc`] for
//! whitespace-noisy plain text, [`homebrewery`] for markdown blockquotes),
//! both implementing [`ActorFieldParser`] and selected once at the
//! [`parse_actor`] facade boundary.
//!
//! Failure policy ("never block import over a cosmetic mismatch"): the facade
//! catches non-fatal field errors and degrades that field to its default;
//! only a missing name anchor or a missing ability block abort the parse.

pub mod homebrewery;
pub mod wtc;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ParseError, Result};
pub use crate::formula::RolledValue as Health;

// ============================================================================
// Data model
// ============================================================================

/// Creature size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; 6] = [
        Size::Tiny,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::Huge,
        Size::Gargantuan,
    ];

    /// Canonical label, as stat blocks print it.
    pub fn label(&self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
        }
    }

    /// Find a size token in a descriptor line, case-insensitively.
    pub fn detect(line: &str) -> Option<Size> {
        let lowered = line.to_lowercase();
        Size::ALL
            .into_iter()
            .find(|size| lowered.contains(&size.label().to_lowercase()))
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One of the six core abilities, used to address [`Abilities`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityId {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl AbilityId {
    /// Canonical order, matching every tabular layout.
    pub const ALL: [AbilityId; 6] = [
        AbilityId::Str,
        AbilityId::Dex,
        AbilityId::Con,
        AbilityId::Int,
        AbilityId::Wis,
        AbilityId::Cha,
    ];

    /// Match a label like "STR", "Con", or "Wisdom" by its 3-letter prefix.
    pub fn from_label(label: &str) -> Option<AbilityId> {
        let prefix = label.trim().get(..3)?.to_ascii_lowercase();
        match prefix.as_str() {
            "str" => Some(AbilityId::Str),
            "dex" => Some(AbilityId::Dex),
            "con" => Some(AbilityId::Con),
            "int" => Some(AbilityId::Int),
            "wis" => Some(AbilityId::Wis),
            "cha" => Some(AbilityId::Cha),
            _ => None,
        }
    }
}

/// One ability score with its derived modifier and saving-throw bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// The raw score, the only part trusted from the source text
    pub value: i32,
    /// Always `floor((value - 10) / 2)`; embedded modifier text is ignored
    /// because PDF extraction garbles it
    #[serde(rename = "mod")]
    pub modifier: i32,
    /// Defaults to the modifier; overridden by an explicit "Saving Throws"
    /// bonus for this ability
    pub saving_throw: i32,
}

impl Ability {
    /// Build from a raw score, recomputing the modifier.
    pub fn from_score(value: i32) -> Self {
        let modifier = (value - 10).div_euclid(2);
        Ability {
            value,
            modifier,
            saving_throw: modifier,
        }
    }
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub str: Ability,
    pub dex: Ability,
    pub con: Ability,
    pub int: Ability,
    pub wis: Ability,
    pub cha: Ability,
}

impl Abilities {
    /// Build from six raw scores in canonical STR..CHA order.
    pub fn from_scores(scores: [i32; 6]) -> Self {
        Abilities {
            str: Ability::from_score(scores[0]),
            dex: Ability::from_score(scores[1]),
            con: Ability::from_score(scores[2]),
            int: Ability::from_score(scores[3]),
            wis: Ability::from_score(scores[4]),
            cha: Ability::from_score(scores[5]),
        }
    }

    /// Borrow one ability by id.
    pub fn get(&self, id: AbilityId) -> &Ability {
        match id {
            AbilityId::Str => &self.str,
            AbilityId::Dex => &self.dex,
            AbilityId::Con => &self.con,
            AbilityId::Int => &self.int,
            AbilityId::Wis => &self.wis,
            AbilityId::Cha => &self.cha,
        }
    }

    /// Mutably borrow one ability by id.
    pub fn get_mut(&mut self, id: AbilityId) -> &mut Ability {
        match id {
            AbilityId::Str => &mut self.str,
            AbilityId::Dex => &mut self.dex,
            AbilityId::Con => &mut self.con,
            AbilityId::Int => &mut self.int,
            AbilityId::Wis => &mut self.wis,
            AbilityId::Cha => &mut self.cha,
        }
    }
}

/// Armor class value with its free-text source, e.g. "natural armor".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    pub value: i32,
    /// Parenthetical armor description; empty when the line has none
    #[serde(rename = "type")]
    pub kind: String,
}

/// Named sense ranges plus the loose trailing parts of a "Senses" line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Senses {
    /// Sense name (lower-cased) to distance
    pub ranges: BTreeMap<String, u32>,
    /// Trailing "passive Perception N" when present
    pub passive_perception: Option<u32>,
    /// Unrecognized parenthetical, kept verbatim
    /// (e.g. "blind beyond this radius")
    pub special: Option<String>,
    /// Distance unit tag; "ft" whenever ranges were parsed
    pub units: String,
}

/// One skill bonus entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Lower-cased skill name
    pub name: String,
    pub bonus: i32,
}

/// Challenge rating and experience award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Decimal challenge rating; fractional ratings like "1/8" become 0.125
    pub cr: f64,
    pub xp: u32,
}

/// Which block of the stat block a feature was found under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCategory {
    #[default]
    Feature,
    Action,
    Reaction,
}

/// A named feature or action with its reconstructed description.
///
/// Descriptions have line-wrap hyphenation rejoined and newlines collapsed
/// to single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub category: FeatureCategory,
}

/// A fully reconstructed actor record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub name: String,
    /// The descriptor line verbatim
    pub biography: String,
    pub size: Option<Size>,
    /// Free-form creature type, lower-cased in the WTC dialect
    #[serde(rename = "type")]
    pub creature_type: String,
    pub alignment: String,
    pub armor_class: ArmorClass,
    pub health: Health,
    /// Primary ground speed in feet per round
    pub speed: u32,
    pub abilities: Abilities,
    pub senses: Senses,
    /// Lower-cased, in source order
    pub languages: Vec<String>,
    pub skills: Vec<Skill>,
    pub damage_immunities: Vec<String>,
    pub damage_resistances: Vec<String>,
    pub damage_vulnerabilities: Vec<String>,
    pub condition_immunities: Vec<String>,
    pub rating: Option<Rating>,
    /// Features, actions, and reactions, uniformly represented
    pub items: Vec<Feature>,
}

// ============================================================================
// Dialect facade
// ============================================================================

/// The supported stat-block text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// Plain text as extracted from WTC-published PDFs
    Wtc,
    /// Homebrewery/GMBinder markdown blockquote format
    Homebrewery,
}

/// Field extractors one dialect provides.
///
/// Every extractor scans the full line sequence and locates its own field;
/// field order is not guaranteed once whitespace artifacts are present.
/// Extractors fail with [`ParseError::FieldNotFound`] when their label is
/// absent and [`ParseError::FieldUnparseable`] when the label is present but
/// the value shape does not match.
pub trait ActorFieldParser {
    fn parse_name(&self, lines: &[&str]) -> Result<String>;
    fn parse_biography(&self, lines: &[&str]) -> Result<String>;
    fn parse_size(&self, lines: &[&str]) -> Result<Size>;
    fn parse_creature_type(&self, lines: &[&str]) -> Result<String>;
    fn parse_alignment(&self, lines: &[&str]) -> Result<String>;
    fn parse_armor_class(&self, lines: &[&str]) -> Result<ArmorClass>;
    fn parse_health(&self, lines: &[&str]) -> Result<Health>;
    fn parse_speed(&self, lines: &[&str]) -> Result<u32>;
    fn parse_abilities(&self, lines: &[&str]) -> Result<Abilities>;
    fn parse_saving_throws(&self, lines: &[&str]) -> Result<Vec<(AbilityId, i32)>>;
    fn parse_senses(&self, lines: &[&str]) -> Result<Senses>;
    fn parse_languages(&self, lines: &[&str]) -> Result<Vec<String>>;
    fn parse_skills(&self, lines: &[&str]) -> Result<Vec<Skill>>;
    fn parse_damage_immunities(&self, lines: &[&str]) -> Result<Vec<String>>;
    fn parse_damage_resistances(&self, lines: &[&str]) -> Result<Vec<String>>;
    fn parse_damage_vulnerabilities(&self, lines: &[&str]) -> Result<Vec<String>>;
    fn parse_condition_immunities(&self, lines: &[&str]) -> Result<Vec<String>>;
    fn parse_rating(&self, lines: &[&str]) -> Result<Rating>;
    fn parse_items(&self, lines: &[&str]) -> Result<Vec<Feature>>;
}

/// Parse a whole text block into an [`ActorRecord`].
///
/// Convenience wrapper over [`parse_actor_lines`] that splits on newlines.
pub fn parse_actor(dialect: Dialect, text: &str) -> Result<ActorRecord> {
    let lines: Vec<&str> = text.lines().collect();
    parse_actor_lines(dialect, &lines)
}

/// Parse an ordered line sequence into an [`ActorRecord`].
///
/// # Errors
///
/// Only the fatal conditions surface: [`ParseError::MalformedDocument`] when
/// the dialect's structural anchor (name line, divider) is missing, and
/// [`ParseError::AbilitiesNotFound`] when no ability layout matched. All
/// other field failures degrade to that field's default.
pub fn parse_actor_lines(dialect: Dialect, lines: &[&str]) -> Result<ActorRecord> {
    let record = match dialect {
        Dialect::Wtc => assemble(&wtc::WtcParser, lines),
        Dialect::Homebrewery => assemble(&homebrewery::HomebreweryParser, lines),
    };
    if let Err(err) = &record {
        warn!(?dialect, %err, "actor parse aborted");
    }
    record
}

fn assemble(parser: &dyn ActorFieldParser, lines: &[&str]) -> Result<ActorRecord> {
    let name = parser.parse_name(lines)?;

    let mut abilities = parser.parse_abilities(lines).map_err(|err| {
        if err.is_fatal() {
            err
        } else {
            ParseError::AbilitiesNotFound
        }
    })?;
    if let Some(overrides) = recover("saving throws", parser.parse_saving_throws(lines))? {
        for (id, bonus) in overrides {
            abilities.get_mut(id).saving_throw = bonus;
        }
    }

    Ok(ActorRecord {
        name,
        biography: recover("biography", parser.parse_biography(lines))?.unwrap_or_default(),
        size: recover("size", parser.parse_size(lines))?,
        creature_type: recover("type", parser.parse_creature_type(lines))?.unwrap_or_default(),
        alignment: recover("alignment", parser.parse_alignment(lines))?.unwrap_or_default(),
        armor_class: recover("armor class", parser.parse_armor_class(lines))?.unwrap_or_default(),
        health: recover("health", parser.parse_health(lines))?.unwrap_or_default(),
        speed: recover("speed", parser.parse_speed(lines))?.unwrap_or_default(),
        abilities,
        senses: recover("senses", parser.parse_senses(lines))?.unwrap_or_default(),
        languages: recover("languages", parser.parse_languages(lines))?.unwrap_or_default(),
        skills: recover("skills", parser.parse_skills(lines))?.unwrap_or_default(),
        damage_immunities: recover("damage immunities", parser.parse_damage_immunities(lines))?
            .unwrap_or_default(),
        damage_resistances: recover("damage resistances", parser.parse_damage_resistances(lines))?
            .unwrap_or_default(),
        damage_vulnerabilities: recover(
            "damage vulnerabilities",
            parser.parse_damage_vulnerabilities(lines),
        )?
        .unwrap_or_default(),
        condition_immunities: recover(
            "condition immunities",
            parser.parse_condition_immunities(lines),
        )?
        .unwrap_or_default(),
        rating: recover("rating", parser.parse_rating(lines))?,
        items: recover("items", parser.parse_items(lines))?.unwrap_or_default(),
    })
}

/// Degrade a non-fatal field failure to `None`; re-raise fatal kinds.
fn recover<T>(field: &'static str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            debug!(field, %err, "field unavailable, keeping default");
            Ok(None)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
