//! Generic lead-value + dice-formula extraction.
//!
//! Several stat-block fields look like `<label> <value> (<count>d<size> + <const>)`,
//! most prominently hit points. Given a line and a locating pattern that
//! captures the remainder after the label, this module extracts the leading
//! integer and, when present, the parenthesized dice expression, deriving the
//! numeric minimum/maximum the formula can roll. Dialect-agnostic; both
//! stat-block front-ends reuse it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// A parenthesized dice expression inside a stat line.
///
/// PDF extraction routinely swaps '-' for en-dash or unicode minus, so the
/// sign class is wider than ASCII.
static DICE_FORMULA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \(\s*
        (?P<formula>
            (?P<count>\d+) \s* d \s* (?P<size>\d+)      # count and die size
            (?: \s* (?P<sign>[+\-\u{2212}\u{2013}]) \s* (?P<konst>\d+) )?  # flat part
        )
        \s*\)",
    )
    .expect("Failed to compile dice formula regex")
});

/// Leading integer of a field remainder.
static LEAD_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("Failed to compile lead integer regex"));

/// A numeric field with the range its dice formula can produce.
///
/// Without a formula, `min` and `max` collapse to `value` and `formula`
/// stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledValue {
    /// The stated value (e.g., average hit points)
    pub value: i32,
    /// Minimum the formula can roll (all dice show 1)
    pub min: i32,
    /// Maximum the formula can roll (all dice show their size)
    pub max: i32,
    /// The formula text verbatim, e.g. "12d8 + 12"; empty when absent
    pub formula: String,
}

/// Extract a [`RolledValue`] from `line` using `pattern` to locate the field.
///
/// `pattern` must carry one capture group holding everything after the label,
/// e.g. `Hit Points\*{0,2} (.*)` for both dialects' health lines.
///
/// # Errors
///
/// [`ParseError::FieldNotFound`] when the pattern does not match the line,
/// [`ParseError::FieldUnparseable`] when the remainder does not lead with an
/// integer.
pub fn parse_rolled_value(line: &str, pattern: &Regex) -> Result<RolledValue> {
    let caps = pattern
        .captures(line)
        .ok_or_else(|| ParseError::not_found(pattern.as_str()))?;
    let rest = caps
        .get(1)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::not_found(pattern.as_str()))?;

    let value: i32 = LEAD_INT
        .captures(rest)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ParseError::unparseable("value", line))?;

    let Some(dice) = DICE_FORMULA.captures(rest) else {
        return Ok(RolledValue {
            value,
            min: value,
            max: value,
            formula: String::new(),
        });
    };

    // Capture groups inside DICE_FORMULA always parse; the pattern only
    // matches digit runs.
    let count: i32 = dice["count"].parse().unwrap_or(0);
    let size: i32 = dice["size"].parse().unwrap_or(0);
    let konst: i32 = match (dice.name("sign"), dice.name("konst")) {
        (Some(sign), Some(konst)) => {
            let flat: i32 = konst.as_str().parse().unwrap_or(0);
            if sign.as_str() == "+" {
                flat
            } else {
                -flat
            }
        }
        _ => 0,
    };

    Ok(RolledValue {
        value,
        min: count + konst,
        max: count * size + konst,
        formula: dice["formula"].trim().to_string(),
    })
}
