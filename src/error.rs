//! Error types for stat-block and journal parsing.
//!
//! The failure model is deliberately small: a field's label is either absent
//! (`FieldNotFound`), or present with a value that does not match the expected
//! shape (`FieldUnparseable`). Two conditions are fatal to a whole parse:
//! a missing ability block and a missing structural anchor. The facade in
//! [`crate::actor`] catches the non-fatal kinds per field and degrades to a
//! default; it never catches the fatal ones.

use thiserror::Error;

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while reconstructing a record from freeform text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The label/anchor for a field is absent from the input.
    ///
    /// From the caller's perspective the field is optional: a stat block
    /// without a "Skills" line simply has no skills.
    #[error("could not find \"{label}\" in input")]
    FieldNotFound {
        /// The label substring that was searched for
        label: String,
    },

    /// The label is present but its value does not match the expected shape.
    ///
    /// Distinct from [`ParseError::FieldNotFound`] so callers can tell
    /// "not present in this monster" from "present but malformed".
    #[error("could not parse {field} from: \"{text}\"")]
    FieldUnparseable {
        /// The semantic field being extracted
        field: String,
        /// The offending line or fragment
        text: String,
    },

    /// None of the ability sub-layout parsers succeeded.
    ///
    /// Abilities are mandatory; this aborts the whole actor parse.
    #[error("no ability score block found in any supported layout")]
    AbilitiesNotFound,

    /// A structural anchor the dialect requires is missing.
    ///
    /// Examples: no name line at all, or a Homebrewery block without its
    /// leading "___" divider. Nothing mandatory survives, so this aborts
    /// the whole parse.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl ParseError {
    /// Whether this error aborts the entire record construction.
    ///
    /// Non-fatal errors are caught per field by the dialect facade and the
    /// field falls back to its documented default.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::AbilitiesNotFound | ParseError::MalformedDocument(_)
        )
    }

    /// Shorthand for a [`ParseError::FieldNotFound`] with an owned label.
    pub fn not_found(label: impl Into<String>) -> Self {
        ParseError::FieldNotFound {
            label: label.into(),
        }
    }

    /// Shorthand for a [`ParseError::FieldUnparseable`] with owned parts.
    pub fn unparseable(field: impl Into<String>, text: impl Into<String>) -> Self {
        ParseError::FieldUnparseable {
            field: field.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ParseError::AbilitiesNotFound.is_fatal());
        assert!(ParseError::MalformedDocument("no name line".into()).is_fatal());
        assert!(!ParseError::not_found("Skills").is_fatal());
        assert!(!ParseError::unparseable("speed", "Speed some ft.").is_fatal());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ParseError::not_found("Armor Class");
        assert!(err.to_string().contains("Armor Class"));

        let err = ParseError::unparseable("rating", "Challenge ???");
        assert!(err.to_string().contains("Challenge ???"));
    }
}
