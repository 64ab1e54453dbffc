//! Journal tree model and JSON ingestion.
//!
//! A journal import is a tree of [`JournalNode`]s: folders and entries in
//! one shape, each carrying tagged [`Note`]s of content. Trees arrive either
//! from the heuristic text outliner ([`outline`]) or pre-built as JSON
//! ([`from_json`]). The document-sink collaborator walks the tree and
//! materializes folders and entries; everything here stays pure data.

pub mod outline;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// One block of content inside a journal entry.
///
/// `tag` is an HTML-ish marker: `p` for prose, `lu` for bullet list lines,
/// `h1`/`h2`/... for headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub value: String,
    pub tag: String,
}

impl Note {
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Note {
            value: value.into(),
            tag: tag.into(),
        }
    }
}

/// A folder or entry in the imported journal tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalNode {
    pub value: String,
    pub tag: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub children: Vec<JournalNode>,
    /// Explicit ordering key; siblings without one keep parse order
    #[serde(
        rename = "sortValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_value: Option<i64>,
}

impl JournalNode {
    pub fn titled(value: impl Into<String>, tag: impl Into<String>) -> Self {
        JournalNode {
            value: value.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Fill missing child sort values from their titles, then stable-sort.
    /// Children that already carry a value keep it.
    pub fn sort_children(&mut self) {
        for child in &mut self.children {
            if child.sort_value.is_none() {
                child.sort_value = Some(sort_value_for_title(&child.value));
            }
        }
        self.children.sort_by_key(|child| child.sort_value);
    }
}

/// Parse a pre-built journal tree from its JSON form.
pub fn from_json(text: &str) -> Result<Vec<JournalNode>> {
    serde_json::from_str(text).map_err(|err| ParseError::MalformedDocument(err.to_string()))
}

/// Root folder name from a file path: stem only, underscores and encoded
/// spaces to spaces, first letter capitalized.
pub fn root_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    let stem = file.split('.').next().unwrap_or(file);
    let name = stem.replace('_', " ").replace("%20", " ");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => name,
    }
}

/// Ordering key for an imported section title: a leading one or two digit
/// number when present, otherwise the first character's code point.
pub fn sort_value_for_title(title: &str) -> i64 {
    let digits: String = title.chars().take(2).take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        if let Ok(value) = digits.parse() {
            return value;
        }
    }
    title.chars().next().map(|c| c as i64).unwrap_or(0)
}

/// Merge runs of adjacent `p` notes into single paragraphs, joined with a
/// space. Other tags break the run.
pub fn merge_paragraphs(notes: Vec<Note>) -> Vec<Note> {
    let mut merged: Vec<Note> = Vec::new();
    for note in notes {
        match merged.last_mut() {
            Some(last) if note.tag == "p" && last.tag == "p" => {
                last.value.push(' ');
                last.value.push_str(&note.value);
            }
            _ => merged.push(note),
        }
    }
    merged
}

/// Clamp runaway heading tags: anything above `h10` becomes a paragraph.
/// Depth guessing can overshoot on pathological outlines.
pub fn normalize_headers(notes: &mut [Note]) {
    for note in notes {
        if let Some(level) = note.tag.strip_prefix('h') {
            if level.parse::<u32>().map(|n| n > 10).unwrap_or(false) {
                note.tag = "p".to_string();
            }
        }
    }
}

/// Explicit duplicate-name accumulator for one import run.
///
/// Imported sources reuse section names freely ("Treasure", "Tactics");
/// the sink needs the occurrence ordinal to disambiguate entry names.
/// One counter per run, threaded through the tree walk.
#[derive(Debug, Default)]
pub struct CollisionCounter {
    counts: HashMap<String, u32>,
}

impl CollisionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `name` and return its ordinal, starting at 1.
    pub fn count(&mut self, name: &str) -> u32 {
        let entry = self.counts.entry(name.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Occurrences recorded so far without counting a new one.
    pub fn occurrences(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }
}
