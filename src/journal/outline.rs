//! Heuristic text-to-tree outliner.
//!
//! Takes flat text copied out of a PDF chapter and guesses its structure:
//! short lines without bullets read as section titles, everything else as
//! content. The result is intentionally rough. It gives the user a tree to
//! rearrange rather than a single wall of text, and the heuristics favor
//! over-splitting (easy to merge by hand) over under-splitting.

use crate::classify::{is_heading_like, BULLET};
use crate::journal::{JournalNode, Note};

/// Title heuristic for outline folder lines, shared with [`guess_depth`].
pub fn is_folder_line(line: &str) -> bool {
    is_heading_like(line)
}

/// Deepest run of consecutive folder lines, capped at 3.
///
/// Outlines nest shallowly in practice; anything deeper is almost always
/// the heuristic misreading a run of short prose lines.
pub fn guess_depth(input: &str) -> usize {
    let mut max_depth = 0;
    let mut current = 0;
    for line in input.lines() {
        if is_folder_line(line) {
            current += 1;
            max_depth = max_depth.max(current);
        } else {
            current = 0;
        }
    }
    max_depth.min(3)
}

/// A title found mid-chunk: heading-like, bounded by non-heading neighbors,
/// and not introducing a bullet list.
fn valid_title(lines: &[&str], index: usize) -> bool {
    if index + 1 >= lines.len() {
        return false;
    }
    if !is_heading_like(lines[index]) || is_heading_like(lines[index + 1]) {
        return false;
    }
    if index > 0 && is_heading_like(lines[index - 1]) {
        return false;
    }
    !lines[index + 1].contains(BULLET)
}

fn note_for(line: &str) -> Note {
    let tag = if line.contains(BULLET) { "lu" } else { "p" };
    Note::new(line, tag)
}

/// Build a two-level journal tree from flat outline text.
///
/// Line 0 names the root. The rest splits into chunks on blank lines; a
/// chunk's heading-like first line starts a new child entry, as does any
/// [`valid_title`] line inside a chunk. Content lines become notes on the
/// current child (or on the root before the first title), tagged `lu` for
/// bullet lines and `p` otherwise. Children get incrementing sort values
/// in discovery order.
pub fn parse_outline(input: &str) -> JournalNode {
    let mut lines = input.lines();
    let name = lines.next().unwrap_or_default().trim();
    let mut root = JournalNode::titled(name, "h1");

    let mut current: Option<JournalNode> = None;
    let mut sort_value = 1;
    let mut start_child = |root: &mut JournalNode, current: &mut Option<JournalNode>, title: &str| {
        if let Some(done) = current.take() {
            root.children.push(done);
        }
        let mut child = JournalNode::titled(title, "h2");
        child.sort_value = Some(sort_value);
        sort_value += 1;
        *current = Some(child);
    };

    let rest: Vec<&str> = lines.collect();
    for chunk in rest.split(|line| line.trim().is_empty()) {
        let chunk: Vec<&str> = chunk.iter().map(|line| line.trim_end()).collect();
        for (index, line) in chunk.iter().enumerate() {
            let is_title = if index == 0 {
                is_heading_like(line)
            } else {
                valid_title(&chunk, index)
            };
            if is_title {
                start_child(&mut root, &mut current, line);
            } else {
                match current.as_mut() {
                    Some(child) => child.notes.push(note_for(line)),
                    None => root.notes.push(note_for(line)),
                }
            }
        }
    }
    if let Some(done) = current.take() {
        root.children.push(done);
    }
    root
}
