//! Property-based tests for the import parsers.
//!
//! These verify invariants that must hold for all inputs, rather than
//! specific fixtures:
//!
//! - `ability_layout_props`: the three plain-text ability layouts agree on
//!   the same scores, and the modifier always follows the floor law
//! - `formula_props`: dice formula ranges bracket correctly and plain
//!   values collapse to a degenerate range
//! - `feature_splitter_props`: description normalization is idempotent and
//!   hyphenated line wraps rejoin losslessly
//! - `outline_props`: depth guessing stays capped and outline children get
//!   consecutive sort values

mod ability_layout_props;
mod feature_splitter_props;
mod formula_props;
mod outline_props;
