/// Stat-block and journal text import core
///
/// Library for reconstructing structured actor records from freeform
/// stat-block text (PDF copy-paste and Homebrewery markdown dialects) and
/// for outlining flat chapter text into journal trees.
pub mod actor;
pub mod classify;
pub mod error;
pub mod formula;
pub mod journal;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
