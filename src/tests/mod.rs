//! Crate-level test modules.

mod property;
