//! Threshold and state evaluation for VBR monitoring.
//!
//! Pure functions over the normalized records in `vbrmon-common`: numeric
//! warn/crit bounds, enum-to-state maps with user overrides, and one check
//! per monitored resource kind. Nothing in this crate performs I/O, so
//! every rule is testable with plain in-memory records.

pub mod checks;
pub mod enum_state;
pub mod levels;


pub use enum_state::EnumStateRule;
pub use levels::{Direction, Levels};
