//! Per-resource check functions.
//!
//! Each check takes a normalized record plus its parameter struct and
//! returns one `CheckOutcome`. Rules within a check combine by worst state
//! over Ok, Warn and Crit; Unknown is reserved for absent or unreadable
//! data and is never produced for a record that made it here.

pub mod backup_objects;
pub mod jobs;
pub mod license;
pub mod proxies;
pub mod repositories;
pub mod restore_points;
pub mod scaleout;
pub mod server;
pub mod tasks;
