pub mod models;
pub mod outcome;
pub mod state;
pub mod units;
