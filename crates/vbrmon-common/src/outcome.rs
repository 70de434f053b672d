use crate::state::CheckState;
use serde::{Deserialize, Serialize};

/// A named numeric measurement attached to a check outcome, for trending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The evaluation result for one monitored resource instance.
///
/// This tuple of (service identity, state, one-line summary, measurements)
/// is the sole contract exposed to the hosting monitoring runtime; the
/// runtime owns scheduling, persistence, and alerting on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub service: String,
    pub state: CheckState,
    pub summary: String,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    /// Secondary lines shown only in detail views, never in the summary.
    #[serde(default)]
    pub details: Vec<String>,
}

impl CheckOutcome {
    pub fn new(service: impl Into<String>, state: CheckState, summary: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            state,
            summary: summary.into(),
            measurements: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Outcome for a service whose data could not be determined. "No data"
    /// always becomes an explicit Unknown, never an absent service.
    pub fn no_data(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(service, CheckState::Unknown, reason)
    }

    pub fn with_measurement(mut self, name: impl Into<String>, value: f64) -> Self {
        self.measurements.push(Measurement::new(name, value));
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}
