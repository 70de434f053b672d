use serde::{Deserialize, Serialize};

/// Monitoring state of a single check, ordered from best to worst.
///
/// # Examples
///
/// ```
/// use vbrmon_common::state::CheckState;
///
/// let s: CheckState = "warn".parse().unwrap();
/// assert_eq!(s, CheckState::Warn);
/// assert_eq!(CheckState::Ok.worst(CheckState::Crit), CheckState::Crit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Warn,
    Crit,
    /// Record absent or unparseable. Never produced by combining
    /// severities; [`CheckState::worst`] only operates over Ok/Warn/Crit.
    Unknown,
}

impl CheckState {
    /// Pairwise worst-state combinator over {Ok, Warn, Crit}.
    pub fn worst(self, other: CheckState) -> CheckState {
        debug_assert!(self != CheckState::Unknown && other != CheckState::Unknown);
        self.max(other)
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Ok => write!(f, "OK"),
            CheckState::Warn => write!(f, "WARN"),
            CheckState::Crit => write!(f, "CRIT"),
            CheckState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for CheckState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(CheckState::Ok),
            "warn" | "warning" => Ok(CheckState::Warn),
            "crit" | "critical" => Ok(CheckState::Crit),
            "unknown" => Ok(CheckState::Unknown),
            _ => Err(format!("unknown check state: {s}")),
        }
    }
}
