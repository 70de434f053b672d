use std::collections::HashMap;
use vbrmon_common::state::CheckState;

/// Maps an enum-valued API field (job result, extent status, malware
/// verdict) to a check state.
///
/// Built from a per-domain default table merged with user overrides; an
/// override replaces the default for its key and every other default
/// survives. Values absent from both maps are `Ok`: an API revision that
/// introduces a new enum value must not fail closed.
#[derive(Debug, Clone)]
pub struct EnumStateRule {
    map: HashMap<String, CheckState>,
}

impl EnumStateRule {
    pub fn new(defaults: &[(&str, CheckState)]) -> Self {
        Self {
            map: defaults
                .iter()
                .map(|(value, state)| (value.to_string(), *state))
                .collect(),
        }
    }

    /// Merge user overrides into the default table. Merging an empty map
    /// is a no-op.
    pub fn with_overrides(mut self, overrides: &HashMap<String, CheckState>) -> Self {
        for (value, state) in overrides {
            self.map.insert(value.clone(), *state);
        }
        self
    }

    pub fn state_for(&self, value: &str) -> CheckState {
        self.map.get(value).copied().unwrap_or(CheckState::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> EnumStateRule {
        EnumStateRule::new(&[
            ("Success", CheckState::Ok),
            ("Warning", CheckState::Warn),
            ("Failed", CheckState::Crit),
        ])
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let rule = rule();
        assert_eq!(rule.state_for("Success"), CheckState::Ok);
        assert_eq!(rule.state_for("Failed"), CheckState::Crit);
    }

    #[test]
    fn override_wins_and_other_defaults_survive() {
        let mut overrides = HashMap::new();
        overrides.insert("Warning".to_string(), CheckState::Crit);
        let rule = rule().with_overrides(&overrides);

        assert_eq!(rule.state_for("Warning"), CheckState::Crit);
        assert_eq!(rule.state_for("Success"), CheckState::Ok);
        assert_eq!(rule.state_for("Failed"), CheckState::Crit);
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let plain = rule();
        let merged = rule().with_overrides(&HashMap::new());
        for value in ["Success", "Warning", "Failed", "SomethingNew"] {
            assert_eq!(plain.state_for(value), merged.state_for(value));
        }
    }

    #[test]
    fn unmapped_value_is_ok() {
        assert_eq!(rule().state_for("RetryScheduled"), CheckState::Ok);
    }
}
