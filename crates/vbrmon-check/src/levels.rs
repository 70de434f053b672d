use serde::Deserialize;
use vbrmon_common::state::CheckState;

/// Which side of the bounds is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Alert when the value is too high (age, usage percent).
    Upper,
    /// Alert when the value is too low (free space, restore point count).
    Lower,
}

/// A (warn, crit) threshold pair. Bounds are inclusive and crit is checked
/// first, so crit wins even when both bounds are crossed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Levels {
    pub warn: f64,
    pub crit: f64,
}

impl Levels {
    pub fn new(warn: f64, crit: f64) -> Self {
        Self { warn, crit }
    }

    pub fn evaluate(&self, value: f64, direction: Direction) -> CheckState {
        match direction {
            Direction::Upper => {
                if value >= self.crit {
                    CheckState::Crit
                } else if value >= self.warn {
                    CheckState::Warn
                } else {
                    CheckState::Ok
                }
            }
            Direction::Lower => {
                if value <= self.crit {
                    CheckState::Crit
                } else if value <= self.warn {
                    CheckState::Warn
                } else {
                    CheckState::Ok
                }
            }
        }
    }

    /// Evaluate and render a "label: value (warn/crit at w/c)" fragment for
    /// the check summary, with `render` applied to all three numbers.
    pub fn check(
        &self,
        value: f64,
        direction: Direction,
        label: &str,
        render: impl Fn(f64) -> String,
    ) -> (CheckState, String) {
        let state = self.evaluate(value, direction);
        let side = match direction {
            Direction::Upper => "at",
            Direction::Lower => "below",
        };
        let text = format!(
            "{label}: {} (warn/crit {side} {}/{})",
            render(value),
            render(self.warn),
            render(self.crit)
        );
        (state, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bounds_are_inclusive_and_crit_first() {
        let levels = Levels::new(80.0, 90.0);
        assert_eq!(levels.evaluate(90.0, Direction::Upper), CheckState::Crit);
        assert_eq!(levels.evaluate(95.0, Direction::Upper), CheckState::Crit);
        assert_eq!(levels.evaluate(80.0, Direction::Upper), CheckState::Warn);
        assert_eq!(levels.evaluate(89.9, Direction::Upper), CheckState::Warn);
        assert_eq!(levels.evaluate(79.0, Direction::Upper), CheckState::Ok);
    }

    #[test]
    fn lower_bounds_mirror_upper() {
        let levels = Levels::new(30.0, 7.0);
        assert_eq!(levels.evaluate(7.0, Direction::Lower), CheckState::Crit);
        assert_eq!(levels.evaluate(2.0, Direction::Lower), CheckState::Crit);
        assert_eq!(levels.evaluate(30.0, Direction::Lower), CheckState::Warn);
        assert_eq!(levels.evaluate(8.0, Direction::Lower), CheckState::Warn);
        assert_eq!(levels.evaluate(31.0, Direction::Lower), CheckState::Ok);
    }

    #[test]
    fn check_renders_threshold_context() {
        let levels = Levels::new(80.0, 90.0);
        let (state, text) = levels.check(90.0, Direction::Upper, "Used", |v| format!("{v:.1}%"));
        assert_eq!(state, CheckState::Crit);
        assert_eq!(text, "Used: 90.0% (warn/crit at 80.0%/90.0%)");
    }
}
