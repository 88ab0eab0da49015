use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines assessment stages and their behavior
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    fn subtest(&self) -> Option<SubTestKind> {
        None
    }

    fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Consent,
    Instructions,
    Math,
    Stroop,
    Mental,
    Final,
}

impl Phase for Stage {
    fn next(&self) -> Option<Self> {
        use Stage::*;
        Some(match self {
            Consent => Instructions,
            Instructions => Math,
            Math => Stroop,
            Stroop => Mental,
            Mental => Final,
            Final => return None,
        })
    }

    fn subtest(&self) -> Option<SubTestKind> {
        match self {
            Stage::Math => Some(SubTestKind::Math),
            Stage::Stroop => Some(SubTestKind::Stroop),
            Stage::Mental => Some(SubTestKind::MentalRotation),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Consent => "consent",
            Stage::Instructions => "instructions",
            Stage::Math => "math",
            Stage::Stroop => "stroop",
            Stage::Mental => "mental",
            Stage::Final => "final",
        };
        f.write_str(name)
    }
}

/// The three timed cognitive sub-tests, in administration order.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubTestKind {
    Math,
    Stroop,
    MentalRotation,
}

impl SubTestKind {
    pub const ALL: [SubTestKind; 3] = [
        SubTestKind::Math,
        SubTestKind::Stroop,
        SubTestKind::MentalRotation,
    ];

    pub fn stage(self) -> Stage {
        match self {
            SubTestKind::Math => Stage::Math,
            SubTestKind::Stroop => Stage::Stroop,
            SubTestKind::MentalRotation => Stage::Mental,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SubTestKind::Math => "Math Speed Test",
            SubTestKind::Stroop => "Stroop Test",
            SubTestKind::MentalRotation => "Mental Rotation Task",
        }
    }
}

impl fmt::Display for SubTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubTestKind::Math => "math",
            SubTestKind::Stroop => "stroop",
            SubTestKind::MentalRotation => "mental_rotation",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_run_in_order_and_end_at_final() {
        let mut stage = Stage::default();
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Consent,
                Stage::Instructions,
                Stage::Math,
                Stage::Stroop,
                Stage::Mental,
                Stage::Final
            ]
        );
        assert!(Stage::Final.is_terminal());
        assert!(!Stage::Mental.is_terminal());
    }

    #[test]
    fn subtest_stages_round_trip() {
        for kind in SubTestKind::ALL {
            assert_eq!(kind.stage().subtest(), Some(kind));
        }
        assert_eq!(Stage::Instructions.subtest(), None);
    }
}
