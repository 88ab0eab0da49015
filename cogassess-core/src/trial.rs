use crate::stage::SubTestKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-trial lifecycle inside a timed sub-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    NotStarted,
    AwaitingResponse,
    Recorded,
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub correct: bool,
    #[serde(rename = "elapsed_secs", with = "secs_f64")]
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl TrialOutcome {
    pub fn answered(correct: bool, elapsed: Duration) -> Self {
        Self {
            correct,
            elapsed,
            timed_out: false,
        }
    }

    /// A timed-out trial is never correct.
    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            correct: false,
            elapsed,
            timed_out: true,
        }
    }
}

/// Aggregate result of one sub-test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub subtest: SubTestKind,
    pub accuracy: f64,
    pub avg_reaction_time_secs: f64,
    pub timed_out_count: usize,
    pub total_questions: usize,
}

impl Summary {
    /// Accuracy is relative to the trial budget, reaction time is the mean over
    /// every recorded outcome including timeouts.
    pub fn from_outcomes(
        subtest: SubTestKind,
        outcomes: &[TrialOutcome],
        total_questions: usize,
    ) -> Self {
        let correct = outcomes.iter().filter(|o| o.correct).count();
        let accuracy = if total_questions == 0 {
            0.0
        } else {
            100.0 * correct as f64 / total_questions as f64
        };
        let avg_reaction_time_secs = if outcomes.is_empty() {
            0.0
        } else {
            outcomes.iter().map(|o| o.elapsed.as_secs_f64()).sum::<f64>() / outcomes.len() as f64
        };
        Self {
            subtest,
            accuracy,
            avg_reaction_time_secs,
            timed_out_count: outcomes.iter().filter(|o| o.timed_out).count(),
            total_questions,
        }
    }
}

mod secs_f64 {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_over_mixed_outcomes() {
        let outcomes = vec![
            TrialOutcome::answered(true, Duration::from_secs_f64(2.0)),
            TrialOutcome::timed_out(Duration::from_secs_f64(10.0)),
            TrialOutcome::answered(true, Duration::from_secs_f64(3.0)),
        ];
        let s = Summary::from_outcomes(SubTestKind::MentalRotation, &outcomes, 3);
        assert!((s.accuracy - 66.7).abs() < 0.05);
        assert!((s.avg_reaction_time_secs - 5.0).abs() < 1e-9);
        assert_eq!(s.timed_out_count, 1);
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = Summary::from_outcomes(SubTestKind::Math, &[], 10);
        assert_eq!(s.accuracy, 0.0);
        assert_eq!(s.avg_reaction_time_secs, 0.0);
        assert_eq!(s.timed_out_count, 0);
    }

    #[test]
    fn timeout_constructor_is_never_correct() {
        let o = TrialOutcome::timed_out(Duration::from_secs(10));
        assert!(o.timed_out && !o.correct);
    }

    #[test]
    fn elapsed_serializes_as_seconds() {
        let o = TrialOutcome::answered(true, Duration::from_millis(1500));
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["elapsed_secs"], 1.5);
    }
}
