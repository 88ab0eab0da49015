use std::path::Path;
use std::time::Duration;

use cogassess_core::SubTestKind;
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Timing and budget for one timed sub-test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubTestConfig {
    pub total_questions: usize,
    pub question_time_limit_ms: u64,
    /// How long the results screen stays up before the next stage. `None`
    /// advances as soon as the trial budget is exhausted.
    pub results_hold_ms: Option<u64>,
}

impl SubTestConfig {
    pub fn question_time_limit(&self) -> Duration {
        Duration::from_millis(self.question_time_limit_ms)
    }

    pub fn results_hold(&self) -> Option<Duration> {
        self.results_hold_ms.map(Duration::from_millis)
    }

    fn math() -> Self {
        Self {
            total_questions: 10,
            question_time_limit_ms: 15_000,
            results_hold_ms: None,
        }
    }

    fn stroop() -> Self {
        Self {
            total_questions: 15,
            question_time_limit_ms: 5_000,
            results_hold_ms: None,
        }
    }

    fn mental_rotation() -> Self {
        Self {
            total_questions: 15,
            question_time_limit_ms: 10_000,
            results_hold_ms: Some(5_000),
        }
    }
}

impl Default for SubTestConfig {
    fn default() -> Self {
        Self::mental_rotation()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub instructions_delay_ms: u64,
    /// Cadence of passive observations; bounds timeout detection latency.
    pub tick_interval_ms: u64,
    pub asset_root: String,
    pub mental_rotation_sets: usize,
    pub math: SubTestConfig,
    pub stroop: SubTestConfig,
    pub mental_rotation: SubTestConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            instructions_delay_ms: 5_000,
            tick_interval_ms: 500,
            asset_root: "images".to_string(),
            mental_rotation_sets: 15,
            math: SubTestConfig::math(),
            stroop: SubTestConfig::stroop(),
            mental_rotation: SubTestConfig::mental_rotation(),
        }
    }
}

impl SessionConfig {
    /// Loads a config without validating it, so overrides can still be
    /// applied. Call [`SessionConfig::validate`] once they are.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AssessmentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AssessmentError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AssessmentError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn instructions_delay(&self) -> Duration {
        Duration::from_millis(self.instructions_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn subtest(&self, kind: SubTestKind) -> &SubTestConfig {
        match kind {
            SubTestKind::Math => &self.math,
            SubTestKind::Stroop => &self.stroop,
            SubTestKind::MentalRotation => &self.mental_rotation,
        }
    }

    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.tick_interval_ms == 0 {
            return Err(AssessmentError::Config(
                "tick_interval_ms must be positive".into(),
            ));
        }
        for kind in SubTestKind::ALL {
            let sub = self.subtest(kind);
            if sub.total_questions == 0 {
                return Err(AssessmentError::Config(format!(
                    "{kind}: total_questions must be positive"
                )));
            }
            if sub.question_time_limit_ms == 0 {
                return Err(AssessmentError::Config(format!(
                    "{kind}: question_time_limit_ms must be positive"
                )));
            }
            if self.tick_interval_ms > sub.question_time_limit_ms {
                return Err(AssessmentError::Config(format!(
                    "{kind}: tick interval {}ms exceeds the {}ms question limit",
                    self.tick_interval_ms, sub.question_time_limit_ms
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        config.validate().unwrap();
        assert_eq!(config.mental_rotation.total_questions, 15);
        assert_eq!(
            config.mental_rotation.question_time_limit(),
            Duration::from_secs(10)
        );
        assert_eq!(config.instructions_delay(), Duration::from_secs(5));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"stroop": {"total_questions": 4}}"#).unwrap();
        assert_eq!(config.stroop.total_questions, 4);
        assert_eq!(config.math, SessionConfig::default().math);
        assert_eq!(config.tick_interval_ms, 500);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let mut config = SessionConfig::default();
        config.math.total_questions = 0;
        assert!(matches!(config.validate(), Err(AssessmentError::Config(_))));
    }

    #[test]
    fn tick_slower_than_deadline_is_rejected() {
        let mut config = SessionConfig::default();
        config.tick_interval_ms = 6_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loaded_config_can_be_fixed_before_validation() {
        let mut config = SessionConfig::from_json(r#"{"tick_interval_ms": 20000}"#).unwrap();
        assert!(config.validate().is_err());
        config.tick_interval_ms = 250;
        config.validate().unwrap();
    }

    #[test]
    fn missing_config_file_reports_its_path() {
        let err = SessionConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, AssessmentError::ConfigIo { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
