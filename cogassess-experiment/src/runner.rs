//! Generic timed-trial engine shared by every sub-test.
//!
//! Nothing here waits. Each call compares the stored trial anchor against the
//! supplied `now`, so the same call may be repeated any number of times for
//! the same logical step without changing the outcome.

use std::time::Duration;

use cogassess_core::{Choice, Response, ResponseMode, Summary, SubTestKind, TrialOutcome, TrialPhase};
use cogassess_timing::Timestamp;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SubTestConfig;
use crate::error::{AssessmentError, Result};
use crate::subtest::SubTest;
use crate::trial_set::sample_trial_order;
use crate::view::{OptionView, TrialView};

/// Progress of one sub-test run.
///
/// `outcomes.len() == current_index` holds after every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTestState {
    pub kind: SubTestKind,
    pub trial_order: Vec<usize>,
    pub current_index: usize,
    pub trial_started_at: Option<Timestamp>,
    pub current_options: Option<Vec<Choice>>,
    pub outcomes: Vec<TrialOutcome>,
    pub results_shown_at: Option<Timestamp>,
}

impl SubTestState {
    /// Samples the trial order. This is the only place it is drawn.
    pub fn new<S: SubTest, R: Rng + ?Sized>(
        test: &S,
        config: &SubTestConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let trial_order =
            sample_trial_order(rng, test.kind(), test.pool().len(), config.total_questions)?;
        Ok(Self {
            kind: test.kind(),
            trial_order,
            current_index: 0,
            trial_started_at: None,
            current_options: None,
            outcomes: Vec::new(),
            results_shown_at: None,
        })
    }

    pub fn total_questions(&self) -> usize {
        self.trial_order.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.total_questions()
    }

    pub fn trial_phase(&self) -> TrialPhase {
        if self.is_exhausted() {
            TrialPhase::Recorded
        } else if self.trial_started_at.is_some() {
            TrialPhase::AwaitingResponse
        } else {
            TrialPhase::NotStarted
        }
    }

    /// Pool index of the trial under the cursor.
    pub fn current_trial(&self) -> Option<usize> {
        self.trial_order.get(self.current_index).copied()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_outcomes(self.kind, &self.outcomes, self.total_questions())
    }

    fn elapsed(&self, now: Timestamp) -> Option<Duration> {
        self.trial_started_at
            .map(|start| Duration::from_nanos(now.saturating_sub(start)))
    }

    fn record(&mut self, outcome: TrialOutcome) {
        debug!(
            subtest = %self.kind,
            trial = self.current_index + 1,
            correct = outcome.correct,
            timed_out = outcome.timed_out,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "trial recorded"
        );
        self.outcomes.push(outcome);
        self.current_index += 1;
        self.trial_started_at = None;
        self.current_options = None;
    }
}

/// Drives a [`SubTestState`] with the content of one [`SubTest`].
pub struct TrialRunner<'a, S: SubTest> {
    test: &'a S,
    config: &'a SubTestConfig,
}

impl<'a, S: SubTest> TrialRunner<'a, S> {
    pub fn new(test: &'a S, config: &'a SubTestConfig) -> Self {
        Self { test, config }
    }

    pub fn deadline_passed(&self, state: &SubTestState, now: Timestamp) -> bool {
        !state.is_exhausted()
            && state
                .elapsed(now)
                .is_some_and(|e| e >= self.config.question_time_limit())
    }

    /// Records a timeout if the current trial's deadline has passed.
    pub fn expire(&self, state: &mut SubTestState, now: Timestamp) -> Option<TrialOutcome> {
        if !self.deadline_passed(state, now) {
            return None;
        }
        let outcome = TrialOutcome::timed_out(state.elapsed(now)?);
        state.record(outcome.clone());
        Some(outcome)
    }

    /// Starts the current trial on its first observation and builds its options
    /// exactly once. Later calls within the same trial reuse both.
    pub fn present<R: Rng + ?Sized>(
        &self,
        state: &mut SubTestState,
        now: Timestamp,
        rng: &mut R,
    ) -> Option<TrialView> {
        let trial = &self.test.pool()[state.current_trial()?];
        let question = state.current_index + 1;
        let start = *state.trial_started_at.get_or_insert_with(|| {
            debug!(
                subtest = %self.test.kind(),
                trial = question,
                stimulus = %self.test.stimulus(trial),
                "trial presented"
            );
            now
        });
        let total_questions = state.total_questions();
        let mode = self.test.response_mode();

        let options = state.current_options.get_or_insert_with(|| {
            let mut options = self.test.present_choices(trial);
            options.shuffle(rng);
            options
        });
        let options = match mode {
            ResponseMode::Select => options
                .iter()
                .zip('A'..='Z')
                .map(|(c, key)| OptionView {
                    key,
                    content: c.content.clone(),
                })
                .collect(),
            ResponseMode::Entry => Vec::new(),
        };

        let limit = self.config.question_time_limit();
        let elapsed = Duration::from_nanos(now.saturating_sub(start));
        let remaining = limit.saturating_sub(elapsed);

        Some(TrialView {
            subtest: self.test.kind(),
            title: self.test.kind().title(),
            question,
            total_questions,
            stimulus: self.test.stimulus(trial),
            response_mode: mode,
            options,
            remaining_fraction: (remaining.as_secs_f64() / limit.as_secs_f64()).clamp(0.0, 1.0),
            remaining_secs: remaining.as_secs_f64(),
        })
    }

    /// Records a response to the presented trial. An expired deadline wins over
    /// the response and is recorded as a timeout. A response naming any question
    /// other than the presented one is rejected without touching `state`.
    pub fn respond(
        &self,
        state: &mut SubTestState,
        now: Timestamp,
        response: &Response,
    ) -> Result<TrialOutcome> {
        let stale = AssessmentError::StaleResponse {
            subtest: state.kind,
            question: response.question(),
        };
        match state.trial_phase() {
            TrialPhase::Recorded => return Err(stale),
            TrialPhase::NotStarted => return Err(AssessmentError::TrialNotPresented),
            TrialPhase::AwaitingResponse => {}
        }
        if response.question() != state.current_index + 1 {
            return Err(stale);
        }
        if let Some(outcome) = self.expire(state, now) {
            return Ok(outcome);
        }

        let mode = self.test.response_mode();
        if response.mode() != mode {
            return Err(AssessmentError::InvalidResponse(format!(
                "{} expects {:?} responses",
                state.kind, mode
            )));
        }
        let options = state
            .current_options
            .as_ref()
            .ok_or(AssessmentError::TrialNotPresented)?;
        let correct = match response {
            Response::Select { option, .. } => {
                options
                    .get(*option)
                    .ok_or_else(|| {
                        AssessmentError::InvalidResponse(format!(
                            "option {option} out of range (0..{})",
                            options.len()
                        ))
                    })?
                    .correct
            }
            Response::Entry { value, .. } => options
                .iter()
                .find(|c| c.content.accepts(value))
                .is_some_and(|c| c.correct),
        };

        let elapsed = state.elapsed(now).unwrap_or_default();
        let outcome = TrialOutcome::answered(correct, elapsed);
        state.record(outcome.clone());
        Ok(outcome)
    }
}
