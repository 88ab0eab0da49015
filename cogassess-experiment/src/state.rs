use std::time::Duration;

use cogassess_core::{ConsentForm, Phase, Response, Stage, SubTestKind, Summary};
use cogassess_timing::{Clock, Timestamp};
use rand::Rng;
use tracing::{debug, info, warn};

use super::config::{SessionConfig, SubTestConfig};
use super::error::{AssessmentError, Result};
use super::runner::{SubTestState, TrialRunner};
use super::session::SessionRecord;
use super::subtest::{MathTest, MentalRotationTest, StroopTest, SubTest};
use super::view::{Screen, SessionReport, StageView};

const TASKS: [&str; 3] = [
    "Math Speed Test: solve arithmetic questions quickly and accurately.",
    "Stroop Test: identify the color of the word, not the word itself.",
    "Mental Rotation Task: select the correctly rotated image.",
];

#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentEvent {
    Start(ConsentForm),
    Respond(Response),
    TrialTimeout(SubTestKind),
    PhaseComplete,
}

/// Builds a [`TrialRunner`] for `$kind` and evaluates `$body` with it.
macro_rules! with_runner {
    ($machine:ident, $kind:expr, $runner:ident => $body:expr) => {
        match $kind {
            SubTestKind::Math => {
                let $runner = TrialRunner::new(&$machine.math, &$machine.config.math);
                $body
            }
            SubTestKind::Stroop => {
                let $runner = TrialRunner::new(&$machine.stroop, &$machine.config.stroop);
                $body
            }
            SubTestKind::MentalRotation => {
                let $runner =
                    TrialRunner::new(&$machine.mental_rotation, &$machine.config.mental_rotation);
                $body
            }
        }
    };
}

/// Sequences consent → instructions → math → stroop → mental → final over a
/// single [`SessionRecord`].
///
/// Every entry point may be called repeatedly from any intermediate state;
/// time-gated transitions fire on the first call that observes the gate open.
pub struct AssessmentStateMachine<T, R>
where
    T: Clock,
    R: Rng,
{
    pub config: SessionConfig,
    pub timer: T,
    pub rng: R,
    pub record: SessionRecord,
    math: MathTest,
    stroop: StroopTest,
    mental_rotation: MentalRotationTest,
}

impl<T, R> AssessmentStateMachine<T, R>
where
    T: Clock,
    R: Rng,
{
    pub fn new(config: SessionConfig, timer: T, rng: R) -> Result<Self> {
        let mental_rotation =
            MentalRotationTest::from_asset_root(&config.asset_root, config.mental_rotation_sets);
        Self::with_subtests(
            config,
            timer,
            rng,
            MathTest::standard(),
            StroopTest::standard(),
            mental_rotation,
        )
    }

    /// Fails fast if any pool is smaller than its trial budget.
    pub fn with_subtests(
        config: SessionConfig,
        timer: T,
        rng: R,
        math: MathTest,
        stroop: StroopTest,
        mental_rotation: MentalRotationTest,
    ) -> Result<Self> {
        config.validate()?;
        check_pool(&math, &config.math)?;
        check_pool(&stroop, &config.stroop)?;
        check_pool(&mental_rotation, &config.mental_rotation)?;
        Ok(Self {
            config,
            timer,
            rng,
            record: SessionRecord::new(),
            math,
            stroop,
            mental_rotation,
        })
    }

    pub fn stage(&self) -> Stage {
        self.record.stage
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.record.summaries
    }

    pub fn is_complete(&self) -> bool {
        self.record.stage.is_terminal()
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            stage: self.record.stage,
            demographics: self.record.demographics.clone(),
            summaries: self.record.summaries.clone(),
        }
    }

    /// Inspects deadlines and gates without mutating anything.
    pub fn update(&self) -> Vec<AssessmentEvent> {
        let now = self.timer.now();
        let mut events = Vec::new();

        if let Some(kind) = self.record.stage.subtest() {
            let Some(state) = self.record.subtest(kind) else {
                return events;
            };
            if with_runner!(self, kind, runner => runner.deadline_passed(state, now)) {
                events.push(AssessmentEvent::TrialTimeout(kind));
                return events;
            }
        }
        if self.phase_gate_open(now) {
            events.push(AssessmentEvent::PhaseComplete);
        }
        events
    }

    /// Returns whether the event changed the session.
    pub fn handle_event(&mut self, event: AssessmentEvent) -> Result<bool> {
        let now = self.timer.now();
        match (self.record.stage, event) {
            (Stage::Consent, AssessmentEvent::Start(form)) => {
                let demographics = form.validate().inspect_err(|e| {
                    warn!(reason = %e, "consent rejected");
                })?;
                info!("consent given");
                self.record.demographics = Some(demographics);
                self.record.instructions_started_at = Some(now);
                self.advance_stage()
            }
            (stage, AssessmentEvent::Start(_)) => Err(AssessmentError::NotAccepting {
                stage,
                input: "a consent form",
            }),

            (stage, AssessmentEvent::Respond(response)) => {
                let Some(kind) = stage.subtest() else {
                    return Err(AssessmentError::NotAccepting {
                        stage,
                        input: "responses",
                    });
                };
                with_runner!(self, kind, runner => {
                    let state = self
                        .record
                        .subtest_slot(kind)
                        .as_mut()
                        .ok_or(AssessmentError::TrialNotPresented)?;
                    runner
                        .respond(state, now, &response)
                        .inspect_err(|e| warn!(subtest = %kind, error = %e, "response rejected"))?;
                });
                Ok(true)
            }

            (stage, AssessmentEvent::TrialTimeout(kind)) if stage.subtest() == Some(kind) => {
                let expired = with_runner!(self, kind, runner => {
                    self.record
                        .subtest_slot(kind)
                        .as_mut()
                        .and_then(|state| runner.expire(state, now))
                });
                Ok(expired.is_some())
            }

            (_, AssessmentEvent::PhaseComplete) if self.phase_gate_open(now) => self.advance_stage(),

            _ => Ok(false),
        }
    }

    /// One render tick: apply every due timeout and transition, then present
    /// the active stage.
    pub fn observe(&mut self) -> Result<StageView> {
        self.settle()?;
        self.present()
    }

    pub fn start(&mut self, form: ConsentForm) -> Result<StageView> {
        self.settle()?;
        self.handle_event(AssessmentEvent::Start(form))?;
        self.observe()
    }

    /// A response that arrives after its trial's deadline is discarded; the
    /// trial is recorded as a timeout instead.
    pub fn respond(&mut self, response: Response) -> Result<StageView> {
        let before = self.progress();
        self.settle()?;
        if self.progress() != before {
            debug!(stage = %self.record.stage, "late response discarded");
            return self.present();
        }
        self.handle_event(AssessmentEvent::Respond(response))?;
        self.observe()
    }

    fn settle(&mut self) -> Result<()> {
        loop {
            let events = self.update();
            if events.is_empty() {
                return Ok(());
            }
            for event in events {
                self.handle_event(event)?;
            }
        }
    }

    fn progress(&self) -> (Stage, Option<usize>) {
        let index = self
            .record
            .stage
            .subtest()
            .and_then(|kind| self.record.subtest(kind))
            .map(|s| s.current_index);
        (self.record.stage, index)
    }

    fn phase_gate_open(&self, now: Timestamp) -> bool {
        match self.record.stage {
            Stage::Instructions => self
                .record
                .instructions_started_at
                .is_some_and(|start| since(now, start) >= self.config.instructions_delay()),
            stage => {
                let Some(kind) = stage.subtest() else {
                    return false;
                };
                let Some(state) = self.record.subtest(kind) else {
                    return false;
                };
                if !state.is_exhausted() {
                    return false;
                }
                match self.config.subtest(kind).results_hold() {
                    None => true,
                    Some(hold) => state
                        .results_shown_at
                        .is_some_and(|shown| since(now, shown) >= hold),
                }
            }
        }
    }

    fn advance_stage(&mut self) -> Result<bool> {
        let from = self.record.stage;
        let Some(next) = from.next() else {
            return Ok(false);
        };
        if let Some(kind) = from.subtest() {
            if let Some(summary) = self.record.publish_summary(kind) {
                info!(
                    subtest = %kind,
                    accuracy = summary.accuracy,
                    avg_reaction_time_secs = summary.avg_reaction_time_secs,
                    timed_out = summary.timed_out_count,
                    "sub-test complete"
                );
            }
        }
        if let Some(kind) = next.subtest() {
            self.init_subtest(kind)?;
        }
        self.record.stage = next;
        info!(from = %from, to = %next, "stage advanced");
        Ok(true)
    }

    /// Constructs the sub-test state unless it already exists.
    fn init_subtest(&mut self, kind: SubTestKind) -> Result<()> {
        if self.record.subtest(kind).is_some() {
            return Ok(());
        }
        let state = match kind {
            SubTestKind::Math => SubTestState::new(&self.math, &self.config.math, &mut self.rng)?,
            SubTestKind::Stroop => {
                SubTestState::new(&self.stroop, &self.config.stroop, &mut self.rng)?
            }
            SubTestKind::MentalRotation => SubTestState::new(
                &self.mental_rotation,
                &self.config.mental_rotation,
                &mut self.rng,
            )?,
        };
        debug!(subtest = %kind, order = ?state.trial_order, "trial order drawn");
        *self.record.subtest_slot(kind) = Some(state);
        Ok(())
    }

    fn present(&mut self) -> Result<StageView> {
        let now = self.timer.now();
        let stage = self.record.stage;
        let screen = match (stage, stage.subtest()) {
            (_, Some(kind)) => self.present_subtest(kind, now)?,
            (Stage::Instructions, None) => {
                let elapsed = self
                    .record
                    .instructions_started_at
                    .map_or(Duration::ZERO, |start| since(now, start));
                Screen::Instructions {
                    tasks: TASKS.to_vec(),
                    starts_in_secs: self
                        .config
                        .instructions_delay()
                        .saturating_sub(elapsed)
                        .as_secs_f64(),
                }
            }
            (Stage::Final, None) => Screen::Final {
                summaries: self.record.summaries.clone(),
            },
            _ => Screen::Consent,
        };
        Ok(StageView { stage, screen })
    }

    fn present_subtest(&mut self, kind: SubTestKind, now: Timestamp) -> Result<Screen> {
        self.init_subtest(kind)?;
        let trial = with_runner!(self, kind, runner => {
            self.record
                .subtest_slot(kind)
                .as_mut()
                .and_then(|state| runner.present(state, now, &mut self.rng))
        });
        if let Some(view) = trial {
            return Ok(Screen::Trial(view));
        }

        let hold = self.config.subtest(kind).results_hold();
        let shown_at = match self.record.subtest_slot(kind) {
            Some(state) => *state.results_shown_at.get_or_insert(now),
            None => now,
        };
        let summary = self
            .record
            .publish_summary(kind)
            .cloned()
            .ok_or(AssessmentError::TrialNotPresented)?;
        Ok(Screen::Results {
            summary,
            advances_in_secs: hold
                .map_or(Duration::ZERO, |h| h.saturating_sub(since(now, shown_at)))
                .as_secs_f64(),
        })
    }
}

fn check_pool<S: SubTest>(test: &S, config: &SubTestConfig) -> Result<()> {
    if test.pool().len() < config.total_questions {
        return Err(AssessmentError::InsufficientPool {
            subtest: test.kind(),
            pool: test.pool().len(),
            required: config.total_questions,
        });
    }
    Ok(())
}

fn since(now: Timestamp, anchor: Timestamp) -> Duration {
    Duration::from_nanos(now.saturating_sub(anchor))
}
