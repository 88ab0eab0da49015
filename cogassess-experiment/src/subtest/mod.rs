//! Sub-test adapters.
//!
//! An adapter only supplies content: the trial pool, the stimulus for a trial,
//! and the options to present. Timing, randomization, recording and scoring are
//! done by [`crate::runner::TrialRunner`] and are identical for every sub-test.

mod math;
mod mental_rotation;
mod stroop;

pub use math::{MathTest, MathTrial};
pub use mental_rotation::{MentalRotationTest, MentalRotationTrial};
pub use stroop::{StroopTest, StroopTrial};

use cogassess_core::{Choice, ResponseMode, Stimulus, SubTestKind};

pub trait SubTest {
    type Trial;

    fn kind(&self) -> SubTestKind;
    fn pool(&self) -> &[Self::Trial];
    fn stimulus(&self, trial: &Self::Trial) -> Stimulus;

    /// Options for a trial, each tagged correct or incorrect. Order does not
    /// matter: the runner shuffles them once per trial.
    fn present_choices(&self, trial: &Self::Trial) -> Vec<Choice>;

    /// Typed answers are matched with [`cogassess_core::ChoiceContent::accepts`].
    fn response_mode(&self) -> ResponseMode {
        ResponseMode::Select
    }
}
