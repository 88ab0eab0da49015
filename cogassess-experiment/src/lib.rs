pub mod config;
pub mod error;
pub mod runner;
pub mod session;
pub mod state;
pub mod subtest;
pub mod trial_set;
pub mod view;

pub use config::{SessionConfig, SubTestConfig};
pub use error::AssessmentError;
pub use runner::{SubTestState, TrialRunner};
pub use session::SessionRecord;
pub use state::{AssessmentEvent, AssessmentStateMachine};
pub use subtest::{MathTest, MentalRotationTest, StroopTest, SubTest};
pub use trial_set::sample_trial_order;
pub use view::{OptionView, Screen, SessionReport, StageView, TrialView};
