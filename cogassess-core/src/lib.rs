pub mod demographics;
pub mod stage;
pub mod stimulus;
pub mod trial;

pub use demographics::{ConsentError, ConsentForm, Demographics};
pub use stage::{Phase, Stage, SubTestKind};
pub use stimulus::{Choice, ChoiceContent, InkColor, Operator, Response, ResponseMode, Stimulus};
pub use trial::{Summary, TrialOutcome, TrialPhase};
