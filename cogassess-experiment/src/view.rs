use cogassess_core::{ChoiceContent, Demographics, ResponseMode, Stage, Stimulus, SubTestKind, Summary};
use serde::Serialize;

/// Everything a front end needs to draw the active stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    #[serde(flatten)]
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Consent,
    Instructions {
        tasks: Vec<&'static str>,
        starts_in_secs: f64,
    },
    Trial(TrialView),
    Results {
        summary: Summary,
        advances_in_secs: f64,
    },
    Final {
        summaries: Vec<Summary>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialView {
    pub subtest: SubTestKind,
    pub title: &'static str,
    /// 1-based.
    pub question: usize,
    pub total_questions: usize,
    pub stimulus: Stimulus,
    pub response_mode: ResponseMode,
    /// Empty for typed-answer sub-tests.
    pub options: Vec<OptionView>,
    /// `(limit - elapsed) / limit`, clamped to `[0, 1]`.
    pub remaining_fraction: f64,
    pub remaining_secs: f64,
}

/// A presented option without its correctness tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub key: char,
    pub content: ChoiceContent,
}

/// Final export record for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub stage: Stage,
    pub demographics: Option<Demographics>,
    pub summaries: Vec<Summary>,
}
