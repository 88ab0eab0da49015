use cogassess_core::{Demographics, Stage, SubTestKind, Summary};
use cogassess_timing::Timestamp;
use serde::{Deserialize, Serialize};

use crate::runner::SubTestState;

/// The one record a participant's session mutates, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub stage: Stage,
    pub demographics: Option<Demographics>,
    pub instructions_started_at: Option<Timestamp>,
    pub math: Option<SubTestState>,
    pub stroop: Option<SubTestState>,
    pub mental_rotation: Option<SubTestState>,
    pub summaries: Vec<Summary>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subtest(&self, kind: SubTestKind) -> Option<&SubTestState> {
        match kind {
            SubTestKind::Math => self.math.as_ref(),
            SubTestKind::Stroop => self.stroop.as_ref(),
            SubTestKind::MentalRotation => self.mental_rotation.as_ref(),
        }
    }

    pub fn subtest_slot(&mut self, kind: SubTestKind) -> &mut Option<SubTestState> {
        match kind {
            SubTestKind::Math => &mut self.math,
            SubTestKind::Stroop => &mut self.stroop,
            SubTestKind::MentalRotation => &mut self.mental_rotation,
        }
    }

    pub fn summary(&self, kind: SubTestKind) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.subtest == kind)
    }

    /// Stores the summary of an exhausted sub-test, once.
    pub(crate) fn publish_summary(&mut self, kind: SubTestKind) -> Option<&Summary> {
        if self.summary(kind).is_none() {
            let state = self.subtest(kind).filter(|s| s.is_exhausted())?;
            let summary = state.summary();
            self.summaries.push(summary);
        }
        self.summary(kind)
    }
}
