use cogassess_cache::{AssetId, intern_asset};
use cogassess_core::{Choice, ChoiceContent, Stimulus, SubTestKind};

use super::SubTest;

/// A target figure, its rotated copy, and a mirrored distractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentalRotationTrial {
    pub target: AssetId,
    pub correct: AssetId,
    pub distractor: AssetId,
}

#[derive(Debug, Clone)]
pub struct MentalRotationTest {
    pool: Vec<MentalRotationTrial>,
}

impl MentalRotationTest {
    pub fn new(pool: Vec<MentalRotationTrial>) -> Self {
        Self { pool }
    }

    /// `{root}/target{i}.png`, `{root}/correct{i}.png`, `{root}/wrong{i}.png`
    /// for `i` in `1..=sets`.
    pub fn from_asset_root(root: &str, sets: usize) -> Self {
        let root = root.trim_end_matches('/');
        let pool = (1..=sets)
            .map(|i| MentalRotationTrial {
                target: intern_asset(&format!("{root}/target{i}.png")),
                correct: intern_asset(&format!("{root}/correct{i}.png")),
                distractor: intern_asset(&format!("{root}/wrong{i}.png")),
            })
            .collect();
        Self { pool }
    }
}

impl SubTest for MentalRotationTest {
    type Trial = MentalRotationTrial;

    fn kind(&self) -> SubTestKind {
        SubTestKind::MentalRotation
    }

    fn pool(&self) -> &[MentalRotationTrial] {
        &self.pool
    }

    fn stimulus(&self, trial: &MentalRotationTrial) -> Stimulus {
        Stimulus::Image {
            asset: trial.target,
        }
    }

    fn present_choices(&self, trial: &MentalRotationTrial) -> Vec<Choice> {
        vec![
            Choice::correct(ChoiceContent::Image(trial.correct)),
            Choice::distractor(ChoiceContent::Image(trial.distractor)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_triples_follow_naming_scheme() {
        let test = MentalRotationTest::from_asset_root("images/", 15);
        assert_eq!(test.pool().len(), 15);
        let third = test.pool()[2];
        assert_eq!(third.target.path(), "images/target3.png");
        assert_eq!(third.correct.path(), "images/correct3.png");
        assert_eq!(third.distractor.path(), "images/wrong3.png");
    }

    #[test]
    fn one_correct_one_distractor() {
        let test = MentalRotationTest::from_asset_root("images", 1);
        let choices = test.present_choices(&test.pool()[0]);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices.iter().filter(|c| c.correct).count(), 1);
    }
}
