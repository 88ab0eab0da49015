use cogassess_core::{Choice, ChoiceContent, InkColor, Stimulus, SubTestKind};

use super::SubTest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StroopTrial {
    pub word: InkColor,
    pub ink: InkColor,
}

/// Name the ink colour, not the word.
#[derive(Debug, Clone)]
pub struct StroopTest {
    pool: Vec<StroopTrial>,
}

impl StroopTest {
    pub fn new(pool: Vec<StroopTrial>) -> Self {
        Self { pool }
    }

    /// Every word/ink pairing, congruent ones included.
    pub fn standard() -> Self {
        let pool = InkColor::ALL
            .iter()
            .flat_map(|&word| InkColor::ALL.iter().map(move |&ink| StroopTrial { word, ink }))
            .collect();
        Self { pool }
    }
}

impl Default for StroopTest {
    fn default() -> Self {
        Self::standard()
    }
}

impl SubTest for StroopTest {
    type Trial = StroopTrial;

    fn kind(&self) -> SubTestKind {
        SubTestKind::Stroop
    }

    fn pool(&self) -> &[StroopTrial] {
        &self.pool
    }

    fn stimulus(&self, trial: &StroopTrial) -> Stimulus {
        Stimulus::ColorWord {
            word: trial.word,
            ink: trial.ink,
        }
    }

    fn present_choices(&self, trial: &StroopTrial) -> Vec<Choice> {
        InkColor::ALL
            .iter()
            .map(|&c| Choice {
                content: ChoiceContent::Color(c),
                correct: c == trial.ink,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_ink_colour_is_correct() {
        let test = StroopTest::standard();
        assert_eq!(test.pool().len(), 16);
        let trial = StroopTrial {
            word: InkColor::Red,
            ink: InkColor::Blue,
        };
        let correct: Vec<_> = test
            .present_choices(&trial)
            .into_iter()
            .filter(|c| c.correct)
            .collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].content, ChoiceContent::Color(InkColor::Blue));
    }
}
