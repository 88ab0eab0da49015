use cogassess_core::{Choice, ChoiceContent, Operator, ResponseMode, Stimulus, SubTestKind};

use super::SubTest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathTrial {
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
}

impl MathTrial {
    pub fn answer(&self) -> i64 {
        self.op.apply(self.lhs, self.rhs)
    }
}

/// Mental arithmetic: the participant types the result.
#[derive(Debug, Clone)]
pub struct MathTest {
    pool: Vec<MathTrial>,
}

impl MathTest {
    pub fn new(pool: Vec<MathTrial>) -> Self {
        Self { pool }
    }

    /// Two-digit addition and subtraction plus single-digit multiplication.
    /// Subtractions never go negative.
    pub fn standard() -> Self {
        let mut pool = Vec::new();
        for lhs in (12..=48).step_by(6) {
            for rhs in (3..=27).step_by(8) {
                pool.push(MathTrial {
                    lhs,
                    op: Operator::Add,
                    rhs,
                });
                pool.push(MathTrial {
                    lhs: lhs.max(rhs),
                    op: Operator::Sub,
                    rhs: lhs.min(rhs),
                });
            }
        }
        for lhs in 3..=12 {
            for rhs in [4, 7, 9] {
                pool.push(MathTrial {
                    lhs,
                    op: Operator::Mul,
                    rhs,
                });
            }
        }
        Self { pool }
    }
}

impl Default for MathTest {
    fn default() -> Self {
        Self::standard()
    }
}

impl SubTest for MathTest {
    type Trial = MathTrial;

    fn kind(&self) -> SubTestKind {
        SubTestKind::Math
    }

    fn pool(&self) -> &[MathTrial] {
        &self.pool
    }

    fn stimulus(&self, trial: &MathTrial) -> Stimulus {
        Stimulus::Equation {
            lhs: trial.lhs,
            op: trial.op,
            rhs: trial.rhs,
        }
    }

    fn present_choices(&self, trial: &MathTrial) -> Vec<Choice> {
        vec![Choice::correct(ChoiceContent::Number(trial.answer()))]
    }

    fn response_mode(&self) -> ResponseMode {
        ResponseMode::Entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pool_is_large_and_non_negative() {
        let test = MathTest::standard();
        assert!(test.pool().len() >= 30);
        assert!(test.pool().iter().all(|t| t.answer() >= 0));
    }

    #[test]
    fn typed_answer_has_one_correct_option() {
        let test = MathTest::standard();
        let trial = MathTrial {
            lhs: 6,
            op: Operator::Mul,
            rhs: 7,
        };
        let choices = test.present_choices(&trial);
        assert_eq!(choices.len(), 1);
        assert!(choices[0].correct);
        assert!(choices[0].content.accepts("42"));
        assert_eq!(test.response_mode(), ResponseMode::Entry);
    }
}
