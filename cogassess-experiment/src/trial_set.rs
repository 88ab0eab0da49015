use cogassess_core::SubTestKind;
use rand::Rng;
use rand::seq::index;

use crate::error::{AssessmentError, Result};

/// Draws `total` distinct pool indices in random order.
///
/// Fails instead of sampling short when the pool is smaller than the budget.
pub fn sample_trial_order<R: Rng + ?Sized>(
    rng: &mut R,
    subtest: SubTestKind,
    pool_len: usize,
    total: usize,
) -> Result<Vec<usize>> {
    if pool_len < total {
        return Err(AssessmentError::InsufficientPool {
            subtest,
            pool: pool_len,
            required: total,
        });
    }
    Ok(index::sample(rng, pool_len, total).into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn never_repeats_within_a_run() {
        let mut rng = StdRng::seed_from_u64(7);
        for pool in 15..40 {
            for _ in 0..50 {
                let order = sample_trial_order(&mut rng, SubTestKind::Stroop, pool, 15).unwrap();
                assert_eq!(order.len(), 15);
                let distinct: HashSet<_> = order.iter().copied().collect();
                assert_eq!(distinct.len(), 15);
                assert!(order.iter().all(|&i| i < pool));
            }
        }
    }

    #[test]
    fn pool_equal_to_budget_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut order = sample_trial_order(&mut rng, SubTestKind::MentalRotation, 15, 15).unwrap();
        order.sort_unstable();
        assert_eq!(order, (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn short_pool_fails_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_trial_order(&mut rng, SubTestKind::Math, 3, 10).unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::InsufficientPool {
                pool: 3,
                required: 10,
                ..
            }
        ));
    }
}
