//! Per-cluster sufficient statistic for the Dirichlet-multinomial model
use std::fmt;

use serde::{Deserialize, Serialize};
use special::Gamma as _;

use crate::data::SparseCounts;
use crate::traits::{Mergeable, SuffStat};

/// Sufficient statistic of a cluster's assigned count observations.
///
/// Holds the number of observations `n`, per-category counts, and a running
/// `ratio` term: the cumulative log multinomial coefficient of every
/// observation folded in,
///
/// > `ratio = Σ_obs [ln Γ(Σᵢ xᵢ + 1) − Σᵢ ln Γ(xᵢ + 1)]`
///
/// Each observation may have a different total count, so the per-observation
/// combinatorial factors cannot be recovered from `counts` alone; carrying
/// them incrementally is what makes the evidence computation in
/// [`ln_m`](crate::DirMulHyper::ln_m) exact without retaining raw data.
///
/// The hosting sampler owns the instance and must serialize access to it:
/// no two mutating calls may overlap, and reads must not overlap a
/// mutation. Distinct clusters' statistics share no state and may be used
/// from different threads freely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirMulSuffStat {
    n: usize,
    counts: Vec<u32>,
    ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatError {
    /// Category index outside `[0, k)`
    IndexOutOfBounds { ix: usize, k: usize },
    /// A dense value or a source statistic has the wrong number of
    /// categories
    DimensionMismatch { expected: usize, actual: usize },
    /// Forgetting more counts than the statistic holds in a category
    CountUnderflow { ix: usize, have: u32, remove: u32 },
    /// Forgetting from a statistic with no observations
    NoObservations,
    /// The operation is not provided by this model
    Unimplemented,
}

impl DirMulSuffStat {
    /// An empty statistic over `k` categories: zero counts, zero ratio
    #[inline]
    pub fn new(k: usize) -> Self {
        DirMulSuffStat {
            n: 0,
            counts: vec![0; k],
            ratio: 0.0,
        }
    }

    /// Create a statistic from components without checking whether they are
    /// valid.
    #[inline]
    pub fn from_parts_unchecked(n: usize, counts: Vec<u32>, ratio: f64) -> Self {
        DirMulSuffStat { n, counts, ratio }
    }

    /// The number of categories
    #[inline]
    pub fn k(&self) -> usize {
        self.counts.len()
    }

    /// The number of observations folded in
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Per-category counts aggregated over all observations
    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The cumulative log multinomial coefficient term
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Total count summed over categories
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// `true` if no observations have been folded in
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    // Replaces counts wholesale. n and ratio are left untouched; used by
    // the persistence adapters, which do not carry either field.
    pub(crate) fn set_counts(&mut self, counts: Vec<u32>) {
        self.counts = counts;
    }

    fn check_indices(&self, x: &SparseCounts) -> Result<(), StatError> {
        let k = self.counts.len();
        x.pairs().iter().try_for_each(|&(ix, _)| {
            if ix < k {
                Ok(())
            } else {
                Err(StatError::IndexOutOfBounds { ix, k })
            }
        })
    }
}

impl SuffStat<SparseCounts> for DirMulSuffStat {
    type Error = StatError;

    fn n(&self) -> usize {
        self.n
    }

    fn observe(&mut self, x: &SparseCounts) -> Result<(), StatError> {
        self.check_indices(x)?;

        let mut count_sum: u64 = 0;
        for &(ix, xi) in x.pairs() {
            count_sum += u64::from(xi);
            self.counts[ix] += xi;
            self.ratio -= (f64::from(xi) + 1.0).ln_gamma().0;
        }
        self.ratio += (count_sum as f64 + 1.0).ln_gamma().0;
        self.n += 1;
        Ok(())
    }

    fn forget(&mut self, x: &SparseCounts) -> Result<(), StatError> {
        if self.n == 0 {
            return Err(StatError::NoObservations);
        }
        let k = self.counts.len();
        x.pairs().iter().try_for_each(|&(ix, xi)| {
            match self.counts.get(ix) {
                None => Err(StatError::IndexOutOfBounds { ix, k }),
                Some(&have) if have < xi => Err(StatError::CountUnderflow {
                    ix,
                    have,
                    remove: xi,
                }),
                Some(_) => Ok(()),
            }
        })?;

        let mut count_sum: u64 = 0;
        for &(ix, xi) in x.pairs() {
            count_sum += u64::from(xi);
            self.counts[ix] -= xi;
            self.ratio += (f64::from(xi) + 1.0).ln_gamma().0;
        }
        self.ratio -= (count_sum as f64 + 1.0).ln_gamma().0;
        self.n -= 1;
        Ok(())
    }
}

impl Mergeable for DirMulSuffStat {
    type Error = StatError;

    fn merge(&mut self, source: &Self) -> Result<(), StatError> {
        if source.counts.len() != self.counts.len() {
            return Err(StatError::DimensionMismatch {
                expected: self.counts.len(),
                actual: source.counts.len(),
            });
        }

        self.counts
            .iter_mut()
            .zip(source.counts.iter())
            .for_each(|(ct, &src)| *ct += src);
        self.ratio += source.ratio;
        self.n += source.n;
        Ok(())
    }
}

impl std::error::Error for StatError {}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { ix, k } => {
                write!(f, "category index {} out of bounds for k = {}", ix, k)
            }
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "expected {} categories but was given {}",
                expected, actual
            ),
            Self::CountUnderflow { ix, have, remove } => write!(
                f,
                "cannot remove {} counts from category {} holding {}",
                remove, ix, have
            ),
            Self::NoObservations => {
                write!(f, "cannot forget from a statistic with no observations")
            }
            Self::Unimplemented => {
                write!(f, "operation is not implemented for this model")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use special::Gamma as _;

    const TOL: f64 = 1E-12;

    #[test]
    fn new_is_all_zero() {
        let stat = DirMulSuffStat::new(4);
        assert_eq!(stat.counts(), &[0, 0, 0, 0]);
        assert_eq!(stat.n(), 0);
        assert_eq!(stat.ratio(), 0.0);
        assert!(stat.is_empty());
    }

    #[test]
    fn from_parts_unchecked() {
        let stat =
            DirMulSuffStat::from_parts_unchecked(2, vec![1, 2, 3], 0.5);
        assert_eq!(stat.n(), 2);
        assert_eq!(stat.counts(), &[1, 2, 3]);
        assert::close(stat.ratio(), 0.5, TOL);
    }

    #[test]
    fn observe_accumulates_counts_and_ratio() {
        let mut stat = DirMulSuffStat::new(2);
        stat.observe(&SparseCounts::new(vec![(0, 2), (1, 3)])).unwrap();

        assert_eq!(stat.counts(), &[2, 3]);
        assert_eq!(stat.n(), 1);
        assert_eq!(stat.total(), 5);

        // ln Γ(6) − ln Γ(3) − ln Γ(4) = ln C(5; 2, 3) = ln 10
        let expected = 6.0_f64.ln_gamma().0
            - 3.0_f64.ln_gamma().0
            - 4.0_f64.ln_gamma().0;
        assert::close(stat.ratio(), expected, TOL);
        assert::close(stat.ratio(), 10.0_f64.ln(), TOL);
    }

    #[test]
    fn observe_zero_count_pairs_are_inert() {
        let mut stat = DirMulSuffStat::new(3);
        stat.observe(&SparseCounts::new(vec![(1, 0)])).unwrap();
        assert_eq!(stat.counts(), &[0, 0, 0]);
        // ln Γ(1) terms all vanish
        assert::close(stat.ratio(), 0.0, TOL);
        assert_eq!(stat.n(), 1);
    }

    #[test]
    fn observe_bad_index_fails_without_mutating() {
        let mut stat = DirMulSuffStat::new(2);
        stat.observe(&SparseCounts::new(vec![(0, 1)])).unwrap();
        let before = stat.clone();

        let res = stat.observe(&SparseCounts::new(vec![(0, 1), (2, 1)]));
        assert_eq!(res, Err(StatError::IndexOutOfBounds { ix: 2, k: 2 }));
        assert_eq!(stat, before);
    }

    #[test]
    fn forget_restores_preobserve_state() {
        let mut stat = DirMulSuffStat::new(3);
        stat.observe(&SparseCounts::new(vec![(0, 1), (2, 4)])).unwrap();
        let before = stat.clone();

        let x = SparseCounts::new(vec![(1, 2), (2, 2)]);
        stat.observe(&x).unwrap();
        stat.forget(&x).unwrap();

        assert_eq!(stat.counts(), before.counts());
        assert_eq!(stat.n(), before.n());
        assert::close(stat.ratio(), before.ratio(), TOL);
    }

    #[test]
    fn forget_underflow_fails_without_mutating() {
        let mut stat = DirMulSuffStat::new(2);
        stat.observe(&SparseCounts::new(vec![(0, 1)])).unwrap();
        let before = stat.clone();

        let res = stat.forget(&SparseCounts::new(vec![(0, 2)]));
        assert_eq!(
            res,
            Err(StatError::CountUnderflow {
                ix: 0,
                have: 1,
                remove: 2
            })
        );
        assert_eq!(stat, before);
    }

    #[test]
    fn forget_on_empty_stat_fails() {
        let mut stat = DirMulSuffStat::new(2);
        let res = stat.forget(&SparseCounts::new(vec![(0, 1)]));
        assert_eq!(res, Err(StatError::NoObservations));
    }

    #[test]
    fn merge_adds_counts_ratio_and_n() {
        let mut a = DirMulSuffStat::new(3);
        a.observe(&SparseCounts::new(vec![(0, 1)])).unwrap();
        let mut b = DirMulSuffStat::new(3);
        b.observe(&SparseCounts::new(vec![(1, 2), (2, 1)])).unwrap();

        let ratio_a = a.ratio();
        let ratio_b = b.ratio();

        a.merge(&b).unwrap();
        assert_eq!(a.counts(), &[1, 2, 1]);
        assert_eq!(a.n(), 2);
        assert::close(a.ratio(), ratio_a + ratio_b, TOL);

        // source untouched
        assert_eq!(b.counts(), &[0, 2, 1]);
        assert_eq!(b.n(), 1);
    }

    #[test]
    fn merge_dimension_mismatch_fails() {
        let mut a = DirMulSuffStat::new(3);
        let b = DirMulSuffStat::new(2);
        assert_eq!(
            a.merge(&b),
            Err(StatError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn observe_many_then_forget_many() {
        let xs = vec![
            SparseCounts::new(vec![(0, 2)]),
            SparseCounts::new(vec![(1, 1), (2, 1)]),
            SparseCounts::new(vec![(2, 3)]),
        ];

        let mut stat = DirMulSuffStat::new(3);
        stat.observe_many(&xs).unwrap();
        assert_eq!(stat.n(), 3);
        assert_eq!(stat.counts(), &[2, 1, 5]);

        stat.forget_many(&xs).unwrap();
        assert_eq!(stat.n(), 0);
        assert_eq!(stat.counts(), &[0, 0, 0]);
        assert::close(stat.ratio(), 0.0, TOL);
    }
}
