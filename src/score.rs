//! Predictive and marginal scoring for the Dirichlet-multinomial model
use itertools::izip;
use rand::Rng;
use special::Gamma as _;

use crate::hyper::DirMulHyper;
use crate::stat::{DirMulSuffStat, StatError};
use crate::traits::Scorable;

impl DirMulHyper {
    /// Log predictive score of the dense observation `y` being the next one
    /// assigned to the cluster summarized by `stat`. Does not mutate state.
    ///
    /// > `ln Γ(x. + 1) − Σᵢ ln Γ(yᵢ + 1) + Σᵢ yᵢ ln(αᵢ + nᵢ) − x. ln(α. + n.)`
    ///
    /// where `x. = Σ yᵢ`, `α. = Σ αᵢ`, `n. = Σ nᵢ`.
    ///
    /// # Notes
    ///
    /// This is a linearized form of the Dirichlet-multinomial posterior
    /// predictive: per category, the exact `ln Γ(αᵢ + nᵢ + yᵢ) − ln Γ(αᵢ +
    /// nᵢ)` term is replaced by `yᵢ ln(αᵢ + nᵢ)`. The two agree whenever
    /// `x. == 1` and diverge for larger totals. Candidate ranking under a
    /// Gibbs sweep uses this form for speed; [`ln_m`](Self::ln_m) is exact.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use dirmul::prelude::*;
    /// let hyper = DirMulHyper::symmetric(1.0, 2).unwrap();
    /// let stat = hyper.empty_suffstat();
    ///
    /// // single-count observation against an empty cluster: uniform
    /// let score = hyper.ln_pp(&[1, 0], &stat).unwrap();
    /// assert::close(score, 0.5_f64.ln(), 1E-12);
    /// ```
    pub fn ln_pp(
        &self,
        y: &[u32],
        stat: &DirMulSuffStat,
    ) -> Result<f64, StatError> {
        if y.len() != self.k() {
            return Err(StatError::DimensionMismatch {
                expected: self.k(),
                actual: y.len(),
            });
        }
        if stat.k() != self.k() {
            return Err(StatError::DimensionMismatch {
                expected: self.k(),
                actual: stat.k(),
            });
        }

        let x_sum = y.iter().map(|&yi| u64::from(yi)).sum::<u64>() as f64;
        let a_sum = self.sum_alpha();
        let n_sum = stat.total() as f64;

        let mut score = 0.0;
        for (&yi, &ai, &ni) in izip!(y, self.alphas(), stat.counts()) {
            let yf = f64::from(yi);
            score -= (yf + 1.0).ln_gamma().0;
            score += yf * (ai + f64::from(ni)).ln();
        }
        score += (x_sum + 1.0).ln_gamma().0;
        score -= x_sum * (a_sum + n_sum).ln();

        Ok(score)
    }

    /// Exact log marginal likelihood (evidence) of all data summarized by
    /// `stat`, with the multinomial coefficients carried in the statistic's
    /// `ratio` term:
    ///
    /// > `ratio + Σᵢ [ln Γ(nᵢ + αᵢ) − ln Γ(αᵢ)] + ln Γ(α.) − ln Γ(α. + n.)`
    pub fn ln_m(&self, stat: &DirMulSuffStat) -> Result<f64, StatError> {
        if stat.k() != self.k() {
            return Err(StatError::DimensionMismatch {
                expected: self.k(),
                actual: stat.k(),
            });
        }

        let a_sum = self.sum_alpha();
        let n_sum = stat.total() as f64;

        let mut score = stat.ratio();
        for (&ai, &ni) in izip!(self.alphas(), stat.counts()) {
            score += (f64::from(ni) + ai).ln_gamma().0 - ai.ln_gamma().0;
        }
        score += a_sum.ln_gamma().0 - (a_sum + n_sum).ln_gamma().0;

        Ok(score)
    }

    /// Draw an observation from the posterior predictive.
    ///
    /// Always returns `Err(StatError::Unimplemented)`; this model does not
    /// provide predictive sampling.
    pub fn post_draw<R: Rng>(
        &self,
        _stat: &DirMulSuffStat,
        _rng: &mut R,
    ) -> Result<Vec<u32>, StatError> {
        Err(StatError::Unimplemented)
    }
}

impl Scorable for DirMulHyper {
    type Stat = DirMulSuffStat;
    type Value = Vec<u32>;
    type Error = StatError;

    fn empty_suffstat(&self) -> DirMulSuffStat {
        DirMulHyper::empty_suffstat(self)
    }

    fn ln_pp(
        &self,
        y: &Vec<u32>,
        stat: &DirMulSuffStat,
    ) -> Result<f64, StatError> {
        DirMulHyper::ln_pp(self, y, stat)
    }

    fn ln_m(&self, stat: &DirMulSuffStat) -> Result<f64, StatError> {
        DirMulHyper::ln_m(self, stat)
    }

    fn post_draw<R: Rng>(
        &self,
        stat: &DirMulSuffStat,
        rng: &mut R,
    ) -> Result<Vec<u32>, StatError> {
        DirMulHyper::post_draw(self, stat, rng)
    }
}
