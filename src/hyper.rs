//! Dirichlet concentration hyperparameters
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::stat::DirMulSuffStat;
use crate::traits::{ModelDescriptor, ValueKind};

/// Hyperparameters of the Dirichlet-multinomial model: a vector of
/// concentration weights `alphas`, one per category, each in (0, ∞).
///
/// Immutable after construction and safe to share by reference across
/// threads and clusters; one instance serves every cluster of a model.
///
/// # Example
///
/// ```rust
/// # use dirmul::DirMulHyper;
/// let hyper = DirMulHyper::new(vec![1.0, 2.0, 0.5]).unwrap();
/// assert_eq!(hyper.k(), 3);
/// assert_eq!(hyper.alphas(), &[1.0, 2.0, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirMulHyper {
    alphas: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HyperError {
    /// alphas vector is empty
    AlphasEmpty,
    /// alphas has one or more entries less than or equal to zero
    AlphaTooLow { ix: usize, alpha: f64 },
    /// alphas has one or more infinite or NaN entries
    AlphaNotFinite { ix: usize, alpha: f64 },
}

impl DirMulHyper {
    /// Creates hyperparameters with the given `alphas` vector
    ///
    /// # Example
    ///
    /// ```rust
    /// # use dirmul::DirMulHyper;
    /// assert!(DirMulHyper::new(vec![1.0, 0.5]).is_ok());
    /// assert!(DirMulHyper::new(vec![]).is_err());
    /// assert!(DirMulHyper::new(vec![1.0, 0.0]).is_err());
    /// assert!(DirMulHyper::new(vec![1.0, f64::NAN]).is_err());
    /// ```
    pub fn new(alphas: Vec<f64>) -> Result<Self, HyperError> {
        if alphas.is_empty() {
            return Err(HyperError::AlphasEmpty);
        }

        alphas.iter().enumerate().try_for_each(|(ix, &alpha)| {
            if alpha <= 0.0 {
                Err(HyperError::AlphaTooLow { ix, alpha })
            } else if !alpha.is_finite() {
                Err(HyperError::AlphaNotFinite { ix, alpha })
            } else {
                Ok(())
            }
        })?;

        Ok(DirMulHyper { alphas })
    }

    /// Creates hyperparameters without checking whether the parameters are
    /// valid.
    #[inline]
    pub fn new_unchecked(alphas: Vec<f64>) -> Self {
        DirMulHyper { alphas }
    }

    /// Creates hyperparameters where all `k` weights equal `alpha`
    pub fn symmetric(alpha: f64, k: usize) -> Result<Self, HyperError> {
        if k == 0 {
            Err(HyperError::AlphasEmpty)
        } else if alpha <= 0.0 {
            Err(HyperError::AlphaTooLow { ix: 0, alpha })
        } else if !alpha.is_finite() {
            Err(HyperError::AlphaNotFinite { ix: 0, alpha })
        } else {
            Ok(DirMulHyper {
                alphas: vec![alpha; k],
            })
        }
    }

    /// Creates hyperparameters with all alphas = 0.5 (Jeffreys prior)
    ///
    /// # Example
    ///
    /// ```rust
    /// # use dirmul::DirMulHyper;
    /// let hyper = DirMulHyper::jeffreys(3).unwrap();
    /// assert_eq!(hyper.alphas(), &[0.5, 0.5, 0.5]);
    /// ```
    pub fn jeffreys(k: usize) -> Result<Self, HyperError> {
        if k == 0 {
            Err(HyperError::AlphasEmpty)
        } else {
            Ok(DirMulHyper {
                alphas: vec![0.5; k],
            })
        }
    }

    /// The number of categories / the length of `alphas`
    #[inline]
    pub fn k(&self) -> usize {
        self.alphas.len()
    }

    /// The concentration weights
    #[inline]
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Σ αᵢ
    #[inline]
    pub fn sum_alpha(&self) -> f64 {
        self.alphas.iter().sum()
    }

    /// The descriptor hosts use to route observations to this model
    pub fn descriptor() -> ModelDescriptor {
        ModelDescriptor {
            name: "dirichlet-multinomial",
            value_kind: ValueKind::Counts,
        }
    }

    /// A fresh, empty per-cluster statistic sized for this model
    ///
    /// # Example
    ///
    /// ```rust
    /// # use dirmul::DirMulHyper;
    /// let hyper = DirMulHyper::jeffreys(4).unwrap();
    /// let stat = hyper.empty_suffstat();
    /// assert_eq!(stat.counts(), &[0, 0, 0, 0]);
    /// ```
    pub fn empty_suffstat(&self) -> DirMulSuffStat {
        DirMulSuffStat::new(self.k())
    }
}

impl fmt::Display for DirMulHyper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DirMul({}; α: [{}])",
            self.k(),
            self.alphas.iter().map(|a| format!("{}", a)).join(", ")
        )
    }
}

impl std::error::Error for HyperError {}

impl fmt::Display for HyperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphasEmpty => write!(f, "alphas vector was empty"),
            Self::AlphaTooLow { ix, alpha } => {
                write!(f, "Invalid alpha at index {}: {} <= 0.0", ix, alpha)
            }
            Self::AlphaNotFinite { ix, alpha } => {
                write!(f, "Non-finite alpha at index {}: {}", ix, alpha)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid_alphas() {
        let hyper = DirMulHyper::new(vec![0.5, 1.5, 2.0]).unwrap();
        assert_eq!(hyper.k(), 3);
        assert::close(hyper.sum_alpha(), 4.0, 1E-12);
    }

    #[test]
    fn new_empty_alphas_errors() {
        assert_eq!(DirMulHyper::new(vec![]), Err(HyperError::AlphasEmpty));
    }

    #[test]
    fn new_nonpositive_alpha_errors() {
        assert_eq!(
            DirMulHyper::new(vec![1.0, -0.5]),
            Err(HyperError::AlphaTooLow {
                ix: 1,
                alpha: -0.5
            })
        );
    }

    #[test]
    fn new_nonfinite_alpha_errors() {
        assert!(matches!(
            DirMulHyper::new(vec![f64::INFINITY]),
            Err(HyperError::AlphaNotFinite { ix: 0, .. })
        ));
    }

    #[test]
    fn symmetric_replicates_alpha() {
        let hyper = DirMulHyper::symmetric(1.2, 4).unwrap();
        assert_eq!(hyper.alphas(), &[1.2, 1.2, 1.2, 1.2]);
        assert!(DirMulHyper::symmetric(1.2, 0).is_err());
    }

    #[test]
    fn descriptor_names_the_family() {
        let desc = DirMulHyper::descriptor();
        assert_eq!(desc.name, "dirichlet-multinomial");
        assert_eq!(desc.value_kind, ValueKind::Counts);
    }

    #[test]
    fn empty_suffstat_matches_dim() {
        let hyper = DirMulHyper::jeffreys(5).unwrap();
        let stat = hyper.empty_suffstat();
        assert_eq!(stat.counts().len(), 5);
        assert_eq!(stat.ratio(), 0.0);
    }
}
