//! Observation representations
use serde::{Deserialize, Serialize};

/// A count observation in sparse form: (category index, count) pairs.
///
/// Mutation paths ([`observe`](crate::traits::SuffStat::observe) and
/// [`forget`](crate::traits::SuffStat::forget)) take sparse observations so
/// that an observation touching few of the `k` categories costs O(pairs)
/// rather than O(k). Predictive scoring takes the dense form (`&[u32]`)
/// instead; see [`Scorable`](crate::traits::Scorable).
///
/// Category indices within one observation should be distinct. Pairs with a
/// zero count are permitted and contribute nothing.
///
/// # Example
///
/// ```rust
/// # use dirmul::SparseCounts;
/// let x = SparseCounts::from_dense(&[2, 0, 1]);
/// assert_eq!(x.pairs(), &[(0, 2), (2, 1)]);
/// assert_eq!(x.total(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseCounts {
    pairs: Vec<(usize, u32)>,
}

impl SparseCounts {
    #[inline]
    pub fn new(pairs: Vec<(usize, u32)>) -> Self {
        SparseCounts { pairs }
    }

    /// Sparse view of a dense count vector. Zero-count categories are
    /// dropped.
    pub fn from_dense(xs: &[u32]) -> Self {
        let pairs = xs
            .iter()
            .enumerate()
            .filter(|(_, &xi)| xi > 0)
            .map(|(ix, &xi)| (ix, xi))
            .collect();
        SparseCounts { pairs }
    }

    /// Dense count vector of length `k`, or `None` if any index falls
    /// outside `[0, k)`.
    pub fn to_dense(&self, k: usize) -> Option<Vec<u32>> {
        let mut xs = vec![0_u32; k];
        for &(ix, xi) in &self.pairs {
            if ix >= k {
                return None;
            }
            xs[ix] += xi;
        }
        Some(xs)
    }

    /// The (index, count) pairs in the order they were given
    #[inline]
    pub fn pairs(&self) -> &[(usize, u32)] {
        &self.pairs
    }

    /// Total count summed over categories
    #[inline]
    pub fn total(&self) -> u64 {
        self.pairs.iter().map(|&(_, xi)| u64::from(xi)).sum()
    }

    /// Largest category index appearing in this observation
    #[inline]
    pub fn max_index(&self) -> Option<usize> {
        self.pairs.iter().map(|&(ix, _)| ix).max()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<(usize, u32)>> for SparseCounts {
    fn from(pairs: Vec<(usize, u32)>) -> Self {
        SparseCounts::new(pairs)
    }
}

impl From<&[u32]> for SparseCounts {
    fn from(xs: &[u32]) -> Self {
        SparseCounts::from_dense(xs)
    }
}

impl FromIterator<(usize, u32)> for SparseCounts {
    fn from_iter<I: IntoIterator<Item = (usize, u32)>>(iter: I) -> Self {
        SparseCounts::new(iter.into_iter().collect())
    }
}
