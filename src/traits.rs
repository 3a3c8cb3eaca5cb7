//! The interface between likelihood models and the hosting sampler.
//!
//! A sampler that reassigns observations between clusters depends only on
//! these traits, never on a concrete model. Each capability is its own
//! trait so a model variant can implement the subset it supports: a model
//! without a savefile format simply does not implement [`Persistable`].
use rand::Rng;
use serde_json::Value;

/// Identifies a likelihood model family and the observation representation
/// it consumes.
///
/// Hosts route data by inspecting the descriptor a model hands them, rather
/// than by relying on ambient constants or concrete types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelDescriptor {
    /// Stable family name, e.g. `"dirichlet-multinomial"`
    pub name: &'static str,
    /// The kind of observation the model consumes
    pub value_kind: ValueKind,
}

/// Observation kinds a hosting sampler may route to a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Per-category count vectors, sparse for mutation and dense for
    /// scoring
    Counts,
}

/// Is a [sufficient statistic](https://en.wikipedia.org/wiki/Sufficient_statistic)
/// for a cluster's assigned data.
///
/// Mutating operations validate their input fully before touching any
/// state, so a failed call leaves the statistic unchanged. The caller is
/// still responsible for only forgetting observations it previously
/// observed on the same instance; the underflow check catches misuse per
/// category, not per observation.
///
/// # Example
///
/// ```
/// use dirmul::prelude::*;
///
/// let mut stat = DirMulSuffStat::new(3);
/// assert_eq!(stat.n(), 0);
///
/// let x = SparseCounts::new(vec![(0, 2), (2, 1)]);
/// stat.observe(&x).unwrap();
/// assert_eq!(stat.n(), 1);
/// assert_eq!(stat.counts(), &[2, 0, 1]);
///
/// stat.forget(&x).unwrap();
/// assert_eq!(stat.n(), 0);
/// assert_eq!(stat.counts(), &[0, 0, 0]);
/// ```
pub trait SuffStat<X> {
    type Error;

    /// Returns the number of observations folded in
    fn n(&self) -> usize;

    /// Assimilate the observation `x` into the statistic
    fn observe(&mut self, x: &X) -> Result<(), Self::Error>;

    /// Remove the observation `x` from the statistic
    fn forget(&mut self, x: &X) -> Result<(), Self::Error>;

    /// Assimilate several observations
    fn observe_many(&mut self, xs: &[X]) -> Result<(), Self::Error> {
        xs.iter().try_for_each(|x| self.observe(x))
    }

    /// Forget several observations
    fn forget_many(&mut self, xs: &[X]) -> Result<(), Self::Error> {
        xs.iter().try_for_each(|x| self.forget(x))
    }
}

/// Statistics that can absorb another cluster's statistic, for
/// agglomerative (split/merge) sampling moves.
///
/// `merge` is associative and commutative, and a freshly created statistic
/// is its identity element, so statistics form a commutative monoid under
/// it. The source is left unchanged; the caller decides whether to discard
/// it afterward.
pub trait Mergeable: Sized {
    type Error;

    /// Fold `source` into `self`
    fn merge(&mut self, source: &Self) -> Result<(), Self::Error>;
}

/// Scoring capabilities the sampler needs from a likelihood model.
///
/// Implemented by the model's hyperparameters, which are immutable and
/// shared read-only across all clusters of the model.
pub trait Scorable {
    /// Per-cluster sufficient statistic type
    type Stat;
    /// Dense observation form used for scoring and drawing
    type Value;
    type Error;

    /// A fresh, empty statistic sized for this model
    fn empty_suffstat(&self) -> Self::Stat;

    /// Log predictive score of `y` as the next observation assigned to the
    /// cluster summarized by `stat`. Does not mutate state.
    fn ln_pp(&self, y: &Self::Value, stat: &Self::Stat)
        -> Result<f64, Self::Error>;

    /// Log marginal likelihood (evidence) of all data summarized by `stat`
    fn ln_m(&self, stat: &Self::Stat) -> Result<f64, Self::Error>;

    /// Draw an observation from the posterior predictive
    fn post_draw<R: Rng>(
        &self,
        stat: &Self::Stat,
        rng: &mut R,
    ) -> Result<Self::Value, Self::Error>;
}

/// Structured-record persistence.
///
/// Records are key-value forms suitable for text savefiles. `load` replaces
/// the receiver's persisted fields in place; fields a model documents as
/// non-persisted keep their pre-call values.
pub trait Persistable {
    type Error;

    /// Dump state to a structured record
    fn dump(&self) -> Value;

    /// Load state from a structured record
    fn load(&mut self, record: &Value) -> Result<(), Self::Error>;
}

/// Binary wire-message persistence.
///
/// `dump_wire` clears any prior message content before writing, so a
/// message buffer can be reused across calls.
pub trait WirePersistable {
    /// Wire envelope type
    type Message;
    type Error;

    /// Write state into `msg`, clearing prior content first
    fn dump_wire(&self, msg: &mut Self::Message);

    /// Load state from `msg`
    fn load_wire(&mut self, msg: &Self::Message) -> Result<(), Self::Error>;
}
