//! Dirichlet-multinomial likelihood component for collapsed Gibbs samplers.
//!
//! A hosting sampler keeps one [`DirMulHyper`] per model and one
//! [`DirMulSuffStat`] per active cluster. Reassigning an observation is a
//! [`forget`](traits::SuffStat::forget) on the old cluster followed by an
//! [`observe`](traits::SuffStat::observe) on the new one; candidate
//! clusters are ranked with [`ln_pp`](DirMulHyper::ln_pp), full-partition
//! comparisons use the exact evidence [`ln_m`](DirMulHyper::ln_m), and
//! split/merge moves combine clusters with
//! [`merge`](traits::Mergeable::merge). All of it runs on the sufficient
//! statistic alone; raw observations are never retained or rescanned.
//!
//! The sampler side depends only on the capability traits in [`traits`], so
//! other likelihood models plug into the same seam.
//!
//! # Example
//!
//! ```rust
//! use dirmul::prelude::*;
//!
//! let hyper = DirMulHyper::jeffreys(3).unwrap();
//! let mut cluster = hyper.empty_suffstat();
//!
//! cluster.observe(&SparseCounts::new(vec![(0, 2), (2, 1)])).unwrap();
//!
//! let before = hyper.ln_m(&cluster).unwrap();
//! cluster.observe(&SparseCounts::new(vec![(1, 1)])).unwrap();
//!
//! // more data, lower joint evidence
//! assert!(hyper.ln_m(&cluster).unwrap() < before);
//! ```
pub mod data;
pub mod hyper;
pub mod persist;
pub mod prelude;
mod score;
pub mod stat;
pub mod traits;

pub use data::SparseCounts;
pub use hyper::{DirMulHyper, HyperError};
pub use persist::{HyperMessage, RecordError, StatMessage, WireError};
pub use stat::{DirMulSuffStat, StatError};

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
