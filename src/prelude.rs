//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::data::SparseCounts;
#[doc(no_inline)]
pub use crate::hyper::{DirMulHyper, HyperError};
#[doc(no_inline)]
pub use crate::persist::{HyperMessage, RecordError, StatMessage, WireError};
#[doc(no_inline)]
pub use crate::stat::{DirMulSuffStat, StatError};
#[doc(no_inline)]
pub use crate::traits::*;
