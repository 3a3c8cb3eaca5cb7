//! Persistence adapters: structured records and binary wire messages.
//!
//! Records carry `alphas` for hyperparameters and `counts` for statistics.
//! A statistic's `ratio` and `n` are never persisted: after a load they
//! keep whatever values they held before the call (zero on a fresh
//! statistic). A host that needs [`ln_m`](crate::DirMulHyper::ln_m)
//! correctness after a load must rebuild those fields out of band, e.g. by
//! replaying the cluster's observations through
//! [`observe`](crate::traits::SuffStat::observe).
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hyper::{DirMulHyper, HyperError};
use crate::stat::DirMulSuffStat;
use crate::traits::{Persistable, WirePersistable};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The record is missing a required field
    MissingField { field: &'static str },
    /// A field holds the wrong kind of value
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    /// The alphas in the record do not form valid hyperparameters
    InvalidHyper(HyperError),
    /// A count in the record is negative or too large
    CountOutOfRange { ix: usize, value: i64 },
}

#[derive(Debug)]
pub enum WireError {
    /// The byte-level codec failed
    Codec(bincode::Error),
    /// The alphas in the message do not form valid hyperparameters
    InvalidHyper(HyperError),
    /// A count in the message is negative or too large
    CountOutOfRange { ix: usize, value: i64 },
}

/// Wire envelope for hyperparameters: `alphas`, repeated double
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperMessage {
    pub alphas: Vec<f64>,
}

/// Wire envelope for a statistic: `counts`, repeated integer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatMessage {
    pub counts: Vec<i64>,
}

impl HyperMessage {
    /// Remove all content
    #[inline]
    pub fn clear(&mut self) {
        self.alphas.clear();
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        bincode::serialize(self).map_err(WireError::Codec)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        bincode::deserialize(bytes).map_err(WireError::Codec)
    }
}

impl StatMessage {
    /// Remove all content
    #[inline]
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        bincode::serialize(self).map_err(WireError::Codec)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        bincode::deserialize(bytes).map_err(WireError::Codec)
    }
}

impl Persistable for DirMulHyper {
    type Error = RecordError;

    fn dump(&self) -> Value {
        json!({ "alphas": self.alphas() })
    }

    fn load(&mut self, record: &Value) -> Result<(), RecordError> {
        let arr = record
            .get("alphas")
            .ok_or(RecordError::MissingField { field: "alphas" })?
            .as_array()
            .ok_or(RecordError::InvalidField {
                field: "alphas",
                expected: "array of numbers",
            })?;

        let alphas = arr
            .iter()
            .map(|v| {
                v.as_f64().ok_or(RecordError::InvalidField {
                    field: "alphas",
                    expected: "array of numbers",
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        *self = DirMulHyper::new(alphas).map_err(RecordError::InvalidHyper)?;
        Ok(())
    }
}

impl Persistable for DirMulSuffStat {
    type Error = RecordError;

    fn dump(&self) -> Value {
        json!({ "counts": self.counts() })
    }

    fn load(&mut self, record: &Value) -> Result<(), RecordError> {
        let arr = record
            .get("counts")
            .ok_or(RecordError::MissingField { field: "counts" })?
            .as_array()
            .ok_or(RecordError::InvalidField {
                field: "counts",
                expected: "array of integers",
            })?;

        let counts = arr
            .iter()
            .enumerate()
            .map(|(ix, v)| {
                let value = v.as_i64().ok_or(RecordError::InvalidField {
                    field: "counts",
                    expected: "array of integers",
                })?;
                u32::try_from(value)
                    .map_err(|_| RecordError::CountOutOfRange { ix, value })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        self.set_counts(counts);
        Ok(())
    }
}

impl WirePersistable for DirMulHyper {
    type Message = HyperMessage;
    type Error = WireError;

    fn dump_wire(&self, msg: &mut HyperMessage) {
        msg.clear();
        msg.alphas.extend_from_slice(self.alphas());
    }

    fn load_wire(&mut self, msg: &HyperMessage) -> Result<(), WireError> {
        *self = DirMulHyper::new(msg.alphas.clone())
            .map_err(WireError::InvalidHyper)?;
        Ok(())
    }
}

impl WirePersistable for DirMulSuffStat {
    type Message = StatMessage;
    type Error = WireError;

    fn dump_wire(&self, msg: &mut StatMessage) {
        msg.clear();
        msg.counts.extend(self.counts().iter().map(|&c| i64::from(c)));
    }

    fn load_wire(&mut self, msg: &StatMessage) -> Result<(), WireError> {
        let counts = msg
            .counts
            .iter()
            .enumerate()
            .map(|(ix, &value)| {
                u32::try_from(value)
                    .map_err(|_| WireError::CountOutOfRange { ix, value })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        self.set_counts(counts);
        Ok(())
    }
}

impl From<HyperError> for RecordError {
    fn from(err: HyperError) -> Self {
        RecordError::InvalidHyper(err)
    }
}

impl std::error::Error for RecordError {}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "record is missing field `{}`", field)
            }
            Self::InvalidField { field, expected } => {
                write!(f, "record field `{}` must be an {}", field, expected)
            }
            Self::InvalidHyper(err) => {
                write!(f, "invalid hyperparameters: {}", err)
            }
            Self::CountOutOfRange { ix, value } => {
                write!(f, "count {} at index {} is out of range", value, ix)
            }
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::InvalidHyper(err) => Some(err),
            Self::CountOutOfRange { .. } => None,
        }
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "wire codec error: {}", err),
            Self::InvalidHyper(err) => {
                write!(f, "invalid hyperparameters: {}", err)
            }
            Self::CountOutOfRange { ix, value } => {
                write!(f, "count {} at index {} is out of range", value, ix)
            }
        }
    }
}
