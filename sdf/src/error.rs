use crate::Resolution;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdfError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tile key {0}")]
    Key(String),

    #[error("invalid SDF header line {0}")]
    Header(usize),

    #[error("invalid SDF sample on line {0}")]
    Sample(usize),

    #[error("expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },

    #[error("invalid HGT name {0:?}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1:?}")]
    HgtLen(u64, PathBuf),

    #[error("{path:?} has {found:?} resolution, expected {expected:?}")]
    Resolution {
        path: PathBuf,
        expected: Resolution,
        found: Resolution,
    },
}
