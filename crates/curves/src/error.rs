use crate::PointIndex;

use thiserror::Error;

/// Errors detected when validating curves against the point arrays.
#[non_exhaustive]
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveError {
    #[error("Curve {curve} references point {index} but there are only {len} points.")]
    IndexOutOfRange {
        curve: usize,
        index: PointIndex,
        len: usize,
    },
}
