use thiserror::Error;

use crate::raster::WorkingType;

#[derive(Error, Debug)]
pub enum WarpError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported working type: {0:?}")]
    UnsupportedType(WorkingType),

    #[error("Band buffer holds {found:?} samples but working type is {expected:?}")]
    TypeMismatch {
        expected: WorkingType,
        found: WorkingType,
    },

    #[error("Sample offset {offset} is outside a buffer of {len} components")]
    OutOfBounds { offset: usize, len: usize },

    #[error("User terminated after {rows_done} rows")]
    Cancelled { rows_done: usize },

    #[error("Invalid affine transform: {0}")]
    Affine(String),
}
