use thiserror::Error;

/// The tessellators' result type.
pub type TessellationResult = Result<(), TessellationError>;

/// An error that can happen while generating geometry.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    #[error("Too many vertices")]
    TooManyVertices,
}

/// The tessellators' error enumeration.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TessellationError {
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
    #[error("Index {index} is out of range ({len} points)")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("Got {positions} positions but {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
}
