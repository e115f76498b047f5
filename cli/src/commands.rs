use std::io;
use thicklines::curves::Mesh;
use thicklines::tessellation::{MarkerOptions, StrokeOptions};
use thiserror::Error;

pub struct DecomposeCmd {
    pub mesh: Mesh,
    pub output: Box<dyn io::Write>,
    pub count: bool,
}

pub struct TessellateCmd {
    pub mesh: Mesh,
    pub output: Box<dyn io::Write>,
    pub stroke: StrokeOptions,
    pub markers: Option<MarkerOptions>,
    pub count: bool,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unknown shape {0:?}")]
    UnknownShape(String),
    #[error("invalid value {value:?} for {arg}")]
    InvalidArg { arg: &'static str, value: String },
    #[error(transparent)]
    Setup(#[from] thicklines::SetupError),
    #[error(transparent)]
    Tessellation(#[from] thicklines::tessellation::TessellationError),
}
