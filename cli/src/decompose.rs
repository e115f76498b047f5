use crate::commands::{CliError, DecomposeCmd};
use std::io::Write;
use thicklines::curves::{decompose as decompose_edges, expand};

pub fn decompose(mut cmd: DecomposeCmd) -> Result<(), CliError> {
    let edges = cmd.mesh.edges();
    let curves = decompose_edges(&edges);
    let num_segments: usize = curves.iter().map(|c| expand::num_segments(c)).sum();

    if cmd.count {
        writeln!(&mut *cmd.output, "edges: {}", edges.len())?;
        writeln!(&mut *cmd.output, "curves: {}", curves.len())?;
        writeln!(&mut *cmd.output, "segments: {}", num_segments)?;
        return Ok(());
    }

    for curve in &curves {
        let mut is_first = true;
        for index in curve.iter() {
            if !is_first {
                write!(&mut *cmd.output, " ")?;
            }
            write!(&mut *cmd.output, "{}", index)?;
            is_first = false;
        }
        writeln!(&mut *cmd.output)?;
    }

    Ok(())
}
