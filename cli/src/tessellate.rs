use crate::commands::{CliError, TessellateCmd};
use std::io::Write;
use thicklines::math::Transform3D;
use thicklines::tessellation::geometry_builder::{BuffersBuilder, VertexBuffers};
use thicklines::tessellation::{LineVertex, MarkerVertex};
use thicklines::{MemoryBackend, ThickLines};

pub fn tessellate(mut cmd: TessellateCmd) -> Result<(), CliError> {
    let mut lines =
        ThickLines::from_mesh(MemoryBackend::new(), &cmd.mesh)?.with_stroke_options(cmd.stroke);

    let transform = Transform3D::identity();

    let mut geometry: VertexBuffers<LineVertex, u32> = VertexBuffers::new();
    lines.draw_curves(
        &transform,
        &mut BuffersBuilder::new(&mut geometry, |v: LineVertex| v),
    )?;

    let mut markers: VertexBuffers<MarkerVertex, u32> = VertexBuffers::new();
    if let Some(marker_options) = cmd.markers {
        lines = lines.with_marker_options(marker_options);
        lines.draw_markers(
            &transform,
            &mut BuffersBuilder::new(&mut markers, |v: MarkerVertex| v),
        )?;
    }

    if cmd.count {
        writeln!(&mut *cmd.output, "segments: {}", lines.buffer().num_segments())?;
        writeln!(
            &mut *cmd.output,
            "lines: {} vertices, {} triangles",
            geometry.vertices.len(),
            geometry.indices.len() / 3
        )?;
        if cmd.markers.is_some() {
            writeln!(
                &mut *cmd.output,
                "markers: {} vertices, {} triangles",
                markers.vertices.len(),
                markers.indices.len() / 3
            )?;
        }
        return Ok(());
    }

    writeln!(&mut *cmd.output, "line vertices:")?;
    for v in &geometry.vertices {
        let p = v.clip_position();
        let c = v.color();
        writeln!(
            &mut *cmd.output,
            "  ({}, {}, {}, {}) color ({}, {}, {}, {}) uv ({}, {})",
            p[0], p[1], p[2], p[3], c.r, c.g, c.b, c.a, v.tex_coord().x, v.tex_coord().y
        )?;
    }
    write_indices(&mut *cmd.output, "line indices", &geometry.indices)?;

    if cmd.markers.is_some() {
        writeln!(&mut *cmd.output, "marker vertices:")?;
        for v in &markers.vertices {
            let p = v.clip_position();
            writeln!(
                &mut *cmd.output,
                "  ({}, {}, {}, {}) coverage {}",
                p[0],
                p[1],
                p[2],
                p[3],
                v.coverage()
            )?;
        }
        write_indices(&mut *cmd.output, "marker indices", &markers.indices)?;
    }

    Ok(())
}

fn write_indices(output: &mut dyn std::io::Write, name: &str, indices: &[u32]) -> Result<(), CliError> {
    write!(output, "{}: [", name)?;
    let mut is_first = true;
    for index in indices {
        if !is_first {
            write!(output, ", ")?;
        }
        write!(output, "{}", index)?;
        is_first = false;
    }
    writeln!(output, "]")?;

    Ok(())
}
