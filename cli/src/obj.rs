//! A minimal Wavefront OBJ reader: vertex positions, optional vertex colors and
//! faces. Everything else is skipped.

use crate::commands::CliError;
use thicklines::curves::Mesh;
use thicklines::math::point3;
use thicklines::Color;

pub fn parse_obj(src: &str) -> Result<Mesh, CliError> {
    let mut mesh = Mesh::default();
    let mut num_colors = 0;

    for (line_idx, line) in src.lines().enumerate() {
        let line_number = line_idx + 1;
        let line = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        };
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let values = parse_floats(tokens, line_number)?;
                match values.len() {
                    3 | 4 => {}
                    // Some exporters append a color to the position.
                    6 | 7 => {
                        let c = &values[values.len() - 3..];
                        mesh.colors.push(Color::new(c[0], c[1], c[2], 1.0));
                        num_colors += 1;
                    }
                    n => {
                        return Err(parse_error(
                            line_number,
                            format!("expected 3 coordinates, got {}", n),
                        ))
                    }
                }
                mesh.positions
                    .push(point3(values[0], values[1], values[2]));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in tokens {
                    face.push(parse_face_index(token, mesh.positions.len(), line_number)?);
                }
                if face.len() < 3 {
                    return Err(parse_error(line_number, "face with fewer than 3 vertices"));
                }
                // Triangle fan.
                for i in 1..face.len() - 1 {
                    mesh.indices.push(face[0]);
                    mesh.indices.push(face[i]);
                    mesh.indices.push(face[i + 1]);
                }
            }
            _ => {}
        }
    }

    if num_colors != mesh.positions.len() {
        mesh.colors.clear();
    }

    log::debug!(
        "parsed {} vertices and {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    Ok(mesh)
}

fn parse_floats<'l>(
    tokens: impl Iterator<Item = &'l str>,
    line: usize,
) -> Result<Vec<f32>, CliError> {
    tokens
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|_| parse_error(line, format!("invalid number {:?}", token)))
        })
        .collect()
}

/// Parses `i`, `i/t`, `i//n` or `i/t/n`, where `i` is one-based or negative
/// (relative to the last vertex).
fn parse_face_index(token: &str, num_vertices: usize, line: usize) -> Result<u32, CliError> {
    let index_str = token.split('/').next().unwrap_or(token);
    let index: i64 = index_str
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index {:?}", token)))?;

    let resolved = if index < 0 {
        num_vertices as i64 + index
    } else {
        index - 1
    };

    if resolved < 0 || resolved >= num_vertices as i64 {
        return Err(parse_error(line, format!("index {} out of range", index)));
    }

    Ok(resolved as u32)
}

fn parse_error(line: usize, message: impl Into<String>) -> CliError {
    CliError::Parse {
        line,
        message: message.into(),
    }
}

#[test]
fn quad() {
    let src = "
# A quad.
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";
    let mesh = parse_obj(src).unwrap();
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    assert!(!mesh.has_colors());
}

#[test]
fn relative_indices_and_colors() {
    let src = "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0 0 0 1\nf -3 -2 -1\n";
    let mesh = parse_obj(src).unwrap();
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert!(mesh.has_colors());
    assert_eq!(mesh.colors[1], Color::new(0.0, 1.0, 0.0, 1.0));
}

#[test]
fn errors() {
    assert!(matches!(
        parse_obj("v 0 0\n"),
        Err(CliError::Parse { line: 1, .. })
    ));
    assert!(matches!(
        parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\n"),
        Err(CliError::Parse { line: 3, .. })
    ));
    assert!(matches!(
        parse_obj("v 0 0 0\nf 1 1\n"),
        Err(CliError::Parse { line: 2, .. })
    ));
}
