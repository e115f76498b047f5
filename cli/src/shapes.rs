use crate::commands::CliError;
use thicklines::curves::Mesh;
use thicklines::math::point3;

pub const SHAPES: &[&str] = &["tetrahedron", "cube", "grid"];

/// Built-in meshes, centered around the origin and fitting in the unit cube.
pub fn shape(name: &str) -> Result<Mesh, CliError> {
    match name {
        "tetrahedron" => Ok(tetrahedron()),
        "cube" => Ok(cube()),
        "grid" => Ok(grid(8)),
        _ => Err(CliError::UnknownShape(name.to_string())),
    }
}

pub fn tetrahedron() -> Mesh {
    Mesh::new(
        vec![
            point3(0.5, 0.5, 0.5),
            point3(0.5, -0.5, -0.5),
            point3(-0.5, 0.5, -0.5),
            point3(-0.5, -0.5, 0.5),
        ],
        vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2],
    )
}

pub fn cube() -> Mesh {
    let mut positions = Vec::with_capacity(8);
    for i in 0..8 {
        let coord = |bit: u32| if i & bit != 0 { 0.5 } else { -0.5 };
        positions.push(point3(coord(1), coord(2), coord(4)));
    }

    let faces: [[u32; 4]; 6] = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    let mut indices = Vec::with_capacity(36);
    for f in &faces {
        indices.extend_from_slice(&[f[0], f[1], f[2], f[0], f[2], f[3]]);
    }

    Mesh::new(positions, indices)
}

/// A flat grid of `n` by `n` quads, each split in two triangles.
pub fn grid(n: u32) -> Mesh {
    let step = 1.0 / n as f32;
    let mut positions = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for y in 0..=n {
        for x in 0..=n {
            positions.push(point3(x as f32 * step - 0.5, y as f32 * step - 0.5, 0.0));
        }
    }

    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for y in 0..n {
        for x in 0..n {
            let a = y * (n + 1) + x;
            let b = a + 1;
            let c = a + n + 1;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }

    Mesh::new(positions, indices)
}

#[test]
fn edge_counts() {
    assert_eq!(tetrahedron().edges().len(), 6);
    // 12 cube edges and one diagonal per face.
    assert_eq!(cube().edges().len(), 18);
    // Horizontal, vertical and diagonal edges.
    assert_eq!(grid(2).edges().len(), 6 + 6 + 4);

    for name in SHAPES {
        assert!(shape(name).is_ok());
    }
    assert!(shape("teapot").is_err());
}
