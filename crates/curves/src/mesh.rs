use crate::geom::Color;
use crate::math::Point3D;
use crate::{EdgeSet, PointIndex};

use std::collections::BTreeMap;

/// A triangle mesh: positions, optional per-vertex colors and a triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Mesh {
    pub positions: Vec<Point3D>,
    /// Either empty or one color per position.
    pub colors: Vec<Color>,
    /// Three indices per triangle.
    pub indices: Vec<PointIndex>,
}

impl Mesh {
    pub fn new(positions: Vec<Point3D>, indices: Vec<PointIndex>) -> Self {
        Mesh {
            positions,
            colors: Vec::new(),
            indices,
        }
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if there is exactly one color per position.
    #[inline]
    pub fn has_colors(&self) -> bool {
        !self.positions.is_empty() && self.colors.len() == self.positions.len()
    }

    /// The per-vertex colors, or `default` for every vertex if the mesh does not
    /// have exactly one color per position.
    pub fn colors_or(&self, default: Color) -> Vec<Color> {
        if self.has_colors() {
            return self.colors.clone();
        }

        vec![default; self.positions.len()]
    }

    /// The unique edges of the triangles.
    pub fn edges(&self) -> EdgeSet {
        EdgeSet::from_triangles(&self.indices)
    }

    /// Merges vertices that have exactly the same position and rewrites the
    /// triangle indices accordingly.
    ///
    /// Vertices that share a position but not an index split the edge graph,
    /// which breaks curves into many short pieces. The first vertex of each
    /// position is kept along with its color. Returns the number of removed
    /// vertices.
    pub fn merge_duplicate_vertices(&mut self) -> usize {
        let has_colors = self.has_colors();
        let mut unique: BTreeMap<[u32; 3], PointIndex> = BTreeMap::new();
        let mut remap = Vec::with_capacity(self.positions.len());
        let mut positions = Vec::with_capacity(self.positions.len());
        let mut colors = Vec::new();

        for (idx, &position) in self.positions.iter().enumerate() {
            let next = positions.len() as PointIndex;
            let id = *unique.entry(position_key(position)).or_insert(next);
            if id == next {
                positions.push(position);
                if has_colors {
                    colors.push(self.colors[idx]);
                }
            }
            remap.push(id);
        }

        let removed = self.positions.len() - positions.len();
        if removed == 0 {
            return 0;
        }

        for index in &mut self.indices {
            if let Some(&new_index) = remap.get(*index as usize) {
                *index = new_index;
            }
        }
        self.positions = positions;
        if has_colors {
            self.colors = colors;
        }

        log::debug!("merged {} duplicate vertices", removed);

        removed
    }
}

fn position_key(p: Point3D) -> [u32; 3] {
    // Adding 0.0 turns -0.0 into 0.0 so that both share a key.
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

#[cfg(test)]
use crate::math::point3;

#[test]
fn merge_duplicates() {
    // Two triangles forming a quad, with the shared edge duplicated.
    let mut mesh = Mesh::new(
        vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(1.0, 1.0, 0.0),
            point3(-0.0, 1.0, 0.0),
        ],
        vec![0, 1, 2, 3, 4, 5],
    )
    .with_colors(vec![
        Color::WHITE,
        Color::BLACK,
        Color::WHITE,
        Color::TRANSPARENT,
        Color::BLACK,
        Color::TRANSPARENT,
    ]);

    assert_eq!(mesh.edges().len(), 6);
    assert_eq!(mesh.merge_duplicate_vertices(), 2);
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
    assert_eq!(
        mesh.colors,
        vec![Color::WHITE, Color::BLACK, Color::WHITE, Color::BLACK]
    );
    assert_eq!(mesh.edges().len(), 5);

    assert_eq!(mesh.merge_duplicate_vertices(), 0);
}

#[test]
fn default_colors() {
    let mesh = Mesh::new(
        vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0)],
        Vec::new(),
    )
    .with_colors(vec![Color::BLACK]);

    assert!(!mesh.has_colors());
    assert_eq!(mesh.colors_or(Color::WHITE), vec![Color::WHITE; 2]);
    assert_eq!(mesh.num_triangles(), 0);
}
