use crate::{Edge, PointIndex};

use core::ops::Deref;

/// A sequence of point indices in which consecutive pairs are edges.
///
/// A trail never repeats an edge but may visit a point several times. The trails
/// produced by the [decomposer](decompose/struct.CurveDecomposer.html) always
/// have at least two points; trails supplied by users may be shorter, in which
/// case they produce no geometry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Trail {
    indices: Vec<PointIndex>,
}

impl Trail {
    pub fn new() -> Self {
        Trail {
            indices: Vec::new(),
        }
    }

    #[inline]
    pub fn indices(&self) -> &[PointIndex] {
        &self.indices
    }

    #[inline]
    pub fn push(&mut self, index: PointIndex) {
        self.indices.push(index);
    }

    /// The first point, if any.
    #[inline]
    pub fn first(&self) -> Option<PointIndex> {
        self.indices.first().copied()
    }

    /// The last point, if any.
    #[inline]
    pub fn last(&self) -> Option<PointIndex> {
        self.indices.last().copied()
    }

    /// True if the trail ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.indices.len() > 2 && self.first() == self.last()
    }

    /// The edges between consecutive points.
    ///
    /// Pairs of identical consecutive indices are skipped since they are not
    /// edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.indices
            .windows(2)
            .filter_map(|pair| Edge::new(pair[0], pair[1]))
    }

    pub fn into_indices(self) -> Vec<PointIndex> {
        self.indices
    }
}

impl Deref for Trail {
    type Target = [PointIndex];
    fn deref(&self) -> &[PointIndex] {
        &self.indices
    }
}

impl AsRef<[PointIndex]> for Trail {
    fn as_ref(&self) -> &[PointIndex] {
        &self.indices
    }
}

impl From<Vec<PointIndex>> for Trail {
    fn from(indices: Vec<PointIndex>) -> Self {
        Trail { indices }
    }
}

impl From<&[PointIndex]> for Trail {
    fn from(indices: &[PointIndex]) -> Self {
        Trail {
            indices: indices.to_vec(),
        }
    }
}

impl core::iter::FromIterator<PointIndex> for Trail {
    fn from_iter<T: IntoIterator<Item = PointIndex>>(iter: T) -> Self {
        Trail {
            indices: iter.into_iter().collect(),
        }
    }
}

#[test]
fn trail_edges() {
    let trail = Trail::from(vec![0, 1, 2, 0]);
    assert!(trail.is_closed());
    assert_eq!(trail.len(), 4);
    assert_eq!(
        trail.edges().collect::<Vec<_>>(),
        vec![
            Edge::new(0, 1).unwrap(),
            Edge::new(1, 2).unwrap(),
            Edge::new(0, 2).unwrap(),
        ]
    );

    let open: Trail = [3, 4].iter().copied().collect();
    assert!(!open.is_closed());
    assert_eq!(open.first(), Some(3));
    assert_eq!(open.last(), Some(4));
}
