use crate::PointIndex;

use std::collections::BTreeSet;

/// An undirected edge between two distinct points.
///
/// The endpoints are stored sorted, so `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Edge {
    from: PointIndex,
    to: PointIndex,
}

impl Edge {
    /// Returns `None` for self-loops.
    #[inline]
    pub fn new(a: PointIndex, b: PointIndex) -> Option<Self> {
        if a == b {
            return None;
        }

        let (from, to) = if a < b { (a, b) } else { (b, a) };
        Some(Edge { from, to })
    }

    /// The smallest endpoint.
    #[inline]
    pub fn from(&self) -> PointIndex {
        self.from
    }

    /// The largest endpoint.
    #[inline]
    pub fn to(&self) -> PointIndex {
        self.to
    }

    #[inline]
    pub fn endpoints(&self) -> (PointIndex, PointIndex) {
        (self.from, self.to)
    }

    /// The endpoint that is not `p`, or `None` if `p` is not an endpoint.
    #[inline]
    pub fn opposite(&self, p: PointIndex) -> Option<PointIndex> {
        if p == self.from {
            Some(self.to)
        } else if p == self.to {
            Some(self.from)
        } else {
            None
        }
    }
}

/// A set of undirected edges.
///
/// Duplicates, in either orientation, collapse into a single edge. Iteration is
/// in ascending order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EdgeSet {
    edges: BTreeSet<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        EdgeSet {
            edges: BTreeSet::new(),
        }
    }

    /// Builds the edge set of a triangle list.
    ///
    /// Every three consecutive indices form a triangle; a trailing incomplete
    /// triangle is ignored. Edges shared by adjacent triangles appear once, and
    /// degenerate edges of degenerate triangles are dropped.
    pub fn from_triangles(indices: &[PointIndex]) -> Self {
        let mut set = EdgeSet::new();
        for tri in indices.chunks_exact(3) {
            set.insert(tri[0], tri[1]);
            set.insert(tri[1], tri[2]);
            set.insert(tri[2], tri[0]);
        }

        set
    }

    pub fn from_pairs(pairs: &[(PointIndex, PointIndex)]) -> Self {
        let mut set = EdgeSet::new();
        for &(a, b) in pairs {
            set.insert(a, b);
        }

        set
    }

    /// Returns true if the edge was not already in the set.
    ///
    /// Self-loops are ignored and return false.
    pub fn insert(&mut self, a: PointIndex, b: PointIndex) -> bool {
        match Edge::new(a, b) {
            Some(edge) => self.edges.insert(edge),
            None => false,
        }
    }

    pub fn contains(&self, a: PointIndex, b: PointIndex) -> bool {
        Edge::new(a, b).map_or(false, |edge| self.edges.contains(&edge))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }
}

impl core::iter::FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        EdgeSet {
            edges: iter.into_iter().collect(),
        }
    }
}

impl Extend<Edge> for EdgeSet {
    fn extend<T: IntoIterator<Item = Edge>>(&mut self, iter: T) {
        self.edges.extend(iter);
    }
}

#[test]
fn undirected_edges() {
    assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
    assert_eq!(Edge::new(2, 2), None);

    let e = Edge::new(5, 2).unwrap();
    assert_eq!(e.endpoints(), (2, 5));
    assert_eq!(e.opposite(2), Some(5));
    assert_eq!(e.opposite(5), Some(2));
    assert_eq!(e.opposite(4), None);
}

#[test]
fn shared_triangle_edges_collapse() {
    // Two triangles sharing the edge (1, 2).
    let set = EdgeSet::from_triangles(&[0, 1, 2, 2, 1, 3]);
    assert_eq!(set.len(), 5);
    assert!(set.contains(2, 1));
    assert!(set.contains(3, 2));
    assert!(!set.contains(0, 3));
}

#[test]
fn degenerate_triangles() {
    let set = EdgeSet::from_triangles(&[0, 0, 1, 4, 5]);
    assert_eq!(set.len(), 1);
    assert!(set.contains(0, 1));

    assert!(EdgeSet::from_triangles(&[]).is_empty());
}
