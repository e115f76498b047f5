use crate::{Edge, EdgeSet, PointIndex};

/// Index of an edge in an [`AdjacencyGraph`](struct.AdjacencyGraph.html).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// Undirected graph stored as flat arrays indexed by slot and edge ids.
///
/// Only points that have at least one edge get a slot, in ascending index
/// order, so the storage does not depend on how large the point indices are.
/// Each point has the list of its neighbors sorted by ascending index. Edges are
/// never removed: traversal marks them as used instead, which leaves the
/// neighborhood of a visited point intact for later traversals.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyGraph {
    // Sorted, deduplicated endpoints. points[slot] is the point stored in slot.
    points: Vec<PointIndex>,
    // neighbors[slot] is sorted by neighbor index.
    neighbors: Vec<Vec<(PointIndex, EdgeId)>>,
    edges: Vec<Edge>,
    used: Vec<bool>,
    // Per slot, position of the first neighbor entry that may still be unused.
    // Edges only ever go from unused to used, so this only moves forward.
    cursors: Vec<u32>,
    num_used: usize,
}

impl AdjacencyGraph {
    pub fn new(edges: &EdgeSet) -> Self {
        let mut points = Vec::with_capacity(edges.len() * 2);
        for edge in edges.iter() {
            let (a, b) = edge.endpoints();
            points.push(a);
            points.push(b);
        }
        points.sort_unstable();
        points.dedup();

        let mut neighbors = vec![Vec::new(); points.len()];
        let mut edge_list = Vec::with_capacity(edges.len());

        for edge in edges.iter() {
            let id = EdgeId(edge_list.len() as u32);
            let (a, b) = edge.endpoints();
            // Both endpoints were collected above.
            if let (Ok(slot_a), Ok(slot_b)) =
                (points.binary_search(&a), points.binary_search(&b))
            {
                neighbors[slot_a].push((b, id));
                neighbors[slot_b].push((a, id));
            }
            edge_list.push(edge);
        }

        for list in &mut neighbors {
            list.sort_unstable();
        }

        AdjacencyGraph {
            cursors: vec![0; points.len()],
            points,
            neighbors,
            used: vec![false; edge_list.len()],
            edges: edge_list,
            num_used: 0,
        }
    }

    #[inline]
    fn slot(&self, p: PointIndex) -> Option<usize> {
        self.points.binary_search(&p).ok()
    }

    /// Number of distinct points that have an edge.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn num_used_edges(&self) -> usize {
        self.num_used
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id.to_usize()]
    }

    #[inline]
    pub fn is_used(&self, id: EdgeId) -> bool {
        self.used[id.to_usize()]
    }

    /// Number of edges incident to `p`, used or not.
    pub fn degree(&self, p: PointIndex) -> usize {
        self.slot(p).map_or(0, |slot| self.neighbors[slot].len())
    }

    /// Neighbors of `p` in ascending order.
    pub fn neighbors(&self, p: PointIndex) -> impl Iterator<Item = PointIndex> + '_ {
        self.slot(p)
            .into_iter()
            .flat_map(move |slot| self.neighbors[slot].iter().map(|&(n, _)| n))
    }

    /// Points with at least one incident edge, in ascending order.
    pub fn points(&self) -> impl Iterator<Item = PointIndex> + '_ {
        self.points.iter().copied()
    }

    /// The lowest neighbor of `p` connected through an unused edge.
    pub fn first_unused_edge(&self, p: PointIndex) -> Option<(PointIndex, EdgeId)> {
        let slot = self.slot(p)?;
        let list = &self.neighbors[slot];
        let start = self.cursors[slot] as usize;
        list[start..]
            .iter()
            .find(|&&(_, id)| !self.is_used(id))
            .copied()
    }

    /// Marks the lowest unused edge of `p` as used and returns the neighbor at
    /// the other end.
    pub fn take_unused_edge(&mut self, p: PointIndex) -> Option<PointIndex> {
        let slot = self.slot(p)?;
        let list = &self.neighbors[slot];
        let mut cursor = self.cursors[slot] as usize;
        while cursor < list.len() {
            let (neighbor, id) = list[cursor];
            if !self.used[id.to_usize()] {
                self.used[id.to_usize()] = true;
                self.num_used += 1;
                self.cursors[slot] = cursor as u32 + 1;
                return Some(neighbor);
            }
            cursor += 1;
        }

        self.cursors[slot] = cursor as u32;

        None
    }

    /// Marks an edge as used. Returns false if it already was.
    pub fn mark_used(&mut self, id: EdgeId) -> bool {
        let used = &mut self.used[id.to_usize()];
        if *used {
            return false;
        }
        *used = true;
        self.num_used += 1;

        true
    }
}

#[test]
fn sorted_neighbors() {
    let edges = EdgeSet::from_pairs(&[(4, 1), (1, 0), (2, 1), (3, 0)]);
    let graph = AdjacencyGraph::new(&edges);

    assert_eq!(graph.num_points(), 5);
    assert_eq!(graph.num_edges(), 4);
    assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(graph.degree(4), 1);
    assert_eq!(graph.degree(42), 0);
    assert_eq!(graph.neighbors(42).count(), 0);
    assert_eq!(graph.points().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn isolated_points_are_not_listed() {
    let edges = EdgeSet::from_pairs(&[(0, 3)]);
    let mut graph = AdjacencyGraph::new(&edges);
    assert_eq!(graph.points().collect::<Vec<_>>(), vec![0, 3]);
    assert_eq!(graph.num_points(), 2);
    assert_eq!(graph.degree(1), 0);
    assert_eq!(graph.take_unused_edge(1), None);
}

#[test]
fn storage_follows_distinct_points() {
    let far = u32::MAX - 1;
    let edges = EdgeSet::from_pairs(&[(0, far), (far, 7)]);
    let graph = AdjacencyGraph::new(&edges);

    assert_eq!(graph.num_points(), 3);
    assert_eq!(graph.points().collect::<Vec<_>>(), vec![0, 7, far]);
    assert_eq!(graph.neighbors(far).collect::<Vec<_>>(), vec![0, 7]);
    assert_eq!(graph.degree(far), 2);
}

#[test]
fn used_edges_block_traversal() {
    let edges = EdgeSet::from_pairs(&[(0, 1), (0, 2), (1, 2)]);
    let mut graph = AdjacencyGraph::new(&edges);

    assert_eq!(graph.take_unused_edge(0), Some(1));
    // The edge is used from both ends.
    assert_eq!(graph.first_unused_edge(1).map(|(n, _)| n), Some(2));
    assert_eq!(graph.take_unused_edge(1), Some(2));
    assert_eq!(graph.take_unused_edge(2), Some(0));
    assert_eq!(graph.take_unused_edge(0), None);
    assert_eq!(graph.first_unused_edge(2), None);
    assert_eq!(graph.num_used_edges(), 3);

    // Adjacency is left intact.
    assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn mark_used_once() {
    let edges = EdgeSet::from_pairs(&[(0, 1)]);
    let mut graph = AdjacencyGraph::new(&edges);
    let (_, id) = graph.first_unused_edge(0).unwrap();
    assert_eq!(graph.edge(id), Edge::new(0, 1).unwrap());
    assert!(graph.mark_used(id));
    assert!(!graph.mark_used(id));
    assert!(graph.is_used(id));
    assert_eq!(graph.take_unused_edge(1), None);
}
