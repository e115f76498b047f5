//! Decomposition of an edge set into trails.
//!
//! Every edge ends up in exactly one trail. The decomposition is greedy: starting
//! from the lowest point that still has unused edges, a trail is extended through
//! the lowest unused edge of its last point until it gets stuck. For graphs
//! in which every point has an even degree, a connected component often collapses
//! into a single trail, but the number of trails is not minimized in general.
//!
//! The traversal is deterministic: the same edge set always produces the same
//! trails.
//!
//! ## Example
//!
//! ```
//! use thicklines_curves::{decompose, EdgeSet};
//!
//! // Two disjoint triangles.
//! let edges = EdgeSet::from_triangles(&[0, 1, 2, 3, 4, 5]);
//! let trails = decompose(&edges);
//!
//! assert_eq!(trails.len(), 2);
//! assert_eq!(trails[0].indices(), &[0, 1, 2, 0]);
//! assert_eq!(trails[1].indices(), &[3, 4, 5, 3]);
//! ```

use crate::{AdjacencyGraph, EdgeSet, PointIndex, Trail};

use std::collections::BTreeSet;

/// Decomposes an edge set into trails.
///
/// Shorthand for `CurveDecomposer::new(edges).run()`.
pub fn decompose(edges: &EdgeSet) -> Vec<Trail> {
    CurveDecomposer::new(edges).run()
}

/// Where the decomposer is in its traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecomposerState {
    /// Looking for the lowest point that may still have unused edges.
    SeekLiveVertex,
    /// Extending the current trail from `vertex`.
    ExtendTrail { vertex: PointIndex },
    /// `vertex` has no unused edge left: the current trail ends here.
    EmitTrail { vertex: PointIndex },
    /// All edges are used.
    Done,
}

/// Greedy trail builder, driven one transition at a time with
/// [`step`](#method.step) or to completion with [`run`](#method.run).
pub struct CurveDecomposer {
    graph: AdjacencyGraph,
    live: BTreeSet<PointIndex>,
    state: DecomposerState,
    current: Trail,
    trails: Vec<Trail>,
}

impl CurveDecomposer {
    pub fn new(edges: &EdgeSet) -> Self {
        let graph = AdjacencyGraph::new(edges);
        let live: BTreeSet<PointIndex> = graph.points().collect();

        log::debug!(
            "curve decomposition: {} edges, {} live points",
            graph.num_edges(),
            live.len(),
        );

        CurveDecomposer {
            graph,
            live,
            state: DecomposerState::SeekLiveVertex,
            current: Trail::new(),
            trails: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> DecomposerState {
        self.state
    }

    #[inline]
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// Points that may still have unused edges, in ascending order.
    pub fn live_points(&self) -> impl Iterator<Item = PointIndex> + '_ {
        self.live.iter().copied()
    }

    /// The trail being built.
    #[inline]
    pub fn current_trail(&self) -> &Trail {
        &self.current
    }

    /// The trails emitted so far.
    #[inline]
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == DecomposerState::Done
    }

    /// Performs a single transition and returns the new state.
    pub fn step(&mut self) -> DecomposerState {
        self.state = match self.state {
            DecomposerState::SeekLiveVertex => match self.live.iter().next().copied() {
                Some(vertex) => DecomposerState::ExtendTrail { vertex },
                None => {
                    self.flush_trail();
                    DecomposerState::Done
                }
            },
            DecomposerState::ExtendTrail { vertex } => {
                match self.graph.take_unused_edge(vertex) {
                    Some(next) => {
                        // Start with both ends of the first edge so that no
                        // trail ever has a single point.
                        if self.current.is_empty() {
                            self.current.push(vertex);
                        }
                        self.current.push(next);

                        DecomposerState::ExtendTrail { vertex: next }
                    }
                    None => DecomposerState::EmitTrail { vertex },
                }
            }
            DecomposerState::EmitTrail { vertex } => {
                self.flush_trail();
                // The edges of `vertex` are all used, though it remains in the
                // adjacency of other points.
                self.live.remove(&vertex);

                DecomposerState::SeekLiveVertex
            }
            DecomposerState::Done => DecomposerState::Done,
        };

        self.state
    }

    /// Runs the traversal to completion and returns the trails.
    pub fn run(mut self) -> Vec<Trail> {
        while !self.is_done() {
            self.step();
        }

        debug_assert_eq!(self.graph.num_used_edges(), self.graph.num_edges());
        log::debug!("curve decomposition: {} trails", self.trails.len());

        self.trails
    }

    fn flush_trail(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let trail = core::mem::take(&mut self.current);
        log::trace!("trail of {} points", trail.len());
        self.trails.push(trail);
    }
}

#[cfg(test)]
fn check_edge_cover(edges: &EdgeSet, trails: &[Trail]) {
    let mut covered = EdgeSet::new();
    let mut count = 0;
    for trail in trails {
        assert!(trail.len() >= 2, "unit trail {:?}", trail);
        for edge in trail.edges() {
            assert!(covered.insert(edge.from(), edge.to()), "{:?} used twice", edge);
            count += 1;
        }
        // No repeated consecutive points.
        assert_eq!(trail.edges().count(), trail.len() - 1);
    }
    assert_eq!(count, edges.len());
    assert_eq!(&covered, edges);
}

#[cfg(test)]
fn grid_triangles(w: u32, h: u32) -> Vec<u32> {
    let mut indices = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let a = y * (w + 1) + x;
            let b = a + 1;
            let c = a + w + 1;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

#[test]
fn square_is_a_single_trail() {
    let edges = EdgeSet::from_pairs(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let trails = decompose(&edges);

    assert_eq!(trails, vec![Trail::from(vec![0, 1, 2, 3, 0])]);
    check_edge_cover(&edges, &trails);
}

#[test]
fn disjoint_triangles() {
    let edges = EdgeSet::from_triangles(&[0, 1, 2, 5, 4, 3]);
    let trails = decompose(&edges);

    assert_eq!(trails.len(), 2);
    assert_eq!(trails[0].len(), 4);
    assert_eq!(trails[1].len(), 4);
    assert!(trails[0].is_closed());
    assert!(trails[1].is_closed());
    check_edge_cover(&edges, &trails);
}

#[test]
fn star_fragments() {
    // Not Eulerian: every branch becomes its own trail.
    let edges = EdgeSet::from_pairs(&[(0, 1), (0, 2), (0, 3)]);
    let trails = decompose(&edges);

    assert_eq!(
        trails,
        vec![
            Trail::from(vec![0, 1]),
            Trail::from(vec![0, 2]),
            Trail::from(vec![0, 3]),
        ]
    );
    check_edge_cover(&edges, &trails);
}

#[test]
fn complete_graph_is_not_minimal() {
    // K5: every point has degree 4, so a single trail exists. The greedy
    // traversal gets back to 0 too early and needs a second one.
    let mut edges = EdgeSet::new();
    for a in 0..5 {
        for b in (a + 1)..5 {
            edges.insert(a, b);
        }
    }
    let trails = decompose(&edges);

    assert_eq!(
        trails,
        vec![
            Trail::from(vec![0, 1, 2, 0, 3, 1, 4, 0]),
            Trail::from(vec![2, 3, 4, 2]),
        ]
    );
    check_edge_cover(&edges, &trails);
}

#[test]
fn grid_mesh_cover() {
    let edges = EdgeSet::from_triangles(&grid_triangles(7, 5));
    let trails = decompose(&edges);

    check_edge_cover(&edges, &trails);
    assert!(trails.len() < edges.len());
}

#[test]
fn deterministic() {
    let indices = grid_triangles(4, 6);
    let a = decompose(&EdgeSet::from_triangles(&indices));

    // Same edges inserted in reverse.
    let mut edges = EdgeSet::new();
    for tri in indices.chunks(3).rev() {
        edges.insert(tri[2], tri[1]);
        edges.insert(tri[1], tri[0]);
        edges.insert(tri[0], tri[2]);
    }
    let b = decompose(&edges);
    let c = decompose(&EdgeSet::from_triangles(&indices));

    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn sparse_indices() {
    // Points without edges are never part of a trail.
    let edges = EdgeSet::from_pairs(&[(10, 20), (20, 30)]);
    let trails = decompose(&edges);

    assert_eq!(trails, vec![Trail::from(vec![10, 20, 30])]);
    check_edge_cover(&edges, &trails);
}

#[test]
fn indices_near_the_top_of_the_range() {
    let far = u32::MAX - 1;
    let edges = EdgeSet::from_pairs(&[(0, far), (far, 7)]);
    let trails = decompose(&edges);

    assert_eq!(trails, vec![Trail::from(vec![0, far, 7])]);
    check_edge_cover(&edges, &trails);
}

#[test]
fn empty_input() {
    let edges = EdgeSet::new();
    let mut decomposer = CurveDecomposer::new(&edges);
    assert_eq!(decomposer.step(), DecomposerState::Done);
    assert!(decomposer.run().is_empty());
}

#[test]
fn state_transitions() {
    let edges = EdgeSet::from_pairs(&[(0, 1)]);
    let mut d = CurveDecomposer::new(&edges);

    assert_eq!(d.state(), DecomposerState::SeekLiveVertex);
    assert_eq!(d.live_points().collect::<Vec<_>>(), vec![0, 1]);

    assert_eq!(d.step(), DecomposerState::ExtendTrail { vertex: 0 });
    assert_eq!(d.step(), DecomposerState::ExtendTrail { vertex: 1 });
    assert_eq!(d.current_trail().indices(), &[0, 1]);

    // Stuck at 1.
    assert_eq!(d.step(), DecomposerState::EmitTrail { vertex: 1 });
    assert_eq!(d.step(), DecomposerState::SeekLiveVertex);
    assert_eq!(d.trails().len(), 1);
    assert!(d.current_trail().is_empty());
    assert_eq!(d.live_points().collect::<Vec<_>>(), vec![0]);

    // 0 is still live but has nothing left: nothing is emitted for it.
    assert_eq!(d.step(), DecomposerState::ExtendTrail { vertex: 0 });
    assert_eq!(d.step(), DecomposerState::EmitTrail { vertex: 0 });
    assert_eq!(d.step(), DecomposerState::SeekLiveVertex);
    assert_eq!(d.trails().len(), 1);

    assert_eq!(d.step(), DecomposerState::Done);
    assert_eq!(d.step(), DecomposerState::Done);
    assert_eq!(d.run(), vec![Trail::from(vec![0, 1])]);
}
