#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Curves made of mesh edges.
//!
//! Rendering the wireframe of a mesh with thick lines works much better when the
//! edges are drawn as long continuous poly-lines rather than as isolated segments:
//! joints between consecutive segments get proper miters instead of overlapping
//! butt ends. This crate provides:
//!
//! * [`EdgeSet`](struct.EdgeSet.html) - the deduplicated, undirected edges of a
//!   triangle mesh.
//! * [`CurveDecomposer`](decompose/struct.CurveDecomposer.html) - splits an edge set
//!   into [`Trail`](struct.Trail.html)s that use every edge exactly once.
//! * The [`expand`](expand/index.html) module - lays trails out as a stream of
//!   4-index windows (previous, start, end, next), the "lines adjacency" layout
//!   consumed by the thick line tessellator.
//! * [`Mesh`](struct.Mesh.html) - a minimal triangle mesh to extract edges from.
//!
//! ## Example
//!
//! ```
//! use thicklines_curves::{decompose, expand, EdgeSet};
//!
//! // A square.
//! let edges = EdgeSet::from_pairs(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
//! let trails = decompose(&edges);
//!
//! assert_eq!(trails.len(), 1);
//! assert_eq!(trails[0].indices(), &[0, 1, 2, 3, 0]);
//!
//! let indices = expand::adjacency_indices(&trails);
//! // One window of four indices per edge.
//! assert_eq!(indices.len(), 4 * 4);
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub extern crate thicklines_geom as geom;

pub mod decompose;
mod edge;
mod error;
pub mod expand;
mod graph;
mod mesh;
mod trail;

pub use crate::geom::math;

#[doc(inline)]
pub use crate::decompose::{decompose, CurveDecomposer, DecomposerState};

#[doc(inline)]
pub use crate::edge::{Edge, EdgeSet};

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::graph::{AdjacencyGraph, EdgeId};

#[doc(inline)]
pub use crate::mesh::Mesh;

#[doc(inline)]
pub use crate::trail::Trail;

/// Index of a point in the position and color arrays.
pub type PointIndex = u32;
