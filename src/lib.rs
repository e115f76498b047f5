#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Thick, mitered poly-lines and point markers for mesh wireframes.
//!
//! # Crates
//!
//! This meta-crate (`thicklines`) reexports the following sub-crates for convenience:
//!
//! * **thicklines_geom** - Math types and small geometric helpers.
//! * **thicklines_curves** - Decomposition of mesh edges into curves and their
//!   "lines adjacency" index layout.
//! * **thicklines_tessellation** - Thick line and point marker tessellation.
//!
//! Each `thicklines_<name>` crate is reexported as a `<name>` module in `thicklines`.
//!
//! On top of them this crate provides:
//!
//! * [`GeometryBuffer`](struct.GeometryBuffer.html) - owns the positions and colors of
//!   the points and the index stream of the curves, and keeps a
//!   [`Backend`](trait.Backend.html) in sync with them through update brackets.
//! * [`ThickLines`](struct.ThickLines.html) - sets a geometry buffer up from a mesh or
//!   from explicit curves, and tessellates its curves and markers.
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Example
//!
//! ```
//! use thicklines::*;
//! use thicklines::math::*;
//! use thicklines::curves::Mesh;
//! use thicklines::tessellation::{LineVertex, VertexBuffers, BuffersBuilder};
//!
//! // A quad made of two triangles.
//! let mesh = Mesh::new(
//!     vec![
//!         point3(-0.5, -0.5, 0.0),
//!         point3(0.5, -0.5, 0.0),
//!         point3(0.5, 0.5, 0.0),
//!         point3(-0.5, 0.5, 0.0),
//!     ],
//!     vec![0, 1, 2, 0, 2, 3],
//! );
//!
//! let mut lines = ThickLines::from_mesh(MemoryBackend::new(), &mesh).unwrap();
//! // Five edges.
//! assert_eq!(lines.buffer().num_segments(), 5);
//!
//! // Move a point.
//! let mut updates = lines.begin_update();
//! updates.set_position(2, point3(0.6, 0.6, 0.0));
//! updates.end();
//! assert_eq!(lines.buffer().backend().positions()[2], point3(0.6, 0.6, 0.0));
//!
//! let mut geometry: VertexBuffers<LineVertex, u32> = VertexBuffers::new();
//! lines.draw_curves(
//!     &Transform3D::identity(),
//!     &mut BuffersBuilder::new(&mut geometry, |v: LineVertex| v),
//! ).unwrap();
//! assert!(geometry.indices.len() >= 5 * 6);
//! ```

pub extern crate thicklines_curves;
pub extern crate thicklines_geom;
pub extern crate thicklines_tessellation;

pub use thicklines_curves as curves;
pub use thicklines_geom as geom;
pub use thicklines_tessellation as tessellation;

pub use geom::math;
pub use geom::Color;

mod backend;
mod buffer;
mod renderer;

#[doc(inline)]
pub use crate::backend::{Backend, MemoryBackend};

#[doc(inline)]
pub use crate::buffer::{GeometryBuffer, SetupError, Updates};

#[doc(inline)]
pub use crate::renderer::ThickLines;
