//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The tessellators don't know anything about the vertex layout of the renderer that
//! consumes their output. Instead they talk to a geometry builder, which decides how
//! the vertices and triangles are stored:
//!
//! * [`GeometryBuilder`](trait.GeometryBuilder.html)
//! * [`LineGeometryBuilder`](trait.LineGeometryBuilder.html)
//! * [`MarkerGeometryBuilder`](trait.MarkerGeometryBuilder.html)
//!
//! It is very common to push vertices and indices into a pair of vectors, so this module
//! also provides:
//!
//! * The struct [`VertexBuffers`](struct.VertexBuffers.html), a simple pair of vectors of
//!   vertices and indices (generic parameters).
//! * The struct [`BuffersBuilder`](struct.BuffersBuilder.html) which writes into a
//!   [`VertexBuffers`](struct.VertexBuffers.html) and implements the geometry builder
//!   traits. Producing the actual vertex values is delegated to a vertex constructor:
//!   [`LineVertexConstructor`](trait.LineVertexConstructor.html) or
//!   [`MarkerVertexConstructor`](trait.MarkerVertexConstructor.html). Closures can be used
//!   as vertex constructors.
//!
//! ## Generating custom vertices
//!
//! ```
//! use thicklines_tessellation::*;
//! use thicklines_tessellation::math::*;
//! use thicklines_tessellation::geom::Color;
//!
//! // The vertex layout expected by the shaders.
//! #[derive(Copy, Clone, Debug)]
//! pub struct GpuVertex {
//!     position: [f32; 4],
//!     color: [f32; 4],
//!     uv: [f32; 2],
//! }
//!
//! struct ToGpuVertex;
//!
//! impl LineVertexConstructor<GpuVertex> for ToGpuVertex {
//!     fn new_vertex(&mut self, vertex: LineVertex) -> GpuVertex {
//!         GpuVertex {
//!             position: vertex.clip_position(),
//!             color: vertex.color().to_array(),
//!             uv: vertex.tex_coord().to_array(),
//!         }
//!     }
//! }
//!
//! let mut output: VertexBuffers<GpuVertex, u32> = VertexBuffers::new();
//! let window = SegmentWindow {
//!     points: [
//!         clip_point(0.0, 0.0, 0.0, 1.0),
//!         clip_point(0.0, 0.0, 0.0, 1.0),
//!         clip_point(0.5, 0.0, 0.0, 1.0),
//!         clip_point(0.5, 0.0, 0.0, 1.0),
//!     ],
//!     colors: [Color::WHITE, Color::BLACK],
//! };
//!
//! ThickLineTessellator::new().tessellate_segment(
//!     &window,
//!     &StrokeOptions::default(),
//!     &mut BuffersBuilder::new(&mut output, ToGpuVertex),
//! ).unwrap();
//!
//! assert_eq!(output.vertices.len(), 4);
//! assert_eq!(output.indices.len(), 6);
//! ```

pub use crate::error::GeometryBuilderError;
use crate::math::Point;
use crate::{Index, LineVertex, MarkerVertex, VertexId};

use core::convert::From;
use core::ops::Add;

/// Number of vertices and indices added during a tessellation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Count {
    pub vertices: u32,
    pub indices: u32,
}

impl Add for Count {
    type Output = Count;
    fn add(self, other: Count) -> Count {
        Count {
            vertices: self.vertices + other.vertices,
            indices: self.indices + other.indices,
        }
    }
}

/// An interface separating tessellators and other geometry generation algorithms from the
/// actual vertex construction.
///
/// Depending on which tessellator a geometry builder interfaces with, it also has to
/// implement one of the following traits (which contain the hooks to generate vertices):
///  - [`LineGeometryBuilder`](trait.LineGeometryBuilder.html)
///  - [`MarkerGeometryBuilder`](trait.MarkerGeometryBuilder.html)
pub trait GeometryBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self);

    /// Called at the end of a generation.
    /// Returns the number of vertices and indices added since the last time begin_geometry was
    /// called.
    fn end_geometry(&mut self) -> Count;

    /// Insert a triangle made of vertices that were added after the last call to begin_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// abort_geometry is called instead of end_geometry if an error occurred while producing
    /// the geometry and we won't be able to finish.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self);
}

/// A geometry builder to interface with the
/// [`ThickLineTessellator`](../struct.ThickLineTessellator.html).
pub trait LineGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns its id, only valid between begin_geometry and
    /// end_geometry.
    fn add_line_vertex(&mut self, vertex: LineVertex) -> Result<VertexId, GeometryBuilderError>;
}

/// A geometry builder to interface with the
/// [`PointMarkerTessellator`](../struct.PointMarkerTessellator.html).
pub trait MarkerGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns its id, only valid between begin_geometry and
    /// end_geometry.
    fn add_marker_vertex(
        &mut self,
        vertex: MarkerVertex,
    ) -> Result<VertexId, GeometryBuilderError>;
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// A temporary view on a `VertexBuffers` object which facilitates the population of vertex
/// and index data.
///
/// `BuffersBuilders` record the vertex offset from when they are created so that algorithms
/// using them don't need to worry about offsetting indices if some geometry was added
/// beforehand.
///
/// The vertex constructor does the translation from the tessellator's vertex type
/// to `OutputVertex`.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: Index,
    first_index: Index,
    vertex_offset: Index,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as Index;
        let first_index = buffers.indices.len() as Index;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_offset: 0,
            vertex_constructor: ctor,
        }
    }

    pub fn with_vertex_offset(mut self, offset: Index) -> Self {
        self.vertex_offset = offset;

        self
    }

    pub fn buffers<'a, 'b: 'a>(&'b self) -> &'a VertexBuffers<OutputVertex, OutputIndex> {
        self.buffers
    }

    fn push_vertex(&mut self, vertex: OutputVertex) -> Result<VertexId, GeometryBuilderError>
    where
        OutputIndex: MaxIndex,
    {
        self.buffers.vertices.push(vertex);
        let len = self.buffers.vertices.len();
        if len > OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        Ok(VertexId((len - 1) as Index))
    }
}

/// A trait specifying how to create vertex values.
pub trait LineVertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: LineVertex) -> OutputVertex;
}

/// A trait specifying how to create vertex values.
pub trait MarkerVertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: MarkerVertex) -> OutputVertex;
}

/// A simple vertex constructor that just takes the position.
pub struct Positions;

impl LineVertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: LineVertex) -> Point {
        vertex.position()
    }
}

impl MarkerVertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: MarkerVertex) -> Point {
        vertex.position()
    }
}

impl<F, OutputVertex> LineVertexConstructor<OutputVertex> for F
where
    F: Fn(LineVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: LineVertex) -> OutputVertex {
        self(vertex)
    }
}

impl<F, OutputVertex> MarkerVertexConstructor<OutputVertex> for F
where
    F: Fn(MarkerVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: MarkerVertex) -> OutputVertex {
        self(vertex)
    }
}

/// A `BuffersBuilder` that only keeps the positions.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point, u16, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point, u16>) -> SimpleBuffersBuilder<'_> {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> GeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as Index;
        self.first_index = self.buffers.indices.len() as Index;
    }

    fn end_geometry(&mut self) -> Count {
        Count {
            vertices: self.buffers.vertices.len() as u32 - self.first_vertex,
            indices: self.buffers.indices.len() as u32 - self.first_index,
        }
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.buffers.indices.push((a + self.vertex_offset).into());
        self.buffers.indices.push((b + self.vertex_offset).into());
        self.buffers.indices.push((c + self.vertex_offset).into());
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }
}

impl<'l, OutputVertex, OutputIndex, Ctor> LineGeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
    Ctor: LineVertexConstructor<OutputVertex>,
{
    fn add_line_vertex(&mut self, vertex: LineVertex) -> Result<VertexId, GeometryBuilderError> {
        let vertex = self.vertex_constructor.new_vertex(vertex);
        self.push_vertex(vertex)
    }
}

impl<'l, OutputVertex, OutputIndex, Ctor> MarkerGeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
    Ctor: MarkerVertexConstructor<OutputVertex>,
{
    fn add_marker_vertex(
        &mut self,
        vertex: MarkerVertex,
    ) -> Result<VertexId, GeometryBuilderError> {
        let vertex = self.vertex_constructor.new_vertex(vertex);
        self.push_vertex(vertex)
    }
}

/// A geometry builder that does not output any geometry.
///
/// Mostly useful for testing.
pub struct NoOutput {
    next_vertex: u32,
    num_indices: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput {
            next_vertex: 0,
            num_indices: 0,
        }
    }

    fn next_id(&mut self) -> Result<VertexId, GeometryBuilderError> {
        if self.next_vertex == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.next_vertex += 1;
        Ok(VertexId(self.next_vertex - 1))
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.next_vertex = 0;
        self.num_indices = 0;
    }

    fn end_geometry(&mut self) -> Count {
        Count {
            vertices: self.next_vertex,
            indices: self.num_indices,
        }
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        self.num_indices += 3;
    }

    fn abort_geometry(&mut self) {}
}

impl LineGeometryBuilder for NoOutput {
    fn add_line_vertex(&mut self, _: LineVertex) -> Result<VertexId, GeometryBuilderError> {
        self.next_id()
    }
}

impl MarkerGeometryBuilder for NoOutput {
    fn add_marker_vertex(&mut self, _: MarkerVertex) -> Result<VertexId, GeometryBuilderError> {
        self.next_id()
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the tessellators can't internally represent more
/// than u32::MAX indices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
// The tessellators internally use u32 indices so we can't have more than u32::MAX
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}

#[test]
fn abort_discards_partial_geometry() {
    use crate::math::point;
    use crate::geom::Color;

    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    buffers.vertices.push(point(0.0, 0.0));

    let mut builder = simple_builder(&mut buffers);
    builder.begin_geometry();
    let vertex = LineVertex {
        position: point(1.0, 2.0),
        color: Color::WHITE,
        tex_coord: point(0.0, 0.0),
    };
    let a = builder.add_line_vertex(vertex).unwrap();
    let b = builder.add_line_vertex(vertex).unwrap();
    let c = builder.add_line_vertex(vertex).unwrap();
    assert_eq!((a, b, c), (VertexId(1), VertexId(2), VertexId(3)));
    builder.add_triangle(a, b, c);
    builder.abort_geometry();

    assert_eq!(buffers.vertices.len(), 1);
    assert!(buffers.indices.is_empty());
}

#[test]
fn vertex_offset_applies_to_indices() {
    use crate::math::point;
    use crate::geom::Color;

    let mut buffers: VertexBuffers<LineVertex, u32> = VertexBuffers::new();
    let mut builder =
        BuffersBuilder::new(&mut buffers, |v: LineVertex| v).with_vertex_offset(10);
    builder.begin_geometry();
    let vertex = LineVertex {
        position: point(0.0, 0.0),
        color: Color::WHITE,
        tex_coord: point(0.0, 0.0),
    };
    let a = builder.add_line_vertex(vertex).unwrap();
    let b = builder.add_line_vertex(vertex).unwrap();
    let c = builder.add_line_vertex(vertex).unwrap();
    builder.add_triangle(a, b, c);
    let count = builder.end_geometry();

    assert_eq!(count, Count { vertices: 3, indices: 3 });
    assert_eq!(builder.buffers().vertices.len(), 3);
    assert_eq!(buffers.indices, vec![10, 11, 12]);
}

#[test]
fn too_many_vertices() {
    use crate::math::point;
    use crate::geom::Color;

    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    buffers
        .vertices
        .resize(u16::MAX as usize, point(0.0, 0.0));

    let mut builder = simple_builder(&mut buffers);
    builder.begin_geometry();
    let vertex = MarkerVertex {
        position: point(0.0, 0.0),
        color: Color::WHITE,
        tex_coord: point(0.0, 0.0),
    };
    assert_eq!(
        builder.add_marker_vertex(vertex),
        Err(GeometryBuilderError::TooManyVertices)
    );
}
