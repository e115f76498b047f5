use crate::curves::{decompose, Mesh, Trail};
use crate::math::{Point3D, Transform3D};
use crate::tessellation::{
    LineGeometryBuilder, MarkerGeometryBuilder, MarkerOptions, PointMarkerTessellator,
    StrokeOptions, TessellationResult, ThickLineTessellator,
};
use crate::{Backend, Color, GeometryBuffer, SetupError, Updates};

/// Renders the curves of a [`GeometryBuffer`](struct.GeometryBuffer.html) as thick
/// lines, and its points as round markers.
///
/// The curves are either given explicitly or extracted from the edges of a mesh.
/// The tint of the stroke and marker options is the global color multiplied into
/// every output color.
pub struct ThickLines<B: Backend> {
    buffer: GeometryBuffer<B>,
    stroke_options: StrokeOptions,
    marker_options: MarkerOptions,
    line_tessellator: ThickLineTessellator,
    marker_tessellator: PointMarkerTessellator,
}

impl<B: Backend> ThickLines<B> {
    /// Color of the points of meshes that don't have one color per vertex.
    pub const DEFAULT_MESH_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.3);

    /// Sets up explicit curves over the given points.
    pub fn from_curves(
        backend: B,
        positions: Vec<Point3D>,
        colors: Vec<Color>,
        curves: Vec<Trail>,
    ) -> Result<Self, SetupError> {
        Ok(ThickLines {
            buffer: GeometryBuffer::with_curves(backend, positions, colors, curves)?,
            stroke_options: StrokeOptions::default(),
            marker_options: MarkerOptions::default(),
            line_tessellator: ThickLineTessellator::new(),
            marker_tessellator: PointMarkerTessellator::new(),
        })
    }

    /// Sets up curves covering every edge of a mesh's triangles.
    ///
    /// Vertices are used as they are: call `Mesh::merge_duplicate_vertices` first if
    /// the mesh splits vertices that share a position, otherwise the curves break at
    /// each split.
    pub fn from_mesh(backend: B, mesh: &Mesh) -> Result<Self, SetupError> {
        let (colors, curves) = Self::mesh_curves(mesh);
        Self::from_curves(backend, mesh.positions.clone(), colors, curves)
    }

    /// Replaces all points and curves.
    pub fn reset(
        &mut self,
        positions: Vec<Point3D>,
        colors: Vec<Color>,
        curves: Vec<Trail>,
    ) -> Result<(), SetupError> {
        self.buffer.reset(positions, colors, curves)
    }

    /// Replaces all points and curves with the ones of a mesh.
    pub fn reset_from_mesh(&mut self, mesh: &Mesh) -> Result<(), SetupError> {
        let (colors, curves) = Self::mesh_curves(mesh);
        self.buffer.reset(mesh.positions.clone(), colors, curves)
    }

    pub fn with_stroke_options(mut self, options: StrokeOptions) -> Self {
        self.stroke_options = options;
        self
    }

    pub fn with_marker_options(mut self, options: MarkerOptions) -> Self {
        self.marker_options = options;
        self
    }

    pub fn stroke_options(&self) -> &StrokeOptions {
        &self.stroke_options
    }

    pub fn stroke_options_mut(&mut self) -> &mut StrokeOptions {
        &mut self.stroke_options
    }

    pub fn marker_options(&self) -> &MarkerOptions {
        &self.marker_options
    }

    pub fn marker_options_mut(&mut self) -> &mut MarkerOptions {
        &mut self.marker_options
    }

    /// Sets the tint of both the curves and the markers.
    pub fn set_tint(&mut self, tint: Color) {
        self.stroke_options.tint = tint;
        self.marker_options.tint = tint;
    }

    pub fn buffer(&self) -> &GeometryBuffer<B> {
        &self.buffer
    }

    /// Opens an update bracket on the points, see
    /// [`GeometryBuffer::begin_update`](struct.GeometryBuffer.html#method.begin_update).
    pub fn begin_update(&mut self) -> Updates<'_, B> {
        self.buffer.begin_update()
    }

    pub fn into_backend(self) -> B {
        self.buffer.into_backend()
    }

    /// Tessellates every curve, with `transform` as the model-view-projection matrix.
    pub fn draw_curves(
        &mut self,
        transform: &Transform3D,
        output: &mut dyn LineGeometryBuilder,
    ) -> TessellationResult {
        self.line_tessellator.tessellate_curves(
            self.buffer.positions(),
            self.buffer.colors(),
            self.buffer.indices(),
            transform,
            &self.stroke_options,
            output,
        )
    }

    /// Tessellates one marker per point, with `transform` as the
    /// model-view-projection matrix.
    pub fn draw_markers(
        &mut self,
        transform: &Transform3D,
        output: &mut dyn MarkerGeometryBuilder,
    ) -> TessellationResult {
        self.marker_tessellator.tessellate_points(
            self.buffer.positions(),
            self.buffer.colors(),
            transform,
            &self.marker_options,
            output,
        )
    }

    fn mesh_curves(mesh: &Mesh) -> (Vec<Color>, Vec<Trail>) {
        if !mesh.has_colors() && !mesh.colors.is_empty() {
            log::warn!(
                "{} colors for {} vertices, using the default color",
                mesh.colors.len(),
                mesh.positions.len(),
            );
        }
        let colors = mesh.colors_or(Self::DEFAULT_MESH_COLOR);

        let edges = mesh.edges();
        let curves = decompose(&edges);
        log::debug!(
            "{} triangles, {} edges, {} curves",
            mesh.num_triangles(),
            edges.len(),
            curves.len(),
        );

        (colors, curves)
    }
}

#[cfg(test)]
use crate::math::point3;
#[cfg(test)]
use crate::tessellation::geometry_builder::{
    simple_builder, BuffersBuilder, NoOutput, VertexBuffers,
};
#[cfg(test)]
use crate::tessellation::{GeometryBuilder, LineVertex, MarkerVertex};
#[cfg(test)]
use crate::MemoryBackend;

#[cfg(test)]
fn tetrahedron() -> Mesh {
    Mesh::new(
        vec![
            point3(0.0, 0.0, 0.0),
            point3(0.5, 0.0, 0.0),
            point3(0.0, 0.5, 0.0),
            point3(0.0, 0.0, 0.5),
        ],
        vec![0, 1, 2, 0, 1, 3, 0, 2, 3, 1, 2, 3],
    )
}

#[test]
fn mesh_setup() {
    let lines = ThickLines::from_mesh(MemoryBackend::new(), &tetrahedron()).unwrap();
    let buffer = lines.buffer();

    // Six edges, each covered once.
    assert_eq!(buffer.num_segments(), 6);
    let num_edges: usize = buffer.curves().iter().map(|c| c.edges().count()).sum();
    assert_eq!(num_edges, 6);
    assert!(buffer.curves().iter().all(|c| c.len() >= 2));

    // No colors in the mesh.
    assert_eq!(
        buffer.colors(),
        &[ThickLines::<MemoryBackend>::DEFAULT_MESH_COLOR; 4]
    );
    assert_eq!(buffer.backend().indices(), buffer.indices());
}

#[test]
fn mesh_colors_are_kept() {
    let colors = vec![Color::BLACK, Color::WHITE, Color::BLACK, Color::WHITE];
    let mesh = tetrahedron().with_colors(colors.clone());
    let lines = ThickLines::from_mesh(MemoryBackend::new(), &mesh).unwrap();
    assert_eq!(lines.buffer().colors(), &colors[..]);
}

#[test]
fn mesh_with_out_of_range_indices() {
    let mesh = Mesh::new(vec![point3(0.0, 0.0, 0.0); 2], vec![0, 1, 2]);
    let result = ThickLines::from_mesh(MemoryBackend::new(), &mesh);
    assert!(matches!(result, Err(SetupError::Curve(_))));
}

#[test]
fn draw() {
    let mut lines = ThickLines::from_mesh(MemoryBackend::new(), &tetrahedron())
        .unwrap()
        .with_stroke_options(StrokeOptions::thickness(2.0))
        .with_marker_options(MarkerOptions::radius(3.0));
    lines.set_tint(Color::new(1.0, 1.0, 1.0, 0.5));

    let mut geometry: VertexBuffers<LineVertex, u32> = VertexBuffers::new();
    lines
        .draw_curves(
            &Transform3D::identity(),
            &mut BuffersBuilder::new(&mut geometry, |v: LineVertex| v),
        )
        .unwrap();

    // At least one quad per edge, plus the caps of sharp joints.
    assert!(geometry.vertices.len() >= 6 * 4);
    assert_eq!(geometry.indices.len() % 3, 0);
    assert!(geometry.vertices.iter().all(|v| v.color().a == 0.15));

    let mut markers: VertexBuffers<MarkerVertex, u16> = VertexBuffers::new();
    lines
        .draw_markers(
            &Transform3D::identity(),
            &mut BuffersBuilder::new(&mut markers, |v: MarkerVertex| v),
        )
        .unwrap();
    assert_eq!(markers.vertices.len(), 4 * 4);
    assert_eq!(markers.indices.len(), 4 * 6);
}

#[test]
fn draw_follows_updates() {
    let mut lines = ThickLines::from_curves(
        MemoryBackend::new(),
        vec![point3(0.0, 0.0, 0.0), point3(0.5, 0.0, 0.0)],
        vec![Color::WHITE; 2],
        vec![Trail::from(vec![0, 1])],
    )
    .unwrap();

    let mut before: VertexBuffers<_, u16> = VertexBuffers::new();
    lines
        .draw_curves(&Transform3D::identity(), &mut simple_builder(&mut before))
        .unwrap();

    let mut updates = lines.begin_update();
    updates.set_position(1, point3(0.0, 0.5, 0.0));
    updates.end();

    let mut after: VertexBuffers<_, u16> = VertexBuffers::new();
    lines
        .draw_curves(&Transform3D::identity(), &mut simple_builder(&mut after))
        .unwrap();

    assert_eq!(before.vertices.len(), 4);
    assert_eq!(after.vertices.len(), 4);
    assert_ne!(before.vertices[2], after.vertices[2]);
    assert_eq!(lines.buffer().backend().point_uploads(), 2);
}

#[test]
fn empty_mesh() {
    let mut lines = ThickLines::from_mesh(MemoryBackend::new(), &Mesh::default()).unwrap();
    let mut output = NoOutput::new();
    lines
        .draw_curves(&Transform3D::identity(), &mut output)
        .unwrap();
    assert_eq!(output.end_geometry().vertices, 0);
}
