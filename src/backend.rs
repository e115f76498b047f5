use crate::math::Point3D;
use crate::Color;

/// The receiving end of a [`GeometryBuffer`](struct.GeometryBuffer.html).
///
/// A backend typically owns GPU buffers: an index buffer holding the
/// "lines adjacency" stream of the curves, and vertex buffers holding the
/// positions and colors of the points, which the line and marker programs read.
pub trait Backend {
    /// Replaces the index stream. Called when the curves change.
    fn upload_indices(&mut self, indices: &[u32]);

    /// Replaces the positions and colors of all points. Both slices have the same
    /// length.
    fn upload_points(&mut self, positions: &[Point3D], colors: &[Color]);
}

impl<'l, B: Backend + ?Sized> Backend for &'l mut B {
    fn upload_indices(&mut self, indices: &[u32]) {
        (**self).upload_indices(indices);
    }

    fn upload_points(&mut self, positions: &[Point3D], colors: &[Color]) {
        (**self).upload_points(positions, colors);
    }
}

/// A backend that keeps a copy of everything it receives.
///
/// Useful for tests, and as a starting point for CPU rasterizers.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    positions: Vec<Point3D>,
    colors: Vec<Color>,
    indices: Vec<u32>,
    index_uploads: usize,
    point_uploads: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Point3D] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of times the index stream was uploaded.
    pub fn index_uploads(&self) -> usize {
        self.index_uploads
    }

    /// Number of times the points were uploaded.
    pub fn point_uploads(&self) -> usize {
        self.point_uploads
    }
}

impl Backend for MemoryBackend {
    fn upload_indices(&mut self, indices: &[u32]) {
        self.indices.clear();
        self.indices.extend_from_slice(indices);
        self.index_uploads += 1;
    }

    fn upload_points(&mut self, positions: &[Point3D], colors: &[Color]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.colors.clear();
        self.colors.extend_from_slice(colors);
        self.point_uploads += 1;
    }
}

#[test]
fn memory_backend_copies() {
    use crate::math::point3;

    let mut backend = MemoryBackend::new();
    backend.upload_indices(&[0, 0, 1, 1]);
    backend.upload_points(&[point3(1.0, 2.0, 3.0)], &[Color::BLACK]);
    backend.upload_points(&[point3(4.0, 5.0, 6.0)], &[Color::WHITE]);

    assert_eq!(backend.indices(), &[0, 0, 1, 1]);
    assert_eq!(backend.positions(), &[point3(4.0, 5.0, 6.0)]);
    assert_eq!(backend.colors(), &[Color::WHITE]);
    assert_eq!(backend.index_uploads(), 1);
    assert_eq!(backend.point_uploads(), 2);

    fn clear_indices<B: Backend>(mut backend: B) {
        backend.upload_indices(&[]);
    }

    clear_indices(&mut backend);
    assert_eq!(backend.index_uploads(), 2);
    assert!(backend.indices().is_empty());
}
