use crate::curves::{expand, CurveError, PointIndex, Trail};
use crate::math::Point3D;
use crate::{Backend, Color};

use thiserror::Error;

/// Errors detected when setting a geometry buffer up.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SetupError {
    #[error("Got {positions} positions but {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
    #[error(transparent)]
    Curve(#[from] CurveError),
}

/// The points and curves to render, mirrored into a [`Backend`](trait.Backend.html).
///
/// Positions and colors are parallel arrays: point `i` has position `positions()[i]`
/// and color `colors()[i]`. The curves reference points by index and are laid out
/// as a "lines adjacency" index stream (see `thicklines_curves::expand`).
///
/// The curves only change through [`reset`](#method.reset), which rebuilds
/// everything. Positions and colors can be changed at any time within an update
/// bracket, see [`begin_update`](#method.begin_update).
pub struct GeometryBuffer<B: Backend> {
    positions: Vec<Point3D>,
    colors: Vec<Color>,
    curves: Vec<Trail>,
    indices: Vec<PointIndex>,
    backend: B,
}

impl<B: Backend> GeometryBuffer<B> {
    /// Creates an empty buffer. Nothing is uploaded.
    pub fn new(backend: B) -> Self {
        GeometryBuffer {
            positions: Vec::new(),
            colors: Vec::new(),
            curves: Vec::new(),
            indices: Vec::new(),
            backend,
        }
    }

    /// Creates a buffer and uploads its content.
    pub fn with_curves(
        backend: B,
        positions: Vec<Point3D>,
        colors: Vec<Color>,
        curves: Vec<Trail>,
    ) -> Result<Self, SetupError> {
        let mut buffer = GeometryBuffer::new(backend);
        buffer.reset(positions, colors, curves)?;

        Ok(buffer)
    }

    /// Replaces all points and curves, and uploads the result.
    ///
    /// Fails if the number of colors differs from the number of positions or if a
    /// curve references a point that does not exist. The buffer and the backend
    /// are left untouched in that case.
    pub fn reset(
        &mut self,
        positions: Vec<Point3D>,
        colors: Vec<Color>,
        curves: Vec<Trail>,
    ) -> Result<(), SetupError> {
        if positions.len() != colors.len() {
            return Err(SetupError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        expand::validate_curves(&curves, positions.len())?;

        self.indices = expand::adjacency_indices(&curves);
        self.positions = positions;
        self.colors = colors;
        self.curves = curves;

        log::debug!(
            "geometry buffer reset: {} points, {} curves, {} segments",
            self.positions.len(),
            self.curves.len(),
            self.num_segments(),
        );

        self.backend.upload_indices(&self.indices);
        self.backend.upload_points(&self.positions, &self.colors);

        Ok(())
    }

    /// Opens an update bracket.
    ///
    /// The returned guard gives write access to positions and colors. Changes are
    /// uploaded once, when the guard is ended or dropped.
    pub fn begin_update(&mut self) -> Updates<'_, B> {
        Updates {
            buffer: self,
            flushed: false,
        }
    }

    #[inline]
    pub fn positions(&self) -> &[Point3D] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[inline]
    pub fn curves(&self) -> &[Trail] {
        &self.curves
    }

    /// The "lines adjacency" index stream, four indices per segment.
    #[inline]
    pub fn indices(&self) -> &[PointIndex] {
        &self.indices
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn num_segments(&self) -> usize {
        self.indices.len() / 4
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn flush(&mut self) {
        log::trace!("uploading {} points", self.positions.len());
        self.backend.upload_points(&self.positions, &self.colors);
    }
}

/// An update bracket, see [`GeometryBuffer::begin_update`](struct.GeometryBuffer.html#method.begin_update).
///
/// Holds exclusive access to the buffer: nothing can read the points while
/// they are being modified. The number of points cannot change.
///
/// Indices out of range are a programming error and panic.
pub struct Updates<'l, B: Backend> {
    buffer: &'l mut GeometryBuffer<B>,
    flushed: bool,
}

impl<'l, B: Backend> Updates<'l, B> {
    #[inline]
    pub fn set_position(&mut self, index: PointIndex, position: Point3D) {
        self.buffer.positions[index as usize] = position;
    }

    #[inline]
    pub fn set_color(&mut self, index: PointIndex, color: Color) {
        self.buffer.colors[index as usize] = color;
    }

    #[inline]
    pub fn set_vertex(&mut self, index: PointIndex, position: Point3D, color: Color) {
        self.set_position(index, position);
        self.set_color(index, color);
    }

    #[inline]
    pub fn position(&self, index: PointIndex) -> Point3D {
        self.buffer.positions[index as usize]
    }

    #[inline]
    pub fn color(&self, index: PointIndex) -> Color {
        self.buffer.colors[index as usize]
    }

    /// All positions, for bulk updates.
    pub fn positions_mut(&mut self) -> &mut [Point3D] {
        &mut self.buffer.positions
    }

    /// All colors, for bulk updates.
    pub fn colors_mut(&mut self) -> &mut [Color] {
        &mut self.buffer.colors
    }

    /// Closes the bracket and uploads the points.
    pub fn end(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        if !self.flushed {
            self.flushed = true;
            self.buffer.flush();
        }
    }
}

impl<'l, B: Backend> Drop for Updates<'l, B> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
use crate::math::point3;
#[cfg(test)]
use crate::MemoryBackend;

#[cfg(test)]
fn triangle_buffer() -> GeometryBuffer<MemoryBackend> {
    GeometryBuffer::with_curves(
        MemoryBackend::new(),
        vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
        ],
        vec![Color::WHITE, Color::BLACK, Color::TRANSPARENT],
        vec![Trail::from(vec![0, 1, 2, 0])],
    )
    .unwrap()
}

#[test]
fn setup_uploads_everything() {
    let buffer = triangle_buffer();

    assert_eq!(buffer.num_points(), 3);
    assert_eq!(buffer.num_segments(), 3);
    assert_eq!(
        buffer.indices(),
        &[0, 0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 0]
    );

    let backend = buffer.backend();
    assert_eq!(backend.indices(), buffer.indices());
    assert_eq!(backend.positions(), buffer.positions());
    assert_eq!(backend.colors(), buffer.colors());
    assert_eq!(backend.index_uploads(), 1);
    assert_eq!(backend.point_uploads(), 1);
}

#[test]
fn update_round_trip() {
    let mut buffer = triangle_buffer();
    let before = buffer.backend().positions().to_vec();

    let mut updates = buffer.begin_update();
    updates.set_position(0, point3(5.0, 5.0, 5.0));
    assert_eq!(updates.position(0), point3(5.0, 5.0, 5.0));
    updates.end();

    let backend = buffer.backend();
    assert_eq!(backend.point_uploads(), 2);
    assert_eq!(backend.positions()[0], point3(5.0, 5.0, 5.0));
    assert_eq!(&backend.positions()[1..], &before[1..]);
    assert_eq!(
        backend.colors(),
        &[Color::WHITE, Color::BLACK, Color::TRANSPARENT]
    );
    // The topology did not change.
    assert_eq!(backend.index_uploads(), 1);
}

#[test]
fn dropping_the_bracket_flushes() {
    let mut buffer = triangle_buffer();

    {
        let mut updates = buffer.begin_update();
        updates.set_vertex(1, point3(2.0, 0.0, 0.0), Color::WHITE);
        updates.set_color(2, Color::BLACK);
    }

    let backend = buffer.backend();
    assert_eq!(backend.point_uploads(), 2);
    assert_eq!(backend.positions()[1], point3(2.0, 0.0, 0.0));
    assert_eq!(
        backend.colors(),
        &[Color::WHITE, Color::WHITE, Color::BLACK]
    );
}

#[test]
fn empty_bracket_still_flushes_once() {
    let mut buffer = triangle_buffer();
    buffer.begin_update().end();
    assert_eq!(buffer.backend().point_uploads(), 2);
}

#[test]
fn bulk_updates() {
    let mut buffer = triangle_buffer();

    let mut updates = buffer.begin_update();
    for p in updates.positions_mut() {
        p.z = 1.0;
    }
    for c in updates.colors_mut() {
        *c = Color::BLACK;
    }
    updates.end();

    assert!(buffer.backend().positions().iter().all(|p| p.z == 1.0));
    assert!(buffer.backend().colors().iter().all(|c| *c == Color::BLACK));
}

#[test]
#[should_panic]
fn update_out_of_range() {
    let mut buffer = triangle_buffer();
    let mut updates = buffer.begin_update();
    updates.set_position(3, point3(0.0, 0.0, 0.0));
}

#[test]
fn setup_errors() {
    let mut buffer = triangle_buffer();

    let result = buffer.reset(
        vec![point3(0.0, 0.0, 0.0); 2],
        vec![Color::WHITE; 3],
        Vec::new(),
    );
    assert_eq!(
        result,
        Err(SetupError::LengthMismatch {
            positions: 2,
            colors: 3
        })
    );

    let result = buffer.reset(
        vec![point3(0.0, 0.0, 0.0); 2],
        vec![Color::WHITE; 2],
        vec![Trail::from(vec![0, 1]), Trail::from(vec![1, 2])],
    );
    assert_eq!(
        result,
        Err(SetupError::Curve(CurveError::IndexOutOfRange {
            curve: 1,
            index: 2,
            len: 2
        }))
    );

    // Left untouched.
    assert_eq!(buffer.num_points(), 3);
    assert_eq!(buffer.num_segments(), 3);
    assert_eq!(buffer.backend().index_uploads(), 1);
}

#[test]
fn empty_setup() {
    let buffer =
        GeometryBuffer::with_curves(MemoryBackend::new(), Vec::new(), Vec::new(), Vec::new())
            .unwrap();
    assert_eq!(buffer.num_segments(), 0);
    assert!(buffer.backend().indices().is_empty());
}
