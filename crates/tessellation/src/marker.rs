use crate::geom::utils::{is_in_front, screen_space, smoothstep, to_device};
use crate::geom::Color;
use crate::geometry_builder::MarkerGeometryBuilder;
use crate::math::{point, vector, ClipPoint, Point, Point3D, Transform3D};
use crate::{MarkerOptions, TessellationError, TessellationResult, VertexId};

/// Distance from the center of the marker at which coverage reaches zero.
const MARKER_EDGE: f32 = 0.5;
/// Fraction of `MARKER_EDGE` under which the marker is fully opaque.
const MARKER_CORE: f32 = 0.2;

/// A vertex produced by the [`PointMarkerTessellator`](struct.PointMarkerTessellator.html).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerVertex {
    /// Position in normalized device coordinates.
    pub position: Point,
    pub color: Color,
    /// Position of the vertex on the marker's square, from `(0, 0)` to `(1, 1)`.
    pub tex_coord: Point,
}

impl MarkerVertex {
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn clip_position(&self) -> [f32; 4] {
        [self.position.x, self.position.y, 0.0, 1.0]
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn tex_coord(&self) -> Point {
        self.tex_coord
    }

    /// Opacity of the marker at this vertex, see [`marker_coverage`](fn.marker_coverage.html).
    #[inline]
    pub fn coverage(&self) -> f32 {
        marker_coverage(self.tex_coord)
    }
}

/// Opacity of a round marker at a given texture coordinate.
///
/// One at the center, fading to zero at a distance of `0.5`, which makes
/// the corners of the quad transparent.
pub fn marker_coverage(tex_coord: Point) -> f32 {
    let distance = (tex_coord - point(0.5, 0.5)).length();
    smoothstep(MARKER_EDGE, MARKER_EDGE * MARKER_CORE, distance)
}

/// Tessellates points into screen-aligned squares.
///
/// The squares have the same size in pixels whatever the aspect ratio of the
/// viewport and the depth of the point. Each one is made of two triangles.
///
/// ## Example
///
/// ```
/// use thicklines_tessellation::*;
/// use thicklines_tessellation::math::*;
/// use thicklines_tessellation::geom::Color;
///
/// let mut buffers: VertexBuffers<MarkerVertex, u16> = VertexBuffers::new();
/// PointMarkerTessellator::new().tessellate_point(
///     clip_point(0.0, 0.0, 0.0, 1.0),
///     Color::WHITE,
///     &MarkerOptions::radius(10.0).with_viewport(100.0, 50.0),
///     &mut BuffersBuilder::new(&mut buffers, |v: MarkerVertex| v),
/// ).unwrap();
///
/// assert_eq!(buffers.vertices[0].position(), point(-0.1, -0.2));
/// assert_eq!(buffers.vertices[3].position(), point(0.1, 0.2));
/// assert_eq!(buffers.indices, vec![0, 1, 2, 2, 1, 3]);
/// ```
#[derive(Default)]
pub struct PointMarkerTessellator {}

impl PointMarkerTessellator {
    pub fn new() -> Self {
        PointMarkerTessellator {}
    }

    /// Tessellates the marker of a single point, given in clip space.
    ///
    /// Nothing is produced for points with `w <= 0`.
    pub fn tessellate_point(
        &mut self,
        position: ClipPoint,
        color: Color,
        options: &MarkerOptions,
        output: &mut dyn MarkerGeometryBuilder,
    ) -> TessellationResult {
        output.begin_geometry();
        match emit_marker(position, color, options, output) {
            Ok(()) => {
                output.end_geometry();
                Ok(())
            }
            Err(e) => {
                output.abort_geometry();
                Err(e)
            }
        }
    }

    /// Tessellates one marker per point.
    pub fn tessellate_points(
        &mut self,
        positions: &[Point3D],
        colors: &[Color],
        transform: &Transform3D,
        options: &MarkerOptions,
        output: &mut dyn MarkerGeometryBuilder,
    ) -> TessellationResult {
        if positions.len() != colors.len() {
            return Err(TessellationError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }

        output.begin_geometry();
        for (position, color) in positions.iter().zip(colors) {
            let clip = transform.transform_point3d_homogeneous(*position);
            if let Err(e) = emit_marker(clip, *color, options, output) {
                output.abort_geometry();
                return Err(e);
            }
        }
        output.end_geometry();

        Ok(())
    }
}

fn emit_marker(
    position: ClipPoint,
    color: Color,
    options: &MarkerOptions,
    output: &mut dyn MarkerGeometryBuilder,
) -> TessellationResult {
    if !is_in_front(position) {
        return Ok(());
    }

    let center = screen_space(position, options.viewport);
    let color = color * options.tint;
    let r = options.radius;

    let corners = [
        (vector(-r, -r), point(0.0, 0.0)),
        (vector(-r, r), point(0.0, 1.0)),
        (vector(r, -r), point(1.0, 0.0)),
        (vector(r, r), point(1.0, 1.0)),
    ];

    let mut ids = [VertexId::INVALID; 4];
    for (id, &(offset, tex_coord)) in ids.iter_mut().zip(corners.iter()) {
        *id = output.add_marker_vertex(MarkerVertex {
            position: to_device(center + offset, options.viewport),
            color,
            tex_coord,
        })?;
    }

    output.add_triangle(ids[0], ids[1], ids[2]);
    output.add_triangle(ids[2], ids[1], ids[3]);

    Ok(())
}

#[cfg(test)]
use crate::geometry_builder::{simple_builder, BuffersBuilder, VertexBuffers};
#[cfg(test)]
use crate::math::{clip_point, point3};

#[test]
fn coverage_is_round() {
    assert_eq!(marker_coverage(point(0.5, 0.5)), 1.0);
    assert_eq!(marker_coverage(point(0.55, 0.5)), 1.0);
    assert_eq!(marker_coverage(point(1.0, 0.5)), 0.0);
    assert_eq!(marker_coverage(point(0.0, 0.0)), 0.0);
    assert_eq!(marker_coverage(point(1.0, 1.0)), 0.0);

    let mid = marker_coverage(point(0.5, 0.8));
    assert!(mid > 0.0 && mid < 1.0);
    // Same distance, same coverage.
    assert!((mid - marker_coverage(point(0.2, 0.5))).abs() < 1e-5);
}

#[test]
fn marker_is_aspect_correct() {
    let mut buffers: VertexBuffers<MarkerVertex, u16> = VertexBuffers::new();
    let options = MarkerOptions::radius(8.0)
        .with_viewport(800.0, 400.0)
        .with_tint(Color::new(1.0, 0.5, 1.0, 1.0));

    PointMarkerTessellator::new()
        .tessellate_point(
            clip_point(0.25, 0.5, 0.0, 1.0),
            Color::WHITE,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: MarkerVertex| v),
        )
        .unwrap();

    let v = &buffers.vertices;
    assert_eq!(v.len(), 4);
    let w = v[3].position().x - v[0].position().x;
    let h = v[3].position().y - v[0].position().y;
    // Sixteen pixels on each side.
    assert!((w * 800.0 - 16.0).abs() < 1e-3);
    assert!((h * 400.0 - 16.0).abs() < 1e-3);

    assert_eq!(v[0].tex_coord(), point(0.0, 0.0));
    assert_eq!(v[1].tex_coord(), point(0.0, 1.0));
    assert_eq!(v[2].tex_coord(), point(1.0, 0.0));
    assert_eq!(v[3].tex_coord(), point(1.0, 1.0));
    assert_eq!(v[0].coverage(), 0.0);

    for vertex in v {
        assert_eq!(vertex.color(), Color::new(1.0, 0.5, 1.0, 1.0));
    }
}

#[test]
fn points_behind_the_eye_have_no_marker() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut tess = PointMarkerTessellator::new();
    for &w in &[0.0, -2.0] {
        tess.tessellate_point(
            clip_point(0.5, 0.5, 0.0, w),
            Color::WHITE,
            &MarkerOptions::default(),
            &mut simple_builder(&mut buffers),
        )
        .unwrap();
    }
    assert!(buffers.vertices.is_empty());
    assert!(buffers.indices.is_empty());
}

#[test]
fn markers_for_all_points() {
    let positions = [
        point3(0.0, 0.0, 0.0),
        point3(0.5, 0.5, 0.0),
        point3(-0.5, 0.5, 0.0),
    ];
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();

    PointMarkerTessellator::new()
        .tessellate_points(
            &positions,
            &[Color::WHITE; 3],
            &Transform3D::identity(),
            &MarkerOptions::default(),
            &mut simple_builder(&mut buffers),
        )
        .unwrap();

    assert_eq!(buffers.vertices.len(), 12);
    assert_eq!(buffers.indices.len(), 18);
    assert_eq!(&buffers.indices[6..12], &[4, 5, 6, 6, 5, 7]);

    let result = PointMarkerTessellator::new().tessellate_points(
        &positions,
        &[],
        &Transform3D::identity(),
        &MarkerOptions::default(),
        &mut simple_builder(&mut buffers),
    );
    assert_eq!(
        result,
        Err(TessellationError::LengthMismatch {
            positions: 3,
            colors: 0
        })
    );
}
