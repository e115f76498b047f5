use crate::geom::utils::{is_in_front, left_normal, screen_space, to_device};
use crate::geom::Color;
use crate::geometry_builder::LineGeometryBuilder;
use crate::math::{point, ClipPoint, Point, Point3D, Size, Transform3D};
use crate::math_utils::{miter_joint, segment_directions, Joint};
use crate::{StrokeOptions, TessellationError, TessellationResult, VertexId};

/// A vertex produced by the [`ThickLineTessellator`](struct.ThickLineTessellator.html).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineVertex {
    /// Position in normalized device coordinates.
    pub position: Point,
    /// Color of the curve's point, tint included.
    pub color: Color,
    /// `x` is always zero, `y` goes from zero on the left edge of the line to one on
    /// the right edge.
    pub tex_coord: Point,
}

impl LineVertex {
    /// Position in normalized device coordinates.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Homogeneous position `[x, y, 0, 1]`, ready for rasterization.
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
}

/// One segment to tessellate, in clip space.
///
/// `points[1] -> points[2]` is the segment, `points[0]` and `points[3]` are its
/// neighbors on the curve. At the ends of a curve the neighbor is the endpoint
/// itself.
///
/// Segments with an endpoint that is not in front of the eye (`w <= 0`) produce
/// no geometry. Clipping them is up to the caller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentWindow {
    pub points: [ClipPoint; 4],
    /// Colors of the segment's start and end points.
    pub colors: [Color; 2],
}

impl SegmentWindow {
    /// Projects four points of a curve.
    pub fn project(
        positions: [Point3D; 4],
        colors: [Color; 2],
        transform: &Transform3D,
    ) -> Self {
        SegmentWindow {
            points: [
                transform.transform_point3d_homogeneous(positions[0]),
                transform.transform_point3d_homogeneous(positions[1]),
                transform.transform_point3d_homogeneous(positions[2]),
                transform.transform_point3d_homogeneous(positions[3]),
            ],
            colors,
        }
    }

    /// Whether both endpoints of the segment have a positive `w`.
    #[inline]
    pub fn is_in_front(&self) -> bool {
        is_in_front(self.points[1]) && is_in_front(self.points[2])
    }
}

/// The triangle filling the outer side of a flattened joint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointCap {
    /// Screen space positions. The last one is the joint itself.
    pub points: [Point; 3],
    /// Texture coordinate across the line of the two outer vertices.
    pub edge_tex_coord: f32,
}

/// The screen-space geometry of a single segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    pub start: Joint,
    pub end: Joint,
    /// Screen-space quad, in triangle strip order: start left, start right, end left,
    /// end right.
    pub quad: [Point; 4],
    /// Present when the start joint is too sharp for a miter.
    pub cap: Option<JointCap>,
}

impl SegmentGeometry {
    /// Computes the geometry of the segment `points[1] -> points[2]` in screen space.
    ///
    /// `thickness` holds the half width of the line at the start and at the end of
    /// the segment.
    pub fn new(points: &[Point; 4], thickness: [f32; 2], miter_limit: f32) -> Self {
        let [v0, v1, v2] = segment_directions(points);
        let n0 = left_normal(v0);
        let n1 = left_normal(v1);
        let n2 = left_normal(v2);

        let start = miter_joint(v0, v1, n1, thickness[0], miter_limit);
        let end = miter_joint(v1, v2, n1, thickness[1], miter_limit);

        let p1 = points[1];
        let p2 = points[2];

        let cap = if start.clamped {
            // Bridge the end of the previous segment and the start of this one, on
            // the outer side of the turn.
            let t = thickness[0];
            let (a, b, edge_tex_coord) = if v0.dot(n1) >= 0.0 {
                (p1 + n0 * t, p1 + n1 * t, 0.0)
            } else {
                (p1 - n1 * t, p1 - n0 * t, 1.0)
            };

            Some(JointCap {
                points: [a, b, p1],
                edge_tex_coord,
            })
        } else {
            None
        };

        let start_offset = start.offset();
        let end_offset = end.offset();

        SegmentGeometry {
            start,
            end,
            quad: [
                p1 + start_offset,
                p1 - start_offset,
                p2 + end_offset,
                p2 - end_offset,
            ],
            cap,
        }
    }

    /// Distance between the two sides of the quad at the start of the segment.
    pub fn start_width(&self) -> f32 {
        (self.quad[0] - self.quad[1]).length()
    }

    /// Distance between the two sides of the quad at the end of the segment.
    pub fn end_width(&self) -> f32 {
        (self.quad[2] - self.quad[3]).length()
    }
}

/// Tessellates curves into thick lines with miter joins.
///
/// Each segment is handled on its own: it only needs its two endpoints and their
/// neighbors on the curve. Joints are computed in screen space, so the line width is
/// in pixels. When consecutive segments turn back by more than the
/// [miter limit](struct.StrokeOptions.html#structfield.miter_limit) allows, the joint
/// is flattened and a small triangle fills the gap on the outer side.
///
/// Zero-length segments are handled by borrowing the direction of a neighbor and
/// never produce non-finite positions.
///
/// ## Examples
///
/// ```
/// use thicklines_tessellation::*;
/// use thicklines_tessellation::math::*;
///
/// // Screen space points: a straight horizontal line.
/// let points = [point(0.0, 0.0), point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0)];
/// let geometry = SegmentGeometry::new(&points, [2.0, 2.0], 0.75);
///
/// assert_eq!(geometry.quad[0], point(0.0, 2.0));
/// assert_eq!(geometry.quad[1], point(0.0, -2.0));
/// assert_eq!(geometry.start_width(), 4.0);
/// assert!(geometry.cap.is_none());
/// ```
#[derive(Default)]
pub struct ThickLineTessellator {}

impl ThickLineTessellator {
    pub fn new() -> Self {
        ThickLineTessellator {}
    }

    /// Tessellates a single segment.
    pub fn tessellate_segment(
        &mut self,
        window: &SegmentWindow,
        options: &StrokeOptions,
        output: &mut dyn LineGeometryBuilder,
    ) -> TessellationResult {
        output.begin_geometry();
        match emit_segment(window, options, output) {
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

    /// Tessellates all segments of a "lines adjacency" index stream.
    ///
    /// Every four indices describe a segment as documented in
    /// [`SegmentWindow`](struct.SegmentWindow.html); a trailing incomplete group is
    /// ignored, and so are segments that end behind the eye. Positions are transformed to clip space with `transform`.
    pub fn tessellate_curves(
        &mut self,
        positions: &[Point3D],
        colors: &[Color],
        indices: &[u32],
        transform: &Transform3D,
        options: &StrokeOptions,
        output: &mut dyn LineGeometryBuilder,
    ) -> TessellationResult {
        if positions.len() != colors.len() {
            return Err(TessellationError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }

        output.begin_geometry();
        for window in indices.chunks_exact(4) {
            let result = fetch_window(positions, colors, window, transform)
                .and_then(|window| emit_segment(&window, options, output));

            if let Err(e) = result {
                output.abort_geometry();
                return Err(e);
            }
        }
        output.end_geometry();

        Ok(())
    }
}

fn fetch_window(
    positions: &[Point3D],
    colors: &[Color],
    indices: &[u32],
    transform: &Transform3D,
) -> Result<SegmentWindow, TessellationError> {
    let fetch = |index: u32| {
        positions
            .get(index as usize)
            .copied()
            .ok_or(TessellationError::IndexOutOfRange {
                index,
                len: positions.len(),
            })
    };

    let p = [
        fetch(indices[0])?,
        fetch(indices[1])?,
        fetch(indices[2])?,
        fetch(indices[3])?,
    ];

    // Positions and colors have the same length.
    let colors = [colors[indices[1] as usize], colors[indices[2] as usize]];

    Ok(SegmentWindow::project(p, colors, transform))
}

fn emit_segment(
    window: &SegmentWindow,
    options: &StrokeOptions,
    output: &mut dyn LineGeometryBuilder,
) -> TessellationResult {
    if !window.is_in_front() {
        return Ok(());
    }

    let viewport = options.viewport;
    let points = [
        screen_space(window.points[0], viewport),
        screen_space(window.points[1], viewport),
        screen_space(window.points[2], viewport),
        screen_space(window.points[3], viewport),
    ];
    let thickness = [
        options.thickness_at(window.points[1].w),
        options.thickness_at(window.points[2].w),
    ];

    let geometry = SegmentGeometry::new(&points, thickness, options.miter_limit);

    let start_color = window.colors[0] * options.tint;
    let end_color = window.colors[1] * options.tint;

    if let Some(cap) = geometry.cap {
        let v = cap.edge_tex_coord;
        let a = add_vertex(output, cap.points[0], start_color, 0.0, v, viewport)?;
        let b = add_vertex(output, cap.points[1], start_color, 0.0, v, viewport)?;
        let c = add_vertex(output, cap.points[2], start_color, 0.0, 0.5, viewport)?;
        output.add_triangle(a, b, c);
    }

    let a = add_vertex(output, geometry.quad[0], start_color, 0.0, 0.0, viewport)?;
    let b = add_vertex(output, geometry.quad[1], start_color, 0.0, 1.0, viewport)?;
    let c = add_vertex(output, geometry.quad[2], end_color, 0.0, 0.0, viewport)?;
    let d = add_vertex(output, geometry.quad[3], end_color, 0.0, 1.0, viewport)?;

    output.add_triangle(a, b, c);
    output.add_triangle(c, b, d);

    Ok(())
}

fn add_vertex(
    output: &mut dyn LineGeometryBuilder,
    screen_position: Point,
    color: Color,
    u: f32,
    v: f32,
    viewport: Size,
) -> Result<VertexId, TessellationError> {
    let id = output.add_line_vertex(LineVertex {
        position: to_device(screen_position, viewport),
        color,
        tex_coord: point(u, v),
    })?;

    Ok(id)
}

#[cfg(test)]
use crate::geometry_builder::{simple_builder, BuffersBuilder, NoOutput, VertexBuffers};
#[cfg(test)]
use crate::geometry_builder::GeometryBuilder;
#[cfg(test)]
use crate::math::{clip_point, point3, vector, Vector};

#[cfg(test)]
fn assert_almost_eq(a: Point, b: Point) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[cfg(test)]
fn unit_window(points: [Point; 4]) -> SegmentWindow {
    SegmentWindow {
        points: [
            clip_point(points[0].x, points[0].y, 0.0, 1.0),
            clip_point(points[1].x, points[1].y, 0.0, 1.0),
            clip_point(points[2].x, points[2].y, 0.0, 1.0),
            clip_point(points[3].x, points[3].y, 0.0, 1.0),
        ],
        colors: [Color::WHITE, Color::BLACK],
    }
}

#[test]
fn collinear_miter() {
    let points = [
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(20.0, 0.0),
        point(30.0, 0.0),
    ];
    let geometry = SegmentGeometry::new(&points, [3.0, 3.0], 0.75);
    let n1 = vector(0.0, 1.0);

    assert_eq!(geometry.start.direction, n1);
    assert_eq!(geometry.end.direction, n1);
    assert_eq!(geometry.start_width(), 6.0);
    assert_eq!(geometry.end_width(), 6.0);
    assert_eq!(geometry.quad[0], point(10.0, 3.0));
    assert_eq!(geometry.quad[1], point(10.0, -3.0));
    assert_eq!(geometry.quad[2], point(20.0, 3.0));
    assert_eq!(geometry.quad[3], point(20.0, -3.0));
    assert!(geometry.cap.is_none());
}

#[test]
fn bent_miter_keeps_distance_to_segment() {
    // Turn left by 90 degrees at p2.
    let points = [
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
    ];
    let geometry = SegmentGeometry::new(&points, [1.0, 1.0], 0.75);

    assert!(!geometry.end.clamped);
    assert_almost_eq(geometry.quad[2], point(9.0, 1.0));
    assert_almost_eq(geometry.quad[3], point(11.0, -1.0));
    // Each side stays exactly one unit away from the segment.
    assert!((geometry.quad[2].y - 1.0).abs() < 1e-5);
    assert!((geometry.quad[3].y + 1.0).abs() < 1e-5);
}

#[test]
fn miter_limit_fallback() {
    // The line comes back on itself at p1 with a small opening.
    let points = [
        point(20.0, 1.0),
        point(0.0, 0.0),
        point(20.0, -1.0),
        point(40.0, -2.0),
    ];
    let geometry = SegmentGeometry::new(&points, [2.0, 2.0], 0.75);
    let v1 = (points[2] - points[1]).normalize();
    let n1: Vector = vector(-v1.y, v1.x);

    assert!(geometry.start.clamped);
    assert_eq!(geometry.start.direction, n1);
    assert_eq!(geometry.start.half_width, 2.0);
    assert_almost_eq(geometry.quad[0], points[1] + n1 * 2.0);
    assert_almost_eq(geometry.quad[1], points[1] - n1 * 2.0);
    assert!((geometry.start_width() - 4.0).abs() < 1e-5);

    // The cap is anchored at the joint.
    let cap = geometry.cap.unwrap();
    assert_eq!(cap.points[2], points[1]);
    for p in &cap.points[..2] {
        assert!(((*p - points[1]).length() - 2.0).abs() < 1e-5);
    }

    // The end joint is a gentle bend.
    assert!(!geometry.end.clamped);
}

#[test]
fn cap_side_follows_turn_direction() {
    let left = SegmentGeometry::new(
        &[point(10.0, -1.0), point(0.0, 0.0), point(10.0, 1.0), point(20.0, 1.0)],
        [1.0, 1.0],
        0.75,
    );
    let right = SegmentGeometry::new(
        &[point(10.0, 1.0), point(0.0, 0.0), point(10.0, -1.0), point(20.0, -1.0)],
        [1.0, 1.0],
        0.75,
    );

    let left_cap = left.cap.unwrap();
    let right_cap = right.cap.unwrap();
    assert_eq!(left_cap.edge_tex_coord, 0.0);
    assert_eq!(right_cap.edge_tex_coord, 1.0);
    // Mirrored geometry gives a mirrored cap.
    assert_almost_eq(left_cap.points[0], point(right_cap.points[1].x, -right_cap.points[1].y));
    assert_almost_eq(left_cap.points[1], point(right_cap.points[0].x, -right_cap.points[0].y));
}

#[test]
fn end_joint_fallback_has_no_cap() {
    let points = [
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(0.0, 0.5),
    ];
    let geometry = SegmentGeometry::new(&points, [1.0, 1.0], 0.75);
    assert!(geometry.end.clamped);
    assert_eq!(geometry.end.direction, vector(0.0, 1.0));
    assert_eq!(geometry.end.half_width, 1.0);
    assert!(geometry.cap.is_none());
}

#[test]
fn degenerate_segments_are_finite() {
    let p = point(5.0, 5.0);
    let cases = [
        [p, p, p, p],
        [p, p, p, point(6.0, 5.0)],
        [point(4.0, 5.0), p, p, p],
        [point(4.0, 5.0), p, p, point(4.0, 5.0)],
    ];

    for points in &cases {
        let geometry = SegmentGeometry::new(points, [2.0, 2.0], 0.75);
        for v in geometry.quad.iter() {
            assert!(v.x.is_finite() && v.y.is_finite(), "{:?}", geometry);
        }
        assert!((geometry.start_width() - 4.0).abs() < 1e-5);
    }
}

#[test]
fn segment_output() {
    let mut buffers: VertexBuffers<LineVertex, u16> = VertexBuffers::new();
    let window = unit_window([
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(0.5, 0.0),
        point(0.5, 0.0),
    ]);
    let options = StrokeOptions::thickness(10.0)
        .with_viewport(100.0, 100.0)
        .with_tint(Color::new(1.0, 1.0, 1.0, 0.5));

    ThickLineTessellator::new()
        .tessellate_segment(
            &window,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: LineVertex| v),
        )
        .unwrap();

    assert_eq!(buffers.indices, vec![0, 1, 2, 2, 1, 3]);
    let v = &buffers.vertices;
    assert_eq!(v.len(), 4);

    // Back in normalized device coordinates: 10 pixels out of 100.
    assert_almost_eq(v[0].position(), point(0.0, 0.1));
    assert_almost_eq(v[1].position(), point(0.0, -0.1));
    assert_almost_eq(v[2].position(), point(0.5, 0.1));
    assert_almost_eq(v[3].position(), point(0.5, -0.1));
    assert_eq!(v[0].clip_position()[2..], [0.0, 1.0]);

    assert_eq!(v[0].color(), Color::new(1.0, 1.0, 1.0, 0.5));
    assert_eq!(v[1].color(), Color::new(1.0, 1.0, 1.0, 0.5));
    assert_eq!(v[2].color(), Color::new(0.0, 0.0, 0.0, 0.5));
    assert_eq!(v[3].color(), Color::new(0.0, 0.0, 0.0, 0.5));

    assert_eq!(v[0].tex_coord(), point(0.0, 0.0));
    assert_eq!(v[1].tex_coord(), point(0.0, 1.0));
    assert_eq!(v[2].tex_coord(), point(0.0, 0.0));
    assert_eq!(v[3].tex_coord(), point(0.0, 1.0));
}

#[test]
fn sharp_segment_output() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let window = unit_window([
        point(0.5, 0.01),
        point(0.0, 0.0),
        point(0.5, -0.01),
        point(0.5, -0.01),
    ]);

    ThickLineTessellator::new()
        .tessellate_segment(&window, &StrokeOptions::default(), &mut simple_builder(&mut buffers))
        .unwrap();

    // Cap triangle then quad.
    assert_eq!(buffers.vertices.len(), 7);
    assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5, 5, 4, 6]);
    assert_eq!(buffers.vertices[2], point(0.0, 0.0));
}

#[test]
fn perspective_division() {
    // The same point at w = 2 lands at the same place as at w = 1 with halved xy.
    let options = StrokeOptions::thickness(1.0).with_viewport(10.0, 10.0);
    let mut a: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut b: VertexBuffers<Point, u16> = VertexBuffers::new();

    let window = SegmentWindow {
        points: [
            clip_point(0.0, 0.0, 0.0, 2.0),
            clip_point(0.0, 0.0, 0.0, 2.0),
            clip_point(1.0, 0.0, 0.0, 2.0),
            clip_point(1.0, 0.0, 0.0, 2.0),
        ],
        colors: [Color::WHITE; 2],
    };
    ThickLineTessellator::new()
        .tessellate_segment(&window, &options, &mut simple_builder(&mut a))
        .unwrap();
    ThickLineTessellator::new()
        .tessellate_segment(
            &unit_window([point(0.0, 0.0), point(0.0, 0.0), point(0.5, 0.0), point(0.5, 0.0)]),
            &options,
            &mut simple_builder(&mut b),
        )
        .unwrap();

    assert_eq!(a.vertices, b.vertices);

    // With perspective scaling, the far line is thinner.
    let mut c: VertexBuffers<Point, u16> = VertexBuffers::new();
    ThickLineTessellator::new()
        .tessellate_segment(
            &window,
            &options.with_perspective_scale(Some(1.0)),
            &mut simple_builder(&mut c),
        )
        .unwrap();
    assert_almost_eq(c.vertices[0], point(0.0, 0.05));
}

#[test]
fn curves_from_index_stream() {
    let positions = [
        point3(0.0, 0.0, 0.0),
        point3(0.5, 0.0, 0.0),
        point3(0.5, 0.5, 0.0),
        point3(-0.5, -0.5, 0.0),
    ];
    let colors = [Color::WHITE; 4];
    // Curve 0 1 2 then curve 3 0.
    let indices = [0, 0, 1, 2, 0, 1, 2, 2, 3, 3, 0, 0];

    let mut output = NoOutput::new();
    let mut tess = ThickLineTessellator::new();
    tess.tessellate_curves(
        &positions,
        &colors,
        &indices,
        &Transform3D::identity(),
        &StrokeOptions::default(),
        &mut output,
    )
    .unwrap();

    let count = output.end_geometry();
    assert_eq!(count.vertices, 12);
    assert_eq!(count.indices, 18);
}

#[test]
fn empty_index_stream() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    ThickLineTessellator::new()
        .tessellate_curves(
            &[],
            &[],
            &[],
            &Transform3D::identity(),
            &StrokeOptions::default(),
            &mut simple_builder(&mut buffers),
        )
        .unwrap();
    assert!(buffers.vertices.is_empty());
    assert!(buffers.indices.is_empty());
}

#[test]
fn segments_behind_the_eye_are_skipped() {
    let mut window = unit_window([
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 0.0),
    ]);
    let options = StrokeOptions::thickness(2.0)
        .with_viewport(1.0, 1.0)
        .with_perspective_scale(Some(1.0));
    let mut tess = ThickLineTessellator::new();

    window.points[2].w = 0.0;
    assert!(!window.is_in_front());
    let mut output = NoOutput::new();
    tess.tessellate_segment(&window, &options, &mut output).unwrap();
    assert_eq!(output.end_geometry().vertices, 0);

    window.points[2].w = -1.0;
    let mut output = NoOutput::new();
    tess.tessellate_segment(&window, &options, &mut output).unwrap();
    assert_eq!(output.end_geometry().vertices, 0);

    // A neighbor at infinity only affects the joint, which stays finite.
    window.points[2].w = 1.0;
    window.points[3].w = 0.0;
    assert!(window.is_in_front());
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    tess.tessellate_segment(&window, &options, &mut simple_builder(&mut buffers))
        .unwrap();
    assert_eq!(buffers.vertices.len(), 4);
    for p in &buffers.vertices {
        assert!(p.x.is_finite() && p.y.is_finite(), "{:?}", p);
    }
}

#[test]
fn invalid_input() {
    let positions = [point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0)];
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut tess = ThickLineTessellator::new();

    let result = tess.tessellate_curves(
        &positions,
        &[Color::WHITE; 2],
        &[0, 0, 1, 1, 0, 1, 2, 2],
        &Transform3D::identity(),
        &StrokeOptions::default(),
        &mut simple_builder(&mut buffers),
    );
    assert_eq!(
        result,
        Err(TessellationError::IndexOutOfRange { index: 2, len: 2 })
    );
    // The first segment was discarded as well.
    assert!(buffers.vertices.is_empty());

    let result = tess.tessellate_curves(
        &positions,
        &[Color::WHITE],
        &[],
        &Transform3D::identity(),
        &StrokeOptions::default(),
        &mut simple_builder(&mut buffers),
    );
    assert_eq!(
        result,
        Err(TessellationError::LengthMismatch {
            positions: 2,
            colors: 1
        })
    );
}
