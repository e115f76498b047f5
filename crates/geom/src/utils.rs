//! Small vector helpers used by the tessellators.

use crate::math::{vector, Point, Size, Vector, ClipPoint};

/// Square lengths below this threshold are treated as zero.
pub const EPSILON: f32 = 1e-8;

/// The left-hand normal of `v` (rotated by 90 degrees).
#[inline]
pub fn left_normal(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Normalizes `v`, or returns `None` if it is too short to have a direction.
///
/// Never produces non-finite components.
#[inline]
pub fn try_normalize(v: Vector) -> Option<Vector> {
    let sq = v.square_length();
    if !(sq > EPSILON) || !sq.is_finite() {
        return None;
    }

    Some(v / sq.sqrt())
}

/// Unit direction from `from` to `to`, `None` if the two points coincide.
#[inline]
pub fn direction(from: Point, to: Point) -> Option<Vector> {
    try_normalize(to - from)
}

/// Whether a clip-space point has a positive `w`.
///
/// Points that fail this test are behind the eye or at infinity and have no
/// usable perspective division. NaN is not in front.
#[inline]
pub fn is_in_front(p: ClipPoint) -> bool {
    p.w > 0.0
}

/// Performs the perspective division and scales the result to viewport pixels.
///
/// The result is only finite for points that are [`is_in_front`].
#[inline]
pub fn screen_space(p: ClipPoint, viewport: Size) -> Point {
    Point::new(p.x / p.w * viewport.width, p.y / p.w * viewport.height)
}

/// Maps a point in viewport pixels back to normalized device coordinates.
#[inline]
pub fn to_device(p: Point, viewport: Size) -> Point {
    Point::new(p.x / viewport.width, p.y / viewport.height)
}

/// Hermite interpolation between `edge0` and `edge1`, as in GLSL.
///
/// Like GLSL's, it also works with `edge0 > edge1`, producing a decreasing ramp.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
use crate::math::{clip_point, point, size};

#[test]
fn points_in_front() {
    assert!(is_in_front(clip_point(0.0, 0.0, 0.0, 0.5)));
    assert!(!is_in_front(clip_point(0.0, 0.0, 0.0, 0.0)));
    assert!(!is_in_front(clip_point(1.0, 1.0, 0.0, -1.0)));
    assert!(!is_in_front(clip_point(0.0, 0.0, 0.0, f32::NAN)));
}

#[test]
fn degenerate_directions() {
    assert_eq!(direction(point(1.0, 1.0), point(1.0, 1.0)), None);
    assert_eq!(try_normalize(vector(f32::NAN, 0.0)), None);
    assert_eq!(try_normalize(vector(f32::INFINITY, 0.0)), None);
    assert_eq!(direction(point(0.0, 0.0), point(0.0, 3.0)), Some(vector(0.0, 1.0)));
}

#[test]
fn normals_point_left() {
    assert_eq!(left_normal(vector(1.0, 0.0)), vector(0.0, 1.0));
    assert_eq!(left_normal(vector(0.0, 1.0)), vector(-1.0, 0.0));
}

#[test]
fn screen_space_round_trip() {
    let viewport = size(800.0, 600.0);
    let p = screen_space(clip_point(1.0, -0.5, 0.3, 2.0), viewport);
    assert_eq!(p, point(400.0, -150.0));
    assert_eq!(to_device(p, viewport), point(0.5, -0.25));
}

#[test]
fn smoothstep_ramps() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    // Reversed edges.
    assert_eq!(smoothstep(0.5, 0.1, 0.0), 1.0);
    assert_eq!(smoothstep(0.5, 0.1, 0.6), 0.0);
}
