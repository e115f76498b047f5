//! Joint computations for the thick line tessellator.

use crate::geom::utils::{direction, left_normal, try_normalize};
use crate::math::{vector, Point, Vector};

/// Below this, the projection of a miter onto the segment normal is treated as zero.
const MIN_MITER_PROJECTION: f32 = 1e-4;

/// The offset applied on each side of a curve at one of its points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Joint {
    /// Unit vector along which the point is extruded.
    pub direction: Vector,
    /// Distance between the point and each of its two extruded vertices.
    pub half_width: f32,
    /// True if the joint was too sharp for a miter and was flattened to the
    /// segment's normal.
    pub clamped: bool,
}

impl Joint {
    /// The offset to add (and subtract) to the point.
    #[inline]
    pub fn offset(&self) -> Vector {
        self.direction * self.half_width
    }
}

/// Computes the unit directions of the three segments of a window
/// `p0 -> p1 -> p2 -> p3`.
///
/// Segments of zero length have no direction of their own and borrow the one of
/// a neighbor: the current segment falls back to the previous then the next one,
/// and the outer segments fall back to the current one. If all three are
/// degenerate the x axis is used. The result is always finite.
pub fn segment_directions(points: &[Point; 4]) -> [Vector; 3] {
    let d0 = direction(points[0], points[1]);
    let d1 = direction(points[1], points[2]);
    let d2 = direction(points[2], points[3]);

    let v1 = d1.or(d0).or(d2).unwrap_or_else(|| vector(1.0, 0.0));
    let v0 = d0.unwrap_or(v1);
    let v2 = d2.unwrap_or(v1);

    [v0, v1, v2]
}

/// Computes the miter joint between two consecutive segments of directions
/// `before` and `after`.
///
/// `segment_normal` is the left normal of the segment being tessellated (either
/// `before` or `after`'s), and `thickness` is the half width of the line at the
/// joint. The miter direction bisects the two segment normals; its length is
/// such that the extruded edges stay `thickness` away from the segment.
///
/// If `dot(before, after) < -miter_limit`, the miter would be excessively long:
/// the segment normal and the plain thickness are used instead.
pub fn miter_joint(
    before: Vector,
    after: Vector,
    segment_normal: Vector,
    thickness: f32,
    miter_limit: f32,
) -> Joint {
    if before.dot(after) < -miter_limit {
        return Joint {
            direction: segment_normal,
            half_width: thickness,
            clamped: true,
        };
    }

    let direction =
        try_normalize(left_normal(before) + left_normal(after)).unwrap_or(segment_normal);

    let projection = direction.dot(segment_normal);
    let half_width = if projection.abs() < MIN_MITER_PROJECTION {
        thickness
    } else {
        thickness / projection
    };

    Joint {
        direction,
        half_width,
        clamped: false,
    }
}

#[cfg(test)]
fn assert_almost_eq(a: Vector, b: Vector) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn collinear_joint() {
    let v = vector(1.0, 0.0);
    let joint = miter_joint(v, v, left_normal(v), 3.0, 0.75);
    assert_almost_eq(joint.direction, vector(0.0, 1.0));
    assert_eq!(joint.half_width, 3.0);
    assert!(!joint.clamped);
}

#[test]
fn right_angle_joint() {
    let before = vector(1.0, 0.0);
    let after = vector(0.0, 1.0);
    let joint = miter_joint(before, after, left_normal(after), 1.0, 0.75);

    let s = core::f32::consts::FRAC_1_SQRT_2;
    assert_almost_eq(joint.direction, vector(-s, s));
    assert!((joint.half_width - core::f32::consts::SQRT_2).abs() < 1e-5);
    // Same as lyon's un-normalized miter normal.
    assert_almost_eq(joint.offset(), vector(-1.0, 1.0));
}

#[test]
fn symmetric_projection() {
    // The miter length doesn't depend on which side's normal is the reference.
    let before = vector(1.0, 0.0);
    let after = try_normalize(vector(1.0, 1.0)).unwrap();
    let a = miter_joint(before, after, left_normal(before), 2.0, 0.75);
    let b = miter_joint(before, after, left_normal(after), 2.0, 0.75);
    assert_almost_eq(a.direction, b.direction);
    assert!((a.half_width - b.half_width).abs() < 1e-5);
}

#[test]
fn sharp_joint_is_clamped() {
    // About 170 degrees of turn: cos = -0.985 < -0.75.
    let before = vector(1.0, 0.0);
    let after = try_normalize(vector(-1.0, 0.176)).unwrap();
    let normal = left_normal(after);
    let joint = miter_joint(before, after, normal, 3.0, 0.75);

    assert!(joint.clamped);
    assert_eq!(joint.direction, normal);
    assert_eq!(joint.half_width, 3.0);

    // A permissive limit keeps the long miter.
    let joint = miter_joint(before, after, normal, 3.0, 1.0);
    assert!(!joint.clamped);
    assert!(joint.half_width > 3.0 * 10.0);
}

#[test]
fn u_turn_with_no_limit_stays_finite() {
    let before = vector(1.0, 0.0);
    let after = vector(-1.0, 0.0);
    let joint = miter_joint(before, after, left_normal(after), 3.0, 1.0);
    assert!(!joint.clamped);
    assert_eq!(joint.direction, left_normal(after));
    assert_eq!(joint.half_width, 3.0);
}

#[test]
fn degenerate_directions() {
    let p = point(1.0, 1.0);

    // Padded curve start: p0 == p1.
    let [v0, v1, v2] = segment_directions(&[p, p, point(3.0, 1.0), point(3.0, 4.0)]);
    assert_eq!(v0, vector(1.0, 0.0));
    assert_eq!(v1, vector(1.0, 0.0));
    assert_eq!(v2, vector(0.0, 1.0));

    // Zero length current segment borrows the previous direction.
    let [v0, v1, v2] = segment_directions(&[point(1.0, 0.0), p, p, point(5.0, 1.0)]);
    assert_eq!(v0, vector(0.0, 1.0));
    assert_eq!(v1, vector(0.0, 1.0));
    assert_eq!(v2, vector(1.0, 0.0));

    // Everything collapsed.
    assert_eq!(segment_directions(&[p; 4]), [vector(1.0, 0.0); 3]);
}
