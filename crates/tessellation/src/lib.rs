#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]

//! Tessellation of thick poly-lines and point markers.
//!
//! ## Overview
//!
//! The most interesting types and traits of this crate are:
//!
//! * [ThickLineTessellator](struct.ThickLineTessellator.html) - Turns each segment of a
//!   curve, given with the points before and after it, into a screen-space quad whose
//!   width is constant in pixels, with miter joins.
//! * [PointMarkerTessellator](struct.PointMarkerTessellator.html) - Turns each point into
//!   a screen-aligned quad to be rendered as a round marker.
//! * [`GeometryBuilder`](geometry_builder/trait.GeometryBuilder.html) - (See the documentation
//!   of the [geometry_builder module](geometry_builder/index.html)) which the above two are
//!   built on. This trait provides an interface for types that help with building and
//!   assembling the vertices and triangles that form the tessellation, usually in the form
//!   of arbitrary vertex and index buffers.
//!
//! ### The input: projected windows
//!
//! The thick line tessellator works on windows of four points: the segment to draw and
//! its neighbors on each side, which orient the joints. The
//! [`expand`](https://docs.rs/thicklines_curves/*/thicklines_curves/expand/index.html)
//! module of `thicklines_curves` produces index streams in that layout. Positions are
//! projected with a [`Transform3D`](math/type.Transform3D.html), divided by their `w`
//! component and scaled to the viewport before any joint is computed, so that widths are
//! expressed in pixels.
//!
//! ### The output: geometry builders
//!
//! Vertices are emitted in normalized device coordinates with `z = 0` and `w = 1`:
//! they can be rasterized directly without another perspective division.
//!
//! ## Example
//!
//! ```
//! use thicklines_tessellation::*;
//! use thicklines_tessellation::math::*;
//! use thicklines_tessellation::geom::Color;
//!
//! let positions = [point3(-0.5, 0.0, 0.0), point3(0.0, 0.5, 0.0), point3(0.5, 0.0, 0.0)];
//! let colors = [Color::WHITE; 3];
//! // One curve going through the three points.
//! let indices = [0, 0, 1, 2, 0, 1, 2, 2];
//!
//! let mut buffers: VertexBuffers<LineVertex, u16> = VertexBuffers::new();
//! let mut tessellator = ThickLineTessellator::new();
//! tessellator.tessellate_curves(
//!     &positions,
//!     &colors,
//!     &indices,
//!     &Transform3D::identity(),
//!     &StrokeOptions::default().with_thickness(2.0),
//!     &mut BuffersBuilder::new(&mut buffers, |v: LineVertex| v),
//! ).unwrap();
//!
//! // Two quads.
//! assert_eq!(buffers.vertices.len(), 8);
//! assert_eq!(buffers.indices.len(), 12);
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub extern crate thicklines_geom as geom;

mod error;
pub mod geometry_builder;
mod marker;
mod math_utils;
mod thick_line;

pub use crate::geom::math;

#[doc(inline)]
pub use crate::thick_line::*;

#[doc(inline)]
pub use crate::marker::*;

#[doc(inline)]
pub use crate::math_utils::{miter_joint, segment_directions, Joint};

#[doc(inline)]
pub use crate::geometry_builder::{
    BuffersBuilder, GeometryBuilder, GeometryBuilderError, LineGeometryBuilder,
    LineVertexConstructor, MarkerGeometryBuilder, MarkerVertexConstructor, VertexBuffers,
};

#[doc(inline)]
pub use crate::error::*;

use crate::geom::Color;
use crate::math::{size, Size};

use core::ops::Add;

/// Parameters for the thick line tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeOptions {
    /// Half of the line width, in pixels.
    ///
    /// Default value: `StrokeOptions::DEFAULT_THICKNESS`.
    pub thickness: f32,

    /// Bound on the cosine of the angle between two consecutive segments.
    ///
    /// When `dot(previous_direction, next_direction) < -miter_limit` the joint is
    /// considered too sharp for a miter and is flattened. `1.0` always produces
    /// miters, `-1.0` never does.
    ///
    /// Default value: `StrokeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f32,

    /// Size of the viewport in pixels.
    ///
    /// Default value: `StrokeOptions::DEFAULT_VIEWPORT`.
    pub viewport: Size,

    /// If set, the thickness at each endpoint is scaled by `perspective_scale / w`
    /// where `w` is the clip-space `w` of that endpoint, so that lines get thinner
    /// with the distance to the camera.
    ///
    /// Default value: `None` (constant width in pixels).
    pub perspective_scale: Option<f32>,

    /// Color multiplied into every output color.
    ///
    /// Default value: `Color::WHITE`.
    pub tint: Color,
}

impl StrokeOptions {
    pub const DEFAULT_THICKNESS: f32 = 3.0;
    pub const DEFAULT_MITER_LIMIT: f32 = 0.75;
    pub const DEFAULT_VIEWPORT: Size = Size {
        width: 1024.0,
        height: 768.0,
        _unit: core::marker::PhantomData,
    };
    /// Reference depth used when perspective scaling is requested without a value.
    pub const DEFAULT_PERSPECTIVE_SCALE: f32 = 500.0;

    pub const DEFAULT: Self = StrokeOptions {
        thickness: Self::DEFAULT_THICKNESS,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        viewport: Self::DEFAULT_VIEWPORT,
        perspective_scale: None,
        tint: Color::WHITE,
    };

    #[inline]
    pub fn thickness(thickness: f32) -> Self {
        Self::DEFAULT.with_thickness(thickness)
    }

    #[inline]
    pub const fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        assert!((-1.0..=1.0).contains(&limit));
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = size(width, height);
        self
    }

    #[inline]
    pub const fn with_perspective_scale(mut self, scale: Option<f32>) -> Self {
        self.perspective_scale = scale;
        self
    }

    #[inline]
    pub const fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// The thickness at a point of clip-space `w`.
    #[inline]
    pub fn thickness_at(&self, w: f32) -> f32 {
        match self.perspective_scale {
            Some(scale) => self.thickness * (scale / w),
            None => self.thickness,
        }
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for the point marker tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct MarkerOptions {
    /// Half of the marker's side, in pixels.
    ///
    /// Default value: `MarkerOptions::DEFAULT_RADIUS`.
    pub radius: f32,

    /// Size of the viewport in pixels.
    ///
    /// Default value: `StrokeOptions::DEFAULT_VIEWPORT`.
    pub viewport: Size,

    /// Color multiplied into every output color.
    ///
    /// Default value: `Color::WHITE`.
    pub tint: Color,
}

impl MarkerOptions {
    pub const DEFAULT_RADIUS: f32 = 4.0;

    pub const DEFAULT: Self = MarkerOptions {
        radius: Self::DEFAULT_RADIUS,
        viewport: StrokeOptions::DEFAULT_VIEWPORT,
        tint: Color::WHITE,
    };

    #[inline]
    pub fn radius(radius: f32) -> Self {
        Self::DEFAULT.with_radius(radius)
    }

    #[inline]
    pub const fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[inline]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = size(width, height);
        self
    }

    #[inline]
    pub const fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

type Index = u32;

/// A virtual vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `GeometryBuilder::begin_geometry` and
/// `GeometryBuilder::end_geometry`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}

impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}

#[test]
fn test_default_options() {
    let options = StrokeOptions::default();
    assert_eq!(options.miter_limit, 0.75);
    assert_eq!(options.thickness, 3.0);
    assert_eq!(options.viewport, size(1024.0, 768.0));
    assert_eq!(options.thickness_at(42.0), 3.0);
    assert_eq!(MarkerOptions::default().radius, 4.0);
}

#[test]
fn test_perspective_thickness() {
    let options = StrokeOptions::thickness(2.0)
        .with_perspective_scale(Some(StrokeOptions::DEFAULT_PERSPECTIVE_SCALE));
    assert_eq!(options.thickness_at(500.0), 2.0);
    assert_eq!(options.thickness_at(1000.0), 1.0);
}

#[test]
fn test_with_miter_limit() {
    let options = StrokeOptions::default().with_miter_limit(-0.5);
    assert_eq!(options.miter_limit, -0.5);
}

#[test]
#[should_panic]
fn test_with_invalid_miter_limit() {
    let _ = StrokeOptions::default().with_miter_limit(4.0);
}
