#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Math types shared by the thicklines crates.
//!
//! Positions live in 3D until they are projected; everything the tessellators
//! produce is 2D. The aliases in [`math`](math/index.html) are thin wrappers
//! around [euclid](https://docs.rs/euclid/) types so that users can mix them
//! with other crates of the ecosystem.

// Reexport dependencies.
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod color;
pub mod utils;

#[doc(inline)]
pub use crate::color::Color;

pub mod math {
    //! f32 versions of the euclid types used everywhere. The other thicklines
    //! crates reexport them.

    use crate::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Size2D<f32>```.
    pub type Size = euclid::default::Size2D<f32>;

    /// Alias for ```euclid::default::Point3D<f32>```.
    pub type Point3D = euclid::default::Point3D<f32>;

    /// Alias for ```euclid::default::Vector3D<f32>```.
    pub type Vector3D = euclid::default::Vector3D<f32>;

    /// Alias for ```euclid::default::Transform3D<f32>```.
    ///
    /// Used as the model-view-projection matrix.
    pub type Transform3D = euclid::default::Transform3D<f32>;

    /// Alias for ```euclid::default::HomogeneousVector<f32>```.
    ///
    /// A position in clip space, before the perspective division.
    pub type ClipPoint = euclid::default::HomogeneousVector<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Point3D::new(x, y, z)`.
    #[inline]
    pub fn point3(x: f32, y: f32, z: f32) -> Point3D {
        Point3D::new(x, y, z)
    }

    /// Shorthand for `Size::new(w, h)`.
    #[inline]
    pub fn size(w: f32, h: f32) -> Size {
        Size::new(w, h)
    }

    /// Shorthand for `ClipPoint::new(x, y, z, w)`.
    #[inline]
    pub fn clip_point(x: f32, y: f32, z: f32, w: f32) -> ClipPoint {
        ClipPoint::new(x, y, z, w)
    }
}
