use core::ops::{Mul, MulAssign};

/// An unpremultiplied RGBA color with f32 components.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Color::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Multiplies every channel, alpha included, by `factor`.
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Color::new(
            self.r * factor,
            self.g * factor,
            self.b * factor,
            self.a * factor,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

/// Component-wise modulation, used to apply a global tint.
impl Mul for Color {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl MulAssign for Color {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[test]
fn tint_is_component_wise() {
    let c = Color::new(0.5, 1.0, 0.25, 0.5) * Color::new(0.5, 0.5, 1.0, 1.0);
    assert_eq!(c, Color::new(0.25, 0.5, 0.25, 0.5));
    assert_eq!(c * Color::WHITE, c);
    assert_eq!(Color::from([0.1, 0.2, 0.3, 0.4]).to_array(), [0.1, 0.2, 0.3, 0.4]);
}
