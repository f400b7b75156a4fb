//! Planar geometry: `Vec2` points/vectors and axis-aligned `Rect`s.
//!
//! The world uses a y-up coordinate system centred on the origin.  Rect
//! ownership is half-open (`min <= p < max` on both axes) so that a point on
//! a shared edge belongs to exactly one quadrant; query rectangles are closed.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2-D point or vector in world units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Squared Euclidean distance.  Neighbor queries work in squared units to
    /// avoid a `sqrt` per candidate.
    #[inline]
    pub fn dist_sq(self, other: Vec2) -> f32 {
        (self - other).length_sq()
    }

    /// Unit vector in the same direction, or `ZERO` for a zero-length (or
    /// non-finite) input.
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: f32) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square of side `2 * half_extent` centred on the origin.
    pub fn centered(half_extent: f32) -> Self {
        Self::new(
            Vec2::new(-half_extent, -half_extent),
            Vec2::new(half_extent, half_extent),
        )
    }

    /// Bounding square of a circle.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(
            Vec2::new(center.x - radius, center.y - radius),
            Vec2::new(center.x + radius, center.y + radius),
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    /// `true` if the rectangle has positive, finite extent on both axes.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0
            && self.height() > 0.0
            && self.width().is_finite()
            && self.height().is_finite()
    }

    /// Half-open ownership test: `min <= p < max`.
    #[inline]
    pub fn owns(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Closed containment test: `min <= p <= max`.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// `true` if the two closed rectangles share at least one point.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.min.x > other.max.x
            || other.min.x > self.max.x
            || self.min.y > other.max.y
            || other.min.y > self.max.y)
    }

    /// Wrap `p` onto the torus spanned by this rectangle.  The result is
    /// owned by the rectangle (`min <= p < max`) for any finite `p`.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(p.x, self.min.x, self.max.x),
            wrap_axis(p.y, self.min.y, self.max.y),
        )
    }

    /// Split into four quadrants by bisecting both axes.
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right (y-up).
    pub fn quadrants(&self) -> [Rect; 4] {
        let mid = self.center();
        [
            Rect::new(Vec2::new(self.min.x, mid.y), Vec2::new(mid.x, self.max.y)),
            Rect::new(mid, self.max),
            Rect::new(self.min, mid),
            Rect::new(Vec2::new(mid.x, self.min.y), Vec2::new(self.max.x, mid.y)),
        ]
    }
}

fn wrap_axis(v: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    let mut w = min + (v - min).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative offsets.
    if w >= max {
        w = min;
    }
    w
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
