//! Utility types, used throughout the crate.

/// A float which is finite. Not NaN, not infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

// Never NaN, so PartialEq acts like Eq.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Finite floats always compare.
        self.0.total_cmp(&other.0)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // -0.0 == 0.0, so they must hash the same.
        let normalized = if self.0 == 0.0 { 0.0f32 } else { self.0 };
        state.write_u32(normalized.to_bits());
    }
}

/// A position in canvas space, in logical pixels with the origin at the top left.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Point {
    pub x: FiniteF32,
    pub y: FiniteF32,
}
impl Point {
    pub const ORIGIN: Self = Self {
        x: FiniteF32::ZERO,
        y: FiniteF32::ZERO,
    };
    /// Create a point from raw coordinates. Fails if either is NaN or infinite.
    pub fn new(x: f32, y: f32) -> Result<Self, FiniteF32Error> {
        Ok(Self {
            x: FiniteF32::new(x)?,
            y: FiniteF32::new(y)?,
        })
    }
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x.get()
    }
    #[must_use]
    pub fn y(&self) -> f32 {
        self.y.get()
    }
}
impl TryFrom<[f32; 2]> for Point {
    type Error = FiniteF32Error;
    fn try_from([x, y]: [f32; 2]) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x(), value.y()]
    }
}
