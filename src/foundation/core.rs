pub use kurbo::Vec2;

/// Intrinsic pixel dimensions of decoded content, before any viewport fitting.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelDims {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelDims {
    /// Dimensions reported by a decoder that found no frame geometry.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Construct dimensions from raw pixel counts.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either axis is zero, the single-still classification signal.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Target rectangle the content is fitted into, in host units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Construct a viewport from host-side extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when the viewport has no drawable area.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
