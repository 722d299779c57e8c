use crate::foundation::error::{PlayerError, PlayerResult};

pub use kurbo::{Rect, Size};

/// Logical drawing-surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> PlayerResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlayerError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Byte length of a tightly packed RGBA8 raster of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Snap a continuous frame value to the nearest slot index in `[0, len - 1]`.
///
/// Non-finite values snap to 0. An empty sequence always yields 0.
pub fn snap_frame(value: f64, len: usize) -> usize {
    if len == 0 || !value.is_finite() {
        return 0;
    }
    let max = (len - 1) as f64;
    value.round().clamp(0.0, max) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
