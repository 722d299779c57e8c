use crate::foundation::core::Canvas;
use crate::foundation::error::{PlayerError, PlayerResult};

/// Largest width or height a surface may be acquired with.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Fixed-resolution RGBA8 drawing surface (premultiplied alpha).
///
/// The logical resolution never follows the displayed size; hosts scale the raster themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    /// Acquire a transparent surface of `canvas` size.
    pub fn acquire(canvas: Canvas) -> PlayerResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PlayerError::surface_unavailable(
                "surface dimensions must be > 0",
            ));
        }
        if canvas.width > MAX_SURFACE_DIM || canvas.height > MAX_SURFACE_DIM {
            return Err(PlayerError::surface_unavailable(format!(
                "surface {}x{} exceeds {MAX_SURFACE_DIM} px per side",
                canvas.width, canvas.height
            )));
        }
        Ok(Self {
            canvas,
            data: vec![0; canvas.rgba_len()],
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Raster bytes, row-major premultiplied RGBA8.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Raster converted to straight (non-premultiplied) RGBA8, as image encoders expect.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Replace the raster with `src` composited over transparent black.
    ///
    /// On error the raster is left as it was.
    pub(crate) fn present(&mut self, src: &[u8]) -> PlayerResult<()> {
        self.check_len(src)?;
        self.clear();
        self.draw_full(src)
    }

    /// Source-over composite of a full-surface premultiplied raster.
    pub(crate) fn draw_full(&mut self, src: &[u8]) -> PlayerResult<()> {
        self.check_len(src)?;
        for (d, s) in self.data.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let inv = 255 - u16::from(s[3]);
            for c in 0..4 {
                d[c] = (u16::from(s[c]) + (u16::from(d[c]) * inv + 127) / 255).min(255) as u8;
            }
        }
        Ok(())
    }

    fn check_len(&self, src: &[u8]) -> PlayerResult<()> {
        if src.len() != self.data.len() {
            return Err(PlayerError::validation(format!(
                "draw source has {} bytes, surface has {}",
                src.len(),
                self.data.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
