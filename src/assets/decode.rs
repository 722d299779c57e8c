use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PlayerError, PlayerResult};

/// Decoded frame in premultiplied RGBA8 form.
///
/// Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl FrameImage {
    /// Wrap raw premultiplied RGBA8 pixels.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> PlayerResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(PlayerError::validation(format!(
                "frame image {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Solid-color frame; handy for tools and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PlayerResult<Self> {
        let px = (width as usize) * (height as usize);
        Self::from_rgba8_premul(width, height, rgba.repeat(px))
    }

    /// Pixels resampled to `width`x`height`, row-major premultiplied RGBA8.
    pub fn scaled_rgba8(&self, width: u32, height: u32) -> PlayerResult<Vec<u8>> {
        if width == self.width && height == self.height {
            return Ok(self.rgba8_premul.as_ref().clone());
        }
        let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_slice(),
        )
        .ok_or_else(|| PlayerError::validation("frame image buffer size mismatch"))?;
        let scaled =
            image::imageops::resize(&src, width, height, image::imageops::FilterType::Triangle);
        Ok(scaled.into_raw())
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PlayerResult<FrameImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(FrameImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
