use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::assets::{FramePathTemplate, normalize_rel_path};
use crate::foundation::core::Canvas;
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::timeline::TimelineOpts;

/// Longest accepted scrub lag, in seconds.
pub const MAX_SCRUB_SECS: f64 = 60.0;

/// Every tunable of a frame-sequence player.
///
/// All fields have defaults, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sequence length N.
    pub frame_count: usize,
    /// Size B of the first batch, requested before the barrier.
    pub batch_size: usize,
    /// Resolved count T at which the poster overlay is removed.
    pub ready_threshold: usize,
    pub frames: FramePathTemplate,
    /// Poster image shown while loading.
    pub poster: String,
    /// Logical resolution of the drawing surface.
    pub canvas: Canvas,
    pub timeline: TimelineOpts,
    /// Container height in viewport heights; encodes the playback duration.
    pub container_viewports: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_count: 180,
            batch_size: 30,
            ready_threshold: 30,
            frames: FramePathTemplate::default(),
            poster: "video-poster.webp".to_owned(),
            canvas: Canvas::default(),
            timeline: TimelineOpts::default(),
            container_viewports: 8.0,
        }
    }
}

impl PlayerConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> PlayerResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PlayerError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> PlayerResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| PlayerError::serde(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PlayerResult<()> {
        if self.frame_count == 0 {
            return Err(PlayerError::validation("frame_count must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(PlayerError::validation("batch_size must be > 0"));
        }
        if self.frame_count > 1 && self.batch_size >= self.frame_count {
            return Err(PlayerError::validation(
                "batch_size must be smaller than frame_count",
            ));
        }
        if self.ready_threshold > self.frame_count {
            return Err(PlayerError::validation(
                "ready_threshold must not exceed frame_count",
            ));
        }
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if !(0.0..=MAX_SCRUB_SECS).contains(&self.timeline.scrub_secs) {
            return Err(PlayerError::validation(format!(
                "timeline.scrub_secs must be within 0..={MAX_SCRUB_SECS}"
            )));
        }
        if !self.container_viewports.is_finite() || self.container_viewports <= 1.0 {
            return Err(PlayerError::validation(
                "container_viewports must be finite and > 1",
            ));
        }
        self.frames.validate()?;
        normalize_rel_path(&self.poster)?;
        Ok(())
    }

    /// Asset path of every slot, in slot order.
    pub fn frame_paths(&self) -> Vec<String> {
        (0..self.frame_count)
            .map(|slot| self.frames.path_for(slot))
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
