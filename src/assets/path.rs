use crate::foundation::error::{PlayerError, PlayerResult};

/// Normalize and validate a sequence-relative asset path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PlayerResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PlayerError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PlayerError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PlayerError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PlayerError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Maps a 0-based slot to its asset path: `{dir}/{prefix}{slot + 1, zero padded}.{extension}`.
///
/// With the defaults slot 0 is `frames/frame_0001.webp`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FramePathTemplate {
    /// Directory holding the sequence, relative to the asset root.
    pub dir: String,
    /// File name prefix before the number.
    pub prefix: String,
    /// Zero-padded width of the 1-based number.
    pub digits: usize,
    /// File extension without the dot.
    pub extension: String,
}

impl Default for FramePathTemplate {
    fn default() -> Self {
        Self {
            dir: "frames".to_owned(),
            prefix: "frame_".to_owned(),
            digits: 4,
            extension: "webp".to_owned(),
        }
    }
}

impl FramePathTemplate {
    /// Relative path of the asset backing `slot`.
    pub fn path_for(&self, slot: usize) -> String {
        let number = slot + 1;
        let file = format!(
            "{}{:0width$}.{}",
            self.prefix,
            number,
            self.extension,
            width = self.digits
        );
        if self.dir.is_empty() {
            file
        } else {
            format!("{}/{file}", self.dir.trim_end_matches('/'))
        }
    }

    pub fn validate(&self) -> PlayerResult<()> {
        if self.digits == 0 {
            return Err(PlayerError::validation("frame path digits must be > 0"));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\']) {
            return Err(PlayerError::validation(
                "frame path extension must be a bare, non-empty suffix",
            ));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(PlayerError::validation(
                "frame path prefix must not contain separators",
            ));
        }
        normalize_rel_path(&self.path_for(0))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/path.rs"]
mod tests;
