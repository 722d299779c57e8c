/// Curve mapping scroll progress onto the frame timeline.
///
/// Frame position follows scroll position linearly; `"none"` is accepted as a config alias.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[default]
    #[serde(alias = "none")]
    Linear,
}

impl Ease {
    /// Map normalized progress onto `[0, 1]`. Out-of-range input is clamped and NaN maps to 0.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/ease.rs"]
mod tests;
