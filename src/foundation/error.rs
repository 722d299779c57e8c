/// Result alias used across the crate.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Failure kinds of the frame-sequence player.
///
/// Component boundaries absorb `AssetLoad`, `SurfaceUnavailable` and `BindingSetup`; they are
/// surfaced as values only so that internal steps can use `?` and callers can log them.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset load error: {0}")]
    AssetLoad(String),

    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("binding setup error: {0}")]
    BindingSetup(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    pub fn binding_setup(msg: impl Into<String>) -> Self {
        Self::BindingSetup(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
