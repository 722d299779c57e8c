//! Scroll-scrubbed frame-sequence playback.
//!
//! A large ordered set of still images is loaded lazily and played back as a function of scroll
//! position over a pinned container, giving a scrubbable video without a codec:
//!
//! - [`AssetLoader`] fills the [`FrameStore`] in a first batch, one barrier, then the rest
//! - [`LoadingGate`] keeps a poster overlay up until enough frames resolved
//! - [`bind`] turns scroll offsets on a [`ScrollHost`] into snapped frame indices
//! - [`Renderer`] paints the target frame, or leaves the last frame up when it is missing
//!
//! [`PlayerSession`] and [`Player`] wire these together for a page session and a mount.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod gate;
mod loader;
mod player;
mod render;
mod store;
mod timeline;

pub use crate::assets::{FrameImage, FramePathTemplate, decode_image, normalize_rel_path};
pub use crate::config::{MAX_SCRUB_SECS, PlayerConfig};
pub use crate::foundation::core::{Canvas, Rect, Size, snap_frame};
pub use crate::foundation::error::{PlayerError, PlayerResult};
pub use crate::foundation::topic::{SubId, Subscription, Topic};
pub use crate::gate::{GateState, GateUpdate, LoadingGate};
pub use crate::loader::{
    AssetLoader, DirFetcher, DirFetcherOpts, FetchCompletion, FetchOutcome, FetchRequest,
    FrameFetcher, LoaderStats, RecordingFetcher,
};
pub use crate::player::{Player, PlayerSession};
pub use crate::render::{MAX_SURFACE_DIM, Renderer, Surface};
pub use crate::store::{FrameStore, Slot, SlotState};
pub use crate::timeline::{Ease, ScrollBinding, ScrollHost, TimelineOpts, bind, scroll_progress};
