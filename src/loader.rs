pub(crate) mod asset_loader;
pub(crate) mod fetch;

pub use asset_loader::{AssetLoader, LoaderStats};
pub use fetch::{
    DirFetcher, DirFetcherOpts, FetchCompletion, FetchOutcome, FetchRequest, FrameFetcher,
    RecordingFetcher,
};
