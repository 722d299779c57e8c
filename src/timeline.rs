pub(crate) mod binder;
pub(crate) mod ease;
pub(crate) mod scroll;

pub use binder::{ScrollBinding, TimelineOpts, bind};
pub use ease::Ease;
pub use scroll::{ScrollHost, scroll_progress};
