pub(crate) mod frame_store;

pub use frame_store::{FrameStore, Slot, SlotState};
