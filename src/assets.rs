pub(crate) mod decode;
pub(crate) mod path;

pub use decode::{FrameImage, decode_image};
pub use path::{FramePathTemplate, normalize_rel_path};
