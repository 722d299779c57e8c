pub(crate) mod renderer;
pub(crate) mod surface;

pub use renderer::Renderer;
pub use surface::{MAX_SURFACE_DIM, Surface};
