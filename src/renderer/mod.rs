//! WebGPU rendering module
//!
//! The scene is rebuilt as a triangle list every frame from a read-only view
//! of the world; text overlays are handed back to the host.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Frame, Overlay, build_frame};
pub use vertex::Vertex;
