//! WebGPU rendering module
//!
//! Sprites are drawn as line lists; the frame is assembled on the CPU by
//! [`LineBatch`] and uploaded by [`RenderState`].

pub mod lines;
pub mod pipeline;
pub mod vertex;

pub use lines::{Frame, LineBatch};
pub use pipeline::RenderState;
pub use vertex::Vertex;
