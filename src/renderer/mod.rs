//! WebGPU rendering module
//!
//! `scene` decides what is on screen; `shapes` turns that into vertices;
//! `pipeline` owns the GPU side.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawCommand, Frame, TextAnchor, TextItem, compose};
