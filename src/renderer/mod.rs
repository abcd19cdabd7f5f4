//! WebGPU rendering module
//!
//! Reads a [`crate::sim::Frame`] and the board [`crate::Layout`]; never
//! touches simulation state directly.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, Viewport};
pub use vertex::Vertex;
