//! Rendering module
//!
//! Entities draw into the `Surface` abstraction; `ShapeBatch` tessellates
//! those calls into triangles and `RenderState` presents them with WebGPU.

pub mod batch;
pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use batch::ShapeBatch;
pub use draw::{Draw, draw_road, draw_scene};
pub use pipeline::RenderState;
pub use surface::Surface;
pub use vertex::Vertex;
