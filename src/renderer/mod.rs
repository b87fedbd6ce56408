//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! Text and widgets are drawn by the DOM overlay in `platform::dom`.

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
