//! glint
//!
//! A minimal forward renderer for 3D scenes. Given a [`Scene`] and a
//! [`Camera`], [`Renderer::render`] draws every mesh through an immediate-mode
//! GPU backend, creating programs, vertex arrays and images lazily and
//! memoizing them by the identity of the scene object they came from.
//!
//! Lit materials read a variable number of directional, point and spot lights
//! from fixed-size uniform arrays. The renderer tracks the frame's light shape
//! and rebuilds a material's program whenever that shape changes.
//!
//! High-level modules
//! - `backend`: the [`Gpu`] capability, a `glow` implementation and a recording one
//! - `cache`: the identity-keyed cache behind every binder
//! - `context`: enable flags, viewport and renderer configuration
//! - `data_structures`: scene graph, geometry, materials, lights, textures, camera
//! - `lighting`: per-frame light shape and structured light slots
//! - `pipelines`: built-in GLSL sources
//! - `resources`: binders that create and memoize GPU resources
//! - `render`: the frame renderer
//! - `logging`: logger setup for applications
//!

pub mod backend;
pub mod cache;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod lighting;
pub mod logging;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::{Gpu, recording::RecordingGpu};
#[cfg(feature = "glow")]
pub use backend::gl::GlowGpu;
pub use cgmath;
pub use context::RendererConfig;
pub use data_structures::{
    camera::Camera,
    color::Color,
    geometry::{Attribute, Geometry},
    light::Light,
    material::{Material, MaterialKind},
    scene_graph::{Scene, SceneNode},
    texture::Texture,
    transform::Transform,
};
pub use error::RenderError;
pub use lighting::LightShape;
pub use render::{FrameStats, Renderer};
