//! Lazily created GPU resources.
//!
//! Each binder memoizes one resource kind by the identity of its source:
//! [`mesh::GeometryBinder`] vertex arrays per geometry,
//! [`program::ProgramBinder`] linked programs per material and
//! [`texture::TextureBinder`] images per texture or flat color. The
//! [`shader`] module holds the creation routines they share.

pub mod mesh;
pub mod program;
pub mod shader;
pub mod texture;
