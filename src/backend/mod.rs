//! GPU capability consumed by the renderer.
//!
//! [`Gpu`] is a thin, safe, immediate-mode surface in the shape of GLES 3 /
//! WebGL2: the renderer binds state and then issues a draw. Two implementations
//! ship with the crate:
//!
//! - [`gl::GlowGpu`] drives a real context through `glow` (feature `glow`)
//! - [`recording::RecordingGpu`] records every call for headless use and tests

use std::fmt::Debug;

use crate::error::RenderError;

#[cfg(feature = "glow")]
pub mod gl;
pub mod recording;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Context flags the renderer enables once at construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    CullFace,
    DepthTest,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR_DEPTH: ClearMask = ClearMask {
        color: true,
        depth: true,
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data, captured by the bound vertex array.
    ElementArray,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Topology {
    Triangles,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexType {
    U16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

/// Sampler state applied to the texture bound on the active unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sampling {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap: TextureWrap,
}

/// Immediate-mode GPU primitives.
///
/// Calls operate on whatever is currently bound, exactly like the GL state
/// machine they mirror, so callers are responsible for ordering. Uniform
/// uploads take an optional location: `None` is a silent no-op, which is how an
/// unresolved slot behaves on a real context.
///
/// Implementations are single-threaded and must only be driven from the thread
/// that owns the context.
pub trait Gpu {
    type Program: Copy + Debug + PartialEq;
    type Shader: Copy + Debug;
    type UniformLocation: Clone + Debug;
    type VertexArray: Copy + Debug + PartialEq;
    type Buffer: Copy + Debug;
    type Texture: Copy + Debug + PartialEq;

    fn enable(&self, capability: Capability);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: ClearMask);

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, RenderError>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, RenderError>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, RenderError>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn create_buffer(&self) -> Result<Self::Buffer, RenderError>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Uploads static data to the buffer bound on `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Describes attribute `index` as `size` tightly packed 32-bit floats.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, normalized: bool);

    fn create_texture(&self) -> Result<Self::Texture, RenderError>;
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, texture: Option<Self::Texture>);
    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]);
    fn texture_sampling(&self, sampling: Sampling);
    fn generate_mipmap(&self);

    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]);
    fn uniform3(&self, location: Option<&Self::UniformLocation>, value: &[f32; 3]);
    fn uniform4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 4]);
    fn uniform1f(&self, location: Option<&Self::UniformLocation>, value: f32);
    fn uniform1i(&self, location: Option<&Self::UniformLocation>, value: i32);

    fn draw_elements(&self, topology: Topology, count: i32, index_type: IndexType, offset: i32);
}
