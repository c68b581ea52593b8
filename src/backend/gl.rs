//! [`Gpu`] over a `glow` context (OpenGL 3.3, GLES 3.0 and WebGL2).
//!
//! Creating the context and making it current belongs to the windowing layer;
//! this type only wraps an already-loaded `glow::Context`.

use glow::HasContext;

use crate::{
    backend::{
        BufferTarget, Capability, ClearMask, Gpu, IndexType, Sampling, ShaderStage,
        TextureFilter, TextureWrap, Topology,
    },
    error::RenderError,
};

pub struct GlowGpu {
    gl: glow::Context,
}

impl GlowGpu {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

impl std::fmt::Debug for GlowGpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowGpu").finish_non_exhaustive()
    }
}

fn target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn filter(filter: TextureFilter) -> i32 {
    (match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }) as i32
}

// All calls below are plain GL entry points on the context owned by `self`;
// the handles passed in were created by that same context.
impl Gpu for GlowGpu {
    type Program = <glow::Context as HasContext>::Program;
    type Shader = <glow::Context as HasContext>::Shader;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;
    type VertexArray = <glow::Context as HasContext>::VertexArray;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type Texture = <glow::Context as HasContext>::Texture;

    fn enable(&self, capability: Capability) {
        let parameter = match capability {
            Capability::CullFace => glow::CULL_FACE,
            Capability::DepthTest => glow::DEPTH_TEST,
        };
        unsafe { self.gl.enable(parameter) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: ClearMask) {
        let mut bits = 0;
        if mask.color {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if mask.depth {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(bits) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, RenderError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(kind) }.map_err(|e| RenderError::exhausted("shader", e))
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, RenderError> {
        unsafe { self.gl.create_program() }.map_err(|e| RenderError::exhausted("program", e))
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, RenderError> {
        unsafe { self.gl.create_vertex_array() }
            .map_err(|e| RenderError::exhausted("vertex array", e))
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, RenderError> {
        unsafe { self.gl.create_buffer() }.map_err(|e| RenderError::exhausted("buffer", e))
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_buffer(&self, buffer_target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target(buffer_target), buffer) }
    }

    fn buffer_data(&self, buffer_target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target(buffer_target), data, glow::STATIC_DRAW)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, normalized: bool) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, normalized, 0, 0)
        }
    }

    fn create_texture(&self) -> Result<Self::Texture, RenderError> {
        unsafe { self.gl.create_texture() }.map_err(|e| RenderError::exhausted("texture", e))
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: Option<Self::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            // rows of odd-width images are not 4-byte aligned otherwise
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
        }
    }

    fn texture_sampling(&self, sampling: Sampling) {
        let wrap = (match sampling.wrap {
            TextureWrap::Repeat => glow::REPEAT,
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        }) as i32;
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter(sampling.min_filter),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter(sampling.mag_filter),
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
        }
    }

    fn generate_mipmap(&self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) }
    }

    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(location, false, value) }
    }

    fn uniform3(&self, location: Option<&Self::UniformLocation>, value: &[f32; 3]) {
        unsafe { self.gl.uniform_3_f32_slice(location, value) }
    }

    fn uniform4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 4]) {
        unsafe { self.gl.uniform_4_f32_slice(location, value) }
    }

    fn uniform1f(&self, location: Option<&Self::UniformLocation>, value: f32) {
        unsafe { self.gl.uniform_1_f32(location, value) }
    }

    fn uniform1i(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(location, value) }
    }

    fn draw_elements(&self, topology: Topology, count: i32, index_type: IndexType, offset: i32) {
        let mode = match topology {
            Topology::Triangles => glow::TRIANGLES,
        };
        let element_type = match index_type {
            IndexType::U16 => glow::UNSIGNED_SHORT,
        };
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }
}
