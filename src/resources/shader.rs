//! GPU object creation shared by the binders: programs and images.

use crate::{
    backend::{Gpu, Sampling, ShaderStage, TextureFilter, TextureWrap},
    data_structures::{color::Color, texture::Texture},
    error::RenderError,
};

/// Compiles both stages and links them. The stage objects are released
/// whether or not linking succeeds.
pub fn compile_program<G: Gpu>(
    gpu: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<G::Program, RenderError> {
    let vertex = compile_shader(gpu, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_shader(gpu, ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(e) => {
            gpu.delete_shader(vertex);
            return Err(e);
        }
    };

    let program = match gpu.create_program() {
        Ok(program) => program,
        Err(e) => {
            gpu.delete_shader(vertex);
            gpu.delete_shader(fragment);
            return Err(e);
        }
    };
    gpu.attach_shader(program, vertex);
    gpu.attach_shader(program, fragment);
    gpu.link_program(program);

    let linked = gpu.program_link_status(program);
    for shader in [vertex, fragment] {
        gpu.detach_shader(program, shader);
        gpu.delete_shader(shader);
    }
    if !linked {
        let log = gpu.program_info_log(program);
        gpu.delete_program(program);
        return Err(RenderError::Link { log });
    }
    Ok(program)
}

fn compile_shader<G: Gpu>(
    gpu: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, RenderError> {
    let shader = gpu.create_shader(stage)?;
    gpu.shader_source(shader, source);
    gpu.compile_shader(shader);
    if !gpu.shader_compile_status(shader) {
        let log = gpu.shader_info_log(shader);
        gpu.delete_shader(shader);
        return Err(RenderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Uploads `texture` with a full mip chain, trilinear filtering and repeat
/// wrapping. Leaves the new image bound on the active unit.
pub fn create_texture<G: Gpu>(gpu: &G, texture: &Texture) -> Result<G::Texture, RenderError> {
    let handle = gpu.create_texture()?;
    gpu.bind_texture(Some(handle));
    gpu.tex_image_2d_rgba8(texture.width(), texture.height(), texture.pixels());
    gpu.generate_mipmap();
    gpu.texture_sampling(Sampling {
        min_filter: TextureFilter::LinearMipmapLinear,
        mag_filter: TextureFilter::Linear,
        wrap: TextureWrap::Repeat,
    });
    Ok(handle)
}

/// A 1x1 image holding `color`, used for materials without a texture.
pub fn create_single_color_texture<G: Gpu>(
    gpu: &G,
    color: Color,
) -> Result<G::Texture, RenderError> {
    let handle = gpu.create_texture()?;
    gpu.bind_texture(Some(handle));
    gpu.tex_image_2d_rgba8(1, 1, &color.to_rgba8());
    gpu.texture_sampling(Sampling {
        min_filter: TextureFilter::Nearest,
        mag_filter: TextureFilter::Nearest,
        wrap: TextureWrap::ClampToEdge,
    });
    Ok(handle)
}
