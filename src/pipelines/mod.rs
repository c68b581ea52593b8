//! Built-in GLSL ES 3.00 shader sources.
//!
//! Every built-in material shares the vertex stage in `mesh.vert`
//! (attributes at locations 0/1/2). `basic` samples the material image;
//! `light` adds ambient, directional, point and spot lighting.
//!
//! The sources target WebGL2 / GLES 3.0; desktop contexts need
//! `GL_ARB_ES3_compatibility` to accept them.

pub mod basic;
pub mod light;

pub(crate) const VERSION_HEADER: &str = "#version 300 es\nprecision highp float;\n";

/// Uniform names shared by the built-in shaders and the renderer.
pub mod uniforms {
    pub const MODEL: &str = "u_model";
    pub const VIEW: &str = "u_view";
    pub const PROJECTION: &str = "u_projection";
    pub const TEXTURE: &str = "u_texture";
    pub const AMBIENT_COLOR: &str = "u_ambientColor";
    pub const AMBIENT_INTENSITY: &str = "u_ambientIntensity";
    pub const SHININESS: &str = "u_shininess";
    pub const SPECULAR_COLOR: &str = "u_specularColor";
}

pub fn vertex_shader() -> String {
    format!("{VERSION_HEADER}{}", include_str!("mesh.vert"))
}
