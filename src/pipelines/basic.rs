use crate::pipelines::{VERSION_HEADER, uniforms};

pub fn fragment_shader() -> String {
    format!("{VERSION_HEADER}{}", include_str!("basic.frag"))
}

pub fn uniforms() -> Vec<String> {
    [
        uniforms::MODEL,
        uniforms::VIEW,
        uniforms::PROJECTION,
        uniforms::TEXTURE,
    ]
    .map(String::from)
    .to_vec()
}
