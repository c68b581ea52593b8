//! Lit fragment stage for Lambert and Phong materials.
//!
//! Light arrays are declared with a literal size of `capacity + 1` because
//! lights occupy indices `1..=capacity`. The capacity is fixed when the
//! material is created; a frame with more lights than that leaves the extra
//! lights without a slot.

use std::fmt::Write;

use crate::{
    lighting::LightShape,
    pipelines::{VERSION_HEADER, basic, uniforms},
};

const LIGHT_STRUCTS: &str = "\
struct DirLight { vec3 direction; vec4 ci; };
struct PointLight { vec3 position; vec4 ci; };
struct SpotLight { vec3 direction; vec4 ci; vec3 position; float limit; };
";

pub fn fragment_shader(capacity: LightShape, phong: bool) -> String {
    let mut source = String::from(VERSION_HEADER);
    if phong {
        source.push_str("#define PHONG\n");
    }
    // writing into a String cannot fail
    let _ = write!(
        source,
        "#define NUM_DIR_LIGHTS {}\n\
         #define NUM_POINT_LIGHTS {}\n\
         #define NUM_SPOT_LIGHTS {}\n\
         {LIGHT_STRUCTS}\
         uniform DirLight dirLights[{}];\n\
         uniform PointLight pointLights[{}];\n\
         uniform SpotLight spotLights[{}];\n",
        capacity.directional,
        capacity.point,
        capacity.spot,
        capacity.directional + 1,
        capacity.point + 1,
        capacity.spot + 1,
    );
    source.push_str(include_str!("lit.frag"));
    source
}

pub fn uniforms(phong: bool) -> Vec<String> {
    let mut names = basic::uniforms();
    names.push(uniforms::AMBIENT_COLOR.to_string());
    names.push(uniforms::AMBIENT_INTENSITY.to_string());
    if phong {
        names.push(uniforms::SHININESS.to_string());
        names.push(uniforms::SPECULAR_COLOR.to_string());
    }
    names
}
