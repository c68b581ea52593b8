//! Materials: shader sources, the uniforms those shaders read, and the
//! surface (image or flat color) a mesh is shaded with.
//!
//! The built-in kinds generate their GLSL from [`crate::pipelines`]. Lit
//! kinds bake a light capacity into the fragment stage when the material is
//! created; see [`Material::with_light_capacity`].
//!
//! A material's [`MaterialId`] is the program cache key. Cloning a material
//! keeps its id, so clones share one compiled program. Anything that changes
//! the shader text hands out a new id.

use std::rc::Rc;

use crate::{
    data_structures::{
        color::{Color, ColorId},
        identity,
        texture::Texture,
    },
    lighting::LightShape,
    pipelines::{self, basic, light},
};

identity!(
    /// Cache identity of a [`Material`].
    MaterialId
);

/// Lights per kind the built-in lit shaders can address unless told otherwise.
pub const DEFAULT_LIGHT_CAPACITY: LightShape = LightShape::new(4, 4, 4);

#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    /// Unlit; outputs the sampled surface color.
    Basic,
    /// Diffuse lighting.
    Lambert,
    /// Diffuse plus Blinn-Phong specular.
    Phong {
        shininess: f32,
        specular_color: Color,
    },
}

impl MaterialKind {
    pub fn is_lit(&self) -> bool {
        !matches!(self, MaterialKind::Basic)
    }
}

/// What texture unit 0 samples when a material is drawn.
#[derive(Clone, Copy, Debug)]
pub enum Surface<'a> {
    Texture(&'a Texture),
    /// Drawn through a 1x1 texture of this color.
    Color(Color),
}

impl Surface<'_> {
    pub fn color_id(&self) -> Option<ColorId> {
        match self {
            Surface::Color(color) => Some(color.id()),
            Surface::Texture(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    id: MaterialId,
    kind: MaterialKind,
    vertex_shader: String,
    fragment_shader: String,
    uniforms: Vec<String>,
    texture: Option<Rc<Texture>>,
    color: Color,
    light_capacity: LightShape,
    /// Shader text comes from [`crate::pipelines`] and may be regenerated.
    generated: bool,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self::built_in(
            MaterialKind::Basic,
            pipelines::vertex_shader(),
            basic::fragment_shader(),
            basic::uniforms(),
        )
        .with_color(color)
    }

    pub fn lambert(color: Color) -> Self {
        Self::lit(MaterialKind::Lambert, color)
    }

    pub fn phong(color: Color, shininess: f32, specular_color: Color) -> Self {
        Self::lit(
            MaterialKind::Phong {
                shininess,
                specular_color,
            },
            color,
        )
    }

    fn lit(kind: MaterialKind, color: Color) -> Self {
        let phong = matches!(kind, MaterialKind::Phong { .. });
        Self::built_in(
            kind,
            pipelines::vertex_shader(),
            light::fragment_shader(DEFAULT_LIGHT_CAPACITY, phong),
            light::uniforms(phong),
        )
        .with_color(color)
    }

    fn built_in(
        kind: MaterialKind,
        vertex_shader: String,
        fragment_shader: String,
        uniforms: Vec<String>,
    ) -> Self {
        Self {
            generated: true,
            ..Self::custom(kind, vertex_shader, fragment_shader, uniforms)
        }
    }

    /// A material with caller-supplied shaders.
    ///
    /// `uniforms` lists the non-light uniform names the program reads. A lit
    /// `kind` makes the renderer upload ambient and light uniforms, so the
    /// shaders should declare the same light arrays as the built-in ones.
    pub fn custom(
        kind: MaterialKind,
        vertex_shader: impl Into<String>,
        fragment_shader: impl Into<String>,
        uniforms: Vec<String>,
    ) -> Self {
        Self {
            id: MaterialId::fresh(),
            kind,
            vertex_shader: vertex_shader.into(),
            fragment_shader: fragment_shader.into(),
            uniforms,
            texture: None,
            color: Color::WHITE,
            light_capacity: DEFAULT_LIGHT_CAPACITY,
            generated: false,
        }
    }

    pub fn with_texture(mut self, texture: Rc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Regenerates the built-in lit fragment stage with room for `capacity`
    /// lights of each kind, under a new [`MaterialId`].
    ///
    /// Basic materials and materials with caller-supplied shaders are returned
    /// unchanged.
    pub fn with_light_capacity(mut self, capacity: LightShape) -> Self {
        if !self.generated || !self.is_lit() {
            log::debug!(
                "material {} keeps its shaders, light capacity {capacity} ignored",
                self.id.get()
            );
            return self;
        }
        let phong = matches!(self.kind, MaterialKind::Phong { .. });
        self.fragment_shader = light::fragment_shader(capacity, phong);
        self.light_capacity = capacity;
        self.id = MaterialId::fresh();
        self
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    pub fn is_lit(&self) -> bool {
        self.kind.is_lit()
    }

    pub fn vertex_shader(&self) -> &str {
        &self.vertex_shader
    }

    pub fn fragment_shader(&self) -> &str {
        &self.fragment_shader
    }

    pub fn uniforms(&self) -> &[String] {
        &self.uniforms
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn light_capacity(&self) -> LightShape {
        self.light_capacity
    }

    /// The texture if one is set, the flat color otherwise.
    pub fn surface(&self) -> Surface<'_> {
        match &self.texture {
            Some(texture) => Surface::Texture(texture),
            None => Surface::Color(self.color),
        }
    }
}
