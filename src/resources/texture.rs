//! GPU images per texture or flat color.

use crate::{
    backend::Gpu,
    cache::ResourceCache,
    data_structures::{color::ColorId, material::Surface, texture::TextureId},
    error::RenderError,
    resources::shader,
};

/// Images are keyed by texture identity, flat colors by their quantized
/// color, so every material drawn in the same color shares one 1x1 image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Texture(TextureId),
    Color(ColorId),
}

impl From<&Surface<'_>> for TextureKey {
    fn from(surface: &Surface<'_>) -> Self {
        match surface {
            Surface::Texture(texture) => TextureKey::Texture(texture.id()),
            Surface::Color(color) => TextureKey::Color(color.id()),
        }
    }
}

#[derive(Debug)]
pub struct TextureBinder<G: Gpu> {
    textures: ResourceCache<TextureKey, G::Texture>,
}

impl<G: Gpu> TextureBinder<G> {
    pub fn new() -> Self {
        Self {
            textures: ResourceCache::new(),
        }
    }

    /// Returns the image for `surface`, uploading it on first use. A fresh
    /// upload leaves the image bound on the active unit.
    pub fn bind(&mut self, gpu: &G, surface: Surface<'_>) -> Result<G::Texture, RenderError> {
        let key = TextureKey::from(&surface);
        self.textures
            .get_or_try_insert_with(key, || {
                let handle = match surface {
                    Surface::Texture(texture) => shader::create_texture(gpu, texture)?,
                    Surface::Color(color) => shader::create_single_color_texture(gpu, color)?,
                };
                log::info!("created texture for {key:?}");
                Ok(handle)
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl<G: Gpu> Default for TextureBinder<G> {
    fn default() -> Self {
        Self::new()
    }
}
