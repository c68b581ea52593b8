//! Decoded images a material can sample.
//!
//! A [`Texture`] is CPU-side pixel data plus a stable identity. The GPU image
//! is created lazily the first time a material using it is drawn, see
//! [`crate::resources::texture::TextureBinder`].

use image::{GenericImageView, ImageFormat, load_from_memory_with_format};

use crate::{data_structures::identity, error::RenderError};

identity!(
    /// Cache identity of a [`Texture`].
    TextureId
);

/// RGBA8 pixels, row-major, top row first.
#[derive(Clone, Debug)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    pub label: Option<String>,
}

impl Texture {
    /// # Panics
    ///
    /// If `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "RGBA8 texture data must be width * height * 4 bytes"
        );
        Self {
            id: TextureId::fresh(),
            width,
            height,
            pixels,
            label: None,
        }
    }

    /// Load a texture from raw image file contents (PNG, JPEG, BMP).
    ///
    /// `format` is an optional file extension hint (e.g. "png"); without it the
    /// format is guessed from the data.
    pub fn from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<Self, RenderError> {
        let img = match format.and_then(ImageFormat::from_extension) {
            None => image::load_from_memory(bytes)?,
            Some(fmt) => load_from_memory_with_format(bytes, fmt)?,
        };
        Ok(Self::from_image(&img, Some(label)))
    }

    pub fn from_image(img: &image::DynamicImage, label: Option<&str>) -> Self {
        let (width, height) = img.dimensions();
        let mut texture = Self::from_rgba8(width, height, img.to_rgba8().into_raw());
        texture.label = label.map(str::to_string);
        texture
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
