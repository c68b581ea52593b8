//! Normalized RGBA colors.

/// A color with components in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Cache identity of a flat color: the color quantized to 8-bit RGBA.
///
/// Colors that quantize to the same bytes share one GPU image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ColorId(u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let f = |v: u8| v as f32 / 255.0;
        Self::rgb(f(r), f(g), f(b))
    }

    /// `0xRRGGBB`, fully opaque.
    pub fn hex(hex: u32) -> Self {
        Self::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn id(self) -> ColorId {
        ColorId(u32::from_be_bytes(self.to_rgba8()))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_bytes() {
        assert_eq!(Color::hex(0xff8000).to_rgba8(), [255, 128, 0, 255]);
    }

    #[test]
    fn nearly_equal_colors_share_an_identity() {
        assert_eq!(Color::rgb(0.5, 0.5, 0.5).id(), Color::rgb(0.501, 0.5, 0.5).id());
        assert_ne!(Color::rgb(0.5, 0.5, 0.5).id(), Color::rgb(0.6, 0.5, 0.5).id());
        assert_ne!(Color::rgba(1.0, 1.0, 1.0, 0.5).id(), Color::WHITE.id());
    }
}
