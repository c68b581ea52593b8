//! Light sources placed in the scene graph.
//!
//! Point and spot lights take their position from the world transform of the
//! node carrying them; directional and spot lights carry their own direction.

use cgmath::{Angle, Vector3};

use crate::data_structures::color::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightSource {
    Directional {
        /// Direction the light travels in.
        direction: Vector3<f32>,
    },
    Point,
    Spot {
        direction: Vector3<f32>,
        /// Cosine of the cone half-angle.
        limit: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub source: LightSource,
}

impl Light {
    /// `direction` should be non-zero; a zero vector leaves the light dark.
    pub fn directional(color: Color, intensity: f32, direction: Vector3<f32>) -> Self {
        Self {
            color,
            intensity,
            source: LightSource::Directional { direction },
        }
    }

    pub fn point(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            source: LightSource::Point,
        }
    }

    /// A spot light lighting everything within `half_angle` of `direction`.
    /// `direction` should be non-zero.
    pub fn spot(
        color: Color,
        intensity: f32,
        direction: Vector3<f32>,
        half_angle: impl Into<cgmath::Rad<f32>>,
    ) -> Self {
        Self {
            color,
            intensity,
            source: LightSource::Spot {
                direction,
                limit: half_angle.into().cos(),
            },
        }
    }

    /// Color and intensity packed as `[r, g, b, intensity]`.
    pub fn color_intensity(&self) -> [f32; 4] {
        [self.color.r, self.color.g, self.color.b, self.intensity]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_limit_is_cosine_of_half_angle() {
        let light = Light::spot(Color::WHITE, 1.0, Vector3::unit_z(), cgmath::Deg(60.0));
        match light.source {
            LightSource::Spot { limit, .. } => assert!((limit - 0.5).abs() < 1e-6),
            other => panic!("expected a spot light, got {other:?}"),
        }
    }

    #[test]
    fn packs_color_with_intensity() {
        let light = Light::point(Color::rgb(0.1, 0.2, 0.3), 2.0);
        assert_eq!(light.color_intensity(), [0.1, 0.2, 0.3, 2.0]);
    }
}
