//! Per-frame light bookkeeping.
//!
//! Lit shaders declare fixed-size light arrays, so a program's slot table
//! depends on how many lights of each kind exist. That count tuple is the
//! [`LightShape`]. Each frame [`LightingState::update`] computes it from the
//! scene; [`crate::resources::program::ProgramBinder`] compares it against
//! the shape a cached program was resolved for.
//!
//! Light slots are addressed by [`LightSlot`] rather than by uniform name.
//! Names are only formatted while a program is being built.

use std::fmt;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::{
    light::{Light, LightSource},
    scene_graph::SceneEntry,
};

/// Number of active lights of each kind.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct LightShape {
    pub directional: u32,
    pub point: u32,
    pub spot: u32,
}

impl LightShape {
    pub const fn new(directional: u32, point: u32, spot: u32) -> Self {
        Self {
            directional,
            point,
            spot,
        }
    }

    pub fn count(&self, kind: LightKind) -> u32 {
        match kind {
            LightKind::Directional => self.directional,
            LightKind::Point => self.point,
            LightKind::Spot => self.spot,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Every slot a program needs for this shape: indices `1..=count` per kind.
    pub fn slots(self) -> impl Iterator<Item = LightSlot> {
        LightKind::ALL.into_iter().flat_map(move |kind| {
            (1..=self.count(kind)).flat_map(move |index| {
                kind.fields()
                    .iter()
                    .map(move |&field| LightSlot { kind, index, field })
            })
        })
    }
}

impl fmt::Display for LightShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{dir: {}, point: {}, spot: {}}}",
            self.directional, self.point, self.spot
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    pub const ALL: [LightKind; 3] = [LightKind::Directional, LightKind::Point, LightKind::Spot];

    /// Name of the uniform array in the built-in lit shaders.
    pub fn array_name(self) -> &'static str {
        match self {
            LightKind::Directional => "dirLights",
            LightKind::Point => "pointLights",
            LightKind::Spot => "spotLights",
        }
    }

    pub fn fields(self) -> &'static [LightField] {
        match self {
            LightKind::Directional => &[LightField::Direction, LightField::ColorIntensity],
            LightKind::Point => &[LightField::Position, LightField::ColorIntensity],
            LightKind::Spot => &[
                LightField::Direction,
                LightField::ColorIntensity,
                LightField::Position,
                LightField::Limit,
            ],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LightField {
    Direction,
    /// `[r, g, b, intensity]`.
    ColorIntensity,
    Position,
    /// Cosine of the spot cone half-angle.
    Limit,
}

impl LightField {
    pub fn member_name(self) -> &'static str {
        match self {
            LightField::Direction => "direction",
            LightField::ColorIntensity => "ci",
            LightField::Position => "position",
            LightField::Limit => "limit",
        }
    }
}

/// Address of one light uniform: kind, 1-based index and struct member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LightSlot {
    pub kind: LightKind,
    pub index: u32,
    pub field: LightField,
}

impl LightSlot {
    pub fn new(kind: LightKind, index: u32, field: LightField) -> Self {
        Self { kind, index, field }
    }

    /// e.g. `spotLights[2].limit`
    pub fn uniform_name(&self) -> String {
        format!(
            "{}[{}].{}",
            self.kind.array_name(),
            self.index,
            self.field.member_name()
        )
    }
}

/// A light as seen this frame: the light and its world-space position.
#[derive(Debug, Copy, Clone)]
pub struct ActiveLight<'a> {
    pub light: &'a Light,
    pub position: Vector3<f32>,
}

impl ActiveLight<'_> {
    /// Normalized direction for directional and spot lights. A zero direction
    /// is passed through unchanged rather than normalized into NaNs.
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match self.light.source {
            LightSource::Directional { direction } | LightSource::Spot { direction, .. } => {
                if direction.magnitude2() == 0.0 {
                    Some(direction)
                } else {
                    Some(direction.normalize())
                }
            }
            LightSource::Point => None,
        }
    }

    pub fn limit(&self) -> Option<f32> {
        match self.light.source {
            LightSource::Spot { limit, .. } => Some(limit),
            _ => None,
        }
    }
}

/// The frame's lights partitioned by kind, each list in scene order.
#[derive(Debug, Default)]
pub struct FrameLights<'a> {
    pub directional: Vec<ActiveLight<'a>>,
    pub point: Vec<ActiveLight<'a>>,
    pub spot: Vec<ActiveLight<'a>>,
}

impl<'a> FrameLights<'a> {
    pub fn gather(entries: &[SceneEntry<'a>]) -> Self {
        let mut lights = Self::default();
        for entry in entries {
            if let Some(light) = entry.node.as_light() {
                let active = ActiveLight {
                    light,
                    position: entry.world_position(),
                };
                match light.source {
                    LightSource::Directional { .. } => lights.directional.push(active),
                    LightSource::Point => lights.point.push(active),
                    LightSource::Spot { .. } => lights.spot.push(active),
                }
            }
        }
        lights
    }

    pub fn of_kind(&self, kind: LightKind) -> &[ActiveLight<'a>] {
        match kind {
            LightKind::Directional => &self.directional,
            LightKind::Point => &self.point,
            LightKind::Spot => &self.spot,
        }
    }

    pub fn shape(&self) -> LightShape {
        LightShape::new(
            self.directional.len() as u32,
            self.point.len() as u32,
            self.spot.len() as u32,
        )
    }
}

/// The light shape of the current frame. Written once per frame before the
/// scene is traversed, read-only afterwards.
#[derive(Debug, Default)]
pub struct LightingState {
    shape: LightShape,
}

impl LightingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, lights: &FrameLights<'_>) -> LightShape {
        let shape = lights.shape();
        if shape != self.shape {
            log::debug!("light shape changed from {} to {}", self.shape, shape);
            self.shape = shape;
        }
        shape
    }

    pub fn shape(&self) -> LightShape {
        self.shape
    }
}
