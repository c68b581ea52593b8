//! Scene data: what the renderer draws, independent of any GPU state.
//!
//! - `color` holds normalized colors and the flat-color cache identity
//! - `geometry` holds vertex attributes and indices for one mesh shape
//! - `material` describes shader sources, uniforms and surface of a mesh
//! - `texture` holds decoded RGBA images
//! - `light` holds directional, point and spot lights
//! - `transform` holds node transforms
//! - `camera` holds view and projection matrices
//! - `scene_graph` enables hierarchical scene organization and flattening

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out process-unique identities for geometries, materials and textures.
pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn fresh() -> Self {
                Self($crate::data_structures::next_id())
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }
    };
}
pub(crate) use identity;

pub mod camera;
pub mod color;
pub mod geometry;
pub mod transform;
pub mod light;
pub mod material;
pub mod scene_graph;
pub mod texture;
