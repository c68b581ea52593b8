//! Mesh shapes: vertex attributes plus a 16-bit index list.
//!
//! A [`Geometry`] is immutable once built; the renderer uploads it once and
//! keys the resulting vertex array by [`GeometryId`].

use crate::data_structures::identity;

identity!(
    /// Cache identity of a [`Geometry`].
    GeometryId
);

/// Shader locations used by the built-in shaders.
pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const UV_LOCATION: u32 = 2;

/// One vertex attribute stream of 32-bit floats.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub data: Vec<f32>,
    /// Components per vertex (1 to 4).
    pub item_size: i32,
    pub normalized: bool,
}

impl Attribute {
    pub fn new(data: Vec<f32>, item_size: i32) -> Self {
        Self {
            data,
            item_size,
            normalized: false,
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Geometry {
    id: GeometryId,
    attributes: Vec<(u32, Attribute)>,
    index: Vec<u16>,
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            id: GeometryId::fresh(),
            attributes: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Adds an attribute bound to shader `location`. Attributes are uploaded
    /// in the order they were added.
    pub fn with_attribute(mut self, location: u32, attribute: Attribute) -> Self {
        self.attributes.push((location, attribute));
        self
    }

    pub fn with_index(mut self, index: Vec<u16>) -> Self {
        self.index = index;
        self
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn attributes(&self) -> &[(u32, Attribute)] {
        &self.attributes
    }

    pub fn index(&self) -> &[u16] {
        &self.index
    }

    /// Number of indices drawn.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// A `width` x `height` quad in the XY plane facing +Z.
    pub fn quad(width: f32, height: f32) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        Self::new()
            .with_attribute(
                POSITION_LOCATION,
                Attribute::new(vec![-w, -h, 0.0, w, -h, 0.0, w, h, 0.0, -w, h, 0.0], 3),
            )
            .with_attribute(NORMAL_LOCATION, Attribute::new([0.0, 0.0, 1.0].repeat(4), 3))
            .with_attribute(
                UV_LOCATION,
                Attribute::new(vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0], 2),
            )
            .with_index(vec![0, 1, 2, 0, 2, 3])
    }

    /// An axis-aligned box centered on the origin, four vertices per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (w, h, d) = (width / 2.0, height / 2.0, depth / 2.0);
        // (normal, u axis, v axis, half extents along normal/u/v)
        let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [w, d, h]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [w, d, h]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [h, w, d]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [h, w, d]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [d, w, h]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [d, w, h]),
        ];

        let mut positions = Vec::with_capacity(6 * 4 * 3);
        let mut normals = Vec::with_capacity(6 * 4 * 3);
        let mut uvs = Vec::with_capacity(6 * 4 * 2);
        let mut index = Vec::with_capacity(6 * 6);
        for (face, (n, u, v, [en, eu, ev])) in faces.into_iter().enumerate() {
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                for axis in 0..3 {
                    positions.push(n[axis] * en + u[axis] * eu * su + v[axis] * ev * sv);
                }
                normals.extend_from_slice(&n);
                uvs.extend_from_slice(&[(su + 1.0) / 2.0, (1.0 - sv) / 2.0]);
            }
            let base = (face * 4) as u16;
            index.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new()
            .with_attribute(POSITION_LOCATION, Attribute::new(positions, 3))
            .with_attribute(NORMAL_LOCATION, Attribute::new(normals, 3))
            .with_attribute(UV_LOCATION, Attribute::new(uvs, 2))
            .with_index(index)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    #[test]
    fn quad_has_four_vertices_and_six_indices() {
        let quad = Geometry::quad(2.0, 2.0);
        assert_eq!(quad.attributes()[0].1.data.len() / 3, 4);
        assert_eq!(quad.count(), 6);
    }

    #[test]
    fn cuboid_faces_wind_counter_clockwise_outwards() {
        let cuboid = Geometry::cuboid(1.0, 2.0, 3.0);
        assert_eq!(cuboid.count(), 36);
        let positions = &cuboid.attributes()[0].1.data;
        let normals = &cuboid.attributes()[1].1.data;
        let vertex = |i: u16| {
            let i = i as usize * 3;
            Vector3::new(positions[i], positions[i + 1], positions[i + 2])
        };
        for tri in cuboid.index().chunks(3) {
            let face_normal = (vertex(tri[1]) - vertex(tri[0])).cross(vertex(tri[2]) - vertex(tri[0]));
            let n = tri[0] as usize * 3;
            let expected = Vector3::new(normals[n], normals[n + 1], normals[n + 2]);
            assert!(face_normal.dot(expected) > 0.0);
        }
    }
}
