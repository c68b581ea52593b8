//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] owns a forest of [`SceneNode`]s. Nodes are groups, meshes or
//! lights; meshes share their [`Geometry`] and [`Material`] through `Rc`, so
//! many nodes can reference the same GPU resources.
//!
//! The renderer never walks the tree itself: it consumes the pre-ordered,
//! world-transformed sequence produced by [`Scene::flatten`].

use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};

use crate::data_structures::{
    color::Color, geometry::Geometry, light::Light, material::Material, transform::Transform,
};

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Rc<Geometry>, material: Rc<Material>) -> Self {
        Self::new(name, NodeKind::Mesh(Mesh { geometry, material }))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<SceneNode> {
        &mut self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    fn flatten_into<'a>(&'a self, parent: &Matrix4<f32>, out: &mut Vec<SceneEntry<'a>>) {
        let world = parent * self.transform.to_matrix();
        out.push(SceneEntry { node: self, world });
        for child in &self.children {
            child.flatten_into(&world, out);
        }
    }
}

/// A node together with its world matrix, as yielded by [`Scene::flatten`].
#[derive(Clone, Copy, Debug)]
pub struct SceneEntry<'a> {
    pub node: &'a SceneNode,
    pub world: Matrix4<f32>,
}

impl SceneEntry<'_> {
    /// Translation part of the world matrix.
    pub fn world_position(&self) -> cgmath::Vector3<f32> {
        self.world.w.truncate()
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Color,
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: Color::BLACK,
            ambient_color: Color::WHITE,
            ambient_intensity: 0.1,
            nodes: Vec::new(),
        }
    }

    pub fn add(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<SceneNode> {
        &mut self.nodes
    }

    /// Every node in the scene in pre-order (parents before children, siblings
    /// in insertion order), paired with its world matrix.
    pub fn flatten(&self) -> Vec<SceneEntry<'_>> {
        let mut entries = Vec::new();
        let identity = Matrix4::identity();
        for node in &self.nodes {
            node.flatten_into(&identity, &mut entries);
        }
        entries
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
