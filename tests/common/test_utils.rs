#![allow(dead_code)]

use std::rc::Rc;

use glint::{
    Camera, Color, Geometry, Light, Material, Renderer, RendererConfig, Scene, SceneNode,
    Transform,
    backend::recording::{GpuCall, RecordingGpu},
    cgmath::{Deg, Point3, Vector3},
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn renderer() -> Renderer<RecordingGpu> {
    init_logger();
    Renderer::new(
        RecordingGpu::new(),
        RendererConfig {
            width: 800,
            height: 600,
            ..Default::default()
        },
    )
}

pub(crate) fn camera() -> Camera {
    Camera::perspective(Deg(45.0), 800.0 / 600.0, 0.1, 100.0).look_at(
        Point3::new(0.0, 0.0, 5.0),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    )
}

pub(crate) fn sun(intensity: f32) -> SceneNode {
    SceneNode::light(
        "sun",
        Light::directional(Color::WHITE, intensity, Vector3::new(0.0, 0.0, -2.0)),
    )
}

pub(crate) fn bulb(name: &str, intensity: f32, x: f32) -> SceneNode {
    SceneNode::light(name, Light::point(Color::WHITE, intensity))
        .with_transform(Transform::from_position(x, 0.0, 0.0))
}

pub(crate) fn quad(material: Rc<Material>) -> SceneNode {
    SceneNode::mesh("quad", Rc::new(Geometry::quad(1.0, 1.0)), material)
}

/// Calls whose recorded slot name is `name`.
pub(crate) fn uploads_named(calls: &[GpuCall], name: &str) -> Vec<GpuCall> {
    calls
        .iter()
        .filter(|c| c.uniform_name() == Some(name))
        .cloned()
        .collect()
}

/// Uniform uploads that targeted a slot the program does not have.
pub(crate) fn unresolved_uploads(calls: &[GpuCall]) -> usize {
    calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                GpuCall::UniformMatrix4 { name: None, .. }
                    | GpuCall::Uniform3 { name: None, .. }
                    | GpuCall::Uniform4 { name: None, .. }
                    | GpuCall::Uniform1f { name: None, .. }
                    | GpuCall::Uniform1i { name: None, .. }
            )
        })
        .count()
}

pub(crate) fn count(calls: &[GpuCall], predicate: impl Fn(&GpuCall) -> bool) -> usize {
    calls.iter().filter(|c| predicate(c)).count()
}

pub(crate) fn draws(calls: &[GpuCall]) -> usize {
    count(calls, |c| matches!(c, GpuCall::DrawElements { .. }))
}

pub(crate) fn scene_with(nodes: impl IntoIterator<Item = SceneNode>) -> Scene {
    let mut scene = Scene::new();
    for node in nodes {
        scene.add(node);
    }
    scene
}
