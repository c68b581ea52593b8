use std::rc::Rc;

use glint::{
    Color, Geometry, Material, SceneNode, Texture, Transform,
    backend::{
        ClearMask, IndexType, Topology,
        recording::GpuCall,
    },
};

use crate::common::test_utils::{
    bulb, camera, count, draws, quad, renderer, scene_with, sun, unresolved_uploads,
    uploads_named,
};
mod common;

#[test]
fn lit_quad_draws_and_binds_in_order() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let scene = scene_with([sun(0.8), quad(Rc::new(Material::lambert(Color::WHITE)))]);
    let camera = camera();
    renderer.gpu().take_calls();

    renderer.render(&scene, &camera)?;
    let calls = renderer.gpu().take_calls();

    assert_eq!(calls[0], GpuCall::ClearColor([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(calls[1], GpuCall::Clear(ClearMask::COLOR_DEPTH));
    assert_eq!(count(&calls, |c| matches!(c, GpuCall::UseProgram(Some(_)))), 1);
    assert_eq!(draws(&calls), 1);
    assert_eq!(count(&calls, |c| matches!(c, GpuCall::CreateProgram(_))), 1);
    assert_eq!(count(&calls, |c| matches!(c, GpuCall::CreateVertexArray(_))), 1);
    assert_eq!(count(&calls, |c| matches!(c, GpuCall::CreateTexture(_))), 1);
    assert_eq!(
        calls.last(),
        Some(&GpuCall::DrawElements {
            topology: Topology::Triangles,
            count: 6,
            index_type: IndexType::U16,
            offset: 0,
        })
    );

    assert_eq!(
        uploads_named(&calls, "u_ambientIntensity"),
        [GpuCall::Uniform1f {
            name: Some("u_ambientIntensity".to_string()),
            value: 0.1,
        }]
    );
    assert_eq!(uploads_named(&calls, "u_ambientColor").len(), 1);
    assert_eq!(
        uploads_named(&calls, "dirLights[1].direction"),
        [GpuCall::Uniform3 {
            name: Some("dirLights[1].direction".to_string()),
            value: [0.0, 0.0, -1.0],
        }]
    );
    assert_eq!(
        uploads_named(&calls, "dirLights[1].ci"),
        [GpuCall::Uniform4 {
            name: Some("dirLights[1].ci".to_string()),
            value: [1.0, 1.0, 1.0, 0.8],
        }]
    );
    assert_eq!(unresolved_uploads(&calls), 0);
    Ok(())
}

/// Index of the first upload to `name` within one draw.
fn upload_at(segment: &[GpuCall], name: &str) -> usize {
    segment
        .iter()
        .position(|c| c.uniform_name() == Some(name))
        .unwrap_or_else(|| panic!("no upload to {name} in {segment:?}"))
}

/// First and last upload to any slot of the `array` light array.
fn light_uploads(segment: &[GpuCall], array: &str) -> (usize, usize) {
    let is_light = |c: &GpuCall| c.uniform_name().is_some_and(|n| n.starts_with(array));
    let first = segment.iter().position(is_light);
    let last = segment.iter().rposition(is_light);
    match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => panic!("no {array} uploads in {segment:?}"),
    }
}

/// Splits a frame's calls into the calls leading up to each draw.
fn draw_segments(calls: &[GpuCall]) -> Vec<&[GpuCall]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (at, call) in calls.iter().enumerate() {
        if matches!(call, GpuCall::DrawElements { .. }) {
            segments.push(&calls[start..at]);
            start = at + 1;
        }
    }
    segments
}

#[test]
fn each_draw_binds_state_before_uploading() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let scene = scene_with([
        sun(1.0),
        bulb("bulb", 0.5, 2.0),
        quad(Rc::new(Material::phong(Color::WHITE, 32.0, Color::WHITE))),
        quad(Rc::new(Material::lambert(Color::rgb(0.5, 0.5, 0.5)))),
    ]);
    let camera = camera();

    for frame in 0..2 {
        renderer.render(&scene, &camera)?;
        let calls = renderer.gpu().take_calls();
        let segments = draw_segments(&calls);
        assert_eq!(segments.len(), 2, "frame {frame}");

        for (mesh, segment) in segments.iter().enumerate() {
            assert_eq!(
                count(segment, |c| matches!(c, GpuCall::UseProgram(Some(_)))),
                1,
                "frame {frame}, mesh {mesh}"
            );
            let vertex_array = segment
                .iter()
                .rposition(|c| matches!(c, GpuCall::BindVertexArray(Some(_))))
                .expect("vertex array bound");
            let program = segment
                .iter()
                .rposition(|c| matches!(c, GpuCall::UseProgram(Some(_))))
                .expect("program in use");
            let unit = segment
                .iter()
                .rposition(|c| *c == GpuCall::ActiveTexture(0))
                .expect("unit 0 active");
            let texture = segment
                .iter()
                .rposition(|c| matches!(c, GpuCall::BindTexture(Some(_))))
                .expect("texture bound");
            let (first_dir, last_dir) = light_uploads(segment, "dirLights");
            let (first_point, last_point) = light_uploads(segment, "pointLights");

            let mut steps = vec![
                vertex_array,
                program,
                upload_at(segment, "u_model"),
                upload_at(segment, "u_view"),
                upload_at(segment, "u_projection"),
                unit,
                texture,
                upload_at(segment, "u_ambientColor"),
                upload_at(segment, "u_ambientIntensity"),
                first_dir,
                last_dir,
                first_point,
                last_point,
            ];
            if mesh == 0 {
                steps.push(upload_at(segment, "u_shininess"));
                steps.push(upload_at(segment, "u_specularColor"));
            } else {
                assert!(uploads_named(segment, "u_shininess").is_empty());
            }
            steps.push(segment.len());

            assert!(
                steps.windows(2).all(|pair| pair[0] < pair[1]),
                "frame {frame}, mesh {mesh}: steps out of order {steps:?}"
            );
        }
    }
    Ok(())
}

#[test]
fn second_frame_only_binds() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let scene = scene_with([sun(1.0), quad(Rc::new(Material::lambert(Color::WHITE)))]);
    let camera = camera();
    renderer.render(&scene, &camera)?;
    renderer.gpu().take_calls();

    renderer.render(&scene, &camera)?;
    let calls = renderer.gpu().take_calls();

    assert_eq!(count(&calls, |c| matches!(c, GpuCall::UseProgram(Some(_)))), 1);
    assert_eq!(count(&calls, |c| matches!(c, GpuCall::BindVertexArray(_))), 1);
    assert_eq!(
        count(&calls, |c| matches!(
            c,
            GpuCall::CreateProgram(_)
                | GpuCall::CreateVertexArray(_)
                | GpuCall::CreateBuffer(_)
                | GpuCall::CreateTexture(_)
                | GpuCall::CreateShader { .. }
        )),
        0
    );
    assert_eq!(draws(&calls), 1);
    assert_eq!(renderer.frame_stats().draw_calls, 1);
    assert_eq!(renderer.frame_stats().programs_built, 0);
    Ok(())
}

#[test]
fn every_draw_rebinds_unit_zero() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let checker = Rc::new(Texture::from_rgba8(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]));
    let scene = scene_with([
        quad(Rc::new(Material::basic(Color::WHITE).with_texture(checker))),
        quad(Rc::new(Material::basic(Color::rgb(1.0, 0.0, 0.0)))),
        quad(Rc::new(Material::basic(Color::rgb(0.0, 0.0, 1.0)))),
    ]);
    let camera = camera();

    for _ in 0..2 {
        renderer.render(&scene, &camera)?;
        let calls = renderer.gpu().take_calls();

        assert!(!calls
            .iter()
            .any(|c| matches!(c, GpuCall::ActiveTexture(unit) if *unit != 0)));

        let mut bound = Vec::new();
        let mut segment_start = 0;
        for (at, call) in calls.iter().enumerate() {
            if !matches!(call, GpuCall::DrawElements { .. }) {
                continue;
            }
            let segment = &calls[segment_start..at];
            let active = segment
                .iter()
                .rposition(|c| *c == GpuCall::ActiveTexture(0))
                .expect("unit 0 activated before the draw");
            let texture = segment[active..]
                .iter()
                .find_map(|c| match c {
                    GpuCall::BindTexture(Some(texture)) => Some(*texture),
                    _ => None,
                })
                .expect("a texture bound on unit 0 before the draw");
            bound.push(texture);
            segment_start = at + 1;
        }
        assert_eq!(bound.len(), 3);
        assert_ne!(bound[0], bound[1]);
        assert_ne!(bound[1], bound[2]);
        assert_ne!(bound[0], bound[2]);
    }
    Ok(())
}

#[test]
fn model_matrix_is_the_world_transform() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let scene = scene_with([SceneNode::group("parent")
        .with_transform(Transform::from_position(0.0, 1.0, 0.0))
        .with_child(
            quad(Rc::new(Material::basic(Color::WHITE)))
                .with_transform(Transform::from_position(2.0, 0.0, 0.0)),
        )]);
    renderer.render(&scene, &camera())?;

    let models = renderer.gpu().uploads_to("u_model");
    match models.as_slice() {
        [GpuCall::UniformMatrix4 { value, .. }] => {
            // column-major: translation in elements 12..15
            assert_eq!(&value[12..16], &[2.0, 1.0, 0.0, 1.0]);
        }
        other => panic!("expected one model upload, got {other:?}"),
    }
    Ok(())
}

#[test]
fn shared_resources_are_created_once() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let geometry = Rc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    let material = Rc::new(Material::phong(Color::hex(0x3366cc), 16.0, Color::WHITE));
    let same_color = Rc::new(Material::basic(Color::from_rgb8(0x33, 0x66, 0xcc)));
    let scene = scene_with([
        sun(1.0),
        SceneNode::mesh("a", geometry.clone(), material.clone()),
        SceneNode::mesh("b", geometry.clone(), material.clone()),
        SceneNode::mesh("c", geometry, same_color),
    ]);
    let camera = camera();

    renderer.render(&scene, &camera)?;
    let stats = renderer.frame_stats();
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.vertex_arrays_created, 1);
    assert_eq!(stats.programs_built, 2);
    assert_eq!(stats.textures_created, 1);

    let calls = renderer.gpu().take_calls();
    assert_eq!(
        count(&calls, |c| matches!(c, GpuCall::DrawElements { count: 36, .. })),
        3
    );
    assert_eq!(uploads_named(&calls, "u_shininess").len(), 2);
    assert_eq!(uploads_named(&calls, "u_specularColor").len(), 2);

    renderer.render(&scene, &camera)?;
    let stats = renderer.frame_stats();
    assert_eq!(
        (stats.vertex_arrays_created, stats.programs_built, stats.textures_created),
        (0, 0, 0)
    );
    Ok(())
}

#[test]
fn empty_scene_only_clears() -> anyhow::Result<()> {
    let mut renderer = renderer();
    let mut scene = scene_with([]);
    scene.background = Color::rgb(0.25, 0.5, 1.0);
    renderer.gpu().take_calls();

    renderer.render(&scene, &camera())?;
    assert_eq!(
        renderer.gpu().take_calls(),
        [
            GpuCall::ClearColor([0.25, 0.5, 1.0, 1.0]),
            GpuCall::Clear(ClearMask::COLOR_DEPTH),
        ]
    );
    assert_eq!(renderer.frame_stats().draw_calls, 0);
    Ok(())
}

#[test]
fn resize_sets_the_viewport_on_change() {
    let mut renderer = renderer();
    renderer.gpu().take_calls();

    renderer.resize(800, 600);
    assert!(renderer.gpu().calls().is_empty());

    renderer.resize(1024, 512);
    assert_eq!(
        renderer.gpu().take_calls(),
        [GpuCall::Viewport {
            x: 0,
            y: 0,
            width: 1024,
            height: 512
        }]
    );
    assert_eq!(renderer.size(), (1024, 512));
    assert_eq!(renderer.aspect_ratio(), 2.0);
}
