//! The frame renderer.
//!
//! [`Renderer::render`] draws a [`Scene`] from a [`Camera`]:
//!
//! 1. clear color and depth to the scene background
//! 2. flatten the scene, gather its lights and update the frame's light shape
//! 3. for every mesh, in scene order:
//!    - bind the geometry's vertex array
//!    - bind the material's program, rebuilt if its light shape is stale
//!    - upload model, view and projection matrices
//!    - bind the material image to texture unit 0
//!    - for lit materials upload ambient light and every light with a slot
//!    - for Phong materials upload shininess and specular color
//!    - draw the indexed triangle list
//!
//! GPU resources are created on first use and reused for the lifetime of the
//! renderer. Any creation failure aborts the frame with a [`RenderError`].

use cgmath::Matrix4;

use crate::{
    backend::{ClearMask, Gpu, IndexType, Topology},
    context::{Context, RendererConfig},
    data_structures::{
        camera::Camera,
        material::MaterialKind,
        scene_graph::{Mesh, Scene, SceneEntry},
    },
    error::RenderError,
    lighting::{FrameLights, LightField, LightKind, LightShape, LightSlot, LightingState},
    pipelines::uniforms,
    resources::{mesh::GeometryBinder, program::ProgramBinder, texture::TextureBinder},
};

/// Texture unit holding the material image. No other unit is used.
pub const MATERIAL_TEXTURE_UNIT: u32 = 0;

/// What the last frame did, for diagnostics. A failed frame reports the work
/// done before it was aborted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub programs_built: usize,
    pub vertex_arrays_created: usize,
    pub textures_created: usize,
}

/// Reused upload buffers. Overwritten by every upload.
#[derive(Debug, Default)]
struct Scratch {
    matrix: [f32; 16],
    vec3: [f32; 3],
    vec4: [f32; 4],
}

impl Scratch {
    fn matrix(&mut self, matrix: &Matrix4<f32>) -> &[f32; 16] {
        let columns: [[f32; 4]; 4] = (*matrix).into();
        for (dst, column) in self.matrix.chunks_exact_mut(4).zip(columns) {
            dst.copy_from_slice(&column);
        }
        &self.matrix
    }

    fn vec3(&mut self, value: impl Into<[f32; 3]>) -> &[f32; 3] {
        self.vec3 = value.into();
        &self.vec3
    }

    fn vec4(&mut self, value: [f32; 4]) -> &[f32; 4] {
        self.vec4 = value;
        &self.vec4
    }
}

/// Per-frame values shared by every draw.
struct FrameInputs<'a, 'scene> {
    scene: &'scene Scene,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    lights: &'a FrameLights<'scene>,
}

#[derive(Debug)]
pub struct Renderer<G: Gpu> {
    context: Context<G>,
    geometries: GeometryBinder<G>,
    programs: ProgramBinder<G>,
    textures: TextureBinder<G>,
    lighting: LightingState,
    scratch: Scratch,
    stats: FrameStats,
}

impl<G: Gpu> Renderer<G> {
    pub fn new(gpu: G, config: RendererConfig) -> Self {
        Self {
            context: Context::new(gpu, config),
            geometries: GeometryBinder::new(),
            programs: ProgramBinder::new(),
            textures: TextureBinder::new(),
            lighting: LightingState::new(),
            scratch: Scratch::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let gpu = &self.context.gpu;
        let background = scene.background;
        gpu.clear_color(background.r, background.g, background.b, 1.0);
        gpu.clear(ClearMask::COLOR_DEPTH);

        let entries = scene.flatten();
        let lights = FrameLights::gather(&entries);
        self.lighting.update(&lights);

        let frame = FrameInputs {
            scene,
            view: *camera.view(),
            projection: camera.projection_matrix(),
            lights: &lights,
        };
        let programs_before = self.programs.builds();
        let vertex_arrays_before = self.geometries.len();
        let textures_before = self.textures.len();
        let mut draw_calls = 0;
        let mut outcome = Ok(());

        for entry in &entries {
            if let Some(mesh) = entry.node.as_mesh() {
                outcome = self.draw(entry, mesh, &frame);
                if outcome.is_err() {
                    break;
                }
                draw_calls += 1;
            }
        }

        self.stats = FrameStats {
            draw_calls,
            programs_built: self.programs.builds() - programs_before,
            vertex_arrays_created: self.geometries.len() - vertex_arrays_before,
            textures_created: self.textures.len() - textures_before,
        };
        match &outcome {
            Ok(()) => log::trace!("frame done: {:?}", self.stats),
            Err(err) => log::debug!("frame aborted after {draw_calls} draws: {err}"),
        }
        outcome
    }

    fn draw(
        &mut self,
        entry: &SceneEntry<'_>,
        mesh: &Mesh,
        frame: &FrameInputs<'_, '_>,
    ) -> Result<(), RenderError> {
        let Self {
            context,
            geometries,
            programs,
            textures,
            lighting,
            scratch,
            ..
        } = self;
        let gpu = &context.gpu;
        let material = &*mesh.material;

        let vao = geometries.bind(gpu, &mesh.geometry)?;
        gpu.bind_vertex_array(Some(vao));

        let info = programs.bind(gpu, material, lighting.shape())?;
        gpu.use_program(Some(info.program));

        gpu.uniform_matrix4(info.uniform(uniforms::MODEL), scratch.matrix(&entry.world));
        gpu.uniform_matrix4(info.uniform(uniforms::VIEW), scratch.matrix(&frame.view));
        gpu.uniform_matrix4(
            info.uniform(uniforms::PROJECTION),
            scratch.matrix(&frame.projection),
        );

        // rebound on every draw since uploads leave their own image bound
        let texture = textures.bind(gpu, material.surface())?;
        gpu.uniform1i(info.uniform(uniforms::TEXTURE), MATERIAL_TEXTURE_UNIT as i32);
        gpu.active_texture(MATERIAL_TEXTURE_UNIT);
        gpu.bind_texture(Some(texture));

        if material.is_lit() {
            let ambient = frame.scene.ambient_color.to_rgb();
            gpu.uniform3(info.uniform(uniforms::AMBIENT_COLOR), scratch.vec3(ambient));
            gpu.uniform1f(
                info.uniform(uniforms::AMBIENT_INTENSITY),
                frame.scene.ambient_intensity,
            );

            for kind in LightKind::ALL {
                for (position, active) in frame.lights.of_kind(kind).iter().enumerate() {
                    let index = position as u32 + 1;
                    for &field in kind.fields() {
                        let Some(location) = info.light(&LightSlot::new(kind, index, field))
                        else {
                            continue;
                        };
                        match field {
                            LightField::Direction => {
                                if let Some(direction) = active.direction() {
                                    gpu.uniform3(Some(location), scratch.vec3(direction));
                                }
                            }
                            LightField::ColorIntensity => {
                                gpu.uniform4(
                                    Some(location),
                                    scratch.vec4(active.light.color_intensity()),
                                );
                            }
                            LightField::Position => {
                                gpu.uniform3(Some(location), scratch.vec3(active.position));
                            }
                            LightField::Limit => {
                                if let Some(limit) = active.limit() {
                                    gpu.uniform1f(Some(location), limit);
                                }
                            }
                        }
                    }
                }
            }
        }

        if let MaterialKind::Phong {
            shininess,
            specular_color,
        } = material.kind()
        {
            gpu.uniform1f(info.uniform(uniforms::SHININESS), *shininess);
            gpu.uniform3(
                info.uniform(uniforms::SPECULAR_COLOR),
                scratch.vec3(specular_color.to_rgb()),
            );
        }

        gpu.draw_elements(
            Topology::Triangles,
            mesh.geometry.count() as i32,
            IndexType::U16,
            0,
        );
        Ok(())
    }

    /// Sets the viewport when the drawable size changed. Callers keep their
    /// camera in sync through [`Renderer::aspect_ratio`].
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            log::debug!("viewport resized to {width}x{height}");
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    pub fn gpu(&self) -> &G {
        &self.context.gpu
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Light shape of the last rendered frame.
    pub fn light_shape(&self) -> LightShape {
        self.lighting.shape()
    }
}
