//! Linked programs per material, with their resolved uniform slots.
//!
//! A lit program's slot table depends on the frame's [`LightShape`]: one
//! `(kind, index, field)` entry for each light that has to be uploaded. The
//! binder records the shape each program was resolved for and rebuilds the
//! program when a later frame arrives with a different one.
//!
//! A rebuild recompiles the material's existing shader text. If the material
//! was generated for fewer lights than the frame carries, the extra slots do
//! not exist in the program and those lights are not drawn.

use std::collections::HashMap;

use crate::{
    backend::Gpu,
    cache::ResourceCache,
    data_structures::material::{Material, MaterialId},
    error::RenderError,
    lighting::{LightShape, LightSlot},
    resources::shader,
};

/// A linked program and the slots it was resolved with. Never mutated after
/// it is built; a shape change replaces it.
#[derive(Debug)]
pub struct ProgramInfo<G: Gpu> {
    pub program: G::Program,
    uniforms: HashMap<String, G::UniformLocation>,
    lights: HashMap<LightSlot, G::UniformLocation>,
    shape: LightShape,
}

impl<G: Gpu> ProgramInfo<G> {
    /// Slot of a declared uniform, `None` if the program does not use it.
    pub fn uniform(&self, name: &str) -> Option<&G::UniformLocation> {
        self.uniforms.get(name)
    }

    pub fn light(&self, slot: &LightSlot) -> Option<&G::UniformLocation> {
        self.lights.get(slot)
    }

    /// Light shape the slot table was resolved for. Empty for unlit materials.
    pub fn shape(&self) -> LightShape {
        self.shape
    }

    pub fn resolved_lights(&self) -> usize {
        self.lights.len()
    }
}

#[derive(Debug)]
pub struct ProgramBinder<G: Gpu> {
    programs: ResourceCache<MaterialId, ProgramInfo<G>>,
    builds: usize,
}

impl<G: Gpu> ProgramBinder<G> {
    pub fn new() -> Self {
        Self {
            programs: ResourceCache::new(),
            builds: 0,
        }
    }

    /// Returns the program for `material`, building it on first use and
    /// rebuilding it if the material is lit and was resolved for a shape other
    /// than `shape`.
    pub fn bind(
        &mut self,
        gpu: &G,
        material: &Material,
        shape: LightShape,
    ) -> Result<&ProgramInfo<G>, RenderError> {
        let shape = if material.is_lit() {
            shape
        } else {
            LightShape::default()
        };

        let stale = self
            .programs
            .get(&material.id())
            .is_some_and(|info| info.shape != shape);
        if stale {
            if let Some(old) = self.programs.invalidate(&material.id()) {
                log::debug!(
                    "light shape of material {} changed from {} to {}, rebuilding its program",
                    material.id().get(),
                    old.shape,
                    shape
                );
                gpu.delete_program(old.program);
            }
        }

        let builds = &mut self.builds;
        self.programs.get_or_try_insert_with(material.id(), || {
            let info = build(gpu, material, shape)?;
            *builds += 1;
            Ok(info)
        })
    }

    pub fn get(&self, material: MaterialId) -> Option<&ProgramInfo<G>> {
        self.programs.get(&material)
    }

    /// Programs built so far, rebuilds included.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl<G: Gpu> Default for ProgramBinder<G> {
    fn default() -> Self {
        Self::new()
    }
}

fn build<G: Gpu>(
    gpu: &G,
    material: &Material,
    shape: LightShape,
) -> Result<ProgramInfo<G>, RenderError> {
    let program = shader::compile_program(gpu, material.vertex_shader(), material.fragment_shader())?;

    let mut uniforms = HashMap::new();
    for name in material.uniforms() {
        match gpu.uniform_location(program, name) {
            Some(location) => {
                uniforms.insert(name.clone(), location);
            }
            None => log::trace!("uniform {name} is not active in material {}", material.id().get()),
        }
    }

    let mut lights = HashMap::new();
    let mut unresolved = 0;
    for slot in shape.slots() {
        match gpu.uniform_location(program, &slot.uniform_name()) {
            Some(location) => {
                lights.insert(slot, location);
            }
            None => unresolved += 1,
        }
    }
    if unresolved > 0 {
        log::warn!(
            "material {} has no slot for {unresolved} light uniforms of shape {shape}; \
             its shaders declare room for {} lights",
            material.id().get(),
            material.light_capacity()
        );
    }

    log::info!(
        "created program for material {} ({} uniforms, {} light slots)",
        material.id().get(),
        uniforms.len(),
        lights.len()
    );
    Ok(ProgramInfo {
        program,
        uniforms,
        lights,
        shape,
    })
}
