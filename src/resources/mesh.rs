//! Vertex-array state per geometry.

use crate::{
    backend::{BufferTarget, Gpu},
    cache::ResourceCache,
    data_structures::geometry::{Geometry, GeometryId},
    error::RenderError,
};

/// Builds one vertex array per [`Geometry`] and hands it back on every later
/// bind. The array captures the attribute buffers and the index buffer, so
/// binding it is all a draw needs.
#[derive(Debug)]
pub struct GeometryBinder<G: Gpu> {
    vaos: ResourceCache<GeometryId, G::VertexArray>,
}

impl<G: Gpu> GeometryBinder<G> {
    pub fn new() -> Self {
        Self {
            vaos: ResourceCache::new(),
        }
    }

    pub fn bind(&mut self, gpu: &G, geometry: &Geometry) -> Result<G::VertexArray, RenderError> {
        self.vaos
            .get_or_try_insert_with(geometry.id(), || create_vertex_array(gpu, geometry))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.vaos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaos.is_empty()
    }
}

impl<G: Gpu> Default for GeometryBinder<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the vertex array for `geometry` and leaves no vertex array bound.
/// On failure every object created so far is deleted again.
fn create_vertex_array<G: Gpu>(
    gpu: &G,
    geometry: &Geometry,
) -> Result<G::VertexArray, RenderError> {
    let vao = gpu.create_vertex_array()?;
    gpu.bind_vertex_array(Some(vao));
    let mut buffers = Vec::with_capacity(geometry.attributes().len() + 1);
    let uploaded = upload_buffers(gpu, geometry, &mut buffers);

    // keep later buffer binds from landing in this vertex array
    gpu.bind_vertex_array(None);
    if let Err(err) = uploaded {
        log::warn!(
            "vertex array for geometry {} failed, releasing {} buffers: {err}",
            geometry.id().get(),
            buffers.len()
        );
        for buffer in buffers {
            gpu.delete_buffer(buffer);
        }
        gpu.delete_vertex_array(vao);
        return Err(err);
    }

    log::info!(
        "created vertex array for geometry {} ({} attributes, {} indices)",
        geometry.id().get(),
        geometry.attributes().len(),
        geometry.count()
    );
    Ok(vao)
}

fn upload_buffers<G: Gpu>(
    gpu: &G,
    geometry: &Geometry,
    buffers: &mut Vec<G::Buffer>,
) -> Result<(), RenderError> {
    for (location, attribute) in geometry.attributes() {
        let buffer = gpu.create_buffer()?;
        buffers.push(buffer);
        gpu.bind_buffer(BufferTarget::Array, Some(buffer));
        gpu.buffer_data(BufferTarget::Array, bytemuck::cast_slice(&attribute.data));
        gpu.enable_vertex_attrib_array(*location);
        gpu.vertex_attrib_pointer_f32(*location, attribute.item_size, attribute.normalized);
    }

    let index = gpu.create_buffer()?;
    buffers.push(index);
    gpu.bind_buffer(BufferTarget::ElementArray, Some(index));
    gpu.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(geometry.index()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::recording::{GpuCall, RecordingGpu},
        data_structures::geometry::Attribute,
    };

    #[test]
    fn uploads_attributes_in_declaration_order() {
        let gpu = RecordingGpu::new();
        let geometry = Geometry::new()
            .with_attribute(2, Attribute::new(vec![0.0; 6], 2))
            .with_attribute(0, Attribute::new(vec![0.0; 9], 3).normalized())
            .with_index(vec![0, 1, 2]);

        let mut binder = GeometryBinder::new();
        binder.bind(&gpu, &geometry).unwrap();

        let pointers: Vec<_> = gpu
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GpuCall::VertexAttribPointer { .. }))
            .collect();
        assert_eq!(
            pointers,
            [
                GpuCall::VertexAttribPointer {
                    index: 2,
                    size: 2,
                    normalized: false
                },
                GpuCall::VertexAttribPointer {
                    index: 0,
                    size: 3,
                    normalized: true
                },
            ]
        );
        assert!(gpu.calls().contains(&GpuCall::BufferData {
            target: BufferTarget::ElementArray,
            bytes: 6,
        }));
        assert_eq!(gpu.calls().last(), Some(&GpuCall::BindVertexArray(None)));
    }

    #[test]
    fn same_geometry_is_built_once() {
        let gpu = RecordingGpu::new();
        let quad = Geometry::quad(1.0, 1.0);
        let mut binder = GeometryBinder::new();

        let first = binder.bind(&gpu, &quad).unwrap();
        let second = binder.bind(&gpu, &quad).unwrap();
        assert_eq!(first, second);
        assert_eq!(gpu.count(|c| matches!(c, GpuCall::CreateVertexArray(_))), 1);

        binder.bind(&gpu, &Geometry::quad(1.0, 1.0)).unwrap();
        assert_eq!(binder.len(), 2);
    }

    #[test]
    fn exhaustion_is_not_cached() {
        let gpu = RecordingGpu::with_allocation_budget(1);
        let mut binder = GeometryBinder::new();
        let err = binder.bind(&gpu, &Geometry::quad(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, RenderError::ResourceExhaustion { resource: "buffer", .. }));
        assert!(binder.is_empty());
    }

    #[test]
    fn partial_vertex_array_is_released() {
        // vertex array and the first attribute buffer, then nothing
        let gpu = RecordingGpu::with_allocation_budget(2);
        let mut binder = GeometryBinder::new();
        assert!(binder.bind(&gpu, &Geometry::quad(1.0, 1.0)).is_err());

        let calls = gpu.calls();
        let vao = calls
            .iter()
            .find_map(|c| match c {
                GpuCall::CreateVertexArray(vao) => Some(*vao),
                _ => None,
            })
            .unwrap();
        let buffer = calls
            .iter()
            .find_map(|c| match c {
                GpuCall::CreateBuffer(buffer) => Some(*buffer),
                _ => None,
            })
            .unwrap();
        let unbound = calls
            .iter()
            .position(|c| *c == GpuCall::BindVertexArray(None))
            .unwrap();
        let released = calls
            .iter()
            .position(|c| *c == GpuCall::DeleteVertexArray(vao))
            .unwrap();
        assert!(unbound < released);
        assert!(calls.contains(&GpuCall::DeleteBuffer(buffer)));
        assert_eq!(gpu.count(|c| matches!(c, GpuCall::DeleteBuffer(_))), 1);
        assert!(binder.is_empty());
    }
}
