//! Headless GPU backend that records every call.
//!
//! No GPU work happens here. Handles are sequential integers, and uniform
//! names are resolved against the text of the linked shaders, so a program
//! only exposes the slots its source actually declares. Tests inspect the
//! recorded [`GpuCall`] log to check binding order and memoization.

use std::{cell::RefCell, collections::HashMap};

use crate::{
    backend::{
        BufferTarget, Capability, ClearMask, Gpu, IndexType, Sampling, ShaderStage, Topology,
    },
    error::RenderError,
};

pub type Handle = u32;

/// Uniform location handed out by [`RecordingGpu`]: the owning program and the
/// name it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordedUniform {
    pub program: Handle,
    pub name: String,
}

/// One recorded call. Uniform uploads carry the slot name, or `None` when the
/// upload targeted an unresolved slot.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    Enable(Capability),
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ClearColor([f32; 4]),
    Clear(ClearMask),
    CreateShader {
        shader: Handle,
        stage: ShaderStage,
    },
    CompileShader(Handle),
    DeleteShader(Handle),
    CreateProgram(Handle),
    AttachShader {
        program: Handle,
        shader: Handle,
    },
    DetachShader {
        program: Handle,
        shader: Handle,
    },
    LinkProgram(Handle),
    DeleteProgram(Handle),
    UseProgram(Option<Handle>),
    CreateVertexArray(Handle),
    BindVertexArray(Option<Handle>),
    DeleteVertexArray(Handle),
    CreateBuffer(Handle),
    DeleteBuffer(Handle),
    BindBuffer {
        target: BufferTarget,
        buffer: Option<Handle>,
    },
    BufferData {
        target: BufferTarget,
        bytes: usize,
    },
    EnableVertexAttribArray(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        normalized: bool,
    },
    CreateTexture(Handle),
    ActiveTexture(u32),
    BindTexture(Option<Handle>),
    TexImage2d {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    TextureSampling(Sampling),
    GenerateMipmap,
    UniformMatrix4 {
        name: Option<String>,
        value: [f32; 16],
    },
    Uniform3 {
        name: Option<String>,
        value: [f32; 3],
    },
    Uniform4 {
        name: Option<String>,
        value: [f32; 4],
    },
    Uniform1f {
        name: Option<String>,
        value: f32,
    },
    Uniform1i {
        name: Option<String>,
        value: i32,
    },
    DrawElements {
        topology: Topology,
        count: i32,
        index_type: IndexType,
        offset: i32,
    },
}

impl GpuCall {
    /// Slot name of a uniform upload, `None` for every other call and for
    /// uploads to unresolved slots.
    pub fn uniform_name(&self) -> Option<&str> {
        match self {
            GpuCall::UniformMatrix4 { name, .. }
            | GpuCall::Uniform3 { name, .. }
            | GpuCall::Uniform4 { name, .. }
            | GpuCall::Uniform1f { name, .. }
            | GpuCall::Uniform1i { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Default)]
struct State {
    calls: Vec<GpuCall>,
    next_handle: Handle,
    allocation_budget: Option<usize>,
    fail_link: bool,
    shaders: HashMap<Handle, RecordedShader>,
    attached: HashMap<Handle, Vec<Handle>>,
    linked: HashMap<Handle, String>,
    link_logs: HashMap<Handle, String>,
}

struct RecordedShader {
    source: String,
    compiled: bool,
    log: String,
}

impl State {
    fn allocate(&mut self, resource: &'static str) -> Result<Handle, RenderError> {
        if let Some(budget) = self.allocation_budget.as_mut() {
            if *budget == 0 {
                return Err(RenderError::exhausted(resource, "allocation budget exhausted"));
            }
            *budget -= 1;
        }
        self.next_handle += 1;
        Ok(self.next_handle)
    }
}

#[derive(Default)]
pub struct RecordingGpu {
    state: RefCell<State>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every allocation after the first `allocations` succeed.
    pub fn with_allocation_budget(allocations: usize) -> Self {
        let gpu = Self::default();
        gpu.state.borrow_mut().allocation_budget = Some(allocations);
        gpu
    }

    /// Makes every subsequent link fail.
    pub fn fail_links(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls and starts a fresh log.
    pub fn take_calls(&self) -> Vec<GpuCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn count(&self, predicate: impl Fn(&GpuCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    /// All recorded uploads to the slot called `name`, in call order.
    pub fn uploads_to(&self, name: &str) -> Vec<GpuCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.uniform_name() == Some(name))
            .cloned()
            .collect()
    }

    fn record(&self, call: GpuCall) {
        log::trace!("RecordingGpu: {call:?}");
        self.state.borrow_mut().calls.push(call);
    }
}

impl std::fmt::Debug for RecordingGpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingGpu")
            .field("calls", &self.state.borrow().calls.len())
            .finish()
    }
}

/// Length of the first `base[N]` declaration with a literal size.
fn declared_len(source: &str, base: &str) -> Option<u32> {
    let pattern = format!("{base}[");
    source
        .match_indices(&pattern)
        .filter_map(|(at, _)| {
            let rest = &source[at + pattern.len()..];
            let end = rest.find(']')?;
            rest[..end].trim().parse().ok()
        })
        .next()
}

fn mentions(source: &str, word: &str) -> bool {
    source.match_indices(word).any(|(at, _)| {
        let before = source[..at].chars().next_back();
        let after = source[at + word.len()..].chars().next();
        let is_ident = |c: char| c.is_alphanumeric() || c == '_';
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Mimics `glGetUniformLocation`: a name only resolves if the linked text
/// declares it. `array[i].field` needs a literal `array[N]` with `i < N`.
fn resolves(source: &str, name: &str) -> bool {
    match name.split_once('[') {
        Some((base, rest)) => {
            let Some((index, field)) = rest.split_once(']') else {
                return false;
            };
            let Ok(index) = index.parse::<u32>() else {
                return false;
            };
            let field = field.trim_start_matches('.');
            declared_len(source, base).is_some_and(|len| index < len)
                && (field.is_empty() || mentions(source, field))
        }
        None => mentions(source, name),
    }
}

impl Gpu for RecordingGpu {
    type Program = Handle;
    type Shader = Handle;
    type UniformLocation = RecordedUniform;
    type VertexArray = Handle;
    type Buffer = Handle;
    type Texture = Handle;

    fn enable(&self, capability: Capability) {
        self.record(GpuCall::Enable(capability));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GpuCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GpuCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GpuCall::Clear(mask));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, RenderError> {
        let shader = {
            let mut state = self.state.borrow_mut();
            let shader = state.allocate("shader")?;
            state.shaders.insert(
                shader,
                RecordedShader {
                    source: String::new(),
                    compiled: false,
                    log: String::new(),
                },
            );
            shader
        };
        self.record(GpuCall::CreateShader { shader, stage });
        Ok(shader)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        if let Some(recorded) = self.state.borrow_mut().shaders.get_mut(&shader) {
            recorded.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        if let Some(recorded) = self.state.borrow_mut().shaders.get_mut(&shader) {
            match recorded
                .source
                .lines()
                .enumerate()
                .find(|(_, line)| line.trim_start().starts_with("#error"))
            {
                Some((line_no, line)) => {
                    recorded.compiled = false;
                    recorded.log = format!("ERROR: 0:{}: '{}'", line_no + 1, line.trim());
                }
                None => {
                    recorded.compiled = true;
                    recorded.log.clear();
                }
            }
        }
        self.record(GpuCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.state.borrow_mut().shaders.remove(&shader);
        self.record(GpuCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<Self::Program, RenderError> {
        let program = self.state.borrow_mut().allocate("program")?;
        self.record(GpuCall::CreateProgram(program));
        Ok(program)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        self.state
            .borrow_mut()
            .attached
            .entry(program)
            .or_default()
            .push(shader);
        self.record(GpuCall::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        if let Some(shaders) = self.state.borrow_mut().attached.get_mut(&program) {
            shaders.retain(|s| *s != shader);
        }
        self.record(GpuCall::DetachShader { program, shader });
    }

    fn link_program(&self, program: Self::Program) {
        {
            let mut state = self.state.borrow_mut();
            let attached = state.attached.get(&program).cloned().unwrap_or_default();
            let compiled = !attached.is_empty()
                && attached
                    .iter()
                    .all(|s| state.shaders.get(s).is_some_and(|s| s.compiled));
            if compiled && !state.fail_link {
                let text = attached
                    .iter()
                    .filter_map(|s| state.shaders.get(s).map(|s| s.source.as_str()))
                    .collect::<Vec<_>>()
                    .join("\n");
                state.linked.insert(program, text);
                state.link_logs.remove(&program);
            } else {
                state.linked.remove(&program);
                state
                    .link_logs
                    .insert(program, "ERROR: program link failed".to_string());
            }
        }
        self.record(GpuCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        self.state.borrow().linked.contains_key(&program)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        self.state
            .borrow()
            .link_logs
            .get(&program)
            .cloned()
            .unwrap_or_default()
    }

    fn delete_program(&self, program: Self::Program) {
        {
            let mut state = self.state.borrow_mut();
            state.linked.remove(&program);
            state.attached.remove(&program);
        }
        self.record(GpuCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<Self::Program>) {
        self.record(GpuCall::UseProgram(program));
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        let state = self.state.borrow();
        let source = state.linked.get(&program)?;
        resolves(source, name).then(|| RecordedUniform {
            program,
            name: name.to_string(),
        })
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, RenderError> {
        let vertex_array = self.state.borrow_mut().allocate("vertex array")?;
        self.record(GpuCall::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        self.record(GpuCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        self.record(GpuCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<Self::Buffer, RenderError> {
        let buffer = self.state.borrow_mut().allocate("buffer")?;
        self.record(GpuCall::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        self.record(GpuCall::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        self.record(GpuCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(GpuCall::BufferData {
            target,
            bytes: data.len(),
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GpuCall::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, normalized: bool) {
        self.record(GpuCall::VertexAttribPointer {
            index,
            size,
            normalized,
        });
    }

    fn create_texture(&self) -> Result<Self::Texture, RenderError> {
        let texture = self.state.borrow_mut().allocate("texture")?;
        self.record(GpuCall::CreateTexture(texture));
        Ok(texture)
    }

    fn active_texture(&self, unit: u32) {
        self.record(GpuCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: Option<Self::Texture>) {
        self.record(GpuCall::BindTexture(texture));
    }

    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        self.record(GpuCall::TexImage2d {
            width,
            height,
            pixels: pixels.to_vec(),
        });
    }

    fn texture_sampling(&self, sampling: Sampling) {
        self.record(GpuCall::TextureSampling(sampling));
    }

    fn generate_mipmap(&self) {
        self.record(GpuCall::GenerateMipmap);
    }

    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]) {
        self.record(GpuCall::UniformMatrix4 {
            name: location.map(|l| l.name.clone()),
            value: *value,
        });
    }

    fn uniform3(&self, location: Option<&Self::UniformLocation>, value: &[f32; 3]) {
        self.record(GpuCall::Uniform3 {
            name: location.map(|l| l.name.clone()),
            value: *value,
        });
    }

    fn uniform4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 4]) {
        self.record(GpuCall::Uniform4 {
            name: location.map(|l| l.name.clone()),
            value: *value,
        });
    }

    fn uniform1f(&self, location: Option<&Self::UniformLocation>, value: f32) {
        self.record(GpuCall::Uniform1f {
            name: location.map(|l| l.name.clone()),
            value,
        });
    }

    fn uniform1i(&self, location: Option<&Self::UniformLocation>, value: i32) {
        self.record(GpuCall::Uniform1i {
            name: location.map(|l| l.name.clone()),
            value,
        });
    }

    fn draw_elements(&self, topology: Topology, count: i32, index_type: IndexType, offset: i32) {
        self.record(GpuCall::DrawElements {
            topology,
            count,
            index_type,
            offset,
        });
    }
}
