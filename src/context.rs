use crate::backend::{Capability, Gpu};

/// Context flags and the initial drawable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    pub cull_face: bool,
    pub depth_test: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            cull_face: true,
            depth_test: true,
            width: 1,
            height: 1,
        }
    }
}

/// Owns the GPU handle and the context-wide state set outside of frames.
#[derive(Debug)]
pub struct Context<G: Gpu> {
    pub gpu: G,
    pub config: RendererConfig,
}

impl<G: Gpu> Context<G> {
    /// Applies the enable flags and the initial viewport once.
    pub fn new(gpu: G, config: RendererConfig) -> Self {
        if config.cull_face {
            gpu.enable(Capability::CullFace);
        }
        if config.depth_test {
            gpu.enable(Capability::DepthTest);
        }
        gpu.viewport(0, 0, config.width as i32, config.height as i32);
        log::info!(
            "context ready: {}x{}, cull face {}, depth test {}",
            config.width,
            config.height,
            config.cull_face,
            config.depth_test
        );
        Self { gpu, config }
    }

    /// Returns whether the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return false;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.gpu.viewport(0, 0, width as i32, height as i32);
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}
