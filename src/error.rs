//! Renderer error types.
//!
//! Every variant here is fatal for the frame that produced it: the renderer
//! does not retry GPU work. A light-shape change is *not* an error; it only
//! causes a program rebuild (see [`crate::resources::program`]).

use crate::backend::ShaderStage;

/// Errors surfaced by resource creation and frame rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A shader stage failed to compile.
    #[error("{stage:?} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    /// The compiled stages failed to link into a program.
    #[error("program failed to link: {log}")]
    Link { log: String },
    /// The GPU could not allocate a buffer, texture, vertex array, shader or program.
    #[error("could not allocate {resource}: {message}")]
    ResourceExhaustion {
        resource: &'static str,
        message: String,
    },
    /// Image bytes could not be decoded into a texture.
    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl RenderError {
    pub(crate) fn exhausted(resource: &'static str, message: impl Into<String>) -> Self {
        Self::ResourceExhaustion {
            resource,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::exhausted("buffer", "out of memory");
        assert_eq!(err.to_string(), "could not allocate buffer: out of memory");

        let err = RenderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:1: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fragment shader failed to compile: 0:1: syntax error"
        );
    }
}
