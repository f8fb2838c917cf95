//! Error types for window, GL resource and asset loading failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the viewer library
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    #[error("Failed to create OpenGL context: {0}")]
    ContextCreation(String),

    #[error("Failed to allocate GPU resource: {0}")]
    ResourceAllocation(String),

    #[error("Failed to compile {stage} shader: {log}")]
    ShaderCompilation { stage: &'static str, log: String },

    #[error("Failed to link shader program: {0}")]
    ProgramLink(String),

    #[error("Failed to load OBJ model '{}': {source}", .path.display())]
    ObjLoad {
        path: PathBuf,
        source: tobj::LoadError,
    },

    #[error("Failed to decode texture image '{}': {source}", .path.display())]
    TextureDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to initialize UI painter: {0}")]
    UiInit(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = RenderError::ShaderCompilation {
            stage: "vertex",
            log: "0:12(3): error: syntax error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("vertex"));
        assert!(msg.contains("syntax error"));

        let err = RenderError::ObjLoad {
            path: PathBuf::from("assets/missing.obj"),
            source: tobj::LoadError::OpenFileFailed,
        };
        assert!(err.to_string().contains("assets/missing.obj"));
    }
}
