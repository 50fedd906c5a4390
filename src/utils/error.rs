//! Error handling for the loader
//!
//! The scanning, mapping and polling algorithms never fail. Errors only come
//! from the edges: reading configuration and talking to the external
//! renderer. Renderer errors are logged by the loader and never stop the
//! filter flow.

use thiserror::Error;

/// Loader error type
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The external renderer rejected a call
    #[error("Renderer error during {operation}: {message}")]
    Render {
        operation: &'static str,
        message: String,
    },

    /// Invalid input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

// Convenience constructors for errors
impl LoaderError {
    pub fn render(operation: &'static str, message: impl Into<String>) -> Self {
        LoaderError::Render {
            operation,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        LoaderError::InvalidInput {
            message: message.into(),
        }
    }

    /// True for failures reported by the external renderer
    pub fn is_render(&self) -> bool {
        matches!(self, LoaderError::Render { .. })
    }
}
