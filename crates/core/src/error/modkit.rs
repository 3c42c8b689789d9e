/// Unified error type for modkit
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModkitError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    // Pipeline errors
    #[error("Missing required input: {0}")]
    MissingInput(String),

    // Fatal build phases. Messages stay generic; detail lives in diagnostics.
    #[error("Type check failed")]
    TypeCheckFailed,

    #[error("Build failed")]
    BuildFailed,

    // External toolchain could not be driven (spawn failure, bad output)
    #[error("Toolchain error: {0}")]
    Toolchain(String),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),

    // Boxed error for dynamic error types
    #[error("Error: {0}")]
    Boxed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias using ModkitError
pub type Result<T> = std::result::Result<T, ModkitError>;

impl ModkitError {
    /// Create a missing input error
    pub fn missing_input(name: impl Into<String>) -> Self {
        Self::MissingInput(name.into())
    }

    /// Create a toolchain error
    pub fn toolchain(msg: impl Into<String>) -> Self {
        Self::Toolchain(msg.into())
    }
}

// Conversion from String for convenience
impl From<String> for ModkitError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

// Conversion from &str for convenience
impl From<&str> for ModkitError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<serde_json::Error> for ModkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
