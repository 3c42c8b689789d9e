pub mod artifact;
pub mod config;
pub mod diagnostic;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod outputs;
pub mod pipeline;
pub mod util;

pub use diagnostic::{Diagnostic, DiagnosticSink, Diagnostics, NullSink, Severity};
pub use error::{ModkitError, Result};
