/// Centralized error handling for modkit
pub mod modkit;

pub use modkit::{ModkitError, Result};
