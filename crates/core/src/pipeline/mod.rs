// Pipeline module - core logic only
// Nodes that do I/O live in core-full

pub mod core;
pub mod keys;

// Re-export core types
pub use core::*;
pub use keys::*;
