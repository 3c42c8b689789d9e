pub mod constants;
pub mod settings;

pub use settings::{BuildMode, BuildSettings};
