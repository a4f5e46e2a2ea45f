//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod devices;
pub mod presets;
pub mod record;
pub mod render;
