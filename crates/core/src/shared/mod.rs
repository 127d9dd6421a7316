pub mod constants;
pub mod frame;
pub mod geometry;
pub mod rectangle;
pub mod source_metadata;
pub mod sweep_config;
pub mod sweep_error;
