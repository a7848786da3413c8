//! Configuration file loading

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigValidationError, FileCommandConfig, FileConfig, FileRunConfig, FileWorkerConfig,
};
pub use loader::ConfigLoader;
