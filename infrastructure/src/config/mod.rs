//! Configuration file loading for dockerizer
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOCKERIZER_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dockerizer.toml` or `./.dockerizer.toml`
//! 4. Global: `$XDG_CONFIG_HOME/dockerizer/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileGeneratorConfig, FileInspectorsConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
