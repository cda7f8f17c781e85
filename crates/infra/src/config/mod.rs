//! Configuration loading and management
//!
//! [`ClientConfig`] is an immutable value handed to the transport at
//! construction; the loader builds one from files and environment
//! variables.

pub mod loader;
pub mod settings;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_env, load_from_file, probe_config_paths};
pub use settings::{ClientConfig, MAX_PAGE_SIZE};
