//! Configuration module
//!
//! - Platform-aware path resolution for data, settings and logs
//! - User settings persistence (identity, period preference, cache tuning)

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;
