// config module: user and project settings

pub mod loader;
pub mod types;

pub use loader::{load_project_config, load_user_config, user_config_path};
pub use types::{NestedCandidates, ProjectConfig, UserConfig};
