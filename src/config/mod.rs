pub mod env;
pub mod loader;
pub mod types;

pub use loader::{config_from_env, load_config};
pub use types::PixivConfig;
