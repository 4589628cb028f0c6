pub mod app;
pub mod cli;
pub mod config;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use app::{Console, Output};
pub use cli::Cli;
pub use config::AppConfig;
pub use utils::errors::{ConsoleError, Result};
