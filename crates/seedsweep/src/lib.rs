pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod manifest;

pub use cli::Cli;
pub use config::SweepSettings;
pub use logging::init_logging;
