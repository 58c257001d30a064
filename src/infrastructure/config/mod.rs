//! Infrastructure configuration modules.

pub mod logging;
pub mod monitor;
pub mod settings;
pub mod telegram;

/// Documented configuration template written by `init` and first `run`.
pub const CONFIG_TEMPLATE: &str = include_str!("../../../config.example.toml");
