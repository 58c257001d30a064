//! Canonical test configurations.
//!
//! Single source of truth for the config used across tests, so each test
//! module does not define its own slightly different defaults.

use crate::infrastructure::config::settings::Config;

/// Owner used by [`config`].
pub const OWNER: i64 = 1001;

/// Minimal valid configuration with a single owner.
#[must_use]
pub fn config() -> Config {
    with_owners(&[OWNER])
}

/// Valid configuration with the given owners and default limits.
///
/// # Panics
/// Panics if `owners` is empty or contains a non-positive ID.
#[must_use]
pub fn with_owners(owners: &[i64]) -> Config {
    let owners = owners
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let content = format!(
        r#"
database = ":memory:"

[telegram]
bot_token = "123456:TEST-TOKEN"
owners = [{owners}]
register_commands = false
"#
    );
    Config::parse_toml_with_env(&content, |_| None).expect("test config is valid")
}

/// Configuration with tight keyword and group limits.
#[must_use]
pub fn with_limits(max_keywords: usize, max_groups: usize) -> Config {
    let mut config = config();
    config.monitor.max_keywords = max_keywords;
    config.monitor.max_groups = max_groups;
    config
}
