use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate configuration file without starting the bot.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Bot token", config.telegram.redacted_token());
    output::field("Owners", owner_list(&config));
    output::field("Database", config.database_path().display());
    output::field("Keywords", format!("max {}", config.monitor.max_keywords));
    output::field("Groups", format!("max {}", config.monitor.max_groups));
    output::field(
        "Matching",
        if config.monitor.case_sensitive {
            "case-sensitive"
        } else {
            "case-insensitive"
        },
    );
    if output::verbosity() > 0 {
        output::field("Preview", format!("{} chars", config.monitor.content_preview_len));
        output::field("Logging", format!("{} ({})", config.logging.level, config.logging.format));
    }

    if config.notify.enabled {
        let audience = if config.notify.owners_only {
            "owners"
        } else {
            "owners and admins"
        };
        output::field("Alerts", audience);
    } else {
        output::warning("Alerts disabled: matches are only logged");
    }

    output::success("Configuration check complete");

    Ok(())
}

fn owner_list(config: &Config) -> String {
    config
        .owners()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
