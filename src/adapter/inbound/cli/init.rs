//! Handler for the `init` command.

use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::inbound::cli::command::InitArgs;
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::telegram::BOT_TOKEN_ENV;
use crate::infrastructure::config::CONFIG_TEMPLATE;

/// Directory created next to the config file for the database.
const DATA_DIR: &str = "data";

/// Write the starter configuration.
pub fn execute(args: &InitArgs) -> Result<()> {
    if args.config.exists() && !args.force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: format!(
                "{} already exists (use --force to overwrite)",
                args.config.display()
            ),
        }
        .into());
    }

    let data_dir = write_template(&args.config)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::success("Configuration written");
    output::field("Config", args.config.display());
    output::field("Data", data_dir.display());
    print_next_steps(&args.config);
    Ok(())
}

/// Write the template to `path` and create the data directory beside it.
///
/// Returns the data directory.
pub(super) fn write_template(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    fs::write(path, CONFIG_TEMPLATE)?;

    let data_dir = parent.join(DATA_DIR);
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Tell the operator what to fill in before the first real run.
pub(super) fn print_next_steps(path: &Path) {
    output::section("Next steps");
    output::note(&format!(
        "Set telegram.bot_token (or {BOT_TOKEN_ENV}) and telegram.owners in {}",
        path.display()
    ));
    output::note("Then start the bot:");
    output::hint(&format!("groupwatch run --config {}", path.display()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_template_creates_config_and_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let data = write_template(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
        assert!(data.is_dir());
        assert_eq!(data, dir.path().join("nested").join("data"));
    }

    #[test]
    fn execute_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "keep me").unwrap();

        let args = InitArgs {
            config: path.clone(),
            force: false,
        };
        assert!(execute(&args).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn execute_overwrites_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "old").unwrap();

        let args = InitArgs {
            config: path.clone(),
            force: true,
        };
        execute(&args).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
