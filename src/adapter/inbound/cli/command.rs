//! Command-line interface definitions.
//!
//! Defines the CLI structure for groupwatch using `clap`: running the bot,
//! writing a starter configuration, and validating an existing one.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Telegram group keyword monitor
#[derive(Parser, Debug)]
#[command(name = "groupwatch")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (writes a starter config on first run)
    Run(ConfigPathArg),

    /// Write a starter configuration file
    Init(InitArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Shared `--config` argument.
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArg {
    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = default_config_path())]
    pub config: PathBuf,
}

/// Arguments for `init`.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Path to write the configuration file to
    #[arg(short, long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Subcommands for `check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file without starting the bot
    Config(ConfigPathArg),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "groupwatch");
    }

    #[test]
    fn test_color_choice_default_is_auto() {
        assert!(matches!(ColorChoice::default(), ColorChoice::Auto));
    }

    #[test]
    fn test_parse_run_uses_default_config() {
        let cli = Cli::try_parse_from(["groupwatch", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_run_with_config() {
        let cli = Cli::try_parse_from(["groupwatch", "run", "-c", "/etc/gw.toml"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("/etc/gw.toml"));
    }

    #[test]
    fn test_parse_init_force() {
        let cli = Cli::try_parse_from(["groupwatch", "init", "--force"]).unwrap();
        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert!(args.force);
    }

    #[test]
    fn test_parse_check_config() {
        let cli =
            Cli::try_parse_from(["groupwatch", "check", "config", "--config", "x.toml"]).unwrap();
        let Commands::Check(CheckCommand::Config(args)) = cli.command else {
            panic!("expected check config");
        };
        assert_eq!(args.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["groupwatch", "run", "--json", "-vv", "--color", "never"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_check_requires_subcommand() {
        assert!(Cli::try_parse_from(["groupwatch", "check"]).is_err());
    }
}
