//! Handler for the `run` command.

use tracing::info;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{init, output};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
///
/// A missing config file is not an error: the template is written and the
/// operator is asked to fill it in.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    if !args.config.exists() {
        let data_dir = init::write_template(&args.config)?;
        output::header(env!("CARGO_PKG_VERSION"));
        output::warning(&format!(
            "No configuration found; wrote a template to {}",
            args.config.display()
        ));
        output::field("Data", data_dir.display());
        init::print_next_steps(&args.config);
        return Ok(());
    }

    let config = Config::load(&args.config)?;
    config.init_logging();

    print_startup(&args.config.display().to_string(), &config);
    info!(
        config = %args.config.display(),
        database = %config.database_path().display(),
        owners = config.owners().len(),
        "groupwatch starting"
    );

    bootstrap::run(config).await?;

    info!("groupwatch stopped");
    Ok(())
}

fn print_startup(path: &str, config: &Config) {
    if output::is_quiet() && !output::is_json() {
        return;
    }
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", path);
    output::field("Database", config.database_path().display());
    output::field("Owners", config.owners().len());
    if !config.notify.enabled {
        output::warning("Alerts disabled: matches are only logged");
    }
}
