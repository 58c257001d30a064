use clap::Parser;

use groupwatch::adapter::inbound::cli::command::{CheckCommand, Cli, ColorChoice, Commands};
use groupwatch::adapter::inbound::cli::output::{self, OutputConfig};
use groupwatch::adapter::inbound::cli::{check, init, run};
use groupwatch::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    apply_color(cli.color);
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = dispatch(cli.command).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Init(args) => init::execute(&args),
        Commands::Check(CheckCommand::Config(args)) => check::config::execute_config(&args.config),
    }
}

fn apply_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}
