//! Entry point: parses the CLI, initialises tracing and either opens the viewer
//! window or runs one of the `cubeview config` utilities.

mod bootstrap;
mod cli;
mod paths;
mod run;

use anyhow::Result;
use cli::{Command, ConfigAction, RunArgs};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => handle_config_command(config_cmd.action, &cli.run),
        None => run::run(cli.run),
    }
}

fn handle_config_command(action: ConfigAction, args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;

    match action {
        ConfigAction::Where => {
            println!("Configuration:");
            println!("  dir:   {}", paths.config_dir().display());
            println!("  file:  {}", paths.config_file().display());
            Ok(())
        }
        ConfigAction::Init { force } => {
            let written = bootstrap::write_default_config(&paths, force)?;
            println!("{}", written.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = run::effective_config(&paths, args)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
