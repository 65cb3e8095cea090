use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::config::migrate::run_config_migration;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        sink,
        edit_config,
        editor,
        migrate,
        from,
    } = &cli.command
    {
        let path = cli.config_path();

        if *migrate {
            let legacy_dir = expand_tilde(from.as_deref().unwrap_or("conf"));
            run_config_migration(&path, &legacy_dir)?;
        }

        if *print_config {
            // reload so a migration in the same call shows up
            let current = if *migrate { Config::load(&path)? } else { cfg.clone() };
            ConfigLogic::print(&current)?;
        }

        if *check {
            let sink = sink.unwrap_or(cfg.sink);
            if !ConfigLogic::check(cfg, sink) {
                return Err(AppError::Config(format!(
                    "incomplete configuration in {}",
                    path.display()
                )));
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
