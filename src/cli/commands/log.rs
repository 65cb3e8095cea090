use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::Journal;
use crate::errors::AppResult;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, last } = cmd {
        let journal = Journal::open(Path::new(&cfg.database))?;
        LogLogic::print_log(&journal, *last)?;
    }

    Ok(())
}
