use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::Journal;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This creates:
///  - the config directory (if missing)
///  - the configuration file with defaults (skipped in test mode)
///  - the journal database with its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let path = cli.config_path();
    let db_path = Config::init_all(&path, cli.db.clone(), cli.test)?;

    info("Initializing smilesensor…");
    println!("📄 Config file : {}", path.display());
    println!("🗄️  Journal    : {}", db_path.display());

    let journal = Journal::open(&db_path)?;
    journal.note(
        "init",
        "",
        &format!("Journal initialized at {}", db_path.display()),
    );

    success("smilesensor initialization completed!");
    if !cli.test {
        info("Fill in face_api.key and the sink credentials, then run `smilesensor config --check`.");
    }
    Ok(())
}
