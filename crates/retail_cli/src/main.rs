//! Migration entry point: loads the legacy JSON exports into SQLite.
//!
//! Configuration is read from the environment (see `retail_core::config`).
//! Exits with status 1 and an error line on the first failure.
//! `--version` prints the core library version and exits.

use log::info;
use retail_core::db::open_db;
use retail_core::{core_version, init_logging, migrate_all, AppConfig, MigrationSources};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    if wants_version(std::env::args().skip(1)) {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("retail_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    let conn = open_db(&config.db_path)?;
    let sources = MigrationSources {
        customers: open_source(&config.sources.customers)?,
        invoices: open_source(&config.sources.invoices)?,
        products: open_source(&config.sources.products)?,
        sales: open_source(&config.sources.sales)?,
    };

    for report in migrate_all(&conn, sources)? {
        info!(
            "event=cli_migrate module=cli status=ok entity={} created={}",
            report.entity, report.created
        );
        println!("migrated {} {}", report.created, report.entity);
    }
    Ok(())
}

fn open_source(path: &Path) -> Result<BufReader<File>, Box<dyn Error>> {
    let file = File::open(path)
        .map_err(|err| format!("cannot open source file `{}`: {err}", path.display()))?;
    Ok(BufReader::new(file))
}

fn wants_version(mut args: impl Iterator<Item = String>) -> bool {
    args.any(|arg| arg == "--version" || arg == "-V")
}

fn version_line() -> String {
    format!("retail_cli (retail_core {})", core_version())
}

#[cfg(test)]
mod tests {
    use super::{version_line, wants_version};

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn version_flag_is_recognized() {
        assert!(wants_version(args(&["--version"])));
        assert!(wants_version(args(&["-V"])));
        assert!(!wants_version(args(&[])));
        assert!(!wants_version(args(&["--verbose"])));
    }

    #[test]
    fn version_line_names_core_version() {
        let line = version_line();
        assert!(line.starts_with("retail_cli (retail_core "));
        assert!(line.ends_with(&format!("{})", env!("CARGO_PKG_VERSION"))));
    }
}
