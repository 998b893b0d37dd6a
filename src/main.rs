//! Privateer CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Prompt for a query, then browse the results
//! privateer
//!
//! # Search immediately
//! privateer demon slayer s03e05
//!
//! # Show where configuration, credentials and logs live
//! privateer --print-config
//!
//! # Save flag overrides to the config file
//! privateer --base-url http://nas:9117 --write-config
//! ```
//!
//! # Configuration
//!
//! On first run privateer asks for the Jackett API key and stores it in the
//! user's config directory (`~/.config/privateer/privateer.json` on Linux).
//! Other settings come from `~/.config/privateer/config.toml` and
//! `PRIVATEER_*` environment variables.

use privateer::{
    cli::Cli,
    launch::SystemLauncher,
    logging,
    ui::StdoutWriter,
    workflow::{ExitStatus, Stage, Workflow},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = StdoutWriter::new();

    match run(&cli, &output) {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::error!(error = %e, "privateer failed");
            output.error(&e.to_string());
            ExitStatus::Failed.into()
        }
    }
}

fn run(cli: &Cli, output: &StdoutWriter) -> privateer::Result<ExitStatus> {
    let config = cli.resolve_config()?;

    if cli.print_config {
        output.write(&config.summary());
        return Ok(ExitStatus::Completed);
    }
    if cli.write_config {
        let path = cli.save_config(&config)?;
        output.success(&format!("Configuration written to {}", path.display()));
        return Ok(ExitStatus::Completed);
    }

    logging::init(&config, cli.verbose);

    let query = cli.search_query();
    let stage = match cli.api_key() {
        Some(api_key) => Stage::initial(Some(api_key), query),
        None => Stage::bootstrap(&config.credentials_path(), query),
    };

    let mut workflow = Workflow::new(config, SystemLauncher::new())?;
    let result = workflow.run(stage);

    // The terminal is restored by now; surface anything the session deferred.
    for (level, message) in workflow.notices() {
        output.message(*level, message);
    }

    result
}
