mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, count};
use oucount_common::error::SetupError;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    let cfg = commands.into_config();

    print::banner(cfg.quiet);
    print::header("getting ready to count", cfg.quiet);

    match count::count(&cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_fatal(err: &anyhow::Error) {
    oucount_common::error!("{}", fatal_message(err));
    if let Some(setup) = err.downcast_ref::<SetupError>() {
        print::hint(setup.remediation());
    }
}

/// Prefixes failures of the directory itself so they are not mistaken for
/// a problem with the local machine or the flags.
fn fatal_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SetupError>() {
        Some(setup) if setup.is_environment() => format!("Directory unavailable: {:#}", err),
        _ => format!("{:#}", err),
    }
}
