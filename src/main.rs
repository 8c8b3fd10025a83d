use std::sync::Arc;

use libdist::cli::Cli;
use libdist::commands;
use libdist::logging::{Logger, init_subscriber};

fn main() {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse_args();
    let command = args.action.name();
    init_subscriber(args.verbose, command);
    let log = Arc::new(Logger::new(command));

    let code = match commands::run(&args, log.clone()) {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            log.error(&format!("{e:#}"));
            commands::error_exit_code(&e)
        }
    };
    if let Some(path) = log.log_path() {
        log.debug(&format!("log written to {}", path.display()));
    }
    std::process::exit(code);
}
