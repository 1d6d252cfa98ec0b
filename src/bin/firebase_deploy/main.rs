//! `firebase-deploy` entrypoint: runs `firebase deploy` with its confirmation
//! prompts answered from the command line.
//!
//! Wrapper flags are consumed here; every other argument is forwarded to
//! Firebase. The wrapper exits with the deploy's own exit code.

use std::io::{self, Write};
use std::process;

use firebase_deploy::config::reject_disallowed;
use firebase_deploy::logging::{init_logging, TraceSettings};
use firebase_deploy::{DeployCli, DeployCommand, PassthroughArgs};
use tracing::{error, info};

/// Exit code for failures of the wrapper itself (bad flags, unanswered prompt, spawn failure).
const WRAPPER_FAILURE_EXIT_CODE: i32 = 1;

fn main() {
    let (cli, passthrough) = DeployCli::parse_with_passthrough(std::env::args());
    init_logging(&TraceSettings::from_cli(&cli), &cli.firebase_cmd);
    process::exit(run(&cli, &passthrough));
}

fn run(cli: &DeployCli, passthrough: &PassthroughArgs) -> i32 {
    if let Err(err) = reject_disallowed(passthrough) {
        error!(%err, "rejected passthrough flag");
        eprintln!("{err}");
        return WRAPPER_FAILURE_EXIT_CODE;
    }

    let config = cli.run_configuration();
    info!(?config, args = ?passthrough.as_slice(), "starting deploy wrapper");

    let result = DeployCommand::parse(&cli.firebase_cmd)
        .and_then(|command| command.start(passthrough, config))
        .and_then(|session| {
            let mut out = io::stdout().lock();
            let mut err = io::stderr().lock();
            session.run(&mut out, &mut err)
        });

    match result {
        Ok(outcome) => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "process exited with code {}", outcome.exit_code);
            let _ = out.flush();
            outcome.exit_code
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "deploy wrapper failed");
            eprintln!("{err:#}");
            WRAPPER_FAILURE_EXIT_CODE
        }
    }
}
