//! CLI flag schema for the wrapper's own options.

use clap::Parser;

use super::passthrough::{split_wrapper_args, PassthroughArgs};
use super::RunConfiguration;

pub const DEFAULT_FIREBASE_CMD: &str = "firebase";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "firebase-deploy",
    about = "Wrapper for `firebase deploy` that allows preanswering prompts",
    version,
    args_override_self = true
)]
pub struct DeployCli {
    /// Automatically confirm deletion of resources if not present on codebase
    #[arg(long = "confirm-on-deletion", overrides_with = "no_confirm_on_deletion")]
    pub confirm_on_deletion: bool,

    /// Automatically deny deletion of resources if not present on codebase
    #[arg(long = "no-confirm-on-deletion", overrides_with = "confirm_on_deletion")]
    pub no_confirm_on_deletion: bool,

    /// Automatically confirm retrying functions in case of failure
    #[arg(
        long = "confirm-on-retry-failure",
        overrides_with = "no_confirm_on_retry_failure"
    )]
    pub confirm_on_retry_failure: bool,

    /// Automatically deny retrying functions in case of failure
    #[arg(
        long = "no-confirm-on-retry-failure",
        overrides_with = "confirm_on_retry_failure"
    )]
    pub no_confirm_on_retry_failure: bool,

    /// Command used to invoke the Firebase CLI (split with shell quoting rules)
    #[arg(long = "firebase-cmd", env = "FIREBASE_DEPLOY_CMD", default_value = DEFAULT_FIREBASE_CMD)]
    pub firebase_cmd: String,

    /// Write a JSON debug trace (path from FIREBASE_DEPLOY_TRACE_LOG)
    #[arg(long = "logs", default_value_t = false)]
    pub logs: bool,

    /// Disable the debug trace even when --logs is set
    #[arg(long = "no-logs", default_value_t = false)]
    pub no_logs: bool,
}

impl DeployCli {
    /// Parse raw argv, exiting with clap's usage output on invalid wrapper flags.
    pub fn parse_with_passthrough<I, T>(argv: I) -> (Self, PassthroughArgs)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match Self::try_parse_with_passthrough(argv) {
            Ok(parsed) => parsed,
            Err(err) => err.exit(),
        }
    }

    /// Split raw argv into the wrapper's flags and the args forwarded to Firebase.
    ///
    /// # Errors
    ///
    /// Returns the clap error for malformed wrapper flags, or for `--help`/`--version`.
    pub fn try_parse_with_passthrough<I, T>(argv: I) -> Result<(Self, PassthroughArgs), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let bin = argv.next().unwrap_or_else(|| "firebase-deploy".to_string());
        let (wrapper, passthrough) = split_wrapper_args(argv);
        let cli = Self::try_parse_from(std::iter::once(bin).chain(wrapper))?;
        Ok((cli, passthrough))
    }

    pub fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration {
            confirm_on_deletion: tri_state(self.confirm_on_deletion, self.no_confirm_on_deletion),
            confirm_on_retry_failure: tri_state(
                self.confirm_on_retry_failure,
                self.no_confirm_on_retry_failure,
            ),
        }
    }

    #[inline]
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}

fn tri_state(confirm: bool, deny: bool) -> Option<bool> {
    match (confirm, deny) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
