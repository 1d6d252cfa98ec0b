//! Separation of wrapper flags from arguments forwarded to `firebase deploy`.

use crate::error::UsageError;

/// Flags the wrapper consumes itself.
const WRAPPER_FLAGS: &[&str] = &[
    "--confirm-on-deletion",
    "--no-confirm-on-deletion",
    "--confirm-on-retry-failure",
    "--no-confirm-on-retry-failure",
    "--logs",
    "--no-logs",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// Wrapper flags that take a value, as `--flag value` or `--flag=value`.
const WRAPPER_VALUE_FLAGS: &[&str] = &["--firebase-cmd"];

/// Arguments forwarded verbatim, in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassthroughArgs(Vec<String>);

impl PassthroughArgs {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.0.iter().any(|candidate| candidate == arg)
    }
}

impl From<Vec<String>> for PassthroughArgs {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

fn is_inline_value_flag(arg: &str) -> bool {
    WRAPPER_VALUE_FLAGS.iter().any(|flag| {
        arg.strip_prefix(flag)
            .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Split argv (without the program name) into wrapper args and passthrough args.
///
/// A bare `--` ends wrapper parsing; everything after it is forwarded and the
/// separator itself is dropped.
pub fn split_wrapper_args<I>(args: I) -> (Vec<String>, PassthroughArgs)
where
    I: IntoIterator<Item = String>,
{
    let mut wrapper = Vec::new();
    let mut passthrough = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            passthrough.extend(args.by_ref());
            break;
        }
        if WRAPPER_FLAGS.contains(&arg.as_str()) || is_inline_value_flag(&arg) {
            wrapper.push(arg);
        } else if WRAPPER_VALUE_FLAGS.contains(&arg.as_str()) {
            wrapper.push(arg);
            wrapper.extend(args.next());
        } else {
            passthrough.push(arg);
        }
    }
    (wrapper, PassthroughArgs(passthrough))
}

/// Refuse passthrough flags that would stop Firebase from prompting.
///
/// # Errors
///
/// Returns the first disallowed flag found, checking `--non-interactive` before `-f/--force`.
pub fn reject_disallowed(args: &PassthroughArgs) -> Result<(), UsageError> {
    if args.contains("--non-interactive") {
        return Err(UsageError::NonInteractive);
    }
    if args.contains("-f") || args.contains("--force") {
        return Err(UsageError::Force);
    }
    Ok(())
}
