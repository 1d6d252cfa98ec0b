//! Typed run failures that callers distinguish from ordinary I/O errors.

use std::fmt;

use crate::prompt::PromptDescriptor;

/// A passthrough flag that would bypass the wrapper's own prompt answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    NonInteractive,
    Force,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::NonInteractive => write!(f, "--non-interactive is not supported."),
            UsageError::Force => write!(
                f,
                "-f/--force is not supported. Please use --confirm-on-deletion instead."
            ),
        }
    }
}

impl std::error::Error for UsageError {}

/// A known prompt showed up but the run carries no answer for it.
///
/// The child is blocked on its stdin at this point, so the run cannot continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnansweredPrompt {
    pub descriptor: &'static PromptDescriptor,
}

impl fmt::Display for UnansweredPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.descriptor.answer_flags;
        write!(
            f,
            "Prompt '{}' was found but no response was provided. Please provide either {} or {}",
            self.descriptor.signature, flags.yes, flags.no
        )
    }
}

impl std::error::Error for UnansweredPrompt {}
