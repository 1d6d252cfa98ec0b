use crate::config::RunConfiguration;
use crate::error::UnansweredPrompt;

use super::registry::PromptDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Bytes written to the child's stdin for this answer.
    pub fn payload(self) -> &'static [u8] {
        match self {
            Answer::Yes => b"y\n",
            Answer::No => b"n\n",
        }
    }
}

impl From<bool> for Answer {
    fn from(confirm: bool) -> Self {
        if confirm {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

/// Pick the configured answer for `descriptor`.
///
/// # Errors
///
/// Returns [`UnansweredPrompt`] when the run has no answer for this prompt.
pub fn resolve(
    descriptor: &'static PromptDescriptor,
    config: &RunConfiguration,
) -> Result<Answer, UnansweredPrompt> {
    config
        .answer_for(descriptor.id)
        .map(Answer::from)
        .ok_or(UnansweredPrompt { descriptor })
}
