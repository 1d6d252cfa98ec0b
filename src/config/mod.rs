//! Run configuration assembly so wrapper flags and passthrough args resolve consistently.

mod cli;
mod passthrough;

pub use cli::{DeployCli, DEFAULT_FIREBASE_CMD};
pub use passthrough::{reject_disallowed, split_wrapper_args, PassthroughArgs};

use crate::prompt::PromptId;

/// Pre-configured prompt answers for one run. `None` means the operator gave no answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfiguration {
    pub confirm_on_deletion: Option<bool>,
    pub confirm_on_retry_failure: Option<bool>,
}

impl RunConfiguration {
    pub fn answer_for(&self, id: PromptId) -> Option<bool> {
        match id {
            PromptId::Deletion => self.confirm_on_deletion,
            PromptId::RetryOnFailure => self.confirm_on_retry_failure,
        }
    }
}
