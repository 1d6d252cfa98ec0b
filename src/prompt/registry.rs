//! Known `firebase deploy` confirmation prompts.
//!
//! Registry order decides the answering order when several prompts show up in
//! the same output chunk.

/// Stable identity of a known prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Functions present remotely but missing from the codebase.
    Deletion,
    /// Functions whose retry-on-failure policy is being turned on.
    RetryOnFailure,
}

/// The wrapper flags that pre-answer a prompt with yes or no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFlags {
    pub yes: &'static str,
    pub no: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptDescriptor {
    pub id: PromptId,
    /// Fixed fragment of the prompt text used for detection.
    pub signature: &'static str,
    pub answer_flags: AnswerFlags,
}

pub const PROMPT_REGISTRY: &[PromptDescriptor] = &[
    PromptDescriptor {
        id: PromptId::Deletion,
        signature: "Would you like to proceed with deletion? Selecting no will continue the rest",
        answer_flags: AnswerFlags {
            yes: "--confirm-on-deletion",
            no: "--no-confirm-on-deletion",
        },
    },
    PromptDescriptor {
        id: PromptId::RetryOnFailure,
        signature: "The following functions will newly be retried in case of failure",
        answer_flags: AnswerFlags {
            yes: "--confirm-on-retry-failure",
            no: "--no-confirm-on-retry-failure",
        },
    },
];

/// Look up the registry entry for `id`.
pub fn descriptor(id: PromptId) -> &'static PromptDescriptor {
    match id {
        PromptId::Deletion => &PROMPT_REGISTRY[0],
        PromptId::RetryOnFailure => &PROMPT_REGISTRY[1],
    }
}

pub(crate) fn longest_signature_len() -> usize {
    PROMPT_REGISTRY
        .iter()
        .map(|descriptor| descriptor.signature.len())
        .max()
        .unwrap_or(0)
}
