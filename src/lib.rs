//! Unattended `firebase deploy` runs with explicit answers to its confirmation prompts.

pub mod config;
pub mod error;
pub mod logging;
mod process_signal;
pub mod prompt;
pub mod supervisor;

pub use config::{DeployCli, PassthroughArgs, RunConfiguration};
pub use error::{UnansweredPrompt, UsageError};
pub use prompt::{resolve, Answer, PromptDescriptor, PromptId, StreamWatcher, PROMPT_REGISTRY};
pub use supervisor::{DeployCommand, SessionOutcome, SubprocessSession, FALLBACK_EXIT_CODE};
