//! Prompt recognition and answering for the wrapped deploy output.

mod registry;
mod resolver;
mod sanitize;
mod watcher;

pub use registry::{descriptor, AnswerFlags, PromptDescriptor, PromptId, PROMPT_REGISTRY};
pub use resolver::{resolve, Answer};
pub use watcher::StreamWatcher;
