//! Turns the child's stdout into echoed output plus prompt answers.
//!
//! Each chunk is echoed before it is inspected. Matching runs against the
//! current logical line, so a prompt split over several reads is still caught,
//! and each occurrence is answered exactly once.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::RunConfiguration;

use super::registry::{longest_signature_len, PromptDescriptor, PromptId, PROMPT_REGISTRY};
use super::resolver::resolve;
use super::sanitize::OutputSanitizer;

/// Upper bound for the unterminated line kept for matching.
const MAX_LINE_WINDOW_BYTES: usize = 8 * 1024;

/// Text of the current output line plus, per registry entry, how far it has
/// already been matched.
#[derive(Debug)]
struct LineWindow {
    line: String,
    cursors: Vec<usize>,
    max_bytes: usize,
}

impl LineWindow {
    fn new(max_bytes: usize) -> Self {
        Self {
            line: String::new(),
            cursors: vec![0; PROMPT_REGISTRY.len()],
            max_bytes: max_bytes.max(longest_signature_len()),
        }
    }

    /// Append `text` and return, per registry entry, whether a new occurrence appeared.
    fn push(&mut self, text: &str) -> Vec<bool> {
        let mut hits = vec![false; PROMPT_REGISTRY.len()];
        for segment in text.split_inclusive('\n') {
            let ends_line = segment.ends_with('\n');
            self.line.push_str(segment.strip_suffix('\n').unwrap_or(segment));
            self.scan(&mut hits);
            if ends_line {
                self.line.clear();
                self.cursors.fill(0);
            } else {
                self.enforce_bound();
            }
        }
        hits
    }

    fn scan(&mut self, hits: &mut [bool]) {
        for (idx, entry) in PROMPT_REGISTRY.iter().enumerate() {
            while let Some(pos) = self.line[self.cursors[idx]..].find(entry.signature) {
                hits[idx] = true;
                self.cursors[idx] += pos + entry.signature.len();
            }
        }
    }

    fn enforce_bound(&mut self) {
        if self.line.len() <= self.max_bytes {
            return;
        }
        let mut cut = self.line.len() - longest_signature_len();
        while !self.line.is_char_boundary(cut) {
            cut += 1;
        }
        self.line.drain(..cut);
        for cursor in &mut self.cursors {
            *cursor = cursor.saturating_sub(cut);
        }
    }
}

/// Stdout watcher for one deploy run.
#[derive(Debug)]
pub struct StreamWatcher {
    config: RunConfiguration,
    sanitizer: OutputSanitizer,
    window: LineWindow,
}

impl StreamWatcher {
    pub fn new(config: RunConfiguration) -> Self {
        Self {
            config,
            sanitizer: OutputSanitizer::new(),
            window: LineWindow::new(MAX_LINE_WINDOW_BYTES),
        }
    }

    /// Echo `chunk` to `out`, then answer every prompt that newly appeared in it.
    ///
    /// Prompts found in the same chunk are answered in registry order, each at
    /// most once. Returns the prompts that were answered.
    ///
    /// # Errors
    ///
    /// Returns an [`UnansweredPrompt`](crate::UnansweredPrompt) error when a
    /// detected prompt has no configured answer. Prompts earlier in registry
    /// order are answered before that happens; nothing is written for the
    /// unanswered one.
    pub fn on_output<O, I>(
        &mut self,
        chunk: &[u8],
        out: &mut O,
        stdin: &mut I,
    ) -> Result<Vec<PromptId>>
    where
        O: Write + ?Sized,
        I: Write + ?Sized,
    {
        echo(chunk, out);

        let text = self.sanitizer.feed(chunk);
        let hits = self.window.push(&text);
        let mut answered = Vec::new();
        for (entry, _) in PROMPT_REGISTRY.iter().zip(hits).filter(|(_, hit)| *hit) {
            self.answer(entry, stdin)?;
            answered.push(entry.id);
        }
        Ok(answered)
    }

    fn answer<I>(&self, descriptor: &'static PromptDescriptor, stdin: &mut I) -> Result<()>
    where
        I: Write + ?Sized,
    {
        let answer = match resolve(descriptor, &self.config) {
            Ok(answer) => answer,
            Err(unanswered) => {
                warn!(prompt = ?descriptor.id, "prompt detected without a configured answer");
                return Err(unanswered.into());
            }
        };
        info!(prompt = ?descriptor.id, answer = ?answer, "answering prompt");
        let written = stdin
            .write_all(answer.payload())
            .and_then(|()| stdin.flush());
        if let Err(err) = written {
            warn!(prompt = ?descriptor.id, error = %err, "failed to write prompt answer");
        }
        Ok(())
    }
}

fn echo<O: Write + ?Sized>(chunk: &[u8], out: &mut O) {
    if let Err(err) = out.write_all(chunk).and_then(|()| out.flush()) {
        debug!(error = %err, "stdout echo failed");
    }
}
