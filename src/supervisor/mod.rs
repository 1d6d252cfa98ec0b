//! Deploy child lifecycle: spawn with piped stdio, relay both output streams,
//! answer prompts on stdin, and surface the child's exit status.

mod io;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, never, select, Receiver};
use std::io::Write;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

use self::io::spawn_stream_reader;
use crate::config::{PassthroughArgs, RunConfiguration};
use crate::process_signal::request_termination;
use crate::prompt::StreamWatcher;

/// Exit code used when the child ends without one (killed by a signal).
pub const FALLBACK_EXIT_CODE: i32 = 1;
pub const DEPLOY_ACTION: &str = "deploy";
/// Keeps Firebase prompting instead of picking defaults on its own.
pub const INTERACTIVE_FLAG: &str = "--interactive";

const STREAM_CHANNEL_CAPACITY: usize = 100;

/// How to invoke the Firebase CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCommand {
    program: String,
    leading_args: Vec<String>,
}

impl DeployCommand {
    /// Build from a shell-style command string such as `firebase` or `npx firebase-tools`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has unbalanced quotes or no words.
    pub fn parse(cmd: &str) -> Result<Self> {
        let words =
            shell_words::split(cmd).with_context(|| format!("invalid firebase command: {cmd}"))?;
        let (program, leading_args) = words
            .split_first()
            .ok_or_else(|| anyhow!("firebase command is empty"))?;
        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program: `deploy`, the passthrough args, then `--interactive`.
    pub fn args(&self, passthrough: &PassthroughArgs) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push(DEPLOY_ACTION.to_string());
        args.extend(passthrough.as_slice().iter().cloned());
        args.push(INTERACTIVE_FLAG.to_string());
        args
    }

    /// Spawn the deploy with every stdio stream piped through this process.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or its pipes are missing.
    pub fn start(
        &self,
        passthrough: &PassthroughArgs,
        config: RunConfiguration,
    ) -> Result<SubprocessSession> {
        let args = self.args(passthrough);
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to capture {} stdin", self.program))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to capture {} stdout", self.program))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("failed to capture {} stderr", self.program))?;

        let (stdout_tx, stdout_rx) = bounded(STREAM_CHANNEL_CAPACITY);
        let (stderr_tx, stderr_rx) = bounded(STREAM_CHANNEL_CAPACITY);
        spawn_stream_reader(stdout, stdout_tx, "stdout");
        spawn_stream_reader(stderr, stderr_tx, "stderr");

        info!(program = %self.program, ?args, pid = child.id(), "deploy started");
        Ok(SubprocessSession {
            child,
            stdin,
            stdout_rx,
            stderr_rx,
            watcher: StreamWatcher::new(config),
        })
    }
}

/// A running deploy child together with its stream plumbing.
pub struct SubprocessSession {
    child: Child,
    stdin: ChildStdin,
    stdout_rx: Receiver<Vec<u8>>,
    stderr_rx: Receiver<Vec<u8>>,
    watcher: StreamWatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub status: ExitStatus,
    pub exit_code: i32,
}

impl SubprocessSession {
    /// Relay output until both streams close, then reap the child.
    ///
    /// Stdout goes through the prompt watcher into `out`; stderr is copied to
    /// `err` unchanged. Whichever stream has data first is serviced first.
    ///
    /// # Errors
    ///
    /// Returns the watcher's [`UnansweredPrompt`](crate::UnansweredPrompt)
    /// error as soon as an unconfigured prompt shows up. The child is sent a
    /// termination request and is not waited for. Also fails if the child
    /// cannot be reaped.
    pub fn run<O, E>(self, out: &mut O, err: &mut E) -> Result<SessionOutcome>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let SubprocessSession {
            mut child,
            mut stdin,
            stdout_rx,
            stderr_rx,
            mut watcher,
        } = self;

        let closed = never::<Vec<u8>>();
        let mut stdout_open = true;
        let mut stderr_open = true;
        while stdout_open || stderr_open {
            let stdout_src = if stdout_open { &stdout_rx } else { &closed };
            let stderr_src = if stderr_open { &stderr_rx } else { &closed };
            select! {
                recv(stdout_src) -> chunk => match chunk {
                    Ok(chunk) => {
                        if let Err(fatal) = watcher.on_output(&chunk, out, &mut stdin) {
                            abandon(&mut child);
                            return Err(fatal);
                        }
                    }
                    Err(_) => stdout_open = false,
                },
                recv(stderr_src) -> chunk => match chunk {
                    Ok(chunk) => forward(&chunk, err),
                    Err(_) => stderr_open = false,
                },
            }
        }

        drop(stdin);
        let status = child.wait().context("failed to wait for deploy process")?;
        let exit_code = exit_code_for(status);
        info!(exit_code, ?status, "deploy finished");
        Ok(SessionOutcome { status, exit_code })
    }
}

/// Map the child's status to this process's exit code.
pub fn exit_code_for(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => {
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                warn!(signal = ?status.signal(), "deploy terminated by signal");
            }
            FALLBACK_EXIT_CODE
        }
    }
}

fn forward<E: Write + ?Sized>(chunk: &[u8], err: &mut E) {
    if let Err(write_err) = err.write_all(chunk).and_then(|()| err.flush()) {
        debug!(error = %write_err, "stderr relay failed");
    }
}

fn abandon(child: &mut Child) {
    match request_termination(child) {
        Ok(()) => info!(pid = child.id(), "sent termination request to blocked deploy"),
        Err(err) => warn!(pid = child.id(), error = %err, "failed to signal blocked deploy"),
    }
}
