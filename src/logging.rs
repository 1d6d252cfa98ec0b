//! Opt-in JSON trace file for debugging prompt handling.
//!
//! The terminal streams carry the deploy's output untouched, so trace events
//! only ever go to a file, and only when `--logs` is active.

use crate::config::DeployCli;
use crate::prompt::PROMPT_REGISTRY;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::OnceLock;
use tracing::{info, Level, Subscriber};
use tracing_subscriber::fmt::time::UtcTime;

pub const TRACE_LOG_ENV: &str = "FIREBASE_DEPLOY_TRACE_LOG";
const DEFAULT_TRACE_FILE: &str = "firebase_deploy_trace.jsonl";

static TRACE_INSTALLED: OnceLock<bool> = OnceLock::new();

/// Whether to trace and where the trace file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSettings {
    pub enabled: bool,
    pub path: PathBuf,
}

impl TraceSettings {
    /// `--logs`/`--no-logs` decide `enabled`; the path comes from
    /// `FIREBASE_DEPLOY_TRACE_LOG`, else the temp dir.
    pub fn from_cli(cli: &DeployCli) -> Self {
        let path = env::var_os(TRACE_LOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_TRACE_FILE));
        Self {
            enabled: cli.logging_enabled(),
            path,
        }
    }
}

fn open_trace_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn json_subscriber(file: File) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(file)
        .with_max_level(Level::DEBUG)
        .with_current_span(false)
        .with_span_list(false)
        .finish()
}

/// First line of every trace: enough to tell runs apart in an appended file.
fn record_startup(firebase_cmd: &str) {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        firebase_cmd,
        prompts = PROMPT_REGISTRY.len(),
        "trace started"
    );
}

fn install_once(settings: &TraceSettings, firebase_cmd: &str, installed: &OnceLock<bool>) -> bool {
    if !settings.enabled {
        return false;
    }
    *installed.get_or_init(|| {
        // Nowhere to report a broken trace path without touching the relayed streams.
        let Ok(file) = open_trace_file(&settings.path) else {
            return false;
        };
        if tracing::subscriber::set_global_default(json_subscriber(file)).is_err() {
            return false;
        }
        record_startup(firebase_cmd);
        true
    })
}

/// Install the trace subscriber when enabled. Returns whether tracing is active.
///
/// Only the first call does any work.
pub fn init_logging(settings: &TraceSettings, firebase_cmd: &str) -> bool {
    install_once(settings, firebase_cmd, &TRACE_INSTALLED)
}
