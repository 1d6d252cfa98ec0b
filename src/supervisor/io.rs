//! Reader threads that turn the child's pipes into channel chunks.

use crossbeam_channel::Sender;
use std::io::{ErrorKind, Read};
use std::thread;
use tracing::debug;

const READ_BUFFER_BYTES: usize = 4096;

/// Continuously read `source` and forward each chunk until EOF or the receiver hangs up.
pub(super) fn spawn_stream_reader<R>(
    mut source: R,
    tx: Sender<Vec<u8>>,
    stream: &'static str,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = [0u8; READ_BUFFER_BYTES];
        loop {
            match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buffer[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(stream, error = %err, "child stream read failed");
                    break;
                }
            }
        }
        debug!(stream, "child stream reader exiting");
    })
}
