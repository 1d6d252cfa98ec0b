//! Plain-text view of child output for prompt matching.
//!
//! Output arrives in arbitrary chunks, so an escape sequence or a UTF-8 code
//! point can be cut in half. The incomplete tail is held back and prepended to
//! the next chunk instead of being mangled by the ANSI stripper.

use strip_ansi_escapes::strip;

const ESC: u8 = 0x1B;
const BEL: u8 = 0x07;
/// Escape tails longer than this are released as-is.
const MAX_PENDING_ESCAPE_BYTES: usize = 4096;

#[derive(Debug, Default)]
pub(crate) struct OutputSanitizer {
    pending: Vec<u8>,
}

impl OutputSanitizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Convert one raw chunk into matchable text with line breaks as `\n`.
    pub(crate) fn feed(&mut self, raw: &[u8]) -> String {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(raw);

        if let Some(tail) = split_incomplete_escape(&mut data) {
            self.pending = tail;
        } else if let Some(tail) = split_incomplete_utf8(&mut data) {
            self.pending = tail;
        }
        if data.is_empty() {
            return String::new();
        }

        let normalized = normalize_line_breaks(&data);
        let ansi_free = strip(normalized);
        String::from_utf8_lossy(&ansi_free).into_owned()
    }
}

fn split_incomplete_escape(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let esc_idx = buffer.iter().rposition(|b| *b == ESC)?;
    if buffer.len() - esc_idx > MAX_PENDING_ESCAPE_BYTES {
        return None;
    }
    let incomplete = match buffer.get(esc_idx + 1) {
        None => true,
        Some(b'[') => find_csi_final(buffer, esc_idx + 2).is_none(),
        Some(b']') => find_osc_terminator(buffer, esc_idx + 2).is_none(),
        Some(b'(') | Some(b')') => esc_idx + 2 >= buffer.len(),
        Some(_) => false,
    };
    incomplete.then(|| buffer.split_off(esc_idx))
}

fn find_csi_final(bytes: &[u8], start: usize) -> Option<usize> {
    bytes
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, b)| (0x40..=0x7E).contains(*b))
        .map(|(idx, _)| idx)
}

fn find_osc_terminator(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    while idx < bytes.len() {
        match bytes[idx] {
            BEL => return Some(idx),
            ESC if bytes.get(idx + 1) == Some(&b'\\') => return Some(idx + 1),
            _ => idx += 1,
        }
    }
    None
}

fn split_incomplete_utf8(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let tail_start = buffer.len().saturating_sub(3);
    for idx in (tail_start..buffer.len()).rev() {
        let byte = buffer[idx];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        if idx + width > buffer.len() {
            return Some(buffer.split_off(idx));
        }
        return None;
    }
    None
}

/// CRLF and bare CR both end a line; NUL bytes are dropped.
fn normalize_line_breaks(raw: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        match byte {
            b'\r' => {
                if iter.peek() == Some(&b'\n') {
                    iter.next();
                }
                output.push(b'\n');
            }
            0 => {}
            other => output.push(other),
        }
    }
    output
}
