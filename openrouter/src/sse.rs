//! Server-Sent Events line splitting and classification.
//!
//! OpenRouter's stream format is a strict subset of SSE: every event is a
//! single `data:` line, events are separated by blank lines, and `:` comment
//! lines serve as keepalives while the upstream provider is still working.
//!
//! ```text
//! : OPENROUTER PROCESSING
//!
//! data: {"id":"gen-1","choices":[{"index":0,"delta":{"content":"Hi"}}]}
//!
//! data: [DONE]
//! ```
//!
//! This module knows nothing about chunk schemas. [`LineBuffer`] turns
//! arbitrarily split body bytes into lines and [`classify`] labels each line;
//! the stream reader decides what to do with the payloads.

use bytes::{Buf, BytesMut};
use openrouter_types::StreamError;

/// Default cap on a single line, in bytes.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

const DATA_PREFIX: &str = "data: ";
const COMMENT_PREFIX: char = ':';
const DONE_SENTINEL: &str = "[DONE]";

/// A classified SSE line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Blank line: an event separator, meaningless on its own.
    Empty,
    /// `:`-prefixed comment, used for keepalives and processing notices.
    Comment,
    /// Payload of a `data: ` line that is not the terminator.
    Data(&'a str),
    /// `data: [DONE]`: no further chunks follow.
    Terminator,
    /// Any other field (`event:`, `id:`, `retry:`...), ignored.
    Other,
}

/// Classify one line. Surrounding whitespace is trimmed first.
pub fn classify(line: &str) -> Frame<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Frame::Empty;
    }
    if line.starts_with(COMMENT_PREFIX) {
        return Frame::Comment;
    }
    match line.strip_prefix(DATA_PREFIX) {
        Some(DONE_SENTINEL) => Frame::Terminator,
        Some(payload) => Frame::Data(payload),
        None => Frame::Other,
    }
}

/// Reassembles lines from body chunks that may split a line (or a multi-byte
/// character) anywhere.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    /// Prefix of `buf` already known to contain no `\n`.
    scanned: usize,
    max_line: usize,
    finished: bool,
}

impl LineBuffer {
    /// An empty buffer refusing lines longer than `max_line` bytes.
    pub fn new(max_line: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            max_line,
            finished: false,
        }
    }

    /// Append body bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Mark the body as ended: a trailing unterminated line becomes available
    /// from [`next_line`](Self::next_line).
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Bytes held that do not yet form a complete line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Pop the next complete line, without its `\n` (a trailing `\r` is left
    /// for [`classify`] to trim). Invalid UTF-8 is replaced, not rejected.
    ///
    /// The length limit excludes the terminator, so `\n` and `\r\n` lines of
    /// the same content are treated alike.
    pub fn next_line(&mut self) -> Result<Option<String>, StreamError> {
        let newline = self.buf[self.scanned..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|offset| self.scanned + offset);

        let line = match newline {
            Some(end) => {
                if content_len(&self.buf[..end]) > self.max_line {
                    return Err(StreamError::LineTooLong {
                        limit: self.max_line,
                    });
                }
                let line = self.buf.split_to(end);
                self.buf.advance(1);
                line
            }
            None if content_len(&self.buf) > self.max_line => {
                return Err(StreamError::LineTooLong {
                    limit: self.max_line,
                });
            }
            None if self.finished && !self.buf.is_empty() => self.buf.split(),
            None => {
                self.scanned = self.buf.len();
                return Ok(None);
            }
        };

        self.scanned = 0;
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

/// Length of `line` not counting a trailing `\r`.
fn content_len(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(buf: &mut LineBuffer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = buf.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn classify_blank_and_whitespace_lines_as_empty() {
        assert_eq!(classify(""), Frame::Empty);
        assert_eq!(classify("   \t"), Frame::Empty);
        assert_eq!(classify("\r"), Frame::Empty);
    }

    #[test]
    fn classify_comments() {
        assert_eq!(classify(": OPENROUTER PROCESSING"), Frame::Comment);
        assert_eq!(classify(":"), Frame::Comment);
        assert_eq!(classify("  : indented keepalive"), Frame::Comment);
    }

    #[test]
    fn classify_data_payload() {
        assert_eq!(classify(r#"data: {"id":"x"}"#), Frame::Data(r#"{"id":"x"}"#));
        assert_eq!(classify("data: {\"id\":\"x\"}\r"), Frame::Data("{\"id\":\"x\"}"));
    }

    #[test]
    fn classify_terminator() {
        assert_eq!(classify("data: [DONE]"), Frame::Terminator);
        assert_eq!(classify("data: [DONE]  \r"), Frame::Terminator);
    }

    #[test]
    fn classify_unknown_fields_as_other() {
        assert_eq!(classify("event: message"), Frame::Other);
        assert_eq!(classify("id: 42"), Frame::Other);
        assert_eq!(classify("retry: 1000"), Frame::Other);
        // No space after the colon is not the data prefix.
        assert_eq!(classify("data:{\"id\":\"x\"}"), Frame::Other);
    }

    #[test]
    fn done_inside_a_payload_is_data() {
        assert_eq!(classify("data: [DONE] extra"), Frame::Data("[DONE] extra"));
    }

    #[test]
    fn lines_split_across_pushes_are_reassembled() {
        let mut buf = LineBuffer::new(DEFAULT_MAX_LINE_BYTES);
        buf.push(b"data: {\"id\"");
        assert_eq!(buf.next_line().unwrap(), None);
        buf.push(b":\"x\"}\n\ndata: [DO");
        assert_eq!(drain(&mut buf), vec!["data: {\"id\":\"x\"}", ""]);
        buf.push(b"NE]\n");
        assert_eq!(drain(&mut buf), vec!["data: [DONE]"]);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn multibyte_character_split_across_pushes() {
        let text = "data: héllo\n".as_bytes();
        let split = text.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let mut buf = LineBuffer::new(DEFAULT_MAX_LINE_BYTES);
        buf.push(&text[..split]);
        assert_eq!(buf.next_line().unwrap(), None);
        buf.push(&text[split..]);
        assert_eq!(drain(&mut buf), vec!["data: héllo"]);
    }

    #[test]
    fn crlf_line_endings_keep_cr_for_trimming() {
        let mut buf = LineBuffer::new(DEFAULT_MAX_LINE_BYTES);
        buf.push(b"data: [DONE]\r\n");
        let line = buf.next_line().unwrap().unwrap();
        assert_eq!(line, "data: [DONE]\r");
        assert_eq!(classify(&line), Frame::Terminator);
    }

    #[test]
    fn unterminated_tail_is_released_on_finish() {
        let mut buf = LineBuffer::new(DEFAULT_MAX_LINE_BYTES);
        buf.push(b"data: {}\ndata: tail");
        assert_eq!(drain(&mut buf), vec!["data: {}"]);
        buf.finish();
        assert_eq!(drain(&mut buf), vec!["data: tail"]);
        assert_eq!(buf.next_line().unwrap(), None);
    }

    #[test]
    fn overlong_line_is_an_error() {
        let mut buf = LineBuffer::new(8);
        buf.push(b"data: 0123456789");
        assert!(matches!(
            buf.next_line(),
            Err(StreamError::LineTooLong { limit: 8 })
        ));

        let mut buf = LineBuffer::new(8);
        buf.push(b"data: 0123456789\n");
        assert!(matches!(
            buf.next_line(),
            Err(StreamError::LineTooLong { limit: 8 })
        ));
    }

    #[test]
    fn line_at_exact_limit_is_accepted() {
        let mut buf = LineBuffer::new(4);
        buf.push(b"abcd\n");
        assert_eq!(drain(&mut buf), vec!["abcd"]);
    }

    #[test]
    fn crlf_terminator_does_not_count_toward_limit() {
        let mut buf = LineBuffer::new(4);
        buf.push(b"abcd\r");
        assert_eq!(buf.next_line().unwrap(), None);
        buf.push(b"\n");
        assert_eq!(drain(&mut buf), vec!["abcd\r"]);

        let mut buf = LineBuffer::new(4);
        buf.push(b"abcde\r\n");
        assert!(matches!(
            buf.next_line(),
            Err(StreamError::LineTooLong { limit: 4 })
        ));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut buf = LineBuffer::new(DEFAULT_MAX_LINE_BYTES);
        buf.push(b"data: \xFF\n");
        assert_eq!(drain(&mut buf), vec!["data: \u{FFFD}"]);
    }
}
