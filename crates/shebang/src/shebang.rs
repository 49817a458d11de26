//! Shebang line parsing
//!
//! Only the first line of a file is ever inspected. A line that is not
//! printable ASCII, or that shell word splitting rejects, is treated the
//! same as a missing shebang: the caller gets an empty [`Command`].

use crate::{Command, Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, trace};

const MARKER: &[u8; 2] = b"#!";
const ENV: &str = "/usr/bin/env";

/// Parse the shebang from a binary stream positioned at the start of a file.
///
/// Returns an empty command when the stream does not begin with `#!` or
/// when the first line is not usable. Only read errors are reported.
pub fn parse_reader(reader: impl Read) -> io::Result<Command> {
    let mut reader = BufReader::new(reader);

    let mut marker = [0u8; 2];
    match reader.read_exact(&mut marker) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(Command::default()),
        Err(e) => return Err(e),
    }
    if &marker != MARKER {
        return Ok(Command::default());
    }

    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(parse_line(&line))
}

/// Parse the shebang from an in-memory buffer
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> Command {
    match bytes.strip_prefix(MARKER) {
        Some(rest) => {
            let end = rest
                .iter()
                .position(|&b| b == b'\n')
                .map_or(rest.len(), |i| i + 1);
            parse_line(&rest[..end])
        }
        None => Command::default(),
    }
}

/// Parse the shebang of the file at `path`.
///
/// Missing files and files the current user cannot execute have no usable
/// shebang and yield an empty command rather than an error.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Command> {
    let path = path.as_ref();
    if !is_executable(path) {
        debug!(path = %path.display(), "not an executable file, skipping shebang");
        return Ok(Command::default());
    }

    let file = File::open(path).map_err(|e| Error::io(e, Some(path.to_path_buf()), "open"))?;
    parse_reader(file).map_err(|e| Error::io(e, Some(path.to_path_buf()), "read shebang"))
}

/// Tokenize the remainder of a shebang line (everything after `#!`)
fn parse_line(line: &[u8]) -> Command {
    if !line.iter().copied().all(is_printable) {
        debug!("shebang contains non-printable bytes, ignoring");
        return Command::default();
    }
    let Ok(text) = std::str::from_utf8(line) else {
        return Command::default();
    };

    // shlex only splits on space, tab and newline
    let text = text.replace('\r', " ");
    let Some(mut tokens) = shlex::split(&escape_comments(&text)) else {
        debug!(line = %text.trim_end(), "shebang is not valid shell syntax, ignoring");
        return Command::default();
    };

    if tokens.first().is_some_and(|t| t == ENV) {
        tokens.remove(0);
    }
    trace!(?tokens, "parsed shebang");
    Command::from(tokens)
}

/// Escape every unquoted `#` so shlex keeps it as a word character.
///
/// The kernel passes `#` through to the interpreter; shlex would otherwise
/// drop the rest of the line as a comment.
fn escape_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote = None;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            escaped = false;
        } else {
            match (quote, c) {
                (Some('\''), '\'') | (Some('"'), '"') => quote = None,
                (Some('\''), _) => {}
                (_, '\\') => escaped = true,
                (None, '\'' | '"') => quote = Some(c),
                (None, '#') => out.push('\\'),
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

/// Printable ASCII, including the whitespace control characters
fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7e | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    // access(2) only reads the path and does not retain the pointer.
    #[expect(unsafe_code, reason = "Required for the access(2) permission check")]
    let rc = unsafe { libc::access(c_path.as_ptr(), libc::X_OK) };
    rc == 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(bytes: &[u8]) -> Vec<String> {
        parse_reader(Cursor::new(bytes)).unwrap().into_vec()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse(b"").is_empty());
    }

    #[test]
    fn test_single_byte_input() {
        assert!(parse(b"#").is_empty());
    }

    #[test]
    fn test_no_marker() {
        assert!(parse(b"echo hi\n").is_empty());
        assert!(parse(b"# comment\n").is_empty());
    }

    #[test]
    fn test_absolute_interpreter() {
        assert_eq!(parse(b"#!/usr/bin/python"), ["/usr/bin/python"]);
    }

    #[test]
    fn test_env_is_stripped() {
        assert_eq!(parse(b"#!/usr/bin/env python"), ["python"]);
    }

    #[test]
    fn test_env_only_stripped_when_first() {
        assert_eq!(
            parse(b"#!/usr/bin/foo /usr/bin/env"),
            ["/usr/bin/foo", "/usr/bin/env"]
        );
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(parse(b"#! /usr/bin/python"), ["/usr/bin/python"]);
    }

    #[test]
    fn test_multiple_tokens() {
        assert_eq!(parse(b"#!/usr/bin/foo  python"), ["/usr/bin/foo", "python"]);
    }

    #[test]
    fn test_only_first_line() {
        assert_eq!(
            parse(b"#!/bin/sh -e\nexec /usr/bin/other\n"),
            ["/bin/sh", "-e"]
        );
    }

    #[test]
    fn test_crlf_line_ending() {
        assert_eq!(parse(b"#!/usr/bin/env bash\r\necho hi\r\n"), ["bash"]);
    }

    #[test]
    fn test_quoted_argument() {
        assert_eq!(
            parse(b"#!/usr/bin/foo 'two words'\n"),
            ["/usr/bin/foo", "two words"]
        );
    }

    #[test]
    fn test_hash_is_not_a_comment() {
        assert_eq!(
            parse(b"#!/usr/bin/foo #bar baz\n"),
            ["/usr/bin/foo", "#bar", "baz"]
        );
        assert_eq!(parse(b"#!/usr/bin/foo a#b"), ["/usr/bin/foo", "a#b"]);
    }

    #[test]
    fn test_hash_inside_quotes_untouched() {
        assert_eq!(
            parse(b"#!/usr/bin/foo '#one' \"#two\" \\#three"),
            ["/usr/bin/foo", "#one", "#two", "#three"]
        );
    }

    #[test]
    fn test_unbalanced_quote() {
        assert!(parse(b"#!/usr/bin/foo 'oops\n").is_empty());
    }

    #[test]
    fn test_marker_only() {
        assert!(parse(b"#!").is_empty());
        assert!(parse(b"#!\n").is_empty());
    }

    #[test]
    fn test_binary_garbage() {
        assert!(parse(b"\xf9\x93\x01\x42\xcd").is_empty());
        assert!(parse(b"#!\xf9\x93\x01\x42\xcd").is_empty());
        assert!(parse(b"#!\x00\x00\x00\x00").is_empty());
    }

    #[test]
    fn test_garbage_after_first_line_ignored() {
        assert_eq!(parse(b"#!/bin/sh\n\xff\xfe\x00"), ["/bin/sh"]);
    }

    #[test]
    fn test_parse_bytes_matches_reader() {
        for input in [
            &b"#!/usr/bin/env python\nprint()"[..],
            b"#!/usr/bin/foo  python",
            b"#!\xf9\x93",
            b"plain",
            b"",
        ] {
            assert_eq!(parse_bytes(input).into_vec(), parse(input));
        }
    }

    #[test]
    fn test_printable_set() {
        assert!(is_printable(b' '));
        assert!(is_printable(b'~'));
        assert!(is_printable(0x0b));
        assert!(!is_printable(0x00));
        assert!(!is_printable(0x7f));
        assert!(!is_printable(0x80));
    }

    #[test]
    fn test_parse_file_missing() {
        let cmd = parse_file("herp derp derp").unwrap();
        assert!(cmd.is_empty());
    }
}
