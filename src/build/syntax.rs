//! Best-effort syntax pre-check for script sources.
//!
//! This is a delimiter scanner, not a parser: it catches unterminated short
//! strings, unterminated long brackets and unbalanced `()[]{}`, reporting the
//! first problem found. Callers downgrade findings to diagnostics — a finding
//! never blocks compilation.

/// The first problem the scanner found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line the problem starts on.
    pub line: usize,
    pub message: String,
}

impl SyntaxIssue {
    fn new(line: usize, message: impl Into<String>) -> Self {
        SyntaxIssue {
            line,
            message: message.into(),
        }
    }
}

/// Scan `source` for delimiter problems.
pub fn check(source: &str) -> Result<(), SyntaxIssue> {
    let bytes = source.as_bytes();
    let mut stack: Vec<(u8, usize)> = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                if let Some((level, body)) = long_bracket_open(bytes, i + 2) {
                    let opened_at = line;
                    match skip_long_bracket(bytes, body, level, &mut line) {
                        Some(next) => i = next,
                        None => return Err(SyntaxIssue::new(opened_at, "unterminated long comment")),
                    }
                } else {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
            }
            b'[' => {
                if let Some((level, body)) = long_bracket_open(bytes, i) {
                    let opened_at = line;
                    match skip_long_bracket(bytes, body, level, &mut line) {
                        Some(next) => i = next,
                        None => return Err(SyntaxIssue::new(opened_at, "unterminated long string")),
                    }
                } else {
                    stack.push((b'[', line));
                    i += 1;
                }
            }
            quote @ (b'"' | b'\'') => {
                let opened_at = line;
                i += 1;
                loop {
                    match bytes.get(i).copied() {
                        None | Some(b'\n') => {
                            return Err(SyntaxIssue::new(opened_at, "unterminated string"));
                        }
                        Some(b'\\') => i += 2,
                        Some(c) if c == quote => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            open @ (b'(' | b'{') => {
                stack.push((open, line));
                i += 1;
            }
            close @ (b')' | b'}' | b']') => {
                let expected = match close {
                    b')' => b'(',
                    b'}' => b'{',
                    _ => b'[',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => return Err(SyntaxIssue::new(line, format!("unbalanced `{}`", close as char))),
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    if let Some((open, opened_at)) = stack.pop() {
        return Err(SyntaxIssue::new(opened_at, format!("unclosed `{}`", open as char)));
    }
    Ok(())
}

/// A long-bracket opener at `at`: `[`, any number of `=`, `[`. Returns the
/// level and the index just past the opener.
fn long_bracket_open(bytes: &[u8], at: usize) -> Option<(usize, usize)> {
    if bytes.get(at) != Some(&b'[') {
        return None;
    }
    let mut level = 0;
    let mut j = at + 1;
    while bytes.get(j) == Some(&b'=') {
        level += 1;
        j += 1;
    }
    if bytes.get(j) == Some(&b'[') {
        Some((level, j + 1))
    } else {
        None
    }
}

/// Advance past the matching `]==]` of the given level, counting lines.
fn skip_long_bracket(bytes: &[u8], start: usize, level: usize, line: &mut usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                *line += 1;
                i += 1;
            }
            b']' => {
                let mut j = i + 1;
                let mut eq = 0;
                while bytes.get(j) == Some(&b'=') {
                    eq += 1;
                    j += 1;
                }
                if eq == level && bytes.get(j) == Some(&b']') {
                    return Some(j + 1);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}
