//! Command line parsing and dispatch for an unlocked session.

pub mod dispatch;

pub use dispatch::{Outcome, dispatch};

/// One parsed shell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    End,
    Page,
    List,
    Create(&'a str),
    Read(&'a str),
    Write { filename: &'a str, payload: &'a str },
    Lock,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Split `line` into a command token and its argument.
    ///
    /// Tokens match case-sensitively. Arguments of commands that take none
    /// are ignored.
    pub fn parse(line: &'a str) -> Self {
        let (token, arg) = split_first_word(line);
        match token {
            "END" => Command::End,
            "PAGE" => Command::Page,
            "LIST" => Command::List,
            "CREATE" => Command::Create(arg),
            "READ" => Command::Read(arg),
            "WRITE" => {
                let (filename, payload) = split_first_word(arg);
                Command::Write { filename, payload }
            }
            "LOCK" => Command::Lock,
            other => Command::Unknown(other),
        }
    }
}

/// Split at the first run of ASCII whitespace.
///
/// The head is everything before the run, the tail everything after it,
/// kept verbatim. Without whitespace the tail is empty.
pub fn split_first_word(s: &str) -> (&str, &str) {
    match s.find(|c: char| c.is_ascii_whitespace()) {
        Some(at) => {
            let (head, rest) = s.split_at(at);
            (head, rest.trim_start_matches(|c: char| c.is_ascii_whitespace()))
        }
        None => (s, ""),
    }
}

/// Drop the line terminator the input collaborator may have left in place.
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
