//! Line-by-line reader for the OBO flat file format.
//!
//! Every physical line has its comment removed (from the first `!` that is
//! not escaped), and a line ending in a backslash continues on the next one.
//! The resulting logical line is either a stanza header such as `[Term]`, a
//! `tag: value` pair, or ignored. Tags are unescaped, values are passed on
//! verbatim.
use std::io::BufRead;

use pest::Parser;
use pest_derive::Parser;

use crate::error::{OboError, Result};

#[derive(Parser)]
#[grammar = "obo.pest"]
struct OboGrammar;

/// Receives the events produced by a [`LineParser`].
pub trait LineListener {
    fn on_stanza(&mut self, name: &str, line: usize) -> Result<()>;
    fn on_tag_value(&mut self, tag: &str, value: &str, line: usize) -> Result<()>;
    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct LineParser<L> {
    listener: L,
}

impl<L: LineListener> LineParser<L> {
    pub fn new(listener: L) -> Self {
        Self { listener }
    }
    pub fn listener(&self) -> &L {
        &self.listener
    }
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Reads the whole document, then signals its end to the listener.
    pub fn parse<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines().enumerate();
        while let Some((index, raw)) = lines.next() {
            let mut logical = strip_comment(&raw?).to_owned();
            while logical.ends_with('\\') {
                let Some((_, next)) = lines.next() else {
                    break;
                };
                logical.pop();
                logical.push_str(strip_comment(&next?));
            }
            self.parse_line(&logical, index + 1)?;
        }
        self.listener.on_end()
    }

    fn parse_line(&mut self, text: &str, number: usize) -> Result<()> {
        let pairs = OboGrammar::parse(Rule::line, text).map_err(|e| at_line(e.into(), number))?;
        for pair in pairs {
            match pair.as_rule() {
                Rule::stanza => {
                    let name = pair
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::stanza_name)
                        .map(|p| p.as_str())
                        .unwrap_or_default();
                    self.listener.on_stanza(name.trim(), number)?;
                }
                Rule::tag_value => {
                    let mut tag = "";
                    let mut value = "";
                    for inner in pair.into_inner() {
                        match inner.as_rule() {
                            Rule::tag => tag = inner.as_str(),
                            Rule::value => value = inner.as_str(),
                            _ => (),
                        }
                    }
                    self.listener.on_tag_value(&unescape(tag), value, number)?;
                }
                _ => (),
            }
        }
        Ok(())
    }
}

// pest reports positions within the logical line
fn at_line(error: OboError, number: usize) -> OboError {
    match error {
        OboError::Parse { message, col, .. } => OboError::Parse {
            message,
            line: Some(number),
            col,
        },
        other => other,
    }
}

/// Cuts the line at the first `!` that is not preceded by a backslash.
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'!' && (i == 0 || bytes[i - 1] != b'\\') {
            return &line[..i];
        }
    }
    line
}

/// Resolves the OBO escape sequences. Unknown escapes are kept as written.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(resolved) = chars.peek().copied().and_then(escaped) {
                out.push(resolved);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn escaped(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'W' => Some(' '),
        't' => Some('\t'),
        '!' | ':' | ',' | '\'' | '\\' | '(' | ')' | '[' | ']' | '{' | '}' => Some(c),
        _ => None,
    }
}
