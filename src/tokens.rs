use core::{iter::FusedIterator, ops::Range};

use crate::{
    error::{LexError, Location},
    lexer::Lexer,
};

/// A 0-based line and column in the input.
///
/// Columns count characters, not bytes, since the start of the line.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Position {
    /// The number of newlines before this position.
    pub line: usize,
    /// The number of characters since the last newline.
    pub column: usize,
}

/// A single token: the type of the rule that matched and the matched text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Token<'a> {
    kind: &'a str,
    lexeme: &'a str,
    start: usize,
    position: Position,
}

impl<'a> Token<'a> {
    /// The token type of the rule that produced this token.
    pub fn kind(&self) -> &'a str {
        self.kind
    }

    /// The matched text.
    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    /// The byte offset of the start of the lexeme in the input.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The byte offset just past the end of the lexeme in the input.
    pub fn end(&self) -> usize {
        self.start + self.lexeme.len()
    }

    /// The byte range of the lexeme in the input.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Where the lexeme starts.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The `(token type, lexeme)` pair.
    pub fn as_pair(&self) -> (&'a str, &'a str) {
        (self.kind, self.lexeme)
    }
}

/// An iterator over the tokens of an input.
///
/// Each item is either the next token or the error that stopped
/// tokenization. After an error, the iterator is exhausted.
///
/// This iterator is created by [`Lexer::tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    lexer: &'a Lexer,
    input: &'a str,
    at: usize,
    position: Position,
    done: bool,
}

/// The outcome of scanning from one position.
enum Scan {
    /// The longest non-empty prefix accepted by any rule, and the rule.
    Match { len: usize, rule: usize },
    /// No rule matched a non-empty prefix. `dead_at` is the offset, relative
    /// to the scan start, of the character the DFA died on, or `None` if the
    /// input ran out first.
    NoMatch { dead_at: Option<usize> },
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(lexer: &'a Lexer, input: &'a str) -> Tokens<'a> {
        Tokens { lexer, input, at: 0, position: Position::default(), done: false }
    }

    /// The part of the input not yet tokenized.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.at..]
    }

    /// Where the next token would start.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Runs the DFA over the remaining input until it dies or the input
    /// ends, remembering the last state that resolved to a rule.
    fn longest_match(&self) -> Scan {
        let dfa = self.lexer.dfa();
        let mut state = dfa.start();
        let mut best = None;
        let mut dead_at = None;
        for (at, ch) in self.remaining().char_indices() {
            state = match dfa.next_state(state, ch) {
                Some(next) if !dfa.is_sink(next) => next,
                _ => {
                    dead_at = Some(at);
                    break;
                }
            };
            if let Some(rule) = self.lexer.matched_rule(state) {
                best = Some((at + ch.len_utf8(), rule));
            }
        }
        match best {
            Some((len, rule)) => Scan::Match { len, rule },
            None => Scan::NoMatch { dead_at },
        }
    }

    /// Builds the error for a scan that matched nothing.
    ///
    /// The end of input is reported when the scan started on the final
    /// character and that character appears in some rule. Otherwise the
    /// error points at the character the DFA died on, or at the scan start
    /// if the input ran out first.
    fn failure(&self, dead_at: Option<usize>) -> LexError {
        let rest = self.remaining();
        let mut chars = rest.chars();
        if let (Some(last), None) = (chars.next(), chars.next()) {
            if self.lexer.dfa().alphabet().contains(&last) {
                return LexError::new(self.position.line, Location::Eof, self.at);
            }
        }
        let at = dead_at.unwrap_or(0);
        let position = step(self.position, &rest[..at]);
        LexError::new(position.line, Location::Column(position.column), self.at + at)
    }
}

/// Returns the position just past `text` when it starts at `position`.
fn step(mut position: Position, text: &str) -> Position {
    let bytes = text.as_bytes();
    match memchr::memrchr(b'\n', bytes) {
        None => position.column += text.chars().count(),
        Some(last) => {
            position.line += memchr::memchr_iter(b'\n', bytes).count();
            position.column = text[last + 1..].chars().count();
        }
    }
    position
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Result<Token<'a>, LexError>> {
        if self.done || self.at >= self.input.len() {
            return None;
        }
        match self.longest_match() {
            Scan::Match { len, rule } => {
                let lexeme = &self.remaining()[..len];
                let token = Token {
                    kind: self.lexer.kind(rule),
                    lexeme,
                    start: self.at,
                    position: self.position,
                };
                trace!(
                    "token {} {:?} at {}:{}",
                    token.kind,
                    lexeme,
                    token.position.line,
                    token.position.column,
                );
                self.position = step(self.position, lexeme);
                self.at += len;
                Some(Ok(token))
            }
            Scan::NoMatch { dead_at } => {
                self.done = true;
                let err = self.failure(dead_at);
                trace!(
                    "no rule matches at {}:{}: {}",
                    self.position.line,
                    self.position.column,
                    err,
                );
                Some(Err(err))
            }
        }
    }
}

impl<'a> FusedIterator for Tokens<'a> {}
