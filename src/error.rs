use core::fmt;

use lexgen_automata::CompileError;

/// An error that occurred while building a [`Lexer`](crate::Lexer).
///
/// Either one of the token patterns failed to parse, or the combined
/// automaton grew past a configured limit.
#[derive(Clone, Debug)]
pub struct BuildError {
    kind: BuildErrorKind,
}

#[derive(Clone, Debug)]
enum BuildErrorKind {
    Syntax { index: usize, kind: String, err: lexgen_syntax::Error },
    Compile(CompileError),
}

impl BuildError {
    pub(crate) fn syntax(
        index: usize,
        kind: &str,
        err: lexgen_syntax::Error,
    ) -> BuildError {
        BuildError {
            kind: BuildErrorKind::Syntax { index, kind: kind.to_string(), err },
        }
    }

    pub(crate) fn compile(err: CompileError) -> BuildError {
        BuildError { kind: BuildErrorKind::Compile(err) }
    }

    /// If this error came from a bad pattern, returns the position of the
    /// offending rule in the token table along with its token type.
    pub fn rule(&self) -> Option<(usize, &str)> {
        match self.kind {
            BuildErrorKind::Syntax { index, ref kind, .. } => Some((index, kind)),
            BuildErrorKind::Compile(_) => None,
        }
    }

    /// If this error came from a bad pattern, returns the syntax error.
    pub fn syntax_error(&self) -> Option<&lexgen_syntax::Error> {
        match self.kind {
            BuildErrorKind::Syntax { ref err, .. } => Some(err),
            BuildErrorKind::Compile(_) => None,
        }
    }

    /// If this error came from exceeding a limit, returns it.
    pub fn compile_error(&self) -> Option<&CompileError> {
        match self.kind {
            BuildErrorKind::Syntax { .. } => None,
            BuildErrorKind::Compile(ref err) => Some(err),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            BuildErrorKind::Syntax { ref err, .. } => Some(err),
            BuildErrorKind::Compile(ref err) => Some(err),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BuildErrorKind::Syntax { index, ref kind, ref err } => write!(
                f,
                "error parsing pattern for rule {} ({}): {}",
                index, kind, err
            ),
            BuildErrorKind::Compile(ref err) => {
                write!(f, "error building lexer: {}", err)
            }
        }
    }
}

/// Where in the input tokenization got stuck.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Location {
    /// The 0-based column of the character on which scanning died, or of
    /// the scan start if the input ran out first.
    Column(usize),
    /// Scanning got stuck on the last character of the input.
    Eof,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Location::Column(column) => write!(f, "{}", column),
            Location::Eof => write!(f, "EOF"),
        }
    }
}

/// No rule matched any non-empty prefix of the remaining input.
///
/// This is an expected outcome of tokenizing arbitrary text, not a fault of
/// the lexer. It is the last item produced by a
/// [`Tokens`](crate::Tokens) iterator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexError {
    line: usize,
    location: Location,
    offset: usize,
}

impl LexError {
    pub(crate) fn new(line: usize, location: Location, offset: usize) -> LexError {
        LexError { line, location, offset }
    }

    /// The 0-based line of the reported position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of the failure, or [`Location::Eof`] if the failing scan
    /// started on the last character of the input.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The byte offset into the input of the reported column: the character
    /// on which scanning died, or the scan start.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl std::error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no viable alternative at character {}, line {}",
            self.location, self.line
        )
    }
}
