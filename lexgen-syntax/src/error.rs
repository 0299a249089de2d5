use core::fmt;

/// An error that occurred while parsing a token pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    offset: usize,
}

/// The kind of a syntax error.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A delimiter was required but something else was found. `found` is
    /// `None` when the pattern ended first.
    Expected { expected: char, found: Option<char> },
    /// A bracket range was missing one of its bounds.
    ClassRangeBound { found: Option<char> },
    /// A bracket range whose end comes before its start, e.g. `[z-a]`.
    ClassRangeInvalid { start: char, end: char },
    /// The pattern ended with an unescaped backslash.
    EscapeUnexpectedEof,
    /// A `)` with no matching `(`.
    GroupUnopened,
    /// Groups were nested deeper than the configured limit.
    NestLimitExceeded(u32),
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, pattern: &str, offset: usize) -> Error {
        Error { kind, pattern: pattern.to_string(), offset }
    }

    /// Return the type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The original pattern string in which this error occurred.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The byte offset into the pattern at which the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "syntax error in pattern {:?} at offset {}: {}",
            self.pattern, self.offset, self.kind
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::Expected { expected, found } => {
                write!(f, "expected {:?} but found {}", expected, Found(found))
            }
            ErrorKind::ClassRangeBound { found } => {
                write!(f, "expected a range bound but found {}", Found(found))
            }
            ErrorKind::ClassRangeInvalid { start, end } => write!(
                f,
                "invalid range: {:?} is greater than {:?}",
                start, end
            ),
            ErrorKind::EscapeUnexpectedEof => {
                write!(f, "incomplete escape sequence at end of pattern")
            }
            ErrorKind::GroupUnopened => {
                write!(f, "unopened group: found ')' without '('")
            }
            ErrorKind::NestLimitExceeded(limit) => {
                write!(f, "exceed the maximum number of nested groups ({})", limit)
            }
        }
    }
}

struct Found(Option<char>);

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "end of pattern"),
            Some(ch) => write!(f, "{:?}", ch),
        }
    }
}
