use crate::{
    ast::Regex,
    error::{Error, ErrorKind},
};

/// A builder for a pattern parser.
///
/// This builder permits modifying configuration options for the parser.
#[derive(Clone, Debug)]
pub struct ParserBuilder {
    ignore_space: bool,
    nest_limit: u32,
}

impl Default for ParserBuilder {
    fn default() -> ParserBuilder {
        ParserBuilder::new()
    }
}

impl ParserBuilder {
    /// Create a new parser builder with a default configuration.
    pub fn new() -> ParserBuilder {
        ParserBuilder { ignore_space: true, nest_limit: 250 }
    }

    /// Build a parser from this configuration.
    pub fn build(&self) -> Parser {
        Parser { ignore_space: self.ignore_space, nest_limit: self.nest_limit }
    }

    /// Drop unescaped space characters from the pattern before parsing.
    ///
    /// This is enabled by default. A literal space can always be written as
    /// `\ `. Other whitespace, such as tabs and newlines, is never dropped
    /// and always matches itself.
    pub fn ignore_space(&mut self, yes: bool) -> &mut ParserBuilder {
        self.ignore_space = yes;
        self
    }

    /// Set the nesting limit for groups.
    ///
    /// The parser recurses once per open group, so this bounds its stack
    /// use. A pattern whose groups nest deeper than the limit fails with
    /// [`ErrorKind::NestLimitExceeded`]. The default is `250`.
    pub fn nest_limit(&mut self, limit: u32) -> &mut ParserBuilder {
        self.nest_limit = limit;
        self
    }
}

/// A recursive descent parser for token patterns.
///
/// The grammar, from lowest to highest precedence:
///
/// ```text
/// expression := term ('|' term)*
/// term       := factor*           (empty means the empty string)
/// factor     := atom ('*' | '+' | '?')?
/// atom       := '(' expression ')' | '[' bound '-' bound ']' | char
/// ```
///
/// A backslash makes the next character a literal. In atom position any
/// character other than an unescaped `(`, `[`, `)` or `|` is a literal, so
/// `+` on its own matches a plus sign.
#[derive(Clone, Debug)]
pub struct Parser {
    ignore_space: bool,
    nest_limit: u32,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Create a new parser with a default configuration.
    pub fn new() -> Parser {
        ParserBuilder::new().build()
    }

    /// Parse the pattern into an abstract syntax tree.
    pub fn parse(&self, pattern: &str) -> Result<Regex, Error> {
        let items = scan(pattern, self.ignore_space)?;
        let mut parser = ParserI { config: self, pattern, items, pos: 0, depth: 0 };
        let regex = parser.parse_expression()?;
        match parser.peek() {
            None => Ok(regex),
            Some(item) => Err(parser.error(ErrorKind::GroupUnopened, item.offset)),
        }
    }
}

/// One character of a pattern after escapes have been resolved.
#[derive(Clone, Copy, Debug)]
struct Item {
    offset: usize,
    ch: char,
    escaped: bool,
}

/// Resolves escapes and drops ignorable spaces.
fn scan(pattern: &str, ignore_space: bool) -> Result<Vec<Item>, Error> {
    let mut items = Vec::with_capacity(pattern.len());
    let mut chars = pattern.char_indices();
    while let Some((offset, ch)) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some((_, ch)) => items.push(Item { offset, ch, escaped: true }),
                None => {
                    return Err(Error::new(
                        ErrorKind::EscapeUnexpectedEof,
                        pattern,
                        offset,
                    ))
                }
            }
        } else if ch == ' ' && ignore_space {
            continue;
        } else {
            items.push(Item { offset, ch, escaped: false });
        }
    }
    Ok(items)
}

struct ParserI<'p> {
    config: &'p Parser,
    pattern: &'p str,
    items: Vec<Item>,
    pos: usize,
    depth: u32,
}

impl<'p> ParserI<'p> {
    fn error(&self, kind: ErrorKind, offset: usize) -> Error {
        Error::new(kind, self.pattern, offset)
    }

    fn peek(&self) -> Option<Item> {
        self.items.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Item> {
        let item = self.peek()?;
        self.pos += 1;
        Some(item)
    }

    /// The offset of the next item, or the pattern length at the end.
    fn offset(&self) -> usize {
        self.peek().map_or(self.pattern.len(), |item| item.offset)
    }

    fn is_meta(&self, ch: char) -> bool {
        matches!(self.peek(), Some(item) if !item.escaped && item.ch == ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.is_meta(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), Error> {
        if self.eat(expected) {
            return Ok(());
        }
        let found = self.peek().map(|item| item.ch);
        Err(self.error(ErrorKind::Expected { expected, found }, self.offset()))
    }

    fn at_term_end(&self) -> bool {
        self.peek().is_none() || self.is_meta(')') || self.is_meta('|')
    }

    fn parse_expression(&mut self) -> Result<Regex, Error> {
        let mut expression = self.parse_term()?;
        while self.eat('|') {
            expression = Regex::union(expression, self.parse_term()?);
        }
        Ok(expression)
    }

    fn parse_term(&mut self) -> Result<Regex, Error> {
        if self.at_term_end() {
            return Ok(Regex::Epsilon);
        }
        let mut term = self.parse_factor()?;
        while !self.at_term_end() {
            term = Regex::concat(term, self.parse_factor()?);
        }
        Ok(term)
    }

    fn parse_factor(&mut self) -> Result<Regex, Error> {
        let atom = self.parse_atom()?;
        let factor = if self.eat('*') {
            Regex::star(atom)
        } else if self.eat('?') {
            Regex::question_mark(atom)
        } else if self.eat('+') {
            Regex::plus(atom)
        } else {
            atom
        };
        Ok(factor)
    }

    fn parse_atom(&mut self) -> Result<Regex, Error> {
        let item = match self.bump() {
            Some(item) => item,
            None => return Ok(Regex::Epsilon),
        };
        if item.escaped {
            return Ok(Regex::Character(item.ch));
        }
        match item.ch {
            '(' => self.parse_group(item),
            '[' => self.parse_range(item),
            ch => Ok(Regex::Character(ch)),
        }
    }

    fn parse_group(&mut self, open: Item) -> Result<Regex, Error> {
        if self.depth >= self.config.nest_limit {
            let limit = self.config.nest_limit;
            return Err(self.error(ErrorKind::NestLimitExceeded(limit), open.offset));
        }
        self.depth += 1;
        let expression = self.parse_expression()?;
        self.expect(')')?;
        self.depth -= 1;
        Ok(expression)
    }

    fn parse_range(&mut self, open: Item) -> Result<Regex, Error> {
        let start = self.parse_range_bound()?;
        self.expect('-')?;
        let end = self.parse_range_bound()?;
        self.expect(']')?;
        if end < start {
            let kind = ErrorKind::ClassRangeInvalid { start, end };
            return Err(self.error(kind, open.offset));
        }
        Ok(Regex::range(start, end))
    }

    fn parse_range_bound(&mut self) -> Result<char, Error> {
        if self.is_meta('-') || self.is_meta(']') {
            let found = self.peek().map(|item| item.ch);
            return Err(self.error(ErrorKind::ClassRangeBound { found }, self.offset()));
        }
        match self.bump() {
            Some(item) => Ok(item.ch),
            None => {
                let kind = ErrorKind::ClassRangeBound { found: None };
                Err(self.error(kind, self.pattern.len()))
            }
        }
    }
}
