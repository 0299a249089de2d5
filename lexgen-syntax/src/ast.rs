use core::fmt;

/// A parsed token pattern.
///
/// The node set is closed: every pattern the parser accepts is built from
/// these seven variants. Each node owns its children. The tree can be very
/// deep (a long literal is a left-leaning chain of `Concat` nodes and a wide
/// character range is a chain of `Union` nodes), so dropping it is done with
/// an explicit stack instead of recursion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Regex {
    /// Matches the empty string.
    Epsilon,
    /// Matches exactly one character.
    Character(char),
    /// Matches the left pattern followed by the right one.
    Concat(Box<Regex>, Box<Regex>),
    /// Matches either pattern.
    Union(Box<Regex>, Box<Regex>),
    /// Matches zero or more repetitions.
    Star(Box<Regex>),
    /// Matches zero or one repetition.
    QuestionMark(Box<Regex>),
    /// Matches one or more repetitions.
    Plus(Box<Regex>),
}

impl Regex {
    pub fn concat(left: Regex, right: Regex) -> Regex {
        Regex::Concat(Box::new(left), Box::new(right))
    }

    pub fn union(left: Regex, right: Regex) -> Regex {
        Regex::Union(Box::new(left), Box::new(right))
    }

    pub fn star(sub: Regex) -> Regex {
        Regex::Star(Box::new(sub))
    }

    pub fn question_mark(sub: Regex) -> Regex {
        Regex::QuestionMark(Box::new(sub))
    }

    pub fn plus(sub: Regex) -> Regex {
        Regex::Plus(Box::new(sub))
    }

    /// Builds the union of every character from `start` to `end`, inclusive,
    /// as a left-associated chain: `((start|start+1)|start+2)|...`.
    ///
    /// If `end < start`, the result only matches `start`. Surrogate code
    /// points are skipped since they are not `char`s.
    pub fn range(start: char, end: char) -> Regex {
        let mut chars = (start..=end).skip(1);
        let mut regex = Regex::Character(start);
        for ch in &mut chars {
            regex = Regex::union(regex, Regex::Character(ch));
        }
        regex
    }

    /// Returns the binding strength of this node: 0 for atoms, 1 for the
    /// postfix repetitions, 2 for concatenation and 3 for union. It is only
    /// used when rendering a pattern back to text.
    pub fn precedence(&self) -> u8 {
        match *self {
            Regex::Epsilon | Regex::Character(_) => 0,
            Regex::Star(_) | Regex::QuestionMark(_) | Regex::Plus(_) => 1,
            Regex::Concat(..) => 2,
            Regex::Union(..) => 3,
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(*self, Regex::Epsilon | Regex::Character(_))
    }

    /// Writes this node as an operand. The tree is walked with an explicit
    /// stack of pending output, so deep patterns render without recursion.
    fn write_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match *node {
                // An empty group, so the epsilon survives under a repetition
                // or next to a '|'.
                Regex::Epsilon => f.write_str("()")?,
                Regex::Character(ch) => write_literal(f, ch)?,
                Regex::Concat(ref left, ref right) => {
                    push_operand(&mut stack, right, right.precedence() > 2);
                    push_operand(&mut stack, left, left.precedence() > 2);
                }
                Regex::Union(ref left, ref right) => {
                    stack.push(Piece::Node(right));
                    stack.push(Piece::Text("|"));
                    stack.push(Piece::Node(left));
                }
                Regex::Star(ref sub) => {
                    stack.push(Piece::Text("*"));
                    push_operand(&mut stack, sub, sub.precedence() > 0);
                }
                Regex::QuestionMark(ref sub) => {
                    stack.push(Piece::Text("?"));
                    push_operand(&mut stack, sub, sub.precedence() > 0);
                }
                Regex::Plus(ref sub) => {
                    stack.push(Piece::Text("+"));
                    push_operand(&mut stack, sub, sub.precedence() > 0);
                }
            }
        }
        Ok(())
    }
}

/// Output still to be written while rendering, in stack order.
enum Piece<'r> {
    Node(&'r Regex),
    Text(&'static str),
}

/// Renders the pattern back to text that parses to an equivalent pattern.
///
/// Parentheses are only emitted where precedence requires them, so the text
/// is not necessarily the one that was parsed. A bare `Epsilon` renders as
/// the empty string.
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Regex::Epsilon => Ok(()),
            _ => self.write_nested(f),
        }
    }
}

impl Drop for Regex {
    fn drop(&mut self) {
        use core::mem;

        match *self {
            Regex::Epsilon | Regex::Character(_) => return,
            Regex::Concat(ref left, ref right)
            | Regex::Union(ref left, ref right)
                if left.is_leaf() && right.is_leaf() =>
            {
                return
            }
            Regex::Star(ref sub)
            | Regex::QuestionMark(ref sub)
            | Regex::Plus(ref sub)
                if sub.is_leaf() =>
            {
                return
            }
            _ => {}
        }

        let empty = || Box::new(Regex::Epsilon);
        let mut stack = vec![mem::replace(self, Regex::Epsilon)];
        while let Some(mut node) = stack.pop() {
            match node {
                Regex::Concat(ref mut left, ref mut right)
                | Regex::Union(ref mut left, ref mut right) => {
                    stack.push(*mem::replace(left, empty()));
                    stack.push(*mem::replace(right, empty()));
                }
                Regex::Star(ref mut sub)
                | Regex::QuestionMark(ref mut sub)
                | Regex::Plus(ref mut sub) => {
                    stack.push(*mem::replace(sub, empty()));
                }
                Regex::Epsilon | Regex::Character(_) => {}
            }
        }
    }
}

/// Characters that must be escaped to be read back as literals.
pub(crate) fn is_meta(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')' | '|' | '*' | '+' | '?' | '[' | ']' | '-' | '\\' | ' '
    )
}

fn write_literal(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    if is_meta(ch) {
        write!(f, "\\{}", ch)
    } else {
        write!(f, "{}", ch)
    }
}

/// Schedules `operand`, wrapped in parentheses when asked. Pieces are
/// pushed in reverse so they pop in writing order.
fn push_operand<'r>(
    stack: &mut Vec<Piece<'r>>,
    operand: &'r Regex,
    parenthesize: bool,
) {
    if parenthesize {
        stack.push(Piece::Text(")"));
        stack.push(Piece::Node(operand));
        stack.push(Piece::Text("("));
    } else {
        stack.push(Piece::Node(operand));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(ch: char) -> Regex {
        Regex::Character(ch)
    }

    #[test]
    fn precedence_levels() {
        assert_eq!(0, Regex::Epsilon.precedence());
        assert_eq!(0, c('a').precedence());
        assert_eq!(1, Regex::star(c('a')).precedence());
        assert_eq!(1, Regex::question_mark(c('a')).precedence());
        assert_eq!(1, Regex::plus(c('a')).precedence());
        assert_eq!(2, Regex::concat(c('a'), c('b')).precedence());
        assert_eq!(3, Regex::union(c('a'), c('b')).precedence());
    }

    #[test]
    fn range_is_left_associated() {
        let expected = Regex::union(Regex::union(c('a'), c('b')), c('c'));
        assert_eq!(expected, Regex::range('a', 'c'));
        assert_eq!(c('x'), Regex::range('x', 'x'));
        assert_eq!(c('z'), Regex::range('z', 'a'));
    }

    #[test]
    fn render_minimal_parentheses() {
        let ab_or_c = Regex::union(Regex::concat(c('a'), c('b')), c('c'));
        assert_eq!("ab|c", ab_or_c.to_string());

        let a_then_b_or_c =
            Regex::concat(c('a'), Regex::union(c('b'), c('c')));
        assert_eq!("a(b|c)", a_then_b_or_c.to_string());

        let star_of_concat = Regex::star(Regex::concat(c('a'), c('b')));
        assert_eq!("(ab)*", star_of_concat.to_string());

        let plus_of_star = Regex::plus(Regex::star(c('a')));
        assert_eq!("(a*)+", plus_of_star.to_string());

        let concat_of_star = Regex::concat(Regex::star(c('a')), c('b'));
        assert_eq!("a*b", concat_of_star.to_string());
    }

    #[test]
    fn render_epsilon() {
        assert_eq!("", Regex::Epsilon.to_string());
        assert_eq!("()*", Regex::star(Regex::Epsilon).to_string());
        assert_eq!("a|()", Regex::union(c('a'), Regex::Epsilon).to_string());
    }

    #[test]
    fn render_escapes_metacharacters() {
        let pattern = Regex::concat(
            Regex::concat(c('('), c(' ')),
            Regex::concat(c('\\'), c('+')),
        );
        assert_eq!(r"\(\ \\\+", pattern.to_string());
        assert_eq!("\t", c('\t').to_string());
    }

    #[test]
    fn drop_deep_chain() {
        let mut regex = c('a');
        for _ in 0..200_000 {
            regex = Regex::concat(regex, c('a'));
        }
        drop(regex);

        let wide = Regex::range('\u{0}', '\u{FFFF}');
        drop(wide);
    }

    #[test]
    fn render_deep_chain() {
        let mut regex = c('a');
        for _ in 0..200_000 {
            regex = Regex::concat(regex, Regex::star(c('b')));
        }
        let rendered = regex.to_string();
        assert_eq!(1 + 200_000 * 2, rendered.len());
        assert!(rendered.starts_with("ab*b*"));

        let mut nested = c('a');
        for _ in 0..100_000 {
            nested = Regex::star(Regex::concat(c('x'), nested));
        }
        let rendered = nested.to_string();
        assert!(rendered.starts_with("(x(x("));
        assert!(rendered.ends_with("a)*)*"));
    }
}
