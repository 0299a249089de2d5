/*!
This crate provides a parser for the pattern syntax of lexgen token rules.

The syntax is deliberately small: literal characters, backslash escapes,
`|` alternation, the postfix repetitions `*`, `+` and `?`, parenthesized
groups and the `[x-y]` character range. There are no anchors, counted
repetitions, captures or Unicode classes. An empty pattern matches the empty
string.

Parsing produces a [`Regex`], a small closed syntax tree whose nodes are
combined into automata by the `lexgen-automata` crate.

# Example

```
use lexgen_syntax::{parse, Regex};

let regex = parse("[0-1]+")?;
assert_eq!(regex, Regex::plus(Regex::union(
    Regex::Character('0'),
    Regex::Character('1'),
)));
assert_eq!(regex.to_string(), "(0|1)+");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

pub use crate::{
    ast::Regex,
    error::{Error, ErrorKind},
    parser::{Parser, ParserBuilder},
};

mod ast;
mod error;
mod parser;

/// A convenience routine for parsing a pattern using a default
/// configuration.
///
/// To configure the parser, use [`ParserBuilder`].
pub fn parse(pattern: &str) -> Result<Regex, Error> {
    ParserBuilder::new().build().parse(pattern)
}

/// Escapes all metacharacters in `text`, producing a pattern that matches
/// `text` literally.
pub fn escape(text: &str) -> String {
    let mut buf = String::with_capacity(text.len());
    escape_into(text, &mut buf);
    buf
}

/// Escapes all metacharacters in `text` and writes the result into `buf`.
pub fn escape_into(text: &str, buf: &mut String) {
    for ch in text.chars() {
        if ast::is_meta(ch) {
            buf.push('\\');
        }
        buf.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen, QuickCheck};

    use super::*;

    #[test]
    fn escape_roundtrips_literals() {
        let text = "a (b) | c*+?[x-y] \\";
        let regex = parse(&escape(text)).unwrap();
        assert_eq!(text.chars().count(), literal_len(&regex));
        assert_eq!(escape(text), regex.to_string());
    }

    fn literal_len(regex: &Regex) -> usize {
        match *regex {
            Regex::Character(_) => 1,
            Regex::Concat(ref left, ref right) => {
                literal_len(left) + literal_len(right)
            }
            _ => panic!("not a literal: {:?}", regex),
        }
    }

    #[derive(Clone, Debug)]
    struct Pattern(Regex);

    impl Arbitrary for Pattern {
        fn arbitrary(g: &mut Gen) -> Pattern {
            Pattern(arbitrary_regex(g, 4))
        }
    }

    fn arbitrary_regex(g: &mut Gen, depth: u32) -> Regex {
        let leaf = depth == 0 || u8::arbitrary(g) % 3 == 0;
        if leaf {
            return match u8::arbitrary(g) % 8 {
                0 => Regex::Epsilon,
                _ => Regex::Character(char::arbitrary(g)),
            };
        }
        let sub = |g: &mut Gen| arbitrary_regex(g, depth - 1);
        match u8::arbitrary(g) % 5 {
            0 => Regex::concat(sub(g), sub(g)),
            1 => Regex::union(sub(g), sub(g)),
            2 => Regex::star(sub(g)),
            3 => Regex::question_mark(sub(g)),
            _ => Regex::plus(sub(g)),
        }
    }

    #[test]
    fn render_is_a_parse_fixpoint() {
        fn prop(pattern: Pattern) -> bool {
            let rendered = pattern.0.to_string();
            match parse(&rendered) {
                Ok(reparsed) => reparsed.to_string() == rendered,
                Err(_) => false,
            }
        }
        QuickCheck::new()
            .tests(1_000)
            .quickcheck(prop as fn(Pattern) -> bool);
    }
}
