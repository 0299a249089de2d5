/*!
This crate turns a table of token rules into a tokenizer.

A token rule pairs a token type with a pattern. Patterns use a small regular
expression syntax: literal characters, concatenation, alternation with `|`,
grouping with `()`, the postfix operators `*`, `+` and `?`, and character
ranges such as `[a-z]`. A backslash makes the next character literal.
Unescaped spaces are ignored, so a literal space is written `\ `.

All rules are compiled into one deterministic automaton. Tokenizing then
repeatedly takes the longest prefix of the remaining input that any rule
matches. When several rules match that same prefix, the rule listed first
wins.

# Example

```
use lexgen::Lexer;

let lexer = Lexer::new([
    ("LAMBDA", "lambda"),
    ("LITERAL", "([a-z]|[A-Z])+"),
    ("SPACE", "\\ +"),
    ("SUM", "+"),
    ("CONCAT", "++"),
])?;

let tokens: Vec<(&str, &str)> = lexer
    .lex("lambda lambdas ++ +")?
    .iter()
    .map(|token| token.as_pair())
    .collect();
assert_eq!(tokens, vec![
    ("LAMBDA", "lambda"),
    ("SPACE", " "),
    ("LITERAL", "lambdas"),
    ("SPACE", " "),
    ("CONCAT", "++"),
    ("SPACE", " "),
    ("SUM", "+"),
]);
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Errors

Building a lexer fails with a [`BuildError`] when a pattern is malformed.
Tokenizing fails with a [`LexError`] when no rule matches a non-empty prefix
of the remaining input. The error reports the line and column of the
character on which the automaton died, the start of the scan if the input ran
out first, or `EOF` when the scan got stuck on the final character of the
input and that character belongs to some rule:

```
use lexgen::{Lexer, Location};

let lexer = Lexer::new([("ABC", "abc"), ("NL", "\n")])?;
let err = lexer.lex("abc\na").unwrap_err();
assert_eq!(err.line(), 1);
assert_eq!(err.location(), Location::Eof);
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - Emits `debug` messages with automaton sizes when a lexer is
  built, and a `trace` message for every token. Pair this with a logger
  such as `env_logger` to see them.
*/

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use lexgen_automata as automata;
pub use lexgen_syntax as syntax;

pub use crate::{
    error::{BuildError, LexError, Location},
    lexer::{Builder, Config, Lexer},
    tokens::{Position, Token, Tokens},
};

#[macro_use]
mod macros;

mod error;
mod lexer;
mod tokens;
