use std::error::Error as _;

use lexgen::{
    automata::CompileError,
    syntax::{ErrorKind, ParserBuilder},
    Config, Lexer,
};

#[test]
fn bad_pattern_names_its_rule() {
    let err = Lexer::new([("OK", "[a-z]+"), ("BROKEN", "[a-"), ("LATER", "(")])
        .unwrap_err();
    assert_eq!(Some((1, "BROKEN")), err.rule());
    let syntax = err.syntax_error().unwrap();
    assert_eq!(&ErrorKind::ClassRangeBound { found: None }, syntax.kind());
    assert_eq!("[a-", syntax.pattern());
    assert!(err.source().is_some());
    assert!(err.compile_error().is_none());
}

#[test]
fn unbalanced_group() {
    let err = Lexer::new([("GROUP", "(ab")]).unwrap_err();
    let kind = err.syntax_error().map(|e| e.kind().clone());
    assert_eq!(Some(ErrorKind::Expected { expected: ')', found: None }), kind);
    assert_eq!(
        "error parsing pattern for rule 0 (GROUP): syntax error in pattern \
         \"(ab\" at offset 3: expected ')' but found end of pattern",
        err.to_string(),
    );
}

#[test]
fn significant_spaces() {
    let lexer = Lexer::builder()
        .syntax(ParserBuilder::new().ignore_space(false).clone())
        .build([("PAIR", "a b")])
        .unwrap();
    assert_eq!(1, lexer.lex("a b").unwrap().len());
    assert!(lexer.lex("ab").is_err());

    let lexer = Lexer::new([("PAIR", "a b")]).unwrap();
    assert_eq!(1, lexer.lex("ab").unwrap().len());
}

#[test]
fn nest_limit_applies_to_every_rule() {
    let err = Lexer::builder()
        .syntax(ParserBuilder::new().nest_limit(3).clone())
        .build([("SHALLOW", "((a))"), ("DEEP", "((((a))))")])
        .unwrap_err();
    assert_eq!(Some((1, "DEEP")), err.rule());
    let kind = err.syntax_error().map(|e| e.kind().clone());
    assert_eq!(Some(ErrorKind::NestLimitExceeded(3)), kind);
}

#[test]
fn too_many_states() {
    // Remembering the last four characters needs 2^4 DFA states.
    let rules = [("SUFFIX", "(a|b)*a(a|b)(a|b)(a|b)")];
    let err = Lexer::builder()
        .configure(Config::new().dfa_state_limit(Some(10)))
        .build(rules)
        .unwrap_err();
    assert_eq!(Some(&CompileError::TooComplex { limit: 10 }), err.compile_error());
    assert!(err.rule().is_none());
    assert_eq!(
        "error building lexer: DFA exceeds the limit of 10 states",
        err.to_string(),
    );

    let lexer = Lexer::builder()
        .configure(Config::new().dfa_state_limit(Some(100)))
        .build(rules)
        .unwrap();
    assert!(lexer.dfa().len() <= 100);
    assert_eq!(1, lexer.lex("abab").unwrap().len());
}
