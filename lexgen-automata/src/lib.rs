//! Finite automata for lexgen token rules.
//!
//! Patterns parsed by `lexgen-syntax` are compiled into NFAs with
//! [`thompson`], and NFAs are turned into DFAs with
//! [`NFA::subset_construction`]. Many fragments can share one NFA through
//! [`NFA::attach`], which keeps their state identifiers disjoint, so a whole
//! token table becomes a single DFA.
//!
//! ```
//! use lexgen_automata::{compile, NFA};
//!
//! let mut nfa = NFA::root();
//! nfa.attach(compile("[0-9]+")?);
//! nfa.attach(compile("[a-z]+")?);
//! let dfa = nfa.subset_construction();
//! assert!(dfa.accept("123"));
//! assert!(dfa.accept("abc"));
//! assert!(!dfa.accept("abc123"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[macro_use]
mod macros;

pub mod compiler;
pub mod dfa;
mod determinize;
pub mod matcher;
pub mod nfa;

pub use compiler::thompson;
pub use dfa::{StateSet, DFA};
pub use matcher::Matcher;
pub use nfa::{Fragment, State, StateID, Symbol, Transition, NFA};

/// The result of building an automaton.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur while building an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// Subset construction needed more DFA states than the configured limit.
    TooComplex { limit: usize },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::TooComplex { limit } => {
                write!(f, "DFA exceeds the limit of {} states", limit)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Parses `pattern` with the default syntax configuration and compiles it
/// into an NFA.
pub fn compile(pattern: &str) -> Result<NFA, lexgen_syntax::Error> {
    let regex = lexgen_syntax::parse(pattern)?;
    Ok(thompson(&regex))
}
