use std::collections::BTreeMap;

use lexgen_automata::{thompson, StateID, DFA, NFA};
use lexgen_syntax::ParserBuilder;

use crate::{
    error::{BuildError, LexError},
    tokens::{Token, Tokens},
};

/// The configuration used for building a [`Lexer`].
///
/// A default configuration can be created with [`Config::new`]. Options that
/// are never set keep their defaults. Configurations are applied with
/// [`Builder::configure`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    dfa_state_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default lexer configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the number of states in the combined DFA.
    ///
    /// Subset construction can, in the worst case, produce a number of
    /// states exponential in the size of the token patterns. When a limit is
    /// set and construction would exceed it, building the lexer fails with
    /// an error instead.
    ///
    /// By default there is no limit.
    pub fn dfa_state_limit(mut self, limit: Option<usize>) -> Config {
        self.dfa_state_limit = Some(limit);
        self
    }

    /// Returns the DFA state limit, if one was set.
    pub fn get_dfa_state_limit(&self) -> Option<usize> {
        self.dfa_state_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config { dfa_state_limit: o.dfa_state_limit.or(self.dfa_state_limit) }
    }
}

/// A builder for a [`Lexer`].
///
/// This permits configuring both the pattern parser and the automaton
/// construction before compiling a token table.
///
/// # Example
///
/// ```
/// use lexgen::{syntax::ParserBuilder, Builder, Config};
///
/// let lexer = Builder::new()
///     .configure(Config::new().dfa_state_limit(Some(1_000)))
///     .syntax(ParserBuilder::new().ignore_space(false).clone())
///     .build([("SPACE", " +"), ("WORD", "[a-z]+")])?;
/// let kinds: Vec<&str> = lexer
///     .lex("hi there")?
///     .iter()
///     .map(|token| token.kind())
///     .collect();
/// assert_eq!(kinds, vec!["WORD", "SPACE", "WORD"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    syntax: ParserBuilder,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    /// Create a new lexer builder with a default configuration.
    pub fn new() -> Builder {
        Builder { config: Config::default(), syntax: ParserBuilder::new() }
    }

    /// Compile a token table into a lexer.
    ///
    /// Each rule is a token type label and a pattern. The order of the rules
    /// is their priority: when two rules match the same longest prefix, the
    /// one listed first wins.
    ///
    /// Every pattern is compiled on its own into an NFA fragment. The
    /// fragments are attached, in order, to one shared start state, and the
    /// result is determinized once. The accepting states of each fragment
    /// are remembered along with the position of the rule that owns them,
    /// and every DFA state is resolved to its winning rule up front.
    pub fn build<I, K, P>(&self, rules: I) -> Result<Lexer, BuildError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let parser = self.syntax.build();
        let mut nfa = NFA::root();
        let mut kinds = vec![];
        let mut finals = BTreeMap::new();
        for (priority, (kind, pattern)) in rules.into_iter().enumerate() {
            let kind = kind.into();
            let regex = parser
                .parse(pattern.as_ref())
                .map_err(|err| BuildError::syntax(priority, &kind, err))?;
            let fragment = nfa.attach(thompson(&regex));
            for id in fragment.accepting {
                finals.insert(id, priority);
            }
            kinds.push(kind);
        }
        let dfa = match self.config.get_dfa_state_limit() {
            None => nfa.subset_construction(),
            Some(limit) => {
                nfa.determinize_with_limit(limit).map_err(BuildError::compile)?
            }
        };
        debug!(
            "built lexer: {} rules, {} NFA states, {} DFA states",
            kinds.len(),
            nfa.len(),
            dfa.len(),
        );
        let matches = (0..dfa.len())
            .map(|id| {
                dfa.subset(StateID::new(id))
                    .iter()
                    .filter_map(|s| finals.get(&s).copied())
                    .min()
            })
            .collect();
        Ok(Lexer { dfa, finals, matches, kinds })
    }

    /// Apply the given lexer configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax configuration used to parse every token pattern.
    pub fn syntax(&mut self, config: ParserBuilder) -> &mut Builder {
        self.syntax = config;
        self
    }
}

/// A compiled token table.
///
/// A lexer owns one DFA covering every rule, plus a map from the accepting
/// NFA states of each rule to that rule's priority. Both are built once and
/// never change, so a lexer can be shared freely between threads; each scan
/// keeps its own cursor in a [`Tokens`] iterator.
///
/// # Example
///
/// ```
/// use lexgen::Lexer;
///
/// let lexer = Lexer::new([("NUM", "[0-9]+"), ("LIT", "[a-z]+")])?;
/// let tokens: Vec<(&str, &str)> = lexer
///     .lex("abc123")?
///     .iter()
///     .map(|token| token.as_pair())
///     .collect();
/// assert_eq!(tokens, vec![("LIT", "abc"), ("NUM", "123")]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Lexer {
    dfa: DFA,
    /// Accepting NFA state to the position of its rule in the table.
    finals: BTreeMap<StateID, usize>,
    /// The winning rule of each DFA state, indexed by state.
    matches: Vec<Option<usize>>,
    kinds: Vec<String>,
}

impl Lexer {
    /// Compile a token table with the default configuration.
    ///
    /// See [`Builder::build`] for how rules are combined.
    pub fn new<I, K, P>(rules: I) -> Result<Lexer, BuildError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        Builder::new().build(rules)
    }

    /// Return a builder for configuring the construction of a lexer.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Return a default configuration for a lexer.
    pub fn config() -> Config {
        Config::new()
    }

    /// Split `input` into tokens.
    ///
    /// At every position the longest prefix matched by any rule becomes the
    /// next token, ties going to the rule declared first. If no rule matches
    /// a non-empty prefix somewhere, the whole call fails with the position
    /// of that spot. Empty input yields no tokens.
    pub fn lex<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>, LexError> {
        self.tokens(input).collect()
    }

    /// Returns an iterator over the tokens of `input`.
    ///
    /// Unlike [`Lexer::lex`], the tokens before a failure are still
    /// observable: the error is yielded as the last item.
    pub fn tokens<'a>(&'a self, input: &'a str) -> Tokens<'a> {
        Tokens::new(self, input)
    }

    /// The combined DFA of all rules.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// The token types, in declaration order.
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    /// The position in the token table of the rule that accepts in the given
    /// NFA state, if that state is accepting.
    pub fn rule_of(&self, nfa_state: StateID) -> Option<usize> {
        self.finals.get(&nfa_state).copied()
    }

    /// Returns the rule that wins in the given DFA state: among the rules
    /// with an accepting NFA state in the state's subset, the one declared
    /// first.
    pub(crate) fn matched_rule(&self, id: StateID) -> Option<usize> {
        self.matches[id.as_usize()]
    }

    pub(crate) fn kind(&self, rule: usize) -> &str {
        &self.kinds[rule]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finals_map_to_declaration_order() {
        let lexer = Lexer::new([("A", "a"), ("B", "b|c")]).unwrap();
        let rules: Vec<(usize, usize)> = lexer
            .finals
            .iter()
            .map(|(id, &rule)| (id.as_usize(), rule))
            .collect();
        // root 0, "a" at 1..=2, "b|c" at 3..=7.
        assert_eq!(vec![(2, 0), (5, 1), (7, 1)], rules);
        assert_eq!(&["A".to_string(), "B".to_string()], lexer.kinds());
    }

    #[test]
    fn later_rules_get_larger_states() {
        let lexer =
            Lexer::new([("X", "ab"), ("Y", "a[a-b]"), ("Z", "a*")]).unwrap();
        let mut last = None;
        for rule in 0..3 {
            let states: Vec<StateID> = lexer
                .finals
                .iter()
                .filter(|&(_, &r)| r == rule)
                .map(|(&id, _)| id)
                .collect();
            let min = states.iter().min().copied();
            assert!(min > last);
            last = states.iter().max().copied();
        }
    }

    #[test]
    fn matched_rule_prefers_earlier_rule() {
        let lexer = Lexer::new([("A", "ab"), ("B", "a[a-b]")]).unwrap();
        let dfa = lexer.dfa();
        let a = dfa.next_state(dfa.start(), 'a').unwrap();
        let ab = dfa.next_state(a, 'b').unwrap();
        assert_eq!(None, lexer.matched_rule(a));
        assert_eq!(Some(0), lexer.matched_rule(ab));
        let aa = dfa.next_state(a, 'a').unwrap();
        assert_eq!(Some(1), lexer.matched_rule(aa));
    }

    #[test]
    fn winning_rules_are_resolved_for_every_state() {
        let lexer = Lexer::new([
            ("KW", "if"),
            ("ID", "[a-z]+"),
            ("NUM", "[0-9]+"),
            ("ANY", "[a-z]|[0-9]"),
        ])
        .unwrap();
        let dfa = lexer.dfa();
        assert_eq!(dfa.len(), lexer.matches.len());
        for id in (0..dfa.len()).map(StateID::new) {
            let expected =
                dfa.subset(id).iter().filter_map(|s| lexer.rule_of(s)).min();
            assert_eq!(expected, lexer.matched_rule(id), "state {}", id);
        }
        assert_eq!(None, lexer.matched_rule(dfa.start()));
        let i = dfa.next_state(dfa.start(), 'i').unwrap();
        assert_eq!(Some(1), lexer.matched_rule(i));
        let f = dfa.next_state(i, 'f').unwrap();
        assert_eq!(Some(0), lexer.matched_rule(f));
    }

    #[test]
    fn syntax_error_names_rule() {
        let err = Lexer::new([("OK", "a"), ("BAD", "(a")]).unwrap_err();
        assert_eq!(Some((1, "BAD")), err.rule());
        assert!(err.syntax_error().is_some());
        assert!(err.to_string().contains("rule 1 (BAD)"), "{}", err);
    }

    #[test]
    fn state_limit() {
        let rules = [("W", "(a|b)*a(a|b)(a|b)(a|b)")];
        let err = Lexer::builder()
            .configure(Config::new().dfa_state_limit(Some(4)))
            .build(rules)
            .unwrap_err();
        assert_eq!(
            Some(&lexgen_automata::CompileError::TooComplex { limit: 4 }),
            err.compile_error()
        );
        assert!(Lexer::builder()
            .configure(Config::new().dfa_state_limit(None))
            .build(rules)
            .is_ok());
    }

    #[test]
    fn config_overwrite_keeps_unset_options() {
        let base = Config::new().dfa_state_limit(Some(10));
        assert_eq!(Some(10), base.overwrite(Config::new()).get_dfa_state_limit());
        let cleared = base.overwrite(Config::new().dfa_state_limit(None));
        assert_eq!(None, cleared.get_dfa_state_limit());
    }
}
