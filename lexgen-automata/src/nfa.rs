use core::fmt;
use std::collections::{BTreeSet, VecDeque};

use crate::dfa::StateSet;

/// The identifier of a state in an automaton.
///
/// Identifiers are dense: the states of an automaton with `n` states are
/// numbered `0..n`. NFA fragments are always built with their own numbering
/// starting at zero and are only renumbered when absorbed into a larger
/// automaton.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateID(usize);

impl StateID {
    /// The first state of every automaton.
    pub const ZERO: StateID = StateID(0);

    pub fn new(id: usize) -> StateID {
        StateID(id)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }

    fn shift(self, by: usize) -> StateID {
        StateID(self.0 + by)
    }
}

impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The label on an NFA transition.
///
/// `Epsilon` is distinct from every character, including the empty-looking
/// ones.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Char(ch) => write!(f, "{:?}", ch),
        }
    }
}

/// A transition that consumes one character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    /// The character to match.
    pub symbol: char,
    /// The state entered after consuming `symbol`.
    pub target: StateID,
}

/// A single NFA state and its outgoing transitions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    transitions: Vec<Transition>,
    epsilons: Vec<StateID>,
}

impl State {
    /// Transitions consuming a character.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions consuming no input.
    pub fn epsilons(&self) -> &[StateID] {
        &self.epsilons
    }

    /// Every state reachable from this one by consuming `symbol`.
    pub fn targets(&self, symbol: char) -> impl Iterator<Item = StateID> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.symbol == symbol)
            .map(|t| t.target)
    }

    fn shift(&mut self, by: usize) {
        for t in self.transitions.iter_mut() {
            t.target = t.target.shift(by);
        }
        for id in self.epsilons.iter_mut() {
            *id = id.shift(by);
        }
    }
}

/// Where an absorbed automaton ended up inside the automaton absorbing it.
#[derive(Clone, Debug)]
pub struct Fragment {
    pub start: StateID,
    pub accepting: Vec<StateID>,
}

/// A non-deterministic finite automaton with epsilon transitions.
///
/// Every state referenced by a transition, the start state or the accepting
/// set exists in the automaton. The alphabet is the set of characters that
/// appear on some transition.
#[derive(Clone, Eq, PartialEq)]
pub struct NFA {
    pub(crate) alphabet: BTreeSet<char>,
    pub(crate) states: Vec<State>,
    pub(crate) start: StateID,
    pub(crate) accepting: BTreeSet<StateID>,
}

impl NFA {
    /// An automaton with a single, non-accepting state `0` and no
    /// transitions. It is the shared root that [`NFA::attach`] hangs
    /// fragments off of.
    pub fn root() -> NFA {
        NFA {
            alphabet: BTreeSet::new(),
            states: vec![State::default()],
            start: StateID::ZERO,
            accepting: BTreeSet::new(),
        }
    }

    /// An automaton matching only the empty string: one state that is both
    /// initial and accepting.
    pub fn epsilon() -> NFA {
        let mut nfa = NFA::root();
        nfa.accepting.insert(StateID::ZERO);
        nfa
    }

    /// An automaton matching exactly `ch`: `0 --ch--> 1`, with `1` accepting.
    pub fn character(ch: char) -> NFA {
        let mut nfa = NFA::root();
        let end = nfa.add_state();
        nfa.add_transition(StateID::ZERO, ch, end);
        nfa.accepting.insert(end);
        nfa
    }

    /// Renumbers `fragment` past the states of this automaton, adds it, and
    /// connects this automaton's start state to the fragment's start state
    /// with an epsilon transition. The fragment's accepting states stay
    /// accepting.
    ///
    /// Returns the fragment's start and accepting states in the new
    /// numbering. Since fragments are attached in order, the states of a
    /// later fragment always have larger identifiers than those of an
    /// earlier one.
    pub fn attach(&mut self, fragment: NFA) -> Fragment {
        let fragment = self.absorb(fragment);
        self.add_epsilon(self.start, fragment.start);
        self.accepting.extend(fragment.accepting.iter().copied());
        debug_assert!(self.is_well_formed());
        fragment
    }

    /// The characters this automaton has transitions on.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// The number of states.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> StateID {
        self.start
    }

    pub fn accepting(&self) -> &BTreeSet<StateID> {
        &self.accepting
    }

    pub fn is_accepting(&self, id: StateID) -> bool {
        self.accepting.contains(&id)
    }

    /// Returns true if any state in the given set is accepting.
    pub fn any_accepting<I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = StateID>,
    {
        ids.into_iter().any(|id| self.is_accepting(id))
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateID) -> &State {
        &self.states[id.as_usize()]
    }

    /// Iterates over every transition as `(from, symbol, to)`.
    pub fn transitions(
        &self,
    ) -> impl Iterator<Item = (StateID, Symbol, StateID)> + '_ {
        self.states.iter().enumerate().flat_map(|(id, state)| {
            let from = StateID::new(id);
            let eps =
                state.epsilons.iter().map(move |&to| (from, Symbol::Epsilon, to));
            let chars = state
                .transitions
                .iter()
                .map(move |t| (from, Symbol::Char(t.symbol), t.target));
            eps.chain(chars)
        })
    }

    /// Returns every state reachable from `id` through zero or more epsilon
    /// transitions. The result always contains `id`.
    pub fn epsilon_closure(&self, id: StateID) -> StateSet {
        let mut closure = BTreeSet::new();
        self.close_into(id, &mut closure);
        StateSet::from(closure)
    }

    /// Adds the epsilon closure of `id` to `closure`, breadth first.
    ///
    /// `closure` must already be closed under epsilon transitions. A state
    /// that is already present is skipped along with everything reachable
    /// from it, since those are present too.
    pub(crate) fn close_into(&self, id: StateID, closure: &mut BTreeSet<StateID>) {
        if !closure.insert(id) {
            return;
        }
        let mut queue = VecDeque::from(vec![id]);
        while let Some(current) = queue.pop_front() {
            for &next in self.state(current).epsilons.iter() {
                if closure.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    pub(crate) fn add_state(&mut self) -> StateID {
        let id = StateID::new(self.states.len());
        self.states.push(State::default());
        id
    }

    pub(crate) fn add_epsilon(&mut self, from: StateID, to: StateID) {
        self.states[from.as_usize()].epsilons.push(to);
    }

    pub(crate) fn add_transition(&mut self, from: StateID, symbol: char, to: StateID) {
        self.alphabet.insert(symbol);
        self.states[from.as_usize()].transitions.push(Transition { symbol, target: to });
    }

    /// Appends the states of `other` to this automaton, renumbered by the
    /// current number of states, and merges the alphabets. No transitions
    /// are added between the two and the accepting set is left unchanged.
    pub(crate) fn absorb(&mut self, other: NFA) -> Fragment {
        let offset = self.states.len();
        let NFA { alphabet, states, start, accepting } = other;
        self.alphabet.extend(alphabet);
        self.states.extend(states.into_iter().map(|mut state| {
            state.shift(offset);
            state
        }));
        Fragment {
            start: start.shift(offset),
            accepting: accepting.into_iter().map(|id| id.shift(offset)).collect(),
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        let exists = |id: StateID| id.as_usize() < self.states.len();
        exists(self.start)
            && self.accepting.iter().all(|&id| exists(id))
            && self.transitions().all(|(from, symbol, to)| {
                exists(from)
                    && exists(to)
                    && match symbol {
                        Symbol::Epsilon => true,
                        Symbol::Char(ch) => self.alphabet.contains(&ch),
                    }
            })
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFA(")?;
        writeln!(f, "  alphabet: {:?}", self.alphabet)?;
        writeln!(f, "  start: {}", self.start)?;
        writeln!(f, "  accepting: {:?}", self.accepting)?;
        for (id, state) in self.states.iter().enumerate() {
            let marker = if self.is_accepting(StateID::new(id)) { "*" } else { " " };
            write!(f, "  {}{:06}:", marker, id)?;
            if !state.epsilons.is_empty() {
                write!(f, " ε -> {:?}", state.epsilons)?;
            }
            for t in state.transitions.iter() {
                write!(f, " {:?} -> {}", t.symbol, t.target)?;
            }
            writeln!(f)?;
        }
        writeln!(f, ")")
    }
}
