use core::fmt;
use std::collections::{BTreeSet, HashMap};

use crate::nfa::StateID;

/// A set of NFA states in canonical (sorted, deduplicated) form.
///
/// Each DFA state produced by subset construction stands for one of these.
/// Equality and hashing are structural, so two sets with the same members
/// are always the same DFA state. The empty set is the sink.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateSet(Box<[StateID]>);

impl StateSet {
    /// The empty set, i.e., the sink.
    pub fn empty() -> StateSet {
        StateSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: StateID) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateID> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[StateID] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<StateID> {
        self.0.to_vec()
    }
}

impl From<BTreeSet<StateID>> for StateSet {
    fn from(set: BTreeSet<StateID>) -> StateSet {
        StateSet(set.into_iter().collect())
    }
}

impl FromIterator<StateID> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateID>>(iter: I) -> StateSet {
        StateSet::from(iter.into_iter().collect::<BTreeSet<StateID>>())
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// A deterministic finite automaton produced by subset construction.
///
/// Every DFA state is identified by a dense [`StateID`] and corresponds to
/// exactly one [`StateSet`] of the NFA it was built from. Transitions form a
/// table with one row per state and one column per alphabet character.
/// An absent entry is not an error: it means no transition exists. The
/// sink state, if reachable, has no outgoing transitions at all.
#[derive(Clone)]
pub struct DFA {
    pub(crate) alphabet: BTreeSet<char>,
    /// Column index of each alphabet character in `table`.
    pub(crate) classes: HashMap<char, usize>,
    pub(crate) states: Vec<StateSet>,
    pub(crate) table: Vec<Option<StateID>>,
    pub(crate) start: StateID,
    pub(crate) accepting: BTreeSet<StateID>,
}

impl DFA {
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// The number of states, including the sink if it was reached.
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

    /// The set of NFA states that the given DFA state stands for.
    pub fn subset(&self, id: StateID) -> &StateSet {
        &self.states[id.as_usize()]
    }

    /// Returns true if `id` is the dead state, from which nothing is
    /// accepted.
    pub fn is_sink(&self, id: StateID) -> bool {
        self.subset(id).is_empty()
    }

    /// Returns the sink state, if any transition leads to it.
    pub fn sink(&self) -> Option<StateID> {
        self.states.iter().position(StateSet::is_empty).map(StateID::new)
    }

    /// Returns the state entered from `id` on `ch`, or `None` if there is no
    /// such transition. This is always `None` for characters outside the
    /// alphabet and for the sink.
    pub fn next_state(&self, id: StateID, ch: char) -> Option<StateID> {
        let class = *self.classes.get(&ch)?;
        self.table[id.as_usize() * self.stride() + class]
    }

    /// Runs the automaton over `word` from the start state and reports
    /// whether it ends in an accepting state. A missing transition kills the
    /// computation, which then never accepts.
    pub fn accept(&self, word: &str) -> bool {
        word.chars()
            .try_fold(self.start, |id, ch| self.next_state(id, ch))
            .map_or(false, |id| self.is_accepting(id))
    }

    /// Iterates over every transition as `(from, symbol, to)`.
    pub fn transitions(&self) -> impl Iterator<Item = (StateID, char, StateID)> + '_ {
        let stride = self.stride();
        (0..self.states.len()).flat_map(move |id| {
            self.alphabet.iter().filter_map(move |&ch| {
                let class = self.classes[&ch];
                self.table[id * stride + class]
                    .map(|to| (StateID::new(id), ch, to))
            })
        })
    }

    fn stride(&self) -> usize {
        self.alphabet.len()
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DFA(")?;
        writeln!(f, "  alphabet: {:?}", self.alphabet)?;
        writeln!(f, "  start: {}", self.start)?;
        for (id, subset) in self.states.iter().enumerate() {
            let id = StateID::new(id);
            let marker = if self.is_accepting(id) { "*" } else { " " };
            writeln!(f, "  {}{:06}: {:?}", marker, id.as_usize(), subset)?;
            for &ch in self.alphabet.iter() {
                if let Some(to) = self.next_state(id, ch) {
                    writeln!(f, "      {:?} => {}", ch, to)?;
                }
            }
        }
        writeln!(f, ")")
    }
}
