use core::convert::Infallible;
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{
    dfa::{StateSet, DFA},
    nfa::{StateID, NFA},
    CompileError, CompileResult,
};

impl NFA {
    /// Converts this automaton into an equivalent DFA using the subset
    /// construction.
    ///
    /// The DFA's start state is the epsilon closure of the NFA's start state.
    /// From every discovered subset and every alphabet character, the next
    /// subset is the union of the epsilon closures of all states reachable on
    /// that character. An empty union is the sink, which is recorded but
    /// never expanded. A subset is accepting if it contains an accepting NFA
    /// state.
    ///
    /// This can produce exponentially many states. To bound that, use
    /// [`NFA::determinize_with_limit`].
    pub fn subset_construction(&self) -> DFA {
        match self.determinize(|_| Ok::<(), Infallible>(())) {
            Ok(dfa) => dfa,
            Err(never) => match never {},
        }
    }

    /// Like [`NFA::subset_construction`], but fails with
    /// [`CompileError::TooComplex`] as soon as more than `limit` DFA states
    /// (counting the sink) would be created.
    pub fn determinize_with_limit(&self, limit: usize) -> CompileResult<DFA> {
        self.determinize(|len| {
            if len > limit {
                Err(CompileError::TooComplex { limit })
            } else {
                Ok(())
            }
        })
    }

    /// `grow` is called with the new number of DFA states before each state
    /// is added, and may abort the construction.
    fn determinize<E>(
        &self,
        mut grow: impl FnMut(usize) -> Result<(), E>,
    ) -> Result<DFA, E> {
        let alphabet: Vec<char> = self.alphabet.iter().copied().collect();
        let stride = alphabet.len();
        let mut ids: HashMap<StateSet, StateID> = HashMap::new();
        let mut states: Vec<StateSet> = vec![];
        let mut table: Vec<Option<StateID>> = vec![];
        let mut queue: VecDeque<StateID> = VecDeque::new();

        let mut add = |set: StateSet,
                       states: &mut Vec<StateSet>,
                       table: &mut Vec<Option<StateID>>,
                       queue: &mut VecDeque<StateID>|
         -> Result<StateID, E> {
            if let Some(&id) = ids.get(&set) {
                return Ok(id);
            }
            grow(states.len() + 1)?;
            let id = StateID::new(states.len());
            if !set.is_empty() {
                queue.push_back(id);
            }
            ids.insert(set.clone(), id);
            states.push(set);
            table.extend(core::iter::repeat(None).take(stride));
            Ok(id)
        };

        let start = add(
            self.epsilon_closure(self.start),
            &mut states,
            &mut table,
            &mut queue,
        )?;
        while let Some(current) = queue.pop_front() {
            for (class, &symbol) in alphabet.iter().enumerate() {
                let next = self.step(&states[current.as_usize()], symbol);
                let next = add(next, &mut states, &mut table, &mut queue)?;
                table[current.as_usize() * stride + class] = Some(next);
            }
        }

        let accepting = states
            .iter()
            .enumerate()
            .filter(|(_, set)| self.any_accepting(set.iter()))
            .map(|(id, _)| StateID::new(id))
            .collect();
        let classes =
            alphabet.iter().enumerate().map(|(class, &ch)| (ch, class)).collect();
        debug!(
            "subset construction: {} NFA states, {} DFA states, {} symbols",
            self.len(),
            states.len(),
            stride,
        );
        Ok(DFA { alphabet: self.alphabet.clone(), classes, states, table, start, accepting })
    }

    /// The union of the epsilon closures of every state reachable from
    /// `set` on `symbol`.
    fn step(&self, set: &StateSet, symbol: char) -> StateSet {
        let mut next = BTreeSet::new();
        for id in set.iter() {
            for target in self.state(id).targets(symbol) {
                self.close_into(target, &mut next);
            }
        }
        StateSet::from(next)
    }
}
