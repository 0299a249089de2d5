use std::collections::BTreeSet;

use crate::nfa::{StateID, NFA};

/// Runs an NFA directly over input by tracking the set of live states.
///
/// This is slower than running the equivalent DFA but needs no
/// determinization, which makes it a useful reference for checking that
/// subset construction preserved the language.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'a> {
    nfa: &'a NFA,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA.
    pub fn new(nfa: &'a NFA) -> Matcher<'a> {
        Matcher { nfa }
    }

    /// Returns true if the entire input is accepted.
    pub fn is_match(&self, input: &str) -> bool {
        let mut current = self.start();
        for ch in input.chars() {
            current = self.step(&current, ch);
            if current.is_empty() {
                return false;
            }
        }
        self.nfa.any_accepting(current.iter().copied())
    }

    /// Returns the length in bytes of the longest prefix of `input` that is
    /// accepted, if any. An accepted empty prefix yields `Some(0)`.
    pub fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut current = self.start();
        let mut longest = if self.nfa.any_accepting(current.iter().copied()) {
            Some(0)
        } else {
            None
        };
        for (at, ch) in input.char_indices() {
            current = self.step(&current, ch);
            if current.is_empty() {
                break;
            }
            if self.nfa.any_accepting(current.iter().copied()) {
                longest = Some(at + ch.len_utf8());
            }
        }
        longest
    }

    fn start(&self) -> BTreeSet<StateID> {
        let mut states = BTreeSet::new();
        self.nfa.close_into(self.nfa.start(), &mut states);
        states
    }

    /// Step from the current states on a character and take the epsilon
    /// closure of the result.
    fn step(&self, current: &BTreeSet<StateID>, ch: char) -> BTreeSet<StateID> {
        let mut next = BTreeSet::new();
        for &id in current.iter() {
            for target in self.nfa.state(id).targets(ch) {
                self.nfa.close_into(target, &mut next);
            }
        }
        next
    }
}
