use core::mem;

use lexgen_syntax::Regex;

use crate::nfa::{StateID, NFA};

/// Compiles a pattern into an NFA using Thompson's construction.
///
/// Every node becomes a self-contained automaton numbered from zero; the
/// operators combine their operands' automata by renumbering them into
/// disjoint ranges and adding epsilon transitions:
///
/// * `Epsilon`: one state, initial and accepting.
/// * `Character(c)`: `0 --c--> 1`, with `1` accepting.
/// * `Concat(l, r)`: `r` is renumbered past `l`, and every accepting state
///   of `l` gets an epsilon transition to the start of `r`. Only `r`'s
///   accepting states remain accepting.
/// * `Union(l, r)`: a new start state `0` with epsilon transitions to `l`
///   (renumbered by 1) and `r` (renumbered past `l`). Both accepting sets
///   are kept.
/// * `Star(s)`: a new start state `0`, then `s` renumbered by 1, then a new
///   final state. The start state can skip to the final state, and every
///   accepting state of `s` loops back to the start of `s` or exits to the
///   final state, which is the only accepting state.
/// * `QuestionMark(s)` is `Union(s, Epsilon)` and `Plus(s)` is
///   `Concat(s, Star(s))`.
///
/// The tree is walked with an explicit stack, so arbitrarily deep patterns
/// do not overflow the call stack.
pub fn thompson(regex: &Regex) -> NFA {
    let mut frames = vec![Frame::Visit(regex)];
    let mut built: Vec<NFA> = vec![];
    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Visit(node) => match *node {
                Regex::Epsilon => built.push(NFA::epsilon()),
                Regex::Character(ch) => built.push(NFA::character(ch)),
                Regex::Concat(ref left, ref right) => {
                    frames.push(Frame::Concat);
                    frames.push(Frame::Visit(right));
                    frames.push(Frame::Visit(left));
                }
                Regex::Union(ref left, ref right) => {
                    frames.push(Frame::Union);
                    frames.push(Frame::Visit(right));
                    frames.push(Frame::Visit(left));
                }
                Regex::Star(ref sub) => {
                    frames.push(Frame::Star);
                    frames.push(Frame::Visit(sub));
                }
                Regex::QuestionMark(ref sub) => {
                    frames.push(Frame::QuestionMark);
                    frames.push(Frame::Visit(sub));
                }
                Regex::Plus(ref sub) => {
                    frames.push(Frame::Plus);
                    frames.push(Frame::Visit(sub));
                }
            },
            Frame::Concat => {
                let right = pop(&mut built);
                let left = pop(&mut built);
                built.push(concat(left, right));
            }
            Frame::Union => {
                let right = pop(&mut built);
                let left = pop(&mut built);
                built.push(union(left, right));
            }
            Frame::Star => {
                let sub = pop(&mut built);
                built.push(star(sub));
            }
            Frame::QuestionMark => {
                let sub = pop(&mut built);
                built.push(union(sub, NFA::epsilon()));
            }
            Frame::Plus => {
                let sub = pop(&mut built);
                built.push(concat(sub.clone(), star(sub)));
            }
        }
    }
    let nfa = pop(&mut built);
    debug_assert!(built.is_empty());
    debug_assert!(nfa.is_well_formed());
    trace!("compiled pattern into an NFA with {} states", nfa.len());
    nfa
}

/// A unit of pending work: either a node still to be visited, or an
/// operator waiting for its operands on the result stack.
enum Frame<'r> {
    Visit(&'r Regex),
    Concat,
    Union,
    Star,
    QuestionMark,
    Plus,
}

fn pop(built: &mut Vec<NFA>) -> NFA {
    match built.pop() {
        Some(nfa) => nfa,
        None => unreachable!("operator frame without a built operand"),
    }
}

fn concat(mut left: NFA, right: NFA) -> NFA {
    let exits = mem::take(&mut left.accepting);
    let right = left.absorb(right);
    for exit in exits {
        left.add_epsilon(exit, right.start);
    }
    left.accepting = right.accepting.into_iter().collect();
    left
}

fn union(left: NFA, right: NFA) -> NFA {
    let mut nfa = NFA::root();
    let left = nfa.absorb(left);
    let right = nfa.absorb(right);
    nfa.add_epsilon(StateID::ZERO, left.start);
    nfa.add_epsilon(StateID::ZERO, right.start);
    nfa.accepting = left.accepting.into_iter().chain(right.accepting).collect();
    nfa
}

fn star(sub: NFA) -> NFA {
    let mut nfa = NFA::root();
    let sub = nfa.absorb(sub);
    let last = nfa.add_state();
    nfa.add_epsilon(StateID::ZERO, sub.start);
    nfa.add_epsilon(StateID::ZERO, last);
    for &exit in sub.accepting.iter() {
        nfa.add_epsilon(exit, sub.start);
        nfa.add_epsilon(exit, last);
    }
    nfa.accepting.insert(last);
    nfa
}
