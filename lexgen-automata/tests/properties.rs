// Language-level properties of Thompson's construction and subset
// construction, checked against small random patterns over {a, b, c}.

use lexgen_automata::{thompson, Matcher, StateID, NFA};
use lexgen_syntax::{parse, Regex};
use quickcheck::{quickcheck, Arbitrary, Gen};

#[derive(Clone, Debug)]
struct Pattern(Regex);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Pattern {
        Pattern(regex(g, 3))
    }
}

fn regex(g: &mut Gen, depth: u32) -> Regex {
    if depth == 0 || u8::arbitrary(g) % 4 == 0 {
        return match u8::arbitrary(g) % 7 {
            0 => Regex::Epsilon,
            n => Regex::Character(ALPHABET[usize::from(n) % ALPHABET.len()]),
        };
    }
    let sub = |g: &mut Gen| regex(g, depth - 1);
    match u8::arbitrary(g) % 5 {
        0 => Regex::concat(sub(g), sub(g)),
        1 => Regex::union(sub(g), sub(g)),
        2 => Regex::star(sub(g)),
        3 => Regex::question_mark(sub(g)),
        _ => Regex::plus(sub(g)),
    }
}

const ALPHABET: [char; 3] = ['a', 'b', 'c'];

#[derive(Clone, Debug)]
struct Word(String);

impl Arbitrary for Word {
    fn arbitrary(g: &mut Gen) -> Word {
        let len = usize::arbitrary(g) % 7;
        let word = (0..len)
            .map(|_| ALPHABET[usize::arbitrary(g) % ALPHABET.len()])
            .collect();
        Word(word)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Word>> {
        let word = self.0.clone();
        Box::new((0..word.len()).map(move |i| {
            let mut shorter = word.clone();
            shorter.remove(i);
            Word(shorter)
        }))
    }
}

fn accepts(regex: &Regex, word: &str) -> bool {
    Matcher::new(&thompson(regex)).is_match(word)
}

/// Every way to split `word` in two, as byte offsets. Words are ASCII.
fn splits(word: &str) -> impl Iterator<Item = (&str, &str)> {
    (0..=word.len()).map(move |i| word.split_at(i))
}

/// Membership in L(sub)*, by dynamic programming over prefixes.
fn accepts_star(sub: &Regex, word: &str) -> bool {
    let n = word.len();
    let mut reach = vec![false; n + 1];
    reach[0] = true;
    for j in 1..=n {
        reach[j] = (0..j).any(|i| reach[i] && accepts(sub, &word[i..j]));
    }
    reach[n]
}

quickcheck! {
    fn dfa_agrees_with_nfa(pattern: Pattern, word: Word) -> bool {
        let nfa = thompson(&pattern.0);
        let dfa = nfa.subset_construction();
        dfa.accept(&word.0) == Matcher::new(&nfa).is_match(&word.0)
    }

    fn closure_contains_state_and_is_idempotent(pattern: Pattern) -> bool {
        let nfa = thompson(&pattern.0);
        (0..nfa.len()).map(StateID::new).all(|id| {
            let once = nfa.epsilon_closure(id);
            let twice: lexgen_automata::StateSet =
                once.iter().flat_map(|s| nfa.epsilon_closure(s).to_vec()).collect();
            once.contains(id) && once == twice
        })
    }

    fn union_is_either(a: Pattern, b: Pattern, word: Word) -> bool {
        let union = Regex::union(a.0.clone(), b.0.clone());
        accepts(&union, &word.0) == (accepts(&a.0, &word.0) || accepts(&b.0, &word.0))
    }

    fn concat_is_some_split(a: Pattern, b: Pattern, word: Word) -> bool {
        let concat = Regex::concat(a.0.clone(), b.0.clone());
        let expected = splits(&word.0)
            .any(|(left, right)| accepts(&a.0, left) && accepts(&b.0, right));
        accepts(&concat, &word.0) == expected
    }

    fn star_is_repetition(a: Pattern, word: Word) -> bool {
        let star = Regex::star(a.0.clone());
        accepts(&star, &word.0) == accepts_star(&a.0, &word.0)
    }

    fn question_mark_adds_empty(a: Pattern, word: Word) -> bool {
        let optional = Regex::question_mark(a.0.clone());
        accepts(&optional, &word.0) == (word.0.is_empty() || accepts(&a.0, &word.0))
    }

    fn plus_is_one_then_star(a: Pattern, word: Word) -> bool {
        let plus = Regex::plus(a.0.clone());
        let expected = splits(&word.0)
            .any(|(left, right)| accepts(&a.0, left) && accepts_star(&a.0, right));
        accepts(&plus, &word.0) == expected
    }

    fn rendered_pattern_has_same_language(pattern: Pattern, word: Word) -> bool {
        let reparsed = match parse(&pattern.0.to_string()) {
            Ok(regex) => regex,
            Err(_) => return false,
        };
        let original = thompson(&pattern.0).subset_construction();
        let roundtrip = thompson(&reparsed).subset_construction();
        original.accept(&word.0) == roundtrip.accept(&word.0)
    }

    fn merged_fragments_accept_the_union(patterns: Vec<Pattern>, word: Word) -> bool {
        let mut nfa = NFA::root();
        for pattern in patterns.iter().take(4) {
            nfa.attach(thompson(&pattern.0));
        }
        let expected = patterns.iter().take(4).any(|p| accepts(&p.0, &word.0));
        nfa.subset_construction().accept(&word.0) == expected
    }
}
