//! FIRST and FOLLOW set computation.

use std::collections::{BTreeMap, BTreeSet};

use lr1_symbols::Symbol;

use crate::grammar::Grammar;

pub type SymbolSet = BTreeSet<Symbol>;
pub type FirstSets = BTreeMap<Symbol, SymbolSet>;
pub type FollowSets = BTreeMap<Symbol, SymbolSet>;

/// FIRST of an arbitrary symbol sequence: the left-to-right
/// accumulation used both standalone (by callers wanting FIRST of a
/// production's tail) and as the core step of [`compute_first_sets`]
/// and of CLOSURE's lookahead computation.
///
/// `first_sets` must already contain FIRST(t) = {t} for every
/// terminal `t` that can appear in `sequence`; nonterminals are looked
/// up in `first_sets` and are assumed present (a nonterminal absent
/// from `first_sets` is treated as contributing nothing, which only
/// happens transiently during the fixed-point computation below).
pub fn first_of_sequence(sequence: &[Symbol], first_sets: &FirstSets) -> SymbolSet {
    let mut result = SymbolSet::new();
    if sequence.is_empty() {
        result.insert(Symbol::Epsilon);
        return result;
    }
    for (i, symbol) in sequence.iter().enumerate() {
        let is_last = i + 1 == sequence.len();
        match symbol {
            Symbol::EndMarker | Symbol::Terminal(_) => {
                result.insert(*symbol);
                return result;
            }
            Symbol::Epsilon => {
                if is_last {
                    result.insert(Symbol::Epsilon);
                }
                // an EPSILON in the middle of a sequence contributes
                // nothing and lets the walk continue.
            }
            Symbol::NonTerminal(_) | Symbol::AugmentedStart => {
                let first_of_symbol = match first_sets.get(symbol) {
                    Some(set) => set,
                    None => return result,
                };
                let has_epsilon = first_of_symbol.contains(&Symbol::Epsilon);
                result.extend(first_of_symbol.iter().copied().filter(|s| *s != Symbol::Epsilon));
                if !has_epsilon {
                    return result;
                }
                if is_last {
                    result.insert(Symbol::Epsilon);
                }
            }
        }
    }
    result
}

/// Computes FIRST(X) for every terminal and nonterminal in `grammar`.
/// Terminals seed with FIRST(t) = {t}; nonterminals are grown to a
/// fixed point by the left-to-right rule implemented in
/// [`first_of_sequence`].
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first_sets = FirstSets::new();
    for terminal in grammar.symbols().terminals() {
        first_sets.insert(terminal, [terminal].into_iter().collect());
    }
    for head in grammar.nonterminal_heads() {
        first_sets.entry(*head).or_insert_with(SymbolSet::new);
    }

    loop {
        let mut added = 0usize;
        for head in grammar.nonterminal_heads() {
            for rule in grammar.rules_for(*head) {
                let contribution = first_of_sequence(rule.body(), &first_sets);
                let entry = first_sets.get_mut(head).expect("nonterminal seeded above");
                for symbol in contribution {
                    if entry.insert(symbol) {
                        added += 1;
                    }
                }
            }
        }
        if added == 0 {
            break;
        }
    }

    first_sets
}

/// Computes FOLLOW(A) for every nonterminal. Not needed to build the
/// LR(1) automaton itself (lookaheads there come from CLOSURE, not
/// FOLLOW), but used by the debug dump and by tests asserting FOLLOW-
/// set membership directly.
pub fn compute_follow_sets(grammar: &Grammar, first_sets: &FirstSets) -> FollowSets {
    let mut follow_sets = FollowSets::new();
    for head in grammar.nonterminal_heads() {
        follow_sets.entry(*head).or_insert_with(SymbolSet::new);
    }
    follow_sets
        .entry(grammar.start())
        .or_insert_with(SymbolSet::new)
        .insert(Symbol::EndMarker);

    loop {
        let mut added = 0usize;
        for head in grammar.nonterminal_heads() {
            for rule in grammar.rules_for(*head) {
                let body = rule.body();
                for (i, symbol) in body.iter().enumerate() {
                    if !symbol.is_nonterminal() {
                        continue;
                    }
                    let beta = &body[i + 1..];
                    let first_of_beta = first_of_sequence(beta, first_sets);
                    let beta_has_epsilon = first_of_beta.contains(&Symbol::Epsilon) || beta.is_empty();

                    let mut additions: Vec<Symbol> = first_of_beta
                        .iter()
                        .copied()
                        .filter(|s| *s != Symbol::Epsilon)
                        .collect();
                    if beta_has_epsilon {
                        if let Some(follow_of_head) = follow_sets.get(head) {
                            additions.extend(follow_of_head.iter().copied());
                        }
                    }

                    let entry = follow_sets.entry(*symbol).or_insert_with(SymbolSet::new);
                    for addition in additions {
                        if entry.insert(addition) {
                            added += 1;
                        }
                    }
                }
            }
        }
        if added == 0 {
            break;
        }
    }

    log::debug!("follow sets computed for {} nonterminals", follow_sets.len());
    follow_sets
}
