use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};

use lr1_automaton::{build_canonical_collection, AutomatonError, CanonicalCollection};
use lr1_grammar::{FirstSets, Grammar};
use lr1_symbols::Symbol;

use crate::conflict::Conflict;

/// One cell of the ACTION table. GOTO transitions on nonterminals are
/// kept in a separate map, not as an `Action` variant, since they are
/// never subject to shift/reduce resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce { head: Symbol, rule_index: usize },
    Accept,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TableError {
    GrammarNotAugmented,
    /// Table construction found at least one conflict that shift/reduce
    /// resolution cannot settle: a reduce/reduce conflict, or a
    /// conflict between Accept and any other action, is a hard
    /// construction-time error.
    NotLR1(Vec<Conflict>),
}

impl Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::GrammarNotAugmented => {
                write!(f, "parser table requires an augmented grammar")
            }
            TableError::NotLR1(conflicts) => {
                write!(f, "grammar is not LR(1): {} unresolved conflict(s)", conflicts.len())
            }
        }
    }
}

impl Error for TableError {}

impl From<AutomatonError> for TableError {
    fn from(err: AutomatonError) -> Self {
        match err {
            AutomatonError::GrammarNotAugmented => TableError::GrammarNotAugmented,
        }
    }
}

/// A tentative action found for one (state, terminal) cell before
/// conflict resolution, mirroring the accumulate-then-resolve shape of
/// `lapex_parser::lr_parser::ActionGotoTable::build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Shift(usize),
    Reduce { head: Symbol, rule_index: usize },
    Accept,
}

/// The ACTION/GOTO tables derived from a grammar's canonical collection.
/// ACTION is keyed by terminal symbols only; GOTO by nonterminal
/// symbols only.
#[derive(Debug)]
pub struct ActionGotoTable {
    action: BTreeMap<(usize, Symbol), Action>,
    goto: BTreeMap<(usize, Symbol), usize>,
    start_state: usize,
    state_count: usize,
    /// Shift/reduce conflicts that were resolved in favor of shift,
    /// retained for the debug dump and other diagnostics.
    resolved_conflicts: Vec<Conflict>,
}

impl ActionGotoTable {
    pub fn start_state(&self) -> usize {
        self.start_state
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn action(&self, state: usize, terminal: Symbol) -> Option<Action> {
        self.action.get(&(state, terminal)).copied()
    }

    pub fn goto(&self, state: usize, nonterminal: Symbol) -> Option<usize> {
        self.goto.get(&(state, nonterminal)).copied()
    }

    pub fn resolved_conflicts(&self) -> &[Conflict] {
        &self.resolved_conflicts
    }

    pub fn actions(&self) -> impl Iterator<Item = (usize, Symbol, Action)> + '_ {
        self.action.iter().map(|(&(s, sym), &a)| (s, sym, a))
    }

    pub fn gotos(&self) -> impl Iterator<Item = (usize, Symbol, usize)> + '_ {
        self.goto.iter().map(|(&(s, sym), &t)| (s, sym, t))
    }
}

/// Builds the ACTION/GOTO tables for `grammar`.
///
/// GOTO entries come straight from the canonical collection's
/// nonterminal transitions. ACTION entries are accumulated as
/// candidates per `(state, terminal)` cell, one item can contribute a
/// Shift, a Reduce, or the unique Accept, and then resolved:
///
/// - a lone candidate is used as-is;
/// - Accept alongside anything else is `TableError::NotLR1`;
/// - two or more Reduce candidates is `TableError::NotLR1`;
/// - Shift alongside one or more Reduce candidates resolves to Shift,
///   and the shadowed reduction(s) are recorded as resolved conflicts:
///   shift wins, the conflict is not an error, but it must be
///   observable.
pub fn generate_table(grammar: &Grammar, first_sets: &FirstSets) -> Result<ActionGotoTable, TableError> {
    let collection = build_canonical_collection(grammar, first_sets)?;

    let mut candidates: BTreeMap<(usize, Symbol), Vec<Candidate>> = BTreeMap::new();
    let mut goto_table: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();

    for state in collection.states() {
        for (symbol, target) in collection.transitions_from(state) {
            if symbol.is_nonterminal() {
                goto_table.insert((state, symbol), target);
            } else {
                candidates
                    .entry((state, symbol))
                    .or_default()
                    .push(Candidate::Shift(target));
            }
        }

        for item in collection.items(state) {
            if !item.is_reduce_ready(grammar) {
                continue;
            }
            if item.head() == Symbol::AugmentedStart {
                candidates
                    .entry((state, item.lookahead()))
                    .or_default()
                    .push(Candidate::Accept);
            } else {
                candidates
                    .entry((state, item.lookahead()))
                    .or_default()
                    .push(Candidate::Reduce {
                        head: item.head(),
                        rule_index: item.rule_index(),
                    });
            }
        }
    }

    let mut action_table: BTreeMap<(usize, Symbol), Action> = BTreeMap::new();
    let mut resolved_conflicts: Vec<Conflict> = Vec::new();
    let mut fatal_conflicts: Vec<Conflict> = Vec::new();

    for ((state, symbol), mut cell) in candidates {
        cell.sort_by_key(|c| match c {
            Candidate::Shift(_) => 0,
            Candidate::Reduce { .. } => 1,
            Candidate::Accept => 2,
        });
        cell.dedup();

        let accepts = cell.iter().filter(|c| matches!(c, Candidate::Accept)).count();
        let shifts: Vec<usize> = cell
            .iter()
            .filter_map(|c| match c {
                Candidate::Shift(target) => Some(*target),
                _ => None,
            })
            .collect();
        let reduces: Vec<(Symbol, usize)> = cell
            .iter()
            .filter_map(|c| match c {
                Candidate::Reduce { head, rule_index } => Some((*head, *rule_index)),
                _ => None,
            })
            .collect();

        if accepts > 0 {
            if accepts > 1 || !shifts.is_empty() || !reduces.is_empty() {
                fatal_conflicts.push(Conflict::AcceptConflict { state, symbol });
                continue;
            }
            action_table.insert((state, symbol), Action::Accept);
            continue;
        }

        if reduces.len() > 1 {
            fatal_conflicts.push(Conflict::ReduceReduce {
                state,
                symbol,
                reductions: reduces,
            });
            continue;
        }

        match (shifts.first(), reduces.first()) {
            (Some(&target), None) => {
                action_table.insert((state, symbol), Action::Shift(target));
            }
            (None, Some(&(head, rule_index))) => {
                action_table.insert((state, symbol), Action::Reduce { head, rule_index });
            }
            (Some(&target), Some(&(head, rule_index))) => {
                let conflict = Conflict::ShiftReduce {
                    state,
                    symbol,
                    reduce_head: head,
                    reduce_rule: rule_index,
                };
                log::debug!("{}", conflict.describe(grammar));
                resolved_conflicts.push(conflict);
                action_table.insert((state, symbol), Action::Shift(target));
            }
            (None, None) => unreachable!("every candidate cell has at least one candidate"),
        }
    }

    if !fatal_conflicts.is_empty() {
        return Err(TableError::NotLR1(fatal_conflicts));
    }

    Ok(ActionGotoTable {
        action: action_table,
        goto: goto_table,
        start_state: collection.start_state(),
        state_count: collection.state_count(),
        resolved_conflicts,
    })
}
