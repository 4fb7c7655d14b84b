use lr1_grammar::Grammar;
use lr1_symbols::Symbol;

/// A conflict detected while deriving the ACTION table for one
/// (state, terminal) cell. Shift-over-reduce conflicts are resolved
/// silently and are reported here only for the debug dump and other
/// diagnostics, never as a reason to fail table construction.
/// Reduce-reduce and accept-vs-other conflicts are always fatal
/// (`TableError::NotLR1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Conflict {
    ShiftReduce {
        state: usize,
        symbol: Symbol,
        reduce_head: Symbol,
        reduce_rule: usize,
    },
    ReduceReduce {
        state: usize,
        symbol: Symbol,
        reductions: Vec<(Symbol, usize)>,
    },
    AcceptConflict {
        state: usize,
        symbol: Symbol,
    },
}

impl Conflict {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Conflict::ShiftReduce { .. })
    }

    pub fn describe(&self, grammar: &Grammar) -> String {
        match self {
            Conflict::ShiftReduce {
                state,
                symbol,
                reduce_head,
                reduce_rule,
            } => format!(
                "state {}: shift/reduce on '{}' resolved in favor of shift over {}",
                state,
                grammar.get_symbol_name(*symbol),
                grammar.display_rule(*reduce_head, grammar.rule(*reduce_head, *reduce_rule).unwrap())
            ),
            Conflict::ReduceReduce { state, symbol, reductions } => format!(
                "state {}: reduce/reduce on '{}' between {} candidate rules",
                state,
                grammar.get_symbol_name(*symbol),
                reductions.len()
            ),
            Conflict::AcceptConflict { state, symbol } => format!(
                "state {}: accept conflicts with another action on '{}'",
                state,
                grammar.get_symbol_name(*symbol)
            ),
        }
    }
}
