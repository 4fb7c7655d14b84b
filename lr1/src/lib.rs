//! Re-exports the full LR(1) pipeline: symbols, grammar analysis,
//! automaton construction, table generation, the parse driver, and the
//! ordered-pattern lexer, as one crate for callers who want all of it
//! without pinning individual component versions themselves.

pub mod debug;

pub use lr1_automaton::{build_canonical_collection, closure, goto, AutomatonError, CanonicalCollection, Item, ItemSet};
pub use lr1_driver::{parse, ParseError, SyntaxTree};
pub use lr1_grammar::{
    compute_first_sets, compute_follow_sets, first_of_sequence, FirstSets, FollowSets, Grammar, GrammarBuilder,
    GrammarError, Rule, RuleDecl, SymbolSet,
};
pub use lr1_lexer::{LexError, Lexer, PatternRule};
pub use lr1_symbols::{Symbol, SymbolTable, TerminalKind, Token};
pub use lr1_tables::{generate_table, Action, ActionGotoTable, Conflict, TableError};
