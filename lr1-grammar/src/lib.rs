mod grammar;
mod grammar_builder;
mod util;

pub use grammar::{Grammar, GrammarError, Rule};
pub use grammar_builder::{GrammarBuilder, RuleDecl};
pub use util::{compute_first_sets, compute_follow_sets, first_of_sequence, FirstSets, FollowSets, SymbolSet};
