use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::Outgoing;

use lr1_grammar::{FirstSets, Grammar};
use lr1_symbols::Symbol;

use crate::closure::{closure, goto, ItemSet};
use crate::item::Item;

#[derive(Debug, PartialEq, Eq)]
pub enum AutomatonError {
    /// The canonical collection can only be seeded from a grammar
    /// built with `augment = true`: the single Accept action depends
    /// on the synthetic `AUGMENTED_START` head.
    GrammarNotAugmented,
}

impl Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::GrammarNotAugmented => {
                write!(f, "canonical collection requires an augmented grammar")
            }
        }
    }
}

impl Error for AutomatonError {}

/// The canonical collection of LR(1) item sets, plus the GOTO
/// transitions between them recorded as a graph whose nodes are state
/// indices and whose edges are the transition symbol, mirroring
/// `lapex_parser::lr_parser::ParserGraph`'s `Graph<(), Symbol>`.
pub struct CanonicalCollection {
    graph: DiGraph<(), Symbol>,
    item_sets: Vec<ItemSet>,
    start_state: usize,
}

impl CanonicalCollection {
    pub fn start_state(&self) -> usize {
        self.start_state
    }

    pub fn state_count(&self) -> usize {
        self.item_sets.len()
    }

    pub fn items(&self, state: usize) -> &ItemSet {
        &self.item_sets[state]
    }

    pub fn states(&self) -> impl Iterator<Item = usize> {
        0..self.item_sets.len()
    }

    /// The transition target from `state` on `symbol`, if any.
    pub fn goto_state(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.graph
            .edges_directed(NodeIndex::new(state), Outgoing)
            .find(|edge| *edge.weight() == symbol)
            .map(|edge| edge.target().index())
    }

    /// Every outgoing transition from `state`.
    pub fn transitions_from(&self, state: usize) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        self.graph
            .edges_directed(NodeIndex::new(state), Outgoing)
            .map(|edge| (*edge.weight(), edge.target().index()))
    }
}

/// Builds the canonical collection for `grammar`, which must have been
/// constructed with `augment = true`.
///
/// Symbols are explored in lexicographic order (terminals, then
/// nonterminals) at every state, which is what makes state numbering
/// deterministic given a fixed grammar.
pub fn build_canonical_collection(
    grammar: &Grammar,
    first_sets: &FirstSets,
) -> Result<CanonicalCollection, AutomatonError> {
    if !grammar.is_augmented() {
        return Err(AutomatonError::GrammarNotAugmented);
    }

    let entry_head = grammar.start();
    let entry_rule = grammar
        .rule(entry_head, 0)
        .expect("augmented grammar always has a rule 0 for its start head");
    let entry_kernel: ItemSet = [Item::initial(entry_head, 0, entry_rule.body(), Symbol::EndMarker)]
        .into_iter()
        .collect();
    let entry_set = closure(entry_kernel, grammar, first_sets);

    let mut graph: DiGraph<(), Symbol> = DiGraph::new();
    let mut item_sets: Vec<ItemSet> = Vec::new();
    let mut index_of: BTreeMap<ItemSet, usize> = BTreeMap::new();

    let entry_node = graph.add_node(());
    item_sets.push(entry_set.clone());
    index_of.insert(entry_set, entry_node.index());

    let exploration_order: Vec<Symbol> = grammar
        .symbols()
        .terminals_sorted()
        .into_iter()
        .chain(grammar.symbols().nonterminals_sorted())
        .collect();

    let mut unprocessed = vec![entry_node.index()];
    while let Some(state) = unprocessed.pop() {
        let current = item_sets[state].clone();
        for symbol in &exploration_order {
            let target = goto(&current, *symbol, grammar, first_sets);
            if target.is_empty() {
                continue;
            }
            let target_state = match index_of.get(&target) {
                Some(existing) => *existing,
                None => {
                    let node = graph.add_node(());
                    let new_state = node.index();
                    item_sets.push(target.clone());
                    index_of.insert(target, new_state);
                    unprocessed.push(new_state);
                    new_state
                }
            };
            graph.add_edge(NodeIndex::new(state), NodeIndex::new(target_state), *symbol);
        }
    }

    log::debug!(
        "canonical collection built: {} states from {} rules",
        item_sets.len(),
        grammar.rules().count()
    );

    Ok(CanonicalCollection {
        graph,
        item_sets,
        start_state: entry_node.index(),
    })
}
