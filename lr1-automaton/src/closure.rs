use std::collections::BTreeSet;

use lr1_grammar::{first_of_sequence, FirstSets, Grammar};
use lr1_symbols::Symbol;

use crate::item::Item;

pub type ItemSet = BTreeSet<Item>;

/// CLOSURE(I): repeatedly, for each item `(A -> α · B β, a)` with `B`
/// a nonterminal, and each rule `B -> γ`, add `(B -> · γ, b)` for every
/// terminal `b` in `FIRST(β · a)`, until no new item is added.
pub fn closure(kernel: ItemSet, grammar: &Grammar, first_sets: &FirstSets) -> ItemSet {
    let mut set = kernel;
    let mut worklist: Vec<Item> = set.iter().copied().collect();

    while let Some(item) = worklist.pop() {
        let after_dot = match item.symbol_after_dot(grammar) {
            Some(s) => s,
            None => continue,
        };
        if !after_dot.is_nonterminal() {
            continue;
        }

        let tail = item.tail_after_next(grammar);
        for (rule_index, rule) in grammar.rules_for(after_dot).iter().enumerate() {
            let mut lookahead_seq = tail.clone();
            lookahead_seq.push(item.lookahead());
            let lookaheads = first_of_sequence(&lookahead_seq, first_sets);

            for lookahead in lookaheads {
                if lookahead == Symbol::Epsilon {
                    // `a` is always a single terminal; this can only happen
                    // if `lookahead_seq` were empty, which it never is since
                    // `item.lookahead()` is always present.
                    continue;
                }
                let new_item = Item::initial(after_dot, rule_index, rule.body(), lookahead);
                if set.insert(new_item) {
                    worklist.push(new_item);
                }
            }
        }
    }

    set
}

/// GOTO(I, X): the closure of every item in `I` with the dot
/// immediately before `X`, advanced past `X`. Returns an empty set (no
/// transition) if no item in `I` has `X` after the dot.
pub fn goto(item_set: &ItemSet, symbol: Symbol, grammar: &Grammar, first_sets: &FirstSets) -> ItemSet {
    let mut kernel = ItemSet::new();
    for item in item_set {
        if item.symbol_after_dot(grammar) == Some(symbol) {
            if let Some(advanced) = item.advanced(grammar) {
                kernel.insert(advanced);
            }
        }
    }
    if kernel.is_empty() {
        return kernel;
    }
    closure(kernel, grammar, first_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr1_grammar::{compute_first_sets, GrammarBuilder, RuleDecl};

    fn arithmetic_grammar() -> Grammar {
        GrammarBuilder::new(
            "E",
            vec![
                RuleDecl::new("E", vec![vec!["E".into(), "+".into(), "T".into()], vec!["T".into()]]),
                RuleDecl::new("T", vec![vec!["T".into(), "*".into(), "F".into()], vec!["F".into()]]),
                RuleDecl::new(
                    "F",
                    vec![
                        vec!["(".into(), "E".into(), ")".into()],
                        vec!["id".into()],
                    ],
                ),
            ],
        )
        .augment(true)
        .build()
        .unwrap()
    }

    #[test]
    fn closure_is_idempotent() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let entry_rule = grammar.rule(grammar.start(), 0).unwrap();
        let kernel: ItemSet = [Item::initial(grammar.start(), 0, entry_rule.body(), Symbol::EndMarker)]
            .into_iter()
            .collect();
        let once = closure(kernel, &grammar, &first_sets);
        let twice = closure(once.clone(), &grammar, &first_sets);
        assert_eq!(once, twice);
    }

    #[test]
    fn closure_of_entry_item_contains_every_e_production() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let entry_rule = grammar.rule(grammar.start(), 0).unwrap();
        let kernel: ItemSet = [Item::initial(grammar.start(), 0, entry_rule.body(), Symbol::EndMarker)]
            .into_iter()
            .collect();
        let closed = closure(kernel, &grammar, &first_sets);
        let e = grammar.symbols().lookup("E").unwrap();
        let e_items: Vec<&Item> = closed.iter().filter(|i| i.head() == e).collect();
        // both E rules should be present at dot position 0
        assert_eq!(e_items.len(), grammar.rules_for(e).len());
        assert!(e_items.iter().all(|i| i.dot() == 0));
    }

    #[test]
    fn goto_distributes_over_set_union() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let entry_rule = grammar.rule(grammar.start(), 0).unwrap();
        let c0 = closure(
            [Item::initial(grammar.start(), 0, entry_rule.body(), Symbol::EndMarker)]
                .into_iter()
                .collect(),
            &grammar,
            &first_sets,
        );
        let id = grammar.symbols().lookup("id").unwrap();
        let (left, right): (ItemSet, ItemSet) = c0.iter().copied().partition(|item| item.dot() == 0);
        let goto_whole = goto(&c0, id, &grammar, &first_sets);
        let mut goto_parts = goto(&left, id, &grammar, &first_sets);
        goto_parts.extend(goto(&right, id, &grammar, &first_sets));
        assert_eq!(goto_whole, goto_parts);
    }

    #[test]
    fn goto_on_absent_symbol_is_empty() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let entry_rule = grammar.rule(grammar.start(), 0).unwrap();
        let kernel: ItemSet = [Item::initial(grammar.start(), 0, entry_rule.body(), Symbol::EndMarker)]
            .into_iter()
            .collect();
        let c0 = closure(kernel, &grammar, &first_sets);
        let star = grammar.symbols().lookup("*").unwrap();
        assert!(goto(&c0, star, &grammar, &first_sets).is_empty());
    }
}
