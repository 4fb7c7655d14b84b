use std::fmt::{self, Display};

use lr1_grammar::Grammar;
use lr1_symbols::Symbol;

/// An LR(1) item `(head, rule_index, dot_position, lookahead)`.
/// Identity is structural equality/ordering over all four fields: two
/// items are the same item iff every field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    head: Symbol,
    rule_index: usize,
    dot: usize,
    lookahead: Symbol,
}

impl Item {
    /// Builds the initial item for `head -> rule_index` with the dot
    /// at position 0, except for an epsilon body (`[Symbol::Epsilon]`),
    /// which is built already at the reduced position: the added item
    /// is `(B -> ., b)`, dot-position equal to body length, immediately
    /// reducible.
    pub fn initial(head: Symbol, rule_index: usize, body: &[Symbol], lookahead: Symbol) -> Self {
        let dot = if body == [Symbol::Epsilon] { body.len() } else { 0 };
        Item {
            head,
            rule_index,
            dot,
            lookahead,
        }
    }

    pub fn head(&self) -> Symbol {
        self.head
    }

    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn lookahead(&self) -> Symbol {
        self.lookahead
    }

    pub fn symbol_after_dot(&self, grammar: &Grammar) -> Option<Symbol> {
        let rule = grammar.rule(self.head, self.rule_index)?;
        rule.body().get(self.dot).copied()
    }

    /// The symbols strictly after the one immediately past the dot:
    /// `β` in the item `A -> α · B β`. Used when computing CLOSURE
    /// lookaheads as FIRST(β · a).
    pub fn tail_after_next(&self, grammar: &Grammar) -> Vec<Symbol> {
        grammar
            .rule(self.head, self.rule_index)
            .map(|rule| rule.body()[(self.dot + 1).min(rule.body().len())..].to_vec())
            .unwrap_or_default()
    }

    /// Returns the item with the dot advanced one position, or `None`
    /// if the dot is already at the end of the body.
    pub fn advanced(&self, grammar: &Grammar) -> Option<Item> {
        let rule = grammar.rule(self.head, self.rule_index)?;
        if self.dot >= rule.body().len() {
            return None;
        }
        Some(Item {
            dot: self.dot + 1,
            ..*self
        })
    }

    pub fn is_reduce_ready(&self, grammar: &Grammar) -> bool {
        self.symbol_after_dot(grammar).is_none()
    }

    pub fn display<'g>(&self, grammar: &'g Grammar) -> ItemDisplay<'_, 'g> {
        ItemDisplay { item: self, grammar }
    }
}

pub struct ItemDisplay<'a, 'g> {
    item: &'a Item,
    grammar: &'g Grammar,
}

impl Display for ItemDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = self.grammar.rule(self.item.head, self.item.rule_index);
        let body = rule.map(|r| r.body()).unwrap_or(&[]);
        let pre: Vec<&str> = body[..self.item.dot.min(body.len())]
            .iter()
            .map(|s| self.grammar.get_symbol_name(*s))
            .collect();
        let post: Vec<&str> = body[self.item.dot.min(body.len())..]
            .iter()
            .map(|s| self.grammar.get_symbol_name(*s))
            .collect();
        write!(
            f,
            "{} -> {} . {} , {}",
            self.grammar.get_symbol_name(self.item.head),
            pre.join(" "),
            post.join(" "),
            self.grammar.get_symbol_name(self.item.lookahead)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr1_grammar::{GrammarBuilder, RuleDecl};

    fn arithmetic_grammar() -> Grammar {
        GrammarBuilder::new(
            "E",
            vec![
                RuleDecl::new("E", vec![vec!["id".into()]]),
                RuleDecl::new("Opt", vec![vec!["a".into()], vec!["EPSILON".into()]]),
            ],
        )
        .augment(true)
        .build()
        .unwrap()
    }

    #[test]
    fn epsilon_body_item_starts_already_reduce_ready() {
        let grammar = arithmetic_grammar();
        let opt = grammar.symbols().lookup("Opt").unwrap();
        let epsilon_rule = grammar
            .rules_for(opt)
            .iter()
            .position(|r| r.is_epsilon())
            .unwrap();
        let item = Item::initial(opt, epsilon_rule, &[Symbol::Epsilon], Symbol::EndMarker);
        assert_eq!(item.dot(), 1);
        assert!(item.is_reduce_ready(&grammar));
    }

    #[test]
    fn non_epsilon_item_starts_at_dot_zero_and_advances() {
        let grammar = arithmetic_grammar();
        let e = grammar.symbols().lookup("E").unwrap();
        let body = grammar.rule(e, 0).unwrap().body().to_vec();
        let item = Item::initial(e, 0, &body, Symbol::EndMarker);
        assert_eq!(item.dot(), 0);
        assert!(!item.is_reduce_ready(&grammar));

        let advanced = item.advanced(&grammar).expect("dot not yet past body length");
        assert_eq!(advanced.dot(), 1);
        assert!(advanced.is_reduce_ready(&grammar));
        assert!(advanced.advanced(&grammar).is_none());
    }

    #[test]
    fn items_are_equal_iff_all_four_fields_match() {
        let grammar = arithmetic_grammar();
        let e = grammar.symbols().lookup("E").unwrap();
        let body = grammar.rule(e, 0).unwrap().body().to_vec();
        let a = Item::initial(e, 0, &body, Symbol::EndMarker);
        let b = Item::initial(e, 0, &body, Symbol::EndMarker);
        let id = grammar.symbols().lookup("id").unwrap();
        let c = Item::initial(e, 0, &body, id);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
