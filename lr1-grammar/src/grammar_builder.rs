use std::collections::BTreeMap;

use lr1_symbols::{Symbol, SymbolTable, EPSILON_NAME};

use crate::grammar::{Grammar, GrammarError, Rule};

/// One nonterminal's declaration: its name and its ordered list of
/// rule bodies (each body an ordered list of symbol names; a body of
/// `["EPSILON"]` denotes the empty production).
pub struct RuleDecl {
    pub head: String,
    pub bodies: Vec<Vec<String>>,
}

impl RuleDecl {
    pub fn new(head: impl Into<String>, bodies: Vec<Vec<String>>) -> Self {
        RuleDecl {
            head: head.into(),
            bodies,
        }
    }
}

/// Builds a [`Grammar`] from an in-memory rule declaration list.
///
/// Terminals and nonterminals are partitioned by declaration: every
/// declared head is a nonterminal, and every other symbol name that
/// shows up on some right-hand side is a terminal.
pub struct GrammarBuilder {
    start_name: String,
    decls: Vec<RuleDecl>,
    augment: bool,
}

impl GrammarBuilder {
    pub fn new(start: impl Into<String>, decls: Vec<RuleDecl>) -> Self {
        GrammarBuilder {
            start_name: start.into(),
            decls,
            augment: false,
        }
    }

    /// When set, a synthetic rule `AUGMENTED_START -> start` is
    /// inserted as rule 0 of a new head, and `AUGMENTED_START` becomes
    /// the effective start symbol.
    pub fn augment(mut self, augment: bool) -> Self {
        self.augment = augment;
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut symbols = SymbolTable::new();
        let mut heads = Vec::with_capacity(self.decls.len());
        let mut seen_heads = BTreeMap::new();

        // Pass 1: intern every declared head as a nonterminal before
        // looking at any rule body, so a forward reference to a
        // not-yet-declared nonterminal still resolves to the same
        // symbol as its eventual head.
        for decl in &self.decls {
            if seen_heads.insert(decl.head.clone(), ()).is_some() {
                return Err(GrammarError::DuplicateHead(decl.head.clone()));
            }
            if decl.bodies.is_empty() {
                return Err(GrammarError::EmptyRuleList(decl.head.clone()));
            }
            let sym = symbols.intern_nonterminal(&decl.head);
            heads.push(sym);
        }

        // Pass 2: build rule bodies, interning any symbol not already
        // known as a nonterminal head as a terminal.
        let mut rules_by_head: BTreeMap<Symbol, Vec<Rule>> = BTreeMap::new();
        for (decl, head_sym) in self.decls.iter().zip(heads.iter().copied()) {
            let mut bodies = Vec::with_capacity(decl.bodies.len());
            for body_names in &decl.bodies {
                let body: Vec<Symbol> = body_names
                    .iter()
                    .map(|name| {
                        if name == EPSILON_NAME {
                            Symbol::Epsilon
                        } else if let Some(sym) = symbols.lookup(name) {
                            sym
                        } else {
                            symbols.intern_terminal(name)
                        }
                    })
                    .collect();
                bodies.push(Rule::new(head_sym, body));
            }
            rules_by_head.insert(head_sym, bodies);
        }

        let original_start = symbols
            .lookup(&self.start_name)
            .filter(|s| s.is_nonterminal())
            .ok_or_else(|| GrammarError::UndefinedStart(self.start_name.clone()))?;

        if self.augment {
            let augmented_rule = Rule::new(Symbol::AugmentedStart, vec![original_start]);
            rules_by_head.insert(Symbol::AugmentedStart, vec![augmented_rule]);
            heads.insert(0, Symbol::AugmentedStart);
            Ok(Grammar::new(
                symbols,
                rules_by_head,
                heads,
                original_start,
                Symbol::AugmentedStart,
                true,
            ))
        } else {
            Ok(Grammar::new(
                symbols,
                rules_by_head,
                heads,
                original_start,
                original_start,
                false,
            ))
        }
    }
}
