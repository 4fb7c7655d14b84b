use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};

use lr1_symbols::{Symbol, SymbolTable, AUGMENTED_START_NAME};

/// A single production: `head -> body`. `body` of `[Symbol::Epsilon]`
/// denotes the empty production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    head: Symbol,
    body: Vec<Symbol>,
}

impl Rule {
    pub fn new(head: Symbol, body: Vec<Symbol>) -> Self {
        Rule { head, body }
    }

    pub fn head(&self) -> Symbol {
        self.head
    }

    pub fn body(&self) -> &[Symbol] {
        &self.body
    }

    /// `true` for the single-symbol `[Symbol::Epsilon]` body.
    pub fn is_epsilon(&self) -> bool {
        self.body.len() == 1 && self.body[0] == Symbol::Epsilon
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GrammarError {
    /// A head was declared (present as a key) with no rule bodies.
    EmptyRuleList(String),
    /// The same head name was supplied more than once.
    DuplicateHead(String),
    /// The grammar's start symbol is not the head of any rule.
    UndefinedStart(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::EmptyRuleList(name) => {
                write!(f, "nonterminal '{}' has no rule bodies", name)
            }
            GrammarError::DuplicateHead(name) => {
                write!(f, "nonterminal '{}' is declared more than once", name)
            }
            GrammarError::UndefinedStart(name) => {
                write!(f, "start symbol '{}' is not the head of any rule", name)
            }
        }
    }
}

impl Error for GrammarError {}

/// An immutable grammar: a rule set plus a start symbol. Built once via
/// [`crate::GrammarBuilder`] and never mutated afterward; the LR(1)
/// automaton and parser tables are derived from it.
#[derive(Debug)]
pub struct Grammar {
    symbols: SymbolTable,
    rules_by_head: BTreeMap<Symbol, Vec<Rule>>,
    /// Declaration order of nonterminal heads, needed to iterate rules
    /// deterministically for anything that isn't keyed by symbol name.
    heads: Vec<Symbol>,
    original_start: Symbol,
    effective_start: Symbol,
    augmented: bool,
}

impl Grammar {
    pub(crate) fn new(
        symbols: SymbolTable,
        rules_by_head: BTreeMap<Symbol, Vec<Rule>>,
        heads: Vec<Symbol>,
        original_start: Symbol,
        effective_start: Symbol,
        augmented: bool,
    ) -> Self {
        Grammar {
            symbols,
            rules_by_head,
            heads,
            original_start,
            effective_start,
            augmented,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The symbol the canonical collection is seeded from: the
    /// augmented start if `augment` was requested, otherwise the
    /// caller's original start symbol.
    pub fn start(&self) -> Symbol {
        self.effective_start
    }

    /// The caller's original start symbol, always preserved even when
    /// the grammar was augmented.
    pub fn original_start(&self) -> Symbol {
        self.original_start
    }

    pub fn is_augmented(&self) -> bool {
        self.augmented
    }

    /// Rule bodies for `head`, in stable rule-index order. Empty for a
    /// symbol that is not a nonterminal head.
    pub fn rules_for(&self, head: Symbol) -> &[Rule] {
        self.rules_by_head
            .get(&head)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn rule(&self, head: Symbol, rule_index: usize) -> Option<&Rule> {
        self.rules_by_head.get(&head)?.get(rule_index)
    }

    pub fn rule_index_of<'a>(&self, head: Symbol, body: &[Symbol]) -> Option<usize> {
        self.rules_by_head
            .get(&head)?
            .iter()
            .position(|r| r.body() == body)
    }

    /// All rules across every head, in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (Symbol, usize, &Rule)> {
        self.heads.iter().flat_map(move |head| {
            self.rules_by_head[head]
                .iter()
                .enumerate()
                .map(move |(idx, rule)| (*head, idx, rule))
        })
    }

    pub fn nonterminal_heads(&self) -> &[Symbol] {
        &self.heads
    }

    pub fn get_symbol_name(&self, symbol: Symbol) -> &str {
        self.symbols.name_of(symbol)
    }

    pub fn display_rule(&self, head: Symbol, rule: &Rule) -> String {
        let rhs: Vec<&str> = rule.body().iter().map(|s| self.get_symbol_name(*s)).collect();
        if head == Symbol::AugmentedStart {
            format!("{} -> {}", AUGMENTED_START_NAME, rhs.join(" "))
        } else {
            format!("{} -> {}", self.get_symbol_name(head), rhs.join(" "))
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grammar (start: {}) {{", self.get_symbol_name(self.start()))?;
        for (head, _idx, rule) in self.rules() {
            writeln!(f, "\t{}", self.display_rule(head, rule))?;
        }
        write!(f, "}}")
    }
}
