//! Symbol and token model shared by every crate in the workspace.
//!
//! A [`Symbol`] is an interned handle; the canonical string each handle
//! stands for lives in a [`SymbolTable`]. `EPSILON`, `ENDMARKER` and
//! `AUGMENTED_START` are reserved names that never collide with a name
//! supplied by a caller's grammar.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Reserved name for the empty-production sentinel.
pub const EPSILON_NAME: &str = "EPSILON";
/// Reserved name for the end-of-input sentinel.
pub const ENDMARKER_NAME: &str = "ENDMARKER";
/// Reserved name for the synthetic augmented start nonterminal.
pub const AUGMENTED_START_NAME: &str = "AUGMENTED_START";

/// A grammar symbol: a terminal, a nonterminal, or one of the three
/// reserved sentinels. Terminals and nonterminals are interned as
/// indices into a [`SymbolTable`]; equality and ordering are over the
/// full enum, so two symbols compare equal iff they are the same kind
/// of symbol with the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Denotes an empty right-hand side. Never a valid lookahead.
    Epsilon,
    /// End of input. Also the lookahead of the initial augmented item.
    EndMarker,
    /// The synthetic start nonterminal inserted when a grammar is augmented.
    AugmentedStart,
    Terminal(u32),
    NonTerminal(u32),
}

impl Symbol {
    /// Every symbol is a terminal except nonterminals and `AugmentedStart`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Epsilon | Symbol::EndMarker | Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::AugmentedStart | Symbol::NonTerminal(_))
    }
}

/// Interns symbol names to [`Symbol`] handles and back. Terminals and
/// nonterminals each get their own dense index space so tables can use
/// plain `Vec`s keyed by index where useful.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_name: BTreeMap<String, Symbol>,
    terminal_names: Vec<String>,
    nonterminal_names: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Interns `name` as a terminal, returning the existing symbol if
    /// the name was already interned (as either kind).
    pub fn intern_terminal(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.by_name.get(name) {
            return *sym;
        }
        let idx = self.terminal_names.len() as u32;
        let sym = Symbol::Terminal(idx);
        self.terminal_names.push(name.to_string());
        self.by_name.insert(name.to_string(), sym);
        sym
    }

    /// Interns `name` as a nonterminal, returning the existing symbol if
    /// the name was already interned (as either kind).
    pub fn intern_nonterminal(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.by_name.get(name) {
            return *sym;
        }
        let idx = self.nonterminal_names.len() as u32;
        let sym = Symbol::NonTerminal(idx);
        self.nonterminal_names.push(name.to_string());
        self.by_name.insert(name.to_string(), sym);
        sym
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if name == EPSILON_NAME {
            return Some(Symbol::Epsilon);
        }
        if name == ENDMARKER_NAME {
            return Some(Symbol::EndMarker);
        }
        if name == AUGMENTED_START_NAME {
            return Some(Symbol::AugmentedStart);
        }
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Epsilon => EPSILON_NAME,
            Symbol::EndMarker => ENDMARKER_NAME,
            Symbol::AugmentedStart => AUGMENTED_START_NAME,
            Symbol::Terminal(idx) => &self.terminal_names[idx as usize],
            Symbol::NonTerminal(idx) => &self.nonterminal_names[idx as usize],
        }
    }

    /// Terminal symbols in lexicographic name order (sentinel
    /// terminals `Epsilon`/`EndMarker` excluded; callers that need
    /// them chain them in explicitly).
    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.terminal_names.len() as u32).map(Symbol::Terminal)
    }

    /// Nonterminal symbols in declaration order (`AugmentedStart`
    /// excluded; it is not interned here since it never collides with
    /// a user name).
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.nonterminal_names.len() as u32).map(Symbol::NonTerminal)
    }

    /// Names in lexicographic order, paired with their interned
    /// symbol, spanning both terminals and nonterminals. This is the
    /// iteration order deterministic GOTO exploration needs: terminals
    /// then nonterminals, each in lexicographic order, achieved by a
    /// caller chaining `terminals_sorted()` then `nonterminals_sorted()`.
    pub fn terminals_sorted(&self) -> Vec<Symbol> {
        let mut entries: Vec<(&str, Symbol)> = self
            .terminals()
            .map(|s| (self.name_of(s), s))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, s)| s).collect()
    }

    pub fn nonterminals_sorted(&self) -> Vec<Symbol> {
        let mut entries: Vec<(&str, Symbol)> = self
            .nonterminals()
            .map(|s| (self.name_of(s), s))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, s)| s).collect()
    }
}

/// Classification tag for a lexed token. Distinct from the terminal
/// *name* a token carries: two terminals can share a `TerminalKind`
/// (`+` and `*` are both `Operator`), but the ACTION table is always
/// keyed on the terminal name, never on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TerminalKind {
    Keyword,
    Identifier,
    Number,
    Literal,
    Punctuation,
    Operator,
    Whitespace,
    Comment,
    EndMarker,
}

impl Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalKind::Keyword => "keyword",
            TerminalKind::Identifier => "identifier",
            TerminalKind::Number => "number",
            TerminalKind::Literal => "literal",
            TerminalKind::Punctuation => "punctuation",
            TerminalKind::Operator => "operator",
            TerminalKind::Whitespace => "whitespace",
            TerminalKind::Comment => "comment",
            TerminalKind::EndMarker => "endmarker",
        };
        write!(f, "{}", name)
    }
}

/// A lexed token: a lexeme, the grammar terminal name it stands for,
/// and a classification tag. `terminal` must equal a terminal symbol
/// name used by the grammar the token is fed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub terminal: String,
    pub kind: TerminalKind,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, terminal: impl Into<String>, kind: TerminalKind) -> Self {
        Token {
            lexeme: lexeme.into(),
            terminal: terminal.into(),
            kind,
        }
    }

    /// The zero-lexeme end-marker token every token stream terminates with.
    pub fn end_marker() -> Self {
        Token {
            lexeme: String::new(),
            terminal: ENDMARKER_NAME.to_string(),
            kind: TerminalKind::EndMarker,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.terminal, self.lexeme)
    }
}
