use std::fmt::{self, Display};

use lr1_grammar::Grammar;
use lr1_symbols::{Symbol, Token};

/// A concrete syntax tree node: either a lexed leaf, or an internal
/// node labeled with the nonterminal that was reduced, holding its
/// children left-to-right in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxTree {
    Leaf(Token),
    Node { label: Symbol, children: Vec<SyntaxTree> },
}

impl SyntaxTree {
    pub fn is_leaf(&self) -> bool {
        matches!(self, SyntaxTree::Leaf(_))
    }

    pub fn label(&self, grammar: &Grammar) -> String {
        match self {
            SyntaxTree::Leaf(token) => token.terminal.clone(),
            SyntaxTree::Node { label, .. } => grammar.get_symbol_name(*label).to_string(),
        }
    }

    pub fn children(&self) -> &[SyntaxTree] {
        match self {
            SyntaxTree::Leaf(_) => &[],
            SyntaxTree::Node { children, .. } => children,
        }
    }

    /// Reverses this node's children in place, recursively. The parse
    /// driver builds children in pop order (last matched first); a
    /// single pass after acceptance restores production order, the way
    /// `SyntaxTree::ReverseChildren` does in the system this driver is
    /// modeled on.
    pub(crate) fn reverse_children(&mut self) {
        if let SyntaxTree::Node { children, .. } = self {
            children.reverse();
            for child in children.iter_mut() {
                child.reverse_children();
            }
        }
    }

    pub fn display<'a, 'g>(&'a self, grammar: &'g Grammar) -> TreeDisplay<'a, 'g> {
        TreeDisplay {
            tree: self,
            grammar,
            indent: 0,
        }
    }
}

pub struct TreeDisplay<'a, 'g> {
    tree: &'a SyntaxTree,
    grammar: &'g Grammar,
    indent: usize,
}

impl Display for TreeDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.indent {
            write!(f, "|   ")?;
        }
        match self.tree {
            SyntaxTree::Leaf(token) => writeln!(f, "{}", token)?,
            SyntaxTree::Node { label, children } => {
                writeln!(f, "{}", self.grammar.get_symbol_name(*label))?;
                for child in children {
                    write!(
                        f,
                        "{}",
                        TreeDisplay {
                            tree: child,
                            grammar: self.grammar,
                            indent: self.indent + 1,
                        }
                    )?;
                }
            }
        }
        Ok(())
    }
}
