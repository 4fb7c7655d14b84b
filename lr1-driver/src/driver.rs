use std::error::Error;
use std::fmt::{self, Display};

use lr1_grammar::Grammar;
use lr1_symbols::{Symbol, Token};
use lr1_tables::{Action, ActionGotoTable};

use crate::tree::SyntaxTree;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A token's `terminal` name does not resolve to any symbol known
    /// to the grammar the table was built from.
    UnknownTerminal { offset: usize, terminal: String },
    /// No ACTION entry exists for `(state, token.terminal)`.
    UnexpectedToken {
        state: usize,
        offset: usize,
        token: Token,
        expected: Vec<String>,
    },
    /// A reduce's GOTO lookup failed. This indicates the table and the
    /// grammar it was paired with have drifted apart; it is never
    /// expected from a table produced by [`lr1_tables::generate_table`]
    /// for the same grammar.
    MissingGoto { state: usize, nonterminal: String },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownTerminal { offset, terminal } => {
                write!(f, "token at offset {} has unknown terminal '{}'", offset, terminal)
            }
            ParseError::UnexpectedToken {
                state,
                offset,
                token,
                expected,
            } => write!(
                f,
                "unexpected token {} at offset {} in state {}; expected one of [{}]",
                token,
                offset,
                state,
                expected.join(", ")
            ),
            ParseError::MissingGoto { state, nonterminal } => write!(
                f,
                "no goto entry for state {} on nonterminal '{}'",
                state, nonterminal
            ),
        }
    }
}

impl Error for ParseError {}

/// Runs the shift/reduce stack machine over `tokens`. `tokens` must
/// end with a token whose terminal is the end-marker
/// (`Token::end_marker()`); the driver does not append one implicitly.
///
/// Returns the root the automaton actually accepts on: when `grammar`
/// was augmented, that root is labeled `AUGMENTED_START` with exactly
/// one child labeled with the grammar's original start symbol; when it
/// wasn't, `table`/`grammar` never produce an `AUGMENTED_START` node in
/// the first place, so the root is already the user's start symbol.
pub fn parse(grammar: &Grammar, table: &ActionGotoTable, tokens: &[Token]) -> Result<SyntaxTree, ParseError> {
    let mut states: Vec<(usize, SyntaxTree)> = vec![(table.start_state(), placeholder_root())];
    let mut offset = 0usize;

    loop {
        let token = tokens.get(offset).ok_or_else(|| ParseError::UnexpectedToken {
            state: states.last().unwrap().0,
            offset,
            token: Token::end_marker(),
            expected: expected_terminals(grammar, table, states.last().unwrap().0),
        })?;
        let lookahead = grammar.symbols().lookup(&token.terminal).ok_or_else(|| ParseError::UnknownTerminal {
            offset,
            terminal: token.terminal.clone(),
        })?;

        let current_state = states.last().unwrap().0;
        let action = table.action(current_state, lookahead).ok_or_else(|| ParseError::UnexpectedToken {
            state: current_state,
            offset,
            token: token.clone(),
            expected: expected_terminals(grammar, table, current_state),
        })?;

        match action {
            Action::Shift(target) => {
                log::debug!("state {}: shift '{}' -> state {}", current_state, token.terminal, target);
                states.push((target, SyntaxTree::Leaf(token.clone())));
                offset += 1;
            }
            Action::Reduce { head, rule_index } => {
                let rule = grammar
                    .rule(head, rule_index)
                    .expect("action table only references rules that exist in this grammar");
                let arity = if rule.is_epsilon() { 0 } else { rule.body().len() };

                log::debug!(
                    "state {}: reduce by {}",
                    current_state,
                    grammar.display_rule(head, rule)
                );

                let mut children = Vec::with_capacity(arity);
                for _ in 0..arity {
                    let (_, subtree) = states.pop().expect("reduction arity never exceeds stack depth");
                    children.push(subtree);
                }
                let node = SyntaxTree::Node { label: head, children };

                let goto_state = states.last().unwrap().0;
                let next_state = table.goto(goto_state, head).ok_or_else(|| ParseError::MissingGoto {
                    state: goto_state,
                    nonterminal: grammar.get_symbol_name(head).to_string(),
                })?;
                states.push((next_state, node));
            }
            Action::Accept => {
                let (_, mut root) = states.pop().expect("accept only fires once a node has been pushed");
                root.reverse_children();
                return Ok(root);
            }
        }
    }
}

/// The stack starts with a dummy frame under the start state; its tree
/// slot is never read since the first action is always a shift or a
/// reduce over an epsilon production, both of which only look at the
/// *state*, not this placeholder's contents.
fn placeholder_root() -> SyntaxTree {
    SyntaxTree::Node {
        label: Symbol::AugmentedStart,
        children: Vec::new(),
    }
}

fn expected_terminals(grammar: &Grammar, table: &ActionGotoTable, state: usize) -> Vec<String> {
    let mut names: Vec<String> = table
        .actions()
        .filter(|(s, _, _)| *s == state)
        .map(|(_, symbol, _)| grammar.get_symbol_name(symbol).to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}
