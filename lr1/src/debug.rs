//! Plain-text dumps of a grammar, a parser table, and a syntax tree.
//! Formats are stable across runs for the same grammar (state numbering
//! is deterministic, see `lr1_automaton::build_canonical_collection`),
//! which makes them usable as golden output in tests.

use std::fmt::Write as _;

use lr1_driver::SyntaxTree;
use lr1_grammar::Grammar;
use lr1_tables::ActionGotoTable;

/// Numbers every rule in declaration order and renders `head -> body`.
pub fn dump_grammar(grammar: &Grammar) -> String {
    let mut out = String::new();
    writeln!(out, "start: {}", grammar.get_symbol_name(grammar.original_start())).unwrap();
    let user_rules = grammar
        .rules()
        .filter(|(head, _, _)| *head != lr1_symbols::Symbol::AugmentedStart);
    for (index, (head, _rule_index, rule)) in user_rules.enumerate() {
        writeln!(out, "{}: {}", index, grammar.display_rule(head, rule)).unwrap();
    }
    out
}

/// One line per non-empty ACTION/GOTO cell: `state  symbol  action`.
/// Shift actions render as `sN`, reduce as `r<head>:<rule_index>`,
/// accept as `acc`, and goto transitions as `gN`.
pub fn dump_table(grammar: &Grammar, table: &ActionGotoTable) -> String {
    let mut out = String::new();
    let mut actions: Vec<(usize, String, String)> = table
        .actions()
        .map(|(state, symbol, action)| {
            let rendered = match action {
                lr1_tables::Action::Shift(target) => format!("s{}", target),
                lr1_tables::Action::Reduce { head, rule_index } => {
                    format!("r{}:{}", grammar.get_symbol_name(head), rule_index)
                }
                lr1_tables::Action::Accept => "acc".to_string(),
            };
            (state, grammar.get_symbol_name(symbol).to_string(), rendered)
        })
        .collect();
    actions.extend(
        table
            .gotos()
            .map(|(state, symbol, target)| (state, grammar.get_symbol_name(symbol).to_string(), format!("g{}", target))),
    );
    actions.sort();
    for (state, symbol, rendered) in actions {
        writeln!(out, "{}\t{}\t{}", state, symbol, rendered).unwrap();
    }
    out
}

/// Indented tree dump via [`SyntaxTree::display`]: 3 spaces per level,
/// a `|` marking every level, pre-order.
pub fn dump_tree(grammar: &Grammar, tree: &SyntaxTree) -> String {
    format!("{}", tree.display(grammar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr1_driver::parse;
    use lr1_grammar::{compute_first_sets, GrammarBuilder, RuleDecl};
    use lr1_symbols::{TerminalKind, Token};
    use lr1_tables::generate_table;

    fn arithmetic_grammar() -> Grammar {
        GrammarBuilder::new(
            "E",
            vec![
                RuleDecl::new("E", vec![vec!["E".into(), "+".into(), "T".into()], vec!["T".into()]]),
                RuleDecl::new("T", vec![vec!["T".into(), "*".into(), "F".into()], vec!["F".into()]]),
                RuleDecl::new(
                    "F",
                    vec![vec!["(".into(), "E".into(), ")".into()], vec!["id".into()]],
                ),
            ],
        )
        .augment(true)
        .build()
        .unwrap()
    }

    #[test]
    fn grammar_dump_numbers_rules_and_omits_augmented_head() {
        let grammar = arithmetic_grammar();
        let dump = dump_grammar(&grammar);
        assert!(dump.starts_with("start: E\n"));
        assert!(dump.contains("E -> E + T"));
        assert!(!dump.contains("AUGMENTED_START"));
    }

    #[test]
    fn table_dump_has_one_line_per_cell() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let table = generate_table(&grammar, &first_sets).unwrap();
        let dump = dump_table(&grammar, &table);
        let line_count = dump.lines().count();
        let cell_count = table.actions().count() + table.gotos().count();
        assert_eq!(line_count, cell_count);
        assert!(dump.lines().all(|line| line.split('\t').count() == 3));
    }

    #[test]
    fn tree_dump_indents_three_spaces_per_level_with_a_pipe() {
        let grammar = arithmetic_grammar();
        let first_sets = compute_first_sets(&grammar);
        let table = generate_table(&grammar, &first_sets).unwrap();
        let tokens = vec![Token::new("id", "id", TerminalKind::Identifier), Token::end_marker()];
        let tree = parse(&grammar, &table, &tokens).unwrap();
        let dump = dump_tree(&grammar, &tree);

        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "AUGMENTED_START");
        assert!(lines.iter().any(|l| l == &"|   E"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("|   |   |   |   ") && l.contains("id")));
    }
}
