use lr1::{
    compute_first_sets, generate_table, parse, Conflict, Grammar, GrammarBuilder, RuleDecl, SyntaxTree, TableError,
    TerminalKind, Token,
};

fn build(start: &str, decls: Vec<RuleDecl>) -> Grammar {
    GrammarBuilder::new(start, decls).augment(true).build().unwrap()
}

fn tok(lexeme: &str, terminal: &str) -> Token {
    Token::new(lexeme, terminal, TerminalKind::Punctuation)
}

fn label(tree: &SyntaxTree, grammar: &Grammar) -> String {
    tree.label(grammar)
}

/// Peels the `AUGMENTED_START` wrapper every accepted tree is rooted in
/// so the scenario tests below can assert on the grammar's own shape.
fn original_root(tree: &SyntaxTree) -> &SyntaxTree {
    assert_eq!(tree.children().len(), 1);
    &tree.children()[0]
}

fn arithmetic_grammar() -> Grammar {
    build(
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
}

#[test]
fn arithmetic_expression_parses_with_precedence_shape() {
    let grammar = arithmetic_grammar();
    let first_sets = compute_first_sets(&grammar);
    let table = generate_table(&grammar, &first_sets).unwrap();

    let tokens = vec![
        tok("id", "id"),
        tok("+", "+"),
        tok("id", "id"),
        tok("*", "*"),
        tok("id", "id"),
        Token::end_marker(),
    ];
    let tree = parse(&grammar, &table, &tokens).unwrap();

    assert_eq!(label(&tree, &grammar), "AUGMENTED_START");
    let root = original_root(&tree);

    // E( E( T( F(id) ) ) + T( T( F(id) ) * F(id) ) )
    assert_eq!(label(root, &grammar), "E");
    let children = root.children();
    assert_eq!(children.len(), 3);
    assert_eq!(label(&children[0], &grammar), "E");
    assert_eq!(label(&children[1], &grammar), "+");
    assert_eq!(label(&children[2], &grammar), "T");

    let inner_t = children[2].children();
    assert_eq!(inner_t.len(), 3);
    assert_eq!(label(&inner_t[0], &grammar), "T");
    assert_eq!(label(&inner_t[1], &grammar), "*");
    assert_eq!(label(&inner_t[2], &grammar), "F");
}

#[test]
fn epsilon_production_yields_empty_child_node() {
    let grammar = build(
        "S",
        vec![
            RuleDecl::new("S", vec![vec!["A".into(), "B".into()]]),
            RuleDecl::new("A", vec![vec!["a".into()], vec!["EPSILON".into()]]),
            RuleDecl::new("B", vec![vec!["b".into()]]),
        ],
    );
    let first_sets = compute_first_sets(&grammar);
    let table = generate_table(&grammar, &first_sets).unwrap();

    let tokens = vec![tok("b", "b"), Token::end_marker()];
    let tree = parse(&grammar, &table, &tokens).unwrap();

    let root = original_root(&tree);
    assert_eq!(label(root, &grammar), "S");
    let children = root.children();
    assert_eq!(children.len(), 2);
    assert_eq!(label(&children[0], &grammar), "A");
    assert!(children[0].children().is_empty());
    assert_eq!(label(&children[1], &grammar), "B");
}

#[test]
fn dangling_else_binds_to_nearest_if_via_shift_preference() {
    let grammar = build(
        "S",
        vec![
            RuleDecl::new(
                "S",
                vec![
                    vec!["if".into(), "E".into(), "then".into(), "S".into()],
                    vec![
                        "if".into(),
                        "E".into(),
                        "then".into(),
                        "S".into(),
                        "else".into(),
                        "S".into(),
                    ],
                    vec!["x".into()],
                ],
            ),
            RuleDecl::new("E", vec![vec!["y".into()]]),
        ],
    );
    let first_sets = compute_first_sets(&grammar);
    let table = generate_table(&grammar, &first_sets).unwrap();
    assert!(!table.resolved_conflicts().is_empty());

    // if y then if y then x else x
    let tokens = vec![
        tok("if", "if"),
        tok("y", "y"),
        tok("then", "then"),
        tok("if", "if"),
        tok("y", "y"),
        tok("then", "then"),
        tok("x", "x"),
        tok("else", "else"),
        tok("x", "x"),
        Token::end_marker(),
    ];
    let tree = parse(&grammar, &table, &tokens).unwrap();

    // outer S must be the 4-child "if E then S" form: the else binds inward.
    let root = original_root(&tree);
    assert_eq!(label(root, &grammar), "S");
    assert_eq!(root.children().len(), 4);
    let inner = &root.children()[3];
    assert_eq!(label(inner, &grammar), "S");
    assert_eq!(inner.children().len(), 6); // if E then S else S
}

#[test]
fn reduce_reduce_conflict_rejects_table_construction() {
    let grammar = build(
        "S",
        vec![
            RuleDecl::new("S", vec![vec!["A".into()], vec!["B".into()]]),
            RuleDecl::new("A", vec![vec!["a".into()]]),
            RuleDecl::new("B", vec![vec!["a".into()]]),
        ],
    );
    let first_sets = compute_first_sets(&grammar);
    let err = generate_table(&grammar, &first_sets).unwrap_err();
    match err {
        TableError::NotLR1(conflicts) => {
            assert!(conflicts.iter().any(|c| matches!(c, Conflict::ReduceReduce { .. })));
        }
        other => panic!("expected NotLR1, got {:?}", other),
    }
}

#[test]
fn augmented_grammar_root_wraps_original_start() {
    let grammar = arithmetic_grammar();
    let first_sets = compute_first_sets(&grammar);
    let table = generate_table(&grammar, &first_sets).unwrap();
    let tokens = vec![tok("id", "id"), Token::end_marker()];
    let tree = parse(&grammar, &table, &tokens).unwrap();

    assert_eq!(label(&tree, &grammar), "AUGMENTED_START");
    assert_eq!(tree.children().len(), 1);
    assert_eq!(label(&tree.children()[0], &grammar), grammar.get_symbol_name(grammar.original_start()));
}

#[test]
fn parse_error_reports_end_marker_and_expected_terminals() {
    let grammar = arithmetic_grammar();
    let first_sets = compute_first_sets(&grammar);
    let table = generate_table(&grammar, &first_sets).unwrap();

    // "id +" with nothing after: the driver hits ENDMARKER where it
    // still expects the start of another factor.
    let tokens = vec![tok("id", "id"), tok("+", "+"), Token::end_marker()];
    let err = parse(&grammar, &table, &tokens).unwrap_err();
    match err {
        lr1::ParseError::UnexpectedToken { token, expected, .. } => {
            assert_eq!(token.terminal, "ENDMARKER");
            assert!(expected.iter().any(|e| e == "id"));
            assert!(expected.iter().any(|e| e == "("));
        }
        other => panic!("expected UnexpectedToken, got {:?}", other),
    }
}

#[test]
fn lexer_precedence_prefers_longer_keyword_and_operator_patterns() {
    use lr1::{Lexer, PatternRule};

    let lexer = Lexer::new(vec![
        PatternRule::new(r"^var\b", "var", TerminalKind::Keyword).unwrap(),
        PatternRule::new(r"^[A-Za-z_]\w*", "id", TerminalKind::Identifier).unwrap(),
        PatternRule::new(r"^==", "==", TerminalKind::Operator).unwrap(),
        PatternRule::new(r"^=", "=", TerminalKind::Operator).unwrap(),
        PatternRule::new(r"^\s+", "WS", TerminalKind::Whitespace).unwrap(),
    ]);

    let tokens = lexer.tokenize("var count ==", &[TerminalKind::Whitespace]).unwrap();
    let terminals: Vec<&str> = tokens.iter().map(|t| t.terminal.as_str()).collect();
    assert_eq!(terminals[0], "var");
    assert_eq!(terminals[1], "id");
    assert_eq!(terminals[2], "==");
}
