//! A minimal, ordered-pattern lexer. Secondary to the parser: it
//! exists so the workspace has something to feed
//! [`lr1_driver::parse`] tokens from, not as a general tokenizing
//! toolkit. Patterns are matched in declaration order; the first
//! pattern that matches at the current offset wins, regardless of how
//! long its match is, with no maximal-munch tie-breaking.

use std::error::Error;
use std::fmt::{self, Display};

use regex::Regex;

use lr1_symbols::{TerminalKind, Token};

/// One lexical rule: an anchored pattern (callers are expected to
/// prefix patterns with `^`, as every pattern in the system this lexer
/// is modeled on does), the grammar terminal name it produces, and a
/// classification tag.
pub struct PatternRule {
    pattern: Regex,
    terminal: String,
    kind: TerminalKind,
}

impl PatternRule {
    pub fn new(pattern: &str, terminal: impl Into<String>, kind: TerminalKind) -> Result<Self, LexError> {
        let pattern = Regex::new(pattern).map_err(|source| LexError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(PatternRule {
            pattern,
            terminal: terminal.into(),
            kind,
        })
    }
}

#[derive(Debug)]
pub enum LexError {
    InvalidPattern { pattern: String, source: regex::Error },
    /// No pattern matched at `offset`, and the lexer was built with
    /// [`Lexer::new`] (fail-fast mode) rather than [`Lexer::permissive`].
    NoMatchingPattern { offset: usize },
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern '{}': {}", pattern, source)
            }
            LexError::NoMatchingPattern { offset } => {
                write!(f, "no pattern matches input at offset {}", offset)
            }
        }
    }
}

impl Error for LexError {}

/// The fallback behavior for input no pattern matches.
enum Fallback {
    /// Fail immediately with [`LexError::NoMatchingPattern`].
    FailFast,
    /// Consume exactly one character as a token of this terminal/kind
    /// and keep going, letting a caller do error-recovery-style lexing
    /// instead of aborting on the first bad character.
    ConsumeOne { terminal: String, kind: TerminalKind },
}

/// Tokenizes input text against an ordered list of patterns.
/// Construct with [`Lexer::new`] (fail on unmatched input) or
/// [`Lexer::permissive`] (skip one character and continue).
pub struct Lexer {
    rules: Vec<PatternRule>,
    fallback: Fallback,
}

impl Lexer {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Lexer {
            rules,
            fallback: Fallback::FailFast,
        }
    }

    /// Like [`Lexer::new`], but unmatched input is consumed one
    /// character at a time and reported as tokens of `terminal`/`kind`
    /// rather than failing the whole tokenization.
    pub fn permissive(rules: Vec<PatternRule>, terminal: impl Into<String>, kind: TerminalKind) -> Self {
        Lexer {
            rules,
            fallback: Fallback::ConsumeOne {
                terminal: terminal.into(),
                kind,
            },
        }
    }

    /// Finds the highest-priority pattern that matches at `offset` and
    /// returns the token it produces, or `None` if none of the
    /// patterns match there.
    fn next_match(&self, text: &str, offset: usize) -> Option<Token> {
        let remaining = &text[offset..];
        for rule in &self.rules {
            if let Some(found) = rule.pattern.find(remaining) {
                if found.start() == 0 && !found.as_str().is_empty() {
                    return Some(Token::new(found.as_str(), rule.terminal.clone(), rule.kind));
                }
            }
        }
        None
    }

    /// Tokenizes the whole of `text`, always appending a trailing
    /// [`Token::end_marker`]. Tokens whose `kind` is in `skip` are
    /// dropped from the result (but still advance the offset),
    /// generalizing the original system's whitespace/comment-skipping
    /// toggle to an arbitrary set of kinds.
    pub fn tokenize(&self, text: &str, skip: &[TerminalKind]) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut offset = 0usize;

        while offset < text.len() {
            match self.next_match(text, offset) {
                Some(token) => {
                    offset += token.lexeme.len();
                    if !skip.contains(&token.kind) {
                        tokens.push(token);
                    }
                }
                None => match &self.fallback {
                    Fallback::FailFast => return Err(LexError::NoMatchingPattern { offset }),
                    Fallback::ConsumeOne { terminal, kind } => {
                        let ch_len = text[offset..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
                        let lexeme = &text[offset..offset + ch_len];
                        log::debug!("lexer: no pattern matched at offset {}, consuming '{}'", offset, lexeme);
                        if !skip.contains(kind) {
                            tokens.push(Token::new(lexeme, terminal.clone(), *kind));
                        }
                        offset += ch_len;
                    }
                },
            }
        }

        tokens.push(Token::end_marker());
        Ok(tokens)
    }
}
