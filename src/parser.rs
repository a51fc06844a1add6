//! The table-driven shift-reduce parser.

use crate::{
    grammar::{Grammar, Symbol},
    lr1::StateID,
    parse_table::{Action, ParseTable},
    token::{self, Token, TokenKind},
};

/// A node of the concrete syntax tree.
///
/// Leaves borrow the tokens they were shifted from, so the token stream
/// must outlive the tree.
#[derive(Debug)]
pub enum ParseNode<'t> {
    /// A leaf wrapping a shifted token.
    Terminal(&'t Token),

    /// An interior node created by a reduction, with its children in
    /// left-to-right grammar order.
    Nonterminal {
        symbol: Symbol,
        children: Vec<ParseNode<'t>>,
    },
}

impl<'t> ParseNode<'t> {
    /// The grammar symbol this node derives.
    pub fn symbol(&self) -> Symbol {
        match self {
            ParseNode::Terminal(token) => token::terminal_symbol(token.kind),
            ParseNode::Nonterminal { symbol, .. } => *symbol,
        }
    }

    pub fn children(&self) -> &[ParseNode<'t>] {
        match self {
            ParseNode::Terminal(..) => &[],
            ParseNode::Nonterminal { children, .. } => children,
        }
    }

    /// The source token of a leaf node.
    pub fn token(&self) -> Option<&'t Token> {
        match self {
            ParseNode::Terminal(token) => Some(token),
            ParseNode::Nonterminal { .. } => None,
        }
    }

    /// The leaf tokens of this subtree, left to right.
    pub fn leaves(&self) -> Vec<&'t Token> {
        fn collect<'t>(node: &ParseNode<'t>, out: &mut Vec<&'t Token>) {
            match node {
                ParseNode::Terminal(token) => out.push(token),
                ParseNode::Nonterminal { children, .. } => {
                    for child in children {
                        collect(child, out);
                    }
                }
            }
        }
        let mut out = vec![];
        collect(self, &mut out);
        out
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// The table has no action for the current state and token.
    #[error("unexpected token `{token}` in state {state}")]
    UnexpectedToken { token: Token, state: StateID },

    /// The input ended while the table still expected more of it.
    #[error("unexpected end of input in state {state}")]
    UnexpectedEoi { state: StateID },
}

/// The parser driven by a generated parse table.
#[derive(Debug, Copy, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    table: &'g ParseTable,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar, table: &'g ParseTable) -> Self {
        Self { grammar, table }
    }

    /// Drive the table over a token stream and materialize the parse tree.
    ///
    /// The stream is expected to end with a [`TokenKind::Eof`] token; a
    /// stream that simply runs out is treated the same way. On the first
    /// state/token pair with no table entry the parse stops and the
    /// offending token and state are reported. No recovery is attempted.
    pub fn parse<'t>(&self, tokens: &'t [Token]) -> Result<ParseNode<'t>, ParseError> {
        let span = tracing::trace_span!("parse");
        let _entered = span.enter();

        let mut state_stack = vec![self.table.initial_state()];
        let mut node_stack: Vec<ParseNode<'t>> = vec![];
        let mut position = 0;

        loop {
            let current = *state_stack.last().unwrap();
            let (lookahead, token) = match tokens.get(position) {
                Some(token) => (token::terminal_symbol(token.kind), Some(token)),
                None => (Symbol::Eoi, None),
            };

            match self.table.action(current, lookahead) {
                Action::Shift(next) => {
                    // no shift action exists on the $end column
                    let token = token.unwrap();
                    tracing::trace!(%token, from = %current, to = %next, "shift");
                    node_stack.push(ParseNode::Terminal(token));
                    state_stack.push(next);
                    position += 1;
                }

                Action::Reduce(rule_id) => {
                    let rule = self.grammar.rule(rule_id);
                    let arity = rule.right().len();
                    tracing::trace!(rule = %rule, "reduce");

                    // the popped frames become the children, in order
                    let children = node_stack.split_off(node_stack.len() - arity);
                    state_stack.truncate(state_stack.len() - arity);

                    let top = *state_stack.last().unwrap();
                    match self.table.action(top, rule.left()) {
                        Action::Goto(next) => {
                            node_stack.push(ParseNode::Nonterminal {
                                symbol: rule.left(),
                                children,
                            });
                            state_stack.push(next);
                        }
                        action => unreachable!(
                            "broken table: {:?} for {} in state {}",
                            action,
                            rule.left(),
                            top
                        ),
                    }
                }

                Action::Accept => {
                    tracing::trace!("accept");
                    let root = node_stack.pop().unwrap();
                    debug_assert!(node_stack.is_empty());
                    return Ok(root);
                }

                Action::Goto(..) | Action::Error => {
                    return Err(match token {
                        Some(token) if token.kind != TokenKind::Eof => {
                            ParseError::UnexpectedToken {
                                token: token.clone(),
                                state: current,
                            }
                        }
                        _ => ParseError::UnexpectedEoi { state: current },
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lr1::Automaton, parse_table::ParseTable};
    use Symbol::*;

    fn arithmetic() -> Grammar {
        Grammar::new(
            AdditiveExpression,
            [
                (
                    AdditiveExpression,
                    vec![AdditiveExpression, Plus, MultiplicativeExpression],
                ),
                (AdditiveExpression, vec![MultiplicativeExpression]),
                (
                    MultiplicativeExpression,
                    vec![MultiplicativeExpression, Star, PrimaryExpression],
                ),
                (MultiplicativeExpression, vec![PrimaryExpression]),
                (PrimaryExpression, vec![IntegerConstant]),
                (PrimaryExpression, vec![LParen, AdditiveExpression, RParen]),
            ],
        )
        .unwrap()
    }

    fn tokens(kinds: &[TokenKind]) -> Vec<Token> {
        kinds.iter().copied().map(Token::new).collect()
    }

    #[test]
    fn parses_with_precedence_shape() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);
        let table = ParseTable::generate(&grammar, &automaton);
        let parser = Parser::new(&grammar, &table);

        // 1 + 2 * 3
        let input = tokens(&[
            TokenKind::IntegerConstant,
            TokenKind::Plus,
            TokenKind::IntegerConstant,
            TokenKind::Star,
            TokenKind::IntegerConstant,
            TokenKind::Eof,
        ]);
        let tree = parser.parse(&input).unwrap();

        // the root reduction is the additive one; `*` bound tighter
        assert_eq!(tree.symbol(), AdditiveExpression);
        let children = tree.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].symbol(), AdditiveExpression);
        assert_eq!(children[1].symbol(), Plus);
        assert_eq!(children[2].symbol(), MultiplicativeExpression);
        assert_eq!(children[2].children().len(), 3);

        // the leaves replay the input, minus the end-of-input token
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), input.len() - 1);
        for (leaf, token) in leaves.iter().zip(&input) {
            assert_eq!(leaf.kind, token.kind);
        }
    }

    #[test]
    fn stream_without_explicit_eof_token() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);
        let table = ParseTable::generate(&grammar, &automaton);
        let parser = Parser::new(&grammar, &table);

        let input = tokens(&[TokenKind::IntegerConstant]);
        let tree = parser.parse(&input).unwrap();
        assert_eq!(tree.symbol(), AdditiveExpression);
    }

    #[test]
    fn reports_offending_token_and_state() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);
        let table = ParseTable::generate(&grammar, &automaton);
        let parser = Parser::new(&grammar, &table);

        let input = tokens(&[
            TokenKind::IntegerConstant,
            TokenKind::RParen,
            TokenKind::Eof,
        ]);
        match parser.parse(&input) {
            Err(ParseError::UnexpectedToken { token, .. }) => {
                assert_eq!(token.kind, TokenKind::RParen);
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }

        let truncated = tokens(&[TokenKind::IntegerConstant, TokenKind::Plus, TokenKind::Eof]);
        assert!(matches!(
            parser.parse(&truncated),
            Err(ParseError::UnexpectedEoi { .. })
        ));

        // empty input: only the end-of-input token
        assert!(matches!(
            parser.parse(&tokens(&[TokenKind::Eof])),
            Err(ParseError::UnexpectedEoi { .. })
        ));
    }
}
