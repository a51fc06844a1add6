//! Synthesis of the action/goto table from the automaton.

use crate::{
    grammar::{Grammar, RuleID, Symbol},
    lr1::{Automaton, StateID},
};

/// One cell of the parse table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Consume the lookahead terminal and transition to the state.
    Shift(StateID),

    /// Reduce by the rule, then follow the goto on its left-hand side.
    Reduce(RuleID),

    /// Transition taken on a nonterminal column after a reduction.
    Goto(StateID),

    /// Reduce by the accept rule: parsing is complete.
    Accept,

    /// No action is defined: a syntax error.
    Error,
}

/// The parse table: a dense matrix with one row per automaton state and one
/// column per grammar symbol. Once generated it is immutable and may be
/// shared freely between concurrent parses.
#[derive(Debug)]
pub struct ParseTable {
    cells: Box<[Action]>,
    state_count: usize,
}

impl ParseTable {
    pub fn generate(grammar: &Grammar, automaton: &Automaton) -> Self {
        let span = tracing::debug_span!("generate_parse_table");
        let _entered = span.enter();

        let state_count = automaton.state_count();
        let mut cells = vec![Action::Error; state_count * Symbol::COUNT].into_boxed_slice();

        // Reduce actions are installed first, shifts and gotos after,
        // overwriting. The overwrite order is the conflict policy: in a
        // shift/reduce cell the shift survives, which resolves the dangling
        // `else` toward the nearest `if`.
        for (id, state) in automaton.states() {
            let row = id.index() * Symbol::COUNT;
            for (core, lookaheads) in state.items() {
                let rule = grammar.rule(core.rule);
                if core.marker < rule.right().len() {
                    continue;
                }
                let action = if core.rule == RuleID::ACCEPT {
                    Action::Accept
                } else {
                    Action::Reduce(core.rule)
                };
                for lookahead in lookaheads.iter() {
                    let cell = &mut cells[row + lookahead.index()];
                    if let Action::Reduce(prev) = *cell {
                        if prev != core.rule {
                            tracing::debug!(
                                state = %id,
                                symbol = %lookahead,
                                "reduce/reduce conflict, keeping the later rule",
                            );
                        }
                    }
                    *cell = action;
                }
            }
        }

        for (id, state) in automaton.states() {
            let row = id.index() * Symbol::COUNT;
            for (symbol, target) in state.transitions() {
                let cell = &mut cells[row + symbol.index()];
                if let Action::Reduce(rule) = *cell {
                    tracing::debug!(
                        state = %id,
                        symbol = %symbol,
                        rule = %rule,
                        "shift/reduce conflict resolved toward shift",
                    );
                }
                *cell = if symbol.is_terminal() {
                    Action::Shift(target)
                } else {
                    Action::Goto(target)
                };
            }
        }

        tracing::debug!(
            states = state_count,
            cells = cells.len(),
            "parse table generated"
        );
        Self { cells, state_count }
    }

    /// The state the driver starts in.
    pub fn initial_state(&self) -> StateID {
        StateID::START
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// The action for a state and lookahead symbol.
    pub fn action(&self, state: StateID, symbol: Symbol) -> Action {
        self.cells[state.index() * Symbol::COUNT + symbol.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn build(grammar: &Grammar) -> (Automaton, ParseTable) {
        let automaton = Automaton::generate(grammar);
        let table = ParseTable::generate(grammar, &automaton);
        (automaton, table)
    }

    #[test]
    fn shifts_reduces_and_gotos_land_in_their_columns() {
        let grammar = Grammar::new(
            AdditiveExpression,
            [
                (
                    AdditiveExpression,
                    vec![AdditiveExpression, Plus, PrimaryExpression],
                ),
                (AdditiveExpression, vec![PrimaryExpression]),
                (PrimaryExpression, vec![IntegerConstant]),
            ],
        )
        .unwrap();
        let (automaton, table) = build(&grammar);

        let start = table.initial_state();
        assert!(matches!(table.action(start, IntegerConstant), Action::Shift(_)));
        assert!(matches!(
            table.action(start, AdditiveExpression),
            Action::Goto(_)
        ));
        assert_eq!(table.action(start, Plus), Action::Error);

        // after the whole input is reduced to the start symbol, $end accepts
        let accepting = automaton
            .state(start)
            .transition(AdditiveExpression)
            .unwrap();
        assert_eq!(table.action(accepting, Eoi), Action::Accept);
        assert!(matches!(table.action(accepting, Plus), Action::Shift(_)));
    }

    #[test]
    fn cells_respect_the_terminal_partition() {
        let grammar = crate::knr::grammar();
        let (automaton, table) = build(&grammar);
        assert_eq!(table.state_count(), automaton.state_count());

        for (id, _) in automaton.states() {
            for &symbol in Symbol::ALL {
                match table.action(id, symbol) {
                    Action::Shift(..) | Action::Reduce(..) | Action::Accept => {
                        assert!(symbol.is_terminal(), "{} row {}", symbol, id)
                    }
                    Action::Goto(..) => {
                        assert!(!symbol.is_terminal(), "{} row {}", symbol, id)
                    }
                    Action::Error => {}
                }
            }
        }
    }

    #[test]
    fn dangling_else_prefers_shift() {
        let grammar = Grammar::new(
            Statement,
            [
                (
                    Statement,
                    vec![KwIf, LParen, Expression, RParen, Statement],
                ),
                (
                    Statement,
                    vec![KwIf, LParen, Expression, RParen, Statement, KwElse, Statement],
                ),
                (Statement, vec![Semicolon]),
                (Expression, vec![Identifier]),
            ],
        )
        .unwrap();
        let (automaton, table) = build(&grammar);

        // find a state holding both the short-if completion and the pending
        // two-armed item, i.e. the shift/reduce conflict on `else`
        let conflicted = automaton
            .states()
            .find(|(_, state)| {
                let reduces = state.items().any(|(core, lookaheads)| {
                    core.marker == grammar.rule(core.rule).right().len()
                        && lookaheads.contains(KwElse)
                });
                reduces && state.transition(KwElse).is_some()
            })
            .map(|(id, _)| id)
            .expect("the grammar has a dangling-else state");

        assert!(matches!(table.action(conflicted, KwElse), Action::Shift(_)));
    }
}
