//! The implementation of the canonical LR(1) automaton.

use crate::{
    first_sets::FirstSets,
    grammar::{Grammar, RuleID, Symbol, TerminalSet},
    types::{Map, Set},
    util::display_fn,
};
use std::{
    collections::{btree_map, BTreeMap, BTreeSet, VecDeque},
    fmt,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID {
    raw: u32,
}

impl StateID {
    pub const START: Self = Self::new(0);

    #[inline]
    const fn new(raw: u32) -> Self {
        Self { raw }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.raw as usize
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

// An LR(1) item core: a rule together with a marker position in its
// right-hand side. The associated lookahead set is kept separately as the
// item-set map value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ItemCore {
    pub(crate) rule: RuleID,
    pub(crate) marker: usize,
}

impl ItemCore {
    fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(|f| {
            let rule = g.rule(self.rule);
            write!(f, "({} :=", rule.left())?;
            for (i, symbol) in rule.right().iter().enumerate() {
                if i == self.marker {
                    f.write_str(" .")?;
                }
                write!(f, " {}", symbol)?;
            }
            if self.marker == rule.right().len() {
                f.write_str(" .")?;
            }
            f.write_str(")")
        })
    }
}

//  - key: item core
//  - value: the lookahead terminals attached to it
type ItemSet = BTreeMap<ItemCore, TerminalSet>;
type ItemCores = BTreeSet<ItemCore>;

/// A state of the automaton: a closed LR(1) item set together with its
/// outgoing transitions.
#[derive(Debug)]
pub struct State {
    item_set: ItemSet,
    transitions: Map<Symbol, StateID>,
}

impl State {
    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, StateID)> + '_ {
        self.transitions.iter().map(|(symbol, id)| (*symbol, *id))
    }

    pub fn transition(&self, symbol: Symbol) -> Option<StateID> {
        self.transitions.get(&symbol).copied()
    }

    pub(crate) fn items(&self) -> impl Iterator<Item = (&ItemCore, &TerminalSet)> + '_ {
        self.item_set.iter()
    }
}

/// The canonical LR(1) automaton derived from a grammar.
#[derive(Debug)]
pub struct Automaton {
    states: Map<StateID, State>,
}

impl Automaton {
    pub fn generate(grammar: &Grammar) -> Self {
        let span = tracing::debug_span!("generate_automaton");
        let _entered = span.enter();

        let mut gen = Generator::new(grammar);
        gen.populate();
        let automaton = gen.finalize();
        tracing::debug!(states = automaton.state_count(), "automaton generated");
        automaton
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateID, &State)> + '_ {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn state(&self, id: StateID) -> &State {
        &self.states[&id]
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(|f| {
            for (i, (id, state)) in self.states().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "#### State {:02}", id)?;
                writeln!(f, "## item_set")?;
                for (core, lookaheads) in &state.item_set {
                    writeln!(f, "- {}  [{}]", core.display(g), lookaheads)?;
                }
                writeln!(f, "## transitions")?;
                for (symbol, target) in &state.transitions {
                    writeln!(f, "- {} => {:02}", symbol, target)?;
                }
            }
            Ok(())
        })
    }
}

// === Generator ===

#[derive(Debug)]
struct PendingStates {
    next_id: u32,
    queue: VecDeque<(StateID, ItemSet, Option<StateID>)>,
}

impl PendingStates {
    /// Push an unexpanded item set into the queue, assigning a provisional id.
    fn enqueue(&mut self, item_set: ItemSet, prev_state: Option<StateID>) -> StateID {
        let id = StateID::new(self.next_id);
        self.next_id += 1;
        self.queue.push_back((id, item_set, prev_state));
        id
    }

    fn dequeue(&mut self) -> Option<(StateID, ItemSet, Option<StateID>)> {
        self.queue.pop_front()
    }
}

#[derive(Debug)]
struct Generator<'g> {
    grammar: &'g Grammar,
    first_sets: FirstSets,
    pending: PendingStates,
    states: Map<StateID, (ItemSet, Map<Symbol, StateID>)>,
    same_cores: Map<ItemCores, Set<StateID>>,
}

impl<'g> Generator<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut pending = PendingStates {
            next_id: 1,
            queue: VecDeque::new(),
        };
        let mut item_set = ItemSet::new();
        item_set.insert(
            ItemCore {
                rule: RuleID::ACCEPT,
                marker: 0,
            },
            [Symbol::Eoi].into_iter().collect(),
        );
        pending.queue.push_back((StateID::START, item_set, None));

        Self {
            grammar,
            first_sets: FirstSets::new(grammar),
            pending,
            states: Map::default(),
            same_cores: Map::default(),
        }
    }

    /// Expand an item set to its LR(1) closure, in place.
    ///
    /// For every item `[A := alpha . B beta]` with lookaheads `L` and every
    /// rule `B := gamma`, the item `[B := . gamma]` is added with the
    /// lookaheads `First(beta)`, or `L` itself when `beta` is empty. Newly
    /// added items may trigger further expansion, so this repeats until
    /// nothing changes.
    fn expand_closure(&self, items: &mut ItemSet) {
        let mut changed = true;
        while changed {
            changed = false;

            let mut added: Map<ItemCore, TerminalSet> = Map::default();
            for (core, lookaheads) in items.iter() {
                let rule = self.grammar.rule(core.rule);

                // [A := ... . B beta] with B nonterminal
                let (succ, beta) = match &rule.right()[core.marker..] {
                    [succ, beta @ ..] if !succ.is_terminal() => (*succ, beta),
                    _ => continue,
                };

                let first = self.first_sets.get(beta, lookaheads);
                for &rule_id in self.grammar.rules_with_left(succ) {
                    added
                        .entry(ItemCore {
                            rule: rule_id,
                            marker: 0,
                        })
                        .or_default()
                        .union_with(&first);
                }
            }

            for (core, lookaheads) in added {
                match items.entry(core) {
                    btree_map::Entry::Vacant(entry) => {
                        entry.insert(lookaheads);
                        changed = true;
                    }
                    btree_map::Entry::Occupied(mut entry) => {
                        let set = entry.get_mut();
                        let before = set.len();
                        set.union_with(&lookaheads);
                        changed |= set.len() != before;
                    }
                }
            }
        }
    }

    /// Extract the unexpanded successor item set for every symbol that
    /// appears immediately after a marker.
    fn advance(&self, items: &ItemSet) -> Map<Symbol, ItemSet> {
        let mut successors: Map<Symbol, ItemSet> = Map::default();
        for (core, lookaheads) in items {
            let rule = self.grammar.rule(core.rule);
            if core.marker >= rule.right().len() {
                continue;
            }
            let label = rule.right()[core.marker];
            successors.entry(label).or_default().insert(
                ItemCore {
                    marker: core.marker + 1,
                    ..*core
                },
                lookaheads.clone(),
            );
        }
        successors
    }

    fn populate(&mut self) {
        'dequeue: while let Some((new_id, mut item_set, prev_state)) = self.pending.dequeue() {
            self.expand_closure(&mut item_set);

            let cores: ItemCores = item_set.keys().copied().collect();

            // Canonical LR(1): a registered state is reused only when its
            // lookahead sets match exactly, never merged.
            if let Some(candidates) = self.same_cores.get(&cores) {
                for &orig_id in candidates {
                    if self.states[&orig_id].0 == item_set {
                        // The provisional id is already recorded in the
                        // predecessor's edges; point them at the original.
                        if let Some(prev_id) = prev_state {
                            let prev = &mut self.states[&prev_id];
                            for edge in prev.1.values_mut() {
                                if *edge == new_id {
                                    *edge = orig_id;
                                }
                            }
                        }
                        continue 'dequeue;
                    }
                }
            }

            let mut edges = Map::default();
            for (symbol, successor) in self.advance(&item_set) {
                let id = self.pending.enqueue(successor, Some(new_id));
                edges.insert(symbol, id);
            }

            tracing::trace!(id = %new_id, items = item_set.len(), "register state");
            self.states.insert(new_id, (item_set, edges));
            self.same_cores.entry(cores).or_default().insert(new_id);
        }
    }

    fn finalize(self) -> Automaton {
        // Discarded duplicates leave holes in the id sequence; compress to
        // a dense range with the start state staying at 0.
        let mut new_ids = Map::default();
        for (position, &id) in self.states.keys().enumerate() {
            new_ids.insert(id, StateID::new(position as u32));
        }

        let mut states = Map::default();
        for (id, (item_set, edges)) in self.states {
            let transitions = edges
                .into_iter()
                .map(|(symbol, target)| (symbol, new_ids[&target]))
                .collect();
            states.insert(
                new_ids[&id],
                State {
                    item_set,
                    transitions,
                },
            );
        }

        Automaton { states }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    // The two-rule textbook grammar whose canonical collection is known to
    // have ten states:
    //
    //   expression := constant constant
    //   constant   := integer-constant constant | character-constant
    fn two_constants() -> Grammar {
        Grammar::new(
            Expression,
            [
                (Expression, vec![Constant, Constant]),
                (Constant, vec![IntegerConstant, Constant]),
                (Constant, vec![CharacterConstant]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn smoketest() {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init()
            .ok();

        let grammar = arithmetic();
        eprintln!("{}", grammar);

        let automaton = Automaton::generate(&grammar);
        eprintln!("Automaton:\n---\n{}", automaton.display(&grammar));

        assert!(automaton.state_count() > 1);
    }

    #[test]
    fn canonical_collection_of_the_textbook_grammar() {
        let grammar = two_constants();
        let automaton = Automaton::generate(&grammar);
        assert_eq!(automaton.state_count(), 10);
    }

    #[test]
    fn states_with_equal_cores_stay_split_on_lookaheads() {
        let grammar = two_constants();
        let automaton = Automaton::generate(&grammar);

        let mut by_cores: Map<ItemCores, Vec<StateID>> = Map::default();
        for (id, state) in automaton.states() {
            let cores: ItemCores = state.items().map(|(core, _)| *core).collect();
            by_cores.entry(cores).or_default().push(id);
        }

        // the canonical construction keeps lookahead-distinct twins apart
        assert!(
            by_cores.values().any(|ids| ids.len() > 1),
            "expected at least one pair of states sharing an LR(0) core"
        );
    }

    #[test]
    fn state_item_sets_are_unique() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);

        let states: Vec<_> = automaton.states().collect();
        for (i, (_, a)) in states.iter().enumerate() {
            for (_, b) in &states[i + 1..] {
                assert_ne!(a.item_set, b.item_set);
            }
        }
    }

    #[test]
    fn state_item_sets_are_closed() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);

        let gen = Generator::new(&grammar);
        for (id, state) in automaton.states() {
            let mut expanded = state.item_set.clone();
            gen.expand_closure(&mut expanded);
            assert_eq!(expanded, state.item_set, "state {} is not closed", id);
        }
    }

    #[test]
    fn transitions_never_leave_on_reserved_symbols() {
        let grammar = arithmetic();
        let automaton = Automaton::generate(&grammar);

        for (_, state) in automaton.states() {
            assert!(state.transition(Eoi).is_none());
            assert!(state.transition(Start).is_none());
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let grammar = arithmetic();
        let first = Automaton::generate(&grammar);
        let second = Automaton::generate(&grammar);

        assert_eq!(first.state_count(), second.state_count());
        for ((id_a, a), (id_b, b)) in first.states().zip(second.states()) {
            assert_eq!(id_a, id_b);
            assert_eq!(a.item_set, b.item_set);
            assert_eq!(
                a.transitions().collect::<Vec<_>>(),
                b.transitions().collect::<Vec<_>>()
            );
        }
    }
}
