//! Calculation of the first-set function.

use crate::grammar::{Grammar, Symbol, TerminalSet};

/// `FIRST` for every symbol of the alphabet, computed once per grammar.
///
/// Left-recursive rule sets make the obvious recursion cyclic, so the sets
/// are solved as subset constraints (`FIRST(left) ⊇ FIRST(right[0])`)
/// iterated to a fixed point. Rules never have empty right-hand sides, so
/// the first set of a sentential prefix is the first set of its leading
/// symbol and nothing propagates past it.
#[derive(Debug)]
pub struct FirstSets {
    map: Vec<TerminalSet>,
}

impl FirstSets {
    pub fn new(grammar: &Grammar) -> Self {
        // First(t) = {t} for terminals, First(N) = {} initially
        let mut map = vec![TerminalSet::new(); Symbol::COUNT];
        for terminal in Symbol::terminals() {
            map[terminal.index()].insert(terminal);
        }

        let mut constraints = vec![];
        for (_id, rule) in grammar.rules() {
            let leading = rule.right()[0];
            if leading != rule.left() {
                constraints.push((rule.left(), leading));
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &(sup, sub) in &constraints {
                let subset = map[sub.index()].clone();
                let superset = &mut map[sup.index()];
                let before = superset.len();
                superset.union_with(&subset);
                changed |= superset.len() != before;
            }
        }

        Self { map }
    }

    /// `First(symbol)`
    pub fn first(&self, symbol: Symbol) -> &TerminalSet {
        &self.map[symbol.index()]
    }

    /// `First(prefix)`, falling back to the inherited lookaheads when the
    /// prefix is empty.
    pub fn get(&self, prefix: &[Symbol], inherited: &TerminalSet) -> TerminalSet {
        match prefix.first() {
            Some(&symbol) => self.first(symbol).clone(),
            None => inherited.clone(),
        }
    }
}
