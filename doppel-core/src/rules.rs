//! Colour-mapping rules: the legality table for edge endpoints.
//!
//! The rule table itself is produced by an external collaborator (for
//! instance from typed reference data); this module defines the trait the
//! synthesizer consumes plus an in-memory table for callers and tests.

use std::collections::{HashMap, HashSet};

use crate::colour::ColourKey;

/// The legality table defining which `(tail, edge, head)` colour
/// combinations are permitted.
pub trait ColourRules {
    /// Tail colours admissible for edges of `edge_colour`.
    fn tail_colours(&self, edge_colour: ColourKey) -> HashSet<ColourKey>;

    /// Head colours admissible for edges of `edge_colour`.
    fn head_colours(&self, edge_colour: ColourKey) -> HashSet<ColourKey>;

    /// Head colours compatible with `tail_colour`, further narrowed by the
    /// edge colour when one is supplied.
    fn compatible_head_colours(
        &self,
        tail_colour: ColourKey,
        edge_colour: Option<ColourKey>,
    ) -> HashSet<ColourKey>;

    /// Returns `true` when the full triple is legal.
    fn can_connect(&self, tail_colour: ColourKey, head_colour: ColourKey, edge_colour: ColourKey)
    -> bool;
}

/// An in-memory [`ColourRules`] implementation built from legal triples.
///
/// # Examples
/// ```
/// use doppel_core::{ColourKey, ColourRuleTable, ColourRules};
///
/// let person = ColourKey::from_flag(0);
/// let city = ColourKey::from_flag(1);
/// let lives_in = ColourKey::from_flag(4);
/// let mut table = ColourRuleTable::new();
/// table.add_rule(person, lives_in, city);
/// assert!(table.can_connect(person, city, lives_in));
/// assert!(!table.can_connect(city, person, lives_in));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColourRuleTable {
    tails_by_edge: HashMap<ColourKey, HashSet<ColourKey>>,
    heads_by_edge: HashMap<ColourKey, HashSet<ColourKey>>,
    heads_by_tail: HashMap<ColourKey, HashSet<ColourKey>>,
    heads_by_tail_and_edge: HashMap<(ColourKey, ColourKey), HashSet<ColourKey>>,
    legal_triples: HashSet<(ColourKey, ColourKey, ColourKey)>,
}

impl ColourRuleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `(tail, edge, head)` as a legal combination.
    pub fn add_rule(&mut self, tail: ColourKey, edge: ColourKey, head: ColourKey) {
        self.tails_by_edge.entry(edge).or_default().insert(tail);
        self.heads_by_edge.entry(edge).or_default().insert(head);
        self.heads_by_tail.entry(tail).or_default().insert(head);
        self.heads_by_tail_and_edge
            .entry((tail, edge))
            .or_default()
            .insert(head);
        self.legal_triples.insert((tail, edge, head));
    }

    /// Returns the edge colours that have at least one rule.
    ///
    /// Sorted by bit pattern so iteration order is stable.
    #[must_use]
    pub fn edge_colours(&self) -> Vec<ColourKey> {
        let mut colours: Vec<ColourKey> = self.tails_by_edge.keys().copied().collect();
        colours.sort_unstable_by_key(|colour| colour.bits());
        colours
    }
}

impl ColourRules for ColourRuleTable {
    fn tail_colours(&self, edge_colour: ColourKey) -> HashSet<ColourKey> {
        self.tails_by_edge
            .get(&edge_colour)
            .cloned()
            .unwrap_or_default()
    }

    fn head_colours(&self, edge_colour: ColourKey) -> HashSet<ColourKey> {
        self.heads_by_edge
            .get(&edge_colour)
            .cloned()
            .unwrap_or_default()
    }

    fn compatible_head_colours(
        &self,
        tail_colour: ColourKey,
        edge_colour: Option<ColourKey>,
    ) -> HashSet<ColourKey> {
        match edge_colour {
            Some(edge) => self
                .heads_by_tail_and_edge
                .get(&(tail_colour, edge))
                .cloned()
                .unwrap_or_default(),
            None => self
                .heads_by_tail
                .get(&tail_colour)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn can_connect(
        &self,
        tail_colour: ColourKey,
        head_colour: ColourKey,
        edge_colour: ColourKey,
    ) -> bool {
        self.legal_triples
            .contains(&(tail_colour, edge_colour, head_colour))
    }
}
