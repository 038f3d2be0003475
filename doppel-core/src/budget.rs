//! Degree budgets: per-vertex sampling weights approximating target degrees.
//!
//! For each admissible (edge-colour, role, vertex-colour) combination the
//! builder draws one Poisson sample per vertex with mean set to the
//! reference average degree, floors zero draws to 1 so no vertex is ever
//! starved, and wraps the result in a [`CategoricalProposer`] over vertex
//! ids. Budgets bias sampling toward the target distribution; they are not
//! hard caps, so repeated draws can over-select a vertex.

use std::collections::HashMap;

use rand::Rng;

use crate::{
    colour::ColourKey,
    graph::ColouredMultigraph,
    poisson::sample_poisson,
    proposer::{CategoricalProposer, DistributionError},
    reference::ReferenceDistributions,
    rules::ColourRules,
};

/// Errors raised while building degree budgets.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum BudgetError {
    /// The same (edge-colour, role, vertex-colour) combination was built
    /// twice. This indicates a collaborator bug and is reported rather than
    /// silently overwritten.
    #[error("duplicate degree budget for edge {edge}, role {role:?}, vertex colour {vertex}")]
    DuplicateBudget {
        /// Edge colour of the duplicate registration.
        edge: ColourKey,
        /// Sampling role of the duplicate registration.
        role: DegreeRole,
        /// Vertex colour of the duplicate registration.
        vertex: ColourKey,
    },
    /// The underlying categorical distribution was malformed.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Whether a budget proposes tails (out-degree) or heads (in-degree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DegreeRole {
    /// Tail selection, weighted by target out-degrees.
    Out,
    /// Head selection, weighted by target in-degrees.
    In,
}

/// The built budgets: a two-level lookup from (edge colour, role) to
/// per-vertex-colour proposers.
///
/// Lookup misses propagate as explicit `None`s; the synthesizer classifies
/// them as soft sampling failures.
#[derive(Clone, Debug, Default)]
pub struct DegreeBudgets {
    proposers: HashMap<(ColourKey, DegreeRole), HashMap<ColourKey, CategoricalProposer<usize>>>,
}

impl DegreeBudgets {
    /// Returns the proposer for the given combination, if one was built.
    #[must_use]
    pub fn proposer(
        &self,
        role: DegreeRole,
        edge_colour: ColourKey,
        vertex_colour: ColourKey,
    ) -> Option<&CategoricalProposer<usize>> {
        self.proposers
            .get(&(edge_colour, role))?
            .get(&vertex_colour)
    }

    /// Returns the number of built proposers, for diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.proposers.values().map(HashMap::len).sum()
    }

    /// Returns `true` when no proposer was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds [`DegreeBudgets`] from colour rules and reference distributions.
#[derive(Debug, Default)]
pub struct DegreeBudgetBuilder {
    budgets: DegreeBudgets,
}

impl DegreeBudgetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pre-built proposer for one combination.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::DuplicateBudget`] when the combination was
    /// already registered.
    pub fn insert(
        &mut self,
        edge_colour: ColourKey,
        role: DegreeRole,
        vertex_colour: ColourKey,
        proposer: CategoricalProposer<usize>,
    ) -> Result<(), BudgetError> {
        let slot = self
            .budgets
            .proposers
            .entry((edge_colour, role))
            .or_default();
        if slot.contains_key(&vertex_colour) {
            return Err(BudgetError::DuplicateBudget {
                edge: edge_colour,
                role,
                vertex: vertex_colour,
            });
        }
        slot.insert(vertex_colour, proposer);
        Ok(())
    }

    /// Poisson-samples a target degree per vertex and registers the
    /// resulting proposer for one combination.
    ///
    /// Zero draws are floored to 1 so every vertex keeps a strictly
    /// positive weight and stays reachable.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::DuplicateBudget`] on re-registration and
    /// [`BudgetError::Distribution`] when `vertex_ids` is empty.
    pub fn build_combination<R: Rng + ?Sized>(
        &mut self,
        edge_colour: ColourKey,
        role: DegreeRole,
        vertex_colour: ColourKey,
        vertex_ids: &[usize],
        avg_degree: f64,
        rng: &mut R,
    ) -> Result<(), BudgetError> {
        let weights: Vec<f64> = vertex_ids
            .iter()
            .map(|_| sample_poisson(avg_degree, rng).max(1) as f64)
            .collect();
        let proposer = CategoricalProposer::new(vertex_ids.to_vec(), weights)?;
        self.insert(edge_colour, role, vertex_colour, proposer)
    }

    /// Builds budgets for every admissible combination observed in `graph`.
    ///
    /// For each edge colour of `distributions`, the rule table's tail
    /// colours feed [`DegreeRole::Out`] budgets and its head colours feed
    /// [`DegreeRole::In`] budgets; colours with no vertex in the graph are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates [`BudgetError`] from the per-combination build.
    pub fn build_from_graph<C, D, R>(
        graph: &ColouredMultigraph,
        rules: &C,
        distributions: &D,
        rng: &mut R,
    ) -> Result<DegreeBudgets, BudgetError>
    where
        C: ColourRules,
        D: ReferenceDistributions,
        R: Rng + ?Sized,
    {
        let mut builder = Self::new();
        for edge_colour in distributions.edge_colours() {
            let mut tail_colours: Vec<ColourKey> =
                rules.tail_colours(edge_colour).into_iter().collect();
            tail_colours.sort_unstable_by_key(|colour| colour.bits());
            for tail_colour in tail_colours {
                let vertex_ids = graph.vertices_of_colour(tail_colour);
                if vertex_ids.is_empty() {
                    continue;
                }
                let avg = distributions.avg_out_degree(tail_colour, edge_colour);
                builder.build_combination(
                    edge_colour,
                    DegreeRole::Out,
                    tail_colour,
                    vertex_ids,
                    avg,
                    rng,
                )?;
            }

            let mut head_colours: Vec<ColourKey> =
                rules.head_colours(edge_colour).into_iter().collect();
            head_colours.sort_unstable_by_key(|colour| colour.bits());
            for head_colour in head_colours {
                let vertex_ids = graph.vertices_of_colour(head_colour);
                if vertex_ids.is_empty() {
                    continue;
                }
                let avg = distributions.avg_in_degree(head_colour, edge_colour);
                builder.build_combination(
                    edge_colour,
                    DegreeRole::In,
                    head_colour,
                    vertex_ids,
                    avg,
                    rng,
                )?;
            }
        }
        Ok(builder.finish())
    }

    /// Consumes the builder and returns the budgets.
    #[must_use]
    pub fn finish(self) -> DegreeBudgets {
        self.budgets
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        colour::ColourKey, graph::ColouredMultigraph, reference::ReferenceTables,
        rules::ColourRuleTable,
    };

    use super::{BudgetError, DegreeBudgetBuilder, DegreeBudgets, DegreeRole};

    fn build_simple_budgets() -> (DegreeBudgets, ColourKey, ColourKey) {
        let person = ColourKey::from_flag(0);
        let knows = ColourKey::from_flag(4);
        let graph = ColouredMultigraph::with_vertices(&[person; 12]);

        let mut rules = ColourRuleTable::new();
        rules.add_rule(person, knows, person);

        let mut tables = ReferenceTables::new();
        tables.set_edge_target(knows, 5);
        tables.set_avg_out_degree(person, knows, 2.5);
        tables.set_avg_in_degree(person, knows, 2.5);

        let mut rng = SmallRng::seed_from_u64(1);
        let budgets = DegreeBudgetBuilder::build_from_graph(&graph, &rules, &tables, &mut rng)
            .expect("budgets build");
        (budgets, person, knows)
    }

    #[test]
    fn builds_out_and_in_proposers() {
        let (budgets, person, knows) = build_simple_budgets();
        assert_eq!(budgets.len(), 2);
        assert!(budgets.proposer(DegreeRole::Out, knows, person).is_some());
        assert!(budgets.proposer(DegreeRole::In, knows, person).is_some());
        assert!(
            budgets
                .proposer(DegreeRole::Out, knows, ColourKey::from_flag(9))
                .is_none()
        );
    }

    #[test]
    fn every_vertex_keeps_positive_weight() {
        let (budgets, person, knows) = build_simple_budgets();
        let proposer = budgets
            .proposer(DegreeRole::Out, knows, person)
            .expect("combination was built");
        assert_eq!(proposer.items().len(), 12);
        assert!(proposer.weights().iter().all(|&weight| weight >= 1.0));
    }

    #[test]
    fn zero_average_still_floors_to_one() {
        let person = ColourKey::from_flag(0);
        let knows = ColourKey::from_flag(4);
        let mut builder = DegreeBudgetBuilder::new();
        let mut rng = SmallRng::seed_from_u64(2);
        builder
            .build_combination(knows, DegreeRole::Out, person, &[0, 1, 2], 0.0, &mut rng)
            .expect("combination builds");
        let budgets = builder.finish();
        let proposer = budgets
            .proposer(DegreeRole::Out, knows, person)
            .expect("combination was built");
        assert!(proposer.weights().iter().all(|&weight| weight == 1.0));
    }

    #[test]
    fn duplicate_registration_is_reported() {
        let person = ColourKey::from_flag(0);
        let knows = ColourKey::from_flag(4);
        let mut builder = DegreeBudgetBuilder::new();
        let mut rng = SmallRng::seed_from_u64(3);
        builder
            .build_combination(knows, DegreeRole::Out, person, &[0, 1], 1.0, &mut rng)
            .expect("first registration succeeds");
        let duplicate =
            builder.build_combination(knows, DegreeRole::Out, person, &[0, 1], 1.0, &mut rng);
        assert_eq!(
            duplicate,
            Err(BudgetError::DuplicateBudget {
                edge: knows,
                role: DegreeRole::Out,
                vertex: person,
            })
        );
    }
}
