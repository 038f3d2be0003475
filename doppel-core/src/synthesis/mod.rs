//! Stochastic graph synthesis under colour rules and reference statistics.
//!
//! The synthesizer owns a [`ColouredMultigraph`] whose vertices are already
//! coloured and fills it with edges colour by colour. Every draw is biased
//! by the reference distributions: tail and head colours come from the
//! per-edge-colour categorical proposers and vertex ids from the Poisson
//! degree budgets. Sampling is best-effort; a per-colour retry budget
//! bounds the work spent on a hard-to-satisfy colour, and any shortfall is
//! reported rather than hidden.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::{
    budget::{DegreeBudgetBuilder, DegreeBudgets, DegreeRole},
    colour::ColourKey,
    error::DoppelError,
    graph::ColouredMultigraph,
    modification::EdgeProposal,
    proposer::CategoricalProposer,
    reference::ReferenceDistributions,
    rules::ColourRules,
};

#[cfg(test)]
mod tests;

/// Default retry budget per edge colour.
pub const MAX_ATTEMPTS_PER_COLOUR: u32 = 5_000;

/// Tunable parameters for a synthesis run.
#[derive(Clone, Copy, Debug)]
pub struct SynthesizerConfig {
    /// Consecutive failed sampling attempts tolerated for one edge colour
    /// before that colour is abandoned. A committed edge refills the
    /// budget, so the bound applies to runs of failures, not to the colour
    /// as a whole.
    pub max_attempts_per_colour: u32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_colour: MAX_ATTEMPTS_PER_COLOUR,
        }
    }
}

/// Requested and committed edge counts for one edge colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColourOutcome {
    colour: ColourKey,
    requested: usize,
    committed: usize,
}

impl ColourOutcome {
    /// The edge colour this outcome describes.
    #[must_use]
    pub fn colour(&self) -> ColourKey {
        self.colour
    }

    /// Edges the reference target asked for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Edges actually committed to the graph.
    #[must_use]
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Shortfall against the target.
    #[must_use]
    pub fn deficit(&self) -> usize {
        self.requested - self.committed
    }
}

/// Per-colour results of a synthesis run.
#[derive(Clone, Debug, Default)]
pub struct SynthesisReport {
    outcomes: Vec<ColourOutcome>,
}

impl SynthesisReport {
    /// Per-colour outcomes in the order the colours were processed.
    #[must_use]
    pub fn outcomes(&self) -> &[ColourOutcome] {
        &self.outcomes
    }

    /// Total committed edges across all colours.
    #[must_use]
    pub fn total_committed(&self) -> usize {
        self.outcomes.iter().map(ColourOutcome::committed).sum()
    }

    /// Total shortfall across all colours.
    #[must_use]
    pub fn total_deficit(&self) -> usize {
        self.outcomes.iter().map(ColourOutcome::deficit).sum()
    }
}

/// Fills a vertex-coloured graph with edges mimicking reference statistics.
///
/// # Examples
/// ```
/// use doppel_core::{
///     ColourKey, ColourRuleTable, GraphSynthesizer, ReferenceTables,
///     SynthesizerConfig,
/// };
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let person = ColourKey::from_flag(0);
/// let knows = ColourKey::from_flag(4);
/// let mut rules = ColourRuleTable::new();
/// rules.add_rule(person, knows, person);
/// let mut tables = ReferenceTables::new();
/// tables.set_edge_target(knows, 4);
/// tables.add_tail_colour_weight(knows, person, 1.0);
/// tables.add_head_colour_weight(knows, person, 1.0);
/// tables.set_avg_out_degree(person, knows, 1.5);
/// tables.set_avg_in_degree(person, knows, 1.5);
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let mut synthesizer = GraphSynthesizer::new(
///     &[person; 8],
///     &rules,
///     &tables,
///     SynthesizerConfig::default(),
///     &mut rng,
/// )?;
/// let report = synthesizer.synthesize(&mut rng);
/// assert_eq!(report.total_committed(), 4);
/// # Ok::<(), doppel_core::DoppelError>(())
/// ```
#[derive(Debug)]
pub struct GraphSynthesizer<'r, C> {
    graph: ColouredMultigraph,
    rules: &'r C,
    config: SynthesizerConfig,
    budgets: DegreeBudgets,
    tail_proposers: HashMap<ColourKey, CategoricalProposer<ColourKey>>,
    head_proposers: HashMap<ColourKey, CategoricalProposer<ColourKey>>,
    edge_targets: Vec<(ColourKey, usize)>,
}

impl<'r, C: ColourRules> GraphSynthesizer<'r, C> {
    /// Builds a synthesizer over freshly coloured vertices.
    ///
    /// Captures the edge targets, builds the colour proposers from the
    /// reference weights and the degree budgets from Poisson draws. The
    /// RNG draws made here are part of the deterministic run: the same
    /// seed yields the same budgets and therefore the same graph.
    ///
    /// # Errors
    ///
    /// Returns [`DoppelError`] when a reference weight table is malformed
    /// or a degree-budget combination cannot be built.
    pub fn new<D, R>(
        vertex_colours: &[ColourKey],
        rules: &'r C,
        distributions: &D,
        config: SynthesizerConfig,
        rng: &mut R,
    ) -> Result<Self, DoppelError>
    where
        D: ReferenceDistributions,
        R: Rng + ?Sized,
    {
        let graph = ColouredMultigraph::with_vertices(vertex_colours);
        let budgets = DegreeBudgetBuilder::build_from_graph(&graph, rules, distributions, rng)?;

        let mut tail_proposers = HashMap::new();
        let mut head_proposers = HashMap::new();
        let mut edge_targets = Vec::new();
        for edge_colour in distributions.edge_colours() {
            edge_targets.push((edge_colour, distributions.edge_target(edge_colour)));
            if let Some(weights) = distributions.tail_colour_weights(edge_colour) {
                tail_proposers.insert(edge_colour, colour_proposer(weights)?);
            }
            if let Some(weights) = distributions.head_colour_weights(edge_colour) {
                head_proposers.insert(edge_colour, colour_proposer(weights)?);
            }
        }

        Ok(Self {
            graph,
            rules,
            config,
            budgets,
            tail_proposers,
            head_proposers,
            edge_targets,
        })
    }

    /// Runs the per-colour generation loop to completion.
    ///
    /// Each edge colour is pursued until its target is met or its retry
    /// budget runs dry; a committed edge refills the budget. An exhausted
    /// colour is logged with its deficit and the loop moves on, so one
    /// unsatisfiable colour never starves the rest.
    #[instrument(
        name = "synthesis.run",
        skip(self, rng),
        fields(
            edge_colours = self.edge_targets.len(),
            vertices = self.graph.vertex_count(),
        ),
    )]
    pub fn synthesize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SynthesisReport {
        let mut report = SynthesisReport::default();
        let targets = self.edge_targets.clone();
        for (colour, requested) in targets {
            let committed = self.synthesize_colour(colour, requested, rng);
            report.outcomes.push(ColourOutcome {
                colour,
                requested,
                committed,
            });
        }
        report
    }

    fn synthesize_colour<R: Rng + ?Sized>(
        &mut self,
        colour: ColourKey,
        requested: usize,
        rng: &mut R,
    ) -> usize {
        let mut committed = 0;
        let mut attempts_left = self.config.max_attempts_per_colour;
        while committed < requested {
            if attempts_left == 0 {
                warn!(
                    colour = %colour,
                    requested,
                    committed,
                    deficit = requested - committed,
                    "retry budget exhausted, abandoning edge colour",
                );
                break;
            }
            if let Some((tail, head)) = self.attempt_edge(colour, rng) {
                // The vertices were drawn from this graph, so insertion
                // cannot fail.
                if self.graph.add_edge(tail, head, colour).is_ok() {
                    committed += 1;
                    attempts_left = self.config.max_attempts_per_colour;
                    continue;
                }
            }
            attempts_left -= 1;
        }
        debug!(colour = %colour, requested, committed, "edge colour finished");
        committed
    }

    /// One sampling attempt for an edge of `colour`.
    ///
    /// Any empty draw along the way is a soft failure reported as `None`;
    /// the caller charges it against the retry budget.
    fn attempt_edge<R: Rng + ?Sized>(
        &self,
        colour: ColourKey,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let tail_colour = *self.tail_proposers.get(&colour)?.sample(rng)?;
        let compatible = self.rules.compatible_head_colours(tail_colour, Some(colour));
        let head_colour = *self
            .head_proposers
            .get(&colour)?
            .sample_restricted(rng, &compatible)?;

        let tail = *self
            .budgets
            .proposer(DegreeRole::Out, colour, tail_colour)?
            .sample(rng)?;
        let mut candidates: HashSet<usize> = self
            .graph
            .vertices_of_colour(head_colour)
            .iter()
            .copied()
            .collect();
        for connected in self.graph.connected_heads(tail, colour) {
            candidates.remove(&connected);
        }
        candidates.remove(&tail);
        if candidates.is_empty() {
            return None;
        }
        let head = *self
            .budgets
            .proposer(DegreeRole::In, colour, head_colour)?
            .sample_restricted(rng, &candidates)?;

        if !self.rules.can_connect(tail_colour, head_colour, colour) {
            return None;
        }
        Some((tail, head))
    }

    /// Draws a single legal candidate edge of `colour` without committing
    /// it, for callers that stage changes through a what-if engine.
    ///
    /// Gives up after the configured attempt budget and returns `None`.
    pub fn propose_edge<R: Rng + ?Sized>(
        &self,
        colour: ColourKey,
        rng: &mut R,
    ) -> Option<EdgeProposal> {
        for _ in 0..self.config.max_attempts_per_colour {
            if let Some((tail, head)) = self.attempt_edge(colour, rng) {
                let mut proposal = EdgeProposal::addition(tail, head, colour);
                proposal.tail_colour = self.graph.vertex_colour(tail);
                proposal.head_colour = self.graph.vertex_colour(head);
                return Some(proposal);
            }
        }
        None
    }

    /// The graph in its current state of construction.
    #[must_use]
    pub fn graph(&self) -> &ColouredMultigraph {
        &self.graph
    }

    /// Consumes the synthesizer and yields the graph.
    #[must_use]
    pub fn into_graph(self) -> ColouredMultigraph {
        self.graph
    }
}

fn colour_proposer(
    weights: &[(ColourKey, f64)],
) -> Result<CategoricalProposer<ColourKey>, crate::proposer::DistributionError> {
    let (colours, masses): (Vec<ColourKey>, Vec<f64>) = weights.iter().copied().unzip();
    CategoricalProposer::new(colours, masses)
}
