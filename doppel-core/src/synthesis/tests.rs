//! Tests for the per-colour synthesis loop and candidate proposals.

use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{
    colour::ColourKey,
    graph::ColouredMultigraph,
    reference::ReferenceTables,
    rules::{ColourRuleTable, ColourRules},
    synthesis::{GraphSynthesizer, SynthesizerConfig, MAX_ATTEMPTS_PER_COLOUR},
};

fn person() -> ColourKey {
    ColourKey::from_flag(0)
}

fn city() -> ColourKey {
    ColourKey::from_flag(1)
}

fn knows() -> ColourKey {
    ColourKey::from_flag(4)
}

fn lives_in() -> ColourKey {
    ColourKey::from_flag(5)
}

fn social_rules() -> ColourRuleTable {
    let mut rules = ColourRuleTable::new();
    rules.add_rule(person(), knows(), person());
    rules.add_rule(person(), lives_in(), city());
    rules
}

fn social_tables(knows_target: usize, lives_in_target: usize) -> ReferenceTables {
    let mut tables = ReferenceTables::new();
    tables.set_edge_target(knows(), knows_target);
    tables.add_tail_colour_weight(knows(), person(), 1.0);
    tables.add_head_colour_weight(knows(), person(), 1.0);
    tables.set_avg_out_degree(person(), knows(), 2.0);
    tables.set_avg_in_degree(person(), knows(), 2.0);
    if lives_in_target > 0 {
        tables.set_edge_target(lives_in(), lives_in_target);
        tables.add_tail_colour_weight(lives_in(), person(), 1.0);
        tables.add_head_colour_weight(lives_in(), city(), 1.0);
        tables.set_avg_out_degree(person(), lives_in(), 1.0);
        tables.set_avg_in_degree(city(), lives_in(), 3.0);
    }
    tables
}

fn social_vertices(people: usize, cities: usize) -> Vec<ColourKey> {
    let mut colours = vec![person(); people];
    colours.extend(std::iter::repeat(city()).take(cities));
    colours
}

fn synthesize(
    vertex_colours: &[ColourKey],
    rules: &ColourRuleTable,
    tables: &ReferenceTables,
    seed: u64,
) -> (ColouredMultigraph, crate::synthesis::SynthesisReport) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut synthesizer = GraphSynthesizer::new(
        vertex_colours,
        rules,
        tables,
        SynthesizerConfig::default(),
        &mut rng,
    )
    .expect("synthesizer builds");
    let report = synthesizer.synthesize(&mut rng);
    (synthesizer.into_graph(), report)
}

#[test]
fn satisfiable_targets_are_met_exactly() {
    let rules = social_rules();
    let tables = social_tables(10, 6);
    let (graph, report) = synthesize(&social_vertices(12, 3), &rules, &tables, 17);

    assert_eq!(report.total_deficit(), 0);
    assert_eq!(report.total_committed(), 16);
    assert_eq!(graph.edges_of_colour_count(knows()), 10);
    assert_eq!(graph.edges_of_colour_count(lives_in()), 6);
}

#[test]
fn committed_edges_respect_the_rules() {
    let rules = social_rules();
    let tables = social_tables(10, 6);
    let (graph, _) = synthesize(&social_vertices(12, 3), &rules, &tables, 29);

    for (_, record) in graph.edges() {
        let tail_colour = graph.vertex_colour(record.tail).expect("tail is live");
        let head_colour = graph.vertex_colour(record.head).expect("head is live");
        assert!(
            rules.can_connect(tail_colour, head_colour, record.colour),
            "committed edge violates the rule table",
        );
        assert_ne!(record.tail, record.head, "self-loops are never committed");
    }
}

#[test]
fn no_tail_connects_twice_to_the_same_head_in_one_colour() {
    let rules = social_rules();
    let tables = social_tables(20, 0);
    let (graph, _) = synthesize(&social_vertices(8, 0), &rules, &tables, 41);

    let mut seen = std::collections::HashSet::new();
    for (_, record) in graph.edges() {
        assert!(
            seen.insert((record.tail, record.head, record.colour)),
            "duplicate ({}, {}) edge committed",
            record.tail,
            record.head,
        );
    }
}

#[rstest]
#[case::first_seed(5)]
#[case::second_seed(99)]
fn same_seed_reproduces_the_same_graph(#[case] seed: u64) {
    let rules = social_rules();
    let tables = social_tables(10, 6);
    let vertices = social_vertices(12, 3);
    let (first, _) = synthesize(&vertices, &rules, &tables, seed);
    let (second, _) = synthesize(&vertices, &rules, &tables, seed);

    let mut first_edges: Vec<_> = first.edges().map(|(id, r)| (id, *r)).collect();
    let mut second_edges: Vec<_> = second.edges().map(|(id, r)| (id, *r)).collect();
    first_edges.sort_by_key(|(id, _)| id.value());
    second_edges.sort_by_key(|(id, _)| id.value());
    assert_eq!(first_edges, second_edges);
}

#[test]
fn unsatisfiable_target_terminates_with_a_deficit() {
    let rules = social_rules();
    // Two people can host at most two distinct knows edges.
    let tables = social_tables(9, 0);
    let (graph, report) = synthesize(&social_vertices(2, 0), &rules, &tables, 3);

    let outcome = report.outcomes()[0];
    assert_eq!(outcome.requested(), 9);
    assert!(outcome.committed() <= 2);
    assert_eq!(outcome.deficit(), 9 - outcome.committed());
    assert_eq!(graph.edge_count(), outcome.committed());
}

#[test]
fn colour_without_reference_weights_is_skipped_not_stuck() {
    let rules = social_rules();
    let mut tables = ReferenceTables::new();
    // A target with no tail or head weights can never produce an edge.
    tables.set_edge_target(knows(), 4);
    let mut rng = SmallRng::seed_from_u64(11);
    let mut synthesizer = GraphSynthesizer::new(
        &social_vertices(6, 0),
        &rules,
        &tables,
        SynthesizerConfig {
            max_attempts_per_colour: 32,
        },
        &mut rng,
    )
    .expect("synthesizer builds");
    let report = synthesizer.synthesize(&mut rng);

    assert_eq!(report.total_committed(), 0);
    assert_eq!(report.total_deficit(), 4);
}

#[test]
fn exhausting_one_colour_does_not_starve_the_next() {
    let rules = social_rules();
    let mut tables = social_tables(50, 3);
    // The knows target cannot be met by two people.
    tables.set_edge_target(knows(), 50);
    let vertices = social_vertices(2, 3);
    let mut rng = SmallRng::seed_from_u64(23);
    let mut synthesizer = GraphSynthesizer::new(
        &vertices,
        &rules,
        &tables,
        SynthesizerConfig {
            max_attempts_per_colour: 64,
        },
        &mut rng,
    )
    .expect("synthesizer builds");
    let report = synthesizer.synthesize(&mut rng);

    let lives_in_outcome = report
        .outcomes()
        .iter()
        .find(|outcome| outcome.colour() == lives_in())
        .expect("lives-in colour was processed");
    assert_eq!(lives_in_outcome.deficit(), 0);
}

#[test]
fn proposed_edges_are_legal_and_uncommitted() {
    let rules = social_rules();
    let tables = social_tables(4, 0);
    let mut rng = SmallRng::seed_from_u64(31);
    let synthesizer = GraphSynthesizer::new(
        &social_vertices(6, 0),
        &rules,
        &tables,
        SynthesizerConfig::default(),
        &mut rng,
    )
    .expect("synthesizer builds");

    let proposal = synthesizer
        .propose_edge(knows(), &mut rng)
        .expect("a legal candidate exists");
    assert_eq!(proposal.edge_colour, Some(knows()));
    assert_eq!(proposal.tail_colour, Some(person()));
    assert_eq!(proposal.head_colour, Some(person()));
    assert_ne!(proposal.tail_id, proposal.head_id);
    assert_eq!(proposal.edge_id, None);
    assert_eq!(synthesizer.graph().edge_count(), 0);
}

#[test]
fn proposals_for_an_impossible_colour_give_up() {
    let rules = social_rules();
    let tables = social_tables(4, 0);
    let mut rng = SmallRng::seed_from_u64(37);
    let synthesizer = GraphSynthesizer::new(
        &social_vertices(6, 0),
        &rules,
        &tables,
        SynthesizerConfig {
            max_attempts_per_colour: 16,
        },
        &mut rng,
    )
    .expect("synthesizer builds");

    assert!(synthesizer.propose_edge(lives_in(), &mut rng).is_none());
}

#[test]
fn default_config_carries_the_standard_retry_budget() {
    assert_eq!(
        SynthesizerConfig::default().max_attempts_per_colour,
        MAX_ATTEMPTS_PER_COLOUR,
    );
}
