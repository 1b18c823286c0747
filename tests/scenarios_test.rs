// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! End-to-end aggregation over small dictionaries with known answers.

mod common;

use common::*;
use sectionweave::state::Counters;
use sectionweave::Parameters;

#[test]
fn test_pair_from_either_end() {
    for nucleus in ["a", "b"] {
        let (solutions, stats) = run_exhaustive(scenario_pair(), Parameters::default(), &[nucleus]);
        assert_eq!(solutions.len(), 1, "nucleus {}", nucleus);
        let linkage = &solutions[0];
        assert_eq!(linkage.len(), 2);
        assert_eq!(edges(linkage).len(), 1);
        assert_eq!(stats.get(Counters::Nucleations), 1);
    }
}

#[test]
fn test_unmateable_connector_dead_ends() {
    let (solutions, stats) = run_exhaustive(scenario_unmateable(), Parameters::default(), &["a"]);
    assert!(solutions.is_empty());
    assert_eq!(stats.get(Counters::DeadEnds), 1);
    assert_eq!(stats.get(Counters::OdometerPushes), 0);
}

#[test]
fn test_triangle_closes_once() {
    let params = Parameters {
        max_network_size: 5,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(scenario_triangle(), params, &["a"]);
    assert_eq!(solutions.len(), 1);

    let triangle = &solutions[0];
    assert_eq!(triangle.len(), 3);
    let bases: Vec<&str> = triangle.iter().map(|s| s.point().base_name()).collect();
    assert_eq!(bases, vec!["a", "b", "c"]);
    assert_eq!(edges(triangle).len(), 3);

    // no parallel edges, no self-loops
    for x in triangle {
        for y in triangle {
            let expected = if x == y { 0 } else { 1 };
            assert_eq!(links_between(x, y), expected, "{} and {}", x, y);
        }
    }
}

#[test]
fn test_triangle_grows_hexagon_with_room() {
    let params = Parameters {
        max_network_size: 6,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(scenario_triangle(), params, &["a"]);
    let mut sizes: Vec<usize> = solutions.iter().map(|s| s.len()).collect();
    sizes.sort();
    sizes.dedup();
    assert_eq!(sizes, vec![3, 6]);
}

#[test]
fn test_chain_bounded_by_network_size() {
    let params = Parameters {
        max_network_size: 5,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(scenario_chain(), params, &["start"]);
    let mut sizes: Vec<usize> = solutions.iter().map(|s| s.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![2, 3, 4, 5]);
    for linkage in &solutions {
        assert!(linkage.iter().all(|s| s.is_closed()));
    }
}

#[test]
fn test_chain_bounded_by_depth() {
    let params = Parameters {
        max_depth: 2,
        ..Parameters::default()
    };
    let (solutions, stats) = run_exhaustive(scenario_chain(), params, &["start"]);
    // the end can be placed at depth 0, 1 or 2
    let mut sizes: Vec<usize> = solutions.iter().map(|s| s.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![2, 3, 4]);
    assert!(stats.get(Counters::StepRefusals) > 0);
}

#[test]
fn test_max_solutions_stops_search() {
    let params = Parameters {
        max_network_size: 10,
        max_solutions: 2,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(scenario_chain(), params, &["start"]);
    assert_eq!(solutions.len(), 2);
}

#[test]
fn test_self_connection_needs_permission() {
    let loop_piece = || plus_minus(vec![sect("loop", &[("S", "+"), ("S", "-")])]);
    let params = Parameters {
        max_network_size: 1,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(loop_piece(), params.clone(), &["loop"]);
    assert!(solutions.is_empty());

    let params = Parameters {
        allow_self_connections: true,
        ..params
    };
    let (solutions, _) = run_exhaustive(loop_piece(), params, &["loop"]);
    assert_eq!(solutions.len(), 1);
    let only = solutions[0].iter().next().unwrap();
    assert_eq!(only.links().count(), 2);
    let link = only.links().next().unwrap();
    assert_eq!(link.endpoints().0, link.endpoints().1);
}

#[test]
fn test_parallel_links_limit() {
    // two pieces with two mating connectors each
    let dict = || {
        plus_minus(vec![
            sect("a", &[("S", "+"), ("S", "+")]),
            sect("b", &[("S", "-"), ("S", "-")]),
        ])
    };
    let params = Parameters {
        max_network_size: 2,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(dict(), params.clone(), &["a"]);
    assert!(solutions.is_empty());

    let params = Parameters {
        pair_any_links: 2,
        pair_typed_links: 2,
        ..params
    };
    let (solutions, _) = run_exhaustive(dict(), params, &["a"]);
    assert_eq!(solutions.len(), 1);
    let linkage = &solutions[0];
    let a = linkage.iter().next().unwrap();
    let b = linkage.iter().nth(1).unwrap();
    assert_eq!(links_between(a, b), 2);
}

#[test]
fn test_two_nuclei_cartesian_roots() {
    let dict = plus_minus(vec![
        sect("a", &[("S", "+")]),
        sect("a", &[("O", "+")]),
        sect("b", &[("S", "-")]),
        sect("b", &[("O", "-")]),
    ]);
    let params = Parameters {
        max_network_size: 2,
        ..Parameters::default()
    };
    let (solutions, stats) = run_exhaustive(dict, params, &["a", "b"]);
    // four root pairs, only the two with matching link types close
    assert_eq!(stats.get(Counters::Nucleations), 4);
    assert_eq!(solutions.len(), 2);
}

#[test]
fn test_every_mate_of_a_connector_is_tried() {
    // S+ mates with both S- and S*
    let dict = plus_minus_star(vec![
        sect("a", &[("S", "+")]),
        sect("b", &[("S", "-")]),
        sect("c", &[("S", "*")]),
    ]);
    let (solutions, stats) = run_exhaustive(dict, Parameters::default(), &["a"]);
    let bases: Vec<Vec<&str>> = solutions
        .iter()
        .map(|l| l.iter().map(|s| s.point().base_name()).collect())
        .collect();
    assert_eq!(bases, vec![vec!["a", "b"], vec!["a", "c"]]);
    assert_eq!(stats.get(Counters::Rollovers), 1);
}

#[test]
fn test_later_mate_tried_when_earlier_has_no_candidates() {
    // no room for b, so S+ can only close against a's own S*
    let dict = plus_minus_star(vec![
        sect("a", &[("S", "+"), ("S", "*")]),
        sect("b", &[("S", "-")]),
    ]);
    let params = Parameters {
        max_network_size: 1,
        allow_self_connections: true,
        ..Parameters::default()
    };
    let (solutions, _) = run_exhaustive(dict, params, &["a"]);
    assert_eq!(solutions.len(), 1);
    let only = solutions[0].iter().next().unwrap();
    assert!(only.is_closed());
    let link = only.links().next().unwrap();
    assert_eq!(link.endpoints().0, link.endpoints().1);
}
