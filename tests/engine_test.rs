use panorama::embed::EmbeddingConfig;
use panorama::engine::{EngineConfig, EngineError, SuggestionEngine};
use panorama::roster::{EmployeeNumber, EmployeeRecord, Roster};
use panorama::suggest::{Relation, SuggestionMap};
use std::collections::HashSet;

fn test_config(seed: u64) -> EngineConfig {
    EngineConfig {
        embedding: EmbeddingConfig {
            dimension: 32,
            walk_length: 20,
            walks_per_node: 60,
            seed,
            ..EmbeddingConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Two disjoint three-person reporting chains with no cross-links
fn two_chain_roster() -> Roster {
    Roster::from_records(vec![
        EmployeeRecord::new("a1", 1),
        EmployeeRecord::new("a2", 2).with_direct_supervisor("a1"),
        EmployeeRecord::new("a3", 3).with_direct_supervisor("a2"),
        EmployeeRecord::new("b1", 4),
        EmployeeRecord::new("b2", 5).with_direct_supervisor("b1"),
        EmployeeRecord::new("b3", 6).with_direct_supervisor("b2"),
    ])
}

fn run(roster: Roster, seed: u64) -> SuggestionMap {
    SuggestionEngine::new(roster, test_config(seed))
        .assign_suggestions()
        .unwrap()
}

#[test]
fn test_every_employee_gets_exactly_one_leading_self_evaluation() {
    let map = run(two_chain_roster(), 1);

    for (number, suggestions) in &map {
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].relation, Relation::SelfEvaluation);
        assert_eq!(suggestions[0].employee_number, *number);

        let self_entries = suggestions
            .iter()
            .filter(|s| s.relation == Relation::SelfEvaluation)
            .count();
        assert_eq!(self_entries, 1);
    }
}

#[test]
fn test_direct_supervisor_suggested_when_resolvable() {
    let map = run(two_chain_roster(), 1);

    // a2 reports to a1, a3 to a2, b2 to b1, b3 to b2.
    for (evaluator, supervisor) in [(2u32, 1u32), (3, 2), (5, 4), (6, 5)] {
        let suggestions = map.get(&EmployeeNumber::new(evaluator)).unwrap();
        assert!(
            suggestions.iter().any(|s| s.relation == Relation::DirectSupervisor
                && s.employee_number == EmployeeNumber::new(supervisor)),
            "employee {evaluator} is missing supervisor {supervisor}"
        );
    }
}

#[test]
fn test_no_duplicate_pairs_and_no_self_peer() {
    let map = run(two_chain_roster(), 1);

    for (number, suggestions) in &map {
        let mut seen = HashSet::new();
        for suggestion in suggestions {
            assert!(
                seen.insert((suggestion.employee_number, suggestion.relation)),
                "duplicate suggestion for employee {number}"
            );
            if suggestion.relation == Relation::HomologousPeer {
                assert_ne!(suggestion.employee_number, *number);
            }
        }
    }
}

#[test]
fn test_cap_governs_non_self_entries() {
    let config = test_config(1);
    let cap = config.top_k;
    let map = SuggestionEngine::new(two_chain_roster(), config)
        .assign_suggestions()
        .unwrap();

    for suggestions in map.values() {
        let non_self = suggestions
            .iter()
            .filter(|s| s.relation != Relation::SelfEvaluation)
            .count();
        assert!(non_self <= cap);
        assert!(suggestions.len() <= cap + 1);
    }
}

#[test]
fn test_identical_seed_reproduces_identical_suggestions() {
    let first = run(two_chain_roster(), 42);
    let second = run(two_chain_roster(), 42);

    assert_eq!(first, second);
    let first_keys: Vec<_> = first.keys().collect();
    let second_keys: Vec<_> = second.keys().collect();
    assert_eq!(first_keys, second_keys);
}

#[test]
fn test_hard_rules_stable_across_seeds() {
    let first = run(two_chain_roster(), 1);
    let second = run(two_chain_roster(), 2);

    for (number, suggestions) in &first {
        let hard: Vec<_> = suggestions
            .iter()
            .filter(|s| s.relation != Relation::HomologousPeer)
            .collect();
        let other = second.get(number).unwrap();
        let other_hard: Vec<_> = other
            .iter()
            .filter(|s| s.relation != Relation::HomologousPeer)
            .collect();
        assert_eq!(hard, other_hard);
    }
}

#[test]
fn test_roster_of_one() {
    let roster = Roster::from_records(vec![EmployeeRecord::new("solo", 9)]);
    let map = run(roster, 1);

    let suggestions = map.get(&EmployeeNumber::new(9)).unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].relation, Relation::SelfEvaluation);
}

#[test]
fn test_roster_of_two_with_supervisor_edge() {
    let roster = Roster::from_records(vec![
        EmployeeRecord::new("boss", 1),
        EmployeeRecord::new("emp", 2).with_direct_supervisor("boss"),
    ]);
    let map = run(roster, 1);

    let boss = map.get(&EmployeeNumber::new(1)).unwrap();
    assert_eq!(boss.len(), 2);
    assert_eq!(boss[1].relation, Relation::DirectReport);
    assert_eq!(boss[1].employee_number, EmployeeNumber::new(2));

    let emp = map.get(&EmployeeNumber::new(2)).unwrap();
    assert_eq!(emp.len(), 2);
    assert_eq!(emp[1].relation, Relation::DirectSupervisor);
    assert_eq!(emp[1].employee_number, EmployeeNumber::new(1));

    // The only candidate peer is already suggested under a hard relation.
    for suggestions in map.values() {
        assert!(suggestions.iter().all(|s| s.relation != Relation::HomologousPeer));
    }
}

#[test]
fn test_disjoint_chains_never_exchange_peers() {
    let chain_a: HashSet<EmployeeNumber> = [1, 2, 3].map(EmployeeNumber::new).into();
    let chain_b: HashSet<EmployeeNumber> = [4, 5, 6].map(EmployeeNumber::new).into();

    let engine = SuggestionEngine::new(two_chain_roster(), test_config(5));
    let labels = engine.cluster_labels().unwrap();

    // The chains are disjoint components; no cluster may span both.
    let labels_a: HashSet<usize> = [0usize, 1, 2].iter().map(|&i| labels[i]).collect();
    let labels_b: HashSet<usize> = [3usize, 4, 5].iter().map(|&i| labels[i]).collect();
    assert!(labels_a.is_disjoint(&labels_b), "clusters span both chains: {labels:?}");

    let map = engine.assign_suggestions().unwrap();
    for (number, suggestions) in &map {
        let own_chain = if chain_a.contains(number) {
            &chain_a
        } else {
            &chain_b
        };
        for suggestion in suggestions {
            if suggestion.relation == Relation::HomologousPeer {
                assert!(
                    own_chain.contains(&suggestion.employee_number),
                    "peer suggestion for {number} crosses chains"
                );
            }
        }
    }
}

#[test]
fn test_self_referencing_supervisor_never_suggests_itself() {
    let roster = Roster::from_records(vec![
        EmployeeRecord::new("weird", 1).with_direct_supervisor("weird"),
        EmployeeRecord::new("peer", 2),
        EmployeeRecord::new("third", 3),
    ]);
    let map = run(roster, 1);

    let weird = map.get(&EmployeeNumber::new(1)).unwrap();
    assert!(weird
        .iter()
        .all(|s| s.relation != Relation::DirectSupervisor && s.relation != Relation::DirectReport));
    // Exactly one reference to itself: the self-evaluation.
    let self_refs = weird
        .iter()
        .filter(|s| s.employee_number == EmployeeNumber::new(1))
        .count();
    assert_eq!(self_refs, 1);
}

#[test]
fn test_unresolvable_supervisor_is_skipped() {
    let roster = Roster::from_records(vec![
        EmployeeRecord::new("a", 1).with_direct_supervisor("ghost"),
        EmployeeRecord::new("b", 2),
    ]);
    let map = run(roster, 1);

    let a = map.get(&EmployeeNumber::new(1)).unwrap();
    assert!(a.iter().all(|s| s.relation != Relation::DirectSupervisor));
}

#[test]
fn test_duplicate_roster_ids_keep_first_record() {
    let roster = Roster::from_records(vec![
        EmployeeRecord::new("a", 1),
        EmployeeRecord::new("a", 99),
        EmployeeRecord::new("b", 2).with_direct_supervisor("a"),
    ]);
    let map = run(roster, 1);

    assert_eq!(map.len(), 2);
    let b = map.get(&EmployeeNumber::new(2)).unwrap();
    assert!(b
        .iter()
        .any(|s| s.relation == Relation::DirectSupervisor
            && s.employee_number == EmployeeNumber::new(1)));
}

#[test]
fn test_empty_roster_fails_atomically() {
    let engine = SuggestionEngine::new(Roster::new(), test_config(1));
    assert!(matches!(
        engine.assign_suggestions(),
        Err(EngineError::EmptyRoster)
    ));
}
