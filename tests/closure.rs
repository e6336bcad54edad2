use std::collections::{BTreeSet, HashSet};

use obograph::OboError;
use obograph::construct::{RelationTypeId, TermId};
use obograph::ontology::{Ontology, OntologyOptions};
use obograph::reasoner::{Reasoner, Transitivity, close};
use obograph::triple::Facts;

fn t(id: u32) -> TermId {
    TermId::new(id)
}

fn r(id: &str) -> RelationTypeId {
    RelationTypeId::new(id)
}

fn snapshot(facts: &Facts) -> HashSet<(u32, String, u32)> {
    facts
        .iter()
        .map(|(s, v, o)| (s.value(), v.as_str().to_owned(), o.value()))
        .collect()
}

#[test]
fn transitive_relation_is_chained() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_fact(t(1), r("part_of"), t(2)).unwrap();
    ontology.add_fact(t(2), r("part_of"), t(3)).unwrap();

    let closure = ontology.close();
    assert!(ontology.contains_fact(&t(1), &r("part_of"), &t(3)));
    assert_eq!(ontology.fact_count(), 3);
    assert_eq!(closure.derived, 1);
    assert!(closure.converged);
}

#[test]
fn transitive_over_keeps_the_outer_relation() {
    let mut ontology = Ontology::new();
    ontology.add_transitive_over(r("regulates"), r("part_of")).unwrap();
    ontology.add_fact(t(10), r("regulates"), t(20)).unwrap();
    ontology.add_fact(t(20), r("part_of"), t(30)).unwrap();

    ontology.close();
    assert!(ontology.contains_fact(&t(10), &r("regulates"), &t(30)));
    assert!(!ontology.contains_fact(&t(10), &r("part_of"), &t(30)));
    assert_eq!(ontology.fact_count(), 3);
}

#[test]
fn no_metadata_means_no_derivations() {
    let mut ontology = Ontology::new();
    ontology.add_fact(t(1), r("part_of"), t(2)).unwrap();
    ontology.add_fact(t(2), r("part_of"), t(3)).unwrap();

    let closure = ontology.close();
    assert_eq!(closure.derived, 0);
    assert_eq!(closure.passes, 1);
    assert_eq!(ontology.fact_count(), 2);
    assert!(!ontology.contains_fact(&t(1), &r("part_of"), &t(3)));
}

#[test]
fn long_chain_needs_several_passes() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    for i in 1..4 {
        ontology.add_fact(t(i), r("part_of"), t(i + 1)).unwrap();
    }
    let closure = ontology.close();
    // 1-3 and 2-4 in the first pass, 1-4 in the second, nothing in the third
    assert_eq!(closure.passes, 3);
    assert_eq!(closure.derived, 3);
    assert_eq!(ontology.fact_count(), 6);
    assert!(ontology.contains_fact(&t(1), &r("part_of"), &t(4)));
}

#[test]
fn cycles_terminate() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_fact(t(1), r("part_of"), t(2)).unwrap();
    ontology.add_fact(t(2), r("part_of"), t(1)).unwrap();

    let closure = ontology.close();
    assert!(closure.converged);
    assert_eq!(closure.passes, 2);
    assert!(ontology.contains_fact(&t(1), &r("part_of"), &t(1)));
    assert!(ontology.contains_fact(&t(2), &r("part_of"), &t(2)));
    assert_eq!(ontology.fact_count(), 4);
}

#[test]
fn closing_twice_changes_nothing() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_transitive_over(r("regulates"), r("part_of")).unwrap();
    ontology.add_fact(t(1), r("regulates"), t(2)).unwrap();
    ontology.add_fact(t(2), r("part_of"), t(3)).unwrap();
    ontology.add_fact(t(3), r("part_of"), t(4)).unwrap();

    ontology.close();
    let first = snapshot(ontology.facts());
    let again = ontology.close();
    assert_eq!(again.derived, 0);
    assert_eq!(again.passes, 1);
    assert_eq!(snapshot(ontology.facts()), first);
    assert!(first.contains(&(1, "regulates".to_owned(), 4)));
}

#[test]
fn closure_is_sound_and_closed() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_transitive_over(r("regulates"), r("part_of")).unwrap();
    ontology.add_transitive_over(r("positively_regulates"), r("part_of")).unwrap();
    ontology.set_transitive(r("positively_regulates"), true).unwrap();
    let edges = [
        (1, "part_of", 2),
        (2, "part_of", 3),
        (3, "part_of", 1),
        (4, "regulates", 1),
        (5, "positively_regulates", 4),
        (6, "positively_regulates", 5),
        (4, "positively_regulates", 7),
        (7, "part_of", 8),
        (9, "has_part", 1),
    ];
    for (s, v, o) in edges {
        ontology.add_fact(t(s), r(v), t(o)).unwrap();
    }
    let asserted = snapshot(ontology.facts());
    ontology.close();
    let closed = snapshot(ontology.facts());

    assert!(asserted.is_subset(&closed));
    // every composition over the asserted facts is present
    let rule = |facts: &HashSet<(u32, String, u32)>| {
        let mut entailed = HashSet::new();
        for (x, outer, y) in facts {
            for (y2, inner, z) in facts {
                if y != y2 {
                    continue;
                }
                let composes = match outer.as_str() {
                    "part_of" => inner == "part_of",
                    "regulates" => inner == "part_of",
                    "positively_regulates" => inner == "part_of" || inner == "positively_regulates",
                    _ => false,
                };
                if composes {
                    entailed.insert((*x, outer.clone(), *z));
                }
            }
        }
        entailed
    };
    assert!(rule(&asserted).is_subset(&closed));
    // and applying the rule to the closed set adds nothing
    assert!(rule(&closed).is_subset(&closed));
    assert!(closed.contains(&(6, "positively_regulates".to_owned(), 8)));
    assert!(!closed.iter().any(|(x, v, _)| *x == 9 && v != "has_part"));
}

#[test]
fn is_a_edges_take_no_part() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_is_a(t(1), t(2)).unwrap();
    ontology.add_is_a(t(2), t(3)).unwrap();
    ontology.add_fact(t(3), r("part_of"), t(4)).unwrap();
    ontology.close();
    assert_eq!(ontology.fact_count(), 1);
    assert!(!ontology.contains_fact(&t(1), &r("part_of"), &t(4)));
}

#[test]
fn pass_cap_stops_early() {
    let options = OntologyOptions {
        max_passes: Some(1),
        ..OntologyOptions::default()
    };
    let mut ontology = Ontology::with_options(options);
    ontology.set_transitive(r("part_of"), true).unwrap();
    for i in 1..4 {
        ontology.add_fact(t(i), r("part_of"), t(i + 1)).unwrap();
    }
    let closure = ontology.close();
    assert!(!closure.converged);
    assert_eq!(closure.passes, 1);
    assert_eq!(closure.derived, 2);
    assert!(!ontology.contains_fact(&t(1), &r("part_of"), &t(4)));
}

#[test]
fn closed_ontology_is_sealed() {
    let mut ontology = Ontology::new();
    ontology.add_fact(t(1), r("part_of"), t(2)).unwrap();
    assert!(!ontology.is_closed());
    ontology.close();
    assert!(ontology.is_closed());
    assert!(ontology.closure().is_some());
    assert!(matches!(ontology.add_fact(t(2), r("part_of"), t(3)), Err(OboError::Sealed)));
    assert!(matches!(ontology.add_is_a(t(2), t(3)), Err(OboError::Sealed)));
    assert!(matches!(ontology.set_transitive(r("part_of"), true), Err(OboError::Sealed)));
    assert_eq!(ontology.fact_count(), 1);
}

// metadata for the reasoner does not have to come from an ontology
struct Rules;

impl Transitivity for Rules {
    fn is_transitive(&self, relation: &RelationTypeId) -> bool {
        relation.as_str() == "part_of"
    }
    fn transitive_over(&self, relation: &RelationTypeId) -> BTreeSet<RelationTypeId> {
        match relation.as_str() {
            "regulates" => BTreeSet::from([r("part_of")]),
            _ => BTreeSet::new(),
        }
    }
}

#[test]
fn reasoner_closes_a_bare_store() {
    let mut facts = Facts::new();
    facts.add(t(1), r("regulates"), t(2));
    facts.add(t(2), r("part_of"), t(3));
    facts.add(t(3), r("part_of"), t(4));

    let closure = close(&mut facts, &Rules);
    assert!(closure.converged);
    assert!(facts.contains(&t(2), &r("part_of"), &t(4)));
    assert!(facts.contains(&t(1), &r("regulates"), &t(3)));
    assert!(facts.contains(&t(1), &r("regulates"), &t(4)));
    assert_eq!(facts.len(), 6);

    let again = Reasoner::new().with_max_passes(Some(5)).close(&mut facts, &Rules);
    assert_eq!(again.derived, 0);
    assert!(again.converged);
}

#[test]
fn self_listed_transitive_over_is_harmless() {
    let mut ontology = Ontology::new();
    ontology.set_transitive(r("part_of"), true).unwrap();
    ontology.add_transitive_over(r("part_of"), r("part_of")).unwrap();
    ontology.add_fact(t(1), r("part_of"), t(2)).unwrap();
    ontology.add_fact(t(2), r("part_of"), t(3)).unwrap();
    let closure = ontology.close();
    assert_eq!(closure.derived, 1);
    assert_eq!(ontology.fact_count(), 3);
}
