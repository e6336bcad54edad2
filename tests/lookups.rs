use obograph::construct::{Lookup, MultiLookup, RelationTypeId, TermId};

#[test]
fn lookup_drops_key_with_last_value() {
    let mut lookup: Lookup<u32, &str> = Lookup::new();
    assert!(lookup.insert(1, "a"));
    assert!(lookup.insert(1, "b"));
    assert!(!lookup.insert(1, "a"));
    assert_eq!(lookup.lookup(&1).map(|set| set.len()), Some(2));

    assert!(lookup.remove(&1, &"a"));
    assert!(lookup.contains_key(&1));
    assert!(!lookup.remove(&1, &"a"));
    assert!(lookup.remove(&1, &"b"));
    assert!(!lookup.contains_key(&1));
    assert!(lookup.lookup(&1).is_none());
    assert!(lookup.is_empty());
}

#[test]
fn lookup_iterates_every_pair() {
    let mut lookup: Lookup<u32, u32> = Lookup::default();
    lookup.insert(1, 10);
    lookup.insert(1, 11);
    lookup.insert(2, 20);
    let mut pairs: Vec<(u32, u32)> = lookup.iter().map(|(k, v)| (*k, *v)).collect();
    pairs.sort();
    assert_eq!(pairs, vec![(1, 10), (1, 11), (2, 20)]);
    assert_eq!(lookup.len(), 2);
}

#[test]
fn multi_lookup_cascades_removal() {
    let mut index: MultiLookup<TermId, RelationTypeId, TermId> = MultiLookup::new();
    let part_of = RelationTypeId::new("part_of");
    let regulates = RelationTypeId::new("regulates");
    let (a, b, c) = (TermId::new(1), TermId::new(2), TermId::new(3));

    assert!(index.add(a, part_of.clone(), b));
    assert!(index.add(a, regulates.clone(), c));
    assert!(!index.add(a, part_of.clone(), b));
    assert!(index.contains(&a, &part_of, &b));
    assert!(!index.contains(&a, &part_of, &c));

    // removing part_of leaves a in place through regulates
    assert!(index.remove(&a, &part_of, &b));
    assert!(index.get(&a, &part_of).is_none());
    assert!(index.contains_key(&a));

    assert!(index.remove(&a, &regulates, &c));
    assert!(!index.contains_key(&a));
    assert!(index.lookup(&a).is_none());
    assert!(index.is_empty());
}

#[test]
fn multi_lookup_removal_of_absent_values() {
    let mut index: MultiLookup<u32, u32, u32> = MultiLookup::default();
    assert!(!index.remove(&1, &2, &3));
    index.add(1, 2, 3);
    assert!(!index.remove(&1, &2, &4));
    assert!(!index.remove(&1, &5, &3));
    assert!(index.contains(&1, &2, &3));
    assert_eq!(index.keys().copied().collect::<Vec<_>>(), vec![1]);
}
