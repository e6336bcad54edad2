//! A set of (subject, relation type, object) facts, indexed from every side.
//!
//! The same facts are kept in four [`MultiLookup`]s, so that every query the
//! reasoner and the ontology need is answered by direct index access rather
//! than by scanning:
//!
//! | index | answers                                                   |
//! |-------|-----------------------------------------------------------|
//! | S→V→O | `contains`, `objects_of`, `relation_types_from_subject`   |
//! | O→V→S | `relation_types_to_object`                                |
//! | V→S→O | `subjects_by_relation`                                    |
//! | V→O→S | `subjects_of`, `objects_by_relation`, `all_relation_types`|
//!
//! Queries return iterators that are simply empty when nothing matches.
use std::hash::{BuildHasher, Hash};

use crate::construct::{IdHasher, MultiLookup, RelationTypeId, TermId};

/// The fact store of an ontology.
pub type Facts = TripleStore<TermId, RelationTypeId, TermId>;

#[derive(Debug)]
pub struct TripleStore<S, V, O, H = IdHasher> {
    svo: MultiLookup<S, V, O, H>,
    ovs: MultiLookup<O, V, S, H>,
    vso: MultiLookup<V, S, O, H>,
    vos: MultiLookup<V, O, S, H>,
    length: usize,
}

impl<S, V, O, H> TripleStore<S, V, O, H>
where
    S: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    O: Eq + Hash + Clone,
    H: BuildHasher + Default,
{
    pub fn new() -> Self {
        Self {
            svo: MultiLookup::new(),
            ovs: MultiLookup::new(),
            vso: MultiLookup::new(),
            vos: MultiLookup::new(),
            length: 0,
        }
    }

    /// Adds a fact, returning `false` if it was already present.
    ///
    /// The S→V→O index decides membership, and the remaining three are only
    /// touched for new facts, so all four always hold the same set.
    pub fn add(&mut self, s: S, v: V, o: O) -> bool {
        if !self.svo.add(s.clone(), v.clone(), o.clone()) {
            return false;
        }
        self.ovs.add(o.clone(), v.clone(), s.clone());
        self.vso.add(v.clone(), s.clone(), o.clone());
        self.vos.add(v, o, s);
        self.length += 1;
        true
    }

    pub fn contains(&self, s: &S, v: &V, o: &O) -> bool {
        self.svo.contains(s, v, o)
    }

    /// Objects reachable from `s` through `v`.
    pub fn objects_of<'a>(
        &'a self,
        s: &S,
        v: &V,
    ) -> impl Iterator<Item = &'a O> + use<'a, S, V, O, H> {
        self.svo.get(s, v).into_iter().flatten()
    }

    /// Subjects reaching `o` through `v`.
    pub fn subjects_of<'a>(
        &'a self,
        v: &V,
        o: &O,
    ) -> impl Iterator<Item = &'a S> + use<'a, S, V, O, H> {
        self.vos.get(v, o).into_iter().flatten()
    }

    pub fn relation_types_from_subject<'a>(
        &'a self,
        s: &S,
    ) -> impl Iterator<Item = &'a V> + use<'a, S, V, O, H> {
        self.svo.lookup(s).into_iter().flat_map(|nested| nested.keys())
    }

    pub fn relation_types_to_object<'a>(
        &'a self,
        o: &O,
    ) -> impl Iterator<Item = &'a V> + use<'a, S, V, O, H> {
        self.ovs.lookup(o).into_iter().flat_map(|nested| nested.keys())
    }

    /// Every subject that starts at least one `v` fact.
    pub fn subjects_by_relation<'a>(
        &'a self,
        v: &V,
    ) -> impl Iterator<Item = &'a S> + use<'a, S, V, O, H> {
        self.vso.lookup(v).into_iter().flat_map(|nested| nested.keys())
    }

    /// Every object that ends at least one `v` fact.
    pub fn objects_by_relation<'a>(
        &'a self,
        v: &V,
    ) -> impl Iterator<Item = &'a O> + use<'a, S, V, O, H> {
        self.vos.lookup(v).into_iter().flat_map(|nested| nested.keys())
    }

    /// Relation types with at least one fact.
    pub fn all_relation_types(&self) -> impl Iterator<Item = &V> {
        self.vos.keys()
    }

    pub fn all_subjects(&self) -> impl Iterator<Item = &S> {
        self.svo.keys()
    }

    pub fn all_objects(&self) -> impl Iterator<Item = &O> {
        self.ovs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &V, &O)> {
        self.svo.keys().flat_map(move |s| {
            self.svo
                .lookup(s)
                .into_iter()
                .flat_map(move |nested| nested.iter().map(move |(v, o)| (s, v, o)))
        })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl<S, V, O, H> Default for TripleStore<S, V, O, H>
where
    S: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    O: Eq + Hash + Clone,
    H: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
