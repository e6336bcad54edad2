// other keepers and lookups use HashSet or HashMap
use core::hash::{BuildHasher, BuildHasherDefault};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;
use std::str::FromStr;

// our own stuff that we need
use crate::error::OboError;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

// ------------- TermId -------------
// Terms are identified by the integer part of their prefixed identifier,
// so GO:0000001 is kept as TermId(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn value(&self) -> u32 {
        self.0
    }
}
impl From<u32> for TermId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:07}", self.0)
    }
}

// ------------- RelationTypeId -------------
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationTypeId(String);

impl RelationTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for RelationTypeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
impl fmt::Display for RelationTypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ------------- Namespace -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    BiologicalProcess,
    MolecularFunction,
    CellularComponent,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::BiologicalProcess => "biological_process",
            Namespace::MolecularFunction => "molecular_function",
            Namespace::CellularComponent => "cellular_component",
        }
    }
}
impl FromStr for Namespace {
    type Err = OboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "biological_process" => Ok(Namespace::BiologicalProcess),
            "molecular_function" => Ok(Namespace::MolecularFunction),
            "cellular_component" => Ok(Namespace::CellularComponent),
            other => Err(OboError::UnknownNamespace(other.to_owned())),
        }
    }
}
impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------- Term -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    id: TermId,
    name: Option<String>,
    namespace: Option<Namespace>,
}

impl Term {
    // Only keepers create terms, which guarantees a single instance per id.
    pub(crate) fn new(id: TermId, namespace: Option<Namespace>) -> Self {
        Self {
            id,
            name: None,
            namespace,
        }
    }
    pub fn id(&self) -> TermId {
        self.id
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }
    pub(crate) fn set_namespace(&mut self, namespace: Namespace) {
        self.namespace = Some(namespace);
    }
}

#[derive(Debug, Default)]
pub struct TermKeeper {
    kept: HashMap<TermId, Term, IdHasher>,
}
impl TermKeeper {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    // Terms may be referenced before their own stanza has been read, in which
    // case an empty term is kept and filled in later. The namespace is only
    // used when the term is created.
    pub fn keep(&mut self, id: TermId, namespace: Option<Namespace>) -> (&mut Term, bool) {
        match self.kept.entry(id) {
            Entry::Occupied(e) => (e.into_mut(), true),
            Entry::Vacant(e) => (e.insert(Term::new(id, namespace)), false),
        }
    }
    pub fn get(&self, id: &TermId) -> Option<&Term> {
        self.kept.get(id)
    }
    pub fn contains(&self, id: &TermId) -> bool {
        self.kept.contains_key(id)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.kept.values()
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// ------------- RelationType -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationType {
    id: RelationTypeId,
    name: Option<String>,
    transitive: bool,
    transitive_over: BTreeSet<RelationTypeId>,
}

impl RelationType {
    pub(crate) fn new(id: RelationTypeId) -> Self {
        Self {
            id,
            name: None,
            transitive: false,
            transitive_over: BTreeSet::new(),
        }
    }
    pub fn id(&self) -> &RelationTypeId {
        &self.id
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn is_transitive(&self) -> bool {
        self.transitive
    }
    pub fn transitive_over(&self) -> &BTreeSet<RelationTypeId> {
        &self.transitive_over
    }
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }
    pub(crate) fn set_transitive(&mut self, transitive: bool) {
        self.transitive = transitive;
    }
    pub(crate) fn add_transitive_over(&mut self, other: RelationTypeId) -> bool {
        self.transitive_over.insert(other)
    }
}

#[derive(Debug, Default)]
pub struct RelationTypeKeeper {
    kept: HashMap<RelationTypeId, RelationType, IdHasher>,
}
impl RelationTypeKeeper {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    pub fn keep(&mut self, id: RelationTypeId) -> (&mut RelationType, bool) {
        match self.kept.entry(id) {
            Entry::Occupied(e) => (e.into_mut(), true),
            Entry::Vacant(e) => {
                let relation_type = RelationType::new(e.key().clone());
                (e.insert(relation_type), false)
            }
        }
    }
    pub fn get(&self, id: &RelationTypeId) -> Option<&RelationType> {
        self.kept.get(id)
    }
    pub fn contains(&self, id: &RelationTypeId) -> bool {
        self.kept.contains_key(id)
    }
    pub fn iter(&self) -> impl Iterator<Item = &RelationType> {
        self.kept.values()
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// ------------- Lookups -------------
// A key to set-of-values index. Keys whose set becomes empty are removed, so
// contains_key stays accurate after removals.
#[derive(Debug)]
pub struct Lookup<K, V, H = IdHasher> {
    index: HashMap<K, HashSet<V, H>, H>,
}
impl<K: Eq + Hash, V: Eq + Hash, H: BuildHasher + Default> Lookup<K, V, H> {
    pub fn new() -> Self {
        Self {
            index: HashMap::<K, HashSet<V, H>, H>::default(),
        }
    }
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let set = self.index.entry(key).or_insert_with(HashSet::<V, H>::default);
        set.insert(value)
    }
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let Some(set) = self.index.get_mut(key) else {
            return false;
        };
        let removed = set.remove(value);
        if set.is_empty() {
            self.index.remove(key);
        }
        removed
    }
    pub fn lookup(&self, key: &K) -> Option<&HashSet<V, H>> {
        self.index.get(key)
    }
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.index.get(key).is_some_and(|set| set.contains(value))
    }
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.index
            .iter()
            .flat_map(|(key, set)| set.iter().map(move |value| (key, value)))
    }
    pub fn len(&self) -> usize {
        self.index.len()
    }
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
impl<K: Eq + Hash, V: Eq + Hash, H: BuildHasher + Default> Default for Lookup<K, V, H> {
    fn default() -> Self {
        Self::new()
    }
}

// Same as a Lookup, but with a secondary key in between: K1 -> K2 -> {V}.
#[derive(Debug)]
pub struct MultiLookup<K1, K2, V, H = IdHasher> {
    index: HashMap<K1, Lookup<K2, V, H>, H>,
}
impl<K1, K2, V, H> MultiLookup<K1, K2, V, H>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    H: BuildHasher + Default,
{
    pub fn new() -> Self {
        Self {
            index: HashMap::<K1, Lookup<K2, V, H>, H>::default(),
        }
    }
    pub fn add(&mut self, k1: K1, k2: K2, value: V) -> bool {
        self.index.entry(k1).or_default().insert(k2, value)
    }
    pub fn remove(&mut self, k1: &K1, k2: &K2, value: &V) -> bool {
        let Some(nested) = self.index.get_mut(k1) else {
            return false;
        };
        let removed = nested.remove(k2, value);
        if nested.is_empty() {
            self.index.remove(k1);
        }
        removed
    }
    pub fn lookup(&self, k1: &K1) -> Option<&Lookup<K2, V, H>> {
        self.index.get(k1)
    }
    pub fn get(&self, k1: &K1, k2: &K2) -> Option<&HashSet<V, H>> {
        self.index.get(k1).and_then(|nested| nested.lookup(k2))
    }
    pub fn contains(&self, k1: &K1, k2: &K2, value: &V) -> bool {
        self.index
            .get(k1)
            .is_some_and(|nested| nested.contains(k2, value))
    }
    pub fn contains_key(&self, k1: &K1) -> bool {
        self.index.contains_key(k1)
    }
    pub fn keys(&self) -> impl Iterator<Item = &K1> {
        self.index.keys()
    }
    pub fn len(&self) -> usize {
        self.index.len()
    }
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
impl<K1, K2, V, H> Default for MultiLookup<K1, K2, V, H>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    H: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
