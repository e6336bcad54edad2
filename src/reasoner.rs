//! Forward-chaining closure over transitive relation types.
//!
//! A relation type `r` composes over `q` when `r` is transitive (then `q = r`)
//! or when `q` is listed in its `transitive_over` set. For every such pair,
//! `x --r--> y` and `y --q--> z` entail `x --r--> z`. The derived fact always
//! carries the outer relation type `r`.
//!
//! Each pass reads a stable store: derivations are staged and only added once
//! every relation type has been visited. Passes repeat until one stages
//! nothing, which happens eventually since there are finitely many node pairs
//! per relation type.
use std::collections::{BTreeSet, HashSet};

// term identities are u32, so bridging nodes are found by intersecting bitmaps
use roaring::RoaringBitmap;
use tracing::{debug, info, trace, warn};

use crate::construct::{IdHasher, RelationTypeId, RelationTypeKeeper, TermId};
use crate::triple::Facts;

type Staged = HashSet<(TermId, RelationTypeId, TermId), IdHasher>;

/// Transitivity metadata the reasoner needs for each relation type.
pub trait Transitivity {
    fn is_transitive(&self, relation: &RelationTypeId) -> bool;
    fn transitive_over(&self, relation: &RelationTypeId) -> BTreeSet<RelationTypeId>;

    /// The relation types `relation` may compose across, itself included when
    /// it is transitive.
    fn composable_over(&self, relation: &RelationTypeId) -> BTreeSet<RelationTypeId> {
        let mut over = self.transitive_over(relation);
        if self.is_transitive(relation) {
            over.insert(relation.clone());
        }
        over
    }
}

impl Transitivity for RelationTypeKeeper {
    fn is_transitive(&self, relation: &RelationTypeId) -> bool {
        self.get(relation).is_some_and(|r| r.is_transitive())
    }
    fn transitive_over(&self, relation: &RelationTypeId) -> BTreeSet<RelationTypeId> {
        self.get(relation)
            .map(|r| r.transitive_over().clone())
            .unwrap_or_default()
    }
}

/// Outcome of a closure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Closure {
    /// Passes run, including the final one that derived nothing.
    pub passes: usize,
    /// Facts added to the store.
    pub derived: usize,
    /// False only when a pass cap stopped the run early.
    pub converged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Reasoner {
    max_passes: Option<usize>,
}

impl Reasoner {
    pub fn new() -> Self {
        Self { max_passes: None }
    }

    /// Stops the closure after `max_passes` passes even if it has not reached
    /// its fixpoint.
    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn close<T: Transitivity>(&self, facts: &mut Facts, metadata: &T) -> Closure {
        let mut closure = Closure::default();
        let before = facts.len();
        loop {
            if let Some(max) = self.max_passes {
                if closure.passes >= max {
                    warn!(passes = closure.passes, derived = closure.derived, "closure stopped before its fixpoint");
                    return closure;
                }
            }
            let staged = derive(facts, metadata);
            closure.passes += 1;
            debug!(pass = closure.passes, staged = staged.len(), "closure pass");
            if staged.is_empty() {
                break;
            }
            for (x, r, z) in staged {
                trace!(subject = %x, relation = %r, object = %z, "derived");
                if facts.add(x, r, z) {
                    closure.derived += 1;
                }
            }
        }
        closure.converged = true;
        info!(
            passes = closure.passes,
            derived = closure.derived,
            facts = facts.len(),
            asserted = before,
            "closure reached its fixpoint"
        );
        closure
    }
}

/// Closes `facts` with no pass cap.
pub fn close<T: Transitivity>(facts: &mut Facts, metadata: &T) -> Closure {
    Reasoner::new().close(facts, metadata)
}

// One pass over a snapshot of the store.
fn derive<T: Transitivity>(facts: &Facts, metadata: &T) -> Staged {
    let mut staged = Staged::default();
    let mut relations: Vec<&RelationTypeId> = facts.all_relation_types().collect();
    relations.sort();
    for r in relations {
        let over = metadata.composable_over(r);
        if over.is_empty() {
            continue;
        }
        let reached: RoaringBitmap = facts.objects_by_relation(r).map(TermId::value).collect();
        for q in &over {
            let starting: RoaringBitmap = facts.subjects_by_relation(q).map(TermId::value).collect();
            for y in (&reached & &starting).iter().map(TermId::new) {
                for x in facts.subjects_of(r, &y) {
                    for z in facts.objects_of(&y, q) {
                        if !facts.contains(x, r, z) {
                            staged.insert((*x, r.clone(), *z));
                        }
                    }
                }
            }
        }
    }
    staged
}
