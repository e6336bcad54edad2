//! Obograph – an indexed triple store and transitive-closure reasoner for
//! ontologies written in the OBO flat file format.
//!
//! An ontology is a graph of *terms* connected by typed *facts*:
//! * A [`construct::Term`] is a node, identified by the integer part of its
//!   prefixed identifier (`GO:0000001` is kept as `TermId(1)`).
//! * A [`construct::RelationType`] labels edges, and may be transitive or
//!   transitive over other relation types.
//! * A fact is a `(subject, relation type, object)` triple, kept in a
//!   [`triple::TripleStore`].
//! * Terms and relation types additionally form is-a hierarchies, which are
//!   kept apart from the facts.
//!
//! Terms and relation types are owned and deduplicated by "keeper" structures
//! (see the `construct` module), and every fact is indexed four ways so that
//! any question of the form "which objects does s reach through v" or "which
//! relation types point at o" is answered by a lookup rather than a scan.
//!
//! ## Modules
//! * [`construct`] – Identifiers, terms, relation types, their keepers and the
//!   [`construct::Lookup`] / [`construct::MultiLookup`] indexes.
//! * [`triple`] – The four-way indexed fact store.
//! * [`reasoner`] – Closure of the facts under the transitivity rules.
//! * [`parser`] – Line reader for the OBO format (grammar in `obo.pest`).
//! * [`stanza`] – Groups reader events into a header and stanzas.
//! * [`ontology`] – Builds an [`ontology::Ontology`] from stanzas and answers
//!   queries about it.
//! * [`settings`] – Settings read from `obograph.toml` and the environment.
//!
//! ## Closure
//! When `r` is transitive, `x r y` and `y r z` entail `x r z`. When `r` is
//! transitive over `q`, `x r y` and `y q z` entail `x r z`. The derived fact
//! carries `r`. Closure runs in passes until a pass derives nothing, after
//! which the ontology is sealed and only answers queries.
//!
//! ## Quick Start
//! ```
//! use obograph::construct::{RelationTypeId, TermId};
//! use obograph::ontology::Ontology;
//!
//! let mut ontology = Ontology::new();
//! let part_of = RelationTypeId::new("part_of");
//! ontology.set_transitive(part_of.clone(), true).unwrap();
//! ontology.add_fact(TermId::new(1), part_of.clone(), TermId::new(2)).unwrap();
//! ontology.add_fact(TermId::new(2), part_of.clone(), TermId::new(3)).unwrap();
//! ontology.close();
//! assert!(ontology.contains_fact(&TermId::new(1), &part_of, &TermId::new(3)));
//! ```
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod construct;
pub mod error;
pub mod ontology;
pub mod parser;
pub mod reasoner;
pub mod settings;
pub mod stanza;
pub mod triple;

pub use error::{OboError, Result};
