//! The ontology: terms, relation types, their is-a hierarchies and the facts
//! relating terms to each other.
//!
//! An [`Ontology`] is filled in during a build phase, either record by record
//! through the builder methods or from an OBO document with
//! [`Ontology::load`], and may then be closed once with the reasoner. Closing
//! seals it: afterwards it only answers queries, through [`TermView`] and
//! [`RelationTypeView`].
//!
//! ```
//! use obograph::construct::{RelationTypeId, TermId};
//! use obograph::ontology::{Ontology, OntologyOptions};
//!
//! let obo = "\
//! [Term]
//! id: GO:0000001
//! relationship: part_of GO:0000002
//!
//! [Term]
//! id: GO:0000002
//! relationship: part_of GO:0000003
//!
//! [Typedef]
//! id: part_of
//! is_transitive: true
//! ";
//! let ontology = Ontology::load(obo.as_bytes(), OntologyOptions::default()).unwrap();
//! let part_of = RelationTypeId::new("part_of");
//! assert!(ontology.contains_fact(&TermId::new(1), &part_of, &TermId::new(3)));
//! ```
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::construct::{
    Lookup, Namespace, RelationType, RelationTypeId, RelationTypeKeeper, Term, TermId, TermKeeper,
};
use crate::error::{OboError, Result};
use crate::parser::LineParser;
use crate::reasoner::{Closure, Reasoner};
use crate::stanza::{Stanza, StanzaCollector, StanzaListener, TagValue};
use crate::triple::Facts;

lazy_static! {
    static ref PREFIXED_ID: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9_]*):([0-9]+)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyOptions {
    /// Prefix every term identifier must carry, as in `GO:0000001`.
    pub id_prefix: String,
    /// Close the ontology once a document has been loaded.
    pub close: bool,
    /// Optional cap on the number of closure passes.
    pub max_passes: Option<usize>,
}

impl Default for OntologyOptions {
    fn default() -> Self {
        Self {
            id_prefix: String::from("GO"),
            close: true,
            max_passes: None,
        }
    }
}

// a term read from a [Term] stanza, fully resolved before anything is kept
struct TermRecord {
    id: TermId,
    name: Option<String>,
    namespace: Option<Namespace>,
    parents: Vec<TermId>,
    relationships: Vec<(RelationTypeId, TermId)>,
}

struct TypedefRecord {
    id: RelationTypeId,
    name: Option<String>,
    transitive: bool,
    parents: Vec<RelationTypeId>,
    transitive_over: Vec<RelationTypeId>,
}

#[derive(Debug, Default)]
pub struct Ontology {
    options: OntologyOptions,
    header: Vec<TagValue>,
    default_namespace: Option<Namespace>,
    // owns keepers for terms and relation types
    terms: TermKeeper,
    relation_types: RelationTypeKeeper,
    // is-a hierarchies, indexed in both directions
    term_parents: Lookup<TermId, TermId>,
    term_children: Lookup<TermId, TermId>,
    relation_type_parents: Lookup<RelationTypeId, RelationTypeId>,
    relation_type_children: Lookup<RelationTypeId, RelationTypeId>,
    facts: Facts,
    // set once the reasoner has run
    closure: Option<Closure>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::with_options(OntologyOptions::default())
    }

    pub fn with_options(options: OntologyOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Builds an ontology from an OBO document.
    pub fn load<R: BufRead>(reader: R, options: OntologyOptions) -> Result<Self> {
        let mut parser = LineParser::new(StanzaCollector::new(Self::with_options(options)));
        parser.parse(reader)?;
        Ok(parser.into_listener().into_listener())
    }

    pub fn load_path(path: impl AsRef<Path>, options: OntologyOptions) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading ontology");
        let file = File::open(path)?;
        Self::load(BufReader::new(file), options)
    }

    pub fn options(&self) -> &OntologyOptions {
        &self.options
    }

    /// Tag-value pairs of the document header.
    pub fn header(&self) -> &[TagValue] {
        &self.header
    }

    pub fn default_namespace(&self) -> Option<Namespace> {
        self.default_namespace
    }

    // ------------- Building -------------

    /// Returns the term with the given id, creating it if needed.
    pub fn term(&mut self, id: TermId) -> &Term {
        let namespace = self.default_namespace;
        self.terms.keep(id, namespace).0
    }

    /// Returns the relation type with the given id, creating it if needed.
    pub fn relation_type(&mut self, id: RelationTypeId) -> &RelationType {
        self.relation_types.keep(id).0
    }

    pub fn add_is_a(&mut self, child: TermId, parent: TermId) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.keep_is_a(child, parent))
    }

    pub fn add_relation_type_is_a(&mut self, child: RelationTypeId, parent: RelationTypeId) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.keep_relation_type_is_a(child, parent))
    }

    /// Adds a fact, creating its terms and relation type as needed. Returns
    /// `false` if the fact was already present.
    pub fn add_fact(&mut self, subject: TermId, relation: RelationTypeId, object: TermId) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.keep_fact(subject, relation, object))
    }

    /// Declares `relation` transitive, or not.
    pub fn set_transitive(&mut self, relation: RelationTypeId, transitive: bool) -> Result<()> {
        self.ensure_open()?;
        self.relation_types.keep(relation).0.set_transitive(transitive);
        Ok(())
    }

    /// Lets `relation` compose over `over` during closure.
    pub fn add_transitive_over(&mut self, relation: RelationTypeId, over: RelationTypeId) -> Result<bool> {
        self.ensure_open()?;
        self.relation_types.keep(over.clone());
        Ok(self.relation_types.keep(relation).0.add_transitive_over(over))
    }

    fn ensure_open(&self) -> Result<()> {
        match self.closure {
            Some(_) => Err(OboError::Sealed),
            None => Ok(()),
        }
    }

    fn keep_term(&mut self, id: TermId) {
        let namespace = self.default_namespace;
        self.terms.keep(id, namespace);
    }

    fn keep_is_a(&mut self, child: TermId, parent: TermId) -> bool {
        self.keep_term(child);
        self.keep_term(parent);
        self.term_children.insert(parent, child);
        self.term_parents.insert(child, parent)
    }

    fn keep_relation_type_is_a(&mut self, child: RelationTypeId, parent: RelationTypeId) -> bool {
        self.relation_types.keep(child.clone());
        self.relation_types.keep(parent.clone());
        self.relation_type_children.insert(parent.clone(), child.clone());
        self.relation_type_parents.insert(child, parent)
    }

    fn keep_fact(&mut self, subject: TermId, relation: RelationTypeId, object: TermId) -> bool {
        self.keep_term(subject);
        self.keep_term(object);
        self.relation_types.keep(relation.clone());
        self.facts.add(subject, relation, object)
    }

    // ------------- Reasoning -------------

    /// Closes the facts under the transitivity rules of their relation types
    /// and seals the ontology. Closing again derives nothing.
    pub fn close(&mut self) -> Closure {
        let reasoner = Reasoner::new().with_max_passes(self.options.max_passes);
        let closure = reasoner.close(&mut self.facts, &self.relation_types);
        self.closure = Some(closure);
        closure
    }

    pub fn is_closed(&self) -> bool {
        self.closure.is_some()
    }

    /// Summary of the last closure run.
    pub fn closure(&self) -> Option<Closure> {
        self.closure
    }

    // ------------- Queries -------------

    pub fn find_term(&self, id: TermId) -> Option<TermView<'_>> {
        self.terms.get(&id).map(|term| TermView { ontology: self, term })
    }

    pub fn find_relation_type(&self, id: &RelationTypeId) -> Option<RelationTypeView<'_>> {
        self.relation_types
            .get(id)
            .map(|relation_type| RelationTypeView { ontology: self, relation_type })
    }

    pub fn all_terms(&self) -> impl Iterator<Item = TermView<'_>> {
        self.terms.iter().map(move |term| TermView { ontology: self, term })
    }

    pub fn all_relation_types(&self) -> impl Iterator<Item = RelationTypeView<'_>> {
        self.relation_types
            .iter()
            .map(move |relation_type| RelationTypeView { ontology: self, relation_type })
    }

    pub fn contains_fact(&self, subject: &TermId, relation: &RelationTypeId, object: &TermId) -> bool {
        self.facts.contains(subject, relation, object)
    }

    /// The fact store, read-only.
    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn relation_type_count(&self) -> usize {
        self.relation_types.len()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    // ------------- Identifiers -------------

    /// Parses a prefixed term identifier such as `GO:0000001`. Anything after
    /// the first blank is ignored.
    pub fn parse_term_id(&self, text: &str) -> Result<TermId> {
        let token = first_token(text);
        let malformed = || OboError::MalformedId {
            value: token.to_owned(),
            expected: format!("{}:<digits>", self.options.id_prefix),
        };
        let captures = PREFIXED_ID.captures(token).ok_or_else(malformed)?;
        if &captures[1] != self.options.id_prefix.as_str() {
            return Err(malformed());
        }
        captures[2].parse::<u32>().map(TermId::new).map_err(|_| malformed())
    }

    pub fn format_term_id(&self, id: TermId) -> String {
        format!("{}:{}", self.options.id_prefix, id)
    }

    fn parse_relation_type_id(&self, text: &str) -> Result<RelationTypeId> {
        match first_token(text) {
            "" => Err(OboError::MalformedId {
                value: text.to_owned(),
                expected: String::from("a relation type id"),
            }),
            token => Ok(RelationTypeId::new(token)),
        }
    }

    // relationship: <relation type> <term id>
    fn parse_relationship(&self, text: &str) -> Result<(RelationTypeId, TermId)> {
        let Some((relation, target)) = text.trim().split_once(char::is_whitespace) else {
            return Err(OboError::MalformedRelationship(text.to_owned()));
        };
        Ok((RelationTypeId::new(relation), self.parse_term_id(target)?))
    }

    // ------------- Records -------------

    fn read_term(&self, stanza: &Stanza) -> Result<TermRecord> {
        let id = stanza.value("id").ok_or_else(|| OboError::MissingId {
            stanza: stanza.name().to_owned(),
        })?;
        let id = self.parse_term_id(id)?;
        let namespace = stanza
            .value("namespace")
            .map(str::parse::<Namespace>)
            .transpose()?;
        let parents = stanza
            .values("is_a")
            .map(|value| self.parse_term_id(value))
            .collect::<Result<Vec<_>>>()?;
        let relationships = stanza
            .values("relationship")
            .map(|value| self.parse_relationship(value))
            .collect::<Result<Vec<_>>>()?;
        Ok(TermRecord {
            id,
            name: stanza.value("name").map(|name| name.trim().to_owned()),
            namespace,
            parents,
            relationships,
        })
    }

    fn read_typedef(&self, stanza: &Stanza) -> Result<TypedefRecord> {
        let id = stanza
            .value("id")
            .map(first_token)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| OboError::MissingId {
                stanza: stanza.name().to_owned(),
            })?;
        let parents = stanza
            .values("is_a")
            .map(|value| self.parse_relation_type_id(value))
            .collect::<Result<Vec<_>>>()?;
        let transitive_over = stanza
            .values("transitive_over")
            .map(|value| self.parse_relation_type_id(value))
            .collect::<Result<Vec<_>>>()?;
        Ok(TypedefRecord {
            id: RelationTypeId::new(id),
            name: stanza.value("name").map(|name| name.trim().to_owned()),
            transitive: stanza
                .value("is_transitive")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
            parents,
            transitive_over,
        })
    }

    fn keep_term_record(&mut self, record: TermRecord) {
        let namespace = self.default_namespace;
        let (term, _) = self.terms.keep(record.id, namespace);
        if let Some(name) = record.name {
            term.set_name(name);
        }
        if let Some(namespace) = record.namespace {
            term.set_namespace(namespace);
        }
        for parent in record.parents {
            self.keep_is_a(record.id, parent);
        }
        for (relation, object) in record.relationships {
            self.keep_fact(record.id, relation, object);
        }
    }

    fn keep_typedef_record(&mut self, record: TypedefRecord) {
        let (relation_type, _) = self.relation_types.keep(record.id.clone());
        if let Some(name) = record.name {
            relation_type.set_name(name);
        }
        relation_type.set_transitive(record.transitive);
        for over in record.transitive_over {
            self.relation_types.keep(over.clone());
            self.relation_types.keep(record.id.clone()).0.add_transitive_over(over);
        }
        for parent in record.parents {
            self.keep_relation_type_is_a(record.id.clone(), parent);
        }
    }

    fn build(&mut self, stanza: &Stanza) -> Result<()> {
        match stanza.name() {
            "Term" => {
                let record = self.read_term(stanza)?;
                self.keep_term_record(record);
            }
            "Typedef" => {
                let record = self.read_typedef(stanza)?;
                self.keep_typedef_record(record);
            }
            other => debug!(stanza = other, line = stanza.line(), "skipping stanza"),
        }
        Ok(())
    }
}

fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

impl StanzaListener for Ontology {
    fn on_header(&mut self, header: &[TagValue]) -> Result<()> {
        for tag_value in header {
            if tag_value.tag() == "default-namespace" {
                match tag_value.value().parse::<Namespace>() {
                    Ok(namespace) => self.default_namespace = Some(namespace),
                    Err(e) => warn!(error = %e, "ignoring default namespace"),
                }
            }
        }
        self.header.extend_from_slice(header);
        Ok(())
    }

    fn on_stanza(&mut self, stanza: &Stanza) -> Result<()> {
        self.ensure_open()?;
        self.build(stanza).map_err(|source| OboError::Record {
            stanza: stanza.name().to_owned(),
            line: stanza.line(),
            source: Box::new(source),
        })
    }

    fn on_end(&mut self) -> Result<()> {
        info!(
            terms = self.term_count(),
            relation_types = self.relation_type_count(),
            facts = self.fact_count(),
            "ontology loaded"
        );
        if self.options.close {
            self.close();
        }
        Ok(())
    }
}

// ------------- Views -------------

/// A term together with the ontology it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TermView<'o> {
    ontology: &'o Ontology,
    term: &'o Term,
}

impl<'o> TermView<'o> {
    pub fn term(&self) -> &'o Term {
        self.term
    }
    pub fn id(&self) -> TermId {
        self.term.id()
    }
    pub fn name(&self) -> Option<&'o str> {
        self.term.name()
    }
    pub fn namespace(&self) -> Option<Namespace> {
        self.term.namespace()
    }

    /// Direct is-a parents.
    pub fn parents(&self) -> impl Iterator<Item = TermView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .term_parents
            .lookup(&self.id())
            .into_iter()
            .flatten()
            .filter_map(move |id| ontology.find_term(*id))
    }

    /// Direct is-a children.
    pub fn children(&self) -> impl Iterator<Item = TermView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .term_children
            .lookup(&self.id())
            .into_iter()
            .flatten()
            .filter_map(move |id| ontology.find_term(*id))
    }

    /// Terms this term reaches through `relation`.
    pub fn related_objects(&self, relation: &RelationTypeId) -> impl Iterator<Item = TermView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .facts
            .objects_of(&self.id(), relation)
            .filter_map(move |id| ontology.find_term(*id))
    }

    /// Terms reaching this term through `relation`.
    pub fn related_subjects(&self, relation: &RelationTypeId) -> impl Iterator<Item = TermView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .facts
            .subjects_of(relation, &self.id())
            .filter_map(move |id| ontology.find_term(*id))
    }

    /// Every outgoing fact as a (relation type, object) pair.
    pub fn relations(&self) -> impl Iterator<Item = (RelationTypeView<'o>, TermView<'o>)> + use<'o> {
        let ontology = self.ontology;
        let id = self.id();
        ontology
            .facts
            .relation_types_from_subject(&id)
            .filter_map(move |relation| ontology.find_relation_type(relation))
            .flat_map(move |relation| {
                ontology
                    .facts
                    .objects_of(&id, relation.id())
                    .filter_map(move |object| ontology.find_term(*object))
                    .map(move |object| (relation, object))
            })
    }

    pub fn outgoing_relation_types(&self) -> impl Iterator<Item = RelationTypeView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .facts
            .relation_types_from_subject(&self.id())
            .filter_map(move |relation| ontology.find_relation_type(relation))
    }

    pub fn incoming_relation_types(&self) -> impl Iterator<Item = RelationTypeView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .facts
            .relation_types_to_object(&self.id())
            .filter_map(move |relation| ontology.find_relation_type(relation))
    }
}

impl PartialEq for TermView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.term.id() == other.term.id()
    }
}
impl Eq for TermView<'_> {}

impl fmt::Display for TermView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.ontology.format_term_id(self.id()))
    }
}

/// A relation type together with the ontology it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct RelationTypeView<'o> {
    ontology: &'o Ontology,
    relation_type: &'o RelationType,
}

impl<'o> RelationTypeView<'o> {
    pub fn relation_type(&self) -> &'o RelationType {
        self.relation_type
    }
    pub fn id(&self) -> &'o RelationTypeId {
        self.relation_type.id()
    }
    pub fn name(&self) -> Option<&'o str> {
        self.relation_type.name()
    }
    pub fn is_transitive(&self) -> bool {
        self.relation_type.is_transitive()
    }

    pub fn transitive_over(&self) -> impl Iterator<Item = RelationTypeView<'o>> + use<'o> {
        let ontology = self.ontology;
        self.relation_type
            .transitive_over()
            .iter()
            .filter_map(move |id| ontology.find_relation_type(id))
    }

    pub fn parents(&self) -> impl Iterator<Item = RelationTypeView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .relation_type_parents
            .lookup(self.id())
            .into_iter()
            .flatten()
            .filter_map(move |id| ontology.find_relation_type(id))
    }

    pub fn children(&self) -> impl Iterator<Item = RelationTypeView<'o>> + use<'o> {
        let ontology = self.ontology;
        ontology
            .relation_type_children
            .lookup(self.id())
            .into_iter()
            .flatten()
            .filter_map(move |id| ontology.find_relation_type(id))
    }
}

impl PartialEq for RelationTypeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.relation_type.id() == other.relation_type.id()
    }
}
impl Eq for RelationTypeView<'_> {}

impl fmt::Display for RelationTypeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}
