//! In-memory RDF graph
//!
//! Terms are `oxrdf` terms as produced by the `oxrdfxml` reader. The graph
//! itself is a thin index over the parsed statements: one owned
//! `Vec<Statement>` in document order plus predicate and subject indexes, so
//! that every walk over the graph is deterministic for a given document.

pub mod vocab;
pub mod xml;

pub use oxrdf::{BlankNode, Literal, NamedNode, Term};

use std::collections::{HashMap, HashSet};

/// Accessors the extraction code needs on every term
pub trait TermExt {
    /// Lexical form: the IRI, the blank node id, or the literal value
    fn lexical(&self) -> &str;

    fn as_iri(&self) -> Option<&str>;

    /// True when this term is the IRI `iri`
    fn is(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl TermExt for Term {
    fn lexical(&self) -> &str {
        match self {
            Term::NamedNode(node) => node.as_str(),
            Term::BlankNode(node) => node.as_str(),
            Term::Literal(literal) => literal.value(),
        }
    }

    fn as_iri(&self) -> Option<&str> {
        match self {
            Term::NamedNode(node) => Some(node.as_str()),
            _ => None,
        }
    }
}

/// Named node term; the IRI is not validated
pub fn iri(iri: impl Into<String>) -> Term {
    NamedNode::new_unchecked(iri).into()
}

/// Blank node term with a caller-chosen id
pub fn blank(id: impl Into<String>) -> Term {
    BlankNode::new_unchecked(id).into()
}

/// Plain string literal term
pub fn literal(value: impl Into<String>) -> Term {
    Literal::new_simple_literal(value).into()
}

/// A single statement, with the subject widened to a `Term`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: NamedNode,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: &str, object: Term) -> Self {
        Self {
            subject,
            predicate: NamedNode::new_unchecked(predicate),
            object,
        }
    }
}

impl From<oxrdf::Triple> for Statement {
    fn from(triple: oxrdf::Triple) -> Self {
        Self {
            subject: triple.subject.into(),
            predicate: triple.predicate,
            object: triple.object,
        }
    }
}

/// Indexed, duplicate-free statement set
#[derive(Debug, Default)]
pub struct Graph {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
    by_predicate: HashMap<String, Vec<usize>>,
    by_subject: HashMap<Term, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement; returns false if it was already present
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.seen.contains(&statement) {
            return false;
        }

        let index = self.statements.len();
        self.by_predicate
            .entry(statement.predicate.as_str().to_string())
            .or_default()
            .push(index);
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(index);
        self.seen.insert(statement.clone());
        self.statements.push(statement);
        true
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.seen
            .contains(&Statement::new(subject.clone(), predicate, object.clone()))
    }

    /// All `(subject, object)` pairs for a predicate, in document order
    pub fn subject_objects<'a>(
        &'a self,
        predicate: &str,
    ) -> impl Iterator<Item = (&'a Term, &'a Term)> + 'a {
        self.by_predicate
            .get(predicate)
            .into_iter()
            .flatten()
            .map(move |&i| (&self.statements[i].subject, &self.statements[i].object))
    }

    /// Objects of `subject` under `predicate`
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
            .filter(move |s| s.predicate.as_str() == predicate)
            .map(|s| &s.object)
    }

    /// First object of `subject` under `predicate`
    pub fn value(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.by_subject
            .get(subject)?
            .iter()
            .map(|&i| &self.statements[i])
            .find(|s| s.predicate.as_str() == predicate)
            .map(|s| &s.object)
    }

    /// Any object for `predicate` anywhere in the graph
    pub fn any_value(&self, predicate: &str) -> Option<&Term> {
        self.subject_objects(predicate).map(|(_, o)| o).next()
    }

    /// Every distinct subject or object term, in order of first appearance
    pub fn nodes(&self) -> Vec<&Term> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for statement in &self.statements {
            for term in [&statement.subject, &statement.object] {
                if seen.insert(term) {
                    nodes.push(term);
                }
            }
        }
        nodes
    }

    /// Members of an RDF collection starting at `head`.
    ///
    /// Returns `None` when the list is malformed (missing `rdf:first`, a
    /// dangling `rdf:rest`, or a cycle).
    pub fn list_items(&self, head: &Term) -> Option<Vec<&Term>> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut current = head;

        while !current.is(vocab::RDF_NIL) {
            if !visited.insert(current) {
                return None;
            }
            items.push(self.value(current, vocab::RDF_FIRST)?);
            current = self.value(current, vocab::RDF_REST)?;
        }

        Some(items)
    }
}

impl FromIterator<Statement> for Graph {
    fn from_iter<I: IntoIterator<Item = Statement>>(statements: I) -> Self {
        let mut graph = Graph::new();
        for statement in statements {
            graph.insert(statement);
        }
        graph
    }
}
