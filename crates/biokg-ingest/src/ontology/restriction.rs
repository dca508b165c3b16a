// Restriction resolution
//
// OWL encodes most relations other than plain subclassing as anonymous class
// expressions hanging off `rdfs:subClassOf` / `owl:equivalentClass`:
//
//   CL_0000540 subClassOf [ a owl:Restriction ;
//                           owl:onProperty BFO_0000050 ;
//                           owl:someValuesFrom UBERON_0001016 ]
//
// The resolver unwraps such blocks (and intersections of them) into the
// concrete target term for a given relation.

use super::cache::{Collection, PredicateCache};
use super::key::term_key;
use crate::rdf::{vocab, Graph, Term, TermExt};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Nesting limit for intersection expressions
pub const MAX_DEPTH: usize = 16;

pub struct RestrictionResolver<'a> {
    graph: &'a Graph,
    cache: &'a PredicateCache,
}

impl<'a> RestrictionResolver<'a> {
    /// The cache must hold the structural collections (types, onProperty,
    /// someValuesFrom, allValuesFrom, intersectionOf) of `graph`.
    pub fn new(graph: &'a Graph, cache: &'a PredicateCache) -> Self {
        Self { graph, cache }
    }

    /// Resolve `node` to the term it denotes under the relation `context`.
    ///
    /// Named terms resolve to themselves. A restriction resolves to its
    /// filler only when its `owl:onProperty` is `context`. An intersection
    /// resolves to its first member that resolves; within an intersection a
    /// named member is the genus class and only counts for `rdfs:subClassOf`.
    pub fn resolve(&self, node: &Term, context: &str) -> Option<Term> {
        let mut visited = HashSet::new();
        self.resolve_at(node, context, 0, &mut visited)
    }

    /// Try each relation in turn and return the first that resolves
    pub fn resolve_any<'c>(&self, node: &Term, contexts: &[&'c str]) -> Option<(&'c str, Term)> {
        contexts
            .iter()
            .find_map(|context| self.resolve(node, context).map(|target| (*context, target)))
    }

    fn resolve_at(
        &self,
        node: &Term,
        context: &str,
        depth: usize,
        visited: &mut HashSet<String>,
    ) -> Option<Term> {
        match node {
            Term::Literal(_) => None,
            Term::NamedNode(_) if depth == 0 || context == vocab::RDFS_SUBCLASS_OF => {
                Some(node.clone())
            },
            Term::NamedNode(_) => None,
            Term::BlankNode(_) => {
                if depth > MAX_DEPTH {
                    warn!(node = %node, depth, "Class expression nested too deeply; skipping");
                    return None;
                }

                let key = term_key(node)?;
                if self.cache.is_restriction(&key) {
                    return self.restriction_target(&key, context);
                }

                let head = self.cache.first(&key, Collection::IntersectionOf)?;
                if !visited.insert(key.clone()) {
                    debug!(node = %node, "Cyclic intersection expression");
                    return None;
                }

                let Some(members) = self.graph.list_items(head) else {
                    warn!(node = %node, "Malformed intersection list; skipping");
                    return None;
                };

                members
                    .into_iter()
                    .find_map(|member| self.resolve_at(member, context, depth + 1, visited))
            },
        }
    }

    fn restriction_target(&self, key: &str, context: &str) -> Option<Term> {
        let on_property = self.cache.first(key, Collection::OnProperty)?;
        if !on_property.is(context) {
            return None;
        }

        self.cache
            .first(key, Collection::SomeValuesFrom)
            .or_else(|| self.cache.first(key, Collection::AllValuesFrom))
            .filter(|filler| !filler.is_literal())
            .cloned()
    }
}
