//! OWL2 entities — classes, object properties, and individuals
//!
//! Each entity wraps a shared, interned [`IRI`] behind an `Arc` so that repeated
//! references across axioms and refinement streams are cheap to clone.
//! Property *characteristics* (transitive, symmetric, ...) are **not**
//! stored on the entity — they are RBox axioms and live in [`crate::axiom`].

use crate::cache::BoundedCache;
use crate::error::OwlResult;
use crate::iri::IRI;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::sync::Arc;

/// Global entity cache for sharing IRIs across all entities with size limits
static GLOBAL_ENTITY_CACHE: Lazy<BoundedCache<String, Arc<IRI>>> =
    Lazy::new(|| BoundedCache::with_max_size(5_000));

fn get_shared_iri<S: Into<String>>(iri: S) -> OwlResult<Arc<IRI>> {
    let iri_str = iri.into();
    if let Some(cached) = GLOBAL_ENTITY_CACHE.get(&iri_str) {
        return Ok(cached);
    }
    let arc_iri = Arc::new(IRI::new(iri_str.clone())?);
    GLOBAL_ENTITY_CACHE.insert(iri_str, arc_iri.clone());
    Ok(arc_iri)
}

/// Clear the global entity cache. Exposed for long-running hosts (editor
/// plugins) that want to release memory between repair sessions.
pub fn clear_global_entity_cache() {
    GLOBAL_ENTITY_CACHE.clear();
}

/// A named class (atomic concept name) in the Description Logic sense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Class {
    iri: Arc<IRI>,
    annotations: SmallVec<[Annotation; 2]>,
}

impl Class {
    /// Create a new class with the given IRI, interning it in the global cache.
    pub fn new<I: Into<IRI> + Clone>(iri: I) -> Self {
        let iri_clone = iri.clone();
        let shared = get_shared_iri(iri.into().as_str()).unwrap_or_else(|_| Arc::new(iri_clone.into()));
        Class {
            iri: shared,
            annotations: SmallVec::new(),
        }
    }

    pub fn iri(&self) -> &IRI {
        &self.iri
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// `owl:Thing`, the top concept.
    pub fn is_thing(&self) -> bool {
        self.iri.as_str() == crate::constants::OWL_THING
    }

    /// `owl:Nothing`, the bottom concept.
    pub fn is_nothing(&self) -> bool {
        self.iri.as_str() == crate::constants::OWL_NOTHING
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iri)
    }
}

/// A named object property (role) in the Description Logic sense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectProperty {
    iri: Arc<IRI>,
    annotations: SmallVec<[Annotation; 2]>,
}

impl ObjectProperty {
    pub fn new<I: Into<IRI> + Clone>(iri: I) -> Self {
        let iri_clone = iri.clone();
        let shared = get_shared_iri(iri.into().as_str()).unwrap_or_else(|_| Arc::new(iri_clone.into()));
        ObjectProperty {
            iri: shared,
            annotations: SmallVec::new(),
        }
    }

    pub fn iri(&self) -> &IRI {
        &self.iri
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

impl std::fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iri)
    }
}

/// A named individual. Anonymous individuals (blank nodes) are parser
/// machinery and are not modeled — see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedIndividual {
    iri: Arc<IRI>,
}

impl NamedIndividual {
    pub fn new<I: Into<IRI> + Clone>(iri: I) -> Self {
        let iri_clone = iri.clone();
        let shared = get_shared_iri(iri.into().as_str()).unwrap_or_else(|_| Arc::new(iri_clone.into()));
        NamedIndividual { iri: shared }
    }

    pub fn iri(&self) -> &IRI {
        &self.iri
    }
}

impl std::fmt::Display for NamedIndividual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iri)
    }
}

/// A lightweight annotation on an entity or axiom: `(property, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Annotation {
    property: Arc<IRI>,
    value: AnnotationValue,
}

impl Annotation {
    pub fn new<I: Into<IRI> + Clone, V: Into<AnnotationValue>>(property: I, value: V) -> Self {
        let iri_clone = property.clone();
        let shared =
            get_shared_iri(property.into().as_str()).unwrap_or_else(|_| Arc::new(iri_clone.into()));
        Annotation {
            property: shared,
            value: value.into(),
        }
    }

    pub fn property(&self) -> &IRI {
        &self.property
    }

    pub fn value(&self) -> &AnnotationValue {
        &self.value
    }
}

/// The value carried by an [`Annotation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationValue {
    Iri(IRI),
    Literal(String),
}

impl From<IRI> for AnnotationValue {
    fn from(iri: IRI) -> Self {
        AnnotationValue::Iri(iri)
    }
}

impl From<String> for AnnotationValue {
    fn from(s: String) -> Self {
        AnnotationValue::Literal(s)
    }
}

impl From<&str> for AnnotationValue {
    fn from(s: &str) -> Self {
        AnnotationValue::Literal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_thing_and_nothing() {
        let top = Class::new(crate::constants::OWL_THING);
        let bot = Class::new(crate::constants::OWL_NOTHING);
        assert!(top.is_thing());
        assert!(bot.is_nothing());
        assert!(!top.is_nothing());
    }

    #[test]
    fn interned_classes_compare_equal() {
        let a = Class::new("http://example.org/A");
        let b = Class::new("http://example.org/A");
        assert_eq!(a, b);
    }
}
