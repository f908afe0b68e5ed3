//! OWL 2 entities: classes, object properties and named individuals.

use crate::vocab::owl;
use oxrdf::{IriParseError, NamedNode, NamedNodeRef};
use std::fmt;

/// An OWL class (`owl:Class`).
///
/// Every class is a subclass of `owl:Thing` and a superclass of `owl:Nothing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwlClass(NamedNode);

impl OwlClass {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    /// Builds a class from an IRI string, validating it.
    #[inline]
    pub fn from_iri(iri: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self(NamedNode::new(iri)?))
    }

    /// `owl:Thing`, the class of all individuals.
    pub fn thing() -> Self {
        Self(owl::THING.into_owned())
    }

    /// `owl:Nothing`, the empty class.
    pub fn nothing() -> Self {
        Self(owl::NOTHING.into_owned())
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    #[inline]
    pub fn as_ref(&self) -> NamedNodeRef<'_> {
        self.0.as_ref()
    }

    #[inline]
    pub fn is_thing(&self) -> bool {
        self.0 == owl::THING
    }

    #[inline]
    pub fn is_nothing(&self) -> bool {
        self.0 == owl::NOTHING
    }

    #[inline]
    pub fn into_inner(self) -> NamedNode {
        self.0
    }
}

impl fmt::Display for OwlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NamedNode> for OwlClass {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self(node)
    }
}

impl From<NamedNodeRef<'_>> for OwlClass {
    #[inline]
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self(node.into_owned())
    }
}

impl From<OwlClass> for NamedNode {
    #[inline]
    fn from(class: OwlClass) -> Self {
        class.0
    }
}

/// An OWL object property (`owl:ObjectProperty`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectProperty(NamedNode);

impl ObjectProperty {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    #[inline]
    pub fn from_iri(iri: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self(NamedNode::new(iri)?))
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    #[inline]
    pub fn as_ref(&self) -> NamedNodeRef<'_> {
        self.0.as_ref()
    }
}

impl fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NamedNode> for ObjectProperty {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self(node)
    }
}

impl From<NamedNodeRef<'_>> for ObjectProperty {
    #[inline]
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self(node.into_owned())
    }
}

/// A named individual (`owl:NamedIndividual`).
///
/// Anonymous individuals are not part of the supported fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Individual(NamedNode);

impl Individual {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    #[inline]
    pub fn from_iri(iri: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self(NamedNode::new(iri)?))
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    #[inline]
    pub fn as_ref(&self) -> NamedNodeRef<'_> {
        self.0.as_ref()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NamedNode> for Individual {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self(node)
    }
}

impl From<NamedNodeRef<'_>> for Individual {
    #[inline]
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self(node.into_owned())
    }
}
