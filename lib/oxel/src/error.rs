//! Error types of the reasoner.

use crate::axiom::Axiom;
use crate::entity::{Individual, ObjectProperty, OwlClass};
use oxrdf::Term;
use std::io;
use std::time::Duration;

/// An error raised while loading an ontology from RDF.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// I/O error while reading the input.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Syntax error in the RDF serialization.
    #[error(transparent)]
    Parse(#[from] oxrdfio::RdfParseError),
    /// The base IRI is not a valid IRI.
    #[error("invalid base IRI: {0}")]
    InvalidBaseIri(#[from] oxiri::IriParseError),
    /// A `rdf:first`/`rdf:rest` list is broken or cyclic.
    #[error("malformed RDF list starting at {head}: {message}")]
    MalformedList { head: Term, message: String },
    /// The format name or file extension is not recognized.
    #[error("unknown RDF format: {0}")]
    UnknownFormat(String),
}

/// An error raised while building the ontology index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    /// The ontology has more distinct expressions of some kind than ids can address.
    #[error("too many distinct {kind} to index")]
    Overflow { kind: &'static str },
}

/// An error returned by the reasoner.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReasonerError {
    /// The ontology could not be loaded.
    #[error("failed to load the ontology: {0}")]
    Load(#[from] LoadError),
    /// The ontology could not be indexed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// The operation requires a consistent ontology.
    #[error("the ontology is inconsistent")]
    Inconsistent,
    /// The computation was interrupted; calling the operation again resumes it.
    #[error("the reasoning was interrupted")]
    Interrupted,
    /// The configured timeout elapsed; calling the operation again resumes it.
    #[error("the reasoning did not finish within {0:?}")]
    Timeout(Duration),
    /// The class does not occur in the ontology.
    #[error("the class {0} does not occur in the ontology")]
    UnknownClass(OwlClass),
    /// The individual does not occur in the ontology.
    #[error("the individual {0} does not occur in the ontology")]
    UnknownIndividual(Individual),
    /// The object property does not occur in the ontology.
    #[error("the object property {0} does not occur in the ontology")]
    UnknownProperty(ObjectProperty),
    /// Entailment of this kind of axiom cannot be checked.
    #[error("checking the entailment of {0} is not supported")]
    UnsupportedQuery(Box<Axiom>),
}

/// Signals that a saturation run stopped because of an interruption.
///
/// Interruption is not a failure: all derived conclusions are kept and the
/// computation resumes from where it stopped on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the saturation was interrupted")]
pub struct Interrupted;
