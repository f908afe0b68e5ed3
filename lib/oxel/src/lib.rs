//! Concurrent consequence-based reasoner for the OWL 2 EL profile.
//!
//! This crate provides:
//! - an object model for the OWL 2 EL axioms it reasons with
//! - loading of these axioms from any RDF serialization supported by [`oxrdfio`]
//! - a multi-threaded saturation of class expressions with cooperative interruption
//! - classification, consistency checking and realization on top of it
//! - entailment checks of axioms over complex class expressions
//!
//! # Example
//! ```
//! use oxel::{RdfFormat, Reasoner, ReasonerConfig, OwlClass};
//!
//! let turtle = br#"
//! @prefix owl: <http://www.w3.org/2002/07/owl#> .
//! @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//! @prefix ex: <http://example.com/> .
//! ex:Dog rdfs:subClassOf ex:Mammal .
//! ex:Mammal rdfs:subClassOf ex:Animal .
//! "#;
//! let mut reasoner = Reasoner::load(turtle.as_slice(), RdfFormat::Turtle, ReasonerConfig::default())?;
//! let dog = OwlClass::from_iri("http://example.com/Dog")?;
//! let mammal = OwlClass::from_iri("http://example.com/Mammal")?;
//! assert_eq!(reasoner.super_classes(&dog, true)?, [mammal]);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod axiom;
mod entity;
mod error;
mod expression;
pub mod indexing;
pub mod interrupt;
pub mod loading;
mod ontology;
mod query;
mod reasoner;
pub mod saturation;
mod statistics;
pub mod taxonomy;
mod vocab;

pub use crate::axiom::Axiom;
pub use crate::entity::{Individual, ObjectProperty, OwlClass};
pub use crate::error::{IndexError, Interrupted, LoadError, ReasonerError};
pub use crate::expression::ClassExpression;
pub use crate::interrupt::{InterruptMonitor, Interrupter, NeverInterrupted};
pub use crate::loading::{LoadingReport, OntologyLoader};
pub use crate::ontology::Ontology;
pub use crate::reasoner::{Reasoner, ReasonerConfig};
pub use crate::statistics::{SaturationStatistics, StatisticsSnapshot};
pub use crate::taxonomy::{Taxonomy, TaxonomyNode};
pub use oxrdfio::RdfFormat;
