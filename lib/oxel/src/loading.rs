//! Loading of OWL 2 EL ontologies from RDF.
//!
//! The RDF document is parsed with [`oxrdfio`] into a [`Graph`], then the
//! [OWL 2 mapping to RDF](https://www.w3.org/TR/owl2-mapping-to-rdf/) of the EL
//! fragment is reversed into [`Axiom`]s. Axioms are handed to the consumer through
//! a bounded buffer filled by a separate thread, so a slow consumer (the indexer)
//! throttles the extraction.

use crate::axiom::Axiom;
use crate::error::LoadError;
use crate::expression::ClassExpression;
use crate::ontology::Ontology;
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{BlankNodeRef, Graph, NamedNodeRef, NamedOrBlankNodeRef, TermRef, TripleRef};
use oxrdfio::{RdfFormat, RdfParser};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::io::Read;
use std::panic::resume_unwind;
use std::path::Path;
use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread;

/// Default number of axioms buffered between the extractor and the consumer.
pub const DEFAULT_LOADER_BUFFER: usize = 1024;
const MAX_EXPRESSION_DEPTH: usize = 100;
const MAX_LIST_LENGTH: usize = 10_000;

/// Summary of an ontology load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingReport {
    /// Number of RDF triples read.
    pub triples: usize,
    /// Number of axioms handed to the consumer.
    pub axioms: usize,
    /// Number of skipped axioms per construct outside of the supported fragment.
    pub skipped: BTreeMap<&'static str, usize>,
}

impl LoadingReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Guesses an RDF format from a format name, a media type or a file extension.
///
/// ```
/// use oxel::loading::rdf_format_from_name;
/// use oxrdfio::RdfFormat;
///
/// assert_eq!(rdf_format_from_name("ttl")?, RdfFormat::Turtle);
/// assert_eq!(rdf_format_from_name("application/n-triples")?, RdfFormat::NTriples);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn rdf_format_from_name(name: &str) -> Result<RdfFormat, LoadError> {
    if let Some(format) = RdfFormat::from_extension(name) {
        return Ok(format);
    }
    if let Some(format) = RdfFormat::from_media_type(name) {
        return Ok(format);
    }
    Err(LoadError::UnknownFormat(name.to_owned()))
}

/// Guesses an RDF format from a file path extension.
pub fn rdf_format_from_path(path: &Path) -> Result<RdfFormat, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| LoadError::UnknownFormat(path.display().to_string()))?;
    RdfFormat::from_extension(extension)
        .ok_or_else(|| LoadError::UnknownFormat(extension.to_owned()))
}

/// Reads OWL 2 EL axioms from an RDF serialization.
///
/// ```
/// use oxel::loading::OntologyLoader;
/// use oxrdfio::RdfFormat;
///
/// let data = b"<http://example.com/A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.com/B> .";
/// let (ontology, report) = OntologyLoader::new(RdfFormat::NTriples).load(data.as_slice())?;
/// assert_eq!(ontology.len(), 1);
/// assert_eq!(report.skipped_total(), 0);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct OntologyLoader {
    format: RdfFormat,
    base_iri: Option<String>,
    buffer: usize,
}

impl OntologyLoader {
    pub fn new(format: RdfFormat) -> Self {
        Self {
            format,
            base_iri: None,
            buffer: DEFAULT_LOADER_BUFFER,
        }
    }

    /// Sets the base IRI used to resolve relative IRIs.
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, LoadError> {
        let base_iri = base_iri.into();
        oxiri::Iri::parse(base_iri.as_str())?;
        self.base_iri = Some(base_iri);
        Ok(self)
    }

    /// Sets the number of axioms the extractor may produce ahead of the consumer.
    pub fn with_buffer_size(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Parses the RDF document into a graph, ignoring graph names.
    pub fn read_graph(&self, reader: impl Read) -> Result<Graph, LoadError> {
        let mut parser = RdfParser::from_format(self.format);
        if let Some(base_iri) = &self.base_iri {
            parser = parser.with_base_iri(base_iri.as_str())?;
        }
        let mut graph = Graph::new();
        for quad in parser.for_reader(reader) {
            let quad = quad?;
            graph.insert(TripleRef::new(
                quad.subject.as_ref(),
                quad.predicate.as_ref(),
                quad.object.as_ref(),
            ));
        }
        Ok(graph)
    }

    /// Loads the whole document into an [`Ontology`].
    pub fn load(&self, reader: impl Read) -> Result<(Ontology, LoadingReport), LoadError> {
        let mut ontology = Ontology::default();
        let graph = self.read_graph(reader)?;
        for triple in graph.triples_for_predicate(rdf::TYPE) {
            if triple.object == TermRef::NamedNode(owl::ONTOLOGY) {
                if let NamedOrBlankNodeRef::NamedNode(iri) = triple.subject {
                    ontology.set_iri(Some(iri.into_owned()));
                }
            }
        }
        let report = self.stream_graph(&graph, |axiom| ontology.add_axiom(axiom))?;
        Ok((ontology, report))
    }

    /// Parses the document and streams its axioms to `sink`.
    pub fn load_into(
        &self,
        reader: impl Read,
        sink: impl FnMut(Axiom),
    ) -> Result<LoadingReport, LoadError> {
        let graph = self.read_graph(reader)?;
        self.stream_graph(&graph, sink)
    }

    /// Extracts the axioms of an already parsed graph and streams them to `sink`.
    ///
    /// The extraction runs on its own thread and blocks while `sink` lags more than
    /// the buffer size behind.
    pub fn stream_graph(
        &self,
        graph: &Graph,
        mut sink: impl FnMut(Axiom),
    ) -> Result<LoadingReport, LoadError> {
        let (sender, receiver) = sync_channel(self.buffer);
        thread::scope(|s| {
            let extractor = s.spawn(move || AxiomExtractor::new(graph, sender).extract());
            for axiom in receiver {
                sink(axiom);
            }
            extractor.join().unwrap_or_else(|e| resume_unwind(e))
        })
    }
}

enum Skip {
    Unsupported(&'static str),
    Malformed(LoadError),
}

/// Maps the triples of a graph to axioms.
struct AxiomExtractor<'a> {
    graph: &'a Graph,
    sender: SyncSender<Axiom>,
    report: LoadingReport,
    object_properties: FxHashSet<NamedNodeRef<'a>>,
    annotation_properties: FxHashSet<NamedNodeRef<'a>>,
    non_object_properties: FxHashSet<NamedNodeRef<'a>>,
}

impl<'a> AxiomExtractor<'a> {
    fn new(graph: &'a Graph, sender: SyncSender<Axiom>) -> Self {
        let mut object_properties = FxHashSet::default();
        let mut annotation_properties = FxHashSet::default();
        let mut non_object_properties = FxHashSet::default();
        for triple in graph.triples_for_predicate(rdf::TYPE) {
            let (NamedOrBlankNodeRef::NamedNode(subject), TermRef::NamedNode(kind)) =
                (triple.subject, triple.object)
            else {
                continue;
            };
            if kind == owl::OBJECT_PROPERTY
                || kind == owl::TRANSITIVE_PROPERTY
                || kind == owl::REFLEXIVE_PROPERTY
            {
                object_properties.insert(subject);
            } else if kind == owl::DATATYPE_PROPERTY {
                non_object_properties.insert(subject);
            } else if kind == owl::ANNOTATION_PROPERTY {
                annotation_properties.insert(subject);
                non_object_properties.insert(subject);
            }
        }
        Self {
            graph,
            sender,
            report: LoadingReport {
                triples: graph.len(),
                ..LoadingReport::default()
            },
            object_properties,
            annotation_properties,
            non_object_properties,
        }
    }

    fn extract(mut self) -> Result<LoadingReport, LoadError> {
        let graph = self.graph;

        for triple in graph.triples_for_predicate(rdf::TYPE) {
            let result = self.typing(triple);
            if let Some(result) = result {
                self.handle(result)?;
            }
        }
        for triple in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
            let result = self.class_pair(triple).map(|(sub_class, super_class)| {
                Axiom::SubClassOf {
                    sub_class,
                    super_class,
                }
            });
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(owl::EQUIVALENT_CLASS) {
            let result = self
                .class_pair(triple)
                .map(|(first, second)| Axiom::EquivalentClasses(vec![first, second]));
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(owl::DISJOINT_WITH) {
            let result = self
                .class_pair(triple)
                .map(|(first, second)| Axiom::DisjointClasses(vec![first, second]));
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(owl::MEMBERS) {
            if graph.contains(TripleRef::new(
                triple.subject,
                rdf::TYPE,
                owl::ALL_DISJOINT_CLASSES,
            )) {
                let result = self.class_list(triple.object).map(Axiom::DisjointClasses);
                self.handle(result)?;
            }
        }
        for triple in graph.triples_for_predicate(rdfs::SUB_PROPERTY_OF) {
            let result = self
                .property_pair(triple)
                .map(|(sub_property, super_property)| Axiom::SubObjectPropertyOf {
                    sub_property: sub_property.into(),
                    super_property: super_property.into(),
                });
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(owl::EQUIVALENT_PROPERTY) {
            let result = self.property_pair(triple).map(|(first, second)| {
                Axiom::EquivalentObjectProperties(vec![first.into(), second.into()])
            });
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(owl::PROPERTY_CHAIN_AXIOM) {
            let result = self.property_chain(triple);
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(rdfs::DOMAIN) {
            let result = self.domain(triple);
            self.handle(result)?;
        }
        for triple in graph.triples_for_predicate(rdfs::RANGE) {
            if !self.is_non_object_property(triple.subject) {
                self.skip("ObjectPropertyRange");
            }
        }
        for _ in graph.triples_for_predicate(owl::INVERSE_OF) {
            self.skip("InverseObjectProperties");
        }
        for triple in graph.iter() {
            if let Some(result) = self.property_assertion(triple) {
                self.handle(result)?;
            }
        }

        for (construct, count) in &self.report.skipped {
            tracing::warn!(construct, count, "skipped axioms outside of the EL fragment");
        }
        tracing::debug!(
            triples = self.report.triples,
            axioms = self.report.axioms,
            "extracted axioms from RDF"
        );
        Ok(self.report)
    }

    fn handle(&mut self, result: Result<Axiom, Skip>) -> Result<(), LoadError> {
        match result {
            Ok(axiom) => {
                self.report.axioms += 1;
                if self.sender.send(axiom).is_err() {
                    tracing::debug!("the axiom consumer stopped early");
                }
                Ok(())
            }
            Err(Skip::Unsupported(construct)) => {
                self.skip(construct);
                Ok(())
            }
            Err(Skip::Malformed(e)) => Err(e),
        }
    }

    fn skip(&mut self, construct: &'static str) {
        tracing::debug!(construct, "skipping an axiom outside of the EL fragment");
        *self.report.skipped.entry(construct).or_default() += 1;
    }

    fn is_non_object_property(&self, subject: NamedOrBlankNodeRef<'a>) -> bool {
        match subject {
            NamedOrBlankNodeRef::NamedNode(p) => self.non_object_properties.contains(&p),
            NamedOrBlankNodeRef::BlankNode(_) => false,
        }
    }

    /// Declarations, transitivity, unsupported characteristics and class assertions.
    fn typing(&self, triple: TripleRef<'a>) -> Option<Result<Axiom, Skip>> {
        let TermRef::NamedNode(kind) = triple.object else {
            return Some(Err(Skip::Unsupported("literal type")));
        };
        let subject = match triple.subject {
            NamedOrBlankNodeRef::NamedNode(subject) => subject,
            NamedOrBlankNodeRef::BlankNode(_) => {
                // Anonymous class expressions, restrictions and lists are typed blank nodes
                return if is_vocabulary(kind) {
                    None
                } else {
                    Some(Err(Skip::Unsupported("anonymous individual")))
                };
            }
        };
        if kind == owl::CLASS {
            Some(Ok(Axiom::DeclareClass(subject.into())))
        } else if kind == owl::OBJECT_PROPERTY {
            Some(Ok(Axiom::DeclareObjectProperty(subject.into())))
        } else if kind == owl::NAMED_INDIVIDUAL {
            Some(Ok(Axiom::DeclareNamedIndividual(subject.into())))
        } else if kind == owl::TRANSITIVE_PROPERTY {
            Some(Ok(Axiom::TransitiveObjectProperty(subject.into())))
        } else if kind == owl::REFLEXIVE_PROPERTY {
            Some(Ok(Axiom::ReflexiveObjectProperty(subject.into())))
        } else if kind == owl::THING || kind == owl::NOTHING {
            Some(Ok(Axiom::ClassAssertion {
                class: ClassExpression::Class(kind.into()),
                individual: subject.into(),
            }))
        } else if is_vocabulary(kind) {
            None
        } else {
            Some(Ok(Axiom::ClassAssertion {
                class: ClassExpression::Class(kind.into()),
                individual: subject.into(),
            }))
        }
    }

    fn class_pair(
        &self,
        triple: TripleRef<'a>,
    ) -> Result<(ClassExpression, ClassExpression), Skip> {
        Ok((
            self.class_expression(triple.subject.into(), 0)?,
            self.class_expression(triple.object, 0)?,
        ))
    }

    fn property_pair(
        &self,
        triple: TripleRef<'a>,
    ) -> Result<(NamedNodeRef<'a>, NamedNodeRef<'a>), Skip> {
        let (NamedOrBlankNodeRef::NamedNode(first), TermRef::NamedNode(second)) =
            (triple.subject, triple.object)
        else {
            return Err(Skip::Unsupported("ObjectInverseOf"));
        };
        if self.non_object_properties.contains(&first)
            || self.non_object_properties.contains(&second)
        {
            return Err(Skip::Unsupported("data or annotation property axiom"));
        }
        Ok((first, second))
    }

    fn property_chain(&self, triple: TripleRef<'a>) -> Result<Axiom, Skip> {
        let NamedOrBlankNodeRef::NamedNode(super_property) = triple.subject else {
            return Err(Skip::Unsupported("ObjectInverseOf"));
        };
        let chain = self
            .list(triple.object)?
            .into_iter()
            .map(|item| match item {
                TermRef::NamedNode(p) => Ok(p.into()),
                _ => Err(Skip::Unsupported("ObjectInverseOf")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Axiom::SubPropertyChainOf {
            chain,
            super_property: super_property.into(),
        })
    }

    fn domain(&self, triple: TripleRef<'a>) -> Result<Axiom, Skip> {
        let NamedOrBlankNodeRef::NamedNode(property) = triple.subject else {
            return Err(Skip::Unsupported("ObjectInverseOf"));
        };
        if self.non_object_properties.contains(&property) {
            return Err(Skip::Unsupported("DataPropertyDomain"));
        }
        Ok(Axiom::ObjectPropertyDomain {
            property: property.into(),
            domain: self.class_expression(triple.object, 0)?,
        })
    }

    /// Reads a triple with a non-vocabulary predicate as a property assertion.
    ///
    /// Predicates not declared as data or annotation properties relate
    /// individuals, declared or not. Literal values of undeclared predicates are
    /// annotations.
    fn property_assertion(&self, triple: TripleRef<'a>) -> Option<Result<Axiom, Skip>> {
        let property = triple.predicate;
        if is_vocabulary(property) || self.annotation_properties.contains(&property) {
            return None;
        }
        if self.non_object_properties.contains(&property) {
            return Some(Err(Skip::Unsupported("DataPropertyAssertion")));
        }
        match (triple.subject, triple.object) {
            (NamedOrBlankNodeRef::NamedNode(source), TermRef::NamedNode(target)) => {
                Some(Ok(Axiom::ObjectPropertyAssertion {
                    property: property.into(),
                    source: source.into(),
                    target: target.into(),
                }))
            }
            (_, TermRef::Literal(_)) if self.object_properties.contains(&property) => {
                Some(Err(Skip::Unsupported("literal value of an object property")))
            }
            (_, TermRef::Literal(_)) => None,
            _ => Some(Err(Skip::Unsupported("anonymous individual"))),
        }
    }

    fn class_expression(&self, term: TermRef<'a>, depth: usize) -> Result<ClassExpression, Skip> {
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(Skip::Unsupported("deeply nested class expression"));
        }
        match term {
            TermRef::NamedNode(class) => Ok(ClassExpression::Class(class.into())),
            TermRef::BlankNode(node) => self.anonymous_class(node, depth),
            _ => Err(Skip::Unsupported("literal class expression")),
        }
    }

    fn class_list(&self, head: TermRef<'a>) -> Result<Vec<ClassExpression>, Skip> {
        self.list(head)?
            .into_iter()
            .map(|item| self.class_expression(item, 0))
            .collect()
    }

    fn anonymous_class(&self, node: BlankNodeRef<'a>, depth: usize) -> Result<ClassExpression, Skip> {
        let graph = self.graph;
        let subject = NamedOrBlankNodeRef::from(node);
        if let Some(operands) = graph.object_for_subject_predicate(subject, owl::INTERSECTION_OF) {
            return self
                .list(operands)?
                .into_iter()
                .map(|operand| self.class_expression(operand, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(ClassExpression::ObjectIntersectionOf);
        }
        if graph
            .object_for_subject_predicate(subject, owl::UNION_OF)
            .is_some()
        {
            return Err(Skip::Unsupported("ObjectUnionOf"));
        }
        if graph
            .object_for_subject_predicate(subject, owl::COMPLEMENT_OF)
            .is_some()
        {
            return Err(Skip::Unsupported("ObjectComplementOf"));
        }
        if graph
            .object_for_subject_predicate(subject, owl::ONE_OF)
            .is_some()
        {
            return Err(Skip::Unsupported("ObjectOneOf"));
        }
        let Some(property) = graph.object_for_subject_predicate(subject, owl::ON_PROPERTY) else {
            return Err(
                if graph.contains(TripleRef::new(subject, rdf::TYPE, owl::RESTRICTION)) {
                    Skip::Unsupported("restriction without owl:onProperty")
                } else {
                    Skip::Unsupported("unknown anonymous class")
                },
            );
        };
        let TermRef::NamedNode(property) = property else {
            return Err(Skip::Unsupported("ObjectInverseOf"));
        };
        let is_data = self.non_object_properties.contains(&property);
        if let Some(filler) = graph.object_for_subject_predicate(subject, owl::SOME_VALUES_FROM) {
            if is_data {
                return Err(Skip::Unsupported("DataSomeValuesFrom"));
            }
            return Ok(ClassExpression::some_values_from(
                property,
                self.class_expression(filler, depth + 1)?,
            ));
        }
        if let Some(value) = graph.object_for_subject_predicate(subject, owl::HAS_VALUE) {
            return match value {
                TermRef::NamedNode(individual) if !is_data => {
                    Ok(ClassExpression::has_value(property, individual))
                }
                TermRef::BlankNode(_) => Err(Skip::Unsupported("anonymous individual")),
                _ => Err(Skip::Unsupported("DataHasValue")),
            };
        }
        if graph
            .object_for_subject_predicate(subject, owl::ALL_VALUES_FROM)
            .is_some()
        {
            return Err(Skip::Unsupported("ObjectAllValuesFrom"));
        }
        for cardinality in [owl::CARDINALITY, owl::MIN_CARDINALITY, owl::MAX_CARDINALITY] {
            if graph
                .object_for_subject_predicate(subject, cardinality)
                .is_some()
            {
                return Err(Skip::Unsupported("cardinality restriction"));
            }
        }
        Err(Skip::Unsupported("unknown restriction"))
    }

    fn list(&self, head: TermRef<'a>) -> Result<Vec<TermRef<'a>>, Skip> {
        let malformed = |message: &str| {
            Skip::Malformed(LoadError::MalformedList {
                head: head.into_owned(),
                message: message.to_owned(),
            })
        };
        let mut items = Vec::new();
        let mut current = head;
        while current != TermRef::NamedNode(rdf::NIL) {
            if items.len() >= MAX_LIST_LENGTH {
                return Err(malformed("the list is too long or cyclic"));
            }
            let node = match current {
                TermRef::NamedNode(node) => NamedOrBlankNodeRef::from(node),
                TermRef::BlankNode(node) => NamedOrBlankNodeRef::from(node),
                _ => return Err(malformed("a list node is not a resource")),
            };
            items.push(
                self.graph
                    .object_for_subject_predicate(node, rdf::FIRST)
                    .ok_or_else(|| malformed("missing rdf:first"))?,
            );
            current = self
                .graph
                .object_for_subject_predicate(node, rdf::REST)
                .ok_or_else(|| malformed("missing rdf:rest"))?;
        }
        Ok(items)
    }
}

fn is_vocabulary(iri: NamedNodeRef<'_>) -> bool {
    let iri = iri.as_str();
    iri.starts_with("http://www.w3.org/2002/07/owl#")
        || iri.starts_with("http://www.w3.org/2000/01/rdf-schema#")
        || iri.starts_with("http://www.w3.org/1999/02/22-rdf-syntax-ns#")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Individual, ObjectProperty, OwlClass};

    fn load(data: &str) -> (Ontology, LoadingReport) {
        OntologyLoader::new(RdfFormat::Turtle)
            .load(data.as_bytes())
            .unwrap()
    }

    fn class(name: &str) -> ClassExpression {
        ClassExpression::Class(OwlClass::from_iri(format!("http://example.com/{name}")).unwrap())
    }

    fn property(name: &str) -> ObjectProperty {
        ObjectProperty::from_iri(format!("http://example.com/{name}")).unwrap()
    }

    const PREFIXES: &str = "@prefix : <http://example.com/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
";

    #[test]
    fn subclass_of_restriction() {
        let (ontology, report) = load(&format!(
            "{PREFIXES}:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty :r ; owl:someValuesFrom :B ] ."
        ));
        assert_eq!(
            ontology.axioms(),
            [Axiom::subclass_of(
                class("A"),
                ClassExpression::some_values_from(property("r"), class("B"))
            )]
        );
        assert_eq!(report.skipped_total(), 0);
    }

    #[test]
    fn intersection_list() {
        let (ontology, _) = load(&format!(
            "{PREFIXES}:A owl:equivalentClass [ owl:intersectionOf ( :B :C ) ] ."
        ));
        assert_eq!(
            ontology.axioms(),
            [Axiom::EquivalentClasses(vec![
                class("A"),
                ClassExpression::intersection([class("B"), class("C")])
            ])]
        );
    }

    #[test]
    fn property_axioms() {
        let (ontology, _) = load(&format!(
            "{PREFIXES}:r a owl:ObjectProperty , owl:TransitiveProperty ; rdfs:subPropertyOf :s .
:t owl:propertyChainAxiom ( :r :s ) ."
        ));
        let axioms = ontology.axioms();
        assert!(axioms.contains(&Axiom::DeclareObjectProperty(property("r"))));
        assert!(axioms.contains(&Axiom::TransitiveObjectProperty(property("r"))));
        assert!(axioms.contains(&Axiom::sub_object_property_of(property("r"), property("s"))));
        assert!(axioms.contains(&Axiom::sub_property_chain_of(
            [property("r"), property("s")],
            property("t")
        )));
    }

    #[test]
    fn assertions() {
        let (ontology, _) = load(&format!(
            "{PREFIXES}:r a owl:ObjectProperty . :a a :A ; :r :b ."
        ));
        let a = Individual::from_iri("http://example.com/a").unwrap();
        let b = Individual::from_iri("http://example.com/b").unwrap();
        let axioms = ontology.axioms();
        assert!(axioms.contains(&Axiom::class_assertion(class("A"), a.clone())));
        assert!(axioms.contains(&Axiom::ObjectPropertyAssertion {
            property: property("r"),
            source: a,
            target: b,
        }));
    }

    #[test]
    fn assertions_of_undeclared_properties() {
        let (ontology, report) = load(&format!(
            "{PREFIXES}:D rdfs:subClassOf [ owl:onProperty :r ; owl:someValuesFrom :B ] .
:a :r :b ; :s :c ; :name \"a\" .
:b a :B .
:age a owl:DatatypeProperty . :a :age 3 .
:note a owl:AnnotationProperty . :a :note :b ."
        ));
        let a = Individual::from_iri("http://example.com/a").unwrap();
        let axioms = ontology.axioms();
        for (name, target) in [("r", "b"), ("s", "c")] {
            assert!(axioms.contains(&Axiom::ObjectPropertyAssertion {
                property: property(name),
                source: a.clone(),
                target: Individual::from_iri(format!("http://example.com/{target}")).unwrap(),
            }));
        }
        assert!(!axioms.iter().any(|axiom| matches!(
            axiom,
            Axiom::ObjectPropertyAssertion { property: p, .. }
                if p.iri().as_str().ends_with("note") || p.iri().as_str().ends_with("age")
        )));
        assert_eq!(report.skipped.get("DataPropertyAssertion"), Some(&1));
        assert_eq!(report.skipped_total(), 1);
    }

    #[test]
    fn literal_value_of_object_property_is_skipped() {
        let (ontology, report) = load(&format!(
            "{PREFIXES}:r a owl:ObjectProperty . :a :r \"b\" ."
        ));
        assert_eq!(ontology.axioms(), [Axiom::DeclareObjectProperty(property("r"))]);
        assert_eq!(report.skipped.get("literal value of an object property"), Some(&1));
    }

    #[test]
    fn top_and_bottom_class_assertions() {
        let (ontology, _) = load(&format!("{PREFIXES}:a a owl:Thing . :b a owl:Nothing ."));
        let axioms = ontology.axioms();
        assert!(axioms.contains(&Axiom::class_assertion(
            OwlClass::thing(),
            Individual::from_iri("http://example.com/a").unwrap()
        )));
        assert!(axioms.contains(&Axiom::class_assertion(
            OwlClass::nothing(),
            Individual::from_iri("http://example.com/b").unwrap()
        )));
    }

    #[test]
    fn reflexive_property() {
        let (ontology, report) = load(&format!("{PREFIXES}:r a owl:ReflexiveProperty ."));
        assert_eq!(ontology.axioms(), [Axiom::ReflexiveObjectProperty(property("r"))]);
        assert_eq!(report.skipped_total(), 0);
    }

    #[test]
    fn restriction_without_property_is_reported() {
        let (ontology, report) = load(&format!(
            "{PREFIXES}:A rdfs:subClassOf [ a owl:Restriction ; owl:someValuesFrom :B ] .
:A rdfs:subClassOf [ owl:someValuesFrom :B ] ."
        ));
        assert!(ontology.is_empty());
        assert_eq!(report.skipped.get("restriction without owl:onProperty"), Some(&1));
        assert_eq!(report.skipped.get("unknown anonymous class"), Some(&1));
    }

    #[test]
    fn unsupported_constructs_are_reported() {
        let (ontology, report) = load(&format!(
            "{PREFIXES}:A rdfs:subClassOf [ owl:unionOf ( :B :C ) ] .
:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty :r ; owl:allValuesFrom :B ] .
:r rdfs:range :B ."
        ));
        assert!(ontology.is_empty());
        assert_eq!(report.skipped.get("ObjectUnionOf"), Some(&1));
        assert_eq!(report.skipped.get("ObjectAllValuesFrom"), Some(&1));
        assert_eq!(report.skipped.get("ObjectPropertyRange"), Some(&1));
    }

    #[test]
    fn broken_list_is_an_error() {
        let result = OntologyLoader::new(RdfFormat::Turtle).load(
            format!(
                "{PREFIXES}@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
:A owl:equivalentClass [ owl:intersectionOf _:l ] . _:l rdf:first :B ."
            )
            .as_bytes(),
        );
        assert!(matches!(result, Err(LoadError::MalformedList { .. })));
    }

    #[test]
    fn syntax_error_is_an_error() {
        let result = OntologyLoader::new(RdfFormat::Turtle).load(b"<http://example.com/A> <".as_slice());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn small_buffer_still_delivers_every_axiom() {
        let data = (0..100)
            .map(|i| format!("<http://example.com/C{i}> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.com/D> .\n"))
            .collect::<String>();
        let mut count = 0;
        let report = OntologyLoader::new(RdfFormat::NTriples)
            .with_buffer_size(1)
            .load_into(data.as_bytes(), |_| count += 1)
            .unwrap();
        assert_eq!(count, 100);
        assert_eq!(report.axioms, 100);
    }
}
