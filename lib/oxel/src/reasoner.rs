//! Classification, consistency checking and realization on top of the saturation.

use crate::axiom::Axiom;
use crate::entity::{Individual, ObjectProperty, OwlClass};
use crate::error::ReasonerError;
use crate::expression::ClassExpression;
use crate::indexing::{ClassId, OntologyIndex, OntologyIndexer};
use crate::interrupt::Interrupter;
use crate::loading::{DEFAULT_LOADER_BUFFER, LoadingReport, OntologyLoader};
use crate::ontology::Ontology;
use crate::query::{self, Entailment};
use crate::saturation::{
    ClassExpressionSaturationFactory, ContextCompletion, SaturationJob, SaturationState,
};
use crate::statistics::StatisticsSnapshot;
use crate::taxonomy::{Taxonomy, TaxonomyBuilder, TaxonomyNode};
use oxrdfio::RdfFormat;
use std::io::Read;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::available_parallelism;
use std::time::{Duration, Instant};

/// Configuration for the reasoner.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Number of saturation workers (at least 1).
    pub workers: usize,
    /// Maximum time allowed for each reasoning stage (None = unlimited).
    pub timeout: Option<Duration>,
    /// Number of axioms buffered between the RDF extractor and the indexer.
    pub loader_buffer: usize,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            workers: available_parallelism().map_or(1, NonZeroUsize::get),
            timeout: None,
            loader_buffer: DEFAULT_LOADER_BUFFER,
        }
    }
}

impl ReasonerConfig {
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_loader_buffer(mut self, loader_buffer: usize) -> Self {
        self.loader_buffer = loader_buffer.max(1);
        self
    }
}

/// OWL 2 EL reasoner.
///
/// Every stage saturates the contexts it needs and keeps them for the next
/// ones. A stage that is interrupted or times out returns an error and can be
/// resumed by calling it again.
///
/// ```
/// use oxel::{Axiom, ClassExpression, ObjectProperty, Ontology, OwlClass, Reasoner, ReasonerConfig};
///
/// let a = OwlClass::from_iri("http://example.com/A")?;
/// let b = OwlClass::from_iri("http://example.com/B")?;
/// let c = OwlClass::from_iri("http://example.com/C")?;
/// let r = ObjectProperty::from_iri("http://example.com/r")?;
/// let ontology: Ontology = [
///     Axiom::subclass_of(a.clone(), ClassExpression::some_values_from(r.clone(), b.clone().into())),
///     Axiom::subclass_of(ClassExpression::some_values_from(r, b.into()), c.clone()),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut reasoner = Reasoner::new(&ontology, ReasonerConfig::default())?;
/// assert_eq!(reasoner.super_classes(&a, true)?, [c]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct Reasoner {
    config: ReasonerConfig,
    state: SaturationState,
    interrupter: Arc<Interrupter>,
    report: Option<LoadingReport>,
    /// Cached result of the consistency check
    inconsistent: Option<bool>,
    taxonomy: Option<Taxonomy>,
    realized: bool,
}

impl Reasoner {
    pub fn new(ontology: &Ontology, config: ReasonerConfig) -> Result<Self, ReasonerError> {
        Ok(Self::from_index(OntologyIndex::new(ontology)?, config))
    }

    /// Loads an RDF document, indexing its axioms while they are extracted.
    pub fn load(
        reader: impl Read,
        format: RdfFormat,
        config: ReasonerConfig,
    ) -> Result<Self, ReasonerError> {
        let loader = OntologyLoader::new(format).with_buffer_size(config.loader_buffer);
        Self::load_with(&loader, reader, config)
    }

    /// Like [`load`](Self::load) with a custom loader, whose buffer size takes precedence.
    pub fn load_with(
        loader: &OntologyLoader,
        reader: impl Read,
        config: ReasonerConfig,
    ) -> Result<Self, ReasonerError> {
        let start = Instant::now();
        let mut indexer = OntologyIndexer::new();
        let mut indexed = Ok(());
        let report = loader.load_into(reader, |axiom| {
            if indexed.is_ok() {
                indexed = indexer.index_axiom(&axiom);
            }
        })?;
        indexed?;
        tracing::info!(
            triples = report.triples,
            axioms = report.axioms,
            skipped = report.skipped_total(),
            elapsed_ms = start.elapsed().as_millis(),
            "ontology loaded"
        );
        let mut reasoner = Self::from_index(indexer.finish(), config);
        reasoner.report = Some(report);
        Ok(reasoner)
    }

    pub fn from_index(index: OntologyIndex, config: ReasonerConfig) -> Self {
        tracing::debug!(
            axioms = index.axiom_count(),
            class_expressions = index.class_expression_count(),
            properties = index.property_count(),
            classes = index.named_classes().len(),
            individuals = index.individuals().len(),
            "ontology indexed"
        );
        Self {
            config,
            state: SaturationState::new(Arc::new(index)),
            interrupter: Arc::new(Interrupter::new()),
            report: None,
            inconsistent: None,
            taxonomy: None,
            realized: false,
        }
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn index(&self) -> &OntologyIndex {
        self.state.index()
    }

    pub fn saturation_state(&self) -> &SaturationState {
        &self.state
    }

    /// The summary of the load if the reasoner was built with [`load`](Self::load).
    pub fn loading_report(&self) -> Option<&LoadingReport> {
        self.report.as_ref()
    }

    /// Handle to interrupt the running stage from another thread.
    pub fn interrupter(&self) -> Arc<Interrupter> {
        Arc::clone(&self.interrupter)
    }

    /// Saturates `roots`, stopping on interruption or timeout.
    fn saturate(&self, stage: &str, roots: &[ClassId]) -> Result<(), ReasonerError> {
        let start = Instant::now();
        tracing::info!(stage, roots = roots.len(), "saturation started");
        self.interrupter.set_timeout(self.config.timeout);
        let (factory, _finished) =
            ClassExpressionSaturationFactory::new(&self.state, self.config.workers);
        for root in roots {
            factory.submit(SaturationJob::new(*root));
        }
        let result = factory.wait_completion(self.interrupter.as_ref());
        let timed_out = self.interrupter.is_timed_out();
        self.interrupter.clear_interrupt();
        if result.is_err() {
            tracing::info!(stage, timed_out, "saturation interrupted");
            return Err(match self.config.timeout {
                Some(timeout) if timed_out => ReasonerError::Timeout(timeout),
                _ => ReasonerError::Interrupted,
            });
        }
        tracing::info!(
            stage,
            contexts = self.state.context_count(),
            elapsed_ms = start.elapsed().as_millis(),
            "saturation finished"
        );
        Ok(())
    }

    /// Whether `owl:Thing` or some individual is unsatisfiable.
    pub fn is_inconsistent(&mut self) -> Result<bool, ReasonerError> {
        if let Some(inconsistent) = self.inconsistent {
            return Ok(inconsistent);
        }
        let index = self.state.index();
        let roots: Vec<_> = std::iter::once(index.owl_thing())
            .chain(index.individuals().iter().copied())
            .collect();
        self.saturate("consistency", &roots)?;
        let inconsistent = roots.iter().any(|root| {
            self.state
                .context(*root)
                .is_some_and(|context| context.is_inconsistent())
        });
        if inconsistent {
            tracing::info!("the ontology is inconsistent");
        }
        self.inconsistent = Some(inconsistent);
        Ok(inconsistent)
    }

    fn check_consistency(&mut self) -> Result<(), ReasonerError> {
        if self.is_inconsistent()? {
            Err(ReasonerError::Inconsistent)
        } else {
            Ok(())
        }
    }

    /// Whether `class` can have instances.
    ///
    /// Every class is unsatisfiable in an inconsistent ontology.
    pub fn is_satisfiable(&mut self, class: &OwlClass) -> Result<bool, ReasonerError> {
        if let Some(taxonomy) = &self.taxonomy {
            if let Some(satisfiable) = taxonomy.is_satisfiable(class) {
                return Ok(satisfiable);
            }
        }
        let id = query::class_id(self.state.index(), class)?;
        if self.is_inconsistent()? {
            return Ok(false);
        }
        self.saturate("satisfiability", &[id])?;
        Ok(!self
            .state
            .context(id)
            .is_some_and(|context| context.is_inconsistent()))
    }

    /// Whether the class expression can have instances.
    ///
    /// Every entity of `expression` must occur in the ontology.
    pub fn is_satisfiable_expression(
        &mut self,
        expression: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        query::check_expression(self.state.index(), expression)?;
        if self.is_inconsistent()? {
            return Ok(false);
        }
        let root = self.saturate_query(expression)?;
        Ok(!self
            .state
            .context(root)
            .is_some_and(|context| context.is_inconsistent()))
    }

    /// Whether `axiom` follows from the ontology.
    ///
    /// Class axioms, class and property assertions, domains and inclusions or
    /// reflexivity of properties can be checked; other property axioms return
    /// [`ReasonerError::UnsupportedQuery`]. A declaration is entailed if its
    /// entity occurs in the ontology. Every entity of another axiom must occur in
    /// it, and an inconsistent ontology entails all of them.
    pub fn is_entailed(&mut self, axiom: &Axiom) -> Result<bool, ReasonerError> {
        if axiom.is_declaration() {
            return Ok(query::check_axiom(self.state.index(), axiom).is_ok());
        }
        query::check_axiom(self.state.index(), axiom)?;
        if self.is_inconsistent()? {
            return Ok(true);
        }
        match axiom {
            Axiom::SubClassOf {
                sub_class,
                super_class,
            } => self.entails_subsumption(sub_class, super_class),
            Axiom::EquivalentClasses(classes) => {
                for (i, first) in classes.iter().enumerate() {
                    for second in &classes[i + 1..] {
                        if !self.entails_subsumption(first, second)?
                            || !self.entails_subsumption(second, first)?
                        {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            Axiom::DisjointClasses(classes) => {
                for (i, first) in classes.iter().enumerate() {
                    for second in &classes[i + 1..] {
                        let both = ClassExpression::intersection([first.clone(), second.clone()]);
                        if self.is_satisfiable_expression(&both)? {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            Axiom::ObjectPropertyDomain { property, domain } => self.entails_subsumption(
                &ClassExpression::some_values_from(property.clone(), OwlClass::thing().into()),
                domain,
            ),
            Axiom::ClassAssertion { class, individual } => {
                let root = query::individual_id(self.state.index(), individual)?;
                self.entails_from(root, class)
            }
            Axiom::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => {
                let root = query::individual_id(self.state.index(), source)?;
                self.entails_from(
                    root,
                    &ClassExpression::has_value(property.clone(), target.clone()),
                )
            }
            Axiom::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => self.entails_property_inclusion(sub_property, super_property),
            Axiom::SubPropertyChainOf {
                chain,
                super_property,
            } => match chain.as_slice() {
                [sub_property] => self.entails_property_inclusion(sub_property, super_property),
                _ => Err(ReasonerError::UnsupportedQuery(Box::new(axiom.clone()))),
            },
            Axiom::EquivalentObjectProperties(properties) => {
                for (i, first) in properties.iter().enumerate() {
                    for second in &properties[i + 1..] {
                        if !self.entails_property_inclusion(first, second)?
                            || !self.entails_property_inclusion(second, first)?
                        {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            Axiom::ReflexiveObjectProperty(property) => {
                let index = self.state.index();
                Ok(index.is_reflexive(query::property_id(index, property)?))
            }
            Axiom::TransitiveObjectProperty(_) => {
                Err(ReasonerError::UnsupportedQuery(Box::new(axiom.clone())))
            }
            // Signature checked above
            Axiom::DeclareClass(_)
            | Axiom::DeclareObjectProperty(_)
            | Axiom::DeclareNamedIndividual(_) => Ok(true),
        }
    }

    /// Interns `expression` as a root and saturates it.
    fn saturate_query(&mut self, expression: &ClassExpression) -> Result<ClassId, ReasonerError> {
        let root = self.state.index_mut().intern_query(expression)?;
        tracing::debug!(root = %self.state.index().display(root), "query interned");
        self.saturate("query", &[root])?;
        Ok(root)
    }

    fn entails_subsumption(
        &mut self,
        sub_class: &ClassExpression,
        super_class: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        let root = self.saturate_query(sub_class)?;
        Ok(Entailment::new(&self.state).entails(root, super_class))
    }

    fn entails_from(
        &mut self,
        root: ClassId,
        super_class: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        self.saturate("query", &[root])?;
        Ok(Entailment::new(&self.state).entails(root, super_class))
    }

    fn entails_property_inclusion(
        &self,
        sub_property: &ObjectProperty,
        super_property: &ObjectProperty,
    ) -> Result<bool, ReasonerError> {
        let index = self.state.index();
        let sub_property = query::property_id(index, sub_property)?;
        let super_property = query::property_id(index, super_property)?;
        Ok(index.super_properties(sub_property).contains(&super_property))
    }

    /// Computes the class taxonomy.
    pub fn classify(&mut self) -> Result<&Taxonomy, ReasonerError> {
        self.build_taxonomy(false)
    }

    /// Computes the class taxonomy and the direct types of all individuals.
    pub fn realize(&mut self) -> Result<&Taxonomy, ReasonerError> {
        self.build_taxonomy(true)
    }

    fn build_taxonomy(&mut self, realize: bool) -> Result<&Taxonomy, ReasonerError> {
        self.check_consistency()?;
        let taxonomy = match self.taxonomy.take() {
            Some(taxonomy) if !realize || self.realized => taxonomy,
            _ => {
                let taxonomy = self.compute_taxonomy(realize)?;
                self.realized = realize;
                taxonomy
            }
        };
        Ok(self.taxonomy.insert(taxonomy))
    }

    fn compute_taxonomy(&self, realize: bool) -> Result<Taxonomy, ReasonerError> {
        let index = self.state.index();
        let mut roots = index.named_classes().to_vec();
        if realize {
            roots.extend_from_slice(index.individuals());
        }
        self.saturate(if realize { "realization" } else { "classification" }, &roots)?;

        let start = Instant::now();
        let mut builder = TaxonomyBuilder::new();
        for root in index.named_classes() {
            let (Some(class), Some(context)) = (index.as_class(*root), self.state.context(*root))
            else {
                continue;
            };
            if context.is_inconsistent() {
                builder.add_unsatisfiable(class.clone());
            } else {
                builder.add_class(class.clone(), named_subsumers(index, &context.subsumers()));
            }
        }
        if realize {
            for root in index.individuals() {
                let (Some(individual), Some(context)) =
                    (index.as_individual(*root), self.state.context(*root))
                else {
                    continue;
                };
                builder.add_individual(
                    individual.clone(),
                    named_subsumers(index, &context.subsumers()),
                );
            }
        }
        let taxonomy = builder.build();
        tracing::info!(
            nodes = taxonomy.nodes().len(),
            unsatisfiable = taxonomy.bottom().members().len().saturating_sub(1),
            elapsed_ms = start.elapsed().as_millis(),
            "taxonomy built"
        );
        Ok(taxonomy)
    }

    fn class_node<'a>(
        taxonomy: &'a Taxonomy,
        class: &OwlClass,
    ) -> Result<&'a TaxonomyNode, ReasonerError> {
        taxonomy
            .node(class)
            .ok_or_else(|| ReasonerError::UnknownClass(class.clone()))
    }

    /// Strict superclasses of `class`, or only its direct ones.
    pub fn super_classes(
        &mut self,
        class: &OwlClass,
        direct: bool,
    ) -> Result<Vec<OwlClass>, ReasonerError> {
        let taxonomy = self.classify()?;
        let nodes = taxonomy
            .super_nodes(class, direct)
            .ok_or_else(|| ReasonerError::UnknownClass(class.clone()))?;
        Ok(members(&nodes))
    }

    /// Strict subclasses of `class`, or only its direct ones.
    pub fn sub_classes(
        &mut self,
        class: &OwlClass,
        direct: bool,
    ) -> Result<Vec<OwlClass>, ReasonerError> {
        let taxonomy = self.classify()?;
        let nodes = taxonomy
            .sub_nodes(class, direct)
            .ok_or_else(|| ReasonerError::UnknownClass(class.clone()))?;
        Ok(members(&nodes))
    }

    /// Classes equivalent to `class`, itself included.
    pub fn equivalent_classes(&mut self, class: &OwlClass) -> Result<Vec<OwlClass>, ReasonerError> {
        let taxonomy = self.classify()?;
        Ok(Self::class_node(taxonomy, class)?.members().to_vec())
    }

    /// Named types of `individual`, or only its most specific ones.
    pub fn types(
        &mut self,
        individual: &Individual,
        direct: bool,
    ) -> Result<Vec<OwlClass>, ReasonerError> {
        let taxonomy = self.realize()?;
        let nodes = taxonomy
            .type_nodes(individual, direct)
            .ok_or_else(|| ReasonerError::UnknownIndividual(individual.clone()))?;
        Ok(members(&nodes))
    }

    /// Individuals that are instances of `class`.
    pub fn instances(
        &mut self,
        class: &OwlClass,
        direct: bool,
    ) -> Result<Vec<Individual>, ReasonerError> {
        let taxonomy = self.realize()?;
        taxonomy
            .instances(class, direct)
            .ok_or_else(|| ReasonerError::UnknownClass(class.clone()))
    }

    /// Recomputes the saturated contexts sequentially and returns the classes
    /// whose results differ.
    pub fn verify_saturation(&self) -> Vec<ClassId> {
        ContextCompletion::new(self.state.index()).verify(&self.state)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.state.statistics().snapshot()
    }

    /// Logs the saturation statistics at the `info` level.
    pub fn print_statistics(&self) {
        self.state.statistics().print();
    }
}

fn named_subsumers(index: &OntologyIndex, subsumers: &[ClassId]) -> Vec<OwlClass> {
    subsumers
        .iter()
        .filter_map(|subsumer| index.as_class(*subsumer))
        .cloned()
        .collect()
}

fn members(nodes: &[&TaxonomyNode]) -> Vec<OwlClass> {
    let mut members: Vec<_> = nodes
        .iter()
        .flat_map(|node| node.members().iter().cloned())
        .collect();
    members.sort();
    members
}
