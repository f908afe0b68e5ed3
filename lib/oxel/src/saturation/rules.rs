//! Inference rules of the EL saturation calculus.
//!
//! Rules read the premises they combine from the [`ContextData`] of the context
//! the processed conclusion belongs to, and hand new conclusions to a
//! [`ConclusionProducer`]. All premises of a rule always live in the same
//! context, so applying rules only requires that context to be locked.

use crate::indexing::{ClassId, IndexedClassExpression, OntologyIndex, PropertyId};
use crate::saturation::conclusion::{Conclusion, Inference};
use crate::saturation::context::ContextData;

/// Receives the conclusions produced by rule applications.
pub trait ConclusionProducer {
    /// `conclusion` has been derived for the context with root `context`.
    fn produce(&mut self, context: ClassId, conclusion: Conclusion);
}

impl ConclusionProducer for Vec<(ClassId, Conclusion)> {
    #[inline]
    fn produce(&mut self, context: ClassId, conclusion: Conclusion) {
        self.push((context, conclusion));
    }
}

/// Which rules to apply to a conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Rules needed to reach the fixpoint. Decomposition of composed subsumers is skipped.
    NonRedundant,
    /// Every rule, used when retracting conclusions.
    All,
}

/// Produces the conclusions a new context starts from.
pub fn initialize(index: &OntologyIndex, root: ClassId, producer: &mut impl ConclusionProducer) {
    producer.produce(
        root,
        Conclusion::DecomposedSubsumer {
            subsumer: root,
            inference: Inference::Initialization,
        },
    );
    let thing = index.owl_thing();
    if root != thing && index.occurs_negatively(thing) {
        producer.produce(
            root,
            Conclusion::DecomposedSubsumer {
                subsumer: thing,
                inference: Inference::OwlThingInitialization,
            },
        );
    }
}

/// Applies the rules of `conclusion` integrated in the context of `root`.
///
/// `data` must contain `conclusion`.
pub fn apply(
    index: &OntologyIndex,
    root: ClassId,
    data: &ContextData,
    conclusion: &Conclusion,
    rules: RuleSet,
    producer: &mut impl ConclusionProducer,
) {
    match conclusion {
        Conclusion::DecomposedSubsumer { subsumer, .. } => {
            compose_subsumer(index, root, data, *subsumer, producer);
            decompose_subsumer(index, root, *subsumer, producer);
        }
        Conclusion::ComposedSubsumer { subsumer, .. } => {
            compose_subsumer(index, root, data, *subsumer, producer);
            if rules == RuleSet::All {
                decompose_subsumer(index, root, *subsumer, producer);
            }
        }
        Conclusion::BackwardLink {
            source, relation, ..
        } => apply_backward_link(index, root, data, *source, *relation, producer),
        Conclusion::ForwardLink {
            relation, target, ..
        } => {
            for (first, sources) in data.backward_links_by_relation() {
                for composed in index.compositions(first, *relation) {
                    for source in sources {
                        compose_links(
                            index, *source, root, first, *relation, *composed, *target, producer,
                        );
                    }
                }
            }
        }
        Conclusion::Propagation {
            relation,
            existential,
            ..
        } => {
            for source in data.backward_links(*relation) {
                producer.produce(
                    source,
                    Conclusion::ComposedSubsumer {
                        subsumer: *existential,
                        inference: Inference::ExistentialComposition {
                            via: root,
                            relation: *relation,
                            existential: *existential,
                        },
                    },
                );
            }
        }
        Conclusion::Contradiction { .. } | Conclusion::PropagatedContradiction { .. } => {
            for (relation, sources) in data.backward_links_by_relation() {
                for source in sources {
                    producer.produce(
                        *source,
                        Conclusion::PropagatedContradiction {
                            target: root,
                            relation,
                        },
                    );
                }
            }
        }
    }
}

/// Rules applying to every subsumer.
fn compose_subsumer(
    index: &OntologyIndex,
    root: ClassId,
    data: &ContextData,
    subsumer: ClassId,
    producer: &mut impl ConclusionProducer,
) {
    for told in index.told_supers(subsumer) {
        producer.produce(
            root,
            Conclusion::DecomposedSubsumer {
                subsumer: *told,
                inference: Inference::ToldSuperClass { premise: subsumer },
            },
        );
    }
    if subsumer == index.owl_nothing() {
        producer.produce(
            root,
            Conclusion::Contradiction {
                inference: Inference::BottomSubsumer,
            },
        );
    }
    for (other, conjunction) in index.negative_conjunctions(subsumer) {
        if data.has_subsumer(*other) {
            producer.produce(
                root,
                Conclusion::ComposedSubsumer {
                    subsumer: *conjunction,
                    inference: Inference::ConjunctionComposition {
                        first: subsumer.min(*other),
                        second: subsumer.max(*other),
                    },
                },
            );
        }
    }
    for existential in index.negative_existentials(subsumer) {
        let IndexedClassExpression::Existential { property, .. } = index.expression(*existential)
        else {
            continue;
        };
        for relation in index.sub_properties(*property) {
            producer.produce(
                root,
                Conclusion::Propagation {
                    relation: *relation,
                    existential: *existential,
                    inference: Inference::PropagationGeneration {
                        filler: subsumer,
                        existential: *existential,
                    },
                },
            );
        }
        if index.is_reflexive(*property) {
            producer.produce(
                root,
                Conclusion::ComposedSubsumer {
                    subsumer: *existential,
                    inference: Inference::ReflexiveComposition {
                        filler: subsumer,
                        existential: *existential,
                    },
                },
            );
        }
    }
}

/// Rules breaking a subsumer into its parts.
fn decompose_subsumer(
    index: &OntologyIndex,
    root: ClassId,
    subsumer: ClassId,
    producer: &mut impl ConclusionProducer,
) {
    match index.expression(subsumer) {
        IndexedClassExpression::Conjunction { first, second } => {
            for conjunct in [*first, *second] {
                producer.produce(
                    root,
                    Conclusion::DecomposedSubsumer {
                        subsumer: conjunct,
                        inference: Inference::ConjunctionDecomposition {
                            conjunction: subsumer,
                        },
                    },
                );
            }
        }
        IndexedClassExpression::Existential { property, filler } => {
            let inference = Inference::ExistentialDecomposition {
                source: root,
                existential: subsumer,
            };
            producer.produce(
                *filler,
                Conclusion::BackwardLink {
                    source: root,
                    relation: *property,
                    inference,
                },
            );
            if index.is_right_component(*property) {
                producer.produce(
                    root,
                    Conclusion::ForwardLink {
                        relation: *property,
                        target: *filler,
                        inference,
                    },
                );
            }
        }
        IndexedClassExpression::Class(_) | IndexedClassExpression::Individual(_) => (),
    }
}

fn apply_backward_link(
    index: &OntologyIndex,
    root: ClassId,
    data: &ContextData,
    source: ClassId,
    relation: PropertyId,
    producer: &mut impl ConclusionProducer,
) {
    if data.has_contradiction() {
        producer.produce(
            source,
            Conclusion::PropagatedContradiction {
                target: root,
                relation,
            },
        );
    }
    for existential in data.propagations(relation) {
        producer.produce(
            source,
            Conclusion::ComposedSubsumer {
                subsumer: existential,
                inference: Inference::ExistentialComposition {
                    via: root,
                    relation,
                    existential,
                },
            },
        );
    }
    for (second, targets) in data.forward_links_by_relation() {
        for composed in index.compositions(relation, second) {
            for target in targets {
                compose_links(
                    index, source, root, relation, second, *composed, *target, producer,
                );
            }
        }
    }
}

/// `source ⊑ ∃first.via` and `via ⊑ ∃second.target` with `first ∘ second ⊑ composed`.
#[expect(clippy::too_many_arguments)]
fn compose_links(
    index: &OntologyIndex,
    source: ClassId,
    via: ClassId,
    first: PropertyId,
    second: PropertyId,
    composed: PropertyId,
    target: ClassId,
    producer: &mut impl ConclusionProducer,
) {
    let inference = Inference::LinkComposition {
        source,
        via,
        first,
        second,
        target,
    };
    producer.produce(
        target,
        Conclusion::BackwardLink {
            source,
            relation: composed,
            inference,
        },
    );
    if index.is_right_component(composed) {
        producer.produce(
            source,
            Conclusion::ForwardLink {
                relation: composed,
                target,
                inference,
            },
        );
    }
}
