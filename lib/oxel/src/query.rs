//! Entailment checks against saturated contexts.
//!
//! A query class expression is interned with positive polarity only and
//! saturated as a new root. Its subsumption by another expression is then read
//! off the saturated contexts without indexing that expression: named classes
//! and nominals are looked up in the subsumers, conjunctions are checked
//! operand by operand, and existential restrictions follow the links leaving
//! the root.

use crate::axiom::Axiom;
use crate::entity::{Individual, ObjectProperty, OwlClass};
use crate::error::ReasonerError;
use crate::expression::ClassExpression;
use crate::indexing::{ClassId, OntologyIndex, PropertyId};
use crate::saturation::{Context, SaturationState};
use std::sync::Arc;

pub(crate) fn class_id(index: &OntologyIndex, class: &OwlClass) -> Result<ClassId, ReasonerError> {
    index
        .class_id(class)
        .ok_or_else(|| ReasonerError::UnknownClass(class.clone()))
}

pub(crate) fn individual_id(
    index: &OntologyIndex,
    individual: &Individual,
) -> Result<ClassId, ReasonerError> {
    index
        .individual_id(individual)
        .ok_or_else(|| ReasonerError::UnknownIndividual(individual.clone()))
}

pub(crate) fn property_id(
    index: &OntologyIndex,
    property: &ObjectProperty,
) -> Result<PropertyId, ReasonerError> {
    index
        .property_id(property)
        .ok_or_else(|| ReasonerError::UnknownProperty(property.clone()))
}

/// Fails on the first entity of `expression` missing from the index.
pub(crate) fn check_expression(
    index: &OntologyIndex,
    expression: &ClassExpression,
) -> Result<(), ReasonerError> {
    match expression {
        ClassExpression::Class(class) => class_id(index, class).map(|_| ()),
        ClassExpression::ObjectIntersectionOf(operands) => operands
            .iter()
            .try_for_each(|operand| check_expression(index, operand)),
        ClassExpression::ObjectSomeValuesFrom { property, filler } => {
            property_id(index, property)?;
            check_expression(index, filler)
        }
        ClassExpression::ObjectHasValue {
            property,
            individual,
        } => {
            property_id(index, property)?;
            individual_id(index, individual).map(|_| ())
        }
    }
}

/// Fails on the first entity of `axiom` missing from the index.
pub(crate) fn check_axiom(index: &OntologyIndex, axiom: &Axiom) -> Result<(), ReasonerError> {
    match axiom {
        Axiom::DeclareClass(class) => class_id(index, class).map(|_| ()),
        Axiom::DeclareObjectProperty(property)
        | Axiom::TransitiveObjectProperty(property)
        | Axiom::ReflexiveObjectProperty(property) => property_id(index, property).map(|_| ()),
        Axiom::DeclareNamedIndividual(individual) => individual_id(index, individual).map(|_| ()),
        Axiom::SubClassOf {
            sub_class,
            super_class,
        } => {
            check_expression(index, sub_class)?;
            check_expression(index, super_class)
        }
        Axiom::EquivalentClasses(classes) | Axiom::DisjointClasses(classes) => classes
            .iter()
            .try_for_each(|class| check_expression(index, class)),
        Axiom::SubObjectPropertyOf {
            sub_property,
            super_property,
        } => {
            property_id(index, sub_property)?;
            property_id(index, super_property).map(|_| ())
        }
        Axiom::EquivalentObjectProperties(properties) => properties
            .iter()
            .try_for_each(|property| property_id(index, property).map(|_| ())),
        Axiom::SubPropertyChainOf {
            chain,
            super_property,
        } => {
            for property in chain {
                property_id(index, property)?;
            }
            property_id(index, super_property).map(|_| ())
        }
        Axiom::ObjectPropertyDomain { property, domain } => {
            property_id(index, property)?;
            check_expression(index, domain)
        }
        Axiom::ClassAssertion { class, individual } => {
            individual_id(index, individual)?;
            check_expression(index, class)
        }
        Axiom::ObjectPropertyAssertion {
            property,
            source,
            target,
        } => {
            property_id(index, property)?;
            individual_id(index, source)?;
            individual_id(index, target).map(|_| ())
        }
    }
}

/// Reads entailed subsumers off a quiescent saturation state.
///
/// Every context reachable from the checked roots must be saturated.
pub(crate) struct Entailment<'a> {
    state: &'a SaturationState,
    contexts: Vec<Arc<Context>>,
}

impl<'a> Entailment<'a> {
    pub(crate) fn new(state: &'a SaturationState) -> Self {
        Self {
            state,
            contexts: state.contexts(),
        }
    }

    /// Whether `root ⊑ expression` is entailed.
    pub(crate) fn entails(&self, root: ClassId, expression: &ClassExpression) -> bool {
        let Some(context) = self.state.context(root) else {
            return false;
        };
        if context.is_inconsistent() {
            return true;
        }
        let index = self.state.index();
        match expression {
            ClassExpression::Class(class) => {
                class.is_thing() || index.class_id(class).is_some_and(|id| context.has_subsumer(id))
            }
            ClassExpression::ObjectIntersectionOf(operands) => operands
                .iter()
                .all(|operand| self.entails(root, operand)),
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                self.entails_existential(root, property, |target| self.entails(target, filler))
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                let Some(nominal) = index.individual_id(individual) else {
                    return false;
                };
                self.entails_existential(root, property, |target| {
                    self.state
                        .context(target)
                        .is_some_and(|context| context.has_subsumer(nominal))
                })
            }
        }
    }

    /// Whether `root ⊑ ∃property.C` for a `C` with `filler(C)`.
    fn entails_existential(
        &self,
        root: ClassId,
        property: &ObjectProperty,
        filler: impl Fn(ClassId) -> bool,
    ) -> bool {
        let index = self.state.index();
        let Some(property) = index.property_id(property) else {
            return false;
        };
        if index.is_reflexive(property) && filler(root) {
            return true;
        }
        let relations = index.sub_properties(property);
        self.contexts.iter().any(|target| {
            let data = target.read();
            let linked = relations
                .iter()
                .any(|relation| data.backward_links(*relation).any(|source| source == root));
            drop(data);
            linked && filler(target.root())
        })
    }
}
