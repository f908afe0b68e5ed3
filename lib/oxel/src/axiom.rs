//! Logical axioms of the OWL 2 EL fragment.

use crate::entity::{Individual, ObjectProperty, OwlClass};
use crate::expression::ClassExpression;
use std::fmt;

/// An OWL 2 EL axiom.
///
/// Displayed in OWL functional-style syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axiom {
    DeclareClass(OwlClass),
    DeclareObjectProperty(ObjectProperty),
    DeclareNamedIndividual(Individual),

    /// `SubClassOf(sub super)`
    SubClassOf {
        sub_class: ClassExpression,
        super_class: ClassExpression,
    },
    /// `EquivalentClasses(C1 ... Cn)`
    EquivalentClasses(Vec<ClassExpression>),
    /// `DisjointClasses(C1 ... Cn)`
    DisjointClasses(Vec<ClassExpression>),

    /// `SubObjectPropertyOf(sub super)`
    SubObjectPropertyOf {
        sub_property: ObjectProperty,
        super_property: ObjectProperty,
    },
    /// `EquivalentObjectProperties(P1 ... Pn)`
    EquivalentObjectProperties(Vec<ObjectProperty>),
    /// `SubObjectPropertyOf(ObjectPropertyChain(P1 ... Pn) P)`
    SubPropertyChainOf {
        chain: Vec<ObjectProperty>,
        super_property: ObjectProperty,
    },
    /// `TransitiveObjectProperty(P)`
    TransitiveObjectProperty(ObjectProperty),
    /// `ReflexiveObjectProperty(P)`
    ReflexiveObjectProperty(ObjectProperty),
    /// `ObjectPropertyDomain(P C)`
    ObjectPropertyDomain {
        property: ObjectProperty,
        domain: ClassExpression,
    },

    /// `ClassAssertion(C a)`
    ClassAssertion {
        class: ClassExpression,
        individual: Individual,
    },
    /// `ObjectPropertyAssertion(P a b)`
    ObjectPropertyAssertion {
        property: ObjectProperty,
        source: Individual,
        target: Individual,
    },
}

impl Axiom {
    pub fn subclass_of(sub_class: impl Into<ClassExpression>, super_class: impl Into<ClassExpression>) -> Self {
        Self::SubClassOf {
            sub_class: sub_class.into(),
            super_class: super_class.into(),
        }
    }

    pub fn equivalent_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::EquivalentClasses(classes.into_iter().collect())
    }

    pub fn disjoint_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::DisjointClasses(classes.into_iter().collect())
    }

    pub fn sub_object_property_of(
        sub_property: impl Into<ObjectProperty>,
        super_property: impl Into<ObjectProperty>,
    ) -> Self {
        Self::SubObjectPropertyOf {
            sub_property: sub_property.into(),
            super_property: super_property.into(),
        }
    }

    pub fn sub_property_chain_of(
        chain: impl IntoIterator<Item = ObjectProperty>,
        super_property: impl Into<ObjectProperty>,
    ) -> Self {
        Self::SubPropertyChainOf {
            chain: chain.into_iter().collect(),
            super_property: super_property.into(),
        }
    }

    pub fn class_assertion(class: impl Into<ClassExpression>, individual: impl Into<Individual>) -> Self {
        Self::ClassAssertion {
            class: class.into(),
            individual: individual.into(),
        }
    }

    /// Returns true for declarations, which carry no logical content.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Self::DeclareClass(_) | Self::DeclareObjectProperty(_) | Self::DeclareNamedIndividual(_)
        )
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, items: &[T]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclareClass(c) => write!(f, "Declaration(Class({c}))"),
            Self::DeclareObjectProperty(p) => write!(f, "Declaration(ObjectProperty({p}))"),
            Self::DeclareNamedIndividual(i) => write!(f, "Declaration(NamedIndividual({i}))"),
            Self::SubClassOf {
                sub_class,
                super_class,
            } => write!(f, "SubClassOf({sub_class} {super_class})"),
            Self::EquivalentClasses(classes) => write_list(f, "EquivalentClasses", classes),
            Self::DisjointClasses(classes) => write_list(f, "DisjointClasses", classes),
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "SubObjectPropertyOf({sub_property} {super_property})"),
            Self::EquivalentObjectProperties(properties) => {
                write_list(f, "EquivalentObjectProperties", properties)
            }
            Self::SubPropertyChainOf {
                chain,
                super_property,
            } => {
                f.write_str("SubObjectPropertyOf(")?;
                write_list(f, "ObjectPropertyChain", chain)?;
                write!(f, " {super_property})")
            }
            Self::TransitiveObjectProperty(p) => write!(f, "TransitiveObjectProperty({p})"),
            Self::ReflexiveObjectProperty(p) => write!(f, "ReflexiveObjectProperty({p})"),
            Self::ObjectPropertyDomain { property, domain } => {
                write!(f, "ObjectPropertyDomain({property} {domain})")
            }
            Self::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Self::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => write!(f, "ObjectPropertyAssertion({property} {source} {target})"),
        }
    }
}
