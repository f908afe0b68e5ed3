//! Class expressions of the OWL 2 EL fragment supported by the reasoner.

use crate::entity::{Individual, ObjectProperty, OwlClass};
use std::fmt;

/// An EL class expression.
///
/// Displayed in OWL functional-style syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    /// A named class, including `owl:Thing` and `owl:Nothing`.
    Class(OwlClass),
    /// `ObjectIntersectionOf(C1 ... Cn)`
    ObjectIntersectionOf(Vec<ClassExpression>),
    /// `ObjectSomeValuesFrom(P C)`
    ObjectSomeValuesFrom {
        property: ObjectProperty,
        filler: Box<ClassExpression>,
    },
    /// `ObjectHasValue(P a)`, that is `ObjectSomeValuesFrom(P ObjectOneOf(a))`.
    ObjectHasValue {
        property: ObjectProperty,
        individual: Individual,
    },
}

impl ClassExpression {
    #[inline]
    pub fn class(class: impl Into<OwlClass>) -> Self {
        Self::Class(class.into())
    }

    pub fn intersection(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::ObjectIntersectionOf(operands.into_iter().collect())
    }

    pub fn some_values_from(property: impl Into<ObjectProperty>, filler: ClassExpression) -> Self {
        Self::ObjectSomeValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    pub fn has_value(property: impl Into<ObjectProperty>, individual: impl Into<Individual>) -> Self {
        Self::ObjectHasValue {
            property: property.into(),
            individual: individual.into(),
        }
    }

    /// The named class if this expression is atomic.
    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Calls `f` on every named class occurring in the expression.
    pub fn for_each_class(&self, f: &mut impl FnMut(&OwlClass)) {
        match self {
            Self::Class(c) => f(c),
            Self::ObjectIntersectionOf(operands) => {
                for operand in operands {
                    operand.for_each_class(f);
                }
            }
            Self::ObjectSomeValuesFrom { filler, .. } => filler.for_each_class(f),
            Self::ObjectHasValue { .. } => (),
        }
    }
}

impl From<OwlClass> for ClassExpression {
    #[inline]
    fn from(class: OwlClass) -> Self {
        Self::Class(class)
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{c}"),
            Self::ObjectIntersectionOf(operands) => {
                f.write_str("ObjectIntersectionOf(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_syntax() {
        let a = OwlClass::from_iri("http://example.com/A").unwrap();
        let b = OwlClass::from_iri("http://example.com/B").unwrap();
        let r = ObjectProperty::from_iri("http://example.com/r").unwrap();
        let expression = ClassExpression::intersection([
            ClassExpression::class(a),
            ClassExpression::some_values_from(r, ClassExpression::class(b)),
        ]);
        assert_eq!(
            expression.to_string(),
            "ObjectIntersectionOf(<http://example.com/A> ObjectSomeValuesFrom(<http://example.com/r> <http://example.com/B>))"
        );
    }

    #[test]
    fn nested_classes_are_visited() {
        let a = OwlClass::from_iri("http://example.com/A").unwrap();
        let b = OwlClass::from_iri("http://example.com/B").unwrap();
        let r = ObjectProperty::from_iri("http://example.com/r").unwrap();
        let expression = ClassExpression::intersection([
            ClassExpression::class(a.clone()),
            ClassExpression::some_values_from(r, ClassExpression::class(b.clone())),
        ]);
        let mut seen = Vec::new();
        expression.for_each_class(&mut |c| seen.push(c.clone()));
        assert_eq!(seen, vec![a, b]);
    }
}
