//! OWL 2 EL ontology: an ordered container of axioms.

use crate::axiom::Axiom;
use crate::entity::OwlClass;
use oxrdf::NamedNode;
use rustc_hash::FxHashSet;
use std::fmt;

/// An OWL 2 ontology restricted to the EL fragment.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    iri: Option<NamedNode>,
    axioms: Vec<Axiom>,
}

impl Ontology {
    pub fn new(iri: Option<NamedNode>) -> Self {
        Self {
            iri,
            axioms: Vec::new(),
        }
    }

    pub fn iri(&self) -> Option<&NamedNode> {
        self.iri.as_ref()
    }

    pub fn set_iri(&mut self, iri: Option<NamedNode>) {
        self.iri = iri;
    }

    pub fn add_axiom(&mut self, axiom: Axiom) {
        self.axioms.push(axiom);
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    /// Named classes occurring in declarations or class axioms, in first-seen order.
    pub fn classes(&self) -> Vec<OwlClass> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut visit = |c: &OwlClass| {
            if seen.insert(c.clone()) {
                result.push(c.clone());
            }
        };
        for axiom in &self.axioms {
            match axiom {
                Axiom::DeclareClass(c) => visit(c),
                Axiom::SubClassOf {
                    sub_class,
                    super_class,
                } => {
                    sub_class.for_each_class(&mut visit);
                    super_class.for_each_class(&mut visit);
                }
                Axiom::EquivalentClasses(classes) | Axiom::DisjointClasses(classes) => {
                    for c in classes {
                        c.for_each_class(&mut visit);
                    }
                }
                Axiom::ObjectPropertyDomain { domain: class, .. }
                | Axiom::ClassAssertion { class, .. } => class.for_each_class(&mut visit),
                _ => (),
            }
        }
        result
    }
}

impl Extend<Axiom> for Ontology {
    fn extend<T: IntoIterator<Item = Axiom>>(&mut self, iter: T) {
        self.axioms.extend(iter);
    }
}

impl FromIterator<Axiom> for Ontology {
    fn from_iter<T: IntoIterator<Item = Axiom>>(iter: T) -> Self {
        Self {
            iri: None,
            axioms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Ontology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(iri) = &self.iri {
            write!(f, "Ontology({iri})")?;
        } else {
            f.write_str("Ontology(anonymous)")?;
        }
        write!(f, " [{} axioms]", self.axioms.len())
    }
}
