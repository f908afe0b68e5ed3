//! Class and instance taxonomy built from the subsumers of named classes.

use crate::axiom::Axiom;
use crate::entity::{Individual, OwlClass};
use crate::expression::ClassExpression;
use rustc_hash::{FxHashMap, FxHashSet};

/// A set of equivalent classes in a [`Taxonomy`].
#[derive(Debug, Clone)]
pub struct TaxonomyNode {
    members: Vec<OwlClass>,
    direct_supers: Vec<usize>,
    direct_subs: Vec<usize>,
    direct_instances: Vec<Individual>,
}

impl TaxonomyNode {
    fn new(members: Vec<OwlClass>) -> Self {
        Self {
            members,
            direct_supers: Vec::new(),
            direct_subs: Vec::new(),
            direct_instances: Vec::new(),
        }
    }

    /// Equivalent classes of the node, sorted.
    pub fn members(&self) -> &[OwlClass] {
        &self.members
    }

    /// The smallest member, used to name the node.
    pub fn canonical(&self) -> &OwlClass {
        &self.members[0]
    }

    /// Individuals having this node as a direct type.
    pub fn direct_instances(&self) -> &[Individual] {
        &self.direct_instances
    }
}

/// Collects the subsumers of named classes and the types of individuals.
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    satisfiable: Vec<(OwlClass, FxHashSet<OwlClass>)>,
    unsatisfiable: Vec<OwlClass>,
    individuals: Vec<(Individual, FxHashSet<OwlClass>)>,
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a satisfiable class with its named subsumers.
    pub fn add_class(&mut self, class: OwlClass, supers: impl IntoIterator<Item = OwlClass>) {
        if class.is_nothing() {
            return;
        }
        let mut supers: FxHashSet<_> = supers.into_iter().collect();
        supers.insert(class.clone());
        supers.insert(OwlClass::thing());
        supers.remove(&OwlClass::nothing());
        self.satisfiable.push((class, supers));
    }

    pub fn add_unsatisfiable(&mut self, class: OwlClass) {
        if !class.is_nothing() {
            self.unsatisfiable.push(class);
        }
    }

    /// Adds a named individual with its named types.
    pub fn add_individual(&mut self, individual: Individual, types: impl IntoIterator<Item = OwlClass>) {
        let mut types: FxHashSet<_> = types.into_iter().collect();
        types.insert(OwlClass::thing());
        self.individuals.push((individual, types));
    }

    pub fn build(self) -> Taxonomy {
        let mut taxonomy = Taxonomy {
            nodes: Vec::new(),
            node_of: FxHashMap::default(),
            top: 0,
            bottom: 0,
            individual_types: FxHashMap::default(),
        };
        let thing_unsatisfiable = self.unsatisfiable.iter().any(OwlClass::is_thing);
        let mut supers: FxHashMap<OwlClass, FxHashSet<OwlClass>> = FxHashMap::default();
        let mut order = Vec::new();
        if !thing_unsatisfiable {
            for (class, class_supers) in self.satisfiable {
                order.push(class.clone());
                supers.insert(class, class_supers);
            }
            if !supers.contains_key(&OwlClass::thing()) {
                order.insert(0, OwlClass::thing());
                supers.insert(
                    OwlClass::thing(),
                    std::iter::once(OwlClass::thing()).collect(),
                );
            }
        }
        // Only subsumers that are known satisfiable classes
        let known: FxHashSet<OwlClass> = supers.keys().cloned().collect();
        for class_supers in supers.values_mut() {
            class_supers.retain(|c| known.contains(c));
        }

        // Equivalence classes
        for class in &order {
            if taxonomy.node_of.contains_key(class) {
                continue;
            }
            let mut members: Vec<_> = supers[class]
                .iter()
                .filter(|sup| supers[*sup].contains(class))
                .cloned()
                .collect();
            members.sort();
            let id = taxonomy.nodes.len();
            for member in &members {
                taxonomy.node_of.insert(member.clone(), id);
            }
            taxonomy.nodes.push(TaxonomyNode::new(members));
        }

        // Transitive reduction
        let strict_supers: Vec<FxHashSet<usize>> = taxonomy
            .nodes
            .iter()
            .enumerate()
            .map(|(id, node)| {
                supers[node.canonical()]
                    .iter()
                    .map(|sup| taxonomy.node_of[sup])
                    .filter(|sup| *sup != id)
                    .collect()
            })
            .collect();
        for (id, candidates) in strict_supers.iter().enumerate() {
            let mut direct: Vec<_> = candidates
                .iter()
                .copied()
                .filter(|sup| {
                    !candidates
                        .iter()
                        .any(|other| other != sup && strict_supers[*other].contains(sup))
                })
                .collect();
            direct.sort_unstable();
            for sup in &direct {
                taxonomy.nodes[*sup].direct_subs.push(id);
            }
            taxonomy.nodes[id].direct_supers = direct;
        }

        // Bottom
        let mut bottom_members = self.unsatisfiable;
        if thing_unsatisfiable {
            bottom_members.extend(order);
            bottom_members.push(OwlClass::thing());
        }
        bottom_members.push(OwlClass::nothing());
        bottom_members.sort();
        bottom_members.dedup();
        let bottom = taxonomy.nodes.len();
        let leaves: Vec<_> = (0..bottom)
            .filter(|id| taxonomy.nodes[*id].direct_subs.is_empty())
            .collect();
        for leaf in &leaves {
            taxonomy.nodes[*leaf].direct_subs.push(bottom);
        }
        for member in &bottom_members {
            taxonomy.node_of.insert(member.clone(), bottom);
        }
        let mut bottom_node = TaxonomyNode::new(bottom_members);
        bottom_node.direct_supers = leaves;
        taxonomy.nodes.push(bottom_node);
        taxonomy.bottom = bottom;
        taxonomy.top = taxonomy.node_of[&OwlClass::thing()];

        // Realization
        for (individual, types) in self.individuals {
            let type_nodes: FxHashSet<usize> = types
                .iter()
                .filter_map(|c| taxonomy.node_of.get(c).copied())
                .collect();
            let mut direct: Vec<_> = type_nodes
                .iter()
                .copied()
                .filter(|node| {
                    !type_nodes.iter().any(|other| {
                        other != node && strict_supers.get(*other).is_some_and(|s| s.contains(node))
                    })
                })
                .collect();
            direct.sort_unstable();
            for node in &direct {
                taxonomy.nodes[*node].direct_instances.push(individual.clone());
            }
            taxonomy.individual_types.insert(individual, direct);
        }
        for node in &mut taxonomy.nodes {
            node.direct_instances.sort();
        }
        taxonomy
    }
}

/// Named classes grouped into nodes of equivalent classes, ordered by their
/// direct subsumption.
///
/// The top node contains `owl:Thing`, the bottom node `owl:Nothing` and every
/// unsatisfiable class.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: Vec<TaxonomyNode>,
    node_of: FxHashMap<OwlClass, usize>,
    top: usize,
    bottom: usize,
    /// individual -> direct type nodes
    individual_types: FxHashMap<Individual, Vec<usize>>,
}

impl Taxonomy {
    pub fn top(&self) -> &TaxonomyNode {
        &self.nodes[self.top]
    }

    pub fn bottom(&self) -> &TaxonomyNode {
        &self.nodes[self.bottom]
    }

    pub fn nodes(&self) -> &[TaxonomyNode] {
        &self.nodes
    }

    pub fn node(&self, class: &OwlClass) -> Option<&TaxonomyNode> {
        self.node_of.get(class).map(|id| &self.nodes[*id])
    }

    pub fn contains(&self, class: &OwlClass) -> bool {
        self.node_of.contains_key(class)
    }

    pub fn is_satisfiable(&self, class: &OwlClass) -> Option<bool> {
        self.node_of.get(class).map(|id| *id != self.bottom)
    }

    /// Classes equivalent to `class`, itself included.
    pub fn equivalent_classes(&self, class: &OwlClass) -> Option<&[OwlClass]> {
        self.node(class).map(TaxonomyNode::members)
    }

    /// Nodes of the strict superclasses of `class`.
    pub fn super_nodes(&self, class: &OwlClass, direct: bool) -> Option<Vec<&TaxonomyNode>> {
        let id = *self.node_of.get(class)?;
        Some(self.walk(id, direct, |node| &node.direct_supers))
    }

    /// Nodes of the strict subclasses of `class`.
    pub fn sub_nodes(&self, class: &OwlClass, direct: bool) -> Option<Vec<&TaxonomyNode>> {
        let id = *self.node_of.get(class)?;
        Some(self.walk(id, direct, |node| &node.direct_subs))
    }

    fn walk(
        &self,
        start: usize,
        direct: bool,
        next: impl Fn(&TaxonomyNode) -> &Vec<usize>,
    ) -> Vec<&TaxonomyNode> {
        if direct {
            return next(&self.nodes[start]).iter().map(|id| &self.nodes[*id]).collect();
        }
        let mut seen = FxHashSet::default();
        let mut stack = next(&self.nodes[start]).clone();
        let mut result = Vec::new();
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                result.push(id);
                stack.extend(next(&self.nodes[id]));
            }
        }
        result.sort_unstable();
        result.into_iter().map(|id| &self.nodes[id]).collect()
    }

    /// Type nodes of a realized individual.
    pub fn type_nodes(&self, individual: &Individual, direct: bool) -> Option<Vec<&TaxonomyNode>> {
        let direct_types = self.individual_types.get(individual)?;
        let mut ids: Vec<usize> = direct_types.clone();
        if !direct {
            let mut seen: FxHashSet<usize> = ids.iter().copied().collect();
            let mut stack = ids.clone();
            while let Some(id) = stack.pop() {
                for sup in &self.nodes[id].direct_supers {
                    if seen.insert(*sup) {
                        ids.push(*sup);
                        stack.push(*sup);
                    }
                }
            }
            ids.sort_unstable();
        }
        Some(ids.into_iter().map(|id| &self.nodes[id]).collect())
    }

    /// Instances of `class`; only those having it as a direct type if `direct`.
    pub fn instances(&self, class: &OwlClass, direct: bool) -> Option<Vec<Individual>> {
        let id = *self.node_of.get(class)?;
        let mut instances = self.nodes[id].direct_instances.clone();
        if !direct {
            for node in self.walk(id, false, |node| &node.direct_subs) {
                instances.extend(node.direct_instances.iter().cloned());
            }
            instances.sort();
            instances.dedup();
        }
        Some(instances)
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individual_types.keys()
    }

    /// The taxonomy as `EquivalentClasses` and direct `SubClassOf` axioms, sorted.
    pub fn class_axioms(&self) -> Vec<Axiom> {
        let mut axioms = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.members.len() > 1 {
                axioms.push(Axiom::equivalent_classes(
                    node.members.iter().cloned().map(ClassExpression::from),
                ));
            }
            if id == self.bottom {
                continue;
            }
            for sup in &node.direct_supers {
                axioms.push(Axiom::subclass_of(
                    node.canonical().clone(),
                    self.nodes[*sup].canonical().clone(),
                ));
            }
        }
        sort_axioms(&mut axioms);
        axioms
    }

    /// Direct types of the individuals as `ClassAssertion` axioms, sorted.
    pub fn instance_axioms(&self) -> Vec<Axiom> {
        let mut axioms: Vec<_> = self
            .individual_types
            .iter()
            .flat_map(|(individual, types)| {
                types.iter().map(|id| {
                    Axiom::class_assertion(self.nodes[*id].canonical().clone(), individual.clone())
                })
            })
            .collect();
        sort_axioms(&mut axioms);
        axioms
    }
}

fn sort_axioms(axioms: &mut [Axiom]) {
    axioms.sort_by_cached_key(ToString::to_string);
}
