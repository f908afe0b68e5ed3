//! Ontology indexing.
//!
//! The indexer turns axioms into an interning arena of [`IndexedClassExpression`]s
//! identified by dense [`ClassId`]s. Structurally equal expressions share one id.
//! Each entry records what the saturation rules need: told superclasses, the
//! negative conjunctions and existential restrictions in which it occurs, and its
//! polarity. Object properties get the same treatment with [`PropertyId`], and
//! after indexing their hierarchy and chain compositions are saturated.

use crate::axiom::Axiom;
use crate::entity::{Individual, ObjectProperty, OwlClass};
use crate::error::IndexError;
use crate::expression::ClassExpression;
use crate::ontology::Ontology;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{fmt, mem};

/// Identifier of an [`IndexedClassExpression`] inside an [`OntologyIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    /// `owl:Thing`, always indexed first.
    pub const THING: Self = Self(0);
    /// `owl:Nothing`, always indexed second.
    pub const NOTHING: Self = Self(1);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap())
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an [`IndexedProperty`] inside an [`OntologyIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u32);

impl PropertyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A canonical class expression.
///
/// Conjunctions are binary with `first < second`; n-ary conjunctions are nested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexedClassExpression {
    Class(OwlClass),
    /// The nominal `{a}` of a named individual.
    Individual(Individual),
    Conjunction { first: ClassId, second: ClassId },
    Existential { property: PropertyId, filler: ClassId },
}

/// A canonical object property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexedProperty {
    Named(ObjectProperty),
    /// Auxiliary property standing for `left ∘ right`, used to binarize long chains.
    Chain { left: PropertyId, right: PropertyId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
    Both,
}

impl Polarity {
    fn is_positive(self) -> bool {
        matches!(self, Self::Positive | Self::Both)
    }

    fn is_negative(self) -> bool {
        matches!(self, Self::Negative | Self::Both)
    }
}

#[derive(Debug, Clone)]
struct ClassEntry {
    expression: IndexedClassExpression,
    positive: bool,
    negative: bool,
    told_supers: Vec<ClassId>,
    /// `(other conjunct, conjunction)` for every negative conjunction with this conjunct.
    negative_conjunctions: Vec<(ClassId, ClassId)>,
    /// Negative existential restrictions having this expression as filler.
    negative_existentials: Vec<ClassId>,
}

#[derive(Debug, Clone)]
struct PropertyEntry {
    property: IndexedProperty,
    told_supers: Vec<PropertyId>,
    told_reflexive: bool,
    /// Told reflexive, a super-property of a reflexive property, or composed of reflexive properties.
    reflexive: bool,
    /// Reflexive-transitive closure of `told_supers`.
    super_properties: Vec<PropertyId>,
    /// Reflexive-transitive closure of the inverse of `told_supers`.
    sub_properties: Vec<PropertyId>,
}

const OWL_THING: ClassId = ClassId::THING;
const OWL_NOTHING: ClassId = ClassId::NOTHING;

/// Read-only index of an ontology, shared by the saturation workers.
#[derive(Debug, Clone)]
pub struct OntologyIndex {
    classes: Vec<ClassEntry>,
    class_ids: FxHashMap<IndexedClassExpression, ClassId>,
    properties: Vec<PropertyEntry>,
    property_ids: FxHashMap<IndexedProperty, PropertyId>,
    told_compositions: Vec<(PropertyId, PropertyId, PropertyId)>,
    compositions: FxHashMap<(PropertyId, PropertyId), Vec<PropertyId>>,
    right_components: FxHashSet<PropertyId>,
    named_classes: Vec<ClassId>,
    individuals: Vec<ClassId>,
    axiom_count: usize,
}

impl OntologyIndex {
    /// Indexes all axioms of an ontology.
    pub fn new(ontology: &Ontology) -> Result<Self, IndexError> {
        let mut indexer = OntologyIndexer::new();
        for axiom in ontology.axioms() {
            indexer.index_axiom(axiom)?;
        }
        Ok(indexer.finish())
    }

    fn empty() -> Self {
        Self {
            classes: Vec::new(),
            class_ids: FxHashMap::default(),
            properties: Vec::new(),
            property_ids: FxHashMap::default(),
            told_compositions: Vec::new(),
            compositions: FxHashMap::default(),
            right_components: FxHashSet::default(),
            named_classes: Vec::new(),
            individuals: Vec::new(),
            axiom_count: 0,
        }
    }

    /// Interns `expression` to saturate it as a query root.
    ///
    /// Only positive occurrences are recorded, so no rule applying to the
    /// expressions indexed before changes and their saturated contexts stay
    /// valid. Every entity of `expression` must already be indexed.
    pub(crate) fn intern_query(&mut self, expression: &ClassExpression) -> Result<ClassId, IndexError> {
        let mut indexer = OntologyIndexer {
            index: mem::replace(self, Self::empty()),
        };
        let result = indexer.class_expression(expression, Polarity::Positive);
        *self = indexer.index;
        result
    }

    #[inline]
    pub fn owl_thing(&self) -> ClassId {
        OWL_THING
    }

    #[inline]
    pub fn owl_nothing(&self) -> ClassId {
        OWL_NOTHING
    }

    #[inline]
    pub fn expression(&self, id: ClassId) -> &IndexedClassExpression {
        &self.classes[id.index()].expression
    }

    #[inline]
    pub fn property(&self, id: PropertyId) -> &IndexedProperty {
        &self.properties[id.index()].property
    }

    #[inline]
    pub fn told_supers(&self, id: ClassId) -> &[ClassId] {
        &self.classes[id.index()].told_supers
    }

    #[inline]
    pub fn negative_conjunctions(&self, id: ClassId) -> &[(ClassId, ClassId)] {
        &self.classes[id.index()].negative_conjunctions
    }

    #[inline]
    pub fn negative_existentials(&self, id: ClassId) -> &[ClassId] {
        &self.classes[id.index()].negative_existentials
    }

    #[inline]
    pub fn occurs_negatively(&self, id: ClassId) -> bool {
        self.classes[id.index()].negative
    }

    #[inline]
    pub fn occurs_positively(&self, id: ClassId) -> bool {
        self.classes[id.index()].positive
    }

    /// Properties `R` with `R ⊑* property`, including `property` itself.
    #[inline]
    pub fn sub_properties(&self, property: PropertyId) -> &[PropertyId] {
        &self.properties[property.index()].sub_properties
    }

    /// Properties `S` with `property ⊑* S`, including `property` itself.
    #[inline]
    pub fn super_properties(&self, property: PropertyId) -> &[PropertyId] {
        &self.properties[property.index()].super_properties
    }

    /// Properties `T` with `left ∘ right ⊑ T` after closing chains under sub-properties.
    #[inline]
    pub fn compositions(&self, left: PropertyId, right: PropertyId) -> &[PropertyId] {
        self.compositions
            .get(&(left, right))
            .map_or(&[], Vec::as_slice)
    }

    /// Whether `R ⊑ property` holds for every `R`-successor of a class being the class itself.
    #[inline]
    pub fn is_reflexive(&self, property: PropertyId) -> bool {
        self.properties[property.index()].reflexive
    }

    /// Whether `property` is the right-hand side of some composition.
    ///
    /// Only links over such properties need to be recorded as forward links.
    #[inline]
    pub fn is_right_component(&self, property: PropertyId) -> bool {
        self.right_components.contains(&property)
    }

    pub fn class_id(&self, class: &OwlClass) -> Option<ClassId> {
        self.class_ids
            .get(&IndexedClassExpression::Class(class.clone()))
            .copied()
    }

    pub fn individual_id(&self, individual: &Individual) -> Option<ClassId> {
        self.class_ids
            .get(&IndexedClassExpression::Individual(individual.clone()))
            .copied()
    }

    pub fn property_id(&self, property: &ObjectProperty) -> Option<PropertyId> {
        self.property_ids
            .get(&IndexedProperty::Named(property.clone()))
            .copied()
    }

    /// Named classes, including `owl:Thing` and `owl:Nothing`, in indexing order.
    pub fn named_classes(&self) -> &[ClassId] {
        &self.named_classes
    }

    /// Nominals of the named individuals, in indexing order.
    pub fn individuals(&self) -> &[ClassId] {
        &self.individuals
    }

    /// The named class of an id, if the id stands for one.
    pub fn as_class(&self, id: ClassId) -> Option<&OwlClass> {
        match self.expression(id) {
            IndexedClassExpression::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_individual(&self, id: ClassId) -> Option<&Individual> {
        match self.expression(id) {
            IndexedClassExpression::Individual(i) => Some(i),
            _ => None,
        }
    }

    pub fn class_expression_count(&self) -> usize {
        self.classes.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Number of logical axioms indexed.
    pub fn axiom_count(&self) -> usize {
        self.axiom_count
    }

    /// Functional-style rendering of an indexed expression, for logs and debugging.
    pub fn display(&self, id: ClassId) -> impl fmt::Display + '_ {
        DisplayClass { index: self, id }
    }

    pub fn display_property(&self, id: PropertyId) -> impl fmt::Display + '_ {
        DisplayProperty { index: self, id }
    }
}

struct DisplayClass<'a> {
    index: &'a OntologyIndex,
    id: ClassId,
}

impl fmt::Display for DisplayClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index.expression(self.id) {
            IndexedClassExpression::Class(c) => write!(f, "{c}"),
            IndexedClassExpression::Individual(i) => write!(f, "ObjectOneOf({i})"),
            IndexedClassExpression::Conjunction { first, second } => write!(
                f,
                "ObjectIntersectionOf({} {})",
                self.index.display(*first),
                self.index.display(*second)
            ),
            IndexedClassExpression::Existential { property, filler } => write!(
                f,
                "ObjectSomeValuesFrom({} {})",
                self.index.display_property(*property),
                self.index.display(*filler)
            ),
        }
    }
}

struct DisplayProperty<'a> {
    index: &'a OntologyIndex,
    id: PropertyId,
}

impl fmt::Display for DisplayProperty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index.property(self.id) {
            IndexedProperty::Named(p) => write!(f, "{p}"),
            IndexedProperty::Chain { left, right } => write!(
                f,
                "ObjectPropertyChain({} {})",
                self.index.display_property(*left),
                self.index.display_property(*right)
            ),
        }
    }
}

/// Builds an [`OntologyIndex`] axiom by axiom.
#[derive(Debug)]
pub struct OntologyIndexer {
    index: OntologyIndex,
}

impl Default for OntologyIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl OntologyIndexer {
    pub fn new() -> Self {
        let mut index = OntologyIndex::empty();
        for (id, class) in [(OWL_THING, OwlClass::thing()), (OWL_NOTHING, OwlClass::nothing())] {
            let expression = IndexedClassExpression::Class(class);
            index.class_ids.insert(expression.clone(), id);
            index.named_classes.push(id);
            index.classes.push(ClassEntry::new(expression));
        }
        Self { index }
    }

    /// Adds an axiom to the index.
    ///
    /// Declarations only register their entity; the other axioms are normalized
    /// into told superclasses, told super-properties and compositions.
    pub fn index_axiom(&mut self, axiom: &Axiom) -> Result<(), IndexError> {
        if !axiom.is_declaration() {
            self.index.axiom_count += 1;
        }
        match axiom {
            Axiom::DeclareClass(class) => {
                self.intern(IndexedClassExpression::Class(class.clone()))?;
            }
            Axiom::DeclareObjectProperty(property) => {
                self.named_property(property)?;
            }
            Axiom::DeclareNamedIndividual(individual) => {
                self.intern(IndexedClassExpression::Individual(individual.clone()))?;
            }
            Axiom::SubClassOf {
                sub_class,
                super_class,
            } => {
                let sub = self.class_expression(sub_class, Polarity::Negative)?;
                let sup = self.class_expression(super_class, Polarity::Positive)?;
                self.add_told_super(sub, sup);
            }
            Axiom::EquivalentClasses(classes) => {
                let ids = classes
                    .iter()
                    .map(|c| self.class_expression(c, Polarity::Both))
                    .collect::<Result<Vec<_>, _>>()?;
                // A cycle of inclusions makes all members equivalent
                for (i, id) in ids.iter().enumerate() {
                    self.add_told_super(*id, ids[(i + 1) % ids.len()]);
                }
            }
            Axiom::DisjointClasses(classes) => {
                let ids = classes
                    .iter()
                    .map(|c| self.class_expression(c, Polarity::Negative))
                    .collect::<Result<Vec<_>, _>>()?;
                self.mark(OWL_NOTHING, Polarity::Positive);
                for (i, first) in ids.iter().enumerate() {
                    for second in &ids[i + 1..] {
                        let conjunction = self.conjunction(*first, *second, Polarity::Negative)?;
                        self.add_told_super(conjunction, OWL_NOTHING);
                    }
                }
            }
            Axiom::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => {
                let sub = self.named_property(sub_property)?;
                let sup = self.named_property(super_property)?;
                self.add_told_super_property(sub, sup);
            }
            Axiom::EquivalentObjectProperties(properties) => {
                let ids = properties
                    .iter()
                    .map(|p| self.named_property(p))
                    .collect::<Result<Vec<_>, _>>()?;
                for (i, id) in ids.iter().enumerate() {
                    self.add_told_super_property(*id, ids[(i + 1) % ids.len()]);
                }
            }
            Axiom::SubPropertyChainOf {
                chain,
                super_property,
            } => {
                let sup = self.named_property(super_property)?;
                let ids = chain
                    .iter()
                    .map(|p| self.named_property(p))
                    .collect::<Result<Vec<_>, _>>()?;
                match ids.as_slice() {
                    [] => tracing::warn!(%super_property, "ignoring an empty property chain"),
                    [sub] => {
                        self.add_told_super_property(*sub, sup);
                    }
                    [first, rest @ ..] => {
                        // R1 ∘ (R2 ∘ (... ∘ Rn)) with one auxiliary property per inner composition
                        let mut right = ids[ids.len() - 1];
                        for left in rest[..rest.len() - 1].iter().rev() {
                            let chain = self.property(IndexedProperty::Chain {
                                left: *left,
                                right,
                            })?;
                            self.index.told_compositions.push((*left, right, chain));
                            right = chain;
                        }
                        self.index.told_compositions.push((*first, right, sup));
                    }
                }
            }
            Axiom::TransitiveObjectProperty(property) => {
                let id = self.named_property(property)?;
                self.index.told_compositions.push((id, id, id));
            }
            Axiom::ReflexiveObjectProperty(property) => {
                let id = self.named_property(property)?;
                self.index.properties[id.index()].told_reflexive = true;
            }
            Axiom::ObjectPropertyDomain { property, domain } => {
                let property = self.named_property(property)?;
                self.mark(OWL_THING, Polarity::Negative);
                let existential = self.existential(property, OWL_THING, Polarity::Negative)?;
                let domain = self.class_expression(domain, Polarity::Positive)?;
                self.add_told_super(existential, domain);
            }
            Axiom::ClassAssertion { class, individual } => {
                let nominal = self.nominal(individual, Polarity::Negative)?;
                let class = self.class_expression(class, Polarity::Positive)?;
                self.add_told_super(nominal, class);
            }
            Axiom::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => {
                let property = self.named_property(property)?;
                let source = self.nominal(source, Polarity::Negative)?;
                let target = self.nominal(target, Polarity::Positive)?;
                let existential = self.existential(property, target, Polarity::Positive)?;
                self.add_told_super(source, existential);
            }
        }
        Ok(())
    }

    /// Saturates the property hierarchy and freezes the index.
    pub fn finish(mut self) -> OntologyIndex {
        // A reflexive component reduces a chain to an inclusion, which may in turn
        // make more properties reflexive
        loop {
            self.close_property_hierarchy();
            if !self.propagate_reflexivity() {
                break;
            }
        }

        let index = &mut self.index;
        let mut compositions: FxHashMap<(PropertyId, PropertyId), Vec<PropertyId>> =
            FxHashMap::default();
        for (left, right, sup) in &index.told_compositions {
            for sub_left in &index.properties[left.index()].sub_properties {
                for sub_right in &index.properties[right.index()].sub_properties {
                    let targets = compositions.entry((*sub_left, *sub_right)).or_default();
                    if !targets.contains(sup) {
                        targets.push(*sup);
                    }
                }
            }
        }
        index.right_components = compositions.keys().map(|(_, right)| *right).collect();
        index.compositions = compositions;

        tracing::debug!(
            class_expressions = index.classes.len(),
            properties = index.properties.len(),
            reflexive = index.properties.iter().filter(|p| p.reflexive).count(),
            compositions = index.compositions.len(),
            axioms = index.axiom_count,
            "ontology indexed"
        );
        self.index
    }

    /// Computes the reflexive-transitive closure of the told super-properties.
    fn close_property_hierarchy(&mut self) {
        let index = &mut self.index;
        let ids: Vec<_> = (0..).map(PropertyId).take(index.properties.len()).collect();
        let mut sub_properties = vec![Vec::new(); ids.len()];
        for start in &ids {
            let mut supers = vec![*start];
            let mut seen: FxHashSet<_> = supers.iter().copied().collect();
            let mut position = 0;
            while let Some(current) = supers.get(position).copied() {
                position += 1;
                for sup in &index.properties[current.index()].told_supers {
                    if seen.insert(*sup) {
                        supers.push(*sup);
                    }
                }
            }
            for sup in &supers {
                sub_properties[sup.index()].push(*start);
            }
            index.properties[start.index()].super_properties = supers;
        }
        for (entry, subs) in index.properties.iter_mut().zip(sub_properties) {
            entry.sub_properties = subs;
        }
    }

    /// Marks the reflexive properties and turns every chain with a reflexive
    /// component into an inclusion of the other component.
    ///
    /// Returns true if some told super-property was added.
    fn propagate_reflexivity(&mut self) -> bool {
        let index = &mut self.index;
        let mut reflexive = vec![false; index.properties.len()];
        for entry in index.properties.iter().filter(|p| p.told_reflexive) {
            for sup in &entry.super_properties {
                reflexive[sup.index()] = true;
            }
        }
        let mut grown = true;
        while grown {
            grown = false;
            for (left, right, sup) in &index.told_compositions {
                if reflexive[left.index()] && reflexive[right.index()] {
                    for target in &index.properties[sup.index()].super_properties {
                        grown |= !mem::replace(&mut reflexive[target.index()], true);
                    }
                }
            }
        }
        for (entry, reflexive) in index.properties.iter_mut().zip(&reflexive) {
            entry.reflexive = *reflexive;
        }

        let mut added = false;
        for (left, right, sup) in index.told_compositions.clone() {
            // ρ ⊑ left gives right ⊑ left ∘ right ⊑ sup, and symmetrically
            if reflexive[left.index()] {
                added |= self.add_told_super_property(right, sup);
            }
            if reflexive[right.index()] {
                added |= self.add_told_super_property(left, sup);
            }
        }
        added
    }

    fn intern(&mut self, expression: IndexedClassExpression) -> Result<ClassId, IndexError> {
        if let Some(id) = self.index.class_ids.get(&expression) {
            return Ok(*id);
        }
        let id = ClassId(next_id(self.index.classes.len(), "class expressions")?);
        match &expression {
            IndexedClassExpression::Class(_) => self.index.named_classes.push(id),
            IndexedClassExpression::Individual(_) => self.index.individuals.push(id),
            _ => (),
        }
        self.index.class_ids.insert(expression.clone(), id);
        self.index.classes.push(ClassEntry::new(expression));
        Ok(id)
    }

    /// Records the polarity of an occurrence, returning true if the expression
    /// occurs negatively for the first time.
    fn mark(&mut self, id: ClassId, polarity: Polarity) -> bool {
        let entry = &mut self.index.classes[id.index()];
        if polarity.is_positive() {
            entry.positive = true;
        }
        if polarity.is_negative() && !entry.negative {
            entry.negative = true;
            return true;
        }
        false
    }

    fn class_expression(
        &mut self,
        expression: &ClassExpression,
        polarity: Polarity,
    ) -> Result<ClassId, IndexError> {
        match expression {
            ClassExpression::Class(class) => {
                let id = self.intern(IndexedClassExpression::Class(class.clone()))?;
                self.mark(id, polarity);
                Ok(id)
            }
            ClassExpression::ObjectIntersectionOf(operands) => {
                let mut operands = operands.iter();
                let Some(first) = operands.next() else {
                    self.mark(OWL_THING, polarity);
                    return Ok(OWL_THING);
                };
                let mut result = self.class_expression(first, polarity)?;
                for operand in operands {
                    let operand = self.class_expression(operand, polarity)?;
                    result = self.conjunction(result, operand, polarity)?;
                }
                Ok(result)
            }
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let property = self.named_property(property)?;
                let filler = self.class_expression(filler, polarity)?;
                self.existential(property, filler, polarity)
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                let property = self.named_property(property)?;
                let filler = self.nominal(individual, polarity)?;
                self.existential(property, filler, polarity)
            }
        }
    }

    fn nominal(&mut self, individual: &Individual, polarity: Polarity) -> Result<ClassId, IndexError> {
        let id = self.intern(IndexedClassExpression::Individual(individual.clone()))?;
        self.mark(id, polarity);
        Ok(id)
    }

    fn conjunction(
        &mut self,
        first: ClassId,
        second: ClassId,
        polarity: Polarity,
    ) -> Result<ClassId, IndexError> {
        if first == second {
            return Ok(first);
        }
        let (first, second) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let id = self.intern(IndexedClassExpression::Conjunction { first, second })?;
        if self.mark(id, polarity) {
            self.index.classes[first.index()]
                .negative_conjunctions
                .push((second, id));
            self.index.classes[second.index()]
                .negative_conjunctions
                .push((first, id));
        }
        Ok(id)
    }

    fn existential(
        &mut self,
        property: PropertyId,
        filler: ClassId,
        polarity: Polarity,
    ) -> Result<ClassId, IndexError> {
        let id = self.intern(IndexedClassExpression::Existential { property, filler })?;
        if self.mark(id, polarity) {
            self.index.classes[filler.index()]
                .negative_existentials
                .push(id);
        }
        Ok(id)
    }

    fn add_told_super(&mut self, sub: ClassId, sup: ClassId) {
        if sub != sup {
            self.index.classes[sub.index()].told_supers.push(sup);
        }
    }

    fn named_property(&mut self, property: &ObjectProperty) -> Result<PropertyId, IndexError> {
        self.property(IndexedProperty::Named(property.clone()))
    }

    fn property(&mut self, property: IndexedProperty) -> Result<PropertyId, IndexError> {
        if let Some(id) = self.index.property_ids.get(&property) {
            return Ok(*id);
        }
        let id = PropertyId(next_id(self.index.properties.len(), "object properties")?);
        self.index.property_ids.insert(property.clone(), id);
        self.index.properties.push(PropertyEntry {
            property,
            told_supers: Vec::new(),
            told_reflexive: false,
            reflexive: false,
            super_properties: vec![id],
            sub_properties: vec![id],
        });
        Ok(id)
    }

    /// Returns true if `sup` is a new told super-property of `sub`.
    fn add_told_super_property(&mut self, sub: PropertyId, sup: PropertyId) -> bool {
        if sub == sup {
            return false;
        }
        let supers = &mut self.index.properties[sub.index()].told_supers;
        if supers.contains(&sup) {
            return false;
        }
        supers.push(sup);
        true
    }
}

impl ClassEntry {
    fn new(expression: IndexedClassExpression) -> Self {
        Self {
            expression,
            positive: false,
            negative: false,
            told_supers: Vec::new(),
            negative_conjunctions: Vec::new(),
            negative_existentials: Vec::new(),
        }
    }
}

/// The id of the next entry of an arena holding `len` entries.
///
/// `u32::MAX` is never handed out, so counting up to the last id cannot overflow.
fn next_id(len: usize, kind: &'static str) -> Result<u32, IndexError> {
    u32::try_from(len)
        .ok()
        .filter(|id| *id < u32::MAX)
        .ok_or(IndexError::Overflow { kind })
}
