//! Conclusions derived during saturation and the inferences producing them.

use crate::indexing::{ClassId, PropertyId};

/// A fact to be integrated into the context it is produced for.
///
/// The context root is implicit: a conclusion always lives in the context it
/// was sent to, called `D` below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Conclusion {
    /// `D ⊑ subsumer`, obtained by a composition rule.
    ///
    /// Decomposition rules are redundant for composed subsumers: their parts are
    /// already derived.
    ComposedSubsumer {
        subsumer: ClassId,
        inference: Inference,
    },
    /// `D ⊑ subsumer`, to which both composition and decomposition rules apply.
    DecomposedSubsumer {
        subsumer: ClassId,
        inference: Inference,
    },
    /// `source ⊑ ∃relation.D`.
    BackwardLink {
        source: ClassId,
        relation: PropertyId,
        inference: Inference,
    },
    /// `D ⊑ ∃relation.target`, only kept when `relation` occurs as the right
    /// component of a property composition.
    ForwardLink {
        relation: PropertyId,
        target: ClassId,
        inference: Inference,
    },
    /// Every source of a backward link over `relation` into `D` is subsumed by
    /// the negative existential `existential`.
    Propagation {
        relation: PropertyId,
        existential: ClassId,
        inference: Inference,
    },
    /// `D ⊑ ⊥`.
    Contradiction { inference: Inference },
    /// `D ⊑ ⊥` because `D ⊑ ∃relation.target` and `target ⊑ ⊥`.
    PropagatedContradiction {
        target: ClassId,
        relation: PropertyId,
    },
}

/// Kinds of [`Conclusion`], used to index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConclusionKind {
    ComposedSubsumer,
    DecomposedSubsumer,
    BackwardLink,
    ForwardLink,
    Propagation,
    Contradiction,
    PropagatedContradiction,
}

impl ConclusionKind {
    pub const ALL: [Self; 7] = [
        Self::ComposedSubsumer,
        Self::DecomposedSubsumer,
        Self::BackwardLink,
        Self::ForwardLink,
        Self::Propagation,
        Self::Contradiction,
        Self::PropagatedContradiction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ComposedSubsumer => "composed subsumers",
            Self::DecomposedSubsumer => "decomposed subsumers",
            Self::BackwardLink => "backward links",
            Self::ForwardLink => "forward links",
            Self::Propagation => "propagations",
            Self::Contradiction => "contradictions",
            Self::PropagatedContradiction => "propagated contradictions",
        }
    }
}

impl Conclusion {
    pub fn kind(&self) -> ConclusionKind {
        match self {
            Self::ComposedSubsumer { .. } => ConclusionKind::ComposedSubsumer,
            Self::DecomposedSubsumer { .. } => ConclusionKind::DecomposedSubsumer,
            Self::BackwardLink { .. } => ConclusionKind::BackwardLink,
            Self::ForwardLink { .. } => ConclusionKind::ForwardLink,
            Self::Propagation { .. } => ConclusionKind::Propagation,
            Self::Contradiction { .. } => ConclusionKind::Contradiction,
            Self::PropagatedContradiction { .. } => ConclusionKind::PropagatedContradiction,
        }
    }

    /// The subsumer carried by a (composed or decomposed) subsumer conclusion.
    pub fn subsumer(&self) -> Option<ClassId> {
        match self {
            Self::ComposedSubsumer { subsumer, .. } | Self::DecomposedSubsumer { subsumer, .. } => {
                Some(*subsumer)
            }
            _ => None,
        }
    }

    /// The inference that produced this conclusion.
    pub fn inference(&self) -> Inference {
        match self {
            Self::ComposedSubsumer { inference, .. }
            | Self::DecomposedSubsumer { inference, .. }
            | Self::BackwardLink { inference, .. }
            | Self::ForwardLink { inference, .. }
            | Self::Propagation { inference, .. }
            | Self::Contradiction { inference } => *inference,
            Self::PropagatedContradiction { target, relation } => {
                Inference::ContradictionPropagation {
                    target: *target,
                    relation: *relation,
                }
            }
        }
    }

    /// Premises of this conclusion when it is produced for the context `root`.
    pub fn premises(&self, root: ClassId) -> Vec<Premise> {
        self.inference().premises(root)
    }
}

/// How a conclusion was derived.
///
/// Together with the context a conclusion is produced for, an inference
/// identifies all premises of the derivation, see [`Conclusion::premises`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inference {
    /// The root of a context subsumes itself.
    Initialization,
    /// Every context is subsumed by `owl:Thing` when `owl:Thing` occurs negatively.
    OwlThingInitialization,
    /// `premise ⊑ super` is a told inclusion.
    ToldSuperClass { premise: ClassId },
    /// Both conjuncts are subsumers.
    ConjunctionComposition { first: ClassId, second: ClassId },
    /// A conjunction is a subsumer.
    ConjunctionDecomposition { conjunction: ClassId },
    /// The existential restriction `existential` is a subsumer of `source`.
    ExistentialDecomposition { source: ClassId, existential: ClassId },
    /// A backward link over `relation` into `via` meets a propagation of
    /// `existential` in `via`.
    ExistentialComposition {
        via: ClassId,
        relation: PropertyId,
        existential: ClassId,
    },
    /// The filler of the negative existential `existential` is a subsumer.
    PropagationGeneration { filler: ClassId, existential: ClassId },
    /// The filler of the negative existential `existential` over a reflexive
    /// property is a subsumer.
    ReflexiveComposition { filler: ClassId, existential: ClassId },
    /// `source ⊑ ∃first.via` and `via ⊑ ∃second.target` compose.
    LinkComposition {
        source: ClassId,
        via: ClassId,
        first: PropertyId,
        second: PropertyId,
        target: ClassId,
    },
    /// `owl:Nothing` is a subsumer.
    BottomSubsumer,
    /// A link reaches a context with a contradiction.
    ContradictionPropagation {
        target: ClassId,
        relation: PropertyId,
    },
}

impl Inference {
    /// Premises of a conclusion derived by this inference in the context `root`.
    pub fn premises(self, root: ClassId) -> Vec<Premise> {
        match self {
            Self::Initialization | Self::OwlThingInitialization => Vec::new(),
            Self::ToldSuperClass { premise } => vec![Premise::subsumer(root, premise)],
            Self::ConjunctionComposition { first, second } => vec![
                Premise::subsumer(root, first),
                Premise::subsumer(root, second),
            ],
            Self::ConjunctionDecomposition { conjunction } => {
                vec![Premise::subsumer(root, conjunction)]
            }
            Self::ExistentialDecomposition {
                source,
                existential,
            } => vec![Premise::subsumer(source, existential)],
            Self::ExistentialComposition {
                via,
                relation,
                existential,
            } => vec![
                Premise::new(
                    via,
                    PremiseKind::BackwardLink {
                        source: root,
                        relation,
                    },
                ),
                Premise::new(
                    via,
                    PremiseKind::Propagation {
                        relation,
                        existential,
                    },
                ),
            ],
            Self::PropagationGeneration { filler, .. } | Self::ReflexiveComposition { filler, .. } => {
                vec![Premise::subsumer(root, filler)]
            }
            Self::LinkComposition {
                source,
                via,
                first,
                second,
                target,
            } => vec![
                Premise::new(
                    via,
                    PremiseKind::BackwardLink {
                        source,
                        relation: first,
                    },
                ),
                Premise::new(
                    via,
                    PremiseKind::ForwardLink {
                        relation: second,
                        target,
                    },
                ),
            ],
            Self::BottomSubsumer => vec![Premise::subsumer(root, ClassId::NOTHING)],
            Self::ContradictionPropagation { target, relation } => vec![
                Premise::new(
                    target,
                    PremiseKind::BackwardLink {
                        source: root,
                        relation,
                    },
                ),
                Premise::new(target, PremiseKind::Contradiction),
            ],
        }
    }
}

/// A premise of an inference, located in the context of `context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Premise {
    pub context: ClassId,
    pub kind: PremiseKind,
}

impl Premise {
    fn new(context: ClassId, kind: PremiseKind) -> Self {
        Self { context, kind }
    }

    fn subsumer(context: ClassId, subsumer: ClassId) -> Self {
        Self::new(context, PremiseKind::Subsumer(subsumer))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PremiseKind {
    Subsumer(ClassId),
    BackwardLink {
        source: ClassId,
        relation: PropertyId,
    },
    ForwardLink {
        relation: PropertyId,
        target: ClassId,
    },
    Propagation {
        relation: PropertyId,
        existential: ClassId,
    },
    Contradiction,
}
