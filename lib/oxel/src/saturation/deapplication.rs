//! Retraction of conclusions and re-saturation of the affected contexts.

use crate::error::Interrupted;
use crate::indexing::ClassId;
use crate::interrupt::InterruptMonitor;
use crate::saturation::context::Context;
use crate::saturation::engine::{ApplicationMode, RuleApplication};
use crate::saturation::factory::{ClassExpressionSaturationFactory, SaturationJob};
use crate::saturation::rules::{self, ConclusionProducer, RuleSet};
use crate::saturation::state::SaturationState;
use std::sync::Arc;

/// Deletes everything derived from the initialization of some roots.
///
/// Deletion applies every rule, redundant ones included, to each deleted
/// conclusion before removing it, so it removes at least all conclusions
/// having a derivation that uses a deleted one. Conclusions that had another
/// derivation are derived again by [`resaturate`](Self::resaturate).
#[derive(Debug, Clone, Copy)]
pub struct RuleDeapplication<'a> {
    state: &'a SaturationState,
}

impl<'a> RuleDeapplication<'a> {
    pub fn new(state: &'a SaturationState) -> Self {
        Self { state }
    }

    /// Deletes the initial conclusions of `roots` and all their consequences.
    ///
    /// Returns the modified contexts, which are no longer saturated. After an
    /// interruption, call it again before re-saturating.
    pub fn deapply(
        &self,
        roots: impl IntoIterator<Item = ClassId>,
        monitor: &dyn InterruptMonitor,
    ) -> Result<Vec<Arc<Context>>, Interrupted> {
        let mut initial = Vec::new();
        for root in roots {
            rules::initialize(self.state.index(), root, &mut initial);
        }
        let mut writer = self.state.deletion_writer();
        for (context, conclusion) in initial {
            writer.produce(context, conclusion);
        }
        RuleApplication::new(self.state, ApplicationMode::Deletion).process(monitor)?;
        let modified = self.state.take_modified_contexts();
        tracing::debug!(modified = modified.len(), "conclusions deleted");
        Ok(modified)
    }

    /// Derives again the conclusions of the contexts modified by [`deapply`](Self::deapply).
    ///
    /// Modified contexts start over from their initial conclusions. Rules are
    /// applied again to the conclusions left in every context, since their
    /// consequences in modified contexts may have been deleted.
    pub fn resaturate(
        &self,
        modified: &[Arc<Context>],
        workers: usize,
        monitor: &dyn InterruptMonitor,
    ) -> Result<(), Interrupted> {
        let mut writer = self.state.writer();
        for context in modified {
            writer.initialize(context);
        }
        let mut buffer = Vec::new();
        for context in self.state.contexts() {
            let data = context.read();
            for conclusion in data.conclusions() {
                rules::apply(
                    self.state.index(),
                    context.root(),
                    &data,
                    &conclusion,
                    RuleSet::NonRedundant,
                    &mut buffer,
                );
            }
            drop(data);
            for (target, conclusion) in buffer.drain(..) {
                writer.produce(target, conclusion);
            }
        }

        let (factory, _finished) = ClassExpressionSaturationFactory::new(self.state, workers);
        for context in modified {
            factory.submit(SaturationJob::new(context.root()));
        }
        factory.wait_completion(monitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::entity::{ObjectProperty, OwlClass};
    use crate::expression::ClassExpression;
    use crate::indexing::OntologyIndex;
    use crate::interrupt::NeverInterrupted;
    use crate::ontology::Ontology;
    use crate::saturation::context::ContextData;

    fn class(name: &str) -> OwlClass {
        OwlClass::from_iri(format!("http://example.com/{name}")).unwrap()
    }

    fn snapshot(state: &SaturationState) -> Vec<(ClassId, ContextData)> {
        state
            .contexts()
            .iter()
            .map(|c| (c.root(), c.read().clone()))
            .collect()
    }

    #[test]
    fn deapplication_then_resaturation_restores_the_fixpoint() {
        let r = ObjectProperty::from_iri("http://example.com/r").unwrap();
        let ontology: Ontology = [
            Axiom::subclass_of(
                class("A"),
                ClassExpression::some_values_from(r.clone(), class("B").into()),
            ),
            Axiom::subclass_of(class("B"), class("C")),
            Axiom::subclass_of(
                ClassExpression::some_values_from(r, class("C").into()),
                class("D"),
            ),
            Axiom::subclass_of(class("D"), class("E")),
        ]
        .into_iter()
        .collect();
        let state = SaturationState::new(Arc::new(OntologyIndex::new(&ontology).unwrap()));
        let roots: Vec<_> = state.index().named_classes().to_vec();
        let (factory, _) = ClassExpressionSaturationFactory::new(&state, 2);
        for root in &roots {
            factory.submit(SaturationJob::new(*root));
        }
        factory.wait_completion(&NeverInterrupted).unwrap();
        let before = snapshot(&state);

        let b = state.index().class_id(&class("B")).unwrap();
        let a = state.index().class_id(&class("A")).unwrap();
        let d = state.index().class_id(&class("D")).unwrap();
        let deapplication = RuleDeapplication::new(&state);
        let modified = deapplication.deapply([b], &NeverInterrupted).unwrap();
        assert!(modified.iter().any(|c| c.root() == b));
        assert!(!state.context(b).unwrap().is_saturated());
        // A ⊑ D depended on B ⊑ C
        assert!(!state.context(a).unwrap().has_subsumer(d));

        deapplication
            .resaturate(&modified, 2, &NeverInterrupted)
            .unwrap();
        assert_eq!(snapshot(&state), before);
        assert!(state.contexts().iter().all(|c| c.is_saturated()));
    }
}
