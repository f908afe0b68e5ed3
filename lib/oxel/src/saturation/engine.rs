//! Processing of active contexts.

use crate::error::Interrupted;
use crate::indexing::ClassId;
use crate::interrupt::InterruptMonitor;
use crate::saturation::conclusion::Conclusion;
use crate::saturation::context::Context;
use crate::saturation::rules::{self, ConclusionProducer, RuleSet};
use crate::saturation::state::SaturationState;
use std::sync::Arc;

/// What processing a queued conclusion means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMode {
    /// Integrate the conclusion and apply the non-redundant rules to it.
    Saturation,
    /// Apply every rule to the conclusion and remove it.
    Deletion,
}

/// Drains the active contexts of a [`SaturationState`].
///
/// Several workers may run [`process`](Self::process) on the same state: a
/// context is only processed by the worker that polled it.
#[derive(Debug, Clone, Copy)]
pub struct RuleApplication<'a> {
    state: &'a SaturationState,
    mode: ApplicationMode,
}

impl<'a> RuleApplication<'a> {
    pub fn new(state: &'a SaturationState, mode: ApplicationMode) -> Self {
        Self { state, mode }
    }

    /// Processes active contexts until there are none left.
    ///
    /// The monitor is checked before each context. On interruption the
    /// remaining active contexts stay queued.
    pub fn process(&self, monitor: &dyn InterruptMonitor) -> Result<(), Interrupted> {
        let mut buffer = Vec::new();
        loop {
            if monitor.is_interrupted() {
                return Err(Interrupted);
            }
            let Some(context) = self.state.poll_active_context() else {
                return Ok(());
            };
            self.process_context(&context, &mut buffer);
        }
    }

    fn process_context(&self, context: &Arc<Context>, buffer: &mut Vec<(ClassId, Conclusion)>) {
        loop {
            while let Some(conclusion) = context.take_to_do() {
                match self.mode {
                    ApplicationMode::Saturation => self.integrate(context, &conclusion, buffer),
                    ApplicationMode::Deletion => self.delete(context, &conclusion, buffer),
                }
                self.state.statistics().record_rules_applied(buffer.len());
                self.flush(buffer);
            }
            if !context.deactivate() {
                break;
            }
        }
        self.state.statistics().record_context_processed();
    }

    fn integrate(
        &self,
        context: &Context,
        conclusion: &Conclusion,
        buffer: &mut Vec<(ClassId, Conclusion)>,
    ) {
        let mut data = context.write();
        if context.is_saturated()
            && matches!(
                conclusion,
                Conclusion::ComposedSubsumer { .. }
                    | Conclusion::DecomposedSubsumer { .. }
                    | Conclusion::Contradiction { .. }
                    | Conclusion::PropagatedContradiction { .. }
            )
            && !data.contains(conclusion)
        {
            // Saturated contexts only accept new links
            tracing::warn!(
                context = %self.state.index().display(context.root()),
                kind = conclusion.kind().name(),
                "dropping a new conclusion for a saturated context"
            );
            self.state
                .statistics()
                .record_processed(conclusion.kind(), false);
            return;
        }
        let used = data.insert(conclusion);
        self.state
            .statistics()
            .record_processed(conclusion.kind(), used);
        if used {
            rules::apply(
                self.state.index(),
                context.root(),
                &data,
                conclusion,
                RuleSet::NonRedundant,
                buffer,
            );
        }
    }

    fn delete(
        &self,
        context: &Arc<Context>,
        conclusion: &Conclusion,
        buffer: &mut Vec<(ClassId, Conclusion)>,
    ) {
        let mut data = context.write();
        let present = data.contains(conclusion);
        self.state
            .statistics()
            .record_processed(conclusion.kind(), present);
        if !present {
            return;
        }
        rules::apply(
            self.state.index(),
            context.root(),
            &data,
            conclusion,
            RuleSet::All,
            buffer,
        );
        data.remove(conclusion);
        drop(data);
        self.state.statistics().record_deleted();
        self.state.record_modified(context);
    }

    fn flush(&self, buffer: &mut Vec<(ClassId, Conclusion)>) {
        match self.mode {
            ApplicationMode::Saturation => {
                let mut writer = self.state.writer();
                for (target, conclusion) in buffer.drain(..) {
                    writer.produce(target, conclusion);
                }
            }
            ApplicationMode::Deletion => {
                let mut writer = self.state.deletion_writer();
                for (target, conclusion) in buffer.drain(..) {
                    writer.produce(target, conclusion);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::entity::OwlClass;
    use crate::indexing::OntologyIndex;
    use crate::interrupt::{Interrupter, NeverInterrupted};
    use crate::ontology::Ontology;

    fn class(name: &str) -> OwlClass {
        OwlClass::from_iri(format!("http://example.com/{name}")).unwrap()
    }

    fn chain_state() -> SaturationState {
        let ontology: Ontology = [
            Axiom::subclass_of(class("A"), class("B")),
            Axiom::subclass_of(class("B"), class("C")),
        ]
        .into_iter()
        .collect();
        SaturationState::new(Arc::new(OntologyIndex::new(&ontology).unwrap()))
    }

    #[test]
    fn told_supers_are_closed() {
        let state = chain_state();
        let a = state.index().class_id(&class("A")).unwrap();
        let c = state.index().class_id(&class("C")).unwrap();
        let context = state.writer().ensure_context(a);
        RuleApplication::new(&state, ApplicationMode::Saturation)
            .process(&NeverInterrupted)
            .unwrap();
        assert!(context.has_subsumer(c));
        assert_eq!(context.subsumers().len(), 3);
        assert!(state.poll_active_context().is_none());
    }

    #[test]
    fn interruption_keeps_active_contexts() {
        let state = chain_state();
        let a = state.index().class_id(&class("A")).unwrap();
        state.writer().ensure_context(a);
        let interrupter = Interrupter::new();
        interrupter.interrupt();
        let application = RuleApplication::new(&state, ApplicationMode::Saturation);
        assert_eq!(application.process(&interrupter), Err(Interrupted));
        interrupter.clear_interrupt();
        application.process(&interrupter).unwrap();
        assert_eq!(state.context(a).unwrap().subsumers().len(), 3);
    }

    #[test]
    fn deletion_removes_consequences() {
        let state = chain_state();
        let a = state.index().class_id(&class("A")).unwrap();
        let b = state.index().class_id(&class("B")).unwrap();
        let context = state.writer().ensure_context(a);
        RuleApplication::new(&state, ApplicationMode::Saturation)
            .process(&NeverInterrupted)
            .unwrap();
        state.deletion_writer().produce(
            a,
            Conclusion::DecomposedSubsumer {
                subsumer: b,
                inference: crate::saturation::Inference::Initialization,
            },
        );
        RuleApplication::new(&state, ApplicationMode::Deletion)
            .process(&NeverInterrupted)
            .unwrap();
        assert_eq!(context.subsumers(), [a]);
        assert_eq!(state.take_modified_contexts().len(), 1);
    }
}
