//! Saturation of a single root in a private state.

use crate::indexing::{ClassId, OntologyIndex};
use crate::saturation::conclusion::Conclusion;
use crate::saturation::context::ContextData;
use crate::saturation::rules::{self, ConclusionProducer, RuleSet};
use crate::saturation::state::SaturationState;
use rustc_hash::FxHashMap;

/// Writer collecting conclusions into private contexts.
///
/// Contexts are created and initialized on demand like with the main writer,
/// but nothing is shared: the main [`SaturationState`] is never touched.
#[derive(Debug)]
pub struct LocalWriter<'a> {
    index: &'a OntologyIndex,
    contexts: FxHashMap<ClassId, ContextData>,
    todo: Vec<(ClassId, Conclusion)>,
}

impl<'a> LocalWriter<'a> {
    pub fn new(index: &'a OntologyIndex) -> Self {
        Self {
            index,
            contexts: FxHashMap::default(),
            todo: Vec::new(),
        }
    }

    fn ensure_context(&mut self, root: ClassId) {
        if !self.contexts.contains_key(&root) {
            self.contexts.insert(root, ContextData::default());
            rules::initialize(self.index, root, &mut self.todo);
        }
    }
}

impl ConclusionProducer for LocalWriter<'_> {
    fn produce(&mut self, context: ClassId, conclusion: Conclusion) {
        self.ensure_context(context);
        self.todo.push((context, conclusion));
    }
}

/// Recomputes the closure of a root sequentially.
#[derive(Debug, Clone, Copy)]
pub struct ContextCompletion<'a> {
    index: &'a OntologyIndex,
}

impl<'a> ContextCompletion<'a> {
    pub fn new(index: &'a OntologyIndex) -> Self {
        Self { index }
    }

    /// Saturates `root` and every context it reaches, returning the conclusions of `root`.
    pub fn saturate(&self, root: ClassId) -> ContextData {
        let mut writer = LocalWriter::new(self.index);
        writer.ensure_context(root);
        let mut produced = Vec::new();
        while let Some((context, conclusion)) = writer.todo.pop() {
            let data = writer.contexts.entry(context).or_default();
            if !data.insert(&conclusion) {
                continue;
            }
            rules::apply(
                self.index,
                context,
                data,
                &conclusion,
                RuleSet::NonRedundant,
                &mut produced,
            );
            for (target, conclusion) in produced.drain(..) {
                writer.produce(target, conclusion);
            }
        }
        writer.contexts.remove(&root).unwrap_or_default()
    }

    /// Roots of saturated contexts of `state` whose subsumers or satisfiability
    /// differ from a local recomputation.
    pub fn verify(&self, state: &SaturationState) -> Vec<ClassId> {
        let mismatches: Vec<_> = state
            .contexts()
            .into_iter()
            .filter(|context| context.is_saturated())
            .filter_map(|context| {
                let expected = self.saturate(context.root());
                let actual = context.read();
                (actual.subsumers() != expected.subsumers()
                    || actual.has_contradiction() != expected.has_contradiction())
                .then_some(context.root())
            })
            .collect();
        if !mismatches.is_empty() {
            tracing::warn!(
                mismatches = mismatches.len(),
                "saturated contexts differ from their local closure"
            );
        }
        mismatches
    }
}
