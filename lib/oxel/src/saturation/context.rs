//! Per-root record of derived conclusions.

use crate::indexing::{ClassId, PropertyId};
use crate::saturation::conclusion::Conclusion;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Conclusions integrated into a context.
///
/// Each conclusion is stored once: composed and decomposed subsumers share the
/// same set, and inferences are not kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContextData {
    subsumers: FxHashSet<ClassId>,
    /// relation -> sources
    backward_links: FxHashMap<PropertyId, FxHashSet<ClassId>>,
    /// relation -> targets
    forward_links: FxHashMap<PropertyId, FxHashSet<ClassId>>,
    /// relation -> negative existentials
    propagations: FxHashMap<PropertyId, FxHashSet<ClassId>>,
    contradiction: bool,
}

impl ContextData {
    /// Whether the conclusion is already integrated.
    pub fn contains(&self, conclusion: &Conclusion) -> bool {
        match conclusion {
            Conclusion::ComposedSubsumer { subsumer, .. }
            | Conclusion::DecomposedSubsumer { subsumer, .. } => self.subsumers.contains(subsumer),
            Conclusion::BackwardLink {
                source, relation, ..
            } => contains_in(&self.backward_links, *relation, *source),
            Conclusion::ForwardLink {
                relation, target, ..
            } => contains_in(&self.forward_links, *relation, *target),
            Conclusion::Propagation {
                relation,
                existential,
                ..
            } => contains_in(&self.propagations, *relation, *existential),
            Conclusion::Contradiction { .. } | Conclusion::PropagatedContradiction { .. } => {
                self.contradiction
            }
        }
    }

    /// Integrates the conclusion, returning `false` if it was already there.
    pub(crate) fn insert(&mut self, conclusion: &Conclusion) -> bool {
        match conclusion {
            Conclusion::ComposedSubsumer { subsumer, .. }
            | Conclusion::DecomposedSubsumer { subsumer, .. } => self.subsumers.insert(*subsumer),
            Conclusion::BackwardLink {
                source, relation, ..
            } => self
                .backward_links
                .entry(*relation)
                .or_default()
                .insert(*source),
            Conclusion::ForwardLink {
                relation, target, ..
            } => self
                .forward_links
                .entry(*relation)
                .or_default()
                .insert(*target),
            Conclusion::Propagation {
                relation,
                existential,
                ..
            } => self
                .propagations
                .entry(*relation)
                .or_default()
                .insert(*existential),
            Conclusion::Contradiction { .. } | Conclusion::PropagatedContradiction { .. } => {
                !std::mem::replace(&mut self.contradiction, true)
            }
        }
    }

    /// Removes the conclusion, returning `false` if it was not there.
    pub(crate) fn remove(&mut self, conclusion: &Conclusion) -> bool {
        match conclusion {
            Conclusion::ComposedSubsumer { subsumer, .. }
            | Conclusion::DecomposedSubsumer { subsumer, .. } => self.subsumers.remove(subsumer),
            Conclusion::BackwardLink {
                source, relation, ..
            } => remove_from(&mut self.backward_links, *relation, *source),
            Conclusion::ForwardLink {
                relation, target, ..
            } => remove_from(&mut self.forward_links, *relation, *target),
            Conclusion::Propagation {
                relation,
                existential,
                ..
            } => remove_from(&mut self.propagations, *relation, *existential),
            Conclusion::Contradiction { .. } | Conclusion::PropagatedContradiction { .. } => {
                std::mem::replace(&mut self.contradiction, false)
            }
        }
    }

    pub fn subsumers(&self) -> &FxHashSet<ClassId> {
        &self.subsumers
    }

    #[inline]
    pub fn has_subsumer(&self, subsumer: ClassId) -> bool {
        self.subsumers.contains(&subsumer)
    }

    /// Whether the root is unsatisfiable.
    #[inline]
    pub fn has_contradiction(&self) -> bool {
        self.contradiction
    }

    /// Sources of the backward links over `relation`.
    pub fn backward_links(&self, relation: PropertyId) -> impl Iterator<Item = ClassId> + '_ {
        self.backward_links.get(&relation).into_iter().flatten().copied()
    }

    /// All backward links as `(relation, sources)`.
    pub fn backward_links_by_relation(
        &self,
    ) -> impl Iterator<Item = (PropertyId, &FxHashSet<ClassId>)> + '_ {
        self.backward_links.iter().map(|(r, s)| (*r, s))
    }

    /// All forward links as `(relation, targets)`.
    pub fn forward_links_by_relation(
        &self,
    ) -> impl Iterator<Item = (PropertyId, &FxHashSet<ClassId>)> + '_ {
        self.forward_links.iter().map(|(r, t)| (*r, t))
    }

    pub fn propagations(&self, relation: PropertyId) -> impl Iterator<Item = ClassId> + '_ {
        self.propagations.get(&relation).into_iter().flatten().copied()
    }

    pub fn backward_link_count(&self) -> usize {
        self.backward_links.values().map(FxHashSet::len).sum()
    }

    /// Every integrated conclusion, with [`Inference::Initialization`] as placeholder inference.
    ///
    /// [`Inference::Initialization`]: crate::saturation::Inference::Initialization
    pub(crate) fn conclusions(&self) -> Vec<Conclusion> {
        use crate::saturation::conclusion::Inference;
        let inference = Inference::Initialization;
        let mut conclusions: Vec<_> = self
            .subsumers
            .iter()
            .map(|subsumer| Conclusion::DecomposedSubsumer {
                subsumer: *subsumer,
                inference,
            })
            .collect();
        for (relation, sources) in &self.backward_links {
            conclusions.extend(sources.iter().map(|source| Conclusion::BackwardLink {
                source: *source,
                relation: *relation,
                inference,
            }));
        }
        for (relation, targets) in &self.forward_links {
            conclusions.extend(targets.iter().map(|target| Conclusion::ForwardLink {
                relation: *relation,
                target: *target,
                inference,
            }));
        }
        for (relation, existentials) in &self.propagations {
            conclusions.extend(existentials.iter().map(|existential| {
                Conclusion::Propagation {
                    relation: *relation,
                    existential: *existential,
                    inference,
                }
            }));
        }
        if self.contradiction {
            conclusions.push(Conclusion::Contradiction { inference });
        }
        conclusions
    }
}

fn contains_in(
    map: &FxHashMap<PropertyId, FxHashSet<ClassId>>,
    relation: PropertyId,
    value: ClassId,
) -> bool {
    map.get(&relation).is_some_and(|s| s.contains(&value))
}

fn remove_from(
    map: &mut FxHashMap<PropertyId, FxHashSet<ClassId>>,
    relation: PropertyId,
    value: ClassId,
) -> bool {
    let Some(values) = map.get_mut(&relation) else {
        return false;
    };
    let removed = values.remove(&value);
    if values.is_empty() {
        map.remove(&relation);
    }
    removed
}

/// The saturation of one root class expression.
///
/// A context is *active* while its to-do queue is non-empty or being processed.
/// Only the worker that activated it (or that polled it from the active queue)
/// processes the queue.
#[derive(Debug)]
pub struct Context {
    root: ClassId,
    data: RwLock<ContextData>,
    todo: Mutex<VecDeque<Conclusion>>,
    active: AtomicBool,
    saturated: AtomicBool,
    modified: AtomicBool,
}

impl Context {
    pub(crate) fn new(root: ClassId) -> Self {
        Self {
            root,
            data: RwLock::default(),
            todo: Mutex::default(),
            active: AtomicBool::new(false),
            saturated: AtomicBool::new(false),
            modified: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn root(&self) -> ClassId {
        self.root
    }

    /// Queues a conclusion unless it is already integrated.
    ///
    /// Returns `true` if this call activated the context: the caller must then
    /// hand it over for processing.
    pub(crate) fn add_to_do(&self, conclusion: Conclusion) -> bool {
        if self.read().contains(&conclusion) {
            return false;
        }
        self.push(conclusion)
    }

    /// Queues a conclusion for deletion if it is integrated.
    ///
    /// Returns `true` if this call activated the context.
    pub(crate) fn add_to_delete(&self, conclusion: Conclusion) -> bool {
        if !self.read().contains(&conclusion) {
            return false;
        }
        self.push(conclusion)
    }

    fn push(&self, conclusion: Conclusion) -> bool {
        self.lock_todo().push_back(conclusion);
        !self.active.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn take_to_do(&self) -> Option<Conclusion> {
        self.lock_todo().pop_front()
    }

    /// Marks the context inactive after its queue was drained.
    ///
    /// Returns `true` if conclusions arrived in the meantime and the caller
    /// reactivated the context, so it must keep processing it.
    pub(crate) fn deactivate(&self) -> bool {
        self.active.store(false, Ordering::Release);
        !self.lock_todo().is_empty() && !self.active.swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.saturated.load(Ordering::Acquire)
    }

    pub(crate) fn set_saturated(&self, saturated: bool) {
        self.saturated.store(saturated, Ordering::Release);
    }

    /// Flags the context as modified by a deletion, returning `true` the first time.
    pub(crate) fn mark_modified(&self) -> bool {
        !self.modified.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn clear_modified(&self) {
        self.modified.store(false, Ordering::Release);
    }

    /// Read access to the integrated conclusions.
    pub fn read(&self) -> RwLockReadGuard<'_, ContextData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ContextData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_todo(&self) -> MutexGuard<'_, VecDeque<Conclusion>> {
        self.todo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the subsumers of the root.
    pub fn subsumers(&self) -> Vec<ClassId> {
        let mut subsumers: Vec<_> = self.read().subsumers().iter().copied().collect();
        subsumers.sort_unstable();
        subsumers
    }

    pub fn has_subsumer(&self, subsumer: ClassId) -> bool {
        self.read().has_subsumer(subsumer)
    }

    pub fn is_inconsistent(&self) -> bool {
        self.read().has_contradiction()
    }
}
