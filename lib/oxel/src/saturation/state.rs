//! The shared saturation state: all contexts and the queues feeding workers.

use crate::indexing::{ClassId, OntologyIndex};
use crate::saturation::conclusion::Conclusion;
use crate::saturation::context::Context;
use crate::saturation::rules::{self, ConclusionProducer};
use crate::statistics::SaturationStatistics;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Owns every [`Context`], keyed by the id of its root.
///
/// Contexts are created at most once per root. Every created context is also
/// queued as not saturated, in creation order, so that a count of contexts
/// known to be complete can mark them saturated with
/// [`set_contexts_saturated`](Self::set_contexts_saturated).
#[derive(Debug)]
pub struct SaturationState {
    index: Arc<OntologyIndex>,
    contexts: DashMap<ClassId, Arc<Context>, FxBuildHasher>,
    active_contexts: Mutex<VecDeque<Arc<Context>>>,
    not_saturated: Mutex<VecDeque<Arc<Context>>>,
    /// Contexts queued as not saturated, a context reset by a deletion counts again.
    contexts_created: AtomicUsize,
    contexts_saturated: AtomicUsize,
    modified_contexts: Mutex<Vec<Arc<Context>>>,
    statistics: SaturationStatistics,
}

impl SaturationState {
    pub fn new(index: Arc<OntologyIndex>) -> Self {
        Self {
            index,
            contexts: DashMap::with_hasher(FxBuildHasher),
            active_contexts: Mutex::default(),
            not_saturated: Mutex::default(),
            contexts_created: AtomicUsize::new(0),
            contexts_saturated: AtomicUsize::new(0),
            modified_contexts: Mutex::default(),
            statistics: SaturationStatistics::default(),
        }
    }

    #[inline]
    pub fn index(&self) -> &OntologyIndex {
        &self.index
    }

    /// Mutable access to the index, copied first if it is shared.
    ///
    /// Only additions that leave the rules of existing expressions unchanged keep
    /// the saturated contexts valid.
    pub(crate) fn index_mut(&mut self) -> &mut OntologyIndex {
        Arc::make_mut(&mut self.index)
    }

    pub fn statistics(&self) -> &SaturationStatistics {
        &self.statistics
    }

    pub fn context(&self, root: ClassId) -> Option<Arc<Context>> {
        self.contexts.get(&root).map(|c| Arc::clone(c.value()))
    }

    /// All contexts, ordered by root.
    pub fn contexts(&self) -> Vec<Arc<Context>> {
        let mut contexts: Vec<_> = self
            .contexts
            .iter()
            .map(|c| Arc::clone(c.value()))
            .collect();
        contexts.sort_unstable_by_key(|c| c.root());
        contexts
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Returns the context of `root`, creating it if needed.
    ///
    /// The boolean is `true` for the single caller that created the context.
    pub(crate) fn get_create_context(&self, root: ClassId) -> (Arc<Context>, bool) {
        let context = match self.contexts.entry(root) {
            Entry::Occupied(entry) => return (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let context = Arc::new(Context::new(root));
                entry.insert(Arc::clone(&context));
                context
            }
        };
        self.queue_not_saturated(Arc::clone(&context));
        self.statistics.record_context_created();
        (context, true)
    }

    fn queue_not_saturated(&self, context: Arc<Context>) {
        let mut not_saturated = lock(&self.not_saturated);
        not_saturated.push_back(context);
        self.contexts_created.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of contexts queued as not saturated so far.
    #[inline]
    pub fn contexts_created(&self) -> usize {
        self.contexts_created.load(Ordering::Acquire)
    }

    #[inline]
    pub fn contexts_saturated(&self) -> usize {
        self.contexts_saturated.load(Ordering::Acquire)
    }

    /// Marks saturated the first `count` contexts queued as not saturated.
    ///
    /// Returns the number of contexts marked by this call.
    pub(crate) fn set_contexts_saturated(&self, count: usize) -> usize {
        let mut not_saturated = lock(&self.not_saturated);
        let mut marked = 0;
        while self.contexts_saturated.load(Ordering::Acquire) < count {
            let Some(context) = not_saturated.pop_front() else {
                break;
            };
            context.set_saturated(true);
            self.contexts_saturated.fetch_add(1, Ordering::AcqRel);
            marked += 1;
        }
        marked
    }

    pub(crate) fn activate(&self, context: Arc<Context>) {
        lock(&self.active_contexts).push_back(context);
    }

    pub(crate) fn poll_active_context(&self) -> Option<Arc<Context>> {
        lock(&self.active_contexts).pop_front()
    }

    /// Records that a deletion removed a conclusion of `context`.
    pub(crate) fn record_modified(&self, context: &Arc<Context>) {
        if context.mark_modified() {
            lock(&self.modified_contexts).push(Arc::clone(context));
        }
    }

    /// Returns the contexts modified by deletions since the last call and
    /// queues them again as not saturated.
    pub(crate) fn take_modified_contexts(&self) -> Vec<Arc<Context>> {
        let modified = std::mem::take(&mut *lock(&self.modified_contexts));
        for context in &modified {
            context.clear_modified();
            if context.is_saturated() {
                context.set_saturated(false);
                self.queue_not_saturated(Arc::clone(context));
            }
        }
        modified
    }

    /// Writer creating and activating contexts for the produced conclusions.
    pub fn writer(&self) -> MainWriter<'_> {
        MainWriter { state: self }
    }

    /// Writer scheduling the deletion of produced conclusions in existing contexts.
    pub fn deletion_writer(&self) -> DeletionWriter<'_> {
        DeletionWriter { state: self }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writer of the forward saturation.
///
/// New contexts are created and initialized on demand.
#[derive(Debug, Clone, Copy)]
pub struct MainWriter<'a> {
    state: &'a SaturationState,
}

impl MainWriter<'_> {
    /// Makes sure the context of `root` exists, initializing it on creation.
    pub fn ensure_context(&self, root: ClassId) -> Arc<Context> {
        let (context, created) = self.state.get_create_context(root);
        if created {
            self.initialize(&context);
        }
        context
    }

    /// Queues the initial conclusions of a context.
    pub(crate) fn initialize(&self, context: &Arc<Context>) {
        let mut initial = Vec::new();
        rules::initialize(self.state.index(), context.root(), &mut initial);
        for (_, conclusion) in initial {
            self.add(context, conclusion);
        }
    }

    fn add(&self, context: &Arc<Context>, conclusion: Conclusion) {
        self.state.statistics.record_produced(conclusion.kind());
        if context.add_to_do(conclusion) {
            self.state.activate(Arc::clone(context));
        }
    }
}

impl ConclusionProducer for MainWriter<'_> {
    fn produce(&mut self, context: ClassId, conclusion: Conclusion) {
        let context = self.ensure_context(context);
        self.add(&context, conclusion);
    }
}

/// Writer of the deletion pass.
///
/// Conclusions for contexts that do not exist are dropped: nothing was derived there.
#[derive(Debug, Clone, Copy)]
pub struct DeletionWriter<'a> {
    state: &'a SaturationState,
}

impl ConclusionProducer for DeletionWriter<'_> {
    fn produce(&mut self, context: ClassId, conclusion: Conclusion) {
        let Some(context) = self.state.context(context) else {
            return;
        };
        self.state.statistics.record_produced(conclusion.kind());
        if context.add_to_delete(conclusion) {
            self.state.activate(context);
        }
    }
}
