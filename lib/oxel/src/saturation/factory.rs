//! Concurrent saturation of submitted root class expressions.
//!
//! Workers take submitted jobs, create the context of their root and drain all
//! active contexts. Nothing tells a worker that the contexts it produced into are
//! complete: other workers may still be processing them. Completion is detected
//! with monotone counters instead:
//!
//! * every unit of work increments `started_workers` before and
//!   `finished_workers` after processing;
//! * a worker that stops because of an interruption records the number of started
//!   workers in `last_interrupt`;
//! * when a worker finishes and no other worker is in flight, and some worker
//!   started after the last interruption, everything that was created or
//!   submitted before has been fully processed. The counts of contexts and jobs
//!   taken before the check become lower bounds of the processed ones.
//!
//! Jobs are reported through a channel once the processed jobs counter passes
//! them, in submission order of the in-progress queue and not in completion order.
//! New jobs are only started while the number of contexts not yet known to be
//! saturated stays under a threshold.

use crate::error::Interrupted;
use crate::indexing::ClassId;
use crate::interrupt::InterruptMonitor;
use crate::saturation::context::Context;
use crate::saturation::engine::{ApplicationMode, RuleApplication};
use crate::saturation::state::SaturationState;
use std::collections::VecDeque;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

/// Maximal time a worker blocks on the threshold before checking again.
///
/// Contexts are marked saturated by the last worker in flight, which then wakes
/// the workers counted as waiting. Counts changed outside of this factory, such
/// as by another factory on the same state, wake nobody.
const CAPACITY_WAIT: Duration = Duration::from_millis(50);

/// A request to saturate the context of `root`.
#[derive(Debug, Clone)]
pub struct SaturationJob {
    root: ClassId,
    output: Option<Arc<Context>>,
}

impl SaturationJob {
    pub fn new(root: ClassId) -> Self {
        Self { root, output: None }
    }

    #[inline]
    pub fn root(&self) -> ClassId {
        self.root
    }

    /// The saturated context, set once the job is reported finished.
    pub fn output(&self) -> Option<&Arc<Context>> {
        self.output.as_ref()
    }
}

/// Saturates the contexts of submitted jobs with a pool of workers.
#[derive(Debug)]
pub struct ClassExpressionSaturationFactory<'a> {
    state: &'a SaturationState,
    max_workers: usize,
    /// Maximal number of contexts not known to be saturated when starting a job
    threshold: usize,
    jobs_todo: Mutex<VecDeque<SaturationJob>>,
    jobs_in_progress: Mutex<VecDeque<SaturationJob>>,
    started_workers: AtomicUsize,
    finished_workers: AtomicUsize,
    /// Value of `started_workers` at the last interruption
    last_interrupt: AtomicUsize,
    /// Jobs moved to `jobs_in_progress`
    jobs_submitted: AtomicUsize,
    /// Lower bound of the processed jobs among the submitted ones
    jobs_processed: AtomicUsize,
    /// Jobs reported to the listener
    jobs_finished: AtomicUsize,
    /// Lower bound of the processed contexts among the created ones
    contexts_processed: AtomicUsize,
    workers_waiting: Mutex<usize>,
    capacity: Condvar,
    listener: Sender<SaturationJob>,
}

impl<'a> ClassExpressionSaturationFactory<'a> {
    /// Creates a factory and the channel its finished jobs are sent to.
    pub fn new(state: &'a SaturationState, max_workers: usize) -> (Self, Receiver<SaturationJob>) {
        let max_workers = max_workers.max(1);
        let (listener, finished) = channel();
        let factory = Self {
            state,
            max_workers,
            threshold: 64 + 32 * max_workers,
            jobs_todo: Mutex::default(),
            jobs_in_progress: Mutex::default(),
            started_workers: AtomicUsize::new(0),
            finished_workers: AtomicUsize::new(0),
            last_interrupt: AtomicUsize::new(0),
            jobs_submitted: AtomicUsize::new(0),
            jobs_processed: AtomicUsize::new(0),
            jobs_finished: AtomicUsize::new(0),
            contexts_processed: AtomicUsize::new(0),
            workers_waiting: Mutex::new(0),
            capacity: Condvar::new(),
            listener,
        };
        (factory, finished)
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Queues a job. It is processed by the next call to [`process`](Self::process).
    pub fn submit(&self, job: SaturationJob) {
        self.state.statistics().record_job_submitted();
        lock(&self.jobs_todo).push_back(job);
    }

    /// Runs `max_workers` workers until all submitted jobs are finished.
    ///
    /// Returns [`Interrupted`] if some worker was interrupted; calling it again
    /// resumes the computation.
    pub fn wait_completion(&self, monitor: &dyn InterruptMonitor) -> Result<(), Interrupted> {
        if self.max_workers == 1 {
            return self.process(monitor);
        }
        let results: Vec<_> = thread::scope(|s| {
            let workers: Vec<_> = (0..self.max_workers)
                .map(|_| s.spawn(|| self.process(monitor)))
                .collect();
            workers
                .into_iter()
                .map(|w| w.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });
        results.into_iter().collect()
    }

    /// The work of one worker: processes jobs until none is left.
    pub fn process(&self, monitor: &dyn InterruptMonitor) -> Result<(), Interrupted> {
        let application = RuleApplication::new(self.state, ApplicationMode::Saturation);
        // Contexts left active by interrupted workers
        self.start_worker();
        let result = application.process(monitor);
        self.finish_worker(result.is_err());
        result?;
        loop {
            if monitor.is_interrupted() {
                return Err(Interrupted);
            }
            self.wait_for_capacity(monitor)?;
            let Some(job) = lock(&self.jobs_todo).pop_front() else {
                return Ok(());
            };
            if let Some(context) = self.state.context(job.root).filter(|c| c.is_saturated()) {
                self.notify_finished(job, context);
                continue;
            }
            let root = job.root;
            self.start_worker();
            lock(&self.jobs_in_progress).push_back(job);
            self.jobs_submitted.fetch_add(1, Ordering::AcqRel);
            self.state.writer().ensure_context(root);
            let result = application.process(monitor);
            self.finish_worker(result.is_err());
            result?;
        }
    }

    fn start_worker(&self) {
        self.started_workers.fetch_add(1, Ordering::AcqRel);
    }

    fn finish_worker(&self, interrupted: bool) {
        if interrupted {
            let started = self.started_workers.load(Ordering::Acquire);
            self.last_interrupt.fetch_max(started, Ordering::AcqRel);
            tracing::trace!(started, "saturation worker interrupted");
            self.wake_waiting_workers();
        }
        let finished = self.finished_workers.fetch_add(1, Ordering::AcqRel) + 1;
        self.update_processed_counters(finished);
        self.process_finished_jobs();
    }

    /// Advances the processed counters if no worker is in flight.
    ///
    /// `finished` is the value of `finished_workers` right after the caller finished.
    fn update_processed_counters(&self, finished: usize) {
        if self.last_interrupt.load(Ordering::Acquire)
            >= self.started_workers.load(Ordering::Acquire)
        {
            // No worker started since the last interruption
            return;
        }
        let contexts = self.state.contexts_created();
        let jobs = self.jobs_submitted.load(Ordering::Acquire);
        if self.started_workers.load(Ordering::Acquire) > finished {
            return;
        }
        let mut updated = false;
        if self.contexts_processed.fetch_max(contexts, Ordering::AcqRel) < contexts {
            self.state.set_contexts_saturated(contexts);
            updated = true;
        }
        if self.jobs_processed.fetch_max(jobs, Ordering::AcqRel) < jobs {
            updated = true;
        }
        if updated {
            self.wake_waiting_workers();
        }
    }

    /// Reports the jobs counted as processed.
    fn process_finished_jobs(&self) {
        loop {
            let finished = self.jobs_finished.load(Ordering::Acquire);
            if finished >= self.jobs_processed.load(Ordering::Acquire) {
                return;
            }
            if self
                .jobs_finished
                .compare_exchange(finished, finished + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }
            let Some(job) = lock(&self.jobs_in_progress).pop_front() else {
                tracing::error!("a processed job is missing from the jobs in progress");
                return;
            };
            match self.state.context(job.root) {
                Some(context) => {
                    if !context.is_saturated() {
                        tracing::error!(
                            root = %self.state.index().display(job.root),
                            "finished job with a context that is not saturated"
                        );
                    }
                    self.notify_finished(job, context);
                }
                None => tracing::error!(
                    root = %self.state.index().display(job.root),
                    "finished job without a context"
                ),
            }
        }
    }

    fn notify_finished(&self, mut job: SaturationJob, context: Arc<Context>) {
        job.output = Some(context);
        self.state.statistics().record_job_finished();
        if self.listener.send(job).is_err() {
            tracing::debug!("nobody is listening to finished saturation jobs");
        }
    }

    /// Blocks while too many contexts are not known to be saturated.
    fn wait_for_capacity(&self, monitor: &dyn InterruptMonitor) -> Result<(), Interrupted> {
        let mut waiting = lock(&self.workers_waiting);
        loop {
            if monitor.is_interrupted() {
                return Err(Interrupted);
            }
            if self.has_capacity() {
                return Ok(());
            }
            *waiting += 1;
            waiting = self
                .capacity
                .wait_timeout(waiting, CAPACITY_WAIT)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
            *waiting -= 1;
        }
    }

    fn has_capacity(&self) -> bool {
        let created = self.state.contexts_created();
        created.saturating_sub(self.state.contexts_saturated()) <= self.threshold
    }

    fn wake_waiting_workers(&self) {
        let waiting = lock(&self.workers_waiting);
        if *waiting > 0 {
            self.capacity.notify_all();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::entity::OwlClass;
    use crate::indexing::OntologyIndex;
    use crate::interrupt::{Interrupter, NeverInterrupted};
    use crate::ontology::Ontology;

    fn class(i: usize) -> OwlClass {
        OwlClass::from_iri(format!("http://example.com/C{i}")).unwrap()
    }

    fn chain(length: usize) -> SaturationState {
        let ontology: Ontology = (0..length)
            .map(|i| Axiom::subclass_of(class(i), class(i + 1)))
            .collect();
        SaturationState::new(Arc::new(OntologyIndex::new(&ontology).unwrap()))
    }

    #[test]
    fn every_job_is_reported_once() {
        let state = chain(20);
        let (factory, finished) = ClassExpressionSaturationFactory::new(&state, 4);
        let roots: Vec<_> = (0..=20)
            .map(|i| state.index().class_id(&class(i)).unwrap())
            .collect();
        for root in &roots {
            factory.submit(SaturationJob::new(*root));
        }
        factory.submit(SaturationJob::new(roots[0]));
        factory.wait_completion(&NeverInterrupted).unwrap();
        let jobs: Vec<_> = finished.try_iter().collect();
        assert_eq!(jobs.len(), roots.len() + 1);
        for job in &jobs {
            let context = job.output().unwrap();
            assert!(context.is_saturated());
            assert_eq!(context.root(), job.root());
        }
        let first = state.context(roots[0]).unwrap();
        assert_eq!(first.subsumers().len(), 21);
    }

    #[test]
    fn interrupted_jobs_resume() {
        let state = chain(5);
        let (factory, finished) = ClassExpressionSaturationFactory::new(&state, 1);
        let root = state.index().class_id(&class(0)).unwrap();
        factory.submit(SaturationJob::new(root));
        let interrupter = Interrupter::new();
        interrupter.interrupt();
        assert_eq!(factory.wait_completion(&interrupter), Err(Interrupted));
        assert!(finished.try_recv().is_err());
        interrupter.clear_interrupt();
        factory.wait_completion(&interrupter).unwrap();
        let job = finished.try_recv().unwrap();
        assert_eq!(job.output().unwrap().subsumers().len(), 6);
    }

    #[test]
    fn saturated_roots_are_reported_immediately() {
        let state = chain(3);
        let root = state.index().class_id(&class(1)).unwrap();
        {
            let (factory, _) = ClassExpressionSaturationFactory::new(&state, 2);
            factory.submit(SaturationJob::new(root));
            factory.wait_completion(&NeverInterrupted).unwrap();
        }
        let created = state.contexts_created();
        let (factory, finished) = ClassExpressionSaturationFactory::new(&state, 2);
        factory.submit(SaturationJob::new(root));
        factory.wait_completion(&NeverInterrupted).unwrap();
        assert!(finished.try_recv().unwrap().output().unwrap().is_saturated());
        assert_eq!(state.contexts_created(), created);
    }
}
