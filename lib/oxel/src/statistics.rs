//! Saturation statistics.
//!
//! Counters are lock-free atomics updated by all workers; they are diagnostic
//! only and read with relaxed ordering.

use crate::saturation::ConclusionKind;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const KINDS: usize = ConclusionKind::ALL.len();

/// Counters collected while saturating.
#[derive(Debug, Default)]
pub struct SaturationStatistics {
    /// Conclusions handed to a writer, per kind
    produced: [AtomicU64; KINDS],
    /// Conclusions taken from a to-do queue, per kind
    processed: [AtomicU64; KINDS],
    /// Conclusions integrated for the first time, per kind
    used: [AtomicU64; KINDS],
    /// Conclusions removed by deletions
    deleted: AtomicU64,
    /// Rule applications, one per produced conclusion
    rules_applied: AtomicU64,
    contexts_created: AtomicU64,
    /// Times a context queue was drained
    contexts_processed: AtomicU64,
    jobs_submitted: AtomicU64,
    jobs_finished: AtomicU64,
}

impl SaturationStatistics {
    pub(crate) fn record_produced(&self, kind: ConclusionKind) {
        self.produced[kind as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processed(&self, kind: ConclusionKind, used: bool) {
        self.processed[kind as usize].fetch_add(1, Ordering::Relaxed);
        if used {
            self.used[kind as usize].fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rules_applied(&self, count: usize) {
        self.rules_applied
            .fetch_add(u64::try_from(count).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    pub(crate) fn record_context_created(&self) {
        self.contexts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_context_processed(&self) {
        self.contexts_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_job_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_job_finished(&self) {
        self.jobs_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current values of the counters.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let load = |counters: &[AtomicU64; KINDS]| counters.each_ref().map(|c| c.load(Ordering::Relaxed));
        StatisticsSnapshot {
            produced: load(&self.produced),
            processed: load(&self.processed),
            used: load(&self.used),
            deleted: self.deleted.load(Ordering::Relaxed),
            rules_applied: self.rules_applied.load(Ordering::Relaxed),
            contexts_created: self.contexts_created.load(Ordering::Relaxed),
            contexts_processed: self.contexts_processed.load(Ordering::Relaxed),
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_finished: self.jobs_finished.load(Ordering::Relaxed),
        }
    }

    /// Logs the counters at `info` level.
    pub fn print(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            contexts_created = snapshot.contexts_created,
            contexts_processed = snapshot.contexts_processed,
            jobs_submitted = snapshot.jobs_submitted,
            jobs_finished = snapshot.jobs_finished,
            rules_applied = snapshot.rules_applied,
            deleted = snapshot.deleted,
            "saturation statistics"
        );
        for kind in ConclusionKind::ALL {
            let i = kind as usize;
            if snapshot.produced[i] > 0 {
                tracing::info!(
                    produced = snapshot.produced[i],
                    processed = snapshot.processed[i],
                    used = snapshot.used[i],
                    "{}",
                    kind.name()
                );
            }
        }
    }
}

/// A copy of [`SaturationStatistics`] at some point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    produced: [u64; KINDS],
    processed: [u64; KINDS],
    used: [u64; KINDS],
    pub deleted: u64,
    pub rules_applied: u64,
    pub contexts_created: u64,
    pub contexts_processed: u64,
    pub jobs_submitted: u64,
    pub jobs_finished: u64,
}

impl StatisticsSnapshot {
    pub fn produced(&self, kind: ConclusionKind) -> u64 {
        self.produced[kind as usize]
    }

    pub fn processed(&self, kind: ConclusionKind) -> u64 {
        self.processed[kind as usize]
    }

    /// Conclusions of this kind that were new when integrated.
    pub fn used(&self, kind: ConclusionKind) -> u64 {
        self.used[kind as usize]
    }

    pub fn total_produced(&self) -> u64 {
        self.produced.iter().sum()
    }

    pub fn total_used(&self) -> u64 {
        self.used.iter().sum()
    }
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "contexts created: {}", self.contexts_created)?;
        writeln!(f, "contexts processed: {}", self.contexts_processed)?;
        writeln!(f, "jobs submitted: {}", self.jobs_submitted)?;
        writeln!(f, "jobs finished: {}", self.jobs_finished)?;
        writeln!(f, "rules applied: {}", self.rules_applied)?;
        if self.deleted > 0 {
            writeln!(f, "conclusions deleted: {}", self.deleted)?;
        }
        for kind in ConclusionKind::ALL {
            let i = kind as usize;
            if self.produced[i] > 0 {
                writeln!(
                    f,
                    "{}: produced {}, processed {}, used {}",
                    kind.name(),
                    self.produced[i],
                    self.processed[i],
                    self.used[i]
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_reported_per_kind() {
        let statistics = SaturationStatistics::default();
        statistics.record_produced(ConclusionKind::BackwardLink);
        statistics.record_produced(ConclusionKind::BackwardLink);
        statistics.record_processed(ConclusionKind::BackwardLink, true);
        statistics.record_processed(ConclusionKind::BackwardLink, false);
        statistics.record_context_created();

        let snapshot = statistics.snapshot();
        assert_eq!(snapshot.produced(ConclusionKind::BackwardLink), 2);
        assert_eq!(snapshot.processed(ConclusionKind::BackwardLink), 2);
        assert_eq!(snapshot.used(ConclusionKind::BackwardLink), 1);
        assert_eq!(snapshot.produced(ConclusionKind::ForwardLink), 0);
        assert_eq!(snapshot.total_produced(), 2);

        let text = snapshot.to_string();
        assert!(text.contains("contexts created: 1"));
        assert!(text.contains("backward links: produced 2, processed 2, used 1"));
        assert!(!text.contains("forward links"));
    }
}
