//! Counters exposed to external collaborators (§6 "Metrics surface"). Populated only from the
//! search thread — there is no concurrent writer to guard against (§5).

use std::time::Duration;
use std::time::Instant;

use log::info;

use crate::basic_types::HashMap;
use crate::variables::VariableId;

/// Read-only after `solve` returns; mutated in place by the search engine and state computer
/// while a solve is in progress.
#[derive(Debug, Clone, Default)]
pub struct SolverMetrics {
    pub(crate) branches_explored: u64,
    pub(crate) max_depth: usize,
    pub(crate) global_max_depth: usize,
    pub(crate) restart_count: u64,
    pub(crate) random_choice_count: u64,
    pub(crate) cache_hits: u64,
    pub(crate) skipped_propagations: u64,
    pub(crate) solutions_found: u64,
    pub(crate) early_failure_count: u64,
    pub(crate) constraint_checks: u64,
    pub(crate) filtering_rounds: u64,
    pub(crate) peak_memory_bytes: Option<u64>,
    pub(crate) value_selection_count: HashMap<(VariableId, i64), u64>,
    start: Option<Instant>,
    wall_clock: Duration,
}

impl SolverMetrics {
    pub(crate) fn start_clock(&mut self) {
        self.start = Some(Instant::now());
    }

    pub(crate) fn stop_clock(&mut self) {
        if let Some(start) = self.start.take() {
            self.wall_clock += start.elapsed();
        }
    }

    pub(crate) fn record_value_choice(&mut self, variable: VariableId, value: i64) {
        *self
            .value_selection_count
            .entry((variable, value))
            .or_insert(0) += 1;
    }

    /// Best-effort peak resident memory, sampled from `/proc/self/status` on Linux. `None` on
    /// platforms without that pseudo-file; never an error, since this is purely informational.
    pub(crate) fn sample_memory(&mut self) {
        if let Some(kib) = read_peak_rss_kib() {
            let bytes = kib * 1024;
            self.peak_memory_bytes =
                Some(self.peak_memory_bytes.map_or(bytes, |prev| prev.max(bytes)));
        }
    }

    pub fn wall_clock(&self) -> Duration {
        self.wall_clock
    }

    pub fn branches_explored(&self) -> u64 {
        self.branches_explored
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn global_max_depth(&self) -> usize {
        self.global_max_depth
    }

    pub fn restart_count(&self) -> u64 {
        self.restart_count
    }

    pub fn random_choice_count(&self) -> u64 {
        self.random_choice_count
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn skipped_propagations(&self) -> u64 {
        self.skipped_propagations
    }

    pub fn solutions_found(&self) -> u64 {
        self.solutions_found
    }

    pub fn early_failure_count(&self) -> u64 {
        self.early_failure_count
    }

    pub fn constraint_checks(&self) -> u64 {
        self.constraint_checks
    }

    pub fn filtering_rounds(&self) -> u64 {
        self.filtering_rounds
    }

    pub fn peak_memory_bytes(&self) -> Option<u64> {
        self.peak_memory_bytes
    }

    /// Emits every counter at `info` level, the way the teacher's solver logs a `log_statistics`
    /// call at the end of a run.
    pub fn log_statistics(&self) {
        info!("%% branches_explored={}", self.branches_explored);
        info!("%% max_depth={}", self.max_depth);
        info!("%% global_max_depth={}", self.global_max_depth);
        info!("%% restart_count={}", self.restart_count);
        info!("%% random_choice_count={}", self.random_choice_count);
        info!("%% cache_hits={}", self.cache_hits);
        info!("%% skipped_propagations={}", self.skipped_propagations);
        info!("%% solutions_found={}", self.solutions_found);
        info!("%% early_failure_count={}", self.early_failure_count);
        info!("%% constraint_checks={}", self.constraint_checks);
        info!("%% filtering_rounds={}", self.filtering_rounds);
        if let Some(bytes) = self.peak_memory_bytes {
            info!("%% peak_memory_bytes={bytes}");
        }
        info!("%% wall_clock={:?}", self.wall_clock);
    }
}

#[cfg(target_os = "linux")]
fn read_peak_rss_kib() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status.lines().find_map(|line| {
        line.strip_prefix("VmHWM:")
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|value| value.parse().ok())
    })
}

#[cfg(not(target_os = "linux"))]
fn read_peak_rss_kib() -> Option<u64> {
    None
}
