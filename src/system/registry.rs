use std::collections::BTreeSet;

use super::process::{ProcessRecord, cmp_by_cpu_descending, process_usage};
use super::source::DataSource;

/// Builds the ranked process table from the current set of live PIDs.
///
/// Records are rebuilt from raw counters on every refresh; nothing per
/// process survives between calls.
#[derive(Debug)]
pub struct ProcessRegistry {
    ticks_per_second: u64,
}

impl ProcessRegistry {
    pub fn new<S: DataSource + ?Sized>(source: &S) -> Self {
        Self {
            ticks_per_second: source.clock_ticks_per_second(),
        }
    }

    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    /// Returns records ranked by [`cmp_by_cpu_descending`], truncated to
    /// `limit` when one is given. PIDs that exit mid-refresh are skipped.
    pub fn refresh<S: DataSource + ?Sized>(
        &self,
        source: &S,
        live_pids: &BTreeSet<u32>,
        system_uptime_seconds: u64,
        limit: Option<usize>,
    ) -> Vec<ProcessRecord> {
        let _span = tracing::debug_span!("registry.refresh", pids = live_pids.len()).entered();

        let mut records: Vec<ProcessRecord> = live_pids
            .iter()
            .filter_map(|&pid| self.build_record(source, pid, system_uptime_seconds))
            .collect();

        records.sort_by(cmp_by_cpu_descending);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        records
    }

    fn build_record<S: DataSource + ?Sized>(
        &self,
        source: &S,
        pid: u32,
        system_uptime_seconds: u64,
    ) -> Option<ProcessRecord> {
        let Some(counters) = source.process_counters(pid) else {
            tracing::trace!(pid, "process exited before its counters were read");
            return None;
        };
        let Some(identity) = source.process_identity(pid) else {
            tracing::trace!(pid, "process exited before its status was read");
            return None;
        };

        let usage = process_usage(
            counters.active_ticks,
            counters.start_ticks,
            self.ticks_per_second,
            system_uptime_seconds,
        );

        Some(ProcessRecord {
            pid,
            command: identity.command,
            user: identity.user,
            ram_kilobytes: identity.ram_kilobytes,
            uptime_seconds: usage.age_seconds as i64,
            cpu_utilization_percent: usage.cpu_percent,
        })
    }
}
