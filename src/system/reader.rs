//! Typed reads of system-wide counters.
//!
//! Every function here is stateless. An unreadable or malformed source
//! yields the default value and a warning, so one bad file never fails a
//! whole refresh.

use std::collections::BTreeSet;
use std::fmt::Display;

use super::source::{
    CpuCounters, DataSource, KernelSample, MemoryCounters, ProcessCounts, SystemIdentity,
};

fn or_default<T: Default, E: Display>(what: &str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(source = what, error = %err, "substituting default value");
        T::default()
    })
}

pub fn read_identity<S: DataSource + ?Sized>(source: &S) -> SystemIdentity {
    or_default("identity", source.system_identity())
}

pub fn read_uptime<S: DataSource + ?Sized>(source: &S) -> u64 {
    or_default("uptime", source.uptime_seconds())
}

pub fn read_memory_utilization<S: DataSource + ?Sized>(source: &S) -> f32 {
    memory_utilization(&or_default("meminfo", source.memory_counters()))
}

pub fn read_cpu_counters<S: DataSource + ?Sized>(source: &S) -> CpuCounters {
    or_default("cpu", source.cpu_counters())
}

pub fn read_core_counters<S: DataSource + ?Sized>(source: &S) -> Vec<CpuCounters> {
    or_default("cpu cores", source.core_counters())
}

pub fn read_process_counts<S: DataSource + ?Sized>(source: &S) -> ProcessCounts {
    or_default("process counts", source.process_counts())
}

/// One combined sample; if it fails, each part is read on its own so a
/// single missing field does not blank the others.
pub fn read_kernel_sample<S: DataSource + ?Sized>(source: &S) -> KernelSample {
    match source.kernel_sample() {
        Ok(sample) => sample,
        Err(err) => {
            tracing::warn!(error = %err, "kernel sample unreadable, reading fields separately");
            KernelSample {
                cpu: read_cpu_counters(source),
                cores: read_core_counters(source),
                counts: read_process_counts(source),
            }
        }
    }
}

pub fn read_live_pids<S: DataSource + ?Sized>(source: &S) -> BTreeSet<u32> {
    or_default("pid list", source.live_pids())
}

/// Fraction of memory in use, excluding buffers and reclaimable cache.
///
/// Cache counts `cached + reclaimable - shared`; the result is clamped to
/// `[0, 1]` and is 0 when the total is unknown.
pub fn memory_utilization(mem: &MemoryCounters) -> f32 {
    if mem.total == 0 {
        return 0.0;
    }
    let total = mem.total as f64;
    let cache = mem.cached as f64 + mem.reclaimable as f64 - mem.shared as f64;
    let used = total - mem.free as f64 - mem.buffers as f64 - cache;
    (used / total).clamp(0.0, 1.0) as f32
}
