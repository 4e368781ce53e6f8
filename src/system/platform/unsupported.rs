use std::collections::BTreeSet;

use color_eyre::Result;
use color_eyre::eyre::eyre;

use crate::system::source::{
    CpuCounters, DataSource, MemoryCounters, ProcessCounters, ProcessCounts, ProcessIdentity,
    SystemIdentity,
};

/// Placeholder for hosts without a `/proc` filesystem.
pub struct UnsupportedSource;

fn unsupported<T>() -> Result<T> {
    Err(eyre!(
        "sysmon reads the Linux /proc filesystem; {} is not supported",
        std::env::consts::OS
    ))
}

impl UnsupportedSource {
    pub fn new() -> Result<Self> {
        unsupported()
    }
}

impl DataSource for UnsupportedSource {
    fn system_identity(&self) -> Result<SystemIdentity> {
        unsupported()
    }

    fn uptime_seconds(&self) -> Result<u64> {
        unsupported()
    }

    fn memory_counters(&self) -> Result<MemoryCounters> {
        unsupported()
    }

    fn cpu_counters(&self) -> Result<CpuCounters> {
        unsupported()
    }

    fn core_counters(&self) -> Result<Vec<CpuCounters>> {
        unsupported()
    }

    fn process_counts(&self) -> Result<ProcessCounts> {
        unsupported()
    }

    fn process_counters(&self, _pid: u32) -> Option<ProcessCounters> {
        None
    }

    fn process_identity(&self, _pid: u32) -> Option<ProcessIdentity> {
        None
    }

    fn live_pids(&self) -> Result<BTreeSet<u32>> {
        unsupported()
    }

    fn clock_ticks_per_second(&self) -> u64 {
        0
    }
}
