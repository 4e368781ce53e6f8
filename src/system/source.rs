use std::collections::{BTreeSet, HashMap};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use serde::Serialize;

/// Kernel release and distribution name, read once per collector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SystemIdentity {
    pub kernel: String,
    pub os_name: String,
}

/// Memory counters in kilobytes, as reported by the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub reclaimable: u64,
    pub shared: u64,
}

/// Cumulative CPU ticks since boot for one CPU line of the kernel's stat table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuCounters {
    /// Busy ticks. The kernel already folds guest time into user/nice, so it
    /// is taken back out here.
    pub fn active(&self) -> u64 {
        [
            self.user.saturating_sub(self.guest),
            self.nice.saturating_sub(self.guest_nice),
            self.system,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }

    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessCounts {
    pub total: u32,
    pub running: u32,
}

/// Aggregate and per-core CPU counters plus process counts taken from one
/// read of the kernel statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KernelSample {
    pub cpu: CpuCounters,
    pub cores: Vec<CpuCounters>,
    pub counts: ProcessCounts,
}

/// Raw per-process tick counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessCounters {
    /// utime + stime
    pub active_ticks: u64,
    /// Ticks since boot at which the process started.
    pub start_ticks: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub command: String,
    pub user: String,
    pub ram_kilobytes: u64,
}

/// Everything the metrics core needs from the host.
///
/// System-wide reads return `Err` when the backing resource is unreadable;
/// per-process reads return `None` when the process is gone.
pub trait DataSource {
    fn system_identity(&self) -> Result<SystemIdentity>;
    fn uptime_seconds(&self) -> Result<u64>;
    fn memory_counters(&self) -> Result<MemoryCounters>;
    fn cpu_counters(&self) -> Result<CpuCounters>;
    fn core_counters(&self) -> Result<Vec<CpuCounters>>;
    fn process_counts(&self) -> Result<ProcessCounts>;

    /// CPU counters and process counts from a single sample. Sources backed by
    /// one file should override this so the figures are consistent.
    fn kernel_sample(&self) -> Result<KernelSample> {
        Ok(KernelSample {
            cpu: self.cpu_counters()?,
            cores: self.core_counters()?,
            counts: self.process_counts()?,
        })
    }

    fn process_counters(&self, pid: u32) -> Option<ProcessCounters>;
    fn process_identity(&self, pid: u32) -> Option<ProcessIdentity>;
    fn live_pids(&self) -> Result<BTreeSet<u32>>;
    fn clock_ticks_per_second(&self) -> u64;
}

#[derive(Clone, Debug)]
pub struct FakeProcess {
    pub identity: ProcessIdentity,
    pub counters: ProcessCounters,
}

/// Deterministic in-memory host used by tests and benches.
///
/// `None` fields model unreadable system files. PIDs in `vanished` are
/// reported by `live_pids` but fail every per-process read.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    pub identity: Option<SystemIdentity>,
    pub uptime_seconds: Option<u64>,
    pub memory: Option<MemoryCounters>,
    pub cpu: Option<CpuCounters>,
    pub cores: Vec<CpuCounters>,
    pub counts: Option<ProcessCounts>,
    pub processes: HashMap<u32, FakeProcess>,
    pub vanished: BTreeSet<u32>,
    pub ticks_per_second: u64,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self {
            identity: Some(SystemIdentity {
                kernel: "6.1.0-test".to_string(),
                os_name: "Test Linux 1.0".to_string(),
            }),
            uptime_seconds: Some(0),
            memory: Some(MemoryCounters::default()),
            cpu: Some(CpuCounters::default()),
            cores: Vec::new(),
            counts: Some(ProcessCounts::default()),
            processes: HashMap::new(),
            vanished: BTreeSet::new(),
            ticks_per_second: 100,
        }
    }
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_process(
        &mut self,
        pid: u32,
        command: &str,
        user: &str,
        ram_kilobytes: u64,
        counters: ProcessCounters,
    ) {
        self.processes.insert(
            pid,
            FakeProcess {
                identity: ProcessIdentity {
                    command: command.to_string(),
                    user: user.to_string(),
                    ram_kilobytes,
                },
                counters,
            },
        );
    }

    /// Keep `pid` in the live list but make its per-process reads fail.
    pub fn vanish(&mut self, pid: u32) {
        self.processes.remove(&pid);
        self.vanished.insert(pid);
    }

    /// Set the aggregate counters from an `(active, idle)` pair.
    pub fn set_cpu(&mut self, active: u64, idle: u64) {
        self.cpu = Some(CpuCounters {
            user: active,
            idle,
            ..CpuCounters::default()
        });
    }
}

fn unreadable(what: &str) -> color_eyre::Report {
    eyre!("{what} is unreadable")
}

impl DataSource for InMemorySource {
    fn system_identity(&self) -> Result<SystemIdentity> {
        self.identity.clone().ok_or_else(|| unreadable("identity"))
    }

    fn uptime_seconds(&self) -> Result<u64> {
        self.uptime_seconds.ok_or_else(|| unreadable("uptime"))
    }

    fn memory_counters(&self) -> Result<MemoryCounters> {
        self.memory.ok_or_else(|| unreadable("meminfo"))
    }

    fn cpu_counters(&self) -> Result<CpuCounters> {
        self.cpu.ok_or_else(|| unreadable("aggregate cpu line"))
    }

    fn core_counters(&self) -> Result<Vec<CpuCounters>> {
        Ok(self.cores.clone())
    }

    fn process_counts(&self) -> Result<ProcessCounts> {
        self.counts.ok_or_else(|| unreadable("process counts"))
    }

    fn process_counters(&self, pid: u32) -> Option<ProcessCounters> {
        self.processes.get(&pid).map(|p| p.counters)
    }

    fn process_identity(&self, pid: u32) -> Option<ProcessIdentity> {
        self.processes.get(&pid).map(|p| p.identity.clone())
    }

    fn live_pids(&self) -> Result<BTreeSet<u32>> {
        let mut pids: BTreeSet<u32> = self.processes.keys().copied().collect();
        pids.extend(self.vanished.iter().copied());
        Ok(pids)
    }

    fn clock_ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }
}
