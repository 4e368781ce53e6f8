use std::collections::{BTreeSet, HashMap};

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use procfs::process::Process;
use procfs::{Current, CurrentSI, KernelStats, Meminfo, ProcError};
use sysinfo::Users;

use crate::system::source::{
    CpuCounters, DataSource, KernelSample, MemoryCounters, ProcessCounters, ProcessCounts,
    ProcessIdentity, SystemIdentity,
};

const OS_RELEASE_PATH: &str = "/etc/os-release";
const UPTIME_PATH: &str = "/proc/uptime";
const VERSION_PATH: &str = "/proc/version";

/// Reads the live kernel state through `/proc`.
pub struct ProcfsSource {
    users: HashMap<u32, String>,
    ticks_per_second: u64,
}

impl ProcfsSource {
    pub fn new() -> Result<Self> {
        if !std::path::Path::new("/proc/self").exists() {
            return Err(eyre!("/proc is not mounted"));
        }
        // User names are resolved once; accounts rarely change during a session.
        let users = Users::new_with_refreshed_list()
            .list()
            .iter()
            .map(|user| (**user.id(), user.name().to_string()))
            .collect();
        Ok(Self {
            users,
            ticks_per_second: procfs::ticks_per_second(),
        })
    }

    fn user_name(&self, uid: u32) -> String {
        self.users
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| uid.to_string())
    }
}

fn cpu_counters(cpu: &procfs::CpuTime) -> CpuCounters {
    CpuCounters {
        user: cpu.user,
        nice: cpu.nice,
        system: cpu.system,
        idle: cpu.idle,
        iowait: cpu.iowait.unwrap_or(0),
        irq: cpu.irq.unwrap_or(0),
        softirq: cpu.softirq.unwrap_or(0),
        steal: cpu.steal.unwrap_or(0),
        guest: cpu.guest.unwrap_or(0),
        guest_nice: cpu.guest_nice.unwrap_or(0),
    }
}

/// `PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"` -> `Debian GNU/Linux 12 (bookworm)`
fn parse_pretty_name(os_release: &str) -> Option<String> {
    os_release.lines().find_map(|line| {
        let value = line.strip_prefix("PRETTY_NAME=")?;
        Some(value.trim().trim_matches('"').to_string())
    })
}

/// First field of `/proc/uptime`, whole seconds.
fn parse_uptime(contents: &str) -> Option<u64> {
    let secs: f64 = contents.split_whitespace().next()?.parse().ok()?;
    Some(secs as u64)
}

/// `Linux version 6.1.0-18-amd64 (...)` -> `6.1.0-18-amd64`
fn parse_kernel_release(version: &str) -> Option<String> {
    version.split_whitespace().nth(2).map(str::to_string)
}

fn is_vanished(err: &ProcError) -> bool {
    matches!(err, ProcError::NotFound(_))
}

fn trace_process_error(pid: u32, err: &ProcError) {
    if !is_vanished(err) {
        tracing::debug!(pid, error = %err, "could not read process");
    }
}

impl DataSource for ProcfsSource {
    fn system_identity(&self) -> Result<SystemIdentity> {
        let kernel = match sysinfo::System::kernel_version() {
            Some(kernel) => kernel,
            None => {
                let version = std::fs::read_to_string(VERSION_PATH)
                    .wrap_err_with(|| format!("reading {VERSION_PATH}"))?;
                parse_kernel_release(&version)
                    .ok_or_else(|| eyre!("unexpected {VERSION_PATH} format"))?
            }
        };
        let os_name = std::fs::read_to_string(OS_RELEASE_PATH)
            .ok()
            .and_then(|contents| parse_pretty_name(&contents))
            .or_else(sysinfo::System::long_os_version)
            .unwrap_or_default();
        Ok(SystemIdentity { kernel, os_name })
    }

    fn uptime_seconds(&self) -> Result<u64> {
        let contents = std::fs::read_to_string(UPTIME_PATH)
            .wrap_err_with(|| format!("reading {UPTIME_PATH}"))?;
        parse_uptime(&contents).ok_or_else(|| eyre!("unexpected {UPTIME_PATH} format"))
    }

    fn memory_counters(&self) -> Result<MemoryCounters> {
        // procfs reports meminfo in bytes.
        let meminfo = Meminfo::current().wrap_err("reading /proc/meminfo")?;
        Ok(MemoryCounters {
            total: meminfo.mem_total / 1024,
            free: meminfo.mem_free / 1024,
            buffers: meminfo.buffers / 1024,
            cached: meminfo.cached / 1024,
            reclaimable: meminfo.s_reclaimable.unwrap_or(0) / 1024,
            shared: meminfo.shmem.unwrap_or(0) / 1024,
        })
    }

    fn cpu_counters(&self) -> Result<CpuCounters> {
        Ok(self.kernel_sample()?.cpu)
    }

    fn core_counters(&self) -> Result<Vec<CpuCounters>> {
        Ok(self.kernel_sample()?.cores)
    }

    fn process_counts(&self) -> Result<ProcessCounts> {
        Ok(self.kernel_sample()?.counts)
    }

    fn kernel_sample(&self) -> Result<KernelSample> {
        let stats = KernelStats::current().wrap_err("reading /proc/stat")?;
        Ok(KernelSample {
            cpu: cpu_counters(&stats.total),
            cores: stats.cpu_time.iter().map(cpu_counters).collect(),
            counts: ProcessCounts {
                total: u32::try_from(stats.processes).unwrap_or(u32::MAX),
                running: stats.procs_running.unwrap_or(0),
            },
        })
    }

    fn process_counters(&self, pid: u32) -> Option<ProcessCounters> {
        let stat = Process::new(pid as i32)
            .and_then(|process| process.stat())
            .inspect_err(|err| trace_process_error(pid, err))
            .ok()?;
        Some(ProcessCounters {
            active_ticks: stat.utime + stat.stime,
            start_ticks: stat.starttime,
        })
    }

    fn process_identity(&self, pid: u32) -> Option<ProcessIdentity> {
        let process = Process::new(pid as i32)
            .inspect_err(|err| trace_process_error(pid, err))
            .ok()?;
        let status = process
            .status()
            .inspect_err(|err| trace_process_error(pid, err))
            .ok()?;

        let args = process.cmdline().unwrap_or_default();
        let command = if args.is_empty() {
            // Kernel threads have no command line.
            format!("[{}]", status.name)
        } else {
            args.join(" ")
        };

        Some(ProcessIdentity {
            command,
            user: self.user_name(status.ruid),
            ram_kilobytes: status.vmsize.unwrap_or(0),
        })
    }

    fn live_pids(&self) -> Result<BTreeSet<u32>> {
        let processes = procfs::process::all_processes().wrap_err("listing /proc")?;
        Ok(processes
            .filter_map(|process| process.ok())
            .filter_map(|process| u32::try_from(process.pid).ok())
            .collect())
    }

    fn clock_ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }
}
