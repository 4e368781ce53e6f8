use std::cmp::Ordering;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command: String,
    pub user: String,
    pub ram_kilobytes: u64,
    pub uptime_seconds: i64,
    pub cpu_utilization_percent: f32,
}

/// Lifetime figures for one process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessUsage {
    pub run_seconds: f64,
    pub age_seconds: f64,
    pub cpu_percent: f32,
}

/// Average CPU usage of a process since it started.
///
/// Unlike the aggregate estimator this keeps no state: it is total CPU time
/// over total wall-clock lifetime. Age is clamped at zero, which covers a
/// process that started within the same second the uptime was sampled.
pub fn process_usage(
    active_ticks: u64,
    start_ticks: u64,
    ticks_per_second: u64,
    system_uptime_seconds: u64,
) -> ProcessUsage {
    let (run_seconds, start_seconds) = if ticks_per_second == 0 {
        (0.0, 0.0)
    } else {
        let hz = ticks_per_second as f64;
        (active_ticks as f64 / hz, start_ticks as f64 / hz)
    };

    let age_seconds = (system_uptime_seconds as f64 - start_seconds).max(0.0);
    let cpu_percent = if age_seconds > 0.0 {
        (100.0 * run_seconds / age_seconds) as f32
    } else {
        0.0
    };

    ProcessUsage {
        run_seconds,
        age_seconds,
        cpu_percent,
    }
}

/// Display order for the process table: highest CPU first, then lowest PID.
pub fn cmp_by_cpu_descending(a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
    b.cpu_utilization_percent
        .total_cmp(&a.cpu_utilization_percent)
        .then_with(|| a.pid.cmp(&b.pid))
}
