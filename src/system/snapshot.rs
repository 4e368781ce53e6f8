use serde::Serialize;

use super::process::ProcessRecord;

/// One refresh worth of host metrics. Rebuilt whole on every tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub kernel: String,
    pub os_name: String,
    pub uptime_seconds: u64,
    pub memory_utilization: f32,
    pub cpu_utilization: f32,
    pub core_utilization: Vec<f32>,
    pub total_processes: u32,
    pub running_processes: u32,
    pub processes: Vec<ProcessRecord>,
}
