//! Plain-text rendering of a snapshot for `--once`.

use std::fmt::Write;

use crate::format::{elapsed_time, format_percent, format_ram_mb};
use crate::system::snapshot::SystemSnapshot;

pub fn render_report(snapshot: &SystemSnapshot) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, snapshot);
    out
}

fn write_report(out: &mut String, snapshot: &SystemSnapshot) -> std::fmt::Result {
    writeln!(out, "OS:        {}", snapshot.os_name)?;
    writeln!(out, "Kernel:    {}", snapshot.kernel)?;
    writeln!(out, "Uptime:    {}", elapsed_time(snapshot.uptime_seconds as i64))?;
    writeln!(out, "CPU:       {}", format_percent(snapshot.cpu_utilization))?;
    if !snapshot.core_utilization.is_empty() {
        let cores: Vec<String> = snapshot
            .core_utilization
            .iter()
            .enumerate()
            .map(|(i, usage)| format!("{i}: {}", format_percent(*usage)))
            .collect();
        writeln!(out, "Cores:     {}", cores.join("  "))?;
    }
    writeln!(out, "Memory:    {}", format_percent(snapshot.memory_utilization))?;
    writeln!(
        out,
        "Processes: {} total, {} running",
        snapshot.total_processes, snapshot.running_processes
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>7} {:<10} {:>6} {:>8} {:>10}  COMMAND",
        "PID", "USER", "CPU%", "RAM[MB]", "TIME+"
    )?;
    for p in &snapshot.processes {
        writeln!(
            out,
            "{:>7} {:<10} {:>6.1} {:>8} {:>10}  {}",
            p.pid,
            p.user,
            p.cpu_utilization_percent,
            format_ram_mb(p.ram_kilobytes),
            elapsed_time(p.uptime_seconds),
            p.command
        )?;
    }
    Ok(())
}
