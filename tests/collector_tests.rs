use sysmon::system::collector::Collector;
use sysmon::system::source::{InMemorySource, MemoryCounters, ProcessCounters};

fn ticks(active_ticks: u64, start_ticks: u64) -> ProcessCounters {
    ProcessCounters {
        active_ticks,
        start_ticks,
    }
}

#[test]
fn tick_driven_refreshes_keep_estimator_state() {
    let mut source = InMemorySource::new();
    source.set_cpu(100, 900);
    let mut collector = Collector::new(source);

    // First tick never reports the since-boot average.
    assert_eq!(collector.refresh().cpu_utilization, 0.0);

    collector.source_mut().set_cpu(150, 950);
    let second = collector.refresh().cpu_utilization;
    assert!((second - 0.5).abs() < f32::EPSILON);

    // Stall: nothing moved since the previous tick.
    assert_eq!(collector.refresh().cpu_utilization, 0.0);

    collector.source_mut().set_cpu(240, 960);
    let fourth = collector.refresh().cpu_utilization;
    assert!((fourth - 0.9).abs() < 1e-6);
}

#[test]
fn records_are_rebuilt_each_tick() {
    let mut source = InMemorySource::new();
    source.uptime_seconds = Some(10);
    source.add_process(1, "init", "root", 100, ticks(100, 0));
    source.add_process(2, "worker", "alice", 200, ticks(500, 0));
    let mut collector = Collector::new(source);

    let first = collector.refresh();
    let order: Vec<u32> = first.processes.iter().map(|p| p.pid).collect();
    assert_eq!(order, vec![2, 1]);

    // Worker exits, init gets busier, a new process appears.
    let source = collector.source_mut();
    source.uptime_seconds = Some(20);
    source.processes.remove(&2);
    source.add_process(1, "init", "root", 100, ticks(1_000, 0));
    source.add_process(3, "fresh", "bob", 50, ticks(10, 1_900));

    let second = collector.refresh();
    let order: Vec<u32> = second.processes.iter().map(|p| p.pid).collect();
    assert_eq!(order, vec![1, 3]);
    assert!((second.processes[0].cpu_utilization_percent - 50.0).abs() < 1e-4);
    assert_eq!(second.processes[1].uptime_seconds, 1);
    assert!((second.processes[1].cpu_utilization_percent - 10.0).abs() < 1e-4);
}

#[test]
fn vanished_process_is_excluded_without_error() {
    let mut source = InMemorySource::new();
    source.uptime_seconds = Some(100);
    source.add_process(10, "stays", "root", 1, ticks(10, 0));
    source.add_process(11, "leaves", "root", 1, ticks(10, 0));
    source.vanish(11);

    let snapshot = Collector::new(source).refresh();
    let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![10]);
}

#[test]
fn ranking_breaks_ties_by_pid() {
    let mut source = InMemorySource::new();
    source.uptime_seconds = Some(100);
    source.add_process(30, "a", "u", 0, ticks(500, 0));
    source.add_process(10, "b", "u", 0, ticks(500, 0));
    source.add_process(20, "c", "u", 0, ticks(1_000, 0));

    let snapshot = Collector::new(source).refresh();
    let ranked: Vec<(u32, f32)> = snapshot
        .processes
        .iter()
        .map(|p| (p.pid, (p.cpu_utilization_percent * 10.0).round() / 10.0))
        .collect();
    assert_eq!(ranked, vec![(20, 10.0), (10, 5.0), (30, 5.0)]);
}

#[test]
fn unreadable_host_still_produces_a_snapshot() {
    let source = InMemorySource {
        identity: None,
        uptime_seconds: None,
        memory: None,
        cpu: None,
        counts: None,
        ..InMemorySource::default()
    };
    let mut collector = Collector::new(source);
    let snapshot = collector.refresh();

    assert!(snapshot.kernel.is_empty());
    assert!(snapshot.os_name.is_empty());
    assert_eq!(snapshot.uptime_seconds, 0);
    assert_eq!(snapshot.memory_utilization, 0.0);
    assert_eq!(snapshot.cpu_utilization, 0.0);
    assert_eq!(snapshot.total_processes, 0);
    assert!(snapshot.processes.is_empty());
}

#[test]
fn zero_total_memory_is_zero_utilization() {
    let mut source = InMemorySource::new();
    source.memory = Some(MemoryCounters {
        total: 0,
        free: 10,
        ..MemoryCounters::default()
    });
    let snapshot = Collector::new(source).refresh();
    assert_eq!(snapshot.memory_utilization, 0.0);
}

#[test]
fn independent_collectors_do_not_share_state() {
    let mut source = InMemorySource::new();
    source.set_cpu(100, 100);
    let mut a = Collector::new(source.clone());
    a.refresh();
    a.source_mut().set_cpu(200, 100);
    assert!((a.refresh().cpu_utilization - 1.0).abs() < f32::EPSILON);

    // A new collector starts unarmed even though the counters are large.
    let mut b = Collector::new(source);
    b.source_mut().set_cpu(200, 100);
    assert_eq!(b.refresh().cpu_utilization, 0.0);
}
