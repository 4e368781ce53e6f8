use insta::assert_snapshot;
use sysmon::report::render_report;
use sysmon::system::collector::Collector;
use sysmon::system::source::{
    CpuCounters, InMemorySource, MemoryCounters, ProcessCounters, ProcessCounts,
};

const UPTIME: u64 = 90_061;

fn core(active: u64, idle: u64) -> CpuCounters {
    CpuCounters {
        user: active,
        idle,
        ..CpuCounters::default()
    }
}

fn mock_source() -> InMemorySource {
    let mut source = InMemorySource::new();
    source.identity = Some(sysmon::system::source::SystemIdentity {
        kernel: "6.1.0-18-amd64".to_string(),
        os_name: "Debian GNU/Linux 12 (bookworm)".to_string(),
    });
    source.uptime_seconds = Some(UPTIME);
    source.memory = Some(MemoryCounters {
        total: 8000,
        free: 5000,
        ..MemoryCounters::default()
    });
    source.counts = Some(ProcessCounts {
        total: 4321,
        running: 2,
    });
    source.set_cpu(0, 0);
    source.cores = vec![core(0, 0), core(0, 0)];

    source.add_process(
        1,
        "/sbin/init",
        "root",
        168_960,
        ProcessCounters {
            active_ticks: 9_006,
            start_ticks: 0,
        },
    );
    source.add_process(
        77,
        "[kthreadd]",
        "root",
        0,
        ProcessCounters::default(),
    );
    source.add_process(
        512,
        "/usr/lib/xorg/Xorg :0",
        "root",
        512_000,
        ProcessCounters {
            active_ticks: 449_300,
            start_ticks: 100,
        },
    );
    source.add_process(
        4242,
        "/usr/bin/python3 train.py",
        "alice",
        2_097_152,
        ProcessCounters {
            active_ticks: 180_000,
            start_ticks: (UPTIME - 3600) * 100,
        },
    );
    // Listed but exits before it can be read.
    source.add_process(999, "short-lived", "bob", 10, ProcessCounters::default());
    source.vanish(999);
    source
}

#[test]
fn plain_report_after_two_ticks() {
    let mut collector = Collector::new(mock_source());
    collector.refresh();

    let source = collector.source_mut();
    source.set_cpu(25, 75);
    source.cores = vec![core(50, 50), core(125, 875)];
    let snapshot = collector.refresh();

    let output = render_report(&snapshot);
    assert_snapshot!("plain_report", output);
}

#[test]
fn report_omits_core_line_without_cores() {
    let mut source = mock_source();
    source.cores.clear();
    let snapshot = Collector::new(source).refresh();

    let output = render_report(&snapshot);
    assert!(!output.contains("Cores:"));
    assert!(output.contains("CPU:       0.0%"));
}

#[test]
fn json_snapshot_has_expected_fields() {
    let snapshot = Collector::new(mock_source()).refresh();
    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["kernel"], "6.1.0-18-amd64");
    assert_eq!(value["uptime_seconds"], UPTIME);
    assert_eq!(value["processes"].as_array().unwrap().len(), 4);
    assert_eq!(value["processes"][0]["pid"], 4242);
    assert_eq!(value["processes"][0]["user"], "alice");
}
