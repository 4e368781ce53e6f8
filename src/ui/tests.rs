use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::app::App;
use crate::config::Config;
use crate::system::process::ProcessRecord;
use crate::system::snapshot::SystemSnapshot;
use crate::system::source::{InMemorySource, ProcessCounters};
use crate::ui::theme::Theme;
use crate::ui::{header, process_table, statusbar};

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_record(pid: u32, user: &str, command: &str, cpu: f32) -> ProcessRecord {
    ProcessRecord {
        pid,
        command: command.to_string(),
        user: user.to_string(),
        ram_kilobytes: 204_800,
        uptime_seconds: 3_725,
        cpu_utilization_percent: cpu,
    }
}

fn make_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        kernel: "6.1.0-18-amd64".to_string(),
        os_name: "Debian GNU/Linux 12".to_string(),
        uptime_seconds: 90_061,
        memory_utilization: 0.42,
        cpu_utilization: 0.125,
        core_utilization: vec![0.5, 0.25],
        total_processes: 4_321,
        running_processes: 2,
        processes: vec![
            make_record(20, "alice", "/usr/bin/busy --loop", 12.5),
            make_record(10, "root", "[kworker/0:1]", 0.4),
        ],
    }
}

fn render_header(snapshot: &SystemSnapshot, width: u16) -> String {
    let height = header::height(snapshot, true, width);
    render_to_string(width, height, |frame| {
        header::render(
            frame,
            Rect::new(0, 0, width, height),
            snapshot,
            true,
            &Theme::dark(),
        );
    })
}

#[test]
fn header_shows_identity_gauges_and_cores() {
    let snapshot = make_snapshot();
    let output = render_header(&snapshot, 160);

    assert!(output.contains("sysmon"));
    assert!(output.contains("Debian GNU/Linux 12"));
    assert!(output.contains("kernel 6.1.0-18-amd64"));
    assert!(output.contains("Up 25:01:01"));
    assert!(output.contains("4321 total, 2 running"));
    assert!(output.contains("12.5%"));
    assert!(output.contains("42.0%"));
    assert!(output.contains("Cores"));
    assert!(output.contains("0: 50%"));
    assert!(output.contains("1: 25%"));
}

#[test]
fn header_shows_every_core_of_an_eight_core_host() {
    let mut snapshot = make_snapshot();
    snapshot.core_utilization = vec![0.12; 8];
    let output = render_header(&snapshot, 120);

    for i in 0..8 {
        assert!(output.contains(&format!("{i}: 12%")), "core {i} missing:\n{output}");
    }
    assert!(output.contains("kernel 6.1.0-18-amd64"));
}

#[test]
fn header_wraps_many_cores_onto_extra_rows() {
    let mut snapshot = make_snapshot();
    snapshot.core_utilization = vec![0.5; 32];

    // 78 inner columns hold eight `NN: 50%` cells per row.
    assert_eq!(header::height(&snapshot, true, 80), 5 + 4 + 2);

    let output = render_header(&snapshot, 80);
    for i in 0..32 {
        assert!(output.contains(&format!("{i:>2}: 50%")), "core {i} missing:\n{output}");
    }
}

#[test]
fn header_height_depends_on_core_grid() {
    let mut snapshot = make_snapshot();
    assert_eq!(header::height(&snapshot, true, 160), 8);
    assert_eq!(header::height(&snapshot, false, 160), 5);
    snapshot.core_utilization.clear();
    assert_eq!(header::height(&snapshot, true, 160), 5);
}

#[test]
fn process_table_lists_rows_in_order() {
    let snapshot = make_snapshot();
    let output = render_to_string(100, 6, |frame| {
        process_table::render(
            frame,
            Rect::new(0, 0, 100, 6),
            &snapshot.processes,
            0,
            &Theme::dark(),
        );
    });

    assert!(output.contains("PID"));
    assert!(output.contains("COMMAND"));
    assert!(output.contains("Processes 1-2 of 2"));
    let busy = output.find("/usr/bin/busy --loop").unwrap();
    let kworker = output.find("[kworker/0:1]").unwrap();
    assert!(busy < kworker);
    assert!(output.contains("01:02:05"));
    assert!(output.contains("200"));
}

#[test]
fn process_table_respects_scroll() {
    let snapshot = make_snapshot();
    let output = render_to_string(100, 6, |frame| {
        process_table::render(
            frame,
            Rect::new(0, 0, 100, 6),
            &snapshot.processes,
            1,
            &Theme::dark(),
        );
    });

    assert!(!output.contains("/usr/bin/busy"));
    assert!(output.contains("[kworker/0:1]"));
}

#[test]
fn visible_rows_excludes_borders_and_header() {
    assert_eq!(process_table::visible_rows(Rect::new(0, 0, 80, 10)), 7);
    assert_eq!(process_table::visible_rows(Rect::new(0, 0, 80, 2)), 0);
}

#[test]
fn statusbar_shows_hints() {
    let hints = vec![("q".to_string(), "Quit"), ("r".to_string(), "Refresh")];
    let output = render_to_string(80, 1, |frame| {
        statusbar::render(frame, Rect::new(0, 0, 80, 1), &hints, &Theme::dark());
    });
    assert!(output.contains(" q "));
    assert!(output.contains("Quit"));
    assert!(output.contains("Refresh"));
}

#[test]
fn full_draw_sets_page_size() {
    let mut source = InMemorySource::new();
    source.uptime_seconds = Some(100);
    for pid in 1..=30 {
        source.add_process(pid, "worker", "bob", 1024, ProcessCounters::default());
    }
    let mut app = App::new(source, &Config::default());

    let backend = TestBackend::new(100, 20);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| crate::ui::draw(frame, &mut app, &Theme::dark()))
        .unwrap();

    // 20 rows - 5 header - 1 status bar = 14 table rows, minus borders and header row.
    assert_eq!(app.page_size, 11);
    let output = buffer_to_string(terminal.backend().buffer());
    assert!(output.contains("Processes 1-11 of 30"));
}
