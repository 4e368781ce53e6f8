use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{elapsed_time, format_percent};
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

/// Identity box and gauges: three text lines plus borders.
const SUMMARY_HEIGHT: u16 = 5;
/// Blank columns after each core reading.
const CORE_GAP: usize = 2;

/// Rows the header needs at `width` columns, including the wrapped core grid.
pub fn height(snapshot: &SystemSnapshot, show_per_core: bool, width: u16) -> u16 {
    if !show_per_core || snapshot.core_utilization.is_empty() {
        return SUMMARY_HEIGHT;
    }
    let rows = core_grid(snapshot.core_utilization.len(), width.saturating_sub(2)).1;
    SUMMARY_HEIGHT + u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
}

/// `(cores per row, rows)` for `count` cores in `inner_width` columns.
fn core_grid(count: usize, inner_width: u16) -> (usize, usize) {
    let per_row = (usize::from(inner_width) / core_cell_width(count)).max(1);
    (per_row, count.div_ceil(per_row))
}

fn core_label_width(count: usize) -> usize {
    count.saturating_sub(1).to_string().len()
}

/// `NN:100%` plus the gap.
fn core_cell_width(count: usize) -> usize {
    core_label_width(count) + 5 + CORE_GAP
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    show_per_core: bool,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(SUMMARY_HEIGHT), Constraint::Min(0)])
        .split(area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    render_identity(frame, chunks[0], snapshot, theme);
    render_gauge(
        frame,
        chunks[1],
        " CPU ",
        snapshot.cpu_utilization,
        theme,
    );
    render_gauge(
        frame,
        chunks[2],
        " Memory ",
        snapshot.memory_utilization,
        theme,
    );

    if show_per_core && !snapshot.core_utilization.is_empty() && rows[1].height > 0 {
        render_cores(frame, rows[1], &snapshot.core_utilization, theme);
    }
}

fn render_identity(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                " sysmon ",
                Style::default()
                    .fg(theme.header_accent_fg)
                    .bg(theme.header_accent_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                snapshot.os_name.as_str(),
                Style::default().fg(theme.text_primary),
            ),
        ]),
        Line::from(Span::styled(
            format!("kernel {}", snapshot.kernel),
            Style::default().fg(theme.text_secondary),
        )),
        Line::from(Span::styled(
            format!(
                "Up {}  Procs {} total, {} running",
                elapsed_time(snapshot.uptime_seconds as i64),
                snapshot.total_processes,
                snapshot.running_processes
            ),
            Style::default().fg(theme.text_secondary),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_cores(frame: &mut Frame, area: Rect, cores: &[f32], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Cores ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (per_row, _) = core_grid(cores.len(), inner.width);
    let label_width = core_label_width(cores.len());
    let lines: Vec<Line> = cores
        .chunks(per_row)
        .enumerate()
        .map(|(row, chunk)| {
            let mut spans = Vec::with_capacity(chunk.len() * 2);
            for (offset, usage) in chunk.iter().enumerate() {
                let index = row * per_row + offset;
                spans.push(Span::styled(
                    format!("{index:>label_width$}:"),
                    Style::default().fg(theme.text_secondary),
                ));
                spans.push(Span::styled(
                    format!("{:>3.0}%{}", usage * 100.0, " ".repeat(CORE_GAP)),
                    Style::default().fg(theme.heat(*usage)),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, ratio: f32, theme: &Theme) {
    let ratio = ratio.clamp(0.0, 1.0);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.heat(ratio))
                .bg(theme.gauge_unfilled),
        )
        .ratio(f64::from(ratio))
        .label(format_percent(ratio));

    frame.render_widget(gauge, area);
}
