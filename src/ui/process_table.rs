use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use crate::format::{elapsed_time, format_ram_mb, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

const HEADERS: [&str; 6] = ["PID", "USER", "CPU%", "RAM[MB]", "TIME+", "COMMAND"];
const FIXED_WIDTHS: [u16; 5] = [7, 10, 6, 8, 10];

/// Number of process rows that fit in `area`.
pub fn visible_rows(area: Rect) -> usize {
    // Two border rows plus the header row.
    area.height.saturating_sub(3) as usize
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessRecord],
    scroll: usize,
    theme: &Theme,
) {
    let fixed: u16 = FIXED_WIDTHS.iter().sum::<u16>() + FIXED_WIDTHS.len() as u16;
    let command_width = area.width.saturating_sub(fixed + 2) as usize;

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(theme.table_header_fg)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes
        .iter()
        .skip(scroll)
        .take(visible_rows(area))
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(truncate_unicode(&p.user, FIXED_WIDTHS[1] as usize)),
                Cell::from(format!("{:.1}", p.cpu_utilization_percent)).style(
                    Style::default().fg(theme.heat(p.cpu_utilization_percent / 100.0)),
                ),
                Cell::from(format_ram_mb(p.ram_kilobytes)),
                Cell::from(elapsed_time(p.uptime_seconds)),
                Cell::from(truncate_unicode(&p.command, command_width)),
            ])
            .style(Style::default().fg(theme.text_primary))
        });

    let widths = [
        Constraint::Length(FIXED_WIDTHS[0]),
        Constraint::Length(FIXED_WIDTHS[1]),
        Constraint::Length(FIXED_WIDTHS[2]),
        Constraint::Length(FIXED_WIDTHS[3]),
        Constraint::Length(FIXED_WIDTHS[4]),
        Constraint::Min(10),
    ];

    let title = if processes.is_empty() {
        " Processes ".to_string()
    } else {
        let last = (scroll + visible_rows(area)).min(processes.len());
        format!(" Processes {}-{} of {} ", scroll + 1, last, processes.len())
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.overlay_border))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    frame.render_widget(table, area);
}
