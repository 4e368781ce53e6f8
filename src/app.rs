use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::collector::Collector;
use crate::system::snapshot::SystemSnapshot;
use crate::system::source::DataSource;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
    pub scroll_up: KeyCode,
    pub scroll_down: KeyCode,
    pub toggle_cores: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            scroll_up: parse_key(&kb.scroll_up).unwrap_or(KeyCode::Up),
            scroll_down: parse_key(&kb.scroll_down).unwrap_or(KeyCode::Down),
            toggle_cores: parse_key(&kb.toggle_cores).unwrap_or(KeyCode::Char('c')),
        }
    }

    /// (key_label, description) pairs for the status bar.
    pub fn hint_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.refresh), "Refresh"),
            (key_label(self.toggle_cores), "Cores"),
            (
                format!("{}{}", key_label(self.scroll_up), key_label(self.scroll_down)),
                "Scroll",
            ),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "\u{2191}".to_string(),
        KeyCode::Down => "\u{2193}".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App<S> {
    pub running: bool,
    pub collector: Collector<S>,
    pub snapshot: SystemSnapshot,
    /// Index of the first visible process row.
    pub scroll: usize,
    /// Rows the process table showed on the last draw.
    pub page_size: usize,
    pub show_per_core: bool,
    pub keybinds: ResolvedKeybinds,
}

impl<S: DataSource> App<S> {
    pub fn new(source: S, config: &Config) -> Self {
        let mut collector =
            Collector::new(source).with_process_limit(config.general.process_limit());
        let snapshot = collector.refresh();

        App {
            running: true,
            collector,
            snapshot,
            scroll: 0,
            page_size: 1,
            show_per_core: config.general.show_per_core,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn refresh_data(&mut self) {
        self.snapshot = self.collector.refresh();
        self.clamp_scroll();
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        let code = key.code;
        let kb = &self.keybinds;

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.scroll_up {
            return Action::ScrollUp;
        }
        if code == kb.scroll_down {
            return Action::ScrollDown;
        }
        if code == kb.toggle_cores {
            return Action::ToggleCores;
        }

        match code {
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::Home => Action::ScrollTop,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => {
                self.scroll += 1;
                self.clamp_scroll();
            }
            Action::PageUp => self.scroll = self.scroll.saturating_sub(self.page_size.max(1)),
            Action::PageDown => {
                self.scroll += self.page_size.max(1);
                self.clamp_scroll();
            }
            Action::ScrollTop => self.scroll = 0,
            Action::ToggleCores => self.show_per_core = !self.show_per_core,
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }

    pub fn on_resize(&mut self) {
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self
            .snapshot
            .processes
            .len()
            .saturating_sub(self.page_size.max(1));
        self.scroll = self.scroll.min(max_scroll);
    }
}
