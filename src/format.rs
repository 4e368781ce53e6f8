use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn elapsed_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    format!("{hours:02}:{minutes:02}:{:02}", seconds % 60)
}

/// Kilobytes as whole megabytes.
pub fn format_ram_mb(kilobytes: u64) -> String {
    (kilobytes / 1024).to_string()
}

/// A `[0, 1]` fraction as a percentage with one decimal.
pub fn format_percent(fraction: f32) -> String {
    format!("{:.1}%", fraction * 100.0)
}
