use chrono::{Local, NaiveDateTime, TimeZone};
use colored::Colorize;
use reckon::buffer::ResultDisplay;
use reckon::model::HistoryRecord;
use reckon::render::View;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 20;

/// How history timestamps are shown.
pub(super) enum TimeStyle<'a> {
    /// The stored text, verbatim.
    Stored,
    /// "5 minutes ago", parsing the stored text with this strftime pattern.
    Relative(&'a str),
}

/// Prints result changes as they happen. Used by the REPL, where the user
/// already sees what they type.
pub(super) struct TerminalView {
    pub(super) expression: String,
}

impl TerminalView {
    pub(super) fn new() -> Self {
        Self {
            expression: String::new(),
        }
    }
}

impl View for TerminalView {
    fn expression(&mut self, text: &str) {
        self.expression = text.to_string();
    }

    fn result(&mut self, display: &ResultDisplay) {
        match display {
            ResultDisplay::Empty => {}
            ResultDisplay::Value(_) => println!(
                "{} {} {}",
                self.expression.dimmed(),
                "=".dimmed(),
                display.to_string().green().bold()
            ),
            ResultDisplay::Error => println!(
                "{} {} {}",
                self.expression.dimmed(),
                "=".dimmed(),
                display.to_string().red()
            ),
        }
    }
}

pub(super) fn print_result(display: &ResultDisplay) {
    match display {
        ResultDisplay::Empty => {}
        ResultDisplay::Value(_) => println!("{}", display),
        ResultDisplay::Error => println!("{}", display.to_string().red()),
    }
}

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_error(message: &str) {
    println!("{}", message.red());
}

pub(super) fn print_history(records: &[HistoryRecord], time_style: &TimeStyle<'_>) {
    if records.is_empty() {
        println!("No history yet.");
        return;
    }

    let idx_width = records.len().to_string().len() + 2;

    for (i, record) in records.iter().enumerate() {
        let idx_str = format!("{:>width$} ", format!("{}.", i + 1), width = idx_width);
        let entry = format!("{} = {}", record.expression, record.result);

        let time_str = match time_style {
            TimeStyle::Stored => record.timestamp.clone(),
            TimeStyle::Relative(format) => relative_time(&record.timestamp, format)
                .unwrap_or_else(|| record.timestamp.clone()),
        };

        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH + 1);
        let entry_display = truncate_to_width(&entry, available);
        let padding = available.saturating_sub(entry_display.width());

        println!(
            "{}{}{} {}",
            idx_str.yellow(),
            entry_display,
            " ".repeat(padding),
            format!("{:>width$}", time_str, width = TIME_WIDTH).dimmed()
        );
    }
}

fn relative_time(timestamp: &str, format: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(timestamp, format).ok()?;
    let stamped = Local.from_local_datetime(&naive).single()?;
    let duration = Local::now().signed_duration_since(stamped);
    Some(Formatter::new().convert(duration.to_std().unwrap_or_default()))
}

/// Cut `s` to at most `max_width` columns, ending in `…` when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let cut = s.char_indices().find_map(|(i, c)| {
        used += c.width().unwrap_or(0);
        (used > budget).then_some(i)
    });

    match cut {
        Some(i) if s.width() > max_width => format!("{}…", &s[..i]),
        _ => s.to_string(),
    }
}
