//! Render callbacks.
//!
//! The core never touches a screen. Whenever visible state changes it
//! describes the new state to a [`View`], which the host (terminal, web
//! page, test) implements however it likes.

use crate::buffer::ResultDisplay;
use crate::model::HistoryRecord;

pub trait View {
    /// The expression text changed.
    fn expression(&mut self, _text: &str) {}

    /// The result area changed (including being cleared).
    fn result(&mut self, _display: &ResultDisplay) {}

    /// The history log changed; `records` is the full log, newest first.
    fn history(&mut self, _records: &[HistoryRecord]) {}
}

/// A view that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl View for NullView {}

/// Captures every update for assertions.
#[cfg(any(test, feature = "test_utils"))]
#[derive(Debug, Default)]
pub struct RecordingView {
    pub expressions: Vec<String>,
    pub results: Vec<ResultDisplay>,
    pub histories: Vec<Vec<HistoryRecord>>,
}

#[cfg(any(test, feature = "test_utils"))]
impl RecordingView {
    pub fn last_expression(&self) -> Option<&str> {
        self.expressions.last().map(String::as_str)
    }

    pub fn last_result(&self) -> Option<&ResultDisplay> {
        self.results.last()
    }

    pub fn last_history(&self) -> Option<&[HistoryRecord]> {
        self.histories.last().map(Vec::as_slice)
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl View for RecordingView {
    fn expression(&mut self, text: &str) {
        self.expressions.push(text.to_string());
    }

    fn result(&mut self, display: &ResultDisplay) {
        self.results.push(display.clone());
    }

    fn history(&mut self, records: &[HistoryRecord]) {
        self.histories.push(records.to_vec());
    }
}
