//! # API Facade
//!
//! [`Calculator`] is the single entry point for a calculator session. It
//! owns the expression buffer, the history store and the view, and wires
//! them together:
//!
//! ```text
//! input → ExpressionBuffer → (evaluate) eval::evaluate → HistoryStore → View
//! ```
//!
//! ## What the API Does NOT Do
//!
//! - **Evaluation or input rules**: those live in `eval/` and `buffer.rs`
//! - **I/O**: no stdout or stderr; every visible change goes to the [`View`]
//! - **Error surfacing for bad expressions**: an invalid expression shows
//!   the error marker and is otherwise swallowed
//!
//! Storage failures are the only errors returned.
//!
//! ## Generic Over Storage and View
//!
//! - Production: `Calculator<FsBackend, TerminalView>`
//! - Testing: `Calculator<MemBackend, RecordingView>`
//!
//! Each instance is fully independent; there is no shared global state.

use crate::buffer::{ExpressionBuffer, ResultDisplay, Token};
use crate::error::{ReckonError, Result};
use crate::eval;
use crate::history::HistoryStore;
use crate::keys::{map_key, Action, KeyEvent};
use crate::model::HistoryRecord;
use crate::render::View;
use crate::store::KeyValueStore;

pub struct Calculator<B: KeyValueStore, V: View> {
    buffer: ExpressionBuffer,
    history: HistoryStore<B>,
    view: V,
}

impl<B: KeyValueStore, V: View> Calculator<B, V> {
    pub fn new(history: HistoryStore<B>, view: V) -> Self {
        Self {
            buffer: ExpressionBuffer::new(),
            history,
            view,
        }
    }

    /// Restore persisted history. The view is only redrawn when something
    /// was found, since it starts out empty.
    pub fn load(&mut self) -> Result<bool> {
        let found = self.history.load()?;
        if found {
            self.view.history(self.history.records());
        }
        Ok(found)
    }

    /// Append one token. Returns `false` if the buffer rejected it.
    pub fn append(&mut self, token: Token) -> bool {
        if !self.buffer.append(token) {
            return false;
        }
        self.emit_buffer();
        true
    }

    /// Append a token given as a short string (`"7"`, `"("`, `"**"`).
    pub fn append_str(&mut self, token: &str) -> Result<bool> {
        let token = token
            .parse::<Token>()
            .map_err(|e| ReckonError::Api(e.to_string()))?;
        Ok(self.append(token))
    }

    /// Type `text` one character at a time through the append rules.
    /// Whitespace is skipped; any other unknown character is an error and
    /// nothing from `text` is typed.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let tokens = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Token::try_from(c).map_err(|e| ReckonError::Api(e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        for token in tokens {
            self.append(token);
        }
        Ok(())
    }

    pub fn delete_last(&mut self) {
        self.buffer.delete_last();
        self.emit_buffer();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.emit_buffer();
    }

    /// Evaluate the current expression.
    ///
    /// Empty input changes nothing. A successful result is shown and
    /// recorded in history; a failed one shows the error marker and is not
    /// recorded.
    pub fn evaluate(&mut self) -> Result<ResultDisplay> {
        let text = self.buffer.text().to_string();

        let display = match eval::evaluate(&text) {
            Ok(None) => return Ok(self.buffer.display().clone()),
            Ok(Some(value)) => ResultDisplay::Value(value),
            Err(_) => ResultDisplay::Error,
        };

        self.buffer.show(display.clone());
        self.view.result(&display);

        if let ResultDisplay::Value(value) = &display {
            self.history.record(text, *value)?;
            self.view.history(self.history.records());
        }

        Ok(display)
    }

    /// Delete the history entry at `index` (0 = newest). Out of range is a
    /// no-op returning `Ok(None)`.
    pub fn delete_history_at(&mut self, index: usize) -> Result<Option<HistoryRecord>> {
        let removed = self.history.delete_at(index)?;
        if removed.is_some() {
            self.view.history(self.history.records());
        }
        Ok(removed)
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()?;
        self.view.history(&[]);
        Ok(())
    }

    /// Handle a key press. Returns the action taken, if the key maps to one.
    pub fn press(&mut self, event: &KeyEvent) -> Result<Option<Action>> {
        let Some(action) = map_key(event) else {
            return Ok(None);
        };

        match action {
            Action::Append(token) => {
                self.append(token);
            }
            Action::Evaluate => {
                self.evaluate()?;
            }
            Action::DeleteLast => self.delete_last(),
            Action::Clear => self.clear(),
        }
        Ok(Some(action))
    }

    pub fn expression(&self) -> &str {
        self.buffer.text()
    }

    pub fn display(&self) -> &ResultDisplay {
        self.buffer.display()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.history.records()
    }

    pub fn history_store(&self) -> &HistoryStore<B> {
        &self.history
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn emit_buffer(&mut self) {
        self.view.expression(self.buffer.text());
        self.view.result(self.buffer.display());
    }
}

pub use crate::buffer::{Operator, ERROR_MARKER};
pub use crate::keys::SUPPRESSED_KEY_CODES;
