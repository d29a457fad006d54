//! Keyboard mapping.
//!
//! Translates a key press (a key name plus a legacy numeric key code, as
//! browsers and most terminal toolkits report them) into a calculator
//! [`Action`]. Main-row and numeric-pad keys map to the same tokens.

use crate::buffer::{Operator, Token};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Key codes whose default handling the host should suppress
/// (Backspace, Enter, Escape, Delete and the numeric-pad operators).
pub const SUPPRESSED_KEY_CODES: [u32; 9] = [8, 13, 27, 46, 106, 107, 109, 110, 111];

const NUMPAD_DIGIT_BASE: u32 = 96;

static NUMPAD_OPERATORS: Lazy<HashMap<u32, Token>> = Lazy::new(|| {
    HashMap::from([
        (106, Token::Operator(Operator::Mul)),
        (107, Token::Operator(Operator::Add)),
        (109, Token::Operator(Operator::Sub)),
        (110, Token::Point),
        (111, Token::Operator(Operator::Div)),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub key_code: u32,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, key_code: u32) -> Self {
        Self {
            key: key.into(),
            key_code,
        }
    }

    /// A key identified by name only.
    pub fn named(key: impl Into<String>) -> Self {
        Self::new(key, 0)
    }

    pub fn suppresses_default(&self) -> bool {
        suppresses_default(self.key_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Append(Token),
    Evaluate,
    DeleteLast,
    Clear,
}

pub fn suppresses_default(key_code: u32) -> bool {
    SUPPRESSED_KEY_CODES.contains(&key_code)
}

/// Map a key press to an action. Unrecognized keys yield `None`.
pub fn map_key(event: &KeyEvent) -> Option<Action> {
    let key = event.key.as_str();
    let code = event.key_code;

    let mut chars = key.chars();
    let single = match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    };

    if let Some(c) = single.filter(char::is_ascii_digit) {
        return Token::try_from(c).ok().map(Action::Append);
    }
    if (NUMPAD_DIGIT_BASE..NUMPAD_DIGIT_BASE + 10).contains(&code) {
        return Some(Action::Append(Token::Digit((code - NUMPAD_DIGIT_BASE) as u8)));
    }
    if let Some(c) = single.filter(|c| "+-*/.()".contains(*c)) {
        return Token::try_from(c).ok().map(Action::Append);
    }
    if let Some(token) = NUMPAD_OPERATORS.get(&code) {
        return Some(Action::Append(*token));
    }
    if key == "^" || key == "**" {
        return Some(Action::Append(Token::Operator(Operator::Pow)));
    }

    match (key, code) {
        ("Enter", _) | (_, 13) => Some(Action::Evaluate),
        ("Backspace", _) | (_, 8) => Some(Action::DeleteLast),
        ("Escape", _) | (_, 27) | ("Delete", _) | (_, 46) => Some(Action::Clear),
        _ => None,
    }
}
