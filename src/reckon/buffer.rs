//! # Expression Buffer
//!
//! A guarded string accumulator for the expression being typed. It is not a
//! grammar validator: trailing operators and unbalanced parentheses are
//! accepted here and only rejected when the text is evaluated.
//!
//! Two rules hold on every append:
//!
//! 1. An operator is never appended directly after another operator. This
//!    also means a negative sign cannot follow an operator; a leading `-`
//!    or one right after `(` still works.
//! 2. `(` after a digit, `.` or `)` gets an implicit `*` in front of it,
//!    so `2(` becomes `2*(`.
//!
//! Any edit clears the displayed result so a stale answer never sits next
//! to a changed expression.

use crate::model::format_number;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text shown when an expression fails to evaluate ("Error").
pub const ERROR_MARKER: &str = "错误";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn as_char(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }
}

/// A single unit of input the buffer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Digit(u8),
    Point,
    Operator(Operator),
    Open,
    Close,
}

impl Token {
    pub fn as_char(self) -> char {
        match self {
            Token::Digit(d) => char::from(b'0' + d),
            Token::Point => '.',
            Token::Operator(op) => op.as_char(),
            Token::Open => '(',
            Token::Close => ')',
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(self, Token::Operator(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a calculator token: {0:?}")]
pub struct InvalidToken(pub String);

impl TryFrom<char> for Token {
    type Error = InvalidToken;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if let Some(d) = c.to_digit(10) {
            return Ok(Token::Digit(d as u8));
        }
        if let Some(op) = Operator::from_char(c) {
            return Ok(Token::Operator(op));
        }
        match c {
            '.' => Ok(Token::Point),
            '(' => Ok(Token::Open),
            ')' => Ok(Token::Close),
            other => Err(InvalidToken(other.to_string())),
        }
    }
}

impl FromStr for Token {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "**" {
            return Ok(Token::Operator(Operator::Pow));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Token::try_from(c),
            _ => Err(InvalidToken(s.to_string())),
        }
    }
}

/// What the result area currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultDisplay {
    #[default]
    Empty,
    Value(f64),
    Error,
}

impl ResultDisplay {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultDisplay::Empty)
    }
}

impl fmt::Display for ResultDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultDisplay::Empty => Ok(()),
            ResultDisplay::Value(v) => f.write_str(&format_number(*v)),
            ResultDisplay::Error => f.write_str(ERROR_MARKER),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpressionBuffer {
    text: String,
    display: ResultDisplay,
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn last_char(&self) -> Option<char> {
        self.text.chars().last()
    }

    fn last_is_operator(&self) -> bool {
        self.last_char().and_then(Operator::from_char).is_some()
    }

    /// Append a token, applying the adjacency and implicit-multiply rules.
    ///
    /// Returns `false` when the token was rejected. A rejected append leaves
    /// both the text and the displayed result untouched.
    pub fn append(&mut self, token: Token) -> bool {
        if token.is_operator() && self.last_is_operator() {
            return false;
        }

        if token == Token::Open {
            if let Some(last) = self.last_char() {
                if last != '(' && Operator::from_char(last).is_none() {
                    self.text.push(Operator::Mul.as_char());
                }
            }
        }

        self.text.push(token.as_char());
        self.display = ResultDisplay::Empty;
        true
    }

    /// Remove the final character, if any.
    pub fn delete_last(&mut self) {
        self.text.pop();
        self.display = ResultDisplay::Empty;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.display = ResultDisplay::Empty;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn display(&self) -> &ResultDisplay {
        &self.display
    }

    /// Set the result area after an evaluation. The text is left as-is.
    pub fn show(&mut self, display: ResultDisplay) {
        self.display = display;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buffer: &mut ExpressionBuffer, input: &str) {
        for c in input.chars() {
            buffer.append(Token::try_from(c).unwrap());
        }
    }

    fn typed(input: &str) -> String {
        let mut buffer = ExpressionBuffer::new();
        feed(&mut buffer, input);
        buffer.text().to_string()
    }

    #[test]
    fn appends_tokens_verbatim() {
        assert_eq!(typed("12.5+3"), "12.5+3");
        assert_eq!(typed("(1-2)"), "(1-2)");
    }

    #[test]
    fn rejects_adjacent_operators() {
        assert_eq!(typed("2+*3"), "2+3");
        assert_eq!(typed("2^^3"), "2^3");
        assert_eq!(typed("2*-3"), "2*3");
    }

    #[test]
    fn never_contains_adjacent_operators() {
        let ops = ['+', '-', '*', '/', '^'];
        let mut buffer = ExpressionBuffer::new();
        for (i, a) in ops.iter().enumerate() {
            buffer.append(Token::Digit(i as u8));
            for b in ops.iter() {
                buffer.append(Token::try_from(*a).unwrap());
                buffer.append(Token::try_from(*b).unwrap());
            }
        }
        let chars: Vec<char> = buffer.text().chars().collect();
        for pair in chars.windows(2) {
            assert!(
                !(ops.contains(&pair[0]) && ops.contains(&pair[1])),
                "adjacent operators in {}",
                buffer.text()
            );
        }
    }

    #[test]
    fn leading_minus_is_allowed() {
        assert_eq!(typed("-3"), "-3");
        assert_eq!(typed("(-3)"), "(-3)");
    }

    #[test]
    fn inserts_multiply_before_open_paren() {
        assert_eq!(typed("2("), "2*(");
        assert_eq!(typed("2.("), "2.*(");
        assert_eq!(typed("(1)("), "(1)*(");
    }

    #[test]
    fn no_multiply_after_operator_open_or_empty() {
        assert_eq!(typed("("), "(");
        assert_eq!(typed("2+("), "2+(");
        assert_eq!(typed("(("), "((");
        assert_eq!(typed("2^("), "2^(");
    }

    #[test]
    fn rejected_append_reports_false() {
        let mut buffer = ExpressionBuffer::new();
        assert!(buffer.append(Token::Digit(1)));
        assert!(buffer.append(Token::Operator(Operator::Add)));
        assert!(!buffer.append(Token::Operator(Operator::Sub)));
    }

    #[test]
    fn edits_clear_displayed_result() {
        let mut buffer = ExpressionBuffer::new();
        feed(&mut buffer, "1+1");

        buffer.show(ResultDisplay::Value(2.0));
        buffer.append(Token::Digit(0));
        assert!(buffer.display().is_empty());

        buffer.show(ResultDisplay::Error);
        buffer.delete_last();
        assert!(buffer.display().is_empty());

        buffer.show(ResultDisplay::Value(2.0));
        buffer.clear();
        assert!(buffer.display().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn show_keeps_text() {
        let mut buffer = ExpressionBuffer::new();
        feed(&mut buffer, "2^3");
        buffer.show(ResultDisplay::Value(8.0));
        assert_eq!(buffer.text(), "2^3");
        assert_eq!(buffer.display().to_string(), "8");
    }

    #[test]
    fn delete_last_on_empty_is_noop() {
        let mut buffer = ExpressionBuffer::new();
        buffer.delete_last();
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn parses_tokens_from_strings() {
        assert_eq!("7".parse::<Token>().unwrap(), Token::Digit(7));
        assert_eq!("**".parse::<Token>().unwrap(), Token::Operator(Operator::Pow));
        assert!("ab".parse::<Token>().is_err());
        assert!("x".parse::<Token>().is_err());
        assert!("".parse::<Token>().is_err());
    }

    #[test]
    fn error_display_uses_marker() {
        assert_eq!(ResultDisplay::Error.to_string(), ERROR_MARKER);
        assert_eq!(ResultDisplay::Empty.to_string(), "");
    }

    #[test]
    fn invalid_token_is_a_std_error() {
        let err = Token::try_from('x').unwrap_err();
        assert_eq!(err, InvalidToken("x".to_string()));
        assert_eq!(err.to_string(), "Not a calculator token: \"x\"");

        let boxed: Box<dyn std::error::Error> = Box::new("%".parse::<Token>().unwrap_err());
        assert_eq!(boxed.to_string(), "Not a calculator token: \"%\"");
    }
}
