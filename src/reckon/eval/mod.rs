//! # Evaluation Bridge
//!
//! Turns buffer text into a number or a tagged error. Expressions are
//! parsed by a dedicated arithmetic parser (`+ - * / ^`, parentheses,
//! unary minus, decimal literals); nothing is handed to a general-purpose
//! code evaluator.
//!
//! Failures are deliberately flat: a syntax error, an unknown character
//! and a non-finite result (division by zero, overflow) all become
//! [`EvalError::InvalidExpression`]. The detail string exists for debug
//! logging only and is never shown to the user.

use thiserror::Error;
use tracing::debug;

pub mod lexer;
pub mod parser;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("invalid-expression")]
    InvalidExpression { detail: String },
}

impl EvalError {
    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        EvalError::InvalidExpression {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            EvalError::InvalidExpression { detail } => detail,
        }
    }
}

/// Evaluate expression text.
///
/// Returns `Ok(None)` for empty or whitespace-only input: there is nothing
/// to show and nothing to record.
pub fn evaluate(expression: &str) -> Result<Option<f64>, EvalError> {
    if expression.trim().is_empty() {
        return Ok(None);
    }

    let value = lexer::tokenize(expression)
        .and_then(parser::parse)
        .and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(EvalError::invalid(format!("non-finite result {}", value)))
            }
        });

    match value {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            debug!(expression, detail = e.detail(), "evaluation failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(input: &str) -> f64 {
        evaluate(input).unwrap().unwrap()
    }

    #[test]
    fn evaluates_basic_arithmetic() {
        assert_eq!(value("2^3"), 8.0);
        assert_eq!(value("2+3*4"), 14.0);
        assert_eq!(value("(2+3)*4"), 20.0);
        assert_eq!(value("7/2"), 3.5);
    }

    #[test]
    fn evaluates_decimals_and_unary_minus() {
        assert_eq!(value("2.5^2"), 6.25);
        assert_eq!(value("-3+5"), 2.0);
        assert_eq!(value("2*(-3)"), -6.0);
        assert_eq!(value("5.*2"), 10.0);
    }

    #[test]
    fn evaluates_buffer_generated_implicit_multiplication() {
        assert_eq!(value("2*(3+1)"), 8.0);
        assert_eq!(value("(1+1)*(2+2)"), 8.0);
    }

    #[test]
    fn empty_input_is_a_noop() {
        assert_eq!(evaluate(""), Ok(None));
        assert_eq!(evaluate("   "), Ok(None));
    }

    #[test]
    fn malformed_input_is_invalid_expression() {
        for input in ["2+", "(2", "2)", "*3", "1.2.3", "abc", "2(3)"] {
            let err = evaluate(input).unwrap_err();
            assert!(matches!(err, EvalError::InvalidExpression { .. }), "{}", input);
            assert_eq!(err.to_string(), "invalid-expression");
        }
    }

    #[test]
    fn non_finite_results_are_invalid() {
        assert!(evaluate("1/0").is_err());
        assert!(evaluate("0/0").is_err());
        assert!(evaluate("10^400").is_err());
    }

    #[test]
    fn deep_nesting_is_invalid_not_fatal() {
        let input = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(err, EvalError::InvalidExpression { .. }));
    }

    #[test]
    fn deep_nesting_typed_through_the_buffer_is_invalid() {
        use crate::buffer::{ExpressionBuffer, Token};

        let mut buffer = ExpressionBuffer::new();
        for _ in 0..50_000 {
            buffer.append(Token::Open);
        }
        buffer.append(Token::Digit(1));
        for _ in 0..50_000 {
            buffer.append(Token::Close);
        }
        assert!(evaluate(buffer.text()).is_err());
    }

    #[test]
    fn long_exponent_towers_are_invalid_not_fatal() {
        let input = vec!["1"; 10_000].join("^");
        assert!(evaluate(&input).is_err());
    }
}
