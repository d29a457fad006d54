//! Recursive-descent parser over [`Lexeme`]s, evaluating as it goes.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom ('^' unary)?
//! atom   := number | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than a leading minus, so
//! `-2^2` is `-4` and `2^3^2` is `512`.
//!
//! Operator chains at one level are folded in a loop. Only parentheses,
//! signs and exponents recurse, and that nesting is capped at
//! [`MAX_DEPTH`] so hostile input fails instead of exhausting the stack.

use super::lexer::Lexeme;
use super::EvalError;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Deepest nesting of parentheses, signs and exponents accepted.
pub const MAX_DEPTH: usize = 256;

pub fn parse(lexemes: Vec<Lexeme>) -> Result<f64, EvalError> {
    let mut parser = Parser {
        lexemes: lexemes.into_iter().peekable(),
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(extra) = parser.lexemes.next() {
        return Err(EvalError::invalid(format!("unexpected '{}'", extra)));
    }

    Ok(value)
}

struct Parser {
    lexemes: Peekable<IntoIter<Lexeme>>,
    depth: usize,
}

impl Parser {
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.term()?;

        while let Some(Lexeme::Plus | Lexeme::Minus) = self.lexemes.peek() {
            let add = matches!(self.lexemes.next(), Some(Lexeme::Plus));
            let rhs = self.term()?;
            lhs = if add { lhs + rhs } else { lhs - rhs };
        }

        Ok(lhs)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.unary()?;

        while let Some(Lexeme::Star | Lexeme::Slash) = self.lexemes.peek() {
            let mul = matches!(self.lexemes.next(), Some(Lexeme::Star));
            let rhs = self.unary()?;
            lhs = if mul { lhs * rhs } else { lhs / rhs };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::invalid("nesting too deep"));
        }

        let value = match self.lexemes.peek() {
            Some(Lexeme::Minus) => {
                self.lexemes.next();
                self.unary().map(|v| -v)
            }
            Some(Lexeme::Plus) => {
                self.lexemes.next();
                self.unary()
            }
            _ => self.power(),
        };

        self.depth -= 1;
        value
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.atom()?;

        if let Some(Lexeme::Caret) = self.lexemes.peek() {
            self.lexemes.next();
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }

        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        match self.lexemes.next() {
            Some(Lexeme::Num(n)) => Ok(n),
            Some(Lexeme::Open) => {
                let inner = self.expr()?;
                match self.lexemes.next() {
                    Some(Lexeme::Close) => Ok(inner),
                    Some(other) => Err(EvalError::invalid(format!(
                        "expected ')' but got '{}'",
                        other
                    ))),
                    None => Err(EvalError::invalid("unclosed '('")),
                }
            }
            Some(other) => Err(EvalError::invalid(format!("unexpected '{}'", other))),
            None => Err(EvalError::invalid("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parsed(input: &str) -> f64 {
        parse(tokenize(input).unwrap()).unwrap()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(parsed("2+3*4"), 14.0);
        assert_eq!(parsed("2*3+4"), 10.0);
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(parsed("10-4-3"), 3.0);
        assert_eq!(parsed("64/4/2"), 8.0);
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(parsed("2^3^2"), 512.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(parsed("-2^2"), -4.0);
        assert_eq!(parsed("(-2)^2"), 4.0);
        assert_eq!(parsed("2^-1"), 0.5);
    }

    #[test]
    fn reports_structural_errors() {
        assert!(parse(tokenize("2+").unwrap()).is_err());
        assert!(parse(tokenize("(2+3").unwrap()).is_err());
        assert!(parse(tokenize("2+3)").unwrap()).is_err());
        assert!(parse(tokenize("()").unwrap()).is_err());
        assert!(parse(tokenize("(2)3").unwrap()).is_err());
        assert!(parse(Vec::new()).is_err());
    }

    #[test]
    fn nesting_is_capped() {
        let within = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(parsed(&within), 1.0);

        let beyond = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        let err = parse(tokenize(&beyond).unwrap()).unwrap_err();
        assert_eq!(err.detail(), "nesting too deep");
    }

    #[test]
    fn long_flat_chains_do_not_recurse() {
        let chain = vec!["1"; 100_000].join("+");
        assert_eq!(parsed(&chain), 100_000.0);
    }
}
