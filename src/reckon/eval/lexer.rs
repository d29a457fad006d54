use super::EvalError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lexeme {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Open,
    Close,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Num(n) => write!(f, "{}", n),
            Lexeme::Plus => write!(f, "+"),
            Lexeme::Minus => write!(f, "-"),
            Lexeme::Star => write!(f, "*"),
            Lexeme::Slash => write!(f, "/"),
            Lexeme::Caret => write!(f, "^"),
            Lexeme::Open => write!(f, "("),
            Lexeme::Close => write!(f, ")"),
        }
    }
}

/// Split expression text into lexemes. Whitespace is skipped.
///
/// Number literals are `12`, `12.`, `12.5` or `.5`; a second `.` in the
/// same literal is an error rather than the start of a new number.
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, EvalError> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let lexeme = match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Lexeme::Caret
            }
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'^' => Lexeme::Caret,
            b'(' => Lexeme::Open,
            b')' => Lexeme::Close,
            b'0'..=b'9' | b'.' => {
                let start = i;
                let mut seen_point = false;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    if bytes[i] == b'.' {
                        if seen_point {
                            return Err(EvalError::invalid(format!(
                                "unexpected '.' at offset {}",
                                i
                            )));
                        }
                        seen_point = true;
                    }
                    i += 1;
                }
                let literal = &input[start..i];
                if literal == "." {
                    return Err(EvalError::invalid(format!(
                        "lone '.' at offset {}",
                        start
                    )));
                }
                let value = literal.parse::<f64>().map_err(|e| {
                    EvalError::invalid(format!("bad number {:?}: {}", literal, e))
                })?;
                out.push(Lexeme::Num(value));
                continue;
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(EvalError::invalid(format!(
                    "unexpected character {:?} at offset {}",
                    ch, i
                )));
            }
        };
        out.push(lexeme);
        i += 1;
    }

    Ok(out)
}
