//! Tolerant numeric input parsing for budget cells.
//!
//! Cell edits and bulk paste both accept a restricted arithmetic grammar:
//! digits, `+ - * / ( ) . , %` and an optional leading `=`. Number literals
//! may use thousands separators or the decimal-comma convention; `%` is a
//! postfix divide-by-100 that binds tighter than any infix operator.
//!
//! Parsing never panics. Anything outside the grammar, and any expression
//! whose value is not finite (e.g. division by zero), yields `None`; callers
//! keep the previous cell value instead of committing a NaN.

/// Parse user input into a number, or `None` when the input is not a valid
/// expression.
///
/// ```
/// use tally_engine::parse_numeric_input;
///
/// assert_eq!(parse_numeric_input("1,234.56"), Some(1234.56));
/// assert_eq!(parse_numeric_input("1.234,56"), Some(1234.56));
/// assert_eq!(parse_numeric_input("10%"), Some(0.1));
/// assert_eq!(parse_numeric_input("=2+3*4"), Some(14.0));
/// assert_eq!(parse_numeric_input("abc"), None);
/// ```
pub fn parse_numeric_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens = lex(trimmed)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.parse_expression(0)?;
    if !matches!(parser.peek(), Token::Eof) {
        return None;
    }
    value.is_finite().then_some(value)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Eof,
}

fn lex(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' | ',' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.' | ',') {
                    i += 1;
                }
                let literal = normalize_decimal(&input[start..i]);
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
    }

    tokens.push(Token::Eof);
    Some(tokens)
}

/// Normalize a number literal to canonical dot-decimal form.
///
/// - Both separators present: the rightmost one is the decimal separator,
///   the other is a thousands separator (`1.234,56` → `1234.56`).
/// - Only commas: valid thousands grouping (`1,234,567`) strips the commas;
///   anything else (`3,5`, `12,34`, `1234,567`) is a decimal comma.
/// - Only dots: a single dot is the decimal point; multiple dots must be
///   valid thousands grouping (`1.234.567`) or the literal is left as-is and
///   fails to parse downstream.
fn normalize_decimal(literal: &str) -> String {
    let last_dot = literal.rfind('.');
    let last_comma = literal.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                literal.replace(',', "")
            } else {
                literal.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(_)) => {
            if is_grouped_thousands(literal, ',') {
                literal.replace(',', "")
            } else if literal.matches(',').count() == 1 {
                literal.replace(',', ".")
            } else {
                literal.to_string()
            }
        }
        (Some(_), None) => {
            if literal.matches('.').count() > 1 && is_grouped_thousands(literal, '.') {
                literal.replace('.', "")
            } else {
                literal.to_string()
            }
        }
        (None, None) => literal.to_string(),
    }
}

/// True when `literal` reads as digit groups joined by `sep` with the first
/// group 1–3 digits long and every following group exactly 3 (`1,234,567`).
fn is_grouped_thousands(literal: &str, sep: char) -> bool {
    let mut groups = literal.split(sep);
    let Some(first) = groups.next() else {
        return false;
    };
    if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut rest = 0;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        rest += 1;
    }
    rest > 0
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Token {
        self.tokens.get(self.pos).copied().unwrap_or(Token::Eof)
    }

    fn next(&mut self) -> Token {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn parse_expression(&mut self, min_bp: u8) -> Option<f64> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Postfix `%` binds tighter than any infix operator.
            let postfix_bp = 60;
            if matches!(self.peek(), Token::Percent) && postfix_bp >= min_bp {
                self.next();
                lhs /= 100.0;
                continue;
            }

            let (op, l_bp, r_bp) = match self.peek() {
                Token::Plus => (Token::Plus, 10, 11),
                Token::Minus => (Token::Minus, 10, 11),
                Token::Star => (Token::Star, 20, 21),
                Token::Slash => (Token::Slash, 20, 21),
                _ => break,
            };
            if l_bp < min_bp {
                break;
            }
            self.next();
            let rhs = self.parse_expression(r_bp)?;
            lhs = match op {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                _ => lhs / rhs,
            };
        }

        Some(lhs)
    }

    fn parse_prefix(&mut self) -> Option<f64> {
        match self.next() {
            Token::Number(value) => Some(value),
            Token::Plus => self.parse_prefix(),
            Token::Minus => self.parse_prefix().map(|v| -v),
            Token::LParen => {
                let value = self.parse_expression(0)?;
                match self.next() {
                    Token::RParen => Some(value),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_numeric_input("42"), Some(42.0));
        assert_eq!(parse_numeric_input("  3.5 "), Some(3.5));
        assert_eq!(parse_numeric_input("=7"), Some(7.0));
    }

    #[test]
    fn separator_conventions() {
        assert_eq!(parse_numeric_input("1,234.56"), Some(1234.56));
        assert_eq!(parse_numeric_input("1.234,56"), Some(1234.56));
        assert_eq!(parse_numeric_input("1,234"), Some(1234.0));
        assert_eq!(parse_numeric_input("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_numeric_input("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_numeric_input("3,5"), Some(3.5));
        assert_eq!(parse_numeric_input("12,34"), Some(12.34));
    }

    #[test]
    fn percent_binds_tighter_than_infix() {
        assert_eq!(parse_numeric_input("10%"), Some(0.1));
        assert_eq!(parse_numeric_input("200 + 10%"), Some(200.1));
        assert_eq!(parse_numeric_input("(200 + 100)%"), Some(3.0));
        assert_eq!(parse_numeric_input("50%%"), Some(0.005));
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(parse_numeric_input("2+3*4"), Some(14.0));
        assert_eq!(parse_numeric_input("(2+3)*4"), Some(20.0));
        assert_eq!(parse_numeric_input("10/4"), Some(2.5));
        assert_eq!(parse_numeric_input("-3+5"), Some(2.0));
        assert_eq!(parse_numeric_input("--4"), Some(4.0));
        assert_eq!(parse_numeric_input("2-3*4"), Some(-10.0));
    }

    #[test]
    fn invalid_input_is_none() {
        assert_eq!(parse_numeric_input("abc"), None);
        assert_eq!(parse_numeric_input(""), None);
        assert_eq!(parse_numeric_input("   "), None);
        assert_eq!(parse_numeric_input("2+"), None);
        assert_eq!(parse_numeric_input("(2"), None);
        assert_eq!(parse_numeric_input("2)"), None);
        assert_eq!(parse_numeric_input("1..2"), None);
        assert_eq!(parse_numeric_input("$100"), None);
    }

    #[test]
    fn non_finite_results_are_none() {
        assert_eq!(parse_numeric_input("1/0"), None);
        assert_eq!(parse_numeric_input("0/0"), None);
    }
}
