//! Free-text amount evaluation.
//!
//! Amount fields accept small arithmetic expressions (`"20000+5000*2"`)
//! instead of a plain number. [`evaluate_amount`] turns whatever the user has
//! typed so far into a non-negative amount in minor currency units. It must
//! tolerate partial input (a trailing `+` while the user is still typing) and
//! never panic, so malformed pieces are dropped rather than reported.

/// Evaluation rules:
///
/// - every character that is not a digit or `+ - * /` is stripped first
/// - `*` and `/` bind tighter than `+` and `-` and are resolved left to right
/// - a `+`/`-` that does not follow a number is the sign of the next number
/// - a `*`/`/` that does not follow a number is dropped, as is the tail of a
///   repeated operator run and a trailing operator
/// - division by zero evaluates to 0
/// - the result is floored and clamped to a minimum of 0
///
/// ```rust
/// use engine::evaluate_amount;
///
/// assert_eq!(evaluate_amount("20000+5000*2"), 30000);
/// assert_eq!(evaluate_amount("100+"), 100);
/// assert_eq!(evaluate_amount("-5"), 0);
/// ```
pub fn evaluate_amount(raw: &str) -> i64 {
    let terms = resolve_factors(tokenize(raw));

    // Left-to-right fold of the remaining `+`/`-` terms. A number with no
    // preceding sign marker is added.
    let mut total = 0.0_f64;
    let mut sign = 1.0_f64;
    for token in terms {
        match token {
            Token::Op('-') => sign = -1.0,
            Token::Op(_) => sign = 1.0,
            Token::Number(value) => {
                total += sign * value;
                sign = 1.0;
            }
        }
    }

    total.floor().max(0.0) as i64
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut digits = String::new();

    let flush = |digits: &mut String, tokens: &mut Vec<Token>| {
        if digits.is_empty() {
            return;
        }
        if let Ok(value) = digits.parse::<f64>() {
            tokens.push(Token::Number(value));
        }
        digits.clear();
    };

    for ch in raw.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            '+' | '-' | '*' | '/' => {
                flush(&mut digits, &mut tokens);
                match tokens.last() {
                    Some(Token::Number(_)) => tokens.push(Token::Op(ch)),
                    // Only `+`/`-` are meaningful without a left operand: they
                    // become the sign marker of the next number. The first
                    // operator of a run wins; the rest are dropped.
                    None if matches!(ch, '+' | '-') => tokens.push(Token::Op(ch)),
                    _ => {}
                }
            }
            // Sanitize: everything else is stripped.
            _ => {}
        }
    }
    flush(&mut digits, &mut tokens);

    // A trailing operator means the user has not finished typing yet.
    if matches!(tokens.last(), Some(Token::Op(_))) {
        tokens.pop();
    }

    tokens
}

/// Resolves `*` and `/` eagerly, replacing each `lhs op rhs` triple with its
/// result so only `+`/`-` terms remain.
fn resolve_factors(tokens: Vec<Token>) -> Vec<Token> {
    let mut reduced: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (token, reduced.last()) {
            (Token::Number(rhs), Some(&Token::Op(op @ ('*' | '/')))) => {
                reduced.pop();
                let lhs = match reduced.pop() {
                    Some(Token::Number(value)) => value,
                    // Unreachable: the tokenizer only emits `*`/`/` after a
                    // number.
                    other => {
                        if let Some(other) = other {
                            reduced.push(other);
                        }
                        0.0
                    }
                };
                let value = if op == '*' {
                    lhs * rhs
                } else if rhs == 0.0 {
                    // Division by zero collapses to 0 instead of erroring.
                    0.0
                } else {
                    lhs / rhs
                };
                reduced.push(Token::Number(value));
            }
            _ => reduced.push(token),
        }
    }
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers_and_sums() {
        assert_eq!(evaluate_amount("20000"), 20000);
        assert_eq!(evaluate_amount("20000+5000"), 25000);
        assert_eq!(evaluate_amount("100-40-10"), 50);
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(evaluate_amount("10*3"), 30);
        assert_eq!(evaluate_amount("2+3*4"), 14);
        assert_eq!(evaluate_amount("2*3+4*5"), 26);
        assert_eq!(evaluate_amount("2*3*4"), 24);
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(evaluate_amount("5/0"), 0);
        assert_eq!(evaluate_amount("100+5/0"), 100);
    }

    #[test]
    fn division_floors() {
        assert_eq!(evaluate_amount("5/2"), 2);
        assert_eq!(evaluate_amount("10/4+1"), 3);
    }

    #[test]
    fn negative_results_clamp_to_zero() {
        assert_eq!(evaluate_amount("-5"), 0);
        assert_eq!(evaluate_amount("10-30"), 0);
    }

    #[test]
    fn partial_input_is_tolerated() {
        assert_eq!(evaluate_amount(""), 0);
        assert_eq!(evaluate_amount("100+"), 100);
        assert_eq!(evaluate_amount("100*"), 100);
        assert_eq!(evaluate_amount("+"), 0);
        assert_eq!(evaluate_amount("*5"), 5);
    }

    #[test]
    fn repeated_operators_keep_the_first() {
        assert_eq!(evaluate_amount("5+-3"), 8);
        assert_eq!(evaluate_amount("5--3"), 2);
        assert_eq!(evaluate_amount("5**2"), 10);
    }

    #[test]
    fn junk_characters_are_stripped() {
        assert_eq!(evaluate_amount("1,000 + 50"), 1050);
        assert_eq!(evaluate_amount("€200"), 200);
        assert_eq!(evaluate_amount("abc"), 0);
    }
}
