//! Integer constant expression evaluation.
//!
//! Used for enumerator values, array lengths and `#if` conditions. Values are
//! computed in `i128` so every signed and unsigned 64-bit constant is exact.
//! Casts are accepted and ignored; `sizeof` is rewritten by the parser before
//! evaluation.

use crate::error::{CParseError, Location, Result};
use crate::token::{Token, TokenKind};

/// Name resolution for identifiers appearing in a constant expression.
pub trait ConstScope {
    /// Value of an enumeration constant, if `name` is one.
    fn constant(&self, name: &str) -> Option<i128>;

    /// Whether `name` names a type (so `(name)` is a cast).
    fn is_type_name(&self, _name: &str) -> bool {
        false
    }
}

/// Scope with no constants and no type names.
pub struct EmptyScope;

impl ConstScope for EmptyScope {
    fn constant(&self, _name: &str) -> Option<i128> {
        None
    }
}

/// Keywords that can start a type name inside a cast.
const TYPE_KEYWORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "const", "volatile", "struct", "union", "enum",
];

/// Evaluate `tokens` as a complete integer constant expression.
pub fn evaluate(tokens: &[Token], scope: &dyn ConstScope, anchor: &Location) -> Result<i128> {
    let mut eval = Evaluator {
        tokens,
        pos: 0,
        scope,
        anchor,
    };
    if tokens.is_empty() {
        return Err(eval.error("empty expression"));
    }
    let value = eval.conditional()?;
    if let Some(tok) = eval.peek() {
        return Err(eval.error(&format!("unexpected token '{}'", tok.text)));
    }
    Ok(value)
}

/// Parse the value of an integer literal, ignoring `u`/`l` suffixes.
pub fn parse_integer(text: &str) -> Option<i128> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if body.is_empty() {
        return None;
    }
    i128::from_str_radix(body, radix).ok()
}

/// Value of a character constant such as `'a'`, `'\n'` or `L'\x41'`.
pub fn parse_char(text: &str) -> Option<i128> {
    let start = text.find('\'')?;
    let inner = text.get(start + 1..text.len().checked_sub(1)?)?;
    let mut chars = inner.chars();
    let value = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => 10,
            't' => 9,
            'r' => 13,
            'a' => 7,
            'b' => 8,
            'f' => 12,
            'v' => 11,
            'e' => 27,
            'x' => i128::from_str_radix(chars.as_str(), 16).ok()?,
            d @ '0'..='7' => {
                let rest: String = std::iter::once(d).chain(chars.by_ref()).collect();
                i128::from_str_radix(&rest, 8).ok()?
            }
            other => other as i128,
        },
        c => c as i128,
    };
    Some(value)
}

struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    scope: &'a dyn ConstScope,
    anchor: &'a Location,
}

impl<'a> Evaluator<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn error(&self, detail: &str) -> CParseError {
        let location = self
            .peek()
            .or_else(|| self.tokens.last())
            .map_or_else(|| self.anchor.clone(), |t| t.location.clone());
        CParseError::ConstantExpression {
            location,
            detail: detail.to_string(),
        }
    }

    fn expect(&mut self, p: &str) -> Result<()> {
        if self.peek_punct(p) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{p}'")))
        }
    }

    fn conditional(&mut self) -> Result<i128> {
        let cond = self.binary(1)?;
        if !self.peek_punct("?") {
            return Ok(cond);
        }
        self.pos += 1;
        let then = self.conditional()?;
        self.expect(":")?;
        let otherwise = self.conditional()?;
        Ok(if cond != 0 { then } else { otherwise })
    }

    fn binary(&mut self, min_prec: u8) -> Result<i128> {
        let mut lhs = self.unary()?;
        loop {
            let Some(op) = self.peek().filter(|t| t.kind == TokenKind::Punct) else {
                break;
            };
            let Some(prec) = precedence(&op.text) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(prec + 1)?;
            lhs = self.apply(&op.text, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn apply(&self, op: &str, lhs: i128, rhs: i128) -> Result<i128> {
        let value = match op {
            "||" => ((lhs != 0) || (rhs != 0)) as i128,
            "&&" => ((lhs != 0) && (rhs != 0)) as i128,
            "|" => lhs | rhs,
            "^" => lhs ^ rhs,
            "&" => lhs & rhs,
            "==" => (lhs == rhs) as i128,
            "!=" => (lhs != rhs) as i128,
            "<" => (lhs < rhs) as i128,
            ">" => (lhs > rhs) as i128,
            "<=" => (lhs <= rhs) as i128,
            ">=" => (lhs >= rhs) as i128,
            "<<" | ">>" => {
                let amount = u32::try_from(rhs)
                    .ok()
                    .filter(|&n| n < 128)
                    .ok_or_else(|| self.error(&format!("shift amount {rhs} out of range")))?;
                if op == "<<" {
                    lhs.wrapping_shl(amount)
                } else {
                    lhs.wrapping_shr(amount)
                }
            }
            "+" => lhs.wrapping_add(rhs),
            "-" => lhs.wrapping_sub(rhs),
            "*" => lhs.wrapping_mul(rhs),
            "/" | "%" => {
                if rhs == 0 {
                    return Err(self.error("division by zero"));
                }
                if op == "/" {
                    lhs.wrapping_div(rhs)
                } else {
                    lhs.wrapping_rem(rhs)
                }
            }
            other => return Err(self.error(&format!("unsupported operator '{other}'"))),
        };
        Ok(value)
    }

    fn unary(&mut self) -> Result<i128> {
        let Some(tok) = self.peek() else {
            return Err(self.error("unexpected end of expression"));
        };
        match tok.kind {
            TokenKind::Punct => match tok.text.as_str() {
                "+" => {
                    self.pos += 1;
                    self.unary()
                }
                "-" => {
                    self.pos += 1;
                    Ok(self.unary()?.wrapping_neg())
                }
                "~" => {
                    self.pos += 1;
                    Ok(!self.unary()?)
                }
                "!" => {
                    self.pos += 1;
                    Ok((self.unary()? == 0) as i128)
                }
                "(" => {
                    self.pos += 1;
                    if self.at_type_name() {
                        self.skip_cast()?;
                        return self.unary();
                    }
                    let value = self.conditional()?;
                    self.expect(")")?;
                    Ok(value)
                }
                other => Err(self.error(&format!("unexpected token '{other}'"))),
            },
            TokenKind::Number => {
                self.pos += 1;
                parse_integer(&tok.text)
                    .ok_or_else(|| self.error(&format!("invalid integer constant '{}'", tok.text)))
            }
            TokenKind::CharLiteral => {
                self.pos += 1;
                parse_char(&tok.text)
                    .ok_or_else(|| self.error(&format!("invalid character constant {}", tok.text)))
            }
            TokenKind::Identifier => {
                if tok.text == "sizeof" {
                    return Err(self.error("sizeof of an expression is not supported"));
                }
                self.pos += 1;
                self.scope
                    .constant(&tok.text)
                    .ok_or_else(|| CParseError::ConstantExpression {
                        location: tok.location.clone(),
                        detail: format!("'{}' is not a constant", tok.text),
                    })
            }
            TokenKind::StringLiteral => Err(self.error("string literal in integer expression")),
        }
    }

    fn at_type_name(&self) -> bool {
        self.peek().and_then(Token::ident).is_some_and(|name| {
            TYPE_KEYWORDS.contains(&name) || self.scope.is_type_name(name)
        })
    }

    /// Skip a parenthesized type name whose `(` was already consumed.
    fn skip_cast(&mut self) -> Result<()> {
        let mut depth = 1;
        while let Some(tok) = self.peek() {
            self.pos += 1;
            if tok.is_punct("(") {
                depth += 1;
            } else if tok.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(self.error("unterminated cast"))
    }
}

fn precedence(op: &str) -> Option<u8> {
    let prec = match op {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" => 6,
        "<" | ">" | "<=" | ">=" => 7,
        "<<" | ">>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some(prec)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::lexer::tokenize;

    struct MapScope(HashMap<&'static str, i128>);

    impl ConstScope for MapScope {
        fn constant(&self, name: &str) -> Option<i128> {
            self.0.get(name).copied()
        }

        fn is_type_name(&self, name: &str) -> bool {
            name == "VGint"
        }
    }

    fn eval_with(src: &str, scope: &dyn ConstScope) -> Result<i128> {
        let file: Arc<Path> = Arc::from(Path::new("expr.h"));
        let tokens = tokenize(src, file.clone()).unwrap();
        evaluate(&tokens, scope, &Location::start_of(file))
    }

    fn eval(src: &str) -> i128 {
        eval_with(src, &EmptyScope).unwrap()
    }

    #[test]
    fn integer_literals() {
        assert_eq!(eval("42"), 42);
        assert_eq!(eval("0x7FFFFFFF"), 0x7FFF_FFFF);
        assert_eq!(eval("010"), 8);
        assert_eq!(eval("0xFFFFFFFFFFFFFFFFULL"), u64::MAX as i128);
        assert_eq!(eval("0"), 0);
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3"), 7);
        assert_eq!(eval("(1 + 2) * 3"), 9);
        assert_eq!(eval("10 - 4 - 3"), 3);
        assert_eq!(eval("1 << 4 | 1"), 17);
        assert_eq!(eval("1 ? 2 : 3"), 2);
        assert_eq!(eval("0 || 0 && 1"), 0);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(eval("-1"), -1);
        assert_eq!(eval("~0"), -1);
        assert_eq!(eval("!5"), 0);
    }

    #[test]
    fn character_constants() {
        assert_eq!(eval("'A'"), 65);
        assert_eq!(eval("'\\n'"), 10);
        assert_eq!(eval("'\\x41'"), 65);
        assert_eq!(eval("'\\0'"), 0);
    }

    #[test]
    fn identifiers_resolve_through_scope() {
        let scope = MapScope(HashMap::from([("VG_MAX_ENUM", 0x7FFF_FFFF)]));
        assert_eq!(eval_with("VG_MAX_ENUM - 1", &scope).unwrap(), 0x7FFF_FFFE);
        assert!(eval_with("UNKNOWN", &scope).is_err());
    }

    #[test]
    fn casts_are_ignored() {
        let scope = MapScope(HashMap::new());
        assert_eq!(eval_with("(VGint)5", &scope).unwrap(), 5);
        assert_eq!(eval_with("(unsigned int)-1", &scope).unwrap(), -1);
    }

    #[test]
    fn errors_are_reported() {
        assert!(eval_with("1 / 0", &EmptyScope).is_err());
        assert!(eval_with("1 +", &EmptyScope).is_err());
        assert!(eval_with("1 2", &EmptyScope).is_err());
        assert!(eval_with("", &EmptyScope).is_err());
    }
}
