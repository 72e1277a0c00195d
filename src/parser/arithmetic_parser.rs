//! Arithmetic Expression Parsing
//!
//! Precedence climbing over the operator levels of `$((…))`, `((…))` and
//! `let`. Compact mode (inside `let`) treats whitespace as a terminator.

use crate::ast::types::{ArithmExpr, BinaryExpr, ParenExpr, Pos, UnaryExpr};
use crate::parser::parser::Parser;
use crate::token::Token;

/// Binding level of an arithmetic operator; higher binds tighter. `None`
/// means the token is not a binary operator.
fn arithm_op_level(tok: Token) -> Option<i32> {
    match tok {
        Token::Comma => Some(0),
        Token::AddAssign
        | Token::SubAssign
        | Token::MulAssign
        | Token::QuoAssign
        | Token::RemAssign
        | Token::AndAssign
        | Token::OrAssign
        | Token::XorAssign
        | Token::ShlAssign
        | Token::ShrAssign => Some(1),
        Token::Assign => Some(2),
        Token::Quest | Token::Colon => Some(3),
        Token::OrOr => Some(4),
        Token::AndAnd | Token::And | Token::Or | Token::Caret => Some(5),
        Token::Equal | Token::NotEqual => Some(6),
        Token::Less | Token::Great | Token::LessEq | Token::GreatEq => Some(7),
        Token::DLess | Token::DGreat => Some(8),
        Token::Add | Token::Sub => Some(9),
        Token::Star | Token::Slash | Token::Percent => Some(10),
        Token::Power => Some(11),
        _ => None,
    }
}

impl Parser {
    pub(crate) fn arithm_expr(
        &mut self,
        fname: &str,
        fpos: Pos,
        level: i32,
        compact: bool,
    ) -> Option<ArithmExpr> {
        if self.tok == Token::Eof || self.peek_arithm_end() {
            return None;
        }
        let left = if level > 11 {
            self.arithm_expr_base(fname, fpos, compact)
        } else {
            self.arithm_expr(fname, fpos, level + 1, compact)
        };
        if compact && self.spaced {
            return left;
        }
        if self.tok == Token::Lit || self.tok == Token::LitWord {
            let val = self.val.clone();
            self.cur_err(format!("not a valid arithmetic operator: {}", val));
            return left;
        }
        let new_level = match arithm_op_level(self.tok) {
            Some(l) if l >= level => l,
            _ => return left,
        };
        let op = self.tok;
        let op_pos = self.pos;
        self.next();
        if compact && self.spaced {
            self.follow_err(op_pos, op.as_str(), "an expression");
        }
        let y = self.arithm_expr(op.as_str(), op_pos, new_level, compact);
        if y.is_none() {
            self.follow_err(op_pos, op.as_str(), "an expression");
        }
        Some(ArithmExpr::Binary(Box::new(BinaryExpr {
            op_pos,
            op,
            x: left.unwrap_or_else(|| ArithmExpr::Word(Default::default())),
            y: y.unwrap_or_else(|| ArithmExpr::Word(Default::default())),
        })))
    }

    fn arithm_expr_base(&mut self, fname: &str, fpos: Pos, compact: bool) -> Option<ArithmExpr> {
        if matches!(self.tok, Token::Inc | Token::Dec | Token::Not) {
            let op = self.tok;
            let op_pos = self.pos;
            self.next();
            let x = self.arithm_expr_base(op.as_str(), op_pos, compact);
            return Some(ArithmExpr::Unary(Box::new(UnaryExpr {
                op_pos,
                op,
                post: false,
                x: x.unwrap_or_else(|| ArithmExpr::Word(Default::default())),
            })));
        }
        let x = match self.tok {
            Token::LParen => {
                let lparen = self.pos;
                self.next();
                let x = self.arithm_expr("(", lparen, 0, false);
                if x.is_none() {
                    self.pos_err(lparen, "parentheses must enclose an expression".to_string());
                }
                let rparen = self.matched(lparen, Token::LParen, Token::RParen);
                ArithmExpr::Paren(Box::new(ParenExpr {
                    lparen,
                    rparen,
                    x: x.unwrap_or_else(|| ArithmExpr::Word(Default::default())),
                }))
            }
            Token::Add | Token::Sub => {
                let op = self.tok;
                let op_pos = self.pos;
                self.next();
                if compact && self.spaced {
                    self.follow_err(op_pos, op.as_str(), "an expression");
                }
                let x = self.arithm_expr(op.as_str(), op_pos, 0, compact);
                if x.is_none() {
                    self.follow_err(op_pos, op.as_str(), "an expression");
                }
                ArithmExpr::Unary(Box::new(UnaryExpr {
                    op_pos,
                    op,
                    post: false,
                    x: x.unwrap_or_else(|| ArithmExpr::Word(Default::default())),
                }))
            }
            _ => {
                let w = self.follow_word(fname, fpos);
                if w.parts.is_empty() {
                    return None;
                }
                ArithmExpr::Word(w)
            }
        };
        if compact && self.spaced {
            return Some(x);
        }
        if matches!(self.tok, Token::Inc | Token::Dec) {
            let op = self.tok;
            let op_pos = self.pos;
            self.next();
            return Some(ArithmExpr::Unary(Box::new(UnaryExpr {
                op_pos,
                op,
                post: true,
                x,
            })));
        }
        Some(x)
    }

    /// The end of an arithmetic context is a literal `))`: the current `)`
    /// token plus one raw byte.
    pub(crate) fn peek_arithm_end(&self) -> bool {
        self.tok == Token::RParen
            && self.npos < self.src.len()
            && self.src[self.npos] == b')'
    }

    /// Consume the `))` closer as one unit by advancing the raw position once
    /// past the first `)`, then restore the saved quote context.
    pub(crate) fn arithm_end(&mut self, left: Pos, old: Token) -> Pos {
        if self.peek_arithm_end() {
            self.npos += 1;
        } else {
            self.matching_err(left, Token::DLParen, Token::DRParen);
        }
        self.quote = old;
        let pos = self.pos;
        self.next();
        pos
    }
}
