//! Parameter expression parsing.

use super::Parser;
use crate::ast::{BinOp, Expression};
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

impl Parser {
    pub(super) fn parse_expression(&mut self) -> QasmResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Precedence climbing; `**` is right-associative.
    fn parse_binary_expr(&mut self, min_prec: u8) -> QasmResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = Expression::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> QasmResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn parse_primary_expr(&mut self) -> QasmResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::UnexpectedEof("expression".into()))?;

        let expr = match token {
            Token::IntLiteral(v) => Expression::Int(v as i64),
            Token::FloatLiteral(v) => Expression::Float(v),
            Token::Pi => Expression::Pi,
            Token::Tau => Expression::Tau,
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                return Ok(Expression::Paren(Box::new(expr)));
            }
            other => return Err(self.unexpected("expression", &other)),
        };
        self.advance();
        Ok(expr)
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Power => Some(BinOp::Pow),
            _ => None,
        }
    }

    pub(super) fn parse_expression_list(&mut self) -> QasmResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_program;
    use crate::ast::Statement;
    use std::f64::consts::PI;

    fn first_param(source: &str) -> f64 {
        let program = parse_program(&format!("OPENQASM 2.0;\nqreg q[1];\nrx({source}) q[0];")).unwrap();
        let Statement::Gate(call) = &program.statements[1] else {
            panic!("expected gate call");
        };
        call.params[0].eval()
    }

    #[test]
    fn test_precedence() {
        assert!((first_param("1 + 2 * 3") - 7.0).abs() < 1e-12);
        assert!((first_param("(1 + 2) * 3") - 9.0).abs() < 1e-12);
        assert!((first_param("2 ** 3 ** 2") - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_pi_and_negation() {
        assert!((first_param("-pi/2") + PI / 2.0).abs() < 1e-12);
        assert!((first_param("3*pi/4") - 3.0 * PI / 4.0).abs() < 1e-12);
        assert!((first_param("-0.125") + 0.125).abs() < 1e-12);
        assert!((first_param("1e-3") - 0.001).abs() < 1e-15);
    }
}
