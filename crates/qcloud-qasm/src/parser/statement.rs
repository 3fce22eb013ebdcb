//! Statement parsing.

use super::Parser;
use crate::ast::{BitRef, GateCall, QubitRef, Statement};
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a single statement.
    pub(super) fn parse_statement(&mut self) -> QasmResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Qreg | Token::Creg => self.parse_qasm2_decl(),
            Token::Qubit | Token::Bit => self.parse_qasm3_decl(),
            Token::Measure => self.parse_measure_arrow(),
            Token::Barrier => self.parse_barrier(),
            Token::Pragma(text) => self.parse_pragma(text),
            Token::Identifier(_) if self.peek_at(1) == Some(&Token::LBracket) => {
                self.parse_measure_assign()
            }
            Token::Identifier(_) if self.peek_at(1) == Some(&Token::Eq) => {
                self.parse_measure_assign()
            }
            Token::Identifier(_) => self.parse_gate_call().map(Statement::Gate),
            other => Err(self.unexpected("statement", &other)),
        }
    }

    /// `qreg q[n];` / `creg c[n];`
    fn parse_qasm2_decl(&mut self) -> QasmResult<Statement> {
        let quantum = self.advance() == Some(Token::Qreg);
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok(declaration(quantum, name, size))
    }

    /// `qubit[n] q;` / `bit[n] c;` / `qubit q;`
    fn parse_qasm3_decl(&mut self) -> QasmResult<Statement> {
        let quantum = self.advance() == Some(Token::Qubit);
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_index()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(declaration(quantum, name, size))
    }

    /// `measure q[0] -> c[0];`, or `measure q[0];`
    fn parse_measure_arrow(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_qubit_ref()?;
        let target = if self.consume(&Token::Arrow) {
            Some(self.parse_bit_ref()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubit, target })
    }

    /// `c[0] = measure q[0];`
    fn parse_measure_assign(&mut self) -> QasmResult<Statement> {
        let target = self.parse_bit_ref()?;
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        let qubit = self.parse_qubit_ref()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure {
            qubit,
            target: Some(target),
        })
    }

    fn parse_barrier(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Barrier)?;
        let mut qubits = Vec::new();
        if !self.check(&Token::Semicolon) {
            qubits.push(self.parse_qubit_ref()?);
            while self.consume(&Token::Comma) {
                qubits.push(self.parse_qubit_ref()?);
            }
        }
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier(qubits))
    }

    /// `#pragma braket verbatim` must be followed by a `box { ... }` block.
    fn parse_pragma(&mut self, text: String) -> QasmResult<Statement> {
        self.advance();
        if text != "braket verbatim" {
            return Ok(Statement::Pragma(text));
        }

        self.expect(Token::Box)?;
        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.consume(&Token::RBrace) {
            if self.is_eof() {
                return Err(QasmError::UnexpectedEof("closing '}' of verbatim box".into()));
            }
            match self.parse_statement()? {
                Statement::Gate(call) => body.push(Statement::Gate(call)),
                Statement::Barrier(qubits) => body.push(Statement::Barrier(qubits)),
                other => {
                    return Err(QasmError::Unsupported(format!(
                        "{other:?} inside a verbatim box"
                    )));
                }
            }
        }
        Ok(Statement::Verbatim(body))
    }

    /// `name[(params)] q0, q1, ...;`
    fn parse_gate_call(&mut self) -> QasmResult<GateCall> {
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            Vec::new()
        };

        let mut qubits = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_qubit_ref()?);
        }
        self.expect(Token::Semicolon)?;

        Ok(GateCall {
            name,
            params,
            qubits,
        })
    }

    pub(super) fn parse_qubit_ref(&mut self) -> QasmResult<QubitRef> {
        if let Some(Token::PhysicalQubit(n)) = self.peek() {
            let n = *n;
            self.advance();
            return Ok(QubitRef::Physical(n));
        }
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(QubitRef::Indexed { register, index })
        } else {
            Ok(QubitRef::Named(register))
        }
    }

    fn parse_bit_ref(&mut self) -> QasmResult<BitRef> {
        let register = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(BitRef { register, index })
    }
}

fn declaration(quantum: bool, name: String, size: u32) -> Statement {
    if quantum {
        Statement::QubitDecl { name, size }
    } else {
        Statement::ClassicalDecl { name, size }
    }
}
