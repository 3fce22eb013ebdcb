//! Recursive-descent parser for OpenQASM 2 and the Braket OpenQASM 3 subset.

mod expression;
mod lowering;
mod statement;

pub use lowering::{gate_kind, lower_to_circuit};

use qcloud_ir::Circuit;
use rustc_hash::FxHashSet;

use crate::ast::{Program, Statement};
use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse OpenQASM source into a [`Circuit`].
pub fn parse(source: &str) -> QasmResult<Circuit> {
    let program = parse_program(source)?;
    lower_to_circuit(&program)
}

/// Parse OpenQASM source into a [`Program`] AST.
pub fn parse_program(source: &str) -> QasmResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    fn new(source: &str) -> QasmResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    pub(super) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    /// Byte offset of the current token, or of the end of input.
    pub(super) fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.span.start)
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    pub(super) fn unexpected(&self, expected: &str, found: &Token) -> QasmError {
        QasmError::UnexpectedToken {
            position: self.position(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Expect a token of the same kind as `expected`.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let position = self.position();
        let found = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(QasmError::UnexpectedToken {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> QasmResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut includes = Vec::new();
        let mut statements = Vec::new();
        let mut declared = FxHashSet::default();
        while !self.is_eof() {
            if self.consume(&Token::Include) {
                includes.push(self.parse_string()?);
                self.expect(Token::Semicolon)?;
                continue;
            }
            let statement = self.parse_statement()?;
            if let Statement::QubitDecl { name, .. } | Statement::ClassicalDecl { name, .. } =
                &statement
            {
                if !declared.insert(name.clone()) {
                    return Err(QasmError::DuplicateDeclaration(name.clone()));
                }
            }
            statements.push(statement);
        }

        Ok(Program {
            version,
            includes,
            statements,
        })
    }

    fn parse_version(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::FloatLiteral(v)) if v == 2.0 || v == 3.0 => Ok(format!("{v:.1}")),
            Some(Token::IntLiteral(v)) if v == 2 || v == 3 => Ok(format!("{v}.0")),
            Some(other) => Err(QasmError::InvalidVersion(other.to_string())),
            None => Err(QasmError::UnexpectedEof("version number".into())),
        }
    }

    fn parse_string(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::StringLiteral(s)) => Ok(s),
            Some(other) => Err(self.unexpected("string", &other)),
            None => Err(QasmError::UnexpectedEof("string".into())),
        }
    }

    pub(super) fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(self.unexpected("identifier", &other)),
            None => Err(QasmError::UnexpectedEof("identifier".into())),
        }
    }

    pub(super) fn parse_index(&mut self) -> QasmResult<u32> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v)
                .map_err(|_| QasmError::Unsupported(format!("index {v} exceeds u32"))),
            Some(other) => Err(self.unexpected("integer", &other)),
            None => Err(QasmError::UnexpectedEof("integer".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::QubitRef;

    #[test]
    fn test_parse_qasm2_bell() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg register0[2];
            h q[0];
            cx q[0],q[1];
            measure q[0] -> register0[0];
            measure q[1] -> register0[1];
        "#;

        let program = parse_program(source).unwrap();
        assert_eq!(program.version, "2.0");
        assert_eq!(program.includes, vec!["qelib1.inc".to_string()]);
        assert_eq!(program.num_qubits().unwrap(), 2);

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.measurements().next().unwrap().name(), "register0");
    }

    #[test]
    fn test_parse_braket_verbatim() {
        let source = "OPENQASM 3.0;\nbit[2] b;\n#pragma braket verbatim\nbox{\nh $0;\ncnot $0, $1;\n}\nb[0] = measure $0;\nb[1] = measure $1;";

        let program = parse_program(source).unwrap();
        assert!(program.has_verbatim());
        assert_eq!(program.num_qubits().unwrap(), 2);
        let Statement::Verbatim(inner) = &program.statements[1] else {
            panic!("expected verbatim box, got {:?}", program.statements[1]);
        };
        assert_eq!(inner.len(), 2);
        assert_eq!(
            program.measurement_groups().unwrap(),
            vec![("b".to_string(), vec![0, 1])]
        );
    }

    #[test]
    fn test_parse_multiple_registers() {
        let source = "OPENQASM 3.0;\nqubit[2] a;\nqubit[3] b;\ncx a[1], b[2];";
        let program = parse_program(source).unwrap();
        assert_eq!(program.num_qubits().unwrap(), 5);
        let Statement::Gate(call) = &program.statements[2] else {
            panic!("expected gate");
        };
        assert_eq!(program.resolve_qubit(&call.qubits[1]).unwrap(), 4);
        assert_eq!(
            call.qubits[0],
            QubitRef::Indexed {
                register: "a".into(),
                index: 1
            }
        );
    }

    #[test]
    fn test_parse_error_undefined_register() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nh r[0];";
        assert!(matches!(parse(source), Err(QasmError::UndefinedRegister(r)) if r == "r"));
    }

    #[test]
    fn test_parse_error_bad_version() {
        assert!(matches!(
            parse_program("OPENQASM 4.0;"),
            Err(QasmError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_parse_error_reports_offset() {
        let err = parse_program("OPENQASM 2.0;\nqreg q[1]\nh q[0];").unwrap_err();
        assert!(matches!(err, QasmError::UnexpectedToken { position: 24, .. }));
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[2];\ncreg q[2];\nmeasure q[0] -> q[0];";
        assert!(matches!(
            parse_program(source),
            Err(QasmError::DuplicateDeclaration(name)) if name == "q"
        ));
    }

    #[test]
    fn test_oversized_registers_rejected() {
        let source = "OPENQASM 2.0;\nqreg a[4294967295];\nqreg b[1];\ncreg c[1];\nmeasure b[0] -> c[0];\n";
        let program = parse_program(source).unwrap();
        assert!(matches!(program.num_qubits(), Err(QasmError::Unsupported(_))));
        assert!(matches!(parse(source), Err(QasmError::Unsupported(_))));

        let physical = "OPENQASM 3.0;\nbit[1] b;\nb[0] = measure $4294967295;";
        assert!(matches!(
            parse_program(physical).unwrap().num_qubits(),
            Err(QasmError::Unsupported(_))
        ));
    }
}
