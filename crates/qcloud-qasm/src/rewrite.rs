//! Token-level rewrites of OpenQASM text.
//!
//! Each rewrite lexes the source and splices replacements at token spans, so
//! identifiers that merely contain a gate name (`sxdg`, `idx`, `register10`)
//! are never touched. Whitespace and comments outside replaced spans are
//! preserved byte for byte.

use std::ops::Range;

use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// `qelib1` mnemonics and their Braket OpenQASM 3 equivalents.
pub const BRAKET_MNEMONICS: &[(&str, &str)] = &[
    ("id", "i"),
    ("cx", "cnot"),
    ("sx", "v"),
    ("sdg", "si"),
    ("tdg", "ti"),
    ("sxdg", "vi"),
    ("ccx", "ccnot"),
    ("csx", "cv"),
    ("rxx", "xx"),
    ("ryy", "yy"),
    ("rzz", "zz"),
    ("u3", "U"),
];

const VERBATIM_OPEN: &str = "#pragma braket verbatim\nbox{\n";
const VERBATIM_CLOSE: &str = "}\n";

/// Remove every `include "...";` statement together with its line break.
pub fn strip_include(source: &str) -> QasmResult<String> {
    let tokens = tokenize(source)?;
    let mut edits = Vec::new();

    for window in tokens.windows(3) {
        if let [
            SpannedToken {
                token: Token::Include,
                span: start,
            },
            SpannedToken {
                token: Token::StringLiteral(_),
                ..
            },
            SpannedToken {
                token: Token::Semicolon,
                span: end,
            },
        ] = window
        {
            let mut stop = end.end;
            if source[stop..].starts_with('\n') {
                stop += 1;
            }
            edits.push((start.start..stop, String::new()));
        }
    }

    Ok(splice(source, edits))
}

/// Rename identifiers in statement-head position (the gate name of a gate
/// call) by exact match against `table`.
pub fn rename_gates(source: &str, table: &[(&str, &str)]) -> QasmResult<String> {
    let tokens = tokenize(source)?;
    let mut edits = Vec::new();

    for (index, spanned) in tokens.iter().enumerate() {
        if !is_statement_head(&tokens, index) {
            continue;
        }
        if let Token::Identifier(name) = &spanned.token {
            if let Some((_, replacement)) = table.iter().find(|(from, _)| from == name) {
                edits.push((spanned.span.clone(), (*replacement).to_string()));
            }
        }
    }

    Ok(splice(source, edits))
}

/// Rename every identifier token equal to `from`.
pub fn rename_identifier(source: &str, from: &str, to: &str) -> QasmResult<String> {
    let tokens = tokenize(source)?;
    let edits = tokens
        .iter()
        .filter(|t| matches!(&t.token, Token::Identifier(name) if name == from))
        .map(|t| (t.span.clone(), to.to_string()))
        .collect();
    Ok(splice(source, edits))
}

/// Wrap everything between the register declarations and the first
/// measurement in a Braket verbatim box.
pub fn insert_verbatim_box(source: &str) -> QasmResult<String> {
    let tokens = tokenize(source)?;

    let mut declarations_end = None;
    let mut first_measure = None;
    let mut statement_start = 0;
    let mut statement_has_measure = false;
    let mut statement_is_decl = false;

    for (index, spanned) in tokens.iter().enumerate() {
        if is_statement_head(&tokens, index) {
            statement_start = index;
            statement_has_measure = false;
            statement_is_decl = matches!(
                spanned.token,
                Token::Qreg | Token::Creg | Token::Qubit | Token::Bit
            );
        }
        match spanned.token {
            Token::Measure => statement_has_measure = true,
            Token::Semicolon => {
                if statement_is_decl && first_measure.is_none() {
                    declarations_end = Some(spanned.span.end);
                }
                if statement_has_measure && first_measure.is_none() {
                    first_measure = Some(tokens[statement_start].span.start);
                }
            }
            _ => {}
        }
    }

    let close_at = first_measure.ok_or(QasmError::MissingMeasurement)?;
    let mut open_at = declarations_end.ok_or_else(|| {
        QasmError::Unsupported("no register declaration before the first measurement".into())
    })?;
    let mut open = VERBATIM_OPEN.to_string();
    if source[open_at..].starts_with('\n') {
        open_at += 1;
    } else {
        open.insert(0, '\n');
    }

    Ok(splice(
        source,
        vec![
            (open_at..open_at, open),
            (close_at..close_at, VERBATIM_CLOSE.to_string()),
        ],
    ))
}

/// A token opens a statement when it follows `;`, `{`, `}` or a pragma, or
/// is the first token of the source.
fn is_statement_head(tokens: &[SpannedToken], index: usize) -> bool {
    index == 0
        || matches!(
            tokens[index - 1].token,
            Token::Semicolon | Token::LBrace | Token::RBrace | Token::Pragma(_)
        )
}

/// Apply non-overlapping edits, given in any order.
fn splice(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&source[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BELL: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\ncreg register0[2];\nh q[0];\ncx q[0],q[1];\nmeasure q[0] -> register0[0];\nmeasure q[1] -> register0[1];\n";

    #[test]
    fn test_strip_include() {
        let out = strip_include(BELL).unwrap();
        assert!(out.starts_with("OPENQASM 2.0;\nqreg q[2];\n"));
        assert!(!out.contains("include"));
    }

    #[test]
    fn test_rename_gates_exact_match_only() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nsx q[0];\nsxdg q[0];\ntdg q[0];\nid q[0];\n";
        let out = rename_gates(source, BRAKET_MNEMONICS).unwrap();
        assert_eq!(
            out,
            "OPENQASM 2.0;\nqreg q[1];\nv q[0];\nvi q[0];\nti q[0];\ni q[0];\n"
        );
    }

    #[test]
    fn test_rename_gates_ignores_operands() {
        let source = "OPENQASM 2.0;\nqreg cx[2];\ncx cx[0],cx[1];\n";
        let out = rename_gates(source, BRAKET_MNEMONICS).unwrap();
        assert_eq!(out, "OPENQASM 2.0;\nqreg cx[2];\ncnot cx[0],cx[1];\n");
    }

    #[test]
    fn test_rename_identifier() {
        let out = rename_identifier(BELL, "register0", "meas").unwrap();
        assert!(out.contains("creg meas[2];"));
        assert!(out.contains("measure q[1] -> meas[1];"));
        assert!(!out.contains("register0"));
    }

    #[test]
    fn test_rename_identifier_whole_token() {
        let source = "OPENQASM 2.0;\nqreg q[1];\ncreg register1[1];\ncreg register10[1];\n";
        let out = rename_identifier(source, "register1", "meas").unwrap();
        assert!(out.contains("creg meas[1];"));
        assert!(out.contains("creg register10[1];"));
    }

    #[test]
    fn test_insert_verbatim_box() {
        let source = strip_include(BELL).unwrap();
        let out = insert_verbatim_box(&source).unwrap();
        assert_eq!(
            out,
            "OPENQASM 2.0;\nqreg q[2];\ncreg register0[2];\n#pragma braket verbatim\nbox{\nh q[0];\ncx q[0],q[1];\n}\nmeasure q[0] -> register0[0];\nmeasure q[1] -> register0[1];\n"
        );
    }

    #[test]
    fn test_insert_verbatim_box_requires_measure() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nh q[0];\n";
        assert!(matches!(
            insert_verbatim_box(source),
            Err(QasmError::MissingMeasurement)
        ));
    }

    #[test]
    fn test_full_bridge_parses() {
        let text = strip_include(BELL).unwrap();
        let text = rename_gates(&text, BRAKET_MNEMONICS).unwrap();
        let text = insert_verbatim_box(&text).unwrap();
        let program = crate::parse_program(&text).unwrap();
        assert!(program.has_verbatim());
    }
}
