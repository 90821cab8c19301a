//! The two-pass assembler.
//!
//! Pass one walks the source collecting label definitions; pass two encodes
//! each statement against the completed symbol table. Assembly stops at the
//! first error and reports the 1-based source line.

use std::collections::BTreeMap;

use crate::asm::lexer::{strip_comment, tokenize};
use crate::asm::{InstructionRecord, Program};
use crate::common::constants::{IMEM_WORDS, IMM_MAX, IMM_MIN, JUMP_ADDR_MAX, REG_COUNT};
use crate::common::error::AsmError;
use crate::isa::{Instruction, disassemble, encode};

/// A source statement after lexing: its tokens and where it came from.
struct Statement {
    line: usize,
    source: String,
    tokens: Vec<String>,
    address: u16,
}

/// Assembles source text into a [`Program`].
///
/// # Arguments
///
/// * `source` - Assembly text, one statement per non-blank line. Lines may
///   be prefixed by any number of `label:` definitions.
///
/// # Errors
///
/// Returns the first [`AsmError`] encountered, carrying the offending
/// source line.
pub fn assemble(source: &str) -> Result<Program, AsmError> {
    let mut symbols: BTreeMap<String, u16> = BTreeMap::new();
    let mut statements: Vec<Statement> = Vec::new();

    // Pass one: strip, lex, peel labels, and assign addresses.
    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;
        let text = strip_comment(raw_line).trim();
        if text.is_empty() {
            continue;
        }

        let mut tokens = tokenize(text);
        while let Some(label) = tokens
            .first()
            .and_then(|t| t.strip_suffix(':'))
            .map(str::to_string)
        {
            if !is_identifier(&label) {
                return Err(AsmError::BadOperand {
                    detail: format!("`{label}` is not a valid label"),
                    line,
                });
            }
            let address = statements.len() as u16;
            let _ = symbols.insert(label, address);
            let _ = tokens.remove(0);
        }
        if tokens.is_empty() {
            continue;
        }

        if statements.len() >= IMEM_WORDS {
            return Err(AsmError::TooManyInstructions { line });
        }
        statements.push(Statement {
            line,
            source: text.to_string(),
            tokens,
            address: statements.len() as u16,
        });
    }

    // Pass two: encode against the completed symbol table.
    let mut instructions = Vec::with_capacity(statements.len());
    for stmt in &statements {
        let inst = parse_statement(stmt, &symbols)?;
        let raw = encode(&inst);
        instructions.push(InstructionRecord {
            address: stmt.address,
            raw,
            hex: format!("0x{raw:04X}"),
            binary: format!("{raw:016b}"),
            source: stmt.source.clone(),
            disasm: disassemble(raw),
            format: inst.format(),
        });
    }

    Ok(Program {
        instructions,
        symbols,
    })
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_statement(stmt: &Statement, symbols: &BTreeMap<String, u16>) -> Result<Instruction, AsmError> {
    let line = stmt.line;
    let mnemonic = stmt.tokens[0].as_str();
    let operands = &stmt.tokens[1..];

    let expect = |count: usize| -> Result<(), AsmError> {
        if operands.len() == count {
            Ok(())
        } else {
            Err(AsmError::BadOperand {
                detail: format!(
                    "{mnemonic} takes {count} operand(s), found {}",
                    operands.len()
                ),
                line,
            })
        }
    };

    match mnemonic {
        "NOP" => {
            expect(0)?;
            Ok(Instruction::NOP)
        }
        "ADD" | "SUB" | "AND" | "OR" | "SLT" => {
            expect(3)?;
            let rd = parse_reg(&operands[0], line)?;
            let rs = parse_reg(&operands[1], line)?;
            let rt = parse_reg(&operands[2], line)?;
            Ok(match mnemonic {
                "ADD" => Instruction::Add { rs, rt, rd },
                "SUB" => Instruction::Sub { rs, rt, rd },
                "AND" => Instruction::And { rs, rt, rd },
                "OR" => Instruction::Or { rs, rt, rd },
                _ => Instruction::Slt { rs, rt, rd },
            })
        }
        "JR" => {
            expect(1)?;
            let rs = parse_reg(&operands[0], line)?;
            Ok(Instruction::Jr { rs })
        }
        "LW" | "SW" => {
            expect(3)?;
            let rt = parse_reg(&operands[0], line)?;
            let imm = parse_imm6(&operands[1], line)?;
            let rs = parse_reg(&operands[2], line)?;
            Ok(if mnemonic == "LW" {
                Instruction::Lw { rs, rt, imm }
            } else {
                Instruction::Sw { rs, rt, imm }
            })
        }
        "ADDI" | "SUBI" | "SLTI" | "ANDI" => {
            expect(3)?;
            let rt = parse_reg(&operands[0], line)?;
            let rs = parse_reg(&operands[1], line)?;
            let imm = parse_imm6(&operands[2], line)?;
            Ok(match mnemonic {
                "ADDI" => Instruction::Addi { rs, rt, imm },
                "SUBI" => Instruction::Subi { rs, rt, imm },
                "SLTI" => Instruction::Slti { rs, rt, imm },
                _ => Instruction::Andi { rs, rt, imm },
            })
        }
        "BEQ" | "BNE" => {
            expect(3)?;
            let rs = parse_reg(&operands[0], line)?;
            let rt = parse_reg(&operands[1], line)?;
            let offset = parse_branch_target(&operands[2], stmt.address, symbols, line)?;
            Ok(if mnemonic == "BEQ" {
                Instruction::Beq { rs, rt, offset }
            } else {
                Instruction::Bne { rs, rt, offset }
            })
        }
        "JUMP" | "JAL" => {
            expect(1)?;
            let addr = parse_jump_target(&operands[0], symbols, line)?;
            Ok(if mnemonic == "JUMP" {
                Instruction::Jump { addr }
            } else {
                Instruction::Jal { addr }
            })
        }
        _ => Err(AsmError::UnknownMnemonic {
            mnemonic: mnemonic.to_string(),
            line,
        }),
    }
}

fn parse_reg(token: &str, line: usize) -> Result<usize, AsmError> {
    let bad = || AsmError::BadOperand {
        detail: format!("`{token}` is not a register ($r0..$r7)"),
        line,
    };
    let idx: usize = token
        .strip_prefix("$R")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| bad())?;
    if idx < REG_COUNT { Ok(idx) } else { Err(bad()) }
}

/// Parses a numeric literal: decimal with optional sign, or `0x` hex.
fn parse_number(token: &str) -> Option<i64> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let magnitude = match body.strip_prefix("0X") {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => body.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_imm6(token: &str, line: usize) -> Result<i16, AsmError> {
    let value = parse_number(token).ok_or_else(|| AsmError::BadOperand {
        detail: format!("`{token}` is not an immediate"),
        line,
    })?;
    if (IMM_MIN..=IMM_MAX).contains(&value) {
        Ok(value as i16)
    } else {
        Err(AsmError::ImmediateOutOfRange { value, line })
    }
}

/// Resolves a branch target: a literal offset, or a label expanded to
/// `label_address - (pc + 1)`.
fn parse_branch_target(
    token: &str,
    pc: u16,
    symbols: &BTreeMap<String, u16>,
    line: usize,
) -> Result<i16, AsmError> {
    if let Some(value) = parse_number(token) {
        return if (IMM_MIN..=IMM_MAX).contains(&value) {
            Ok(value as i16)
        } else {
            Err(AsmError::ImmediateOutOfRange { value, line })
        };
    }
    let target = lookup_label(token, symbols, line)?;
    let offset = i64::from(target) - (i64::from(pc) + 1);
    if (IMM_MIN..=IMM_MAX).contains(&offset) {
        Ok(offset as i16)
    } else {
        Err(AsmError::ImmediateOutOfRange { value: offset, line })
    }
}

/// Resolves a jump target: a literal absolute address, or a label.
fn parse_jump_target(
    token: &str,
    symbols: &BTreeMap<String, u16>,
    line: usize,
) -> Result<u16, AsmError> {
    if let Some(value) = parse_number(token) {
        return if (0..=JUMP_ADDR_MAX).contains(&value) {
            Ok(value as u16)
        } else {
            Err(AsmError::ImmediateOutOfRange { value, line })
        };
    }
    lookup_label(token, symbols, line)
}

fn lookup_label(
    token: &str,
    symbols: &BTreeMap<String, u16>,
    line: usize,
) -> Result<u16, AsmError> {
    if !is_identifier(token) {
        return Err(AsmError::BadOperand {
            detail: format!("`{token}` is neither a number nor a label"),
            line,
        });
    }
    symbols
        .get(token)
        .copied()
        .ok_or_else(|| AsmError::UndefinedLabel {
            label: token.to_string(),
            line,
        })
}
