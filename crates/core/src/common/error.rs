//! Assembly and simulation error definitions.
//!
//! This module defines the two error domains of the simulator:
//! 1. **Assembly errors:** Rejected source text, always carrying the 1-based
//!    line number of the offending statement.
//! 2. **Simulation errors:** Control operations issued in a state that cannot
//!    honor them (stepping without a program, stepping a halted machine,
//!    rewinding an empty history).
//!
//! Assembly stops at the first error; none of these errors ever leaves the
//! machine in a partially mutated state.

use thiserror::Error;

/// Errors produced while assembling source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first token of a statement is not a known instruction mnemonic.
    #[error("unknown mnemonic `{mnemonic}` on line {line}")]
    UnknownMnemonic {
        /// The offending token, upper-cased.
        mnemonic: String,
        /// 1-based source line number.
        line: usize,
    },

    /// An operand is missing, superfluous, or of the wrong kind.
    #[error("bad operand on line {line}: {detail}")]
    BadOperand {
        /// Human-readable description of what was expected.
        detail: String,
        /// 1-based source line number.
        line: usize,
    },

    /// An immediate or branch offset does not fit its 6-bit signed field,
    /// or a jump target does not fit 12 bits.
    #[error("immediate {value} out of range on line {line}")]
    ImmediateOutOfRange {
        /// The parsed value that failed the range check.
        value: i64,
        /// 1-based source line number.
        line: usize,
    },

    /// A branch or jump references a label that is never defined.
    #[error("undefined label `{label}` on line {line}")]
    UndefinedLabel {
        /// The referenced label, upper-cased.
        label: String,
        /// 1-based source line number.
        line: usize,
    },

    /// The program does not fit in instruction memory.
    #[error("program exceeds {} instructions at line {line}", crate::common::constants::IMEM_WORDS)]
    TooManyInstructions {
        /// 1-based source line number of the first instruction past the limit.
        line: usize,
    },
}

impl AsmError {
    /// Returns the 1-based source line the error occurred on.
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownMnemonic { line, .. }
            | Self::BadOperand { line, .. }
            | Self::ImmediateOutOfRange { line, .. }
            | Self::UndefinedLabel { line, .. }
            | Self::TooManyInstructions { line } => *line,
        }
    }

    /// Returns the stable error kind name used in serialized responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownMnemonic { .. } => "UnknownMnemonic",
            Self::BadOperand { .. } => "BadOperand",
            Self::ImmediateOutOfRange { .. } => "ImmediateOutOfRange",
            Self::UndefinedLabel { .. } => "UndefinedLabel",
            Self::TooManyInstructions { .. } => "TooManyInstructions",
        }
    }
}

/// Errors produced by session control operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// `step` was issued before any program was assembled.
    #[error("no program loaded")]
    NoProgram,

    /// `step_back` was issued with an empty history.
    #[error("no history to step back to")]
    NoHistory,

    /// `step` was issued after the pipeline drained at the end of the program.
    #[error("processor is halted")]
    Halted,
}

impl SimError {
    /// Returns the stable error kind name used in serialized responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoProgram => "NoProgram",
            Self::NoHistory => "NoHistory",
            Self::Halted => "Halted",
        }
    }
}
