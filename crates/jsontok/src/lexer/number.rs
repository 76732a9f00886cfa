//! Number sub-lexer: the full JSON number grammar, resumable per phase.
//!
//! Strict JSON, no extensions: optional `-`; `0` alone or `[1-9][0-9]*`;
//! optional `.` with at least one digit; optional `e`/`E` with optional
//! sign and at least one digit. A number has no closing byte of its own, so
//! it terminates only on a delimiter (whitespace, `,`, `]`, `}`, the start
//! of a comment) or on end-of-input while in an accepting phase.

use crate::{
    error::LexError,
    token::{RawTok, Span},
};

use super::{Lexer, State};

/// Grammar position inside a number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NumPhase {
    /// Just after a leading `-`; a digit is mandatory.
    Sign,
    /// A leading `0`; no further integer digit may follow.
    Zero,
    /// Inside `[1-9][0-9]*`.
    Int,
    /// Just after `.`; a fraction digit is mandatory.
    Dot,
    /// Inside the fraction digits.
    Frac,
    /// Just after `e`/`E`; a sign or digit is mandatory.
    Exp,
    /// Just after the exponent sign; a digit is mandatory.
    ExpSign,
    /// Inside the exponent digits.
    ExpDigits,
}

impl NumPhase {
    /// Phase after the first byte, which the dispatcher already consumed.
    pub(super) fn first(b: u8) -> Self {
        match b {
            b'-' => NumPhase::Sign,
            b'0' => NumPhase::Zero,
            _ => NumPhase::Int,
        }
    }

    /// Whether the literal may legally stop in this phase.
    fn accepting(self) -> bool {
        matches!(
            self,
            NumPhase::Zero | NumPhase::Int | NumPhase::Frac | NumPhase::ExpDigits
        )
    }
}

/// A byte that may legally follow a complete number.
fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' | b'/')
}

impl Lexer {
    pub(super) fn lex_number(&mut self, chunk: &[u8], phase: NumPhase) -> Option<RawTok> {
        let mut phase = phase;
        while self.cursor < self.chunk_len {
            let b = chunk[self.cursor];
            phase = match (phase, b) {
                (NumPhase::Sign, b'0') => NumPhase::Zero,
                (NumPhase::Sign, b'1'..=b'9') => NumPhase::Int,
                (NumPhase::Int | NumPhase::Frac | NumPhase::ExpDigits, b'0'..=b'9') => phase,
                (NumPhase::Zero | NumPhase::Int, b'.') => NumPhase::Dot,
                (NumPhase::Zero | NumPhase::Int | NumPhase::Frac, b'e' | b'E') => NumPhase::Exp,
                (NumPhase::Dot, b'0'..=b'9') => NumPhase::Frac,
                (NumPhase::Exp, b'+' | b'-') => NumPhase::ExpSign,
                (NumPhase::Exp | NumPhase::ExpSign, b'0'..=b'9') => NumPhase::ExpDigits,
                _ => {
                    // Keep the phase current in case emitting overflows the
                    // scratch buffer and the poll is retried here.
                    self.state = State::Number(phase);
                    if phase.accepting() && is_delimiter(b) {
                        return self.finish_number(chunk);
                    }
                    // a second `.`, stray sign, digit after a leading zero,
                    // or a missing mandatory digit
                    return self.fail(LexError::MalformedNumber);
                }
            };
            self.cursor += 1;
        }
        self.state = State::Number(phase);
        if self.input_ended {
            if phase.accepting() {
                return self.finish_number(chunk);
            }
            return self.fail(LexError::MalformedNumber);
        }
        self.starve(chunk)
    }

    /// Emits the Number token ending at `cursor`; the delimiter (if any) is
    /// left unconsumed for the `Value` state.
    fn finish_number(&mut self, chunk: &[u8]) -> Option<RawTok> {
        let span = if self.using_scratch {
            if let Err(tok) = self.spill(chunk, self.cursor) {
                return Some(tok);
            }
            let (start, end) = self.scratch.flush();
            Span::Scratch { start, end }
        } else {
            Span::Chunk {
                start: self.run_start,
                end: self.cursor,
            }
        };
        self.run_start = self.cursor;
        self.using_scratch = false;
        self.state = State::Value;
        Some(RawTok::Num(span))
    }
}
