//! String sub-lexer: bodies, escapes, `\uXXXX` and surrogate pairs, plus
//! the closed-string lookahead that classifies `Key` vs `String`.
//!
//! Buffering is lazy: a plain ASCII/UTF-8 run stays in the chunk until an
//! escape or a chunk boundary forces materialization, so a string that sits
//! in one chunk with no escapes is emitted as a zero-copy slice. The first
//! escape commits the token to the scratch buffer for good — decoded text
//! no longer equals the source bytes. Decoded code points are re-encoded
//! as UTF-8.
//!
//! A closed string is not emitted immediately: the grammar needs the next
//! significant byte to decide whether it was a key (`:`) or a value
//! (`,`/`]`/`}`). That lookahead lives in [`Lexer::lex_delimiter`] and may
//! itself starve at a chunk boundary, with "string closed, awaiting
//! delimiter" carried in the state rather than as a flushed token.

use crate::{
    error::LexError,
    token::{RawTok, Span},
};

use super::{Lexer, Resume, State, space::CommentPhase};

/// Position inside a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StrPhase {
    /// Scanning raw body bytes.
    Body,
    /// Just after `\`.
    Escape,
    /// Collecting the four hex digits of `\uXXXX`. `high` is set while
    /// collecting the low half of a surrogate pair.
    Unicode { acc: u16, count: u8, high: Option<u16> },
    /// After a high surrogate: the pairing `\` is mandatory.
    SurrogateSlash { high: u16 },
    /// After the pairing `\`: the `u` is mandatory.
    SurrogateU { high: u16 },
}

fn hex_val(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
        _ => None,
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

impl Lexer {
    pub(super) fn lex_string(&mut self, chunk: &[u8], phase: StrPhase) -> Option<RawTok> {
        let mut phase = phase;
        loop {
            if self.cursor == self.chunk_len {
                self.state = State::Str(phase);
                if self.input_ended {
                    // unterminated string
                    return self.fail(LexError::UnexpectedEnd);
                }
                return self.starve(chunk);
            }
            let b = chunk[self.cursor];
            match phase {
                StrPhase::Body => match b {
                    b'"' => {
                        self.state = State::Str(StrPhase::Body);
                        if self.using_scratch {
                            if let Err(tok) = self.spill(chunk, self.cursor) {
                                return Some(tok);
                            }
                        } else {
                            self.pending_str = (self.run_start, self.cursor);
                        }
                        self.cursor += 1;
                        self.run_start = self.cursor;
                        self.state = State::StrEnd;
                        return None;
                    }
                    b'\\' => {
                        self.state = State::Str(StrPhase::Body);
                        if let Err(tok) = self.begin_buffering(chunk, self.cursor) {
                            return Some(tok);
                        }
                        self.cursor += 1;
                        self.run_start = self.cursor;
                        phase = StrPhase::Escape;
                    }
                    _ if b < 0x20 => return self.fail(LexError::UnescapedControl(b)),
                    _ => self.cursor += 1,
                },
                StrPhase::Escape => {
                    let decoded = match b {
                        b'"' | b'\\' | b'/' => b,
                        b'b' => 0x08,
                        b'f' => 0x0C,
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'u' => {
                            self.cursor += 1;
                            self.run_start = self.cursor;
                            phase = StrPhase::Unicode {
                                acc: 0,
                                count: 0,
                                high: None,
                            };
                            continue;
                        }
                        _ => return self.fail(LexError::InvalidEscape(b)),
                    };
                    self.state = State::Str(StrPhase::Escape);
                    if let Err(tok) = self.push_scratch(&[decoded]) {
                        return Some(tok);
                    }
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    phase = StrPhase::Body;
                }
                StrPhase::Unicode { acc, count, high } => {
                    let Some(d) = hex_val(b) else {
                        return self.fail(LexError::InvalidHexDigit(b));
                    };
                    if count < 3 {
                        self.cursor += 1;
                        self.run_start = self.cursor;
                        phase = StrPhase::Unicode {
                            acc: (acc << 4) | d,
                            count: count + 1,
                            high,
                        };
                        continue;
                    }
                    // Resolve before consuming the final digit, so that a
                    // scratch overflow retries from this exact position.
                    let unit = (acc << 4) | d;
                    self.state = State::Str(phase);
                    match high {
                        None if is_high_surrogate(unit) => {
                            self.cursor += 1;
                            self.run_start = self.cursor;
                            phase = StrPhase::SurrogateSlash { high: unit };
                        }
                        None if is_low_surrogate(unit) => {
                            return self.fail(LexError::UnpairedSurrogate(unit));
                        }
                        None => {
                            if let Err(tok) = self.push_code_point(u32::from(unit)) {
                                return Some(tok);
                            }
                            self.cursor += 1;
                            self.run_start = self.cursor;
                            phase = StrPhase::Body;
                        }
                        Some(high) => {
                            if !is_low_surrogate(unit) {
                                return self.fail(LexError::UnpairedSurrogate(unit));
                            }
                            let cp = 0x10000
                                + ((u32::from(high) - 0xD800) << 10)
                                + (u32::from(unit) - 0xDC00);
                            if let Err(tok) = self.push_code_point(cp) {
                                return Some(tok);
                            }
                            self.cursor += 1;
                            self.run_start = self.cursor;
                            phase = StrPhase::Body;
                        }
                    }
                }
                StrPhase::SurrogateSlash { high } => {
                    if b != b'\\' {
                        return self.fail(LexError::UnpairedSurrogate(high));
                    }
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    phase = StrPhase::SurrogateU { high };
                }
                StrPhase::SurrogateU { high } => {
                    if b != b'u' {
                        return self.fail(LexError::UnpairedSurrogate(high));
                    }
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    phase = StrPhase::Unicode {
                        acc: 0,
                        count: 0,
                        high: Some(high),
                    };
                }
            }
        }
    }

    /// Re-encodes a decoded code point as UTF-8 into the scratch buffer.
    fn push_code_point(&mut self, cp: u32) -> Result<(), RawTok> {
        // Surrogate halves were rejected above, so `cp` is always a valid
        // scalar; the fallback mirrors lossy decoding.
        let ch = char::from_u32(cp).unwrap_or('\u{FFFD}');
        let mut utf8 = [0u8; 4];
        let encoded = ch.encode_utf8(&mut utf8);
        self.push_scratch(encoded.as_bytes())
    }

    /// Closed-string lookahead: peek at the next significant byte without
    /// consuming a token. `:` makes the string a `Key` (and is consumed);
    /// `,`/`]`/`}` make it a `String` (byte left for the `Value` state).
    pub(super) fn lex_delimiter(&mut self, chunk: &[u8]) -> Option<RawTok> {
        while self.cursor < self.chunk_len {
            let b = chunk[self.cursor];
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                }
                b'/' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.state = State::Comment {
                        resume: Resume::StrEnd,
                        phase: CommentPhase::Open,
                    };
                    return None;
                }
                b':' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.need_value = true;
                    self.state = State::Init;
                    return Some(self.take_string(true));
                }
                b',' | b']' | b'}' => {
                    self.state = State::Value;
                    return Some(self.take_string(false));
                }
                _ => return self.fail(LexError::UnexpectedByte(b)),
            }
        }
        if self.input_ended {
            // No delimiter will ever arrive to classify the string.
            return self.fail(LexError::MissingDelimiter);
        }
        self.starve(chunk)
    }

    fn take_string(&mut self, key: bool) -> RawTok {
        let span = if self.using_scratch {
            let (start, end) = self.scratch.flush();
            self.using_scratch = false;
            Span::Scratch { start, end }
        } else {
            let (start, end) = self.pending_str;
            Span::Chunk { start, end }
        };
        RawTok::Str { span, key }
    }
}
