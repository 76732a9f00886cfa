//! Keyword recognizer: `null`, `true`, `false`, byte by byte.

use crate::{error::LexError, token::RawTok};

use super::{Lexer, State};

/// Which literal is being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lit {
    Null,
    True,
    False,
}

impl Lit {
    /// Selects the literal from its first byte. The dispatcher only enters
    /// keyword matching on `n`, `t` or `f`.
    pub(super) fn from_first(b: u8) -> Self {
        match b {
            b'n' => Lit::Null,
            b't' => Lit::True,
            _ => Lit::False,
        }
    }

    fn text(self) -> &'static [u8] {
        match self {
            Lit::Null => b"null",
            Lit::True => b"true",
            Lit::False => b"false",
        }
    }

    fn token(self) -> RawTok {
        match self {
            Lit::Null => RawTok::Null,
            Lit::True => RawTok::True,
            Lit::False => RawTok::False,
        }
    }
}

impl Lexer {
    /// Resumes matching `lit` with `matched` bytes already seen. The
    /// matched prefix needs no buffering: the position alone restores it.
    pub(super) fn lex_keyword(&mut self, chunk: &[u8], lit: Lit, matched: u8) -> Option<RawTok> {
        let text = lit.text();
        let mut matched = usize::from(matched);
        while matched < text.len() {
            if self.cursor == self.chunk_len {
                self.state = State::Keyword {
                    lit,
                    matched: matched as u8,
                };
                if self.input_ended {
                    return self.fail(LexError::UnexpectedEnd);
                }
                return self.starve(chunk);
            }
            let b = chunk[self.cursor];
            if b != text[matched] {
                return self.fail(LexError::UnexpectedByte(b));
            }
            self.cursor += 1;
            self.run_start = self.cursor;
            matched += 1;
        }
        self.state = State::Value;
        Some(lit.token())
    }
}
