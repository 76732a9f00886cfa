//! Comment skipper: `//` line and `/* */` block comments, a superset
//! extension over JSON whitespace.
//!
//! Plain whitespace needs no state of its own and is skipped inline by the
//! contexts that allow it (`Init`, `Value`, the closed-string lookahead).
//! Comments do need state: a chunk boundary may fall anywhere inside one,
//! including between a trailing `*` and the byte that decides whether the
//! block just closed.

use crate::{error::LexError, token::RawTok};

use super::{Lexer, Resume, State};

/// Position inside a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CommentPhase {
    /// After the introducing `/`; the next byte picks the comment kind.
    Open,
    /// Inside `//`, runs to `\n` inclusive.
    Line,
    /// Inside `/* */`.
    Block,
    /// Inside a block comment, right after a `*`.
    BlockStar,
}

impl Lexer {
    pub(super) fn lex_comment(
        &mut self,
        chunk: &[u8],
        resume: Resume,
        phase: CommentPhase,
    ) -> Option<RawTok> {
        let mut phase = phase;
        loop {
            if self.cursor == self.chunk_len {
                self.state = State::Comment { resume, phase };
                if self.input_ended {
                    if matches!(phase, CommentPhase::Line) {
                        // a line comment may be closed by the end of input;
                        // the resumed context decides what the end means
                        self.state = resume.into();
                        return None;
                    }
                    return self.fail(LexError::UnexpectedEnd);
                }
                return self.starve(chunk);
            }
            let b = chunk[self.cursor];
            self.cursor += 1;
            self.run_start = self.cursor;
            match phase {
                CommentPhase::Open => match b {
                    b'/' => phase = CommentPhase::Line,
                    b'*' => phase = CommentPhase::Block,
                    _ => return self.fail(LexError::UnexpectedByte(b)),
                },
                CommentPhase::Line => {
                    if b == b'\n' {
                        self.state = resume.into();
                        return None;
                    }
                }
                CommentPhase::Block => {
                    if b == b'*' {
                        phase = CommentPhase::BlockStar;
                    }
                }
                CommentPhase::BlockStar => match b {
                    b'/' => {
                        self.state = resume.into();
                        return None;
                    }
                    b'*' => {}
                    // not a terminator after all; back to scanning the body
                    _ => phase = CommentPhase::Block,
                },
            }
        }
    }
}
