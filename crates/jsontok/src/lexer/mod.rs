//! The pull lexer: top-level state machine and the feed/poll protocol.
//!
//! Control flow
//! - The caller owns one [`Lexer`] and feeds it chunks at its own pace.
//!   [`Lexer::feed`] attaches a chunk and returns a [`Feed`] session;
//!   [`Feed::poll`] resumes the state machine exactly where the previous
//!   poll left off and fills caller-supplied token slots until they run out
//!   or a control token (`NeedsInput`, `Overflow`, `Error`, `End`) stops
//!   the loop.
//! - Every suspend point is a named [`State`]; nothing is kept on the call
//!   stack between polls. Sub-lexers (number, string, keyword, comment)
//!   each own their phase enum and resume mid-grammar-position.
//!
//! Buffering
//! - While a token's bytes lie in the current chunk, the lexer only tracks
//!   `run_start..cursor` and can emit a zero-copy slice. The run moves into
//!   the scratch buffer exactly when borrowing becomes impossible: the
//!   chunk ends mid-token, or an escape makes decoded text differ from the
//!   source bytes. `using_scratch` records which side of that fence the
//!   current token is on.
//! - The scratch buffer never grows on its own. When it is too small the
//!   poll reports `Overflow` with the required capacity and the caller
//!   resolves it with [`Feed::reallocate`] before polling again.
//!
//! Protocol violations (feeding over an unconsumed chunk, reallocating
//! without an overflow, polling with zero slots) are programmer errors and
//! panic; grammar errors are reported once as `Token::Error` and latch the
//! lexer in a terminal state.

mod keyword;
mod number;
mod space;
mod string;


use alloc::{boxed::Box, vec::Vec};

use keyword::Lit;
use number::NumPhase;
use space::CommentPhase;
use string::StrPhase;

use crate::{
    error::LexError,
    scratch::Scratch,
    token::{RawTok, Token},
};

/// Lexical position, captured across polls. One variant per suspend point.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Expecting a value (document start, after `[`, `{`, `,` or a key).
    Init,
    /// A value just closed; expecting `,`, a closing bracket, or the end.
    Value,
    /// Inside `null` / `true` / `false`, `matched` bytes in.
    Keyword { lit: Lit, matched: u8 },
    /// Inside a number literal.
    Number(NumPhase),
    /// Inside a string body or escape sequence.
    Str(StrPhase),
    /// A string just closed; peeking for `:` vs `,`/`]`/`}` to decide
    /// between `Key` and `String`.
    StrEnd,
    /// Inside a `//` or `/* */` comment, returning to `resume` after it.
    Comment { resume: Resume, phase: CommentPhase },
    /// Terminal: the document ended.
    End,
    /// Terminal: a grammar error was reported.
    Failed(LexError),
}

/// The context a comment skipper returns to, pjson's `state0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Init,
    Value,
    StrEnd,
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Init => State::Init,
            Resume::Value => State::Value,
            Resume::StrEnd => State::StrEnd,
        }
    }
}

/// An incremental, pull-based JSON lexer.
///
/// A `Lexer` converts arbitrarily-sized byte chunks into JSON tokens
/// without ever holding the whole document: token text is returned as a
/// zero-copy slice of the fed chunk whenever possible and is otherwise
/// assembled in a caller-supplied scratch buffer of caller-bounded size.
///
/// ```
/// use jsontok::{Lexer, Token};
///
/// let mut lexer = Lexer::new(vec![0; 64].into_boxed_slice());
/// let mut feed = lexer.feed(b"{\"alpha\": true}");
/// let mut slots = [Token::End; 8];
/// let n = feed.poll(&mut slots);
/// assert_eq!(
///     &slots[..n],
///     &[
///         Token::ObjectStart,
///         Token::Key(b"alpha"),
///         Token::True,
///         Token::ObjectEnd,
///         Token::NeedsInput,
///     ],
/// );
/// drop(feed);
/// let mut feed = lexer.finish();
/// let mut slots = [Token::End; 8];
/// assert_eq!(feed.poll(&mut slots), 1);
/// assert_eq!(slots[0], Token::End);
/// ```
#[derive(Debug)]
pub struct Lexer {
    state: State,
    /// Open container count. Kind matching (`[` vs `{`) is the consumer's
    /// concern; depth suffices to catch stray closers and truncated input.
    depth: usize,
    /// Set after `,` or a key's `:`; a closing bracket here is an error
    /// (`[1,]`, `{"a":}`).
    need_value: bool,
    input_ended: bool,
    /// An `Overflow` was reported and `reallocate` has not happened yet.
    overflowed: bool,
    scratch: Scratch,
    /// The current token's bytes seen so far live (partly) in the scratch
    /// buffer rather than solely in the current chunk.
    using_scratch: bool,
    /// Read position in the current chunk.
    cursor: usize,
    /// Start of the token-byte run not yet moved to the scratch buffer.
    /// Equal to `cursor` whenever no run is being captured.
    run_start: usize,
    /// Length of the most recently fed chunk, for the feed invariant.
    chunk_len: usize,
    /// Body of a just-closed string while it still lives in the chunk
    /// (`StrEnd` with `using_scratch == false`).
    pending_str: (usize, usize),
}

impl Lexer {
    /// Creates a lexer around a caller-allocated scratch buffer.
    ///
    /// A zero-length buffer is legal: every token must then be zero-copy,
    /// and any token that would need assembly reports `Overflow` instead.
    #[must_use]
    pub fn new(scratch: Box<[u8]>) -> Self {
        Self {
            state: State::Init,
            depth: 0,
            need_value: false,
            input_ended: false,
            overflowed: false,
            scratch: Scratch::new(scratch),
            using_scratch: false,
            cursor: 0,
            run_start: 0,
            chunk_len: 0,
            pending_str: (0, 0),
        }
    }

    /// Attaches the next input chunk and returns a session to poll tokens
    /// from. An empty chunk is legal and does not mean end-of-input.
    ///
    /// # Panics
    ///
    /// Panics if the previous chunk still holds unconsumed or unsaved token
    /// bytes (the caller must poll to `NeedsInput` first), or if an
    /// `Overflow` is unresolved (call [`reallocate`](Self::reallocate)).
    pub fn feed<'l, 'src>(&'l mut self, chunk: &'src [u8]) -> Feed<'l, 'src> {
        if !matches!(self.state, State::End | State::Failed(_)) {
            assert!(
                !self.overflowed,
                "feed: scratch overflow unresolved, reallocate before feeding"
            );
            assert!(
                self.chunk_released(),
                "feed: previous chunk not fully consumed"
            );
        }
        self.cursor = 0;
        self.run_start = 0;
        self.chunk_len = chunk.len();
        Feed {
            lexer: self,
            chunk,
            spool: Vec::new(),
        }
    }

    /// Marks that no further chunks will arrive. Idempotent.
    ///
    /// Buffered and partial tokens are flushed by subsequent polls; poll
    /// via [`finish`](Self::finish) (or an empty feed) to drain them.
    pub fn feed_end(&mut self) {
        self.input_ended = true;
    }

    /// [`feed_end`](Self::feed_end) plus an empty feed, for draining the
    /// trailing tokens and the final `End`.
    pub fn finish(&mut self) -> Feed<'_, 'static> {
        self.feed_end();
        self.feed(b"")
    }

    /// Replaces the scratch buffer in response to an `Overflow`, copying
    /// the pending token bytes into `scratch`. Returns the old buffer.
    ///
    /// # Panics
    ///
    /// Panics when no `Overflow` is pending, or when `scratch` cannot even
    /// hold the already-pending bytes.
    pub fn reallocate(&mut self, scratch: Box<[u8]>) -> Box<[u8]> {
        assert!(
            self.overflowed,
            "reallocate: no scratch overflow is pending"
        );
        let old = self.scratch.reallocate(scratch);
        self.overflowed = false;
        old
    }

    /// Current scratch buffer capacity in bytes.
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// True once the lexer has reached `End` or `Error`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::End | State::Failed(_))
    }

    /// No token bytes remain in the chunk: it may be freed and replaced.
    fn chunk_released(&self) -> bool {
        self.cursor == self.chunk_len
            && self.run_start == self.cursor
            && (self.using_scratch || !self.awaiting_delimiter())
    }

    /// In the closed-string lookahead, where `pending_str` may still point
    /// into the chunk.
    fn awaiting_delimiter(&self) -> bool {
        matches!(
            self.state,
            State::StrEnd
                | State::Comment {
                    resume: Resume::StrEnd,
                    ..
                }
        )
    }

    /// Runs one resumption of the state machine. `Some` is a token or
    /// control signal for the caller; `None` means progress was made (state
    /// advanced) and the dispatcher should be called again.
    fn step(&mut self, chunk: &[u8]) -> Option<RawTok> {
        match self.state {
            State::End => Some(RawTok::End),
            State::Failed(err) => Some(RawTok::Error(err)),
            State::Init => self.lex_init(chunk),
            State::Value => self.lex_value(chunk),
            State::Keyword { lit, matched } => self.lex_keyword(chunk, lit, matched),
            State::Number(phase) => self.lex_number(chunk, phase),
            State::Str(phase) => self.lex_string(chunk, phase),
            State::StrEnd => self.lex_delimiter(chunk),
            State::Comment { resume, phase } => self.lex_comment(chunk, resume, phase),
        }
    }

    /// Expecting a value: dispatch on its first byte.
    fn lex_init(&mut self, chunk: &[u8]) -> Option<RawTok> {
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
                        resume: Resume::Init,
                        phase: CommentPhase::Open,
                    };
                    return None;
                }
                b'"' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.need_value = false;
                    self.state = State::Str(StrPhase::Body);
                    return None;
                }
                b'-' | b'0'..=b'9' => {
                    self.run_start = self.cursor;
                    self.cursor += 1;
                    self.need_value = false;
                    self.state = State::Number(NumPhase::first(b));
                    return None;
                }
                b'n' | b't' | b'f' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.need_value = false;
                    self.state = State::Keyword {
                        lit: Lit::from_first(b),
                        matched: 1,
                    };
                    return None;
                }
                b'[' | b'{' => {
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.depth += 1;
                    self.need_value = false;
                    return Some(if b == b'[' {
                        RawTok::ArrayStart
                    } else {
                        RawTok::ObjectStart
                    });
                }
                b']' | b'}' => {
                    if self.depth == 0 || self.need_value {
                        return self.fail(LexError::UnmatchedBracket);
                    }
                    // empty container, `[]` or `{}`
                    self.depth -= 1;
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.state = State::Value;
                    return Some(if b == b']' {
                        RawTok::ArrayEnd
                    } else {
                        RawTok::ObjectEnd
                    });
                }
                _ => return self.fail(LexError::UnexpectedByte(b)),
            }
        }
        if self.input_ended {
            if self.depth > 0 || self.need_value {
                return self.fail(LexError::UnexpectedEnd);
            }
            // an empty (or whitespace-only) document ends without a value
            self.state = State::End;
            return Some(RawTok::End);
        }
        self.starve(chunk)
    }

    /// A value just closed: expecting `,`, a closing bracket, or the end.
    fn lex_value(&mut self, chunk: &[u8]) -> Option<RawTok> {
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
                        resume: Resume::Value,
                        phase: CommentPhase::Open,
                    };
                    return None;
                }
                b',' => {
                    if self.depth == 0 {
                        return self.fail(LexError::UnexpectedByte(b));
                    }
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    self.need_value = true;
                    self.state = State::Init;
                    return None;
                }
                b']' | b'}' => {
                    if self.depth == 0 {
                        return self.fail(LexError::UnmatchedBracket);
                    }
                    self.depth -= 1;
                    self.cursor += 1;
                    self.run_start = self.cursor;
                    return Some(if b == b']' {
                        RawTok::ArrayEnd
                    } else {
                        RawTok::ObjectEnd
                    });
                }
                _ => return self.fail(LexError::UnexpectedByte(b)),
            }
        }
        if self.input_ended {
            if self.depth > 0 {
                return self.fail(LexError::UnexpectedEnd);
            }
            self.state = State::End;
            return Some(RawTok::End);
        }
        self.starve(chunk)
    }

    /// Latches a grammar error. Terminal: every later poll repeats it.
    fn fail(&mut self, err: LexError) -> Option<RawTok> {
        self.state = State::Failed(err);
        Some(RawTok::Error(err))
    }

    /// The chunk is exhausted and more input is needed. Token bytes still
    /// resident in the chunk move to the scratch buffer first, so the
    /// caller may free the chunk once `NeedsInput` is returned.
    fn starve(&mut self, chunk: &[u8]) -> Option<RawTok> {
        debug_assert_eq!(self.cursor, self.chunk_len);
        match self.state {
            State::Number(_) | State::Str(_) => {
                if let Err(tok) = self.spill(chunk, self.cursor) {
                    return Some(tok);
                }
            }
            State::StrEnd
            | State::Comment {
                resume: Resume::StrEnd,
                ..
            } if !self.using_scratch => {
                let (start, end) = self.pending_str;
                if let Err(tok) = self.push_scratch(&chunk[start..end]) {
                    return Some(tok);
                }
                self.using_scratch = true;
            }
            _ => {}
        }
        self.run_start = self.cursor;
        Some(RawTok::NeedsInput)
    }

    /// Appends to the scratch buffer, translating an out-of-space refusal
    /// into the `Overflow` control token and latching the overflow flag the
    /// feed/reallocate protocol checks.
    fn push_scratch(&mut self, bytes: &[u8]) -> Result<(), RawTok> {
        match self.scratch.append(bytes) {
            Ok(()) => Ok(()),
            Err(needed) => {
                self.overflowed = true;
                Err(RawTok::Overflow(needed))
            }
        }
    }

    /// Moves the unmaterialized run `run_start..upto` into the scratch
    /// buffer. A no-op for an empty run, which keeps a token starting right
    /// at a chunk boundary eligible for zero-copy in the next chunk.
    fn spill(&mut self, chunk: &[u8], upto: usize) -> Result<(), RawTok> {
        if self.run_start == upto {
            return Ok(());
        }
        self.push_scratch(&chunk[self.run_start..upto])?;
        self.using_scratch = true;
        self.run_start = upto;
        Ok(())
    }

    /// Like [`spill`](Self::spill), but commits the token to the scratch
    /// buffer even when the run is empty; used when decoded text is about
    /// to diverge from the source bytes (escapes).
    fn begin_buffering(&mut self, chunk: &[u8], upto: usize) -> Result<(), RawTok> {
        self.spill(chunk, upto)?;
        self.using_scratch = true;
        Ok(())
    }
}

/// A lexing session over one fed chunk.
///
/// Holds the chunk for the duration of the feed so that zero-copy tokens
/// can borrow from it. Dropping the session mid-chunk is allowed, but the
/// next [`Lexer::feed`] panics unless the chunk was drained first.
#[derive(Debug)]
pub struct Feed<'l, 'src> {
    lexer: &'l mut Lexer,
    chunk: &'src [u8],
    /// Tokens of the current poll, payloads still as spans. Slices into the
    /// scratch buffer are handed out only after lexing has stopped, since
    /// later tokens of the same poll may still append to it.
    spool: Vec<RawTok>,
}

impl<'l, 'src> Feed<'l, 'src> {
    /// Fills `slots` with tokens, in order, and returns how many were
    /// written. Filling stops early as soon as a control token
    /// (`NeedsInput`, `Overflow`, `Error`, `End`) is written, since no
    /// further token can be produced without caller action.
    ///
    /// Token payloads borrow the chunk or the scratch buffer and must be
    /// consumed (or copied out) before the next mutating call.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is empty.
    pub fn poll<'a>(&'a mut self, slots: &mut [Token<'a>]) -> usize {
        assert!(!slots.is_empty(), "poll: need at least one token slot");
        // No alias of the scratch buffer can outlive the previous poll, so
        // flushed token text is dead and its space can be reclaimed.
        self.lexer.scratch.compact();
        self.spool.clear();
        let chunk = self.chunk;
        while self.spool.len() < slots.len() {
            if let Some(raw) = self.lexer.step(chunk) {
                let stop = raw.is_control();
                self.spool.push(raw);
                if stop {
                    break;
                }
            }
        }
        let scratch = self.lexer.scratch.bytes();
        let mut count = 0;
        for (slot, raw) in slots.iter_mut().zip(self.spool.iter()) {
            *slot = raw.materialize(chunk, scratch);
            count += 1;
        }
        count
    }

    /// Resolves an `Overflow` without detaching the chunk, so the poll can
    /// be retried in place. See [`Lexer::reallocate`].
    pub fn reallocate(&mut self, scratch: Box<[u8]>) -> Box<[u8]> {
        self.lexer.reallocate(scratch)
    }
}
