//! The public token vocabulary and its deferred-slice internals.
//!
//! A [`Token`]'s payload aliases either the chunk fed to the current
//! [`Feed`](crate::Feed) (zero-copy) or the lexer's scratch buffer (when the
//! token spanned chunks or required escape decoding) — never both. The alias
//! is only valid until the next call that can move those bytes, which the
//! borrow checker enforces: a polled token borrows the feed.
//!
//! Internally the lexer produces [`RawTok`]s carrying [`Span`]s instead of
//! slices, because tokens lexed early in a poll must not hold borrows of the
//! scratch buffer while later tokens in the same poll still append to it.
//! Spans are materialized into slices in one pass once lexing for the poll
//! has stopped.

use core::fmt;

use bstr::BStr;

use crate::error::LexError;

/// One lexed JSON token, or a control result.
///
/// The control kinds ([`End`](Token::End), [`Error`](Token::Error),
/// [`NeedsInput`](Token::NeedsInput), [`Overflow`](Token::Overflow)) stop a
/// poll: nothing further can be produced until the caller reacts.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// End of the JSON document. Terminal; repeated by every later poll.
    End,
    /// Malformed JSON. Terminal; repeated by every later poll.
    Error(LexError),
    /// The current chunk is exhausted; feed another one (or call
    /// [`feed_end`](crate::Lexer::feed_end)) and poll again.
    NeedsInput,
    /// The scratch buffer cannot hold the token being assembled.
    Overflow {
        /// Minimum scratch capacity, in bytes, that lets the lexer proceed
        /// after [`reallocate`](crate::Lexer::reallocate).
        needed: usize,
    },
    /// The literal `null`.
    Null,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// A string value; the payload is the decoded body without quotes.
    String(&'a [u8]),
    /// A number; the payload is the exact literal text.
    Number(&'a [u8]),
    /// An object key: a string that was followed by `:` (the `:` has been
    /// consumed).
    Key(&'a [u8]),
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
}

impl<'a> Token<'a> {
    /// Whether this kind stops a poll (back-pressure signal or terminal).
    #[must_use]
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Token::End | Token::Error(_) | Token::NeedsInput | Token::Overflow { .. }
        )
    }

    /// The token's text, for the kinds that carry one.
    #[must_use]
    pub fn text(&self) -> Option<&'a [u8]> {
        match self {
            Token::String(t) | Token::Number(t) | Token::Key(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::End => f.write_str("End"),
            Token::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Token::NeedsInput => f.write_str("NeedsInput"),
            Token::Overflow { needed } => {
                f.debug_struct("Overflow").field("needed", needed).finish()
            }
            Token::Null => f.write_str("Null"),
            Token::True => f.write_str("True"),
            Token::False => f.write_str("False"),
            Token::String(t) => f.debug_tuple("String").field(&BStr::new(t)).finish(),
            Token::Number(t) => f.debug_tuple("Number").field(&BStr::new(t)).finish(),
            Token::Key(t) => f.debug_tuple("Key").field(&BStr::new(t)).finish(),
            Token::ArrayStart => f.write_str("ArrayStart"),
            Token::ArrayEnd => f.write_str("ArrayEnd"),
            Token::ObjectStart => f.write_str("ObjectStart"),
            Token::ObjectEnd => f.write_str("ObjectEnd"),
        }
    }
}

/// Where a token's bytes currently live.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Span {
    /// A range of the chunk attached to the current feed.
    Chunk { start: usize, end: usize },
    /// A range of the scratch buffer.
    Scratch { start: usize, end: usize },
}

impl Span {
    fn slice<'a>(self, chunk: &'a [u8], scratch: &'a [u8]) -> &'a [u8] {
        match self {
            Span::Chunk { start, end } => &chunk[start..end],
            Span::Scratch { start, end } => &scratch[start..end],
        }
    }
}

/// A lexed token with its payload still described as a [`Span`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawTok {
    End,
    Error(LexError),
    NeedsInput,
    Overflow(usize),
    Null,
    True,
    False,
    Str { span: Span, key: bool },
    Num(Span),
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

impl RawTok {
    pub(crate) fn is_control(self) -> bool {
        matches!(
            self,
            RawTok::End | RawTok::Error(_) | RawTok::NeedsInput | RawTok::Overflow(_)
        )
    }

    pub(crate) fn materialize<'a>(self, chunk: &'a [u8], scratch: &'a [u8]) -> Token<'a> {
        match self {
            RawTok::End => Token::End,
            RawTok::Error(e) => Token::Error(e),
            RawTok::NeedsInput => Token::NeedsInput,
            RawTok::Overflow(needed) => Token::Overflow { needed },
            RawTok::Null => Token::Null,
            RawTok::True => Token::True,
            RawTok::False => Token::False,
            RawTok::Str { span, key: true } => Token::Key(span.slice(chunk, scratch)),
            RawTok::Str { span, key: false } => Token::String(span.slice(chunk, scratch)),
            RawTok::Num(span) => Token::Number(span.slice(chunk, scratch)),
            RawTok::ArrayStart => Token::ArrayStart,
            RawTok::ArrayEnd => Token::ArrayEnd,
            RawTok::ObjectStart => Token::ObjectStart,
            RawTok::ObjectEnd => Token::ObjectEnd,
        }
    }
}
