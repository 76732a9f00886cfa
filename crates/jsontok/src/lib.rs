//! An incremental, pull-based JSON lexer.
//!
//! `jsontok` turns a stream of arbitrarily-sized byte chunks, fed at the
//! caller's pace, into a sequence of JSON tokens — without ever requiring
//! the whole document in memory and without hidden allocation on the hot
//! path. It is meant for embedding in network/IO code where input arrives
//! in fragments and buffering memory is caller-controlled.
//!
//! The protocol is strictly request/response and single-threaded:
//!
//! 1. [`Lexer::new`] wraps a caller-allocated scratch buffer (possibly
//!    zero-length).
//! 2. [`Lexer::feed`] attaches the next chunk; [`Feed::poll`] fills
//!    caller-supplied [`Token`] slots.
//! 3. A poll stops at the first control token: [`Token::NeedsInput`] (feed
//!    the next chunk), [`Token::Overflow`] (grow the scratch buffer via
//!    [`Feed::reallocate`] and poll again), [`Token::Error`] or
//!    [`Token::End`] (terminal).
//! 4. [`Lexer::feed_end`] / [`Lexer::finish`] signal that no more input
//!    will arrive so trailing tokens can flush.
//!
//! Token text is zero-copy — a slice of the fed chunk — whenever the token
//! sits inside one chunk and needs no transformation; otherwise it is
//! assembled in the scratch buffer. Either way the slice dies at the next
//! mutating call, which the borrow checker enforces.
//!
//! Beyond RFC 8259, `//` line and `/* */` block comments are skipped
//! wherever whitespace is allowed.
//!
//! ```
//! use jsontok::{Lexer, Token};
//!
//! let mut lexer = Lexer::new(vec![0; 32].into_boxed_slice());
//!
//! // The document arrives split mid-token; "wo" and "rld" are reassembled
//! // in the scratch buffer.
//! let mut slots = [Token::End; 4];
//! let mut feed = lexer.feed(b"[\"wo");
//! assert_eq!(feed.poll(&mut slots), 2);
//! assert_eq!(slots[..2], [Token::ArrayStart, Token::NeedsInput]);
//!
//! let mut slots = [Token::End; 4];
//! let mut feed = lexer.feed(b"rld\", 42]");
//! let n = feed.poll(&mut slots);
//! assert_eq!(
//!     slots[..n],
//!     [
//!         Token::String(b"world"),
//!         Token::Number(b"42"),
//!         Token::ArrayEnd,
//!         Token::NeedsInput,
//!     ],
//! );
//!
//! let mut slots = [Token::End; 4];
//! let mut feed = lexer.finish();
//! assert_eq!(feed.poll(&mut slots), 1);
//! assert_eq!(slots[0], Token::End);
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod lexer;
mod scratch;
mod token;

pub use error::LexError;
pub use lexer::{Feed, Lexer};
pub use token::Token;
