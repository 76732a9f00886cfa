//! Shared driver: runs a lexer over a chunk sequence and collects owned
//! tokens, growing the scratch buffer whenever an overflow is reported.

use jsontok::{Feed, LexError, Lexer, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    Null,
    True,
    False,
    Str(Vec<u8>),
    Num(Vec<u8>),
    Key(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

enum Control {
    NeedsInput,
    Overflow(usize),
    End,
    Error(LexError),
}

fn drain(feed: &mut Feed<'_, '_>, out: &mut Vec<Tok>) -> Control {
    loop {
        let mut slots = [Token::End; 4];
        let n = feed.poll(&mut slots);
        for tok in &slots[..n] {
            match *tok {
                Token::NeedsInput => return Control::NeedsInput,
                Token::Overflow { needed } => return Control::Overflow(needed),
                Token::End => return Control::End,
                Token::Error(e) => return Control::Error(e),
                Token::Null => out.push(Tok::Null),
                Token::True => out.push(Tok::True),
                Token::False => out.push(Tok::False),
                Token::String(t) => out.push(Tok::Str(t.to_vec())),
                Token::Number(t) => out.push(Tok::Num(t.to_vec())),
                Token::Key(t) => out.push(Tok::Key(t.to_vec())),
                Token::ArrayStart => out.push(Tok::ArrayStart),
                Token::ArrayEnd => out.push(Tok::ArrayEnd),
                Token::ObjectStart => out.push(Tok::ObjectStart),
                Token::ObjectEnd => out.push(Tok::ObjectEnd),
            }
        }
    }
}

/// Lexes `chunks` to completion, reallocating the scratch buffer to exactly
/// the reported requirement on every overflow.
pub fn lex_chunks(chunks: &[&[u8]], capacity: usize) -> Result<Vec<Tok>, LexError> {
    let mut lexer = Lexer::new(vec![0u8; capacity].into_boxed_slice());
    let mut out = Vec::new();
    for chunk in chunks {
        let mut feed = lexer.feed(chunk);
        loop {
            match drain(&mut feed, &mut out) {
                Control::NeedsInput => break,
                Control::Overflow(needed) => {
                    let _ = feed.reallocate(vec![0u8; needed].into_boxed_slice());
                }
                Control::End => return Ok(out),
                Control::Error(e) => return Err(e),
            }
        }
    }
    let mut feed = lexer.finish();
    loop {
        match drain(&mut feed, &mut out) {
            Control::NeedsInput => panic!("starved after feed_end"),
            Control::Overflow(needed) => {
                let _ = feed.reallocate(vec![0u8; needed].into_boxed_slice());
            }
            Control::End => return Ok(out),
            Control::Error(e) => return Err(e),
        }
    }
}

pub fn lex(doc: &[u8], capacity: usize) -> Result<Vec<Tok>, LexError> {
    lex_chunks(&[doc], capacity)
}
