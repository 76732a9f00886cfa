use thiserror::Error;

/// A grammar error met while lexing.
///
/// Grammar errors are terminal: the lexer that reported one keeps reporting
/// it from every subsequent poll and must be reinitialized to be used again.
/// Resource signals ([`Token::NeedsInput`](crate::Token::NeedsInput) and
/// [`Token::Overflow`](crate::Token::Overflow)) are not errors and never
/// appear here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A byte that no grammar rule accepts at the current position.
    #[error("unexpected byte {0:#04x}")]
    UnexpectedByte(u8),
    /// A number broke off the JSON number grammar, e.g. `00`, `1.`, `0e`
    /// or a stray sign.
    #[error("malformed number")]
    MalformedNumber,
    /// A raw control byte (< 0x20) inside a string body; it must be escaped.
    #[error("unescaped control byte {0:#04x} in string")]
    UnescapedControl(u8),
    /// A `\` followed by a byte that is not a recognized escape.
    #[error("invalid escape byte {0:#04x}")]
    InvalidEscape(u8),
    /// A non-hex byte inside a `\uXXXX` escape.
    #[error("invalid unicode escape digit {0:#04x}")]
    InvalidHexDigit(u8),
    /// A surrogate code unit that does not form a high/low pair.
    #[error("unpaired surrogate \\u{0:04x}")]
    UnpairedSurrogate(u16),
    /// A closing bracket with no container open, or directly after `,`/`:`.
    #[error("unmatched closing bracket")]
    UnmatchedBracket,
    /// End of input in the middle of a token, comment or open container.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// End of input right after a closing quote: without a following
    /// delimiter the string cannot be classified as a key or a value.
    #[error("string closed at end of input with no delimiter")]
    MissingDelimiter,
}
