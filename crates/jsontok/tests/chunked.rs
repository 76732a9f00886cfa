//! Chunk-boundary and scratch-capacity invariance.
//!
//! The token stream of a document must not depend on how the bytes were
//! split into chunks or on the initial scratch capacity; random documents
//! and random byte-granularity partitions (deliberately allowed to fall
//! inside multi-byte UTF-8 scalars and escape sequences) check that.

mod common;

use std::fmt::Write as _;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use common::{lex, lex_chunks};

#[derive(Debug, Clone)]
enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Float(i32, u8, i8),
    Str(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

/// Characters worth generating: quoting and escaping hazards, a control
/// character, and multi-byte scalars of every UTF-8 length.
const CHARS: &[char] = &[
    'a', 'Z', '0', ' ', '_', '"', '\\', '/', '\n', '\t', '\u{1}', 'é', '\u{20ac}', '𝄞',
];

fn gen_string(g: &mut Gen) -> String {
    let len = usize::arbitrary(g) % 8;
    (0..len).map(|_| *g.choose(CHARS).unwrap_or(&'a')).collect()
}

fn gen_value(g: &mut Gen, depth: usize) -> Json {
    let variants = if depth == 0 { 5 } else { 7 };
    match usize::arbitrary(g) % variants {
        0 => Json::Null,
        1 => Json::Bool(bool::arbitrary(g)),
        2 => Json::Int(i64::arbitrary(g)),
        3 => Json::Float(i32::arbitrary(g), u8::arbitrary(g), i8::arbitrary(g)),
        4 => Json::Str(gen_string(g)),
        5 => {
            let len = usize::arbitrary(g) % 4;
            Json::Array((0..len).map(|_| gen_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            Json::Object(
                (0..len)
                    .map(|_| (gen_string(g), gen_value(g, depth - 1)))
                    .collect(),
            )
        }
    }
}

impl Arbitrary for Json {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_value(g, 3)
    }
}

fn render(v: &Json, out: &mut String) {
    match v {
        Json::Null => out.push_str("null"),
        Json::Bool(true) => out.push_str("true"),
        Json::Bool(false) => out.push_str("false"),
        Json::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Json::Float(m, f, e) => {
            let _ = write!(out, "{m}.{f:03}e{e}");
        }
        Json::Str(s) => render_string(s, out),
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(item, out);
            }
            out.push(']');
        }
        Json::Object(pairs) => {
            out.push('{');
            for (i, (k, v)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_string(k, out);
                out.push_str(": ");
                render(v, out);
            }
            out.push('}');
        }
    }
}

fn render_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Partitions `bytes` into non-empty chunks at pseudo-random boundaries.
fn chunked<'a>(bytes: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut idx = 0;
    for s in splits {
        if idx == bytes.len() {
            break;
        }
        let size = 1 + s % (bytes.len() - idx);
        chunks.push(&bytes[idx..idx + size]);
        idx += size;
    }
    if idx < bytes.len() || chunks.is_empty() {
        chunks.push(&bytes[idx..]);
    }
    chunks
}

#[quickcheck]
fn chunk_boundaries_never_change_the_token_stream(doc: Json, splits: Vec<usize>) -> bool {
    let mut src = String::new();
    render(&doc, &mut src);
    let bytes = src.as_bytes();
    let whole = lex(bytes, bytes.len() + 16);
    lex_chunks(&chunked(bytes, &splits), 0) == whole
}

#[quickcheck]
fn initial_scratch_capacity_never_changes_the_token_stream(doc: Json, capacity: u8) -> bool {
    let mut src = String::new();
    render(&doc, &mut src);
    let bytes = src.as_bytes();
    lex(bytes, usize::from(capacity)) == lex(bytes, bytes.len() + 16)
}

const DOCS: &[&[u8]] = &[
    b"// leading\n{\"a\" /* mid */ : [1, /* x */ 2.5e-1], \"b\": \"c\\u0041d\"} // tail",
    b"[/**/ \"\\ud834\\udd1e\", -0.5 /* ** */, true]",
    b"{\"k\": {}} //",
    b"[\"split \\\" quote\", null, [[]], 1e9]",
];

#[quickcheck]
fn commented_documents_split_anywhere(pick: usize, splits: Vec<usize>) -> bool {
    let doc = DOCS[pick % DOCS.len()];
    lex_chunks(&chunked(doc, &splits), 0) == lex(doc, 256)
}

#[test]
fn every_two_way_split_of_the_fixed_documents() {
    for doc in DOCS {
        let whole = lex(doc, 256);
        for i in 0..=doc.len() {
            assert_eq!(
                lex_chunks(&[&doc[..i], &doc[i..]], 0),
                whole,
                "split at byte {i}",
            );
        }
    }
}
