//! Bookkeeping for the caller-supplied scratch buffer.
//!
//! The scratch buffer is the only memory the lexer writes token bytes into;
//! its backing storage is allocated by the caller and never grown behind the
//! caller's back. Tokens that cannot be returned as a slice of the current
//! chunk are assembled here. The buffer is split by two cursors:
//!
//! ```text
//! [0 .. token_start)       flushed — text of already-emitted tokens
//! [token_start .. write)   pending — bytes of the token being assembled
//! [write .. capacity)      free
//! ```
//!
//! Closing a token "flushes" it: its text becomes the pending range and
//! `token_start` advances to `write`. The flushed region is reclaimed by
//! [`Scratch::compact`] once no emitted token can still alias it.

use alloc::boxed::Box;

#[derive(Debug)]
pub(crate) struct Scratch {
    buf: Box<[u8]>,
    write: usize,
    token_start: usize,
}

impl Scratch {
    pub(crate) fn new(buf: Box<[u8]>) -> Self {
        Self {
            buf,
            write: 0,
            token_start: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The whole backing store, for resolving flushed spans into slices.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn pending_len(&self) -> usize {
        self.write - self.token_start
    }

    /// Appends `bytes` to the pending token.
    ///
    /// On failure returns the minimum capacity that would let the pending
    /// bytes plus `bytes` fit, assuming a subsequent [`reallocate`] moves
    /// the pending range to the front of the new buffer.
    ///
    /// [`reallocate`]: Scratch::reallocate
    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<(), usize> {
        if self.write + bytes.len() > self.buf.len() {
            return Err(self.pending_len() + bytes.len());
        }
        self.buf[self.write..self.write + bytes.len()].copy_from_slice(bytes);
        self.write += bytes.len();
        Ok(())
    }

    /// Closes the pending token, returning its range and reclaiming the
    /// space for the next one.
    pub(crate) fn flush(&mut self) -> (usize, usize) {
        let span = (self.token_start, self.write);
        self.token_start = self.write;
        span
    }

    /// Slides the pending bytes to the front, dropping the flushed region.
    ///
    /// Only legal while no emitted token aliases the flushed region; the
    /// lexer calls this at poll entry, where the exclusive borrow guarantees
    /// all previously returned slices are dead.
    pub(crate) fn compact(&mut self) {
        if self.token_start == 0 {
            return;
        }
        self.buf.copy_within(self.token_start..self.write, 0);
        self.write = self.pending_len();
        self.token_start = 0;
    }

    /// Rebinds the scratch to a caller-provided replacement buffer, copying
    /// the pending bytes to its front. Returns the old buffer.
    ///
    /// # Panics
    ///
    /// Panics if `new` cannot hold the pending bytes (a usage error — the
    /// caller ignored the reported overflow size).
    pub(crate) fn reallocate(&mut self, mut new: Box<[u8]>) -> Box<[u8]> {
        let pending = self.pending_len();
        assert!(
            new.len() >= pending,
            "replacement scratch buffer ({} bytes) cannot hold the {pending} pending bytes",
            new.len(),
        );
        new[..pending].copy_from_slice(&self.buf[self.token_start..self.write]);
        self.token_start = 0;
        self.write = pending;
        core::mem::replace(&mut self.buf, new)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::Scratch;

    fn with_capacity(n: usize) -> Scratch {
        Scratch::new(vec![0u8; n].into_boxed_slice())
    }

    #[test]
    fn append_and_flush() {
        let mut s = with_capacity(8);
        s.append(b"abc").unwrap();
        s.append(b"de").unwrap();
        assert_eq!(s.flush(), (0, 5));
        assert_eq!(&s.bytes()[0..5], b"abcde");
        // next token starts after the flushed one
        s.append(b"xyz").unwrap();
        assert_eq!(s.flush(), (5, 8));
    }

    #[test]
    fn overflow_reports_required_capacity() {
        let mut s = with_capacity(4);
        s.append(b"abc").unwrap();
        assert_eq!(s.append(b"de"), Err(5));
    }

    #[test]
    fn overflow_counts_only_pending_bytes() {
        let mut s = with_capacity(4);
        s.append(b"abc").unwrap();
        s.flush();
        // The flushed "abc" is dead weight; a 3-byte buffer would do after
        // compaction or reallocation.
        assert_eq!(s.append(b"def"), Err(3));
    }

    #[test]
    fn compact_reclaims_flushed_space() {
        let mut s = with_capacity(4);
        s.append(b"abc").unwrap();
        s.flush();
        s.append(b"d").unwrap();
        s.compact();
        assert_eq!(s.flush(), (0, 1));
        assert_eq!(&s.bytes()[0..1], b"d");
        s.append(b"efg").unwrap();
    }

    #[test]
    fn reallocate_preserves_pending() {
        let mut s = with_capacity(4);
        s.append(b"ab").unwrap();
        s.flush();
        s.append(b"cd").unwrap();
        let old = s.reallocate(vec![0u8; 16].into_boxed_slice());
        assert_eq!(old.len(), 4);
        s.append(b"efgh").unwrap();
        assert_eq!(s.flush(), (0, 6));
        assert_eq!(&s.bytes()[0..6], b"cdefgh");
    }

    #[test]
    #[should_panic(expected = "pending bytes")]
    fn reallocate_too_small_panics() {
        let mut s = with_capacity(8);
        s.append(b"abcdef").unwrap();
        let _ = s.reallocate(vec![0u8; 2].into_boxed_slice());
    }

    #[test]
    fn zero_capacity_accepts_empty_appends() {
        let mut s = with_capacity(0);
        s.append(b"").unwrap();
        assert_eq!(s.flush(), (0, 0));
        assert_eq!(s.append(b"x"), Err(1));
    }
}
