//! Immutable view over the source text
//!
//! An `Input` is a borrowed source plus a byte offset. Advancing produces a new
//! view and leaves the old one untouched, so alternative parses can branch from
//! the same position without copying anything.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Input<'a> {
    src: &'a str,
    offset: usize,
}

impl<'a> Input<'a> {
    pub fn new(src: &'a str) -> Input<'a> { Input { src, offset: 0 } }

    /// Byte offset into the original source
    #[inline]
    pub fn offset(&self) -> usize { self.offset }

    /// Everything not yet consumed
    #[inline]
    pub fn remaining(&self) -> &'a str { &self.src[self.offset..] }

    #[inline]
    pub fn is_empty(&self) -> bool { self.offset >= self.src.len() }

    #[inline]
    pub fn peek(&self) -> Option<char> { self.remaining().chars().next() }

    /// Consumes one char, returning it with the advanced view.
    pub fn next(&self) -> Option<(char, Input<'a>)> {
        let c = self.peek()?;
        Some((c, self.advance(c.len_utf8())))
    }

    /// Advances by `n` bytes, clamped to the end of the source.
    ///
    /// `n` must land on a char boundary; every caller advances by the length of
    /// something it has just matched.
    pub fn advance(&self, n: usize) -> Input<'a> {
        Input {
            src: self.src,
            offset: (self.offset + n).min(self.src.len()),
        }
    }

    /// The source text between `self` and a later view `end`.
    pub fn slice_to(&self, end: &Input<'a>) -> &'a str { &self.src[self.offset..end.offset.max(self.offset)] }

    /// 1-based line and column of the current offset
    pub fn line_col(&self) -> (usize, usize) {
        let consumed = &self.src[..self.offset];
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(nl) => consumed[nl + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        (line, column)
    }

    /// The full source line the current offset sits on
    pub fn current_line(&self) -> &'a str {
        let start = self.src[..self.offset].rfind('\n').map_or(0, |n| n + 1);
        let end = self.src[self.offset..]
            .find('\n')
            .map_or(self.src.len(), |n| self.offset + n);
        &self.src[start..end]
    }
}
