//! Leftover bytes from a transport message larger than the caller's buffer.

#[derive(Debug, Default)]
pub struct Pending {
    data: Vec<u8>,
    offset: usize,
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Replace the buffered bytes. Anything not yet copied out is discarded.
    pub fn fill(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
        self.offset = 0;
    }

    /// Copy as much as fits into `buf`, returning the count.
    pub fn copy_to(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.data[self.offset..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.offset += n;
        if self.is_empty() {
            self.data.clear();
            self.offset = 0;
        }
        n
    }

    /// Like [`copy_to`](Self::copy_to), but the first byte of `buf` is
    /// `prefix` and the buffered bytes follow it. `buf` must hold at least
    /// two bytes.
    pub fn copy_prefixed(&mut self, prefix: u8, buf: &mut [u8]) -> usize {
        buf[0] = prefix;
        1 + self.copy_to(&mut buf[1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let mut pending = Pending::default();
        assert!(pending.is_empty());
        assert_eq!(pending.copy_to(&mut [0u8; 4]), 0);
    }

    #[test]
    fn copies_in_buffer_sized_pieces() {
        let mut pending = Pending::default();
        pending.fill(b"abcdefg".to_vec());

        let mut buf = [0u8; 3];
        assert_eq!(pending.copy_to(&mut buf), 3);
        assert_eq!(&buf, b"abc");
        assert_eq!(pending.copy_to(&mut buf), 3);
        assert_eq!(&buf, b"def");
        assert_eq!(pending.copy_to(&mut buf), 1);
        assert_eq!(&buf[..1], b"g");
        assert!(pending.is_empty());
    }

    #[test]
    fn prefixed_copies_repeat_the_prefix() {
        let mut pending = Pending::default();
        pending.fill(b"wxyz".to_vec());

        let mut buf = [0u8; 3];
        assert_eq!(pending.copy_prefixed(b'1', &mut buf), 3);
        assert_eq!(&buf, b"1wx");
        assert_eq!(pending.copy_prefixed(b'1', &mut buf), 3);
        assert_eq!(&buf, b"1yz");
        assert!(pending.is_empty());
    }

    #[test]
    fn fill_with_empty_stays_empty() {
        let mut pending = Pending::default();
        pending.fill(Vec::new());
        assert!(pending.is_empty());
    }
}
