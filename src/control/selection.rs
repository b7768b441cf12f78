/// Cursor over a non-empty list that wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    index: usize,
    len: usize,
}

impl Selector {
    /// `len` must be non-zero; the catalog guarantees this before any view
    /// is mounted. A zero length is treated as one.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "selector over an empty list");
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.len - 1) % self.len;
        self.index
    }

    pub fn select(&mut self, index: usize) {
        self.index = index % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_len_times_returns_home() {
        for len in 1..=7 {
            for start in 0..len {
                let mut forward = Selector::new(len);
                forward.select(start);
                let mut backward = forward;
                for _ in 0..len {
                    forward.next();
                    backward.prev();
                }
                assert_eq!(forward.index(), start);
                assert_eq!(backward.index(), start);
            }
        }
    }

    #[test]
    fn prev_wraps_from_zero() {
        let mut selector = Selector::new(18);
        assert_eq!(selector.prev(), 17);
        assert_eq!(selector.next(), 0);
    }
}
