use foundation::time::Millis;

/// Frame metadata handed to every per-frame update.
///
/// Timestamps come from the caller (an animation-frame callback in the browser,
/// a fixed sequence in tests) so updates can be replayed deterministically.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Timestamp of this frame.
    pub now: Millis,
}

impl Frame {
    pub fn new(index: u64, now: Millis) -> Self {
        Self { index, now }
    }

    /// The next frame, stamped at `now`.
    pub fn next(self, now: Millis) -> Self {
        Self::new(self.index + 1, now)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Millis;

    #[test]
    fn next_advances_index_and_restamps() {
        let f0 = Frame::new(0, Millis(0.0));
        let f1 = f0.next(Millis(16.0));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.now, Millis(16.0));
    }
}
