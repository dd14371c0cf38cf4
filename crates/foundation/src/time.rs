/// Monotonic timestamp in milliseconds (the browser's `performance.now()` timebase).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Millis(pub f64);

impl Millis {
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is in the future).
    pub fn since(self, earlier: Millis) -> f64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<f64> for Millis {
    type Output = Millis;

    fn add(self, ms: f64) -> Self::Output {
        Millis(self.0 + ms)
    }
}
