use foundation::time::Millis;
use scene::FeatureKey;
use tracing::trace;

use crate::symbology::{FillStyle, Rgb};

pub const DEFAULT_DURATION_MS: f64 = 2000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Base color toward highlight color, alpha 1 → 0.
    FadeOut,
    /// Highlight color back to base color, alpha 0 → 1.
    FadeIn,
}

/// One interpolated draw of a highlighted feature.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightFrame {
    pub feature: FeatureKey,
    pub phase: Phase,
    pub style: FillStyle,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Highlight {
    feature: FeatureKey,
    started: Millis,
}

/// Two-phase color fade per feature, driven by an external clock.
///
/// Each entry lives for `2 × duration`; its last frame restores the base
/// color at full alpha and the entry is dropped after emitting it.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightAnimator {
    duration_ms: f64,
    base: Rgb,
    highlight: Rgb,
    active: Vec<Highlight>,
}

impl HighlightAnimator {
    pub fn new(duration_ms: f64, base: Rgb, highlight: Rgb) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            base,
            highlight,
            active: Vec::new(),
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Starts (or restarts) the fade for `feature`.
    pub fn start(&mut self, feature: FeatureKey, now: Millis) {
        self.active.retain(|h| h.feature != feature);
        self.active.push(Highlight {
            feature,
            started: now,
        });
    }

    /// Removes the entry for `feature`; returns whether one was active.
    pub fn cancel(&mut self, feature: FeatureKey) -> bool {
        let before = self.active.len();
        self.active.retain(|h| h.feature != feature);
        before != self.active.len()
    }

    pub fn is_active(&self, feature: FeatureKey) -> bool {
        self.active.iter().any(|h| h.feature == feature)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Frames due at `now`, in start order. Entries that reach the end emit
    /// their final frame and are removed.
    pub fn tick(&mut self, now: Millis) -> Vec<HighlightFrame> {
        let total = 2.0 * self.duration_ms;
        let mut frames = Vec::with_capacity(self.active.len());
        for h in &self.active {
            let elapsed = now.since(h.started).max(0.0);
            let (phase, style) = self.sample(elapsed);
            frames.push(HighlightFrame {
                feature: h.feature,
                phase,
                style,
            });
        }
        self.active.retain(|h| {
            let done = now.since(h.started) >= total;
            if done {
                trace!(feature = h.feature.index(), "highlight finished");
            }
            !done
        });
        frames
    }

    /// Phase and style `elapsed` ms after start. Values past `2 × duration`
    /// clamp to the final frame.
    pub fn sample(&self, elapsed: f64) -> (Phase, FillStyle) {
        let d = self.duration_ms;
        if d <= 0.0 || elapsed >= 2.0 * d {
            return (Phase::FadeIn, FillStyle::opaque(self.base));
        }
        if elapsed < d {
            let t = (elapsed / d).clamp(0.0, 1.0);
            let color = self.base.lerp(self.highlight, t);
            (Phase::FadeOut, FillStyle::new(color, 1.0 - t))
        } else {
            let t = ((elapsed - d) / d).clamp(0.0, 1.0);
            let color = self.highlight.lerp(self.base, t);
            (Phase::FadeIn, FillStyle::new(color, t))
        }
    }
}
