use crate::projection::Rotation;
use crate::world::FeatureKey;

/// Pointer drag state machine.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Last pointer position consumed by the drag, in pixels.
        anchor: [f64; 2],
    },
}

/// Outcome of updating the hovered feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HoverTransition {
    Unchanged,
    Changed {
        left: Option<FeatureKey>,
        entered: Option<FeatureKey>,
    },
}

/// Mutable per-session scene state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneState {
    pub rotation: Rotation,
    pub drag: DragState,
    hovered: Option<FeatureKey>,
    pinned: Option<FeatureKey>,
}

impl SceneState {
    pub fn new(rotation: Rotation, pinned: Option<FeatureKey>) -> Self {
        Self {
            rotation,
            drag: DragState::Idle,
            hovered: None,
            pinned,
        }
    }

    pub fn hovered(&self) -> Option<FeatureKey> {
        self.hovered
    }

    pub fn pinned(&self) -> Option<FeatureKey> {
        self.pinned
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn begin_drag(&mut self, at: [f64; 2]) {
        self.drag = DragState::Dragging { anchor: at };
    }

    /// Applies the pointer delta since the last anchor to the rotation.
    ///
    /// Horizontal motion adds to longitude, vertical motion subtracts from
    /// latitude. Returns the applied `(Δlon, Δlat)`, or `None` when idle.
    pub fn drag_to(&mut self, at: [f64; 2], sensitivity: f64) -> Option<(f64, f64)> {
        let DragState::Dragging { anchor } = self.drag else {
            return None;
        };
        let d_lon = (at[0] - anchor[0]) * sensitivity;
        let d_lat = -(at[1] - anchor[1]) * sensitivity;
        self.rotation.lon_deg += d_lon;
        self.rotation.lat_deg += d_lat;
        self.drag = DragState::Dragging { anchor: at };
        Some((d_lon, d_lat))
    }

    /// Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Idle;
        was_dragging
    }

    pub fn set_hovered(&mut self, next: Option<FeatureKey>) -> HoverTransition {
        if next == self.hovered {
            return HoverTransition::Unchanged;
        }
        let left = std::mem::replace(&mut self.hovered, next);
        HoverTransition::Changed {
            left,
            entered: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DragState, HoverTransition, SceneState};
    use crate::projection::Rotation;
    use crate::world::FeatureKey;

    #[test]
    fn drag_scenario_moves_rotation() {
        let mut s = SceneState::new(Rotation::new(-100.0, -20.0, 0.0), None);
        s.begin_drag([100.0, 100.0]);
        assert_eq!(s.drag_to([140.0, 84.0], 0.25), Some((10.0, 4.0)));
        assert_eq!(s.rotation, Rotation::new(-90.0, -16.0, 0.0));
        assert_eq!(s.drag, DragState::Dragging { anchor: [140.0, 84.0] });
    }

    #[test]
    fn drag_sums_incremental_deltas() {
        let mut s = SceneState::default();
        s.begin_drag([0.0, 0.0]);
        let path = [[4.0, 8.0], [12.0, -4.0], [-20.0, 16.0], [0.0, 0.0]];
        for p in path {
            s.drag_to(p, 0.25);
        }
        // Net pointer displacement is zero, so the rotation returns home.
        assert_eq!(s.rotation, Rotation::default());
    }

    #[test]
    fn idle_drag_is_ignored() {
        let mut s = SceneState::default();
        assert_eq!(s.drag_to([10.0, 10.0], 0.25), None);
        assert!(!s.end_drag());
        s.begin_drag([0.0, 0.0]);
        assert!(s.end_drag());
        assert!(!s.is_dragging());
    }

    #[test]
    fn hover_reports_leave_and_enter() {
        let a = FeatureKey::new(1);
        let b = FeatureKey::new(2);
        let mut s = SceneState::default();
        assert_eq!(
            s.set_hovered(Some(a)),
            HoverTransition::Changed {
                left: None,
                entered: Some(a)
            }
        );
        assert_eq!(s.set_hovered(Some(a)), HoverTransition::Unchanged);
        assert_eq!(
            s.set_hovered(Some(b)),
            HoverTransition::Changed {
                left: Some(a),
                entered: Some(b)
            }
        );
        assert_eq!(
            s.set_hovered(None),
            HoverTransition::Changed {
                left: Some(b),
                entered: None
            }
        );
        assert_eq!(s.hovered(), None);
    }
}
